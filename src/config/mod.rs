//! JSON configuration for the `pyramid_responses` tool.
//!
//! A tool config names the input image, a filter bank file, the pipeline
//! parameters and where to write the results:
//!
//! ```json
//! {
//!   "input": "images/scene.png",
//!   "filters": "filters/bank.json",
//!   "params": { "pyramid": { "interval": 4 }, "features": { "family": "hog" } },
//!   "output": { "response_dir": "out/responses", "report_json": "out/report.json" }
//! }
//! ```
//!
//! The filter bank file holds `{ "filters": [ ... ] }`, each entry a
//! [`FilterSpec`].

use crate::convolve::Filter;
use crate::error::Result;
use crate::pipeline::PipelineParams;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct ToolConfig {
    pub input: PathBuf,
    /// Filter bank file, relative paths resolved against the working directory.
    pub filters: PathBuf,
    #[serde(default)]
    pub params: PipelineParams,
    pub output: ToolOutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct ToolOutputConfig {
    /// Directory receiving one PNG per response map.
    pub response_dir: PathBuf,
    pub report_json: PathBuf,
}

/// Memory order of [`FilterSpec::data`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterLayout {
    /// `(y, x, c)` with channel fastest.
    #[default]
    Interleaved,
    /// One `width × height` plane per channel.
    Planar,
}

/// One filter as stored in a bank file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub width: usize,
    pub height: usize,
    #[serde(default = "default_channels")]
    pub channels: usize,
    #[serde(default)]
    pub layout: FilterLayout,
    pub data: Vec<f32>,
}

fn default_channels() -> usize {
    1
}

impl FilterSpec {
    pub fn to_filter(&self) -> Result<Filter> {
        let filter = match self.layout {
            FilterLayout::Interleaved => {
                Filter::new(self.width, self.height, self.channels, self.data.clone())?
            }
            FilterLayout::Planar => {
                Filter::from_planar(self.width, self.height, self.channels, &self.data)?
            }
        };
        Ok(match &self.name {
            Some(name) => filter.with_name(name.clone()),
            None => filter,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct FilterBankFile {
    pub filters: Vec<FilterSpec>,
}

impl FilterBankFile {
    /// Convert every entry, reporting the first invalid one by index.
    pub fn to_filters(&self) -> std::result::Result<Vec<Filter>, String> {
        self.filters
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                entry.to_filter()
                    .map_err(|e| format!("Invalid filter #{i}: {e}"))
            })
            .collect()
    }
}

pub fn load_config(path: &Path) -> std::result::Result<ToolConfig, String> {
    read_json(path, "config")
}

pub fn load_filters(path: &Path) -> std::result::Result<Vec<Filter>, String> {
    let bank: FilterBankFile = read_json(path, "filter bank")?;
    bank.to_filters()
        .map_err(|e| format!("{e} in {}", path.display()))
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> std::result::Result<T, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {what} {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse {what} {}: {e}", path.display()))
}
