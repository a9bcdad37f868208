//! Serializable diagnostics produced by [`FeaturePipeline::process`].
//!
//! `PipelineReport` bundles the input description, per-level pyramid
//! statistics, per-map response summaries and a timing breakdown. The demo
//! tool writes it as JSON next to the response images.
//!
//! [`FeaturePipeline::process`]: crate::pipeline::FeaturePipeline::process

pub mod pyramid;
pub mod responses;
pub mod timing;

pub use pyramid::{PyramidLevelReport, PyramidStage};
pub use responses::{ResponseMapReport, ResponseStage};
pub use timing::{StageTiming, TimingBreakdown};

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    pub feature_family: String,
    pub binsize: usize,
    pub channels: usize,
    pub scheduled_levels: usize,
}

/// End-to-end trace of one `process` call.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineReport {
    pub input: InputDescriptor,
    pub pyramid: PyramidStage,
    pub responses: ResponseStage,
    pub timings: TimingBreakdown,
}
