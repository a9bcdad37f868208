//! Scale schedule and per-image level planning.
//!
//! The schedule depends on configuration only:
//! `s_k = max_scale · 2^(-k / interval)` for `k = 0..n`, strictly decreasing.
//! Planning an image assigns every scale a concrete resampled size:
//!
//! - the first octave (`k < interval`) is resized from the source image
//!   (scale 1.0 reuses the source as-is),
//! - every later level halves level `k − interval`, so octave steps are
//!   exact and cheap.
//!
//! A level is degenerate when its resampled size is empty or the feature
//! family would produce fewer than `min_cells` cells along either side.
//! Sizes shrink along the schedule, so the first degenerate level ends the
//! usable plan: [`SmallLevelPolicy::Drop`] truncates there,
//! [`SmallLevelPolicy::Reject`] fails with `UnsupportedScale`. A plan that
//! would lose level 0 fails under either policy.
use super::options::{PyramidOptions, SmallLevelPolicy};
use crate::error::{PyramidError, Result};
use crate::features::FeatureExtractor;
use log::warn;
use serde::Serialize;

/// How a planned level is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum LevelSource {
    /// The source image at native resolution.
    Source,
    /// Bilinear resize of the source image.
    Resize,
    /// 2× decimation of an earlier level.
    Decimate { from: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedLevel {
    pub scale: f32,
    pub width: usize,
    pub height: usize,
    /// Feature array size `(width, height)` in cells.
    pub cells: (usize, usize),
    pub source: LevelSource,
}

/// Level plan for one image size.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalePlan {
    pub image_width: usize,
    pub image_height: usize,
    pub levels: Vec<PlannedLevel>,
    /// Scheduled levels left out by the drop policy.
    pub dropped: usize,
    pub blur_before_decimate: bool,
}

impl ScalePlan {
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn scales(&self) -> Vec<f32> {
        self.levels.iter().map(|l| l.scale).collect()
    }
}

#[derive(Clone, Debug)]
pub struct ScalePlanner {
    options: PyramidOptions,
    scales: Vec<f32>,
}

impl ScalePlanner {
    pub fn new(options: PyramidOptions) -> Result<Self> {
        options.validate()?;
        let scales = schedule(&options);
        Ok(Self { options, scales })
    }

    pub fn options(&self) -> &PyramidOptions {
        &self.options
    }

    /// Configured schedule, largest scale first.
    pub fn scales(&self) -> &[f32] {
        &self.scales
    }

    pub fn nscales(&self) -> usize {
        self.scales.len()
    }

    /// Assign a resampled size and source to every scheduled scale.
    pub fn plan(
        &self,
        width: usize,
        height: usize,
        extractor: &dyn FeatureExtractor,
    ) -> Result<ScalePlan> {
        if width == 0 || height == 0 {
            return Err(PyramidError::InvalidImage {
                reason: format!("zero-area image {width}x{height}"),
            });
        }
        let interval = self.options.interval;
        let min_cells = self.options.min_cells;
        let mut levels: Vec<PlannedLevel> = Vec::with_capacity(self.scales.len());
        let mut dropped = 0;

        for (k, &scale) in self.scales.iter().enumerate() {
            let (w, h, source) = if k < interval {
                if scale == 1.0 {
                    (width, height, LevelSource::Source)
                } else {
                    (scaled(width, scale), scaled(height, scale), LevelSource::Resize)
                }
            } else {
                let parent = &levels[k - interval];
                (
                    parent.width.div_ceil(2),
                    parent.height.div_ceil(2),
                    LevelSource::Decimate { from: k - interval },
                )
            };
            let cells = extractor.output_dims(w, h);
            let degenerate = w == 0 || h == 0 || cells.0 < min_cells || cells.1 < min_cells;
            if degenerate {
                let err = PyramidError::UnsupportedScale {
                    level: k,
                    scale,
                    width: w,
                    height: h,
                };
                if k == 0 || self.options.small_levels == SmallLevelPolicy::Reject {
                    return Err(err);
                }
                dropped = self.scales.len() - k;
                warn!(
                    "ScalePlanner::plan {}x{}: dropping {} level(s) from scale {:.4} ({}x{} px, {}x{} cells)",
                    width, height, dropped, scale, w, h, cells.0, cells.1
                );
                break;
            }
            levels.push(PlannedLevel {
                scale,
                width: w,
                height: h,
                cells,
                source,
            });
        }

        Ok(ScalePlan {
            image_width: width,
            image_height: height,
            levels,
            dropped,
            blur_before_decimate: self.options.blur_before_decimate,
        })
    }
}

fn schedule(options: &PyramidOptions) -> Vec<f32> {
    let interval = options.interval;
    let octaves = (options.max_scale as f64 / options.min_scale as f64).log2();
    let mut n = (octaves * interval as f64 + 1e-6).floor() as usize + 1;
    if let Some(cap) = options.max_levels {
        n = n.min(cap);
    }
    (0..n)
        .map(|k| {
            // Whole octaves via powi keep octave steps exact halvings.
            let octave = (k / interval) as i32;
            let sub = (k % interval) as f32 / interval as f32;
            options.max_scale * 2f32.powi(-octave) * 2f32.powf(-sub)
        })
        .collect()
}

fn scaled(len: usize, scale: f32) -> usize {
    (len as f64 * scale as f64).round() as usize
}
