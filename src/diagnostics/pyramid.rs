use crate::pyramid::{FeaturePyramid, LevelSource, ScalePlan};
use serde::{Deserialize, Serialize};

/// Statistics for a single level of the feature pyramid.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PyramidLevelReport {
    pub level_index: usize,
    pub scale: f32,
    /// Resampled image size in pixels.
    pub image_width: usize,
    pub image_height: usize,
    /// Feature array size in cells (including padding).
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub decimated: bool,
    pub mean_feature: f32,
}

/// Pyramid construction details captured by the pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PyramidStage {
    pub elapsed_ms: f64,
    pub dropped_levels: usize,
    pub levels: Vec<PyramidLevelReport>,
}

impl PyramidStage {
    pub fn from_pyramid(plan: &ScalePlan, pyramid: &FeaturePyramid, elapsed_ms: f64) -> Self {
        let levels = plan
            .levels
            .iter()
            .zip(pyramid.levels())
            .enumerate()
            .map(|(level_index, (planned, features))| PyramidLevelReport {
                level_index,
                scale: planned.scale,
                image_width: planned.width,
                image_height: planned.height,
                width: features.w,
                height: features.h,
                channels: features.channels,
                decimated: matches!(planned.source, LevelSource::Decimate { .. }),
                mean_feature: features.mean(),
            })
            .collect();
        Self {
            elapsed_ms,
            dropped_levels: plan.dropped,
            levels,
        }
    }
}
