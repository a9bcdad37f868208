#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod convolve;
pub mod error;
pub mod features;
pub mod image;
pub mod pipeline;
pub mod pyramid;

// Reporting and tool support.
pub mod config;
pub mod diagnostics;

// --- High-level re-exports -------------------------------------------------

pub use crate::convolve::{Filter, ResponseGrid};
pub use crate::error::{PyramidError, Result};
pub use crate::features::{FeatureArray, FeatureExtractor, FeatureKind};
pub use crate::pipeline::{FeaturePipeline, PipelineParams, PipelineRun};
pub use crate::pyramid::{FeaturePyramid, PyramidOptions};

pub use crate::diagnostics::PipelineReport;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use feature_pyramid::prelude::*;
///
/// # fn main() -> feature_pyramid::Result<()> {
/// let image = ImageF32::from_fn(320, 240, |x, y| ((x ^ y) & 1) as f32);
/// // Keep only levels the 6×6 template fits into.
/// let params = PipelineParams {
///     pyramid: PyramidOptions::default().with_min_cells(6),
///     ..PipelineParams::default()
/// };
/// let mut pipeline = FeaturePipeline::new(params)?;
///
/// let template = Filter::new(6, 6, pipeline.channels(), vec![0.1; 6 * 6 * 31])?;
/// pipeline.set_filters(&[template])?;
///
/// let pyramid = pipeline.pyramid(&image)?;
/// let grid = pipeline.pdf(&pyramid)?;
/// for (s, f, map) in grid.iter() {
///     println!("scale {} filter {f}: {}x{}", pyramid.scales()[s], map.w, map.h);
/// }
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{ImageF32, ImageU8};
    pub use crate::{FeaturePipeline, Filter, PipelineParams, PyramidError, PyramidOptions};
}
