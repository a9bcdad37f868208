//! Multi-scale feature pyramid.
//!
//! Purpose
//! - Turn one image into feature arrays at a fixed schedule of scales, so a
//!   fixed-size filter can score objects of varying size.
//!
//! Design
//! - [`ScalePlanner`] owns the schedule (a pure function of
//!   [`PyramidOptions`]) and, per image, decides each level's resampled size
//!   and how it is produced.
//! - The first octave is bilinearly resized from the source; every further
//!   octave halves the level one octave above it after an optional 5-tap
//!   Gaussian blur (see [`resample`]).
//! - [`build_pyramid`] resamples all levels, then runs the feature extractor
//!   per level (parallel across levels with the `parallel` feature).
//! - Degenerate levels are dropped or rejected per [`SmallLevelPolicy`];
//!   malformed levels are never produced.
//!
//! Complexity
//! - Resampling is O(W·H) per level; memory O(sum of levels), all levels
//!   are held until extraction finishes.

pub mod build;
pub mod options;
pub mod planner;
pub mod resample;
pub mod scaling;

pub use build::{build_pyramid, resample_levels, FeaturePyramid, Padding};
pub use options::{PyramidOptions, SmallLevelPolicy};
pub use planner::{LevelSource, PlannedLevel, ScalePlan, ScalePlanner};
pub use scaling::LevelGeometry;
