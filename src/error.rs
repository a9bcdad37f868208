//! Error taxonomy shared by planning, pyramid construction and scoring.
//!
//! Every variant is a deterministic input-validation failure attributable to
//! the caller's image, configuration or filters. Nothing is retried and no
//! partial pyramid or response grid is ever returned alongside an error.
use thiserror::Error;

pub type Result<T, E = PyramidError> = std::result::Result<T, E>;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum PyramidError {
    /// Zero-area image or a buffer that does not cover its rows.
    #[error("invalid image: {reason}")]
    InvalidImage { reason: String },
    /// A planned level cannot produce a valid feature array.
    #[error("scale {scale} (level {level}) yields a degenerate {width}x{height} level")]
    UnsupportedScale {
        level: usize,
        scale: f32,
        width: usize,
        height: usize,
    },
    /// Filter (or feature level) channel depth differs from the feature family.
    #[error("filter {filter} has {actual} channels, feature family has {expected}")]
    FilterChannelMismatch {
        filter: usize,
        expected: usize,
        actual: usize,
    },
    #[error("pdf requested before any filters were set")]
    FiltersNotSet,
    /// Sizes are `(width, height)`.
    #[error(
        "filter {filter} ({}x{}) exceeds feature level {scale} ({}x{})",
        filter_size.0, filter_size.1, feature_size.0, feature_size.1
    )]
    FilterLargerThanFeature {
        scale: usize,
        filter: usize,
        filter_size: (usize, usize),
        feature_size: (usize, usize),
    },
    #[error("filter set is empty")]
    NoFilters,
    #[error("invalid filter: {reason}")]
    InvalidFilter { reason: String },
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}
