//! Filter scoring ("pdf") over a feature pyramid.
//!
//! - [`Filter`]: a scoring kernel with the same cell layout as
//!   [`FeatureArray`](crate::features::FeatureArray).
//! - [`PreparedFilters`]: the validated, arena-packed filter bank built once
//!   per `set_filters` call and shared read-only by every `pdf` call.
//! - [`ConvolutionEngine`]: owns the prepared bank and produces a
//!   [`ResponseGrid`] of valid-region correlation maps, one per
//!   (scale, filter) pair.

pub mod engine;
pub mod filter;
pub mod grid;
pub mod prepare;

pub use engine::{correlate_valid, ConvolutionEngine};
pub use filter::Filter;
pub use grid::ResponseGrid;
pub use prepare::PreparedFilters;
