//! Valid-region filter correlation across a pyramid.
//!
//! Every response value is the dot product of a filter with the feature
//! patch under it, summed over rows and channels:
//!
//! `r(x, y) = Σ_fy Σ_fx Σ_c F(x + fx, y + fy, c) · W(fx, fy, c)`
//!
//! The map for a `W × H` level and a `fw × fh` filter is
//! `(W − fw + 1) × (H − fh + 1)`; there is no implicit padding. Sums run in
//! `f32` in a fixed order (filter rows top to bottom, taps left to right in
//! four interleaved lanes), so a (level, filter) pair always yields the same
//! bits whatever the thread count.
use super::filter::Filter;
use super::grid::ResponseGrid;
use super::prepare::PreparedFilters;
use crate::error::{PyramidError, Result};
use crate::features::FeatureArray;
use crate::image::{ImageF32, ImageViewMut};
use log::debug;
use std::sync::Arc;
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Filter state machine: unset until `set_filters`, then reusable.
#[derive(Clone, Debug)]
pub struct ConvolutionEngine {
    channels: usize,
    prepared: Option<Arc<PreparedFilters>>,
}

impl ConvolutionEngine {
    /// Engine scoring feature arrays with `channels` channels.
    pub fn new(channels: usize) -> Self {
        Self {
            channels,
            prepared: None,
        }
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Replace the filter bank. On error the previous bank stays in place.
    pub fn set_filters(&mut self, filters: &[Filter]) -> Result<()> {
        let prepared = PreparedFilters::prepare(filters, self.channels)?;
        debug!(
            "ConvolutionEngine::set_filters prepared {} filter(s), {} channels",
            prepared.len(),
            self.channels
        );
        self.prepared = Some(Arc::new(prepared));
        Ok(())
    }

    pub fn has_filters(&self) -> bool {
        self.prepared.is_some()
    }

    pub fn filter_count(&self) -> usize {
        self.prepared.as_ref().map_or(0, |p| p.len())
    }

    /// Names of the prepared filters in bank order; empty before `set_filters`.
    pub fn filter_names(&self) -> Vec<Option<String>> {
        self.prepared
            .as_deref()
            .map(|p| p.names().map(|n| n.map(str::to_owned)).collect())
            .unwrap_or_default()
    }

    pub fn prepared(&self) -> Option<&PreparedFilters> {
        self.prepared.as_deref()
    }

    /// Score every level against every filter.
    ///
    /// All (level, filter) pairs are validated before any work starts, so
    /// a failing call never yields a partial grid.
    pub fn pdf<P>(&self, pyramid: &P) -> Result<ResponseGrid>
    where
        P: AsRef<[FeatureArray]> + ?Sized,
    {
        let bank = self.prepared.as_deref().ok_or(PyramidError::FiltersNotSet)?;
        let levels = pyramid.as_ref();
        validate(levels, bank)?;

        let start = Instant::now();
        let nfilters = bank.len();
        let pairs = levels.len() * nfilters;
        let score = |i: usize| correlate_prepared(&levels[i / nfilters], bank, i % nfilters);

        #[cfg(feature = "parallel")]
        let maps: Vec<ImageF32> = (0..pairs).into_par_iter().map(score).collect();
        #[cfg(not(feature = "parallel"))]
        let maps: Vec<ImageF32> = (0..pairs).map(score).collect();

        debug!(
            "ConvolutionEngine::pdf {} level(s) x {} filter(s) in {:.3} ms",
            levels.len(),
            nfilters,
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(ResponseGrid::from_flat(levels.len(), nfilters, maps))
    }
}

fn validate(levels: &[FeatureArray], bank: &PreparedFilters) -> Result<()> {
    for (scale, level) in levels.iter().enumerate() {
        if level.channels != bank.channels() {
            return Err(PyramidError::FilterChannelMismatch {
                filter: 0,
                expected: level.channels,
                actual: bank.channels(),
            });
        }
        for filter in 0..bank.len() {
            let (fw, fh) = bank.dims(filter);
            if fw > level.w || fh > level.h {
                return Err(PyramidError::FilterLargerThanFeature {
                    scale,
                    filter,
                    filter_size: (fw, fh),
                    feature_size: level.dims(),
                });
            }
        }
    }
    Ok(())
}

fn correlate_prepared(level: &FeatureArray, bank: &PreparedFilters, index: usize) -> ImageF32 {
    let (fw, fh) = bank.dims(index);
    let c = level.channels;
    let out_w = level.w - fw + 1;
    let out_h = level.h - fh + 1;
    let patch_len = fw * c;
    let mut out = ImageF32::new(out_w, out_h);
    for y in 0..out_h {
        let out_row = out.row_mut(y);
        for fy in 0..fh {
            let feat_row = level.row(y + fy);
            let taps = bank.row(index, fy);
            for (x, acc) in out_row.iter_mut().enumerate() {
                let start = x * c;
                *acc += dot(&feat_row[start..start + patch_len], taps);
            }
        }
    }
    out
}

/// Direct correlation of one level with one unprepared filter.
///
/// Same arithmetic as the engine; useful as a reference and for one-off
/// scoring. Fails like `pdf` on channel or size mismatch.
pub fn correlate_valid(level: &FeatureArray, filter: &Filter) -> Result<ImageF32> {
    let bank = PreparedFilters::prepare(std::slice::from_ref(filter), filter.channels())?;
    validate(std::slice::from_ref(level), &bank)?;
    Ok(correlate_prepared(level, &bank, 0))
}

#[inline]
fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let mut lanes = [0.0f32; 4];
    let mut ca = a.chunks_exact(4);
    let mut cb = b.chunks_exact(4);
    for (xa, xb) in (&mut ca).zip(&mut cb) {
        lanes[0] += xa[0] * xb[0];
        lanes[1] += xa[1] * xb[1];
        lanes[2] += xa[2] * xb[2];
        lanes[3] += xa[3] * xb[3];
    }
    let mut tail = 0.0f32;
    for (&xa, &xb) in ca.remainder().iter().zip(cb.remainder()) {
        tail += xa * xb;
    }
    (lanes[0] + lanes[1]) + (lanes[2] + lanes[3]) + tail
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn level(w: usize, h: usize, c: usize) -> FeatureArray {
        let data = (0..w * h * c).map(|i| (i % 7) as f32 - 3.0).collect();
        FeatureArray::from_vec(w, h, c, data).unwrap()
    }

    fn naive(level: &FeatureArray, filter: &Filter) -> Vec<f32> {
        let (fw, fh) = filter.dims();
        let mut out = Vec::new();
        for y in 0..=level.h - fh {
            for x in 0..=level.w - fw {
                let mut acc = 0.0f64;
                for fy in 0..fh {
                    for fx in 0..fw {
                        for c in 0..level.channels {
                            acc += level.get(x + fx, y + fy, c) as f64
                                * filter.weights().get(fx, fy, c) as f64;
                        }
                    }
                }
                out.push(acc as f32);
            }
        }
        out
    }

    #[test]
    fn box_filter_sums_patches() {
        let lvl = FeatureArray::from_vec(3, 2, 1, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let f = Filter::new(2, 2, 1, vec![1.0; 4]).unwrap();
        let map = correlate_valid(&lvl, &f).unwrap();
        assert_eq!((map.w, map.h), (2, 1));
        assert_eq!(map.data, vec![12.0, 16.0]);
    }

    #[test]
    fn matches_naive_correlation_with_channels() {
        let lvl = level(9, 7, 5);
        let weights = (0..3 * 2 * 5).map(|i| ((i * 5) % 11) as f32 * 0.1 - 0.5).collect();
        let f = Filter::new(3, 2, 5, weights).unwrap();
        let map = correlate_valid(&lvl, &f).unwrap();
        assert_eq!((map.w, map.h), (7, 6));
        for (got, want) in map.data.iter().zip(naive(&lvl, &f)) {
            assert_abs_diff_eq!(*got, want, epsilon = 1e-4);
        }
    }

    #[test]
    fn pdf_requires_filters() {
        let engine = ConvolutionEngine::new(1);
        assert_eq!(
            engine.pdf(&vec![level(4, 4, 1)]).unwrap_err(),
            PyramidError::FiltersNotSet
        );
    }

    #[test]
    fn failed_set_filters_keeps_previous_bank() {
        let mut engine = ConvolutionEngine::new(2);
        let good = Filter::new(1, 1, 2, vec![1.0, 1.0]).unwrap();
        engine.set_filters(&[good]).unwrap();
        let bad = Filter::new(1, 1, 3, vec![1.0; 3]).unwrap();
        assert!(matches!(
            engine.set_filters(&[bad]),
            Err(PyramidError::FilterChannelMismatch { filter: 0, expected: 2, actual: 3 })
        ));
        assert!(matches!(engine.set_filters(&[]), Err(PyramidError::NoFilters)));
        assert_eq!(engine.filter_count(), 1);
        assert_eq!(engine.prepared().map(|p| p.channels()), Some(2));
    }

    #[test]
    fn oversized_filter_fails_without_partial_output() {
        let mut engine = ConvolutionEngine::new(1);
        engine
            .set_filters(&[Filter::new(5, 2, 1, vec![1.0; 10]).unwrap()])
            .unwrap();
        let err = engine.pdf(&vec![level(8, 8, 1), level(4, 4, 1)]).unwrap_err();
        assert_eq!(
            err,
            PyramidError::FilterLargerThanFeature {
                scale: 1,
                filter: 0,
                filter_size: (5, 2),
                feature_size: (4, 4)
            }
        );
    }

    #[test]
    fn level_channel_mismatch_is_reported() {
        let mut engine = ConvolutionEngine::new(2);
        engine
            .set_filters(&[Filter::new(1, 1, 2, vec![1.0, 1.0]).unwrap()])
            .unwrap();
        assert!(matches!(
            engine.pdf(&vec![level(3, 3, 1)]),
            Err(PyramidError::FilterChannelMismatch { .. })
        ));
    }

    #[test]
    fn dot_handles_tails() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let b = [1.0, 1.0, 1.0, 1.0, 2.0, 0.5];
        assert_eq!(dot(&a, &b), 23.0);
    }
}
