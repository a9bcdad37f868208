//! One-time filter preparation.
//!
//! All taps of all filters are packed into a single arena, row after row,
//! each row `width * channels` floats long in the feature array layout.
//! Scoring then walks one contiguous slice per filter row with no further
//! index arithmetic. The bank is immutable once built.
use super::filter::Filter;
use crate::error::{PyramidError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FilterEntry {
    offset: usize,
    width: usize,
    height: usize,
}

/// Validated, arena-packed filter bank.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedFilters {
    channels: usize,
    taps: Vec<f32>,
    entries: Vec<FilterEntry>,
    names: Vec<Option<String>>,
}

impl PreparedFilters {
    /// Validate `filters` against `channels` and pack them.
    pub fn prepare(filters: &[Filter], channels: usize) -> Result<Self> {
        if filters.is_empty() {
            return Err(PyramidError::NoFilters);
        }
        for (index, filter) in filters.iter().enumerate() {
            if filter.channels() != channels {
                return Err(PyramidError::FilterChannelMismatch {
                    filter: index,
                    expected: channels,
                    actual: filter.channels(),
                });
            }
        }

        let total: usize = filters.iter().map(|f| f.weights().data.len()).sum();
        let mut taps = Vec::with_capacity(total);
        let mut entries = Vec::with_capacity(filters.len());
        for filter in filters {
            entries.push(FilterEntry {
                offset: taps.len(),
                width: filter.width(),
                height: filter.height(),
            });
            taps.extend_from_slice(&filter.weights().data);
        }

        Ok(Self {
            channels,
            taps,
            entries,
            names: filters.iter().map(|f| f.name().map(str::to_owned)).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// `(width, height)` of filter `index` in cells.
    pub fn dims(&self, index: usize) -> (usize, usize) {
        let e = &self.entries[index];
        (e.width, e.height)
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names[index].as_deref()
    }

    pub fn names(&self) -> impl Iterator<Item = Option<&str>> {
        self.names.iter().map(|n| n.as_deref())
    }

    /// Row `fy` of filter `index`: `width * channels` taps.
    #[inline]
    pub(crate) fn row(&self, index: usize, fy: usize) -> &[f32] {
        let e = &self.entries[index];
        let len = e.width * self.channels;
        let start = e.offset + fy * len;
        &self.taps[start..start + len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(w: usize, h: usize, c: usize, fill: f32) -> Filter {
        Filter::new(w, h, c, vec![fill; w * h * c]).unwrap()
    }

    #[test]
    fn packs_filters_back_to_back() {
        let bank = PreparedFilters::prepare(
            &[filter(2, 2, 3, 1.0), filter(1, 3, 3, 2.0).with_name("b")],
            3,
        )
        .unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.dims(1), (1, 3));
        assert_eq!(bank.row(0, 1), &[1.0; 6]);
        assert_eq!(bank.row(1, 2), &[2.0; 3]);
        assert_eq!(bank.names().collect::<Vec<_>>(), vec![None, Some("b")]);
    }

    #[test]
    fn rejects_empty_and_mismatched_sets() {
        assert_eq!(
            PreparedFilters::prepare(&[], 1).unwrap_err(),
            PyramidError::NoFilters
        );
        let err = PreparedFilters::prepare(&[filter(2, 2, 1, 0.0), filter(2, 2, 2, 0.0)], 1)
            .unwrap_err();
        assert_eq!(
            err,
            PyramidError::FilterChannelMismatch {
                filter: 1,
                expected: 1,
                actual: 2
            }
        );
    }
}
