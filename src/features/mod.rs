//! Feature families and the dense feature array they produce.
//!
//! The pyramid builder and the pdf engine only rely on the
//! [`FeatureExtractor`] capability set: a constant bin size, a fixed channel
//! depth, the output grid size for a given image size, and a pure
//! image → array mapping. Concrete families are selected from configuration
//! through [`FeatureKind`].
//!
//! Feature arrays are channel-interleaved: the `channels` values of one cell
//! are contiguous, and a row of `w` cells is `w * channels` floats long. This
//! keeps every filter row a single contiguous dot product during scoring.

pub mod hog;
pub mod intensity;

pub use hog::HogFeatures;
pub use intensity::IntensityFeatures;

use crate::error::{PyramidError, Result};
use crate::image::ImageF32;
use serde::{Deserialize, Serialize};

/// Dense `h × w × channels` array of `f32`, channel index fastest.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureArray {
    pub w: usize,
    pub h: usize,
    pub channels: usize,
    pub data: Vec<f32>,
}

impl FeatureArray {
    /// Zero-filled array.
    pub fn new(w: usize, h: usize, channels: usize) -> Self {
        Self {
            w,
            h,
            channels,
            data: vec![0.0; w * h * channels],
        }
    }

    /// Wrap an interleaved buffer; fails when the length does not match.
    pub fn from_vec(w: usize, h: usize, channels: usize, data: Vec<f32>) -> Result<Self> {
        if channels == 0 {
            return Err(PyramidError::InvalidImage {
                reason: "feature array needs at least one channel".to_string(),
            });
        }
        if data.len() != w * h * channels {
            return Err(PyramidError::InvalidImage {
                reason: format!(
                    "feature buffer holds {} values, expected {}x{}x{}",
                    data.len(),
                    w,
                    h,
                    channels
                ),
            });
        }
        Ok(Self {
            w,
            h,
            channels,
            data,
        })
    }

    /// Single-channel array holding a copy of `image`.
    pub fn from_image(image: &ImageF32) -> Self {
        let packed = image.to_contiguous();
        Self {
            w: packed.w,
            h: packed.h,
            channels: 1,
            data: packed.data,
        }
    }

    /// `(width, height)` in cells.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.w + x) * self.channels
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, c: usize) -> f32 {
        self.data[self.offset(x, y) + c]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, c: usize, v: f32) {
        let i = self.offset(x, y) + c;
        self.data[i] = v;
    }

    /// All channels of one cell.
    #[inline]
    pub fn cell(&self, x: usize, y: usize) -> &[f32] {
        let start = self.offset(x, y);
        &self.data[start..start + self.channels]
    }

    #[inline]
    pub fn cell_mut(&mut self, x: usize, y: usize) -> &mut [f32] {
        let start = self.offset(x, y);
        let channels = self.channels;
        &mut self.data[start..start + channels]
    }

    /// One row of cells, `w * channels` values.
    #[inline]
    pub fn row(&self, y: usize) -> &[f32] {
        let len = self.w * self.channels;
        &self.data[y * len..(y + 1) * len]
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let len = self.w * self.channels;
        &mut self.data[y * len..(y + 1) * len]
    }

    /// Copy with `pad_x` zero cells left and right and `pad_y` above and below.
    pub fn padded(&self, pad_x: usize, pad_y: usize) -> Self {
        if pad_x == 0 && pad_y == 0 {
            return self.clone();
        }
        let mut out = Self::new(self.w + 2 * pad_x, self.h + 2 * pad_y, self.channels);
        let start = pad_x * self.channels;
        let len = self.w * self.channels;
        for y in 0..self.h {
            out.row_mut(y + pad_y)[start..start + len].copy_from_slice(self.row(y));
        }
        out
    }

    /// Mean over all cells and channels (0 for an empty array).
    pub fn mean(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.data.iter().map(|&v| v as f64).sum();
        (sum / self.data.len() as f64) as f32
    }
}

/// Capability set every feature family provides.
///
/// `extract` must be pure: the same image always yields a bit-identical
/// array, and its spatial size must equal `output_dims(image.w, image.h)`.
pub trait FeatureExtractor: Send + Sync {
    /// Pixels aggregated per cell along each axis (>= 1, constant).
    fn binsize(&self) -> usize;

    /// Channel depth of every produced array.
    fn channels(&self) -> usize;

    /// `(width, height)` in cells of the array produced for a `w × h` image.
    fn output_dims(&self, width: usize, height: usize) -> (usize, usize);

    fn extract(&self, image: &ImageF32) -> FeatureArray;

    /// Cells trimmed from each image border; output cell `(0, 0)` covers
    /// pixels starting at `border_cells() * binsize()`.
    fn border_cells(&self) -> usize {
        0
    }

    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;
}

/// Feature family selection, as read from configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum FeatureKind {
    /// Raw intensities, one channel, no binning.
    Intensity,
    /// 31-channel histogram of oriented gradients.
    Hog {
        #[serde(default = "default_hog_binsize")]
        binsize: usize,
    },
}

fn default_hog_binsize() -> usize {
    hog::DEFAULT_BINSIZE
}

impl Default for FeatureKind {
    fn default() -> Self {
        FeatureKind::Hog {
            binsize: hog::DEFAULT_BINSIZE,
        }
    }
}

impl FeatureKind {
    pub fn build(self) -> Result<Box<dyn FeatureExtractor>> {
        match self {
            FeatureKind::Intensity => Ok(Box::new(IntensityFeatures)),
            FeatureKind::Hog { binsize } => Ok(Box::new(HogFeatures::new(binsize)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_array_keeps_interior() {
        let arr = FeatureArray::from_vec(2, 1, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let pad = arr.padded(1, 1);
        assert_eq!(pad.dims(), (4, 3));
        assert_eq!(pad.cell(1, 1), &[1.0, 2.0]);
        assert_eq!(pad.cell(2, 1), &[3.0, 4.0]);
        assert_eq!(pad.cell(0, 0), &[0.0, 0.0]);
        assert_eq!(pad.cell(3, 2), &[0.0, 0.0]);
    }

    #[test]
    fn from_vec_checks_length() {
        assert!(FeatureArray::from_vec(2, 2, 3, vec![0.0; 11]).is_err());
        assert!(FeatureArray::from_vec(2, 2, 0, Vec::new()).is_err());
    }

    #[test]
    fn feature_kind_parses_tagged_json() {
        let kind: FeatureKind = serde_json::from_str(r#"{"family":"hog"}"#).unwrap();
        assert_eq!(kind, FeatureKind::Hog { binsize: 8 });
        let kind: FeatureKind = serde_json::from_str(r#"{"family":"intensity"}"#).unwrap();
        assert_eq!(kind, FeatureKind::Intensity);
        assert!(FeatureKind::Hog { binsize: 0 }.build().is_err());
    }
}
