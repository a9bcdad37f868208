//! Owned single-channel f32 image in row-major layout.
//!
//! Input images, resampled pyramid levels and response maps all use this
//! type. Buffers created here are tightly packed (`stride == w`); images
//! handed in by callers may carry a larger stride and are validated before
//! use.
use super::traits::{ImageView, ImageViewMut};
use super::u8::ImageU8;
use crate::error::{PyramidError, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct ImageF32 {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Number of f32 elements between consecutive rows (>= `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<f32>,
}

impl ImageF32 {
    /// Construct a zero-initialized buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![0.0; w * h],
        }
    }

    /// Wrap a tightly packed buffer; fails when `data.len() != w * h`.
    pub fn from_vec(w: usize, h: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != w * h {
            return Err(PyramidError::InvalidImage {
                reason: format!("buffer holds {} samples, expected {}x{}", data.len(), w, h),
            });
        }
        Ok(Self {
            w,
            h,
            stride: w,
            data,
        })
    }

    /// Build an image by evaluating `f(x, y)` at every pixel.
    pub fn from_fn(w: usize, h: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut out = Self::new(w, h);
        for y in 0..h {
            for (x, px) in out.row_mut(y).iter_mut().enumerate() {
                *px = f(x, y);
            }
        }
        out
    }

    /// Convert an 8-bit grayscale view to `[0, 1]` floats.
    pub fn from_u8(gray: &ImageU8<'_>) -> Self {
        let mut out = Self::new(gray.w, gray.h);
        for y in 0..gray.h {
            let src = gray.row(y);
            let dst = out.row_mut(y);
            for (d, &s) in dst.iter_mut().zip(src) {
                *d = s as f32 / 255.0;
            }
        }
        out
    }

    #[inline]
    /// Convert (x, y) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }
    #[inline]
    /// Get the pixel value at (x, y).
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.idx(x, y)]
    }
    #[inline]
    /// Set the pixel value at (x, y).
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    /// Check the image is non-empty and its buffer covers every row.
    pub fn validate(&self) -> Result<()> {
        if self.w == 0 || self.h == 0 {
            return Err(PyramidError::InvalidImage {
                reason: format!("zero-area image {}x{}", self.w, self.h),
            });
        }
        if self.stride < self.w {
            return Err(PyramidError::InvalidImage {
                reason: format!("stride {} smaller than width {}", self.stride, self.w),
            });
        }
        let needed = (self.h - 1) * self.stride + self.w;
        if self.data.len() < needed {
            return Err(PyramidError::InvalidImage {
                reason: format!(
                    "buffer holds {} samples, {}x{} with stride {} needs {}",
                    self.data.len(),
                    self.w,
                    self.h,
                    self.stride,
                    needed
                ),
            });
        }
        Ok(())
    }

    /// Tightly packed copy (no-op clone when already contiguous).
    pub fn to_contiguous(&self) -> Self {
        if self.stride == self.w && self.data.len() == self.w * self.h {
            return self.clone();
        }
        let mut out = Self::new(self.w, self.h);
        for y in 0..self.h {
            out.row_mut(y).copy_from_slice(self.row(y));
        }
        out
    }

    /// Smallest and largest sample, `None` for an empty image.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        if self.w == 0 || self.h == 0 {
            return None;
        }
        let mut lo = f32::INFINITY;
        let mut hi = f32::NEG_INFINITY;
        for row in self.rows() {
            for &v in row {
                lo = lo.min(v);
                hi = hi.max(v);
            }
        }
        Some((lo, hi))
    }
}

impl ImageView for ImageF32 {
    type Pixel = f32;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[f32] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}

impl ImageViewMut for ImageF32 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let start = y * self.stride;
        let end = start + self.w;
        &mut self.data[start..end]
    }
}
