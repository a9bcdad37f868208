use super::traits::ImageView;
use crate::error::{PyramidError, Result};

/// Borrowed 8-bit grayscale view, as handed over by image decoders and
/// camera buffers. Converted to [`ImageF32`](super::ImageF32) on entry.
#[derive(Clone, Copy, Debug)]
pub struct ImageU8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize, // bytes between rows
    pub data: &'a [u8],
}

impl<'a> ImageU8<'a> {
    /// View over tightly packed rows (`stride == w`).
    pub fn packed(w: usize, h: usize, data: &'a [u8]) -> Self {
        Self {
            w,
            h,
            stride: w,
            data,
        }
    }

    /// Fails with `InvalidImage` for a zero-area view or a buffer that
    /// does not reach the last pixel of the last row.
    pub fn validate(&self) -> Result<()> {
        let reason = if self.w == 0 || self.h == 0 {
            format!("zero-area view {}x{}", self.w, self.h)
        } else if self.stride < self.w {
            format!("stride {} smaller than width {}", self.stride, self.w)
        } else if self.data.len() < (self.h - 1) * self.stride + self.w {
            format!(
                "{}x{} view with stride {} over {} bytes",
                self.w,
                self.h,
                self.stride,
                self.data.len()
            )
        } else {
            return Ok(());
        };
        Err(PyramidError::InvalidImage { reason })
    }
}

impl ImageView for ImageU8<'_> {
    type Pixel = u8;

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
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}
