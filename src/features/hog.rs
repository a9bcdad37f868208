//! Histogram-of-oriented-gradients features (31 channels per cell).
//!
//! - Gradients by central differences over the visible region
//!   (`cells * binsize` pixels), clamped one pixel inside the image.
//! - Orientation snapped to 18 directions over `[0, 2π)`; the magnitude is
//!   voted bilinearly into the four neighbouring cells.
//! - Each cell is normalised by the energies of the four 2×2 blocks that
//!   contain it, truncated at 0.2, and summarised as:
//!   - 18 contrast-sensitive orientation channels,
//!   - 9 contrast-insensitive channels (opposite directions folded),
//!   - 4 texture channels (sum over orientations per normaliser).
//!
//! Block normalisation consumes the outer ring of cells, so an image with
//! `round(w / binsize)` cells across produces two fewer output cells.
//!
//! Complexity: O(W·H) for voting plus O(cells · 31) for normalisation.
use super::{FeatureArray, FeatureExtractor};
use crate::error::{PyramidError, Result};
use crate::image::ImageF32;

pub const DEFAULT_BINSIZE: usize = 8;
pub const HOG_CHANNELS: usize = 31;

const ORIENTATIONS: usize = 18;
const HALF_ORIENTATIONS: usize = ORIENTATIONS / 2;
const TRUNCATION: f32 = 0.2;
const NORM_EPS: f32 = 1e-4;
// 1 / sqrt(18), scales the texture channels.
const TEXTURE_GAIN: f32 = 0.2357;

// Unit vectors of the 9 half-plane orientations, 20° apart.
const UU: [f32; HALF_ORIENTATIONS] = [
    1.0000, 0.9397, 0.7660, 0.5000, 0.1736, -0.1736, -0.5000, -0.7660, -0.9397,
];
const VV: [f32; HALF_ORIENTATIONS] = [
    0.0000, 0.3420, 0.6428, 0.8660, 0.9848, 0.9848, 0.8660, 0.6428, 0.3420,
];

#[derive(Clone, Copy, Debug)]
pub struct HogFeatures {
    binsize: usize,
}

impl Default for HogFeatures {
    fn default() -> Self {
        Self {
            binsize: DEFAULT_BINSIZE,
        }
    }
}

impl HogFeatures {
    pub fn new(binsize: usize) -> Result<Self> {
        if binsize == 0 {
            return Err(PyramidError::InvalidConfig {
                reason: "hog binsize must be >= 1".to_string(),
            });
        }
        Ok(Self { binsize })
    }

    /// Histogram cells covering a `width × height` image.
    pub fn cells(&self, width: usize, height: usize) -> (usize, usize) {
        let s = self.binsize as f32;
        (
            (width as f32 / s).round() as usize,
            (height as f32 / s).round() as usize,
        )
    }

    /// Oriented gradient histogram, `cells_w * cells_h * 18` values.
    fn histogram(&self, image: &ImageF32, cells_w: usize, cells_h: usize) -> Vec<f32> {
        let sbin = self.binsize;
        let mut hist = vec![0.0f32; cells_w * cells_h * ORIENTATIONS];
        let visible_w = cells_w * sbin;
        let visible_h = cells_h * sbin;
        let max_x = image.w - 2;
        let max_y = image.h - 2;

        let mut vote = |cx: isize, cy: isize, o: usize, v: f32| {
            if cx >= 0 && cy >= 0 && (cx as usize) < cells_w && (cy as usize) < cells_h {
                hist[(cy as usize * cells_w + cx as usize) * ORIENTATIONS + o] += v;
            }
        };

        for y in 1..visible_h - 1 {
            let yc = y.min(max_y);
            for x in 1..visible_w - 1 {
                let xc = x.min(max_x);
                let dx = image.get(xc + 1, yc) - image.get(xc - 1, yc);
                let dy = image.get(xc, yc + 1) - image.get(xc, yc - 1);

                let mut best_dot = 0.0f32;
                let mut best_o = 0usize;
                for o in 0..HALF_ORIENTATIONS {
                    let dot = UU[o] * dx + VV[o] * dy;
                    if dot > best_dot {
                        best_dot = dot;
                        best_o = o;
                    } else if -dot > best_dot {
                        best_dot = -dot;
                        best_o = o + HALF_ORIENTATIONS;
                    }
                }
                let v = (dx * dx + dy * dy).sqrt();

                let xp = (x as f32 + 0.5) / sbin as f32 - 0.5;
                let yp = (y as f32 + 0.5) / sbin as f32 - 0.5;
                let ixp = xp.floor();
                let iyp = yp.floor();
                let vx0 = xp - ixp;
                let vy0 = yp - iyp;
                let vx1 = 1.0 - vx0;
                let vy1 = 1.0 - vy0;
                let (ix, iy) = (ixp as isize, iyp as isize);

                vote(ix, iy, best_o, vx1 * vy1 * v);
                vote(ix + 1, iy, best_o, vx0 * vy1 * v);
                vote(ix, iy + 1, best_o, vx1 * vy0 * v);
                vote(ix + 1, iy + 1, best_o, vx0 * vy0 * v);
            }
        }
        hist
    }
}

impl FeatureExtractor for HogFeatures {
    fn binsize(&self) -> usize {
        self.binsize
    }

    fn channels(&self) -> usize {
        HOG_CHANNELS
    }

    fn output_dims(&self, width: usize, height: usize) -> (usize, usize) {
        let (cw, ch) = self.cells(width, height);
        (cw.saturating_sub(2), ch.saturating_sub(2))
    }

    fn extract(&self, image: &ImageF32) -> FeatureArray {
        let (cells_w, cells_h) = self.cells(image.w, image.h);
        let (out_w, out_h) = self.output_dims(image.w, image.h);
        let mut out = FeatureArray::new(out_w, out_h, HOG_CHANNELS);
        if out_w == 0 || out_h == 0 {
            return out;
        }

        let hist = self.histogram(image, cells_w, cells_h);
        let energy: Vec<f32> = hist
            .chunks_exact(ORIENTATIONS)
            .map(|h| {
                (0..HALF_ORIENTATIONS)
                    .map(|o| {
                        let folded = h[o] + h[o + HALF_ORIENTATIONS];
                        folded * folded
                    })
                    .sum()
            })
            .collect();
        let e = |x: usize, y: usize| energy[y * cells_w + x];
        let block = |x: usize, y: usize| {
            1.0 / (e(x, y) + e(x + 1, y) + e(x, y + 1) + e(x + 1, y + 1) + NORM_EPS).sqrt()
        };

        for y in 0..out_h {
            for x in 0..out_w {
                let norms = [
                    block(x + 1, y + 1),
                    block(x + 1, y),
                    block(x, y + 1),
                    block(x, y),
                ];
                let src_start = ((y + 1) * cells_w + x + 1) * ORIENTATIONS;
                let src = &hist[src_start..src_start + ORIENTATIONS];
                let dst = out.cell_mut(x, y);
                let mut texture = [0.0f32; 4];

                for o in 0..ORIENTATIONS {
                    let mut sum = 0.0f32;
                    for (n, t) in norms.iter().zip(texture.iter_mut()) {
                        let h = (src[o] * n).min(TRUNCATION);
                        sum += h;
                        *t += h;
                    }
                    dst[o] = 0.5 * sum;
                }

                for o in 0..HALF_ORIENTATIONS {
                    let folded = src[o] + src[o + HALF_ORIENTATIONS];
                    let sum: f32 = norms.iter().map(|n| (folded * n).min(TRUNCATION)).sum();
                    dst[ORIENTATIONS + o] = 0.5 * sum;
                }

                for (k, t) in texture.iter().enumerate() {
                    dst[ORIENTATIONS + HALF_ORIENTATIONS + k] = TEXTURE_GAIN * t;
                }
            }
        }
        out
    }

    fn border_cells(&self) -> usize {
        1
    }

    fn name(&self) -> &'static str {
        "hog"
    }
}
