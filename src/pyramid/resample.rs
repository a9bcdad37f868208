//! Level resampling: bilinear resize for the first octave, smoothed 2×
//! decimation for every following one.
//!
//! Border samples clamp to the image extents. Decimation keeps every other
//! pixel starting at 0, so a `w × h` level becomes `ceil(w/2) × ceil(h/2)`.
use crate::image::{ImageF32, ImageView, ImageViewMut};

/// Binomial `[1, 4, 6, 4, 1] / 16` kernel applied along both axes before
/// decimation.
pub const GAUSSIAN_5TAP: [f32; 5] = [0.0625, 0.25, 0.375, 0.25, 0.0625];

/// Bilinear resize to `dst_w × dst_h` with pixel-centre alignment.
pub fn resize_bilinear(src: &ImageF32, dst_w: usize, dst_h: usize) -> ImageF32 {
    let mut dst = ImageF32::new(dst_w, dst_h);
    if src.w == 0 || src.h == 0 || dst_w == 0 || dst_h == 0 {
        return dst;
    }
    let fx = src.w as f32 / dst_w as f32;
    let fy = src.h as f32 / dst_h as f32;

    // Column taps are identical for every row.
    let cols: Vec<(usize, usize, f32)> = (0..dst_w).map(|x| lerp_taps(x, fx, src.w)).collect();

    for y in 0..dst_h {
        let (y0, y1, ty) = lerp_taps(y, fy, src.h);
        let (row0, row1) = (src.row(y0), src.row(y1));
        for (dst_px, &(x0, x1, tx)) in dst.row_mut(y).iter_mut().zip(&cols) {
            let top = row0[x0] + (row0[x1] - row0[x0]) * tx;
            let bottom = row1[x0] + (row1[x1] - row1[x0]) * tx;
            *dst_px = top + (bottom - top) * ty;
        }
    }
    dst
}

/// Source neighbours and weight of the second one for output sample `i`.
fn lerp_taps(i: usize, factor: f32, len: usize) -> (usize, usize, f32) {
    let s = ((i as f32 + 0.5) * factor - 0.5).clamp(0.0, (len - 1) as f32);
    let i0 = s.floor() as usize;
    (i0, (i0 + 1).min(len - 1), s - i0 as f32)
}

/// Halve `src` in both axes, smoothing with [`GAUSSIAN_5TAP`] first when
/// `blur` is set.
pub fn decimate(src: &ImageF32, blur: bool) -> ImageF32 {
    let mut dst = ImageF32::new(src.w.div_ceil(2), src.h.div_ceil(2));
    if src.w == 0 || src.h == 0 {
        return dst;
    }
    if blur {
        decimate_smoothed(src, &mut dst, &GAUSSIAN_5TAP);
    } else {
        for y in 0..dst.h {
            let src_row = src.row(2 * y);
            for (x, dst_px) in dst.row_mut(y).iter_mut().enumerate() {
                *dst_px = src_row[2 * x];
            }
        }
    }
    dst
}

/// Separable smoothing fused with decimation: only rows and columns that
/// survive are filtered. One horizontally filtered row is cached per
/// vertical tap and reused while consecutive output rows share it.
fn decimate_smoothed(src: &ImageF32, dst: &mut ImageF32, taps: &[f32]) {
    let radius = (taps.len() / 2) as isize;
    let width = dst.w;
    let mut cache = vec![0.0f32; width * taps.len()];
    let mut cached_src_row: Vec<Option<usize>> = vec![None; taps.len()];

    for y in 0..dst.h {
        for (ky, slot) in cached_src_row.iter_mut().enumerate() {
            let sy = clamp_index(2 * y as isize + ky as isize - radius, src.h);
            if *slot != Some(sy) {
                let out = &mut cache[ky * width..(ky + 1) * width];
                smooth_row_every_other(src.row(sy), out, taps, radius);
                *slot = Some(sy);
            }
        }
        for (x, dst_px) in dst.row_mut(y).iter_mut().enumerate() {
            *dst_px = taps
                .iter()
                .enumerate()
                .map(|(ky, &tap)| tap * cache[ky * width + x])
                .sum();
        }
    }
}

fn smooth_row_every_other(row: &[f32], out: &mut [f32], taps: &[f32], radius: isize) {
    for (x, dst_px) in out.iter_mut().enumerate() {
        let centre = 2 * x as isize;
        *dst_px = taps
            .iter()
            .enumerate()
            .map(|(k, &tap)| tap * row[clamp_index(centre + k as isize - radius, row.len())])
            .sum();
    }
}

#[inline]
fn clamp_index(idx: isize, len: usize) -> usize {
    idx.clamp(0, len as isize - 1) as usize
}
