#![allow(dead_code)]

use feature_pyramid::image::ImageF32;

/// Generates a simple high-contrast checkerboard image.
pub fn checkerboard_u8(width: usize, height: usize, cell: usize) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");

    let mut img = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let cx = (x / cell) as i32;
            let cy = (y / cell) as i32;
            let sum = cx + cy;
            let val = if sum & 1 == 0 { 32u8 } else { 220u8 };
            img[y * width + x] = val;
        }
    }
    img
}

/// Smooth, non-repeating texture in `[0, 1]`.
pub fn ripple_f32(width: usize, height: usize) -> ImageF32 {
    ImageF32::from_fn(width, height, |x, y| {
        let (fx, fy) = (x as f32, y as f32);
        0.5 + 0.25 * (0.21 * fx).sin() * (0.13 * fy).cos() + 0.002 * (fx - fy)
    })
}

/// Bright square of side `size` at `(x0, y0)` on a dark background.
pub fn square_f32(width: usize, height: usize, x0: usize, y0: usize, size: usize) -> ImageF32 {
    ImageF32::from_fn(width, height, |x, y| {
        let inside = (x0..x0 + size).contains(&x) && (y0..y0 + size).contains(&y);
        if inside {
            0.9
        } else {
            0.1
        }
    })
}
