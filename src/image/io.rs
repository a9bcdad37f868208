//! File helpers for the demo tool: decode an input image, write response
//! maps as PNG and reports as JSON. Errors are contextual `String`s.
use super::{ImageF32, ImageU8};
use crate::convolve::ResponseGrid;
use image::{GrayImage, Luma};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Decode any supported format, convert to luma and scale to `[0, 1]`.
pub fn load_grayscale_f32(path: &Path) -> Result<ImageF32, String> {
    let luma = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma8();
    let (w, h) = (luma.width() as usize, luma.height() as usize);
    Ok(ImageF32::from_u8(&ImageU8::packed(w, h, luma.as_raw())))
}

/// Write `map` as an 8-bit PNG with `[min, max]` stretched to `[0, 255]`.
/// A constant map is written black.
pub fn save_response_png(map: &ImageF32, path: &Path) -> Result<(), String> {
    let (lo, hi) = map
        .min_max()
        .ok_or_else(|| format!("Refusing to save empty map to {}", path.display()))?;
    let gain = if hi - lo > f32::EPSILON {
        255.0 / (hi - lo)
    } else {
        0.0
    };
    let out = GrayImage::from_fn(map.w as u32, map.h as u32, |x, y| {
        let v = (map.get(x as usize, y as usize) - lo) * gain;
        Luma([v.round().clamp(0.0, 255.0) as u8])
    });
    ensure_parent_dir(path)?;
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Save every map of `grid` under `dir` as `response_sSS_fFF.png`.
pub fn save_response_maps(grid: &ResponseGrid, dir: &Path) -> Result<Vec<PathBuf>, String> {
    grid.iter()
        .map(|(s, f, map)| {
            let path = dir.join(format!("response_s{s:02}_f{f:02}.png"));
            save_response_png(map, &path).map(|()| path)
        })
        .collect()
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {}: {e}", parent.display())),
        _ => Ok(()),
    }
}
