//! Mapping from feature / response coordinates back to source-image pixels.
//!
//! Downstream peak extraction works on response maps; every map position
//! is the top-left cell of a filter placement inside one pyramid level.
//! [`LevelGeometry`] converts that cell back into full-resolution pixels,
//! accounting for bin size, cells trimmed by the feature family and any
//! configured padding.

/// Geometry of one pyramid level relative to the source image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelGeometry {
    pub scale: f32,
    pub binsize: usize,
    /// Cells the feature family trims from each border.
    pub border_cells: usize,
    pub pad_x: usize,
    pub pad_y: usize,
}

impl LevelGeometry {
    /// Source-image pixel at the top-left corner of cell `(x, y)`.
    pub fn cell_to_image(&self, x: usize, y: usize) -> [f32; 2] {
        let b = self.binsize as f32;
        let border = self.border_cells as f32;
        let cx = x as f32 - self.pad_x as f32 + border;
        let cy = y as f32 - self.pad_y as f32 + border;
        [cx * b / self.scale, cy * b / self.scale]
    }

    /// Source-image extent `(width, height)` covered by `cells_w × cells_h` cells.
    pub fn extent_in_image(&self, cells_w: usize, cells_h: usize) -> [f32; 2] {
        let b = self.binsize as f32;
        [
            cells_w as f32 * b / self.scale,
            cells_h as f32 * b / self.scale,
        ]
    }
}
