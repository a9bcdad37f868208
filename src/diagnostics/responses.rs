use crate::convolve::ResponseGrid;
use crate::image::ImageView;
use crate::pyramid::LevelGeometry;
use serde::{Deserialize, Serialize};

/// Summary of one response map: size and strongest response.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMapReport {
    pub scale_index: usize,
    pub filter_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_name: Option<String>,
    pub width: usize,
    pub height: usize,
    pub max_value: f32,
    /// Map position of `max_value`.
    pub max_at: [usize; 2],
    /// Source-image pixel at the top-left of the best filter placement.
    pub max_at_image: [f32; 2],
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseStage {
    pub elapsed_ms: f64,
    pub nscales: usize,
    pub nfilters: usize,
    pub maps: Vec<ResponseMapReport>,
}

impl ResponseStage {
    /// `geometry[s]` maps level `s` back to the source image.
    pub fn from_grid(
        grid: &ResponseGrid,
        geometry: &[LevelGeometry],
        filter_names: &[Option<String>],
        elapsed_ms: f64,
    ) -> Self {
        let maps = grid
            .iter()
            .map(|(s, f, map)| {
                let (max_value, max_at) = argmax(map);
                let max_at_image = geometry
                    .get(s)
                    .map(|g| g.cell_to_image(max_at[0], max_at[1]))
                    .unwrap_or([max_at[0] as f32, max_at[1] as f32]);
                ResponseMapReport {
                    scale_index: s,
                    filter_index: f,
                    filter_name: filter_names.get(f).cloned().flatten(),
                    width: map.w,
                    height: map.h,
                    max_value,
                    max_at,
                    max_at_image,
                }
            })
            .collect();
        Self {
            elapsed_ms,
            nscales: grid.nscales(),
            nfilters: grid.nfilters(),
            maps,
        }
    }
}

/// First maximum in row-major order.
fn argmax<I: ImageView<Pixel = f32>>(map: &I) -> (f32, [usize; 2]) {
    let mut best = f32::NEG_INFINITY;
    let mut at = [0usize; 2];
    for y in 0..map.height() {
        for (x, &v) in map.row(y).iter().enumerate() {
            if v > best {
                best = v;
                at = [x, y];
            }
        }
    }
    (best, at)
}
