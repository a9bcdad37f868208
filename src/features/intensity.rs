//! Raw-intensity feature family: one channel, bin size 1.
use super::{FeatureArray, FeatureExtractor};
use crate::image::ImageF32;

#[derive(Clone, Copy, Debug, Default)]
pub struct IntensityFeatures;

impl FeatureExtractor for IntensityFeatures {
    fn binsize(&self) -> usize {
        1
    }

    fn channels(&self) -> usize {
        1
    }

    fn output_dims(&self, width: usize, height: usize) -> (usize, usize) {
        (width, height)
    }

    fn extract(&self, image: &ImageF32) -> FeatureArray {
        FeatureArray::from_image(image)
    }

    fn name(&self) -> &'static str {
        "intensity"
    }
}
