use super::planner::{LevelSource, ScalePlan};
use super::resample::{decimate, resize_bilinear};
use crate::error::{PyramidError, Result};
use crate::features::{FeatureArray, FeatureExtractor};
use crate::image::ImageF32;
use log::debug;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Zero cells added around every feature array, per side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    pub x: usize,
    pub y: usize,
}

impl Padding {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0 && self.y == 0
    }
}

/// Feature arrays index-aligned with the scales they were computed at.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeaturePyramid {
    scales: Vec<f32>,
    levels: Vec<FeatureArray>,
}

impl FeaturePyramid {
    /// Pair levels with scales; both must have the same length.
    pub fn from_parts(scales: Vec<f32>, levels: Vec<FeatureArray>) -> Result<Self> {
        if scales.len() != levels.len() {
            return Err(PyramidError::InvalidConfig {
                reason: format!(
                    "{} scales for {} feature levels",
                    scales.len(),
                    levels.len()
                ),
            });
        }
        Ok(Self { scales, levels })
    }

    pub fn nscales(&self) -> usize {
        self.levels.len()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn scales(&self) -> &[f32] {
        &self.scales
    }

    pub fn levels(&self) -> &[FeatureArray] {
        &self.levels
    }

    pub fn level(&self, index: usize) -> Option<&FeatureArray> {
        self.levels.get(index)
    }

    /// `(scale, features)` pairs, largest scale first.
    pub fn iter(&self) -> impl Iterator<Item = (f32, &FeatureArray)> {
        self.scales.iter().copied().zip(self.levels.iter())
    }

    pub fn into_parts(self) -> (Vec<f32>, Vec<FeatureArray>) {
        (self.scales, self.levels)
    }
}

impl AsRef<[FeatureArray]> for FeaturePyramid {
    fn as_ref(&self) -> &[FeatureArray] {
        &self.levels
    }
}

/// Resample `image` for every planned level, in plan order.
pub fn resample_levels(image: &ImageF32, plan: &ScalePlan) -> Vec<ImageF32> {
    let mut images: Vec<ImageF32> = Vec::with_capacity(plan.len());
    for level in &plan.levels {
        let resampled = match level.source {
            LevelSource::Source => image.to_contiguous(),
            LevelSource::Resize => resize_bilinear(image, level.width, level.height),
            LevelSource::Decimate { from } => decimate(&images[from], plan.blur_before_decimate),
        };
        debug_assert_eq!((resampled.w, resampled.h), (level.width, level.height));
        images.push(resampled);
    }
    images
}

/// Resample and extract features for every level of `plan`.
///
/// Extraction runs in parallel across levels with the `parallel` feature;
/// every level is independent, so the output does not depend on it.
pub fn build_pyramid(
    image: &ImageF32,
    plan: &ScalePlan,
    extractor: &dyn FeatureExtractor,
    padding: Padding,
) -> Result<FeaturePyramid> {
    image.validate()?;
    if (image.w, image.h) != (plan.image_width, plan.image_height) {
        return Err(PyramidError::InvalidImage {
            reason: format!(
                "image is {}x{} but the plan was made for {}x{}",
                image.w, image.h, plan.image_width, plan.image_height
            ),
        });
    }

    let images = resample_levels(image, plan);
    let extract = |img: &ImageF32| {
        let features = extractor.extract(img);
        if padding.is_zero() {
            features
        } else {
            features.padded(padding.x, padding.y)
        }
    };

    #[cfg(feature = "parallel")]
    let levels: Vec<FeatureArray> = images.par_iter().map(extract).collect();
    #[cfg(not(feature = "parallel"))]
    let levels: Vec<FeatureArray> = images.iter().map(extract).collect();

    for (k, (planned, features)) in plan.levels.iter().zip(&levels).enumerate() {
        debug!(
            "build_pyramid level {} scale {:.4}: {}x{} px -> {}x{}x{} {}",
            k,
            planned.scale,
            planned.width,
            planned.height,
            features.w,
            features.h,
            features.channels,
            extractor.name()
        );
    }

    Ok(FeaturePyramid {
        scales: plan.scales(),
        levels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::IntensityFeatures;
    use crate::pyramid::{PyramidOptions, ScalePlanner};

    #[test]
    fn padding_grows_every_level() {
        let planner = ScalePlanner::new(PyramidOptions::new(1, 0.5)).unwrap();
        let img = ImageF32::from_fn(20, 10, |x, _| x as f32);
        let plan = planner.plan(20, 10, &IntensityFeatures).unwrap();
        let pyr = build_pyramid(&img, &plan, &IntensityFeatures, Padding::new(2, 1)).unwrap();
        assert_eq!(pyr.levels()[0].dims(), (24, 12));
        assert_eq!(pyr.levels()[1].dims(), (14, 7));
        assert_eq!(pyr.levels()[0].get(2, 1, 0), 0.0);
        assert_eq!(pyr.levels()[0].get(5, 1, 0), 3.0);
    }

    #[test]
    fn plan_for_other_size_is_rejected() {
        let planner = ScalePlanner::new(PyramidOptions::new(1, 0.5)).unwrap();
        let plan = planner.plan(20, 10, &IntensityFeatures).unwrap();
        let img = ImageF32::new(21, 10);
        assert!(matches!(
            build_pyramid(&img, &plan, &IntensityFeatures, Padding::default()),
            Err(PyramidError::InvalidImage { .. })
        ));
    }

    #[test]
    fn from_parts_requires_alignment() {
        assert!(FeaturePyramid::from_parts(vec![1.0], Vec::new()).is_err());
        let pyr = FeaturePyramid::from_parts(vec![1.0], vec![FeatureArray::new(2, 2, 1)]).unwrap();
        assert_eq!(pyr.nscales(), 1);
    }
}
