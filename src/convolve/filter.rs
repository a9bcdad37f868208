use crate::error::{PyramidError, Result};
use crate::features::FeatureArray;

/// Scoring kernel: `height × width × channels` weights, channel index fastest.
#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    name: Option<String>,
    weights: FeatureArray,
}

impl Filter {
    /// Filter from channel-interleaved weights (the feature array layout).
    pub fn new(width: usize, height: usize, channels: usize, data: Vec<f32>) -> Result<Self> {
        check_shape(width, height, channels, data.len())?;
        if let Some(i) = data.iter().position(|v| !v.is_finite()) {
            return Err(PyramidError::InvalidFilter {
                reason: format!("weight {i} is not finite"),
            });
        }
        Ok(Self {
            name: None,
            weights: FeatureArray {
                w: width,
                h: height,
                channels,
                data,
            },
        })
    }

    /// Filter from channel-major weights: `channels` planes of `height × width`.
    pub fn from_planar(width: usize, height: usize, channels: usize, planes: &[f32]) -> Result<Self> {
        check_shape(width, height, channels, planes.len())?;
        let plane = width * height;
        let mut data = vec![0.0f32; planes.len()];
        for (c, src) in planes.chunks_exact(plane).enumerate() {
            for (i, &v) in src.iter().enumerate() {
                data[i * channels + c] = v;
            }
        }
        Self::new(width, height, channels, data)
    }

    /// Reuse a feature array as weights, e.g. an exemplar patch.
    pub fn from_features(weights: FeatureArray) -> Result<Self> {
        let FeatureArray {
            w,
            h,
            channels,
            data,
        } = weights;
        Self::new(w, h, channels, data)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn width(&self) -> usize {
        self.weights.w
    }

    pub fn height(&self) -> usize {
        self.weights.h
    }

    pub fn channels(&self) -> usize {
        self.weights.channels
    }

    /// `(width, height)` in cells.
    pub fn dims(&self) -> (usize, usize) {
        self.weights.dims()
    }

    pub fn weights(&self) -> &FeatureArray {
        &self.weights
    }
}

fn check_shape(width: usize, height: usize, channels: usize, len: usize) -> Result<()> {
    if width == 0 || height == 0 || channels == 0 {
        return Err(PyramidError::InvalidFilter {
            reason: format!("empty filter shape {width}x{height}x{channels}"),
        });
    }
    if len != width * height * channels {
        return Err(PyramidError::InvalidFilter {
            reason: format!("{len} weights for a {width}x{height}x{channels} filter"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planar_weights_are_interleaved() {
        // Two 2x1 planes: c0 = [1, 2], c1 = [10, 20].
        let f = Filter::from_planar(2, 1, 2, &[1.0, 2.0, 10.0, 20.0]).unwrap();
        assert_eq!(f.weights().data, vec![1.0, 10.0, 2.0, 20.0]);
        assert_eq!(f.dims(), (2, 1));
    }

    #[test]
    fn malformed_filters_are_rejected() {
        assert!(matches!(
            Filter::new(0, 3, 1, Vec::new()),
            Err(PyramidError::InvalidFilter { .. })
        ));
        assert!(Filter::new(2, 2, 1, vec![0.0; 3]).is_err());
        assert!(Filter::new(1, 1, 1, vec![f32::NAN]).is_err());
    }

    #[test]
    fn name_is_optional() {
        let f = Filter::new(1, 1, 1, vec![1.0]).unwrap();
        assert_eq!(f.name(), None);
        assert_eq!(f.with_name("head").name(), Some("head"));
    }
}
