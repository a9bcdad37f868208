use crate::error::{PyramidError, Result};

use serde::{Deserialize, Serialize};

/// What the planner does with levels too small for the feature family.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmallLevelPolicy {
    /// Truncate the plan before the first degenerate level.
    #[default]
    Drop,
    /// Fail with `UnsupportedScale` at the first degenerate level.
    Reject,
}

/// Options controlling the scale schedule and level resampling.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PyramidOptions {
    /// Levels per octave (>= 1); consecutive scales differ by `2^(-1/interval)`.
    pub interval: usize,
    /// Scale of level 0. Values above 1 upsample the input.
    pub max_scale: f32,
    /// Smallest scale in the schedule, `0 < min_scale <= max_scale`.
    pub min_scale: f32,
    /// Optional cap on the number of levels.
    pub max_levels: Option<usize>,
    /// Minimum feature cells per side for a level to be kept.
    pub min_cells: usize,
    pub small_levels: SmallLevelPolicy,
    /// Smooth with the 5-tap Gaussian before every 2× decimation.
    pub blur_before_decimate: bool,
}

impl Default for PyramidOptions {
    fn default() -> Self {
        Self {
            interval: 5,
            max_scale: 1.0,
            min_scale: 1.0 / 16.0,
            max_levels: None,
            min_cells: 1,
            small_levels: SmallLevelPolicy::Drop,
            blur_before_decimate: true,
        }
    }
}

impl PyramidOptions {
    pub fn new(interval: usize, min_scale: f32) -> Self {
        Self {
            interval,
            min_scale,
            ..Default::default()
        }
    }

    pub fn with_max_scale(mut self, max_scale: f32) -> Self {
        self.max_scale = max_scale;
        self
    }

    pub fn with_max_levels(mut self, max_levels: Option<usize>) -> Self {
        self.max_levels = max_levels;
        self
    }

    pub fn with_min_cells(mut self, min_cells: usize) -> Self {
        self.min_cells = min_cells;
        self
    }

    pub fn with_small_levels(mut self, policy: SmallLevelPolicy) -> Self {
        self.small_levels = policy;
        self
    }

    pub fn with_blur(mut self, blur_before_decimate: bool) -> Self {
        self.blur_before_decimate = blur_before_decimate;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |reason: String| Err(PyramidError::InvalidConfig { reason });
        if self.interval == 0 {
            return fail("interval must be >= 1".to_string());
        }
        if !(self.max_scale.is_finite() && self.max_scale > 0.0) {
            return fail(format!("max_scale must be positive, got {}", self.max_scale));
        }
        if !(self.min_scale.is_finite() && self.min_scale > 0.0 && self.min_scale <= self.max_scale)
        {
            return fail(format!(
                "min_scale must lie in (0, max_scale={}], got {}",
                self.max_scale, self.min_scale
            ));
        }
        if self.max_levels == Some(0) {
            return fail("max_levels must be >= 1 when set".to_string());
        }
        if self.min_cells == 0 {
            return fail("min_cells must be >= 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let opts: PyramidOptions =
            serde_json::from_str(r#"{"interval": 2, "small_levels": "reject"}"#).unwrap();
        assert_eq!(opts.interval, 2);
        assert_eq!(opts.small_levels, SmallLevelPolicy::Reject);
        assert_eq!(opts.max_scale, 1.0);
        assert!(opts.blur_before_decimate);
    }

    #[test]
    fn validate_rejects_inverted_scale_range() {
        let opts = PyramidOptions::new(1, 2.0);
        assert!(matches!(
            opts.validate(),
            Err(PyramidError::InvalidConfig { .. })
        ));
        assert!(PyramidOptions::new(0, 0.5).validate().is_err());
        assert!(PyramidOptions::new(3, 0.25).validate().is_ok());
    }
}
