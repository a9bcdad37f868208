//! Parameters configuring the pipeline stages.
//!
//! Everything is serde-deserializable with per-field defaults, so a JSON
//! config only needs to name what differs from the defaults:
//!
//! ```json
//! { "pyramid": { "interval": 10, "min_scale": 0.1 },
//!   "features": { "family": "hog", "binsize": 4 },
//!   "padding": { "x": 2, "y": 2 } }
//! ```

use crate::features::FeatureKind;
use crate::pyramid::{Padding, PyramidOptions};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    /// Scale schedule and resampling.
    pub pyramid: PyramidOptions,
    /// Feature family computed at every level.
    pub features: FeatureKind,
    /// Zero cells added around every feature array.
    pub padding: Padding,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_example_parses() {
        let json = r#"{ "pyramid": { "interval": 10, "min_scale": 0.1 },
            "features": { "family": "hog", "binsize": 4 },
            "padding": { "x": 2, "y": 2 } }"#;
        let params: PipelineParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.pyramid.interval, 10);
        assert_eq!(params.features, FeatureKind::Hog { binsize: 4 });
        assert_eq!(params.padding, Padding::new(2, 2));
    }

    #[test]
    fn empty_object_is_default() {
        let params: PipelineParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, PipelineParams::default());
    }
}
