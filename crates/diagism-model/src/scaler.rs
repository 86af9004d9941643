//! Robust (median / inter-quartile range) scalers fitted offline.
//!
//! A fitted robust scaler maps `x` to `(x - center) / scale`, where `center` is
//! the training median and `scale` the training inter-quartile range. Scales of
//! exactly zero are replaced by one, so constant training columns pass through
//! centred but unscaled.

use serde::{Deserialize, Serialize};

use crate::feature::{Feature, FeatureValues};

fn nonzero_scale(scale: f64) -> f64 {
    if scale == 0.0 { 1.0 } else { scale }
}

/// Per-feature robust scaler for the model inputs.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(from = "FeatureScalerRecord", into = "FeatureScalerRecord")]
pub struct FeatureScaler {
    center: [f64; Feature::LEN],
    scale: [f64; Feature::LEN],
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct FeatureScalerRecord {
    center: [f64; Feature::LEN],
    scale: [f64; Feature::LEN],
}

impl From<FeatureScalerRecord> for FeatureScaler {
    fn from(record: FeatureScalerRecord) -> Self {
        Self::new(record.center, record.scale)
    }
}

impl From<FeatureScaler> for FeatureScalerRecord {
    fn from(scaler: FeatureScaler) -> Self {
        Self {
            center: scaler.center,
            scale: scaler.scale,
        }
    }
}

impl FeatureScaler {
    #[must_use]
    pub fn new(center: [f64; Feature::LEN], scale: [f64; Feature::LEN]) -> Self {
        Self {
            center,
            scale: scale.map(nonzero_scale),
        }
    }

    /// A scaler that leaves values unchanged.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            center: [0.0; Feature::LEN],
            scale: [1.0; Feature::LEN],
        }
    }

    #[must_use]
    pub fn transform(&self, row: &FeatureValues) -> FeatureValues {
        let values = row.as_array();
        FeatureValues::from_fn(|i| (values[i] - self.center[i]) / self.scale[i])
    }

    #[must_use]
    pub fn inverse_transform(&self, row: &FeatureValues) -> FeatureValues {
        let values = row.as_array();
        FeatureValues::from_fn(|i| values[i] * self.scale[i] + self.center[i])
    }
}

/// Robust scaler for the single regression target.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(from = "TargetScalerRecord", into = "TargetScalerRecord")]
pub struct TargetScaler {
    center: f64,
    scale: f64,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
struct TargetScalerRecord {
    center: f64,
    scale: f64,
}

impl From<TargetScalerRecord> for TargetScaler {
    fn from(record: TargetScalerRecord) -> Self {
        Self::new(record.center, record.scale)
    }
}

impl From<TargetScaler> for TargetScalerRecord {
    fn from(scaler: TargetScaler) -> Self {
        Self {
            center: scaler.center,
            scale: scaler.scale,
        }
    }
}

impl TargetScaler {
    #[must_use]
    pub fn new(center: f64, scale: f64) -> Self {
        Self {
            center,
            scale: nonzero_scale(scale),
        }
    }

    #[must_use]
    pub const fn identity() -> Self {
        Self {
            center: 0.0,
            scale: 1.0,
        }
    }

    #[must_use]
    pub fn transform(&self, value: f64) -> f64 {
        (value - self.center) / self.scale
    }

    #[must_use]
    pub fn inverse_transform(&self, value: f64) -> f64 {
        value * self.scale + self.center
    }
}
