//! How each feature column of a mock ensemble is filled.
//!
//! | column   | state    | policy                                              |
//! |----------|----------|-----------------------------------------------------|
//! | redshift | observed | [`Constant`](ColumnPolicy::Constant)                |
//! | line     | observed | [`Perturbed`](ColumnPolicy::Perturbed) around the value |
//! | any      | missing  | [`Conditioned`](ColumnPolicy::Conditioned) on the reference prior |

use diagism_model::Feature;
use rand::Rng;
use rand_distr::Normal;

use crate::{conditioning::ColumnStats, generator::MockConfig};

/// State of one column of an input row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnValue {
    /// The user supplied this value.
    Observed(f64),
    /// Not supplied; described by a reference prior instead.
    Missing(ColumnStats),
}

/// Sampling rule for one column of an ensemble.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnPolicy {
    /// Every mock carries the same value.
    Constant(f64),
    /// Gaussian noise around an observed value.
    Perturbed { center: f64, std: f64 },
    /// Draws from the reference prior, widened by the window half-width.
    Conditioned { mean: f64, std: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
#[display("cannot sample {feature}: N({mean}, {std}) is not a valid distribution")]
pub struct InvalidSpreadError {
    #[error(not(source))]
    pub feature: Feature,
    pub mean: f64,
    pub std: f64,
}

impl ColumnPolicy {
    /// Picks the sampling rule for `feature`.
    ///
    /// # Examples
    ///
    /// ```
    /// use diagism_mock::{generator::MockConfig, policy::{ColumnPolicy, ColumnValue}};
    /// use diagism_model::Feature;
    ///
    /// let config = MockConfig::default();
    /// assert_eq!(
    ///     ColumnPolicy::decide(Feature::LogOnePlusZ, ColumnValue::Observed(0.2), &config),
    ///     ColumnPolicy::Constant(0.2)
    /// );
    /// assert_eq!(
    ///     ColumnPolicy::decide(Feature::CII158, ColumnValue::Observed(6.0), &config),
    ///     ColumnPolicy::Perturbed { center: 6.0, std: 0.01 }
    /// );
    /// ```
    #[must_use]
    pub fn decide(feature: Feature, value: ColumnValue, config: &MockConfig) -> Self {
        match value {
            ColumnValue::Observed(x) if feature.is_redshift() => Self::Constant(x),
            ColumnValue::Observed(x) => Self::Perturbed {
                center: x,
                std: config.observed_noise(),
            },
            ColumnValue::Missing(prior) => Self::Conditioned {
                mean: prior.mean,
                std: prior.std.hypot(config.sigma),
            },
        }
    }

    /// Fills `column` with draws following this policy.
    pub fn fill<R>(
        self,
        feature: Feature,
        rng: &mut R,
        column: &mut [f64],
    ) -> Result<(), InvalidSpreadError>
    where
        R: Rng + ?Sized,
    {
        let (mean, std) = match self {
            Self::Constant(x) => {
                column.fill(x);
                return Ok(());
            }
            Self::Perturbed { center, std } => (center, std),
            Self::Conditioned { mean, std } => (mean, std),
        };
        let normal = Normal::new(mean, std)
            .ok()
            .filter(|_| mean.is_finite() && std.is_finite())
            .ok_or(InvalidSpreadError { feature, mean, std })?;
        for value in column {
            *value = rng.sample(normal);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_decision_table() {
        let prior = ColumnStats { mean: 5.0, std: 3.0 };
        let config = MockConfig {
            sigma: 4.0,
            ..MockConfig::default()
        };
        assert_eq!(
            ColumnPolicy::decide(Feature::OI63, ColumnValue::Missing(prior), &config),
            ColumnPolicy::Conditioned {
                mean: 5.0,
                std: 5.0
            }
        );
        assert_eq!(
            ColumnPolicy::decide(Feature::LogOnePlusZ, ColumnValue::Missing(prior), &config),
            ColumnPolicy::Conditioned {
                mean: 5.0,
                std: 5.0
            }
        );
        assert_eq!(
            ColumnPolicy::decide(Feature::OI63, ColumnValue::Observed(6.0), &config),
            ColumnPolicy::Perturbed {
                center: 6.0,
                std: 0.01
            }
        );

        let systematic = MockConfig {
            systematic: true,
            ..config
        };
        assert_eq!(
            ColumnPolicy::decide(Feature::OI63, ColumnValue::Observed(6.0), &systematic),
            ColumnPolicy::Perturbed {
                center: 6.0,
                std: 4.0
            }
        );
        // systematic errors never touch an observed redshift
        assert_eq!(
            ColumnPolicy::decide(Feature::LogOnePlusZ, ColumnValue::Observed(0.1), &systematic),
            ColumnPolicy::Constant(0.1)
        );
    }

    #[test]
    fn test_fill() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut column = vec![0.0; 500];

        ColumnPolicy::Constant(0.25)
            .fill(Feature::LogOnePlusZ, &mut rng, &mut column)
            .unwrap();
        assert!(column.iter().all(|v| *v == 0.25));

        ColumnPolicy::Perturbed {
            center: 6.0,
            std: 0.01,
        }
        .fill(Feature::CII158, &mut rng, &mut column)
        .unwrap();
        assert!(column.iter().all(|v| (v - 6.0).abs() < 0.1));
        assert!(column.iter().any(|v| *v != 6.0));
    }

    #[test]
    fn test_fill_rejects_invalid_spread() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut column = vec![0.0; 4];
        let err = ColumnPolicy::Conditioned {
            mean: f64::NAN,
            std: 1.0,
        }
        .fill(Feature::OI63, &mut rng, &mut column)
        .unwrap_err();
        assert_eq!(err.feature, Feature::OI63);

        assert!(
            ColumnPolicy::Conditioned {
                mean: 1.0,
                std: -1.0
            }
            .fill(Feature::OI63, &mut rng, &mut column)
            .is_err()
        );
    }
}
