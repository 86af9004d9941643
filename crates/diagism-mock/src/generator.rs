//! Monte-Carlo mock ensembles.
//!
//! Every input row is expanded into `num_mocks` synthetic rows. Observed lines
//! are jittered, an observed redshift is copied through, and everything the
//! user did not supply is drawn from the reference population around galaxies
//! that look like this one (see [`conditioning`](crate::conditioning)).
//!
//! Each row gets its own generator, `Pcg32::new(seed, row_index)`, so the
//! ensemble of a row depends only on the row, its position and the seed.

use diagism_model::{Feature, FeatureValues};
use rand_pcg::Pcg32;

use crate::{
    conditioning::{ColumnStats, ConditionedStats},
    policy::{ColumnPolicy, ColumnValue, InvalidSpreadError},
    reference::ReferenceTable,
};

pub const DEFAULT_SIGMA: f64 = 0.2;
pub const DEFAULT_NUM_MOCKS: usize = 2000;
pub const DEFAULT_SEED: u64 = 42;
/// Spread of the jitter applied to observed lines without systematic errors.
pub const OBSERVED_NOISE_STD: f64 = 0.01;

/// Parameters of mock generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MockConfig {
    /// Half-width of the conditioning window, also the systematic uncertainty (dex).
    pub sigma: f64,
    /// Whether observed lines are perturbed by `sigma` instead of [`OBSERVED_NOISE_STD`].
    pub systematic: bool,
    pub num_mocks: usize,
    pub seed: u64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            sigma: DEFAULT_SIGMA,
            systematic: false,
            num_mocks: DEFAULT_NUM_MOCKS,
            seed: DEFAULT_SEED,
        }
    }
}

impl MockConfig {
    /// Spread of the perturbation of observed lines.
    #[must_use]
    pub fn observed_noise(&self) -> f64 {
        if self.systematic {
            self.sigma
        } else {
            OBSERVED_NOISE_STD
        }
    }

    pub fn validate(&self) -> Result<(), MockError> {
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(MockError::InvalidSigma { sigma: self.sigma });
        }
        if self.num_mocks == 0 {
            return Err(MockError::NoMocks);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum MockError {
    #[display("sigma must be a positive number, got {sigma}")]
    InvalidSigma {
        #[error(not(source))]
        sigma: f64,
    },
    #[display("the number of mocks must be positive")]
    NoMocks,
    #[display("row {row}: no emission line observed, nothing to condition on")]
    NoObservedLines {
        #[error(not(source))]
        row: usize,
    },
    #[display("row {row}: {source}")]
    InvalidSpread {
        row: usize,
        source: InvalidSpreadError,
    },
}

/// Synthetic feature rows derived from one input row.
#[derive(Debug, Clone, PartialEq)]
pub struct MockEnsemble {
    rows: Vec<FeatureValues>,
}

impl MockEnsemble {
    #[must_use]
    pub fn rows(&self) -> &[FeatureValues] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of one column.
    pub fn column(&self, feature: Feature) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(move |row| row[feature])
    }
}

/// Missing columns whose reference statistics were undefined and were
/// replaced by the row's own fallback prior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditioningFallback {
    /// Reference rows inside the conditioning window.
    pub matched_rows: usize,
    pub columns: Vec<Feature>,
}

/// Ensemble of one row, plus the fallback notice if one applied.
#[derive(Debug, Clone)]
pub struct RowMocks {
    pub ensemble: MockEnsemble,
    pub fallback: Option<ConditioningFallback>,
}

/// Generates one ensemble per input row.
///
/// Rows are numbered from 1 in errors.
pub fn generate_mocks(
    rows: &[FeatureValues],
    reference: &ReferenceTable,
    config: &MockConfig,
) -> Result<Vec<RowMocks>, MockError> {
    config.validate()?;
    rows.iter()
        .enumerate()
        .map(|(index, row)| generate_row_mocks(index, row, reference, config))
        .collect()
}

/// Generates the ensemble of the row at `index`.
pub fn generate_row_mocks(
    index: usize,
    row: &FeatureValues,
    reference: &ReferenceTable,
    config: &MockConfig,
) -> Result<RowMocks, MockError> {
    let row_number = index + 1;
    let conditioned = ConditionedStats::compute(row, reference, config.sigma);

    let mut fallback_columns = vec![];
    let mut policies = Vec::with_capacity(Feature::LEN);
    for feature in Feature::ALL {
        let value = match row.get(feature) {
            Some(x) => ColumnValue::Observed(x),
            None => {
                let prior = match conditioned.column(feature) {
                    Some(stats) => stats,
                    None => {
                        fallback_columns.push(feature);
                        ColumnStats::fallback_for(row)
                            .ok_or(MockError::NoObservedLines { row: row_number })?
                    }
                };
                ColumnValue::Missing(prior)
            }
        };
        policies.push((feature, ColumnPolicy::decide(feature, value, config)));
    }

    let mut rng = Pcg32::new(config.seed, index as u64);
    let mut columns = vec![vec![0.0; config.num_mocks]; Feature::LEN];
    for ((feature, policy), column) in policies.into_iter().zip(&mut columns) {
        policy
            .fill(feature, &mut rng, column)
            .map_err(|source| MockError::InvalidSpread {
                row: row_number,
                source,
            })?;
    }
    let rows = (0..config.num_mocks)
        .map(|i| FeatureValues::from_fn(|j| columns[j][i]))
        .collect();

    let fallback = (!fallback_columns.is_empty()).then(|| ConditioningFallback {
        matched_rows: conditioned.matched_rows(),
        columns: fallback_columns,
    });
    Ok(RowMocks {
        ensemble: MockEnsemble { rows },
        fallback,
    })
}
