//! Per-row conditioning of the reference table.
//!
//! For an input row, the conditioning window keeps the reference rows whose
//! value in every observed emission-line column lies within
//! `[observed - sigma, observed + sigma]` (both bounds inclusive). Redshift never
//! constrains the window. The kept rows describe what the unobserved columns
//! of a galaxy like this one tend to look like.
//!
//! When the window leaves too few rows to describe a column, the column falls
//! back to a degenerate prior built from the row's own observed luminosities.

use diagism_model::{Feature, FeatureValues};
use diagism_stats::descriptive::DescriptiveStats;

use crate::reference::ReferenceTable;

/// Lower bound on the spread of a fallback prior.
pub const FALLBACK_MIN_STD: f64 = 0.5;

/// Location and spread of one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub mean: f64,
    pub std: f64,
}

impl ColumnStats {
    /// Mean and sample standard deviation of the finite values.
    ///
    /// `None` when fewer than two finite values are available.
    #[must_use]
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let stats = DescriptiveStats::from_finite(values)?;
        Some(Self {
            mean: stats.mean,
            std: stats.sample_std_dev?,
        })
    }

    /// Degenerate prior from a row's own observed line luminosities.
    ///
    /// The mean is the average observed luminosity; the spread is their
    /// population standard deviation, floored at [`FALLBACK_MIN_STD`].
    /// `None` when no line is observed.
    #[must_use]
    pub fn fallback_for(row: &FeatureValues) -> Option<Self> {
        let stats = DescriptiveStats::new(row.observed_lines().map(|(_, v)| v))?;
        Some(Self {
            mean: stats.mean,
            std: stats.std_dev.max(FALLBACK_MIN_STD),
        })
    }
}

/// Reference statistics for one input row.
#[derive(Debug, Clone)]
pub struct ConditionedStats {
    matched_rows: usize,
    columns: [Option<ColumnStats>; Feature::LEN],
}

impl ConditionedStats {
    /// Applies the conditioning window of `row` to `reference`.
    #[must_use]
    pub fn compute(row: &FeatureValues, reference: &ReferenceTable, sigma: f64) -> Self {
        let observed = row.observed_lines().collect::<Vec<_>>();
        let matched = reference
            .rows()
            .iter()
            .filter(|candidate| {
                observed.iter().all(|&(feature, value)| {
                    let c = candidate[feature];
                    c >= value - sigma && c <= value + sigma
                })
            })
            .collect::<Vec<_>>();
        let columns = Feature::ALL
            .map(|feature| ColumnStats::from_values(matched.iter().map(|r| r[feature])));
        Self {
            matched_rows: matched.len(),
            columns,
        }
    }

    /// Number of reference rows inside the window.
    #[must_use]
    pub fn matched_rows(&self) -> usize {
        self.matched_rows
    }

    /// Statistics of `feature` over the window, if defined.
    #[must_use]
    pub fn column(&self, feature: Feature) -> Option<ColumnStats> {
        self.columns[feature.index()]
    }
}
