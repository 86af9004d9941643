use crate::{descriptive::DescriptiveStats, percentiles::Percentiles};

/// Descriptive statistics and percentiles of one distribution, computed together.
///
/// Both parts share a single sort of the input, which matters when summarizing
/// thousands of Monte-Carlo samples per galaxy.
///
/// # Examples
///
/// ```
/// use diagism_stats::summary::DistributionSummary;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
/// let summary = DistributionSummary::new(values, &[16.0, 50.0, 84.0]).unwrap();
///
/// assert_eq!(summary.stats.mean, 5.5);
/// assert_eq!(summary.percentiles.get(50.0), Some(5.5));
/// ```
#[derive(Debug, Clone)]
pub struct DistributionSummary {
    /// Basic descriptive statistics for the dataset.
    pub stats: DescriptiveStats,
    /// Precomputed percentile values for quick lookup.
    pub percentiles: Percentiles,
}

impl DistributionSummary {
    /// Computes the summary from unsorted values.
    ///
    /// # Returns
    ///
    /// * `Some(DistributionSummary)` - if the dataset contains at least one value
    /// * `None` - if the dataset is empty
    #[must_use]
    pub fn new<I>(values: I, percentile_points: &[f64]) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values.into_iter().collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, percentile_points)
    }

    /// Computes the summary from pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], percentile_points: &[f64]) -> Option<Self> {
        let stats = DescriptiveStats::from_sorted(sorted_values)?;
        let percentiles = Percentiles::from_sorted(sorted_values, percentile_points);
        Some(Self { stats, percentiles })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dataset_has_no_summary() {
        assert!(DistributionSummary::new([], &[50.0]).is_none());
    }

    #[test]
    fn test_median_matches_fiftieth_percentile() {
        let values = [4.0, 1.0, 9.0, 2.0, 7.0, 3.0];
        let summary = DistributionSummary::new(values, &[50.0]).unwrap();
        assert_eq!(summary.percentiles.get(50.0), Some(summary.stats.median));
    }
}
