/// Location and spread of a sample of `f64` values.
///
/// Two spreads are kept: the population one (`ddof = 0`), used to describe a
/// mock ensemble, and the Bessel-corrected one (`ddof = 1`), used to describe
/// the reference galaxies that fall inside a conditioning window.
#[derive(Debug, Clone)]
pub struct DescriptiveStats {
    /// Number of values summarized.
    pub count: usize,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
    pub mean: f64,
    /// Middle value; for an even count, the midpoint of the two middle values.
    pub median: f64,
    /// Population variance.
    pub variance: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Sample standard deviation, or `None` below two values.
    pub sample_std_dev: Option<f64>,
}

impl DescriptiveStats {
    /// Summarizes values given in any order.
    ///
    /// # Arguments
    ///
    /// * `values` - The sample; it is collected and sorted before summarizing.
    ///
    /// # Returns
    ///
    /// `None` for an empty sample.
    ///
    /// # Examples
    ///
    /// ```
    /// # use diagism_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([6.2, 5.8, 6.0, 5.9, 6.1]).unwrap();
    /// assert_eq!(stats.count, 5);
    /// assert_eq!(stats.min, 5.8);
    /// assert_eq!(stats.max, 6.2);
    /// assert_eq!(stats.median, 6.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values.into_iter().collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted)
    }

    /// Summarizes the finite values only.
    ///
    /// NaN and infinite values are skipped, so a column with missing entries
    /// is described by its observed entries.
    ///
    /// # Examples
    ///
    /// ```
    /// # use diagism_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::from_finite([2.0, f64::NAN, 4.0]).unwrap();
    /// assert_eq!(stats.count, 2);
    /// assert_eq!(stats.mean, 3.0);
    ///
    /// assert!(DescriptiveStats::from_finite([f64::NAN]).is_none());
    /// ```
    #[must_use]
    pub fn from_finite<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        Self::new(values.into_iter().filter(|v| v.is_finite()))
    }

    /// Summarizes values that are already in ascending order, without sorting again.
    ///
    /// `None` for an empty slice.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use diagism_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::from_sorted(&[1.0, 2.0, 4.0, 5.0]).unwrap();
    /// assert_eq!(stats.median, 3.0);
    /// assert_eq!(stats.mean, 3.0);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "DescriptiveStats::from_sorted requires ascending input"
        );

        let (&min, &max) = (sorted_values.first()?, sorted_values.last()?);
        let count = sorted_values.len();
        let n = count as f64;
        let mean = sorted_values.iter().sum::<f64>() / n;
        let median = if count % 2 == 1 {
            sorted_values[count / 2]
        } else {
            f64::midpoint(sorted_values[count / 2 - 1], sorted_values[count / 2])
        };
        let sum_sq = sorted_values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>();
        let variance = sum_sq / n;
        let std_dev = variance.sqrt();
        let sample_std_dev = (count > 1).then(|| (sum_sq / (n - 1.0)).sqrt());

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            variance,
            std_dev,
            sample_std_dev,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dataset_has_no_stats() {
        assert!(DescriptiveStats::new([]).is_none());
    }

    #[test]
    fn test_population_and_sample_spread() {
        let stats = DescriptiveStats::new([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.variance, 4.0);
        assert_eq!(stats.std_dev, 2.0);
        let sample = stats.sample_std_dev.unwrap();
        assert!((sample - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_single_value_has_no_sample_spread() {
        let stats = DescriptiveStats::new([1.5]).unwrap();
        assert_eq!(stats.std_dev, 0.0);
        assert!(stats.sample_std_dev.is_none());
        assert_eq!(stats.median, 1.5);
    }

    #[test]
    #[should_panic(expected = "requires ascending input")]
    fn test_from_sorted_rejects_unsorted_input() {
        let _ = DescriptiveStats::from_sorted(&[3.0, 1.0]);
    }
}
