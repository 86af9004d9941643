/// Values of a sample at a fixed set of percentile points.
///
/// Points are kept in the order they were requested, so summaries such as
/// `[16, 50, 84]` read back in the same order.
///
/// # Examples
///
/// ```
/// use diagism_stats::percentiles::Percentiles;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
/// let percentiles = Percentiles::new(&values, &[25.0, 50.0, 75.0]);
///
/// assert_eq!(percentiles.get(50.0), Some(5.5));
/// assert_eq!(percentiles.get(25.0), Some(3.25));
/// ```
#[derive(Debug, Clone)]
pub struct Percentiles {
    /// `(point, value)` pairs, points in `0.0..=100.0`.
    values: Vec<(f64, f64)>,
}

impl Percentiles {
    /// Evaluates `percentile_points` on values already in ascending order.
    ///
    /// # Arguments
    ///
    /// * `sorted_values` - The sample, ascending
    /// * `percentile_points` - Points to evaluate, e.g. `[16.0, 50.0, 84.0]`
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use diagism_stats::percentiles::Percentiles;
    ///
    /// let percentiles = Percentiles::from_sorted(&[1.0, 2.0, 5.0, 8.0, 9.0], &[50.0, 75.0]);
    /// assert_eq!(percentiles.get(50.0), Some(5.0));
    /// assert_eq!(percentiles.get(75.0), Some(8.0));
    /// ```
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], percentile_points: &[f64]) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "Percentiles::from_sorted requires ascending input"
        );

        let values = percentile_points
            .iter()
            .map(|&point| (point, compute_percentile(sorted_values, point)))
            .collect();
        Self { values }
    }

    /// Evaluates `percentile_points` on values given in any order.
    #[must_use]
    pub fn new(values: &[f64], percentile_points: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, percentile_points)
    }

    /// Value at `percentile`, if that point was evaluated.
    ///
    /// # Examples
    ///
    /// ```
    /// use diagism_stats::percentiles::Percentiles;
    ///
    /// let percentiles = Percentiles::new(&[3.0, 1.0, 2.0], &[50.0, 100.0]);
    /// assert_eq!(percentiles.get(50.0), Some(2.0));
    /// assert_eq!(percentiles.get(100.0), Some(3.0));
    /// assert_eq!(percentiles.get(16.0), None);
    /// ```
    #[must_use]
    pub fn get(&self, percentile: f64) -> Option<f64> {
        self.values
            .iter()
            .find(|(point, _)| (point - percentile).abs() < f64::EPSILON)
            .map(|(_, value)| *value)
    }

    /// `(point, value)` pairs in request order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values.iter().copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[(f64, f64)] {
        &self.values
    }
}

/// Value of ascending `sorted_values` at `percentile`.
///
/// Uses linear interpolation between the two closest ranks: the k-th
/// percentile sits at fractional position `(n - 1) * k / 100`. This matches
/// the default quantile definition of common numerical libraries, so the
/// 50th percentile equals the median.
///
/// Percentiles outside `0.0..=100.0` are clamped to that range.
///
/// # Returns
///
/// The value at the specified percentile. Returns `f64::NAN` if the input is empty.
///
/// # Examples
///
/// ```
/// use diagism_stats::percentiles::compute_percentile;
///
/// let values = vec![1.0, 2.0, 3.0, 4.0];
///
/// assert_eq!(compute_percentile(&values, 50.0), 2.5);
/// assert_eq!(compute_percentile(&values, 0.0), 1.0);
/// assert_eq!(compute_percentile(&values, 100.0), 4.0);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn compute_percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    let Some(last) = sorted_values.len().checked_sub(1) else {
        return f64::NAN;
    };
    let position = last as f64 * percentile.clamp(0.0, 100.0) / 100.0;
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(last);
    let fraction = position - position.floor();
    let lo = sorted_values[lower];
    let hi = sorted_values[upper];
    lo + (hi - lo) * fraction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_nan() {
        assert!(compute_percentile(&[], 50.0).is_nan());
    }

    #[test]
    fn test_single_value_is_every_percentile() {
        for p in [0.0, 16.0, 50.0, 84.0, 100.0] {
            assert_eq!(compute_percentile(&[7.0], p), 7.0);
        }
    }

    #[test]
    fn test_interpolates_between_ranks() {
        let values: Vec<f64> = (0..=100).map(f64::from).collect();
        assert!((compute_percentile(&values, 16.0) - 16.0).abs() < 1e-12);
        assert!((compute_percentile(&values, 84.0) - 84.0).abs() < 1e-12);

        let values = [0.0, 10.0];
        assert!((compute_percentile(&values, 16.0) - 1.6).abs() < 1e-12);
    }

    #[test]
    fn test_percentiles_are_monotonic() {
        let values = [3.0, -1.0, 8.5, 2.0, 2.0, 6.0, 0.5];
        let percentiles = Percentiles::new(&values, &[16.0, 50.0, 84.0]);
        let got: Vec<f64> = percentiles.iter().map(|(_, v)| v).collect();
        assert!(got.is_sorted_by(|a, b| a <= b));
        assert_eq!(percentiles.as_slice().len(), 3);
    }
}
