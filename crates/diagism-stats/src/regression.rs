//! Goodness-of-fit measures for regression predictions.

/// Computes the coefficient of determination (R²) of `predicted` against `observed`.
///
/// `R² = 1 - SS_res / SS_tot`, where `SS_tot` is taken around the mean of the
/// observed values. A perfect prediction scores 1.0; predicting the mean scores 0.0;
/// worse predictions go negative.
///
/// # Returns
///
/// * `Some(r2)` - for non-empty inputs of equal length with non-constant observations
/// * `None` - if lengths differ, the inputs are empty, or every observed value is equal
///
/// # Examples
///
/// ```
/// use diagism_stats::regression::coefficient_of_determination;
///
/// let observed = [1.0, 2.0, 3.0, 4.0];
/// let mean_only = [2.5, 2.5, 2.5, 2.5];
/// assert_eq!(coefficient_of_determination(&observed, &mean_only), Some(0.0));
/// assert_eq!(coefficient_of_determination(&observed, &[1.0]), None);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn coefficient_of_determination(observed: &[f64], predicted: &[f64]) -> Option<f64> {
    if observed.is_empty() || observed.len() != predicted.len() {
        return None;
    }
    let mean = observed.iter().sum::<f64>() / observed.len() as f64;
    let ss_tot = observed.iter().map(|y| (y - mean).powi(2)).sum::<f64>();
    if ss_tot == 0.0 {
        return None;
    }
    let ss_res = std::iter::zip(observed, predicted)
        .map(|(y, p)| (y - p).powi(2))
        .sum::<f64>();
    Some(1.0 - ss_res / ss_tot)
}
