//! Propagation of a mock ensemble through a fitted pipeline.

use diagism_model::pipeline::Predictor;
use diagism_stats::summary::DistributionSummary;

use crate::generator::MockEnsemble;

const SUMMARY_PERCENTILES: [f64; 3] = [16.0, 50.0, 84.0];

/// Distribution of the physical predictions of one input row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionSummary {
    pub per_16th: f64,
    pub median: f64,
    pub per_84th: f64,
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SummaryError {
    #[display("the pipeline produced no predictions")]
    NoPredictions,
    #[display("{count} of {total} predictions are not finite")]
    NonFinitePredictions { count: usize, total: usize },
}

impl PredictionSummary {
    /// Summarizes raw predictions. `None` when there are none or any is not finite.
    ///
    /// # Examples
    ///
    /// ```
    /// use diagism_mock::aggregate::PredictionSummary;
    ///
    /// let summary = PredictionSummary::from_values([1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
    /// assert_eq!(summary.median, 3.0);
    /// assert_eq!(summary.mean, 3.0);
    /// assert!((summary.per_16th - 1.64).abs() < 1e-12);
    /// assert!((summary.per_84th - 4.36).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let values = values.into_iter().collect::<Vec<_>>();
        if values.iter().any(|v| !v.is_finite()) {
            return None;
        }
        let DistributionSummary { stats, percentiles } =
            DistributionSummary::new(values, &SUMMARY_PERCENTILES)?;
        Some(Self {
            per_16th: percentiles.get(16.0)?,
            median: percentiles.get(50.0)?,
            per_84th: percentiles.get(84.0)?,
            mean: stats.mean,
            std: stats.std_dev,
        })
    }
}

/// Transforms, predicts and inverse-transforms every mock, then summarizes.
///
/// Fails for an empty ensemble, or when the predictor returns a NaN or infinite value.
pub fn predict_and_summarize<P>(
    ensemble: &MockEnsemble,
    predictor: &P,
) -> Result<PredictionSummary, SummaryError>
where
    P: Predictor + ?Sized,
{
    let scaled = predictor.transform(ensemble.rows());
    let predicted = predictor.predict(&scaled);
    let values = predictor.inverse_transform(&predicted);
    let count = values.iter().filter(|v| !v.is_finite()).count();
    if count > 0 {
        return Err(SummaryError::NonFinitePredictions {
            count,
            total: values.len(),
        });
    }
    PredictionSummary::from_values(values).ok_or(SummaryError::NoPredictions)
}
