//! Fitted scaler + regressor pipelines and their quality gate.
//!
//! A [`Pipeline`] bundles the three fitted pieces needed to turn a physical
//! feature row into a physical prediction:
//!
//! ```text
//! FeatureValues --FeatureScaler--> scaled row --Regressor--> scaled target --TargetScaler⁻¹--> value
//! ```
//!
//! together with the coefficient of determination measured when it was trained.
//! The score decides whether predictions may be served at all, see [`ScoreGrade`].

use serde::{Deserialize, Serialize};

use crate::{
    feature::{Feature, FeatureValues},
    regressor::{Regressor, RegressorModel},
    scaler::{FeatureScaler, TargetScaler},
};

/// Scores at or below this value refuse predictions.
pub const REFUSAL_SCORE: f64 = 0.7;
/// Scores at or above this value are considered reliable.
pub const RELIABLE_SCORE: f64 = 0.9;

/// Capability interface of a fitted prediction pipeline.
///
/// The mock aggregator only needs these four operations, so any model-serving
/// backend can stand in for [`Pipeline`].
pub trait Predictor {
    /// Precomputed coefficient of determination of the model.
    fn score(&self) -> f64;

    /// Maps physical feature rows to the model's scaled input space.
    fn transform(&self, rows: &[FeatureValues]) -> Vec<FeatureValues>;

    /// Predicts scaled targets for scaled rows.
    fn predict(&self, scaled: &[FeatureValues]) -> Vec<f64>;

    /// Maps scaled targets back to physical units.
    fn inverse_transform(&self, values: &[f64]) -> Vec<f64>;

    /// Full pipeline: transform, predict, inverse transform.
    fn predict_physical(&self, rows: &[FeatureValues]) -> Vec<f64> {
        let scaled = self.transform(rows);
        let predicted = self.predict(&scaled);
        self.inverse_transform(&predicted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("regressor expects {found} input features, but pipelines take {}", Feature::LEN)]
pub struct FeatureCountError {
    #[error(not(source))]
    pub found: usize,
}

/// Fitted scaler + regressor + scaler pipeline for one physical parameter.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "PipelineRecord", into = "PipelineRecord")]
pub struct Pipeline {
    feature_scaler: FeatureScaler,
    regressor: RegressorModel,
    target_scaler: TargetScaler,
    score: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct PipelineRecord {
    feature_scaler: FeatureScaler,
    regressor: RegressorModel,
    target_scaler: TargetScaler,
    score: f64,
}

impl TryFrom<PipelineRecord> for Pipeline {
    type Error = FeatureCountError;

    fn try_from(record: PipelineRecord) -> Result<Self, Self::Error> {
        Self::new(
            record.feature_scaler,
            record.regressor,
            record.target_scaler,
            record.score,
        )
    }
}

impl From<Pipeline> for PipelineRecord {
    fn from(pipeline: Pipeline) -> Self {
        Self {
            feature_scaler: pipeline.feature_scaler,
            regressor: pipeline.regressor,
            target_scaler: pipeline.target_scaler,
            score: pipeline.score,
        }
    }
}

impl Pipeline {
    /// Assembles a pipeline, checking that the regressor takes one value per [`Feature`].
    pub fn new(
        feature_scaler: FeatureScaler,
        regressor: RegressorModel,
        target_scaler: TargetScaler,
        score: f64,
    ) -> Result<Self, FeatureCountError> {
        let found = regressor.n_features();
        if found != Feature::LEN {
            return Err(FeatureCountError { found });
        }
        Ok(Self {
            feature_scaler,
            regressor,
            target_scaler,
            score,
        })
    }

    #[must_use]
    pub fn grade(&self) -> ScoreGrade {
        ScoreGrade::from_score(self.score)
    }

    /// Recomputes the coefficient of determination against known targets.
    ///
    /// Rows with a missing feature or a non-finite target are skipped. Returns
    /// `None` when fewer than two usable rows remain or the targets are constant.
    #[must_use]
    pub fn evaluate_score(&self, rows: &[FeatureValues], targets: &[f64]) -> Option<f64> {
        let (usable_rows, usable_targets): (Vec<FeatureValues>, Vec<f64>) =
            std::iter::zip(rows, targets)
                .filter(|(row, target)| {
                    target.is_finite() && row.as_slice().iter().all(|v| v.is_finite())
                })
                .map(|(row, target)| (*row, *target))
                .unzip();
        if usable_rows.len() < 2 {
            return None;
        }
        let predicted = self.predict_physical(&usable_rows);
        diagism_stats::regression::coefficient_of_determination(&usable_targets, &predicted)
    }

    /// Returns a copy of this pipeline carrying a different score.
    #[must_use]
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }
}

impl Predictor for Pipeline {
    fn score(&self) -> f64 {
        self.score
    }

    fn transform(&self, rows: &[FeatureValues]) -> Vec<FeatureValues> {
        rows.iter()
            .map(|row| self.feature_scaler.transform(row))
            .collect()
    }

    fn predict(&self, scaled: &[FeatureValues]) -> Vec<f64> {
        scaled
            .iter()
            .map(|row| self.regressor.predict_one(row.as_slice()))
            .collect()
    }

    fn inverse_transform(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .map(|v| self.target_scaler.inverse_transform(*v))
            .collect()
    }
}

/// Quality band of a pipeline score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum ScoreGrade {
    /// Score ≤ [`REFUSAL_SCORE`] (or not a number): predictions must not be served.
    Refused,
    /// Score between the two thresholds: served, but flagged.
    LowConfidence,
    /// Score ≥ [`RELIABLE_SCORE`].
    Reliable,
}

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
#[display(
    "score {score:.3} is not good enough to make a prediction (must exceed {})",
    REFUSAL_SCORE
)]
pub struct LowScoreError {
    #[error(not(source))]
    pub score: f64,
}

impl ScoreGrade {
    /// Grades a score. The refusal boundary is inclusive.
    ///
    /// # Examples
    ///
    /// ```
    /// use diagism_model::pipeline::ScoreGrade;
    ///
    /// assert_eq!(ScoreGrade::from_score(0.7), ScoreGrade::Refused);
    /// assert_eq!(ScoreGrade::from_score(0.85), ScoreGrade::LowConfidence);
    /// assert_eq!(ScoreGrade::from_score(0.9), ScoreGrade::Reliable);
    /// assert_eq!(ScoreGrade::from_score(f64::NAN), ScoreGrade::Refused);
    /// ```
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score.is_nan() || score <= REFUSAL_SCORE {
            Self::Refused
        } else if score < RELIABLE_SCORE {
            Self::LowConfidence
        } else {
            Self::Reliable
        }
    }

    /// Like [`Self::from_score`], but turns a refusal into an error.
    pub fn check(score: f64) -> Result<Self, LowScoreError> {
        match Self::from_score(score) {
            Self::Refused => Err(LowScoreError { score }),
            grade => Ok(grade),
        }
    }
}
