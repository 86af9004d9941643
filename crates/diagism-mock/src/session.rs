//! One prediction request, from validated input to per-row summaries.

use diagism_model::pipeline::{LowScoreError, Predictor, ScoreGrade};

use crate::{
    aggregate::{PredictionSummary, SummaryError, predict_and_summarize},
    generator::{ConditioningFallback, MockConfig, MockError, generate_mocks},
    input::{InputError, InputNotice, InputTable},
    reference::ReferenceTable,
};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum PredictionError {
    #[display("invalid input")]
    Input(InputError),
    #[display("model refused")]
    LowScore(LowScoreError),
    #[display("mock generation failed")]
    Mock(MockError),
    #[display("row {row}: prediction failed")]
    #[from(ignore)]
    Summary { row: usize, source: SummaryError },
}

/// Read-only state shared by every request of a session.
#[derive(Clone, Copy)]
pub struct PredictionContext<'a> {
    pub reference: &'a ReferenceTable,
    pub predictor: &'a dyn Predictor,
}

/// Outcome of one input row.
#[derive(Debug, Clone)]
pub struct RowPrediction {
    pub summary: PredictionSummary,
    pub fallback: Option<ConditioningFallback>,
}

/// Outcome of a request.
#[derive(Debug, Clone)]
pub struct PredictionReport {
    /// Score of the pipeline that served the request.
    pub score: f64,
    pub grade: ScoreGrade,
    pub input_notices: Vec<InputNotice>,
    /// One entry per input row, in input order.
    pub rows: Vec<RowPrediction>,
}

impl PredictionReport {
    /// Rows that fell back to their own observed values, with their 1-based numbers.
    pub fn fallbacks(&self) -> impl Iterator<Item = (usize, &ConditioningFallback)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(i, row)| row.fallback.as_ref().map(|f| (i + 1, f)))
    }
}

impl PredictionContext<'_> {
    /// Serves a request.
    ///
    /// Checks run in order: input sufficiency, pipeline score, mock configuration.
    /// Any failure aborts the whole request; fallbacks and notices do not.
    pub fn run(
        &self,
        input: &InputTable,
        config: &MockConfig,
    ) -> Result<PredictionReport, PredictionError> {
        let input_notices = input.validate()?;
        let score = self.predictor.score();
        let grade = ScoreGrade::check(score)?;

        let rows = generate_mocks(input.rows(), self.reference, config)?
            .into_iter()
            .enumerate()
            .map(|(i, mocks)| {
                let summary = predict_and_summarize(&mocks.ensemble, self.predictor)
                    .map_err(|source| PredictionError::Summary { row: i + 1, source })?;
                Ok(RowPrediction {
                    summary,
                    fallback: mocks.fallback,
                })
            })
            .collect::<Result<Vec<_>, PredictionError>>()?;

        Ok(PredictionReport {
            score,
            grade,
            input_notices,
            rows,
        })
    }
}
