use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{parameter::PhysicalParameter, pipeline::Pipeline};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BundleError {
    #[display("parameter '{}' is not listed in the hyperparameter table", parameter.column())]
    UnlistedParameter {
        #[error(not(source))]
        parameter: PhysicalParameter,
    },
    #[display("hyperparameter table points at pipeline #{index}, but the model holds {len}")]
    MissingPipeline { index: usize, len: usize },
}

/// Trained pipelines for every predictable parameter of one model variant.
///
/// Pipelines are stored in training order; [`HyperparameterTable`] tells
/// which one belongs to which parameter.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelBundle {
    /// Model variant, e.g. "Eight FIR lines".
    pub variant: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trained_at: Option<DateTime<Utc>>,
    pub pipelines: Vec<Pipeline>,
}

impl ModelBundle {
    /// Selects the pipeline trained for `parameter`.
    pub fn pipeline_for(
        &self,
        table: &HyperparameterTable,
        parameter: PhysicalParameter,
    ) -> Result<&Pipeline, BundleError> {
        let index = table.index_of(parameter)?;
        self.pipelines.get(index).ok_or(BundleError::MissingPipeline {
            index,
            len: self.pipelines.len(),
        })
    }
}

/// Ordered list of the parameters the bundle's pipelines were trained for.
///
/// Row `i` of the table describes pipeline `i`.
#[derive(Debug, Clone, Default)]
pub struct HyperparameterTable {
    parameters: Vec<String>,
}

impl HyperparameterTable {
    #[must_use]
    pub fn new(parameters: Vec<String>) -> Self {
        Self { parameters }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Row index of the first entry naming `parameter`.
    pub fn index_of(&self, parameter: PhysicalParameter) -> Result<usize, BundleError> {
        self.parameters
            .iter()
            .position(|column| parameter.matches_column(column))
            .ok_or(BundleError::UnlistedParameter { parameter })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{Predictor as _, tests::scaled_cii_pipeline};

    fn bundle() -> ModelBundle {
        ModelBundle {
            variant: "Eight FIR lines".to_owned(),
            trained_at: None,
            pipelines: vec![scaled_cii_pipeline(0.95), scaled_cii_pipeline(0.75)],
        }
    }

    #[test]
    fn test_pipeline_selected_by_table_row() {
        let table = HyperparameterTable::new(vec!["SFR".into(), r"M$_{\mathrm{gas}}$".into()]);
        let bundle = bundle();
        assert_eq!(
            bundle
                .pipeline_for(&table, PhysicalParameter::Sfr)
                .unwrap()
                .score(),
            0.95
        );
        assert_eq!(
            bundle
                .pipeline_for(&table, PhysicalParameter::GasMass)
                .unwrap()
                .score(),
            0.75
        );
    }

    #[test]
    fn test_unlisted_and_missing_pipelines() {
        let table = HyperparameterTable::new(vec!["SFR".into(), "ISRF".into(), "ZGal".into()]);
        let bundle = bundle();
        assert_eq!(
            bundle
                .pipeline_for(&table, PhysicalParameter::Pressure)
                .unwrap_err(),
            BundleError::UnlistedParameter {
                parameter: PhysicalParameter::Pressure
            }
        );
        assert_eq!(
            bundle
                .pipeline_for(&table, PhysicalParameter::Metallicity)
                .unwrap_err(),
            BundleError::MissingPipeline { index: 2, len: 2 }
        );
    }

    #[test]
    fn test_bundle_json_round_trip() {
        let bundle = bundle();
        let json = serde_json::to_string(&bundle).unwrap();
        let loaded: ModelBundle = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.variant, bundle.variant);
        assert_eq!(loaded.pipelines, bundle.pipelines);
    }
}
