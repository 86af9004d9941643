use std::path::PathBuf;

use anyhow::Context;
use diagism_mock::input::RAW_REDSHIFT_COLUMN;
use diagism_model::{
    Feature, PhysicalParameter,
    bundle::{HyperparameterTable, ModelBundle},
    pipeline::{Predictor as _, ScoreGrade},
};

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DescribeArg {
    /// Trained model bundle (JSON); shows the score of each parameter
    #[arg(long, requires = "hyperparameters")]
    model: Option<PathBuf>,
    /// Hyperparameter table mapping parameters to pipelines (CSV)
    #[arg(long, requires = "model")]
    hyperparameters: Option<PathBuf>,
}

pub(crate) fn run(arg: &DescribeArg) -> anyhow::Result<()> {
    let models = match (&arg.model, &arg.hyperparameters) {
        (Some(model), Some(table)) => Some((
            util::read_model_file(model)?,
            util::read_hyperparameter_file(table)?,
        )),
        _ => None,
    };

    let mut output = Output::stdout();
    write_description(&mut output, models.as_ref().map(|(b, t)| (b, t)))
        .context("Failed to write description")?;
    Ok(())
}

fn grade_label(grade: ScoreGrade) -> &'static str {
    match grade {
        ScoreGrade::Refused => "refused",
        ScoreGrade::LowConfidence => "low confidence",
        ScoreGrade::Reliable => "reliable",
    }
}

fn write_description<W>(
    writer: &mut W,
    models: Option<(&ModelBundle, &HyperparameterTable)>,
) -> std::io::Result<()>
where
    W: std::io::Write,
{
    writeln!(writer, "Input columns:")?;
    for feature in Feature::LINES {
        writeln!(writer, "  {:<12} line luminosity, log10(Lsun)", feature.column_name())?;
    }
    writeln!(writer, "  {RAW_REDSHIFT_COLUMN:<12} redshift")?;
    writeln!(
        writer,
        "  {:<12} redshift, already transformed",
        Feature::LogOnePlusZ.column_name()
    )?;

    writeln!(writer)?;
    match models {
        None => {
            writeln!(writer, "Physical parameters:")?;
            for parameter in PhysicalParameter::ALL {
                writeln!(writer, "  {:<20} [{}]", parameter.name(), parameter.unit())?;
            }
        }
        Some((bundle, table)) => {
            if let Some(trained_at) = bundle.trained_at {
                writeln!(
                    writer,
                    "Model trained at {}",
                    trained_at.format("%Y-%m-%d %H:%M:%S UTC")
                )?;
            }
            writeln!(writer, "Physical parameters ({}):", bundle.variant)?;
            for parameter in PhysicalParameter::ALL {
                let status = match bundle.pipeline_for(table, parameter) {
                    Ok(pipeline) => format!(
                        "score {:.3}, {}",
                        pipeline.score(),
                        grade_label(pipeline.grade())
                    ),
                    Err(e) => e.to_string(),
                };
                writeln!(
                    writer,
                    "  {:<20} [{}] {status}",
                    parameter.name(),
                    parameter.unit()
                )?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_lists_columns_and_parameters() {
        let mut buffer = vec![];
        write_description(&mut buffer, None).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        for feature in Feature::ALL {
            assert!(text.contains(feature.column_name()));
        }
        for parameter in PhysicalParameter::ALL {
            assert!(text.contains(parameter.name()));
        }
    }

    #[test]
    fn test_description_with_model() {
        let bundle: ModelBundle = serde_json::from_str(
            r#"{
                "variant": "Eight FIR lines",
                "trained_at": "2024-02-01T09:30:00Z",
                "pipelines": [{
                    "feature_scaler": {"center": [0,0,0,0,0,0,0,0,0], "scale": [1,1,1,1,1,1,1,1,1]},
                    "regressor": {"kind": "linear", "coefficients": [0,0,0,0,0,0,1,0,0], "intercept": 0.0},
                    "target_scaler": {"center": 0.0, "scale": 1.0},
                    "score": 0.82
                }]
            }"#,
        )
        .unwrap();
        let table = HyperparameterTable::new(vec!["SFR".to_owned()]);
        let mut buffer = vec![];
        write_description(&mut buffer, Some((&bundle, &table))).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("Model trained at 2024-02-01 09:30:00 UTC\n"));
        assert!(text.contains("Physical parameters (Eight FIR lines):"));
        assert!(text.contains("score 0.820, low confidence"));
        assert!(text.contains("not listed in the hyperparameter table"));
    }
}
