use std::{path::PathBuf, str::FromStr};

use anyhow::Context;
use chrono::Utc;
use diagism_mock::{
    generator::{DEFAULT_NUM_MOCKS, DEFAULT_SEED, DEFAULT_SIGMA, MockConfig},
    input::{InputColumn, InputTable, RAW_REDSHIFT_COLUMN},
    session::{PredictionContext, PredictionReport},
};
use diagism_model::{PhysicalParameter, pipeline::Predictor as _};

use crate::{
    export::{ExportHeader, write_predictions},
    util::{self, Output},
};

/// A luminosity given on the command line as `NAME=VALUE`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LineArg {
    column: String,
    value: String,
}

impl FromStr for LineArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
        let column = column.trim();
        match InputColumn::from_header(column) {
            Some(InputColumn::Feature(feature)) if !feature.is_redshift() => {}
            _ => return Err(format!("'{column}' is not a line luminosity column")),
        }
        Ok(Self {
            column: column.to_owned(),
            value: value.trim().to_owned(),
        })
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PredictArg {
    /// Physical parameter to predict (e.g. SFR, Metallicity, "Gas Mass")
    #[arg(long)]
    parameter: PhysicalParameter,
    /// CSV file with one galaxy per row
    #[arg(long, conflicts_with_all = ["z", "line"])]
    input: Option<PathBuf>,
    /// Redshift of a single galaxy entered on the command line
    #[arg(long)]
    z: Option<f64>,
    /// Line luminosity of a single galaxy, log10(Lsun), e.g. Lum_CII_158=6.0
    #[arg(long, value_name = "NAME=VALUE")]
    line: Vec<LineArg>,
    /// Reference dataset of simulated galaxies (CSV)
    #[arg(long)]
    reference: PathBuf,
    /// Trained model bundle (JSON)
    #[arg(long)]
    model: PathBuf,
    /// Hyperparameter table mapping parameters to pipelines (CSV)
    #[arg(long)]
    hyperparameters: PathBuf,
    /// Conditioning window half-width and systematic uncertainty (dex)
    #[arg(long, default_value_t = DEFAULT_SIGMA)]
    sigma: f64,
    /// Perturb observed lines by sigma instead of the measurement noise floor
    #[arg(long)]
    systematic: bool,
    /// Number of mocks per galaxy
    #[arg(long, default_value_t = DEFAULT_NUM_MOCKS)]
    num_mocks: usize,
    /// Seed of the mock generator
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Recompute the pipeline score against the reference targets
    #[arg(long)]
    rescore: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

impl PredictArg {
    fn mock_config(&self) -> MockConfig {
        MockConfig {
            sigma: self.sigma,
            systematic: self.systematic,
            num_mocks: self.num_mocks,
            seed: self.seed,
        }
    }

    fn read_input(&self) -> anyhow::Result<InputTable> {
        if let Some(path) = &self.input {
            return util::read_input_file(path);
        }
        let mut headers = vec![];
        let mut values = vec![];
        if let Some(z) = self.z {
            headers.push(RAW_REDSHIFT_COLUMN.to_owned());
            values.push(z.to_string());
        }
        for line in &self.line {
            headers.push(line.column.clone());
            values.push(line.value.clone());
        }
        InputTable::from_records(headers, [values]).context("Invalid command-line input")
    }
}

pub(crate) fn run(arg: &PredictArg) -> anyhow::Result<()> {
    let parameter = arg.parameter;

    let bundle = util::read_model_file(&arg.model)?;
    let table = util::read_hyperparameter_file(&arg.hyperparameters)?;
    let mut pipeline = bundle
        .pipeline_for(&table, parameter)
        .with_context(|| format!("No pipeline for {parameter}"))?
        .clone();
    log::info!(
        "Loaded model '{}' ({} pipelines), using the one for {parameter}",
        bundle.variant,
        bundle.pipelines.len()
    );
    if let Some(trained_at) = bundle.trained_at {
        log::info!(
            "Model trained at {}",
            trained_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }

    let reference = util::read_reference_file(&arg.reference)?;
    log::info!("Loaded {} reference galaxies", reference.len());

    if arg.rescore {
        let targets = reference
            .target(parameter)
            .with_context(|| format!("Reference table has no target column for {parameter}"))?;
        let score = pipeline
            .evaluate_score(reference.rows(), targets)
            .with_context(|| format!("Not enough usable reference rows to score {parameter}"))?;
        log::info!(
            "Recomputed score: {score:.3} (stored: {:.3})",
            pipeline.score()
        );
        pipeline = pipeline.with_score(score);
    }

    let input = arg.read_input()?;
    let config = arg.mock_config();
    log::info!(
        "Generating {} mocks for each of {} galaxies",
        config.num_mocks,
        input.rows().len()
    );

    let context = PredictionContext {
        reference: &reference,
        predictor: &pipeline,
    };
    let report = context
        .run(&input, &config)
        .with_context(|| format!("Cannot predict {parameter}"))?;
    log_report(&report);

    let output = Output::from_output_path(arg.output.clone())?;
    let output_path = output.display_path();
    let header = ExportHeader {
        executed_at: Utc::now(),
        parameter,
        score: report.score,
        variant: &bundle.variant,
    };
    let summaries = report.rows.iter().map(|row| row.summary).collect::<Vec<_>>();
    write_predictions(output, &header, &summaries)
        .with_context(|| format!("Failed to write predictions to {output_path}"))?;
    log::info!("Wrote {} predictions to {output_path}", summaries.len());

    Ok(())
}

fn log_report(report: &PredictionReport) {
    for notice in &report.input_notices {
        log::warn!("{notice}");
    }
    if report.grade.is_low_confidence() {
        log::warn!(
            "The score of the model is {:.3}; predictions may not be reliable",
            report.score
        );
    }
    for (row, fallback) in report.fallbacks() {
        let columns = fallback
            .columns
            .iter()
            .map(|f| f.column_name())
            .collect::<Vec<_>>()
            .join(", ");
        log::warn!(
            "Row {row}: {} reference galaxies in the conditioning window; {columns} drawn from the row's own luminosities",
            fallback.matched_rows
        );
    }
}
