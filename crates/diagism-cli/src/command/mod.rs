use clap::{Parser, Subcommand};

use self::{describe::DescribeArg, predict::PredictArg};

mod describe;
mod predict;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Predict a physical parameter, with Monte-Carlo uncertainties
    Predict(#[clap(flatten)] PredictArg),
    /// List accepted input columns and predictable parameters
    Describe(#[clap(flatten)] DescribeArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Predict(arg) => predict::run(&arg)?,
        Mode::Describe(arg) => describe::run(&arg)?,
    }
    Ok(())
}
