//! CLI argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::data::{DEFAULT_SPLIT_SEED, DEFAULT_TEST_FRACTION};
use crate::model::{DEFAULT_C, DEFAULT_MAX_ITER};

/// Lanzar: training-job submission and tabular training
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "lanzar")]
#[command(version)]
#[command(about = "Submit training jobs to a managed ML platform and run the training routine")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the in-job training routine on a tabular CSV
    Train(TrainArgs),

    /// Resolve resources and submit a command job
    Submit(SubmitArgs),

    /// Submit a command job wrapped in a hyperparameter sweep
    Sweep(SweepArgs),

    /// Validate a submission config without submitting
    Validate(ValidateArgs),

    /// List or inspect tracked runs
    Runs(RunsArgs),
}

/// Arguments for the train command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct TrainArgs {
    /// Path to the training CSV
    #[arg(long = "training_data", value_name = "PATH")]
    pub training_data: PathBuf,

    /// Inverse regularization strength
    #[arg(long = "C", value_name = "FLOAT", default_value_t = DEFAULT_C)]
    pub c: f64,

    /// Regularization penalty: l1 or l2
    #[arg(long, value_name = "NORM", default_value = "l2")]
    pub penalty: String,

    /// Holdout share of the data
    #[arg(long, default_value_t = DEFAULT_TEST_FRACTION)]
    pub test_fraction: f64,

    /// Shuffle seed for the train/test split
    #[arg(long, default_value_t = DEFAULT_SPLIT_SEED)]
    pub seed: u64,

    /// Optimizer iteration cap
    #[arg(long, default_value_t = DEFAULT_MAX_ITER)]
    pub max_iter: usize,

    /// Experiment name runs are recorded under
    #[arg(long, default_value = "diabetes-custom-training")]
    pub experiment: String,

    /// Optional run name
    #[arg(long)]
    pub run_name: Option<String>,

    /// Directory for tracked-run JSON files
    #[arg(long, default_value = "runs")]
    pub tracking_dir: PathBuf,
}

/// Arguments for the submit command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct SubmitArgs {
    /// Path to the YAML submission config
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,
}

/// Arguments for the sweep command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct SweepArgs {
    /// Path to the YAML submission config (must have a sweep section)
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Path to the YAML submission config
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Show the parsed sections after validating
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for the runs command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct RunsArgs {
    /// Directory of tracked-run JSON files
    #[arg(long, default_value = "runs")]
    pub dir: PathBuf,

    /// Show one run in full instead of the listing
    #[arg(long)]
    pub run_id: Option<String>,
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
