//! Lanzar CLI
//!
//! Training-job submission and the in-job training routine.
//!
//! # Usage
//!
//! ```bash
//! # Run the training routine on a tabular CSV
//! lanzar train --training_data diabetes.csv
//!
//! # Override the regularization hyperparameters
//! lanzar train --training_data diabetes.csv --C 0.5 --penalty l1
//!
//! # Validate a submission config
//! lanzar validate submit.yaml
//!
//! # Submit a command job, or a hyperparameter sweep
//! lanzar submit submit.yaml
//! lanzar sweep sweep.yaml
//!
//! # Inspect tracked runs
//! lanzar runs --dir runs
//! ```

use clap::Parser;
use lanzar::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
