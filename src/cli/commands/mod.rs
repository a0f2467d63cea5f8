//! CLI command implementations

mod runs;
mod submit;
mod sweep;
mod train;
mod validate;

use crate::cli::LogLevel;
use crate::config::{Cli, Command};

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<(), String> {
    let log_level = LogLevel::from_flags(cli.verbose, cli.quiet);

    match cli.command {
        Command::Train(args) => train::run_train(&args, log_level),
        Command::Submit(args) => submit::run_submit(&args, log_level),
        Command::Sweep(args) => sweep::run_sweep(&args, log_level),
        Command::Validate(args) => validate::run_validate(&args, log_level),
        Command::Runs(args) => runs::run_runs(&args, log_level),
    }
}
