//! Sweep command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_submit_config, ConfigError, SweepArgs};
use crate::platform::{InMemoryPlatform, JobSubmission};
use crate::sweep::attach_sweep;

use super::submit::prepare_and_submit;

pub fn run_sweep(args: &SweepArgs, level: LogLevel) -> Result<(), String> {
    let config =
        load_submit_config(&args.config).map_err(|e| format!("Config error: {e}"))?;
    config
        .validate()
        .map_err(|e| format!("Config error: {e}"))?;

    let spec = config
        .sweep_spec()
        .ok_or_else(|| format!("Config error: {}", ConfigError::MissingSweep))?;
    let trial = config
        .command_job()
        .map_err(|e| format!("Job error: {e}"))?;
    let sweep_job = attach_sweep(trial, spec).map_err(|e| format!("Sweep error: {e}"))?;

    log(
        level,
        LogLevel::Verbose,
        &format!(
            "  Sweep: {} trials, metric {}, timeout {}s",
            sweep_job.spec.limits.max_total_trials,
            sweep_job.spec.primary_metric,
            sweep_job.spec.limits.timeout.as_secs()
        ),
    );

    let mut client = InMemoryPlatform::for_workspace(config.workspace.clone());
    let handle = prepare_and_submit(&mut client, &config, JobSubmission::Sweep(sweep_job), level)?;

    log(
        level,
        LogLevel::Normal,
        &format!(
            "Submitted sweep '{}' to experiment '{}' as {}",
            handle.display_name, handle.experiment, handle.id
        ),
    );
    Ok(())
}
