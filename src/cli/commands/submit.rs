//! Submit command implementation
//!
//! Drives the full submission flow against the in-process platform: resolve
//! or create the data asset, compute, and environment, build the command
//! job, and hand it over. Transport to a remote control plane sits behind
//! the [`Platform`] trait and is out of scope here.

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_submit_config, SubmitArgs, SubmitConfig};
use crate::platform::{
    ensure_compute, ensure_data_asset, ensure_environment, InMemoryPlatform, JobSubmission,
    Platform, RunHandle,
};

pub fn run_submit(args: &SubmitArgs, level: LogLevel) -> Result<(), String> {
    let config =
        load_submit_config(&args.config).map_err(|e| format!("Config error: {e}"))?;
    config
        .validate()
        .map_err(|e| format!("Config error: {e}"))?;

    let mut client = InMemoryPlatform::for_workspace(config.workspace.clone());
    let job = config
        .command_job()
        .map_err(|e| format!("Job error: {e}"))?;
    let handle = prepare_and_submit(&mut client, &config, JobSubmission::Command(job), level)?;

    log(
        level,
        LogLevel::Normal,
        &format!(
            "Submitted '{}' to experiment '{}' as {}",
            handle.display_name, handle.experiment, handle.id
        ),
    );
    Ok(())
}

/// Resolve the three resources, then submit
///
/// Shared with the sweep command; resource absence falls back to creation,
/// creation failure aborts the submission.
pub(super) fn prepare_and_submit<P: Platform>(
    client: &mut P,
    config: &SubmitConfig,
    submission: JobSubmission,
    level: LogLevel,
) -> Result<RunHandle, String> {
    log(
        level,
        LogLevel::Verbose,
        &format!(
            "  Workspace:   {} ({})",
            config.workspace.workspace_name, config.workspace.resource_group
        ),
    );

    let data = ensure_data_asset(client, &config.data.to_spec())
        .map_err(|e| format!("Resource error: {e}"))?;
    log(
        level,
        LogLevel::Verbose,
        &format!("  Data asset:  {}", data.uri),
    );

    let compute = ensure_compute(client, &config.compute.to_spec())
        .map_err(|e| format!("Resource error: {e}"))?;
    log(
        level,
        LogLevel::Verbose,
        &format!("  Compute:     {} ({})", compute.name, compute.size),
    );

    let environment = ensure_environment(client, &config.environment.to_spec())
        .map_err(|e| format!("Resource error: {e}"))?;
    log(
        level,
        LogLevel::Verbose,
        &format!("  Environment: {}", environment.id),
    );

    client
        .submit(submission)
        .map_err(|e| format!("Submission error: {e}"))
}
