//! Validate command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_submit_config, ValidateArgs};

pub fn run_validate(args: &ValidateArgs, level: LogLevel) -> Result<(), String> {
    let config =
        load_submit_config(&args.config).map_err(|e| format!("Config error: {e}"))?;
    config
        .validate()
        .map_err(|e| format!("Config error: {e}"))?;

    log(
        level,
        LogLevel::Normal,
        &format!("{}: configuration valid", args.config.display()),
    );

    if args.detailed {
        log(
            level,
            LogLevel::Normal,
            &format!("  Experiment:  {}", config.experiment_name),
        );
        log(
            level,
            LogLevel::Normal,
            &format!("  Data asset:  {} ({})", config.data.to_spec().id, config.data.path),
        );
        log(
            level,
            LogLevel::Normal,
            &format!("  Compute:     {} ({})", config.compute.name, config.compute.size),
        );
        log(
            level,
            LogLevel::Normal,
            &format!("  Environment: {}", config.environment.reference()),
        );
        match &config.sweep {
            Some(sweep) => log(
                level,
                LogLevel::Normal,
                &format!(
                    "  Sweep:       {} trials over {} parameter(s), metric {}",
                    sweep.max_total_trials,
                    sweep.search_space.len(),
                    sweep.metric
                ),
            ),
            None => log(level, LogLevel::Normal, "  Sweep:       none"),
        }
    }

    Ok(())
}
