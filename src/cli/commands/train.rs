//! Train command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::TrainArgs;
use crate::model::Penalty;
use crate::tracking::storage::JsonRunStore;
use crate::tracking::ExperimentTracker;
use crate::train::{run_training, TrainParams};

pub fn run_train(args: &TrainArgs, level: LogLevel) -> Result<(), String> {
    // The penalty string is rejected here, before any data is touched.
    let penalty: Penalty = args
        .penalty
        .parse()
        .map_err(|e| format!("Invalid arguments: {e}"))?;

    let params = TrainParams {
        training_data: args.training_data.clone(),
        c: args.c,
        penalty,
        test_fraction: args.test_fraction,
        seed: args.seed,
        max_iter: args.max_iter,
        run_name: args.run_name.clone(),
    };

    let store = JsonRunStore::new(&args.tracking_dir);
    let mut tracker = ExperimentTracker::new(&args.experiment, store);

    let report =
        run_training(&params, &mut tracker, level).map_err(|e| format!("Training error: {e}"))?;

    log(
        level,
        LogLevel::Verbose,
        &format!(
            "Run {} recorded under '{}' in {}",
            report.run_id,
            args.experiment,
            args.tracking_dir.display()
        ),
    );
    Ok(())
}
