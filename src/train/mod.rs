//! The in-job training routine
//!
//! One strictly sequential pass: load the table, split it, fit the
//! classifier, evaluate on the holdout. The tracking run is opened before
//! any work starts and is closed on every exit path, so a failure partway
//! through still leaves a `Failed` run with whatever was logged before the
//! error.

use std::path::PathBuf;

use crate::cli::logging::{log, LogLevel};
use crate::data::{load_table, train_test_split, DEFAULT_SPLIT_SEED, DEFAULT_TEST_FRACTION};
use crate::eval::{accuracy, roc_auc_score};
use crate::model::{LogisticRegression, Penalty, DEFAULT_C, DEFAULT_MAX_ITER};
use crate::tracking::storage::RunStore;
use crate::tracking::{autolog_fit, ExperimentTracker, RunStatus};

/// Inputs of one training run
///
/// `c` and `penalty` arrive from the CLI (or a sweep trial assignment);
/// the rest default to the routine's fixed conventions.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainParams {
    pub training_data: PathBuf,
    pub c: f64,
    pub penalty: Penalty,
    pub test_fraction: f64,
    pub seed: u64,
    pub max_iter: usize,
    pub run_name: Option<String>,
}

impl TrainParams {
    /// Defaults matching the flagless invocation: `C=1.0`, `penalty=l2`
    pub fn new(training_data: impl Into<PathBuf>) -> Self {
        Self {
            training_data: training_data.into(),
            c: DEFAULT_C,
            penalty: Penalty::L2,
            test_fraction: DEFAULT_TEST_FRACTION,
            seed: DEFAULT_SPLIT_SEED,
            max_iter: DEFAULT_MAX_ITER,
            run_name: None,
        }
    }
}

/// What a completed run reports back
#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    pub run_id: String,
    pub accuracy: f64,
    pub auc: f64,
}

/// Run the whole routine under a scoped tracking run
///
/// The run is ended exactly once: `Completed` on success, `Failed` on any
/// error, with the original error propagated either way.
pub fn run_training<S: RunStore>(
    params: &TrainParams,
    tracker: &mut ExperimentTracker<S>,
    level: LogLevel,
) -> crate::Result<TrainReport> {
    let run_id = tracker.start_run(params.run_name.as_deref())?;

    match execute(params, tracker, &run_id, level) {
        Ok((acc, auc)) => {
            tracker.end_run(&run_id, RunStatus::Completed)?;
            Ok(TrainReport {
                run_id,
                accuracy: acc,
                auc,
            })
        }
        Err(err) => {
            // Close the run even though the pass failed; a second failure
            // here must not mask the original error.
            let _ = tracker.end_run(&run_id, RunStatus::Failed);
            Err(err)
        }
    }
}

fn execute<S: RunStore>(
    params: &TrainParams,
    tracker: &mut ExperimentTracker<S>,
    run_id: &str,
    level: LogLevel,
) -> crate::Result<(f64, f64)> {
    log(level, LogLevel::Normal, "Reading data...");
    let table = load_table(&params.training_data)?;
    log(
        level,
        LogLevel::Verbose,
        &format!("  {} rows, {} features", table.n_rows(), table.n_features()),
    );

    log(level, LogLevel::Normal, "Splitting data...");
    let split = train_test_split(&table, params.test_fraction, params.seed)?;
    log(
        level,
        LogLevel::Verbose,
        &format!("  {} train / {} test", split.n_train(), split.n_test()),
    );

    log(level, LogLevel::Normal, "Training model...");
    let estimator = LogisticRegression::new(params.c, params.penalty)?
        .with_max_iter(params.max_iter);
    let model = estimator.fit(&split.x_train, &split.y_train)?;
    autolog_fit(tracker, run_id, &estimator, &model)?;

    let predictions = model.predict(&split.x_test)?;
    let acc = accuracy(&split.y_test, &predictions)?;
    tracker.log_metric(run_id, "accuracy", acc, 0)?;

    let scores = model.predict_proba(&split.x_test)?;
    let auc = roc_auc_score(&split.y_test, &scores)?;
    tracker.log_metric(run_id, "AUC", auc, 0)?;

    log(level, LogLevel::Normal, &format!("Accuracy: {acc}"));
    log(level, LogLevel::Normal, &format!("AUC: {auc}"));

    Ok((acc, auc))
}
