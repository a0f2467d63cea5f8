//! Experiment tracking
//!
//! The metric side channel the training routine reports into: runs with
//! string-encoded parameters and stepped metric series, persisted through a
//! pluggable [`RunStore`](storage::RunStore). A run is opened before any
//! training work starts and is closed exactly once, whatever the outcome.
//!
//! # Example
//!
//! ```
//! use lanzar::tracking::storage::InMemoryRunStore;
//! use lanzar::tracking::{ExperimentTracker, RunStatus};
//!
//! # fn main() -> Result<(), lanzar::tracking::TrackingError> {
//! let mut tracker = ExperimentTracker::new("diabetes-training", InMemoryRunStore::new());
//! tracker.add_tag("team", "ml");
//!
//! let run_id = tracker.start_run(Some("baseline"))?;
//! tracker.log_param(&run_id, "C", "1")?;
//! tracker.log_metric(&run_id, "AUC", 0.85, 0)?;
//! tracker.end_run(&run_id, RunStatus::Completed)?;
//!
//! let run = tracker.get_run(&run_id)?;
//! assert_eq!(run.status, RunStatus::Completed);
//! assert_eq!(run.last_metric("AUC"), Some(0.85));
//! # Ok(())
//! # }
//! ```

pub mod storage;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storage::{RunStore, StoreError};

/// Status of a tracking run
///
/// There is no cancelled state: the training routine runs one pass and
/// either completes or fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Run is actively recording
    Active,
    /// Run completed successfully
    Completed,
    /// Run failed
    Failed,
}

impl RunStatus {
    /// Display name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Active => "Active",
            RunStatus::Completed => "Completed",
            RunStatus::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One metric observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub value: f64,
    pub step: u64,
}

/// A single tracked run
///
/// Serialized as-is by the JSON store; there is no separate persistence
/// snapshot type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    /// Unique identifier for the run
    pub run_id: String,
    /// Optional human-readable name
    pub run_name: Option<String>,
    /// Parent experiment name
    pub experiment: String,
    /// Current status
    pub status: RunStatus,
    /// String-encoded parameters
    pub params: HashMap<String, String>,
    /// Metric series by name
    pub metrics: HashMap<String, Vec<MetricPoint>>,
    /// Key-value metadata
    pub tags: HashMap<String, String>,
    /// When the run was opened
    pub started_at: DateTime<Utc>,
    /// When the run was closed
    pub ended_at: Option<DateTime<Utc>>,
}

impl Run {
    fn new(run_id: String, run_name: Option<String>, experiment: String) -> Self {
        Self {
            run_id,
            run_name,
            experiment,
            status: RunStatus::Active,
            params: HashMap::new(),
            metrics: HashMap::new(),
            tags: HashMap::new(),
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    /// Most recent value of a metric, if logged
    #[must_use]
    pub fn last_metric(&self, key: &str) -> Option<f64> {
        self.metrics.get(key).and_then(|series| series.last()).map(|p| p.value)
    }
}

/// Errors from tracking operations
#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Run is not active: {0}")]
    RunNotActive(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result alias for tracking operations
pub type Result<T> = std::result::Result<T, TrackingError>;

/// Manages runs under a single experiment name
///
/// Active runs live in memory; ending a run persists it to the store.
#[derive(Debug)]
pub struct ExperimentTracker<S: RunStore> {
    experiment: String,
    tags: HashMap<String, String>,
    store: S,
    active_runs: HashMap<String, Run>,
    next_run_id: u64,
}

impl<S: RunStore> ExperimentTracker<S> {
    /// Create a tracker for the given experiment name
    pub fn new(experiment: impl Into<String>, store: S) -> Self {
        Self {
            experiment: experiment.into(),
            tags: HashMap::new(),
            store,
            active_runs: HashMap::new(),
            next_run_id: 1,
        }
    }

    /// Add an experiment-level tag, inherited by runs started afterwards
    pub fn add_tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(key.into(), value.into());
    }

    /// Experiment name this tracker records under
    #[must_use]
    pub fn experiment(&self) -> &str {
        &self.experiment
    }

    /// Open a new run and return its ID
    pub fn start_run(&mut self, run_name: Option<&str>) -> Result<String> {
        let run_id = format!("run-{}", self.next_run_id);
        self.next_run_id += 1;

        let mut run = Run::new(
            run_id.clone(),
            run_name.map(String::from),
            self.experiment.clone(),
        );
        for (k, v) in &self.tags {
            run.tags.insert(k.clone(), v.clone());
        }

        self.active_runs.insert(run_id.clone(), run);
        Ok(run_id)
    }

    /// Close a run with the given terminal status and persist it
    pub fn end_run(&mut self, run_id: &str, status: RunStatus) -> Result<()> {
        let mut run = self
            .active_runs
            .remove(run_id)
            .ok_or_else(|| TrackingError::RunNotFound(run_id.to_string()))?;

        run.status = status;
        run.ended_at = Some(Utc::now());

        self.store.save_run(&run)?;
        Ok(())
    }

    /// Record a single parameter on an active run
    pub fn log_param(&mut self, run_id: &str, key: &str, value: &str) -> Result<()> {
        let run = self.active_mut(run_id)?;
        run.params.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Record several parameters at once
    pub fn log_params(&mut self, run_id: &str, params: &HashMap<String, String>) -> Result<()> {
        let run = self.active_mut(run_id)?;
        for (k, v) in params {
            run.params.insert(k.clone(), v.clone());
        }
        Ok(())
    }

    /// Append a metric observation at the given step
    pub fn log_metric(&mut self, run_id: &str, key: &str, value: f64, step: u64) -> Result<()> {
        let run = self.active_mut(run_id)?;
        run.metrics
            .entry(key.to_string())
            .or_default()
            .push(MetricPoint { value, step });
        Ok(())
    }

    /// Fetch a run by ID, checking active runs before the store
    ///
    /// Absence maps to [`TrackingError::RunNotFound`]; any other store
    /// failure (I/O, corrupt JSON) surfaces as [`TrackingError::Store`].
    pub fn get_run(&self, run_id: &str) -> Result<Run> {
        if let Some(run) = self.active_runs.get(run_id) {
            return Ok(run.clone());
        }
        self.store.load_run(run_id).map_err(|e| match e {
            StoreError::RunNotFound(id) => TrackingError::RunNotFound(id),
            other => TrackingError::Store(other),
        })
    }

    /// List active and persisted runs, ordered by run ID
    pub fn list_runs(&self) -> Result<Vec<Run>> {
        let mut runs: Vec<Run> = self.active_runs.values().cloned().collect();
        for run in self.store.list_runs()? {
            if !self.active_runs.contains_key(&run.run_id) {
                runs.push(run);
            }
        }
        runs.sort_by(|a, b| a.run_id.cmp(&b.run_id));
        Ok(runs)
    }

    fn active_mut(&mut self, run_id: &str) -> Result<&mut Run> {
        self.active_runs
            .get_mut(run_id)
            .ok_or_else(|| TrackingError::RunNotActive(run_id.to_string()))
    }
}

/// Capture a fitting call's parameters onto a run without call-site
/// instrumentation
///
/// Records the estimator configuration (solver, C, penalty, max_iter, tol)
/// and what the optimizer actually did (n_iter, converged).
pub fn autolog_fit<S: RunStore>(
    tracker: &mut ExperimentTracker<S>,
    run_id: &str,
    estimator: &crate::model::LogisticRegression,
    model: &crate::model::LogisticModel,
) -> Result<()> {
    tracker.log_param(run_id, "solver", estimator.solver())?;
    tracker.log_param(run_id, "C", &estimator.c().to_string())?;
    tracker.log_param(run_id, "penalty", estimator.penalty().as_str())?;
    tracker.log_param(run_id, "max_iter", &estimator.max_iter().to_string())?;
    tracker.log_param(run_id, "tol", &estimator.tol().to_string())?;
    tracker.log_param(run_id, "n_iter", &model.n_iter.to_string())?;
    tracker.log_param(run_id, "converged", &model.converged.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::storage::InMemoryRunStore;
    use super::*;

    fn tracker() -> ExperimentTracker<InMemoryRunStore> {
        ExperimentTracker::new("test-experiment", InMemoryRunStore::new())
    }

    #[test]
    fn test_run_lifecycle() {
        let mut t = tracker();
        let id = t.start_run(Some("first")).expect("start");
        assert_eq!(id, "run-1");

        t.log_param(&id, "C", "0.5").expect("param");
        t.log_metric(&id, "AUC", 0.8, 0).expect("metric");
        t.log_metric(&id, "AUC", 0.9, 1).expect("metric");
        t.end_run(&id, RunStatus::Completed).expect("end");

        let run = t.get_run(&id).expect("get");
        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(run.params.get("C").map(String::as_str), Some("0.5"));
        assert_eq!(run.last_metric("AUC"), Some(0.9));
        assert!(run.ended_at.is_some());
    }

    #[test]
    fn test_failed_run_is_persisted() {
        let mut t = tracker();
        let id = t.start_run(None).expect("start");
        t.log_param(&id, "penalty", "l1").expect("param");
        t.end_run(&id, RunStatus::Failed).expect("end");

        let run = t.get_run(&id).expect("get");
        assert_eq!(run.status, RunStatus::Failed);
        // Params logged before the failure are retained
        assert_eq!(run.params.get("penalty").map(String::as_str), Some("l1"));
    }

    #[test]
    fn test_logging_to_closed_run_rejected() {
        let mut t = tracker();
        let id = t.start_run(None).expect("start");
        t.end_run(&id, RunStatus::Completed).expect("end");

        let err = t.log_metric(&id, "AUC", 0.5, 0).expect_err("must reject");
        assert!(matches!(err, TrackingError::RunNotActive(_)));
    }

    #[test]
    fn test_ending_unknown_run_rejected() {
        let mut t = tracker();
        let err = t
            .end_run("run-99", RunStatus::Completed)
            .expect_err("must reject");
        assert!(matches!(err, TrackingError::RunNotFound(_)));
    }

    #[test]
    fn test_run_ids_are_sequential() {
        let mut t = tracker();
        assert_eq!(t.start_run(None).expect("start"), "run-1");
        assert_eq!(t.start_run(None).expect("start"), "run-2");
        assert_eq!(t.start_run(None).expect("start"), "run-3");
    }

    #[test]
    fn test_experiment_tags_inherited() {
        let mut t = tracker();
        t.add_tag("team", "ml");
        let id = t.start_run(None).expect("start");
        let run = t.get_run(&id).expect("get");
        assert_eq!(run.tags.get("team").map(String::as_str), Some("ml"));
        assert_eq!(run.experiment, "test-experiment");
    }

    #[test]
    fn test_list_runs_merges_active_and_persisted() {
        let mut t = tracker();
        let first = t.start_run(None).expect("start");
        t.end_run(&first, RunStatus::Completed).expect("end");
        let _second = t.start_run(None).expect("start");

        let runs = t.list_runs().expect("list");
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].run_id, "run-1");
        assert_eq!(runs[0].status, RunStatus::Completed);
        assert_eq!(runs[1].run_id, "run-2");
        assert_eq!(runs[1].status, RunStatus::Active);
    }

    #[test]
    fn test_error_display() {
        let err = TrackingError::RunNotActive("run-7".to_string());
        assert_eq!(err.to_string(), "Run is not active: run-7");
    }

    #[test]
    fn test_get_run_distinguishes_absence_from_store_failure() {
        use super::storage::JsonRunStore;
        use tempfile::TempDir;

        let dir = TempDir::new().expect("temp dir");
        std::fs::write(dir.path().join("run-1.json"), "not json").expect("write");
        let t = ExperimentTracker::new("exp", JsonRunStore::new(dir.path()));

        // Corrupt persisted state is a store failure, not absence.
        let err = t.get_run("run-1").expect_err("corrupt run must fail");
        assert!(matches!(err, TrackingError::Store(StoreError::Json(_))));

        let err = t.get_run("run-9").expect_err("absent run must fail");
        assert!(matches!(err, TrackingError::RunNotFound(id) if id == "run-9"));
    }

    #[test]
    fn test_autolog_captures_estimator_and_fit() {
        use crate::model::{LogisticRegression, Penalty};
        use ndarray::array;

        let x = array![[-2.0], [-1.0], [1.0], [2.0]];
        let y = array![0.0, 0.0, 1.0, 1.0];
        let estimator = LogisticRegression::new(0.5, Penalty::L1).expect("estimator");
        let model = estimator.fit(&x, &y).expect("fit");

        let mut t = tracker();
        let id = t.start_run(None).expect("start");
        autolog_fit(&mut t, &id, &estimator, &model).expect("autolog");

        let run = t.get_run(&id).expect("get");
        assert_eq!(run.params.get("solver").map(String::as_str), Some("gd"));
        assert_eq!(run.params.get("C").map(String::as_str), Some("0.5"));
        assert_eq!(run.params.get("penalty").map(String::as_str), Some("l1"));
        assert!(run.params.contains_key("max_iter"));
        assert!(run.params.contains_key("n_iter"));
    }
}
