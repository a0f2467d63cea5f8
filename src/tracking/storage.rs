//! Run persistence
//!
//! [`RunStore`] implementations: JSON files on disk for the CLI, an
//! in-memory map for tests.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::Run;

/// Errors from run persistence
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run not found: {0}")]
    RunNotFound(String),
}

/// Result alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Persistence boundary for tracked runs
pub trait RunStore {
    /// Save (or overwrite) a run
    fn save_run(&mut self, run: &Run) -> Result<()>;

    /// Load a run by its ID
    fn load_run(&self, run_id: &str) -> Result<Run>;

    /// List all stored runs
    fn list_runs(&self) -> Result<Vec<Run>>;
}

/// Directory of `{run_id}.json` files, one per run
///
/// # Example
///
/// ```no_run
/// use lanzar::tracking::storage::JsonRunStore;
///
/// let store = JsonRunStore::new("runs");
/// ```
#[derive(Debug)]
pub struct JsonRunStore {
    dir: PathBuf,
}

impl JsonRunStore {
    /// Point the store at a directory; created lazily on first save
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn run_path(&self, run_id: &str) -> PathBuf {
        self.dir.join(format!("{run_id}.json"))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        Ok(())
    }
}

impl RunStore for JsonRunStore {
    fn save_run(&mut self, run: &Run) -> Result<()> {
        self.ensure_dir()?;
        let json = serde_json::to_string_pretty(run)?;
        fs::write(self.run_path(&run.run_id), json)?;
        Ok(())
    }

    fn load_run(&self, run_id: &str) -> Result<Run> {
        let path = self.run_path(run_id);
        if !path.exists() {
            return Err(StoreError::RunNotFound(run_id.to_string()));
        }
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn list_runs(&self) -> Result<Vec<Run>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut runs = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                let json = fs::read_to_string(&path)?;
                runs.push(serde_json::from_str(&json)?);
            }
        }
        runs.sort_by(|a: &Run, b: &Run| a.run_id.cmp(&b.run_id));
        Ok(runs)
    }
}

/// In-memory store for tests. No persistence.
#[derive(Debug, Default)]
pub struct InMemoryRunStore {
    runs: HashMap<String, Run>,
}

impl InMemoryRunStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RunStore for InMemoryRunStore {
    fn save_run(&mut self, run: &Run) -> Result<()> {
        self.runs.insert(run.run_id.clone(), run.clone());
        Ok(())
    }

    fn load_run(&self, run_id: &str) -> Result<Run> {
        self.runs
            .get(run_id)
            .cloned()
            .ok_or_else(|| StoreError::RunNotFound(run_id.to_string()))
    }

    fn list_runs(&self) -> Result<Vec<Run>> {
        let mut runs: Vec<Run> = self.runs.values().cloned().collect();
        runs.sort_by(|a, b| a.run_id.cmp(&b.run_id));
        Ok(runs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::{ExperimentTracker, RunStatus};
    use tempfile::TempDir;

    #[test]
    fn test_json_store_round_trip() {
        let dir = TempDir::new().expect("temp dir");
        let store = JsonRunStore::new(dir.path());
        let mut tracker = ExperimentTracker::new("exp", store);

        let id = tracker.start_run(Some("persisted")).expect("start");
        tracker.log_param(&id, "penalty", "l2").expect("param");
        tracker.log_metric(&id, "AUC", 0.91, 0).expect("metric");
        tracker.end_run(&id, RunStatus::Completed).expect("end");

        // Reload through a fresh store pointed at the same directory
        let fresh = JsonRunStore::new(dir.path());
        let run = fresh.load_run(&id).expect("load");
        assert_eq!(run.run_name.as_deref(), Some("persisted"));
        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(run.last_metric("AUC"), Some(0.91));
        assert_eq!(run.params.get("penalty").map(String::as_str), Some("l2"));
    }

    #[test]
    fn test_json_store_lists_sorted() {
        let dir = TempDir::new().expect("temp dir");
        let mut tracker = ExperimentTracker::new("exp", JsonRunStore::new(dir.path()));
        for _ in 0..3 {
            let id = tracker.start_run(None).expect("start");
            tracker.end_run(&id, RunStatus::Completed).expect("end");
        }

        let runs = JsonRunStore::new(dir.path()).list_runs().expect("list");
        let ids: Vec<&str> = runs.iter().map(|r| r.run_id.as_str()).collect();
        assert_eq!(ids, vec!["run-1", "run-2", "run-3"]);
    }

    #[test]
    fn test_missing_run_not_found() {
        let dir = TempDir::new().expect("temp dir");
        let store = JsonRunStore::new(dir.path());
        assert!(matches!(
            store.load_run("run-9"),
            Err(StoreError::RunNotFound(_))
        ));
    }

    #[test]
    fn test_list_on_missing_dir_is_empty() {
        let store = JsonRunStore::new("/nonexistent/tracking/dir");
        assert!(store.list_runs().expect("list").is_empty());
    }

    #[test]
    fn test_corrupt_file_surfaces_json_error() {
        let dir = TempDir::new().expect("temp dir");
        std::fs::write(dir.path().join("run-1.json"), "not json").expect("write");
        let store = JsonRunStore::new(dir.path());
        assert!(matches!(store.load_run("run-1"), Err(StoreError::Json(_))));
    }
}
