//! Lanzar: Training Job Submission & Tabular Training
//!
//! Library + CLI for launching model-training work against a managed ML
//! platform and for running the training routine itself. The submission
//! side resolves named, versioned platform resources (data assets, compute
//! clusters, environments) with an explicit find-then-create flow, builds
//! command jobs from `${{inputs.name}}` templates, and can wrap a job in a
//! hyperparameter sweep with bandit early termination. The training side
//! loads a tabular CSV, makes a deterministic train/test split, fits a
//! logistic-regression classifier, and records accuracy and ROC AUC to a
//! pluggable tracking store.
//!
//! # Architecture
//!
//! - **`data`**: CSV ingestion with schema validation, seeded train/test split
//! - **`model`**: binary logistic regression with `C`/`l1`/`l2` regularization
//! - **`eval`**: accuracy, ROC AUC, ROC curve
//! - **`tracking`**: experiment runs with params/metrics, JSON or in-memory stores
//! - **`train`**: the end-to-end training routine with a scoped tracking run
//! - **`platform`**: the [`Platform`](platform::Platform) client trait,
//!   resolve-or-create helpers, command/sweep/automl job specs
//! - **`sweep`**: search space bindings, sampling, bandit termination policy
//! - **`config`**: YAML submission configs and the clap CLI surface
//!
//! # Example
//!
//! ```
//! use lanzar::platform::resources::{DataAssetKind, DataAssetSpec, ResourceId};
//! use lanzar::platform::{ensure_data_asset, InMemoryPlatform};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = InMemoryPlatform::new();
//! let spec = DataAssetSpec::new(
//!     ResourceId::new("diabetes-file", "1"),
//!     DataAssetKind::UriFile,
//!     "data/diabetes.csv",
//! );
//!
//! // First call creates, second call resolves the existing registration.
//! let created = ensure_data_asset(&mut client, &spec)?;
//! let resolved = ensure_data_asset(&mut client, &spec)?;
//! assert_eq!(created.id, resolved.id);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod data;
pub mod eval;
pub mod model;
pub mod platform;
pub mod sweep;
pub mod tracking;
pub mod train;

pub use data::{load_table, train_test_split, DataError, Split, TabularData};
pub use eval::{accuracy, roc_auc_score, roc_curve, EvalError};
pub use model::{LogisticModel, LogisticRegression, ModelError, Penalty};
pub use platform::{Platform, PlatformError};
pub use sweep::{BanditPolicy, Goal, SearchSpace, SweepError, SweepSpec};
pub use tracking::{ExperimentTracker, RunStatus, TrackingError};
pub use train::{run_training, TrainParams, TrainReport};

/// Top-level error wrapping the per-module error types.
///
/// Module APIs return their own error enums; this wrapper exists for code
/// that drives a whole workflow (the training routine, the submission
/// orchestration) and needs to propagate any of them with `?`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Data(#[from] data::DataError),

    #[error(transparent)]
    Model(#[from] model::ModelError),

    #[error(transparent)]
    Eval(#[from] eval::EvalError),

    #[error(transparent)]
    Tracking(#[from] tracking::TrackingError),

    #[error(transparent)]
    Platform(#[from] platform::PlatformError),

    #[error(transparent)]
    Sweep(#[from] sweep::SweepError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

/// Result alias for whole-workflow operations
pub type Result<T> = std::result::Result<T, Error>;
