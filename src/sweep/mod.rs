//! Hyperparameter sweep specifications
//!
//! Everything the external scheduler needs to run a search: the parameter
//! [`SearchSpace`], the sampling algorithm, trial/time limits, and an
//! optional [`BanditPolicy`] for early termination. This crate only builds
//! and validates the specification; trial execution, parallelism, and the
//! search itself belong to the platform.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use lanzar::sweep::{
//!     attach_sweep, BanditPolicy, Goal, ParameterBinding, ParameterValue,
//!     SamplingAlgorithm, SearchSpace, SweepLimits, SweepSpec,
//! };
//! use lanzar::platform::job::{CommandJob, InputBinding};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let job = CommandJob::builder()
//!     .code("./src")
//!     .command("lanzar train --training_data ${{inputs.input_data}}")
//!     .input("input_data", InputBinding::uri_file("azureml:diabetes-file:1"))
//!     .environment("sklearn-env:1")
//!     .compute("aml-cluster")
//!     .display_name("diabetes-sweep")
//!     .experiment_name("diabetes-hyperdrive")
//!     .build()?;
//!
//! let mut space = SearchSpace::new();
//! space.insert("c", ParameterBinding::Uniform { low: 0.05, high: 5.0 });
//! space.insert(
//!     "penalty",
//!     ParameterBinding::Choice {
//!         options: vec![
//!             ParameterValue::Text("l1".into()),
//!             ParameterValue::Text("l2".into()),
//!         ],
//!     },
//! );
//!
//! let spec = SweepSpec {
//!     sampling: SamplingAlgorithm::Random { seed: 0 },
//!     primary_metric: "AUC".to_string(),
//!     goal: Goal::Maximize,
//!     limits: SweepLimits::new(10, Duration::from_secs(7200)),
//!     early_termination: Some(BanditPolicy::new(3, 0.2, 4)?),
//!     search_space: space,
//! };
//!
//! let sweep_job = attach_sweep(job, spec)?;
//! assert_eq!(sweep_job.spec.limits.max_total_trials, 10);
//! # Ok(())
//! # }
//! ```

mod bandit;
mod space;

pub use bandit::{BanditPolicy, TrialVerdict};
pub use space::{Assignment, ParameterBinding, ParameterValue, SearchSpace};

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::platform::job::CommandJob;

/// Errors from sweep specification building
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error("Search space has no parameters")]
    EmptySpace,

    #[error("Parameter name is empty")]
    EmptyName,

    #[error("Invalid range for '{name}': [{low}, {high})")]
    InvalidRange { name: String, low: f64, high: f64 },

    #[error("Choice set for '{name}' is empty")]
    EmptyChoice { name: String },

    #[error("Non-finite fixed value for '{name}'")]
    NonFiniteValue { name: String },

    #[error("Primary metric name is empty")]
    EmptyMetric,

    #[error("Trial budget must be at least 1")]
    NoTrials,

    #[error("Evaluation interval must be at least 1, got {0}")]
    InvalidInterval(u64),

    #[error("Slack factor must be positive and finite, got {0}")]
    InvalidSlack(f64),

    #[error("Swept parameter '{0}' collides with a fixed input binding")]
    BindingCollision(String),
}

/// Result alias for sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Direction of the primary metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    #[default]
    Maximize,
    Minimize,
}

/// How trial assignments are drawn from the search space
///
/// The drawing itself happens on the platform; Grid and Bayesian carry no
/// local parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum SamplingAlgorithm {
    Random {
        #[serde(default)]
        seed: u64,
    },
    Grid,
    Bayesian,
}

impl Default for SamplingAlgorithm {
    fn default() -> Self {
        SamplingAlgorithm::Random { seed: 0 }
    }
}

/// Caps on the whole sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepLimits {
    /// Total trials across the sweep
    pub max_total_trials: usize,
    /// Wall-clock budget for the whole sweep
    pub timeout: Duration,
}

impl SweepLimits {
    #[must_use]
    pub fn new(max_total_trials: usize, timeout: Duration) -> Self {
        Self {
            max_total_trials,
            timeout,
        }
    }
}

/// Complete sweep specification
///
/// Immutable once attached to a job; the scheduler owns it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSpec {
    pub sampling: SamplingAlgorithm,
    pub primary_metric: String,
    pub goal: Goal,
    pub limits: SweepLimits,
    pub early_termination: Option<BanditPolicy>,
    pub search_space: SearchSpace,
}

impl SweepSpec {
    /// Validate the whole specification
    pub fn validate(&self) -> Result<()> {
        if self.primary_metric.is_empty() {
            return Err(SweepError::EmptyMetric);
        }
        if self.limits.max_total_trials == 0 {
            return Err(SweepError::NoTrials);
        }
        if let Some(policy) = &self.early_termination {
            policy.validate()?;
        }
        self.search_space.validate()
    }
}

/// A command job wrapped with a search strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepJob {
    /// The trial template; swept parameters are appended per assignment
    pub trial: CommandJob,
    pub spec: SweepSpec,
}

/// Wrap a command job in a sweep
///
/// A parameter is bound either as a fixed job input or as a search
/// dimension, never both; collisions are rejected here, at build time.
pub fn attach_sweep(trial: CommandJob, spec: SweepSpec) -> Result<SweepJob> {
    spec.validate()?;
    for name in spec.search_space.names() {
        if trial.inputs.contains_key(name) {
            return Err(SweepError::BindingCollision(name.to_string()));
        }
    }
    Ok(SweepJob { trial, spec })
}
