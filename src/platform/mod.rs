//! The managed ML platform boundary
//!
//! [`Platform`] is the explicit client object threaded through every
//! submission call; there is no ambient global client. Resource resolution
//! is a two-step capability: `find_*` returns `Ok(None)` for an absent
//! resource (absence is a normal outcome, not an error), and `create_*`
//! registers one. The [`ensure_data_asset`]-family helpers compose the two
//! into the idempotent resolve-or-create flow the submitters use.
//!
//! Submission is one-shot: [`Platform::submit`] hands a job to the external
//! scheduler and returns a [`RunHandle`] for later polling. No local
//! execution, progress tracking, or retries.

pub mod job;
mod memory;
pub mod resources;

pub use memory::InMemoryPlatform;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use job::{AutoClassificationJob, CommandJob};
use resources::{
    ComputeHandle, ComputeSpec, DataAssetHandle, DataAssetSpec, EnvironmentHandle, EnvironmentSpec,
};
use crate::sweep::SweepJob;

/// Errors from platform interaction and job building
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("Failed to create {kind} '{id}': {reason}")]
    CreationFailed {
        kind: &'static str,
        id: String,
        reason: String,
    },

    #[error("{kind} '{id}' is already registered")]
    AlreadyExists { kind: &'static str, id: String },

    #[error("Command template is empty")]
    EmptyCommand,

    #[error("Placeholder '${{{{inputs.{name}}}}}' has no input binding")]
    UnboundInput { name: String },

    #[error("Input '{name}' is bound but never referenced by the command")]
    UnusedInput { name: String },

    #[error("Platform backend error: {0}")]
    Backend(String),
}

/// Result alias for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;

/// Workspace coordinates the client operates against
///
/// Replaces config-file-discovered ambient client state: the workspace is
/// loaded once and passed along explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub subscription_id: String,
    pub resource_group: String,
    pub workspace_name: String,
}

/// Terminal-side status of a submission
///
/// Only `Submitted` is produced locally; later states belong to the
/// external scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionStatus {
    Submitted,
}

/// Receipt for a submitted job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunHandle {
    pub id: String,
    pub display_name: String,
    pub experiment: String,
    pub submitted_at: DateTime<Utc>,
    pub status: SubmissionStatus,
}

/// Any job this crate can hand to the scheduler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JobSubmission {
    Command(CommandJob),
    Sweep(SweepJob),
    AutoMl(AutoClassificationJob),
}

impl JobSubmission {
    /// Name shown in run listings
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            JobSubmission::Command(job) => &job.display_name,
            JobSubmission::Sweep(job) => &job.trial.display_name,
            JobSubmission::AutoMl(job) => &job.experiment_name,
        }
    }

    /// Experiment the run is recorded under
    #[must_use]
    pub fn experiment_name(&self) -> &str {
        match self {
            JobSubmission::Command(job) => &job.experiment_name,
            JobSubmission::Sweep(job) => &job.trial.experiment_name,
            JobSubmission::AutoMl(job) => &job.experiment_name,
        }
    }
}

/// Client capabilities of the external platform
///
/// Lookups distinguish "absent" (`Ok(None)`) from transport failure
/// (`Err(Backend)`). Creation of an already-registered identity fails with
/// [`PlatformError::AlreadyExists`]; callers wanting resolve-or-create use
/// the `ensure_*` helpers instead of calling `create_*` blindly.
pub trait Platform {
    fn find_data_asset(&self, name: &str, version: &str) -> Result<Option<DataAssetHandle>>;
    fn create_data_asset(&mut self, spec: &DataAssetSpec) -> Result<DataAssetHandle>;

    fn find_compute(&self, name: &str) -> Result<Option<ComputeHandle>>;
    fn create_compute(&mut self, spec: &ComputeSpec) -> Result<ComputeHandle>;

    fn find_environment(&self, name: &str, version: &str) -> Result<Option<EnvironmentHandle>>;
    fn create_environment(&mut self, spec: &EnvironmentSpec) -> Result<EnvironmentHandle>;

    /// Hand a job to the scheduler; one-shot, no local retry
    fn submit(&mut self, submission: JobSubmission) -> Result<RunHandle>;
}

/// Resolve a data asset by identity, registering it if absent
///
/// Creation failure is fatal to the submission and is not retried.
pub fn ensure_data_asset<P: Platform + ?Sized>(
    client: &mut P,
    spec: &DataAssetSpec,
) -> Result<DataAssetHandle> {
    match client.find_data_asset(&spec.id.name, &spec.id.version)? {
        Some(handle) => Ok(handle),
        None => client.create_data_asset(spec),
    }
}

/// Resolve a compute cluster by name, creating it if absent
pub fn ensure_compute<P: Platform + ?Sized>(
    client: &mut P,
    spec: &ComputeSpec,
) -> Result<ComputeHandle> {
    match client.find_compute(&spec.name)? {
        Some(handle) => Ok(handle),
        None => client.create_compute(spec),
    }
}

/// Resolve an environment by identity, registering it if absent
pub fn ensure_environment<P: Platform + ?Sized>(
    client: &mut P,
    spec: &EnvironmentSpec,
) -> Result<EnvironmentHandle> {
    match client.find_environment(&spec.id.name, &spec.id.version)? {
        Some(handle) => Ok(handle),
        None => client.create_environment(spec),
    }
}

#[cfg(test)]
mod tests {
    use super::resources::{DataAssetKind, ResourceId};
    use super::*;

    fn asset_spec() -> DataAssetSpec {
        DataAssetSpec::new(
            ResourceId::new("diabetes-file", "1"),
            DataAssetKind::UriFile,
            "diabetes-data/diabetes.csv",
        )
    }

    #[test]
    fn test_ensure_creates_missing_asset_exactly_once() {
        let mut client = InMemoryPlatform::new();
        let spec = asset_spec();

        let created = ensure_data_asset(&mut client, &spec).expect("ensure");
        assert_eq!(created.id, spec.id);
        assert_eq!(created.uri, "azureml:diabetes-file:1");
        assert_eq!(client.creation_count(), 1);

        // Second ensure resolves the existing registration.
        let resolved = ensure_data_asset(&mut client, &spec).expect("ensure");
        assert_eq!(resolved.id, created.id);
        assert_eq!(client.creation_count(), 1);
    }

    #[test]
    fn test_ensure_resolves_existing_without_creating() {
        let mut client = InMemoryPlatform::new();
        let spec = asset_spec();
        client.create_data_asset(&spec).expect("create");
        assert_eq!(client.creation_count(), 1);

        let handle = ensure_data_asset(&mut client, &spec).expect("ensure");
        assert_eq!(handle.id, spec.id);
        assert_eq!(client.creation_count(), 1);
    }

    #[test]
    fn test_version_is_part_of_identity() {
        let mut client = InMemoryPlatform::new();
        let v1 = asset_spec();
        let mut v2 = asset_spec();
        v2.id.version = "2".to_string();

        ensure_data_asset(&mut client, &v1).expect("ensure v1");
        ensure_data_asset(&mut client, &v2).expect("ensure v2");
        assert_eq!(client.creation_count(), 2);
    }

    #[test]
    fn test_creation_failure_is_fatal_not_retried() {
        let mut client = InMemoryPlatform::new();
        client.fail_creations(true);

        let err = ensure_data_asset(&mut client, &asset_spec()).expect_err("must fail");
        assert!(matches!(err, PlatformError::CreationFailed { .. }));
        assert_eq!(client.creation_count(), 0);
    }

    #[test]
    fn test_direct_duplicate_create_rejected() {
        let mut client = InMemoryPlatform::new();
        let spec = asset_spec();
        client.create_data_asset(&spec).expect("create");
        assert!(matches!(
            client.create_data_asset(&spec),
            Err(PlatformError::AlreadyExists { kind: "data asset", .. })
        ));
    }

    #[test]
    fn test_ensure_compute_and_environment() {
        let mut client = InMemoryPlatform::new();

        let compute = ComputeSpec::new("aml-cluster", "Standard_DS3_v2").with_instances(0, 2);
        let handle = ensure_compute(&mut client, &compute).expect("ensure compute");
        assert_eq!(handle.name, "aml-cluster");

        let env = EnvironmentSpec::new(
            ResourceId::new("sklearn-env-custom-training", "1"),
            "mcr.microsoft.com/azureml/openmpi4.1.0-ubuntu20.04:latest",
        )
        .with_conda_file("conda.yml");
        let handle = ensure_environment(&mut client, &env).expect("ensure env");
        assert_eq!(handle.id.name, "sklearn-env-custom-training");

        assert_eq!(client.creation_count(), 2);
        ensure_compute(&mut client, &compute).expect("idempotent");
        ensure_environment(&mut client, &env).expect("idempotent");
        assert_eq!(client.creation_count(), 2);
    }

    #[test]
    fn test_error_display() {
        let err = PlatformError::CreationFailed {
            kind: "compute",
            id: "aml-cluster".to_string(),
            reason: "quota exceeded".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to create compute 'aml-cluster': quota exceeded"
        );
        let err = PlatformError::UnboundInput {
            name: "input_data".to_string(),
        };
        assert!(err.to_string().contains("${{inputs.input_data}}"));
    }
}
