//! In-memory platform double
//!
//! Registers resources in maps keyed by identity and records submissions.
//! Backs the CLI's offline mode and every submission test; the creation
//! counter makes resolve-or-create idempotence observable.

use std::collections::BTreeMap;

use chrono::Utc;

use super::resources::{
    ComputeHandle, ComputeSpec, DataAssetHandle, DataAssetSpec, EnvironmentHandle, EnvironmentSpec,
};
use super::{JobSubmission, Platform, PlatformError, Result, RunHandle, SubmissionStatus, Workspace};

/// A [`Platform`] that keeps everything in process memory
#[derive(Debug, Default)]
pub struct InMemoryPlatform {
    workspace: Option<Workspace>,
    data_assets: BTreeMap<(String, String), DataAssetHandle>,
    computes: BTreeMap<String, ComputeHandle>,
    environments: BTreeMap<(String, String), EnvironmentHandle>,
    submissions: Vec<JobSubmission>,
    creations: usize,
    fail_creations: bool,
    next_run: u64,
}

impl InMemoryPlatform {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A client scoped to the given workspace coordinates
    #[must_use]
    pub fn for_workspace(workspace: Workspace) -> Self {
        Self {
            workspace: Some(workspace),
            ..Self::default()
        }
    }

    /// Workspace the client operates against, if one was given
    #[must_use]
    pub fn workspace(&self) -> Option<&Workspace> {
        self.workspace.as_ref()
    }

    /// Total successful resource creations across all kinds
    #[must_use]
    pub fn creation_count(&self) -> usize {
        self.creations
    }

    /// Make every subsequent `create_*` fail, for fatal-error tests
    pub fn fail_creations(&mut self, fail: bool) {
        self.fail_creations = fail;
    }

    /// Jobs handed to [`Platform::submit`], in order
    #[must_use]
    pub fn submissions(&self) -> &[JobSubmission] {
        &self.submissions
    }

    fn check_creation(&self, kind: &'static str, id: &str) -> Result<()> {
        if self.fail_creations {
            return Err(PlatformError::CreationFailed {
                kind,
                id: id.to_string(),
                reason: "creation disabled".to_string(),
            });
        }
        Ok(())
    }
}

impl Platform for InMemoryPlatform {
    fn find_data_asset(&self, name: &str, version: &str) -> Result<Option<DataAssetHandle>> {
        Ok(self
            .data_assets
            .get(&(name.to_string(), version.to_string()))
            .cloned())
    }

    fn create_data_asset(&mut self, spec: &DataAssetSpec) -> Result<DataAssetHandle> {
        self.check_creation("data asset", &spec.id.to_string())?;
        let key = (spec.id.name.clone(), spec.id.version.clone());
        if self.data_assets.contains_key(&key) {
            return Err(PlatformError::AlreadyExists {
                kind: "data asset",
                id: spec.id.to_string(),
            });
        }
        let handle = DataAssetHandle {
            id: spec.id.clone(),
            kind: spec.kind,
            uri: spec.id.uri(),
            created_at: Utc::now(),
        };
        self.data_assets.insert(key, handle.clone());
        self.creations += 1;
        Ok(handle)
    }

    fn find_compute(&self, name: &str) -> Result<Option<ComputeHandle>> {
        Ok(self.computes.get(name).cloned())
    }

    fn create_compute(&mut self, spec: &ComputeSpec) -> Result<ComputeHandle> {
        self.check_creation("compute", &spec.name)?;
        if self.computes.contains_key(&spec.name) {
            return Err(PlatformError::AlreadyExists {
                kind: "compute",
                id: spec.name.clone(),
            });
        }
        let handle = ComputeHandle {
            name: spec.name.clone(),
            size: spec.size.clone(),
            created_at: Utc::now(),
        };
        self.computes.insert(spec.name.clone(), handle.clone());
        self.creations += 1;
        Ok(handle)
    }

    fn find_environment(&self, name: &str, version: &str) -> Result<Option<EnvironmentHandle>> {
        Ok(self
            .environments
            .get(&(name.to_string(), version.to_string()))
            .cloned())
    }

    fn create_environment(&mut self, spec: &EnvironmentSpec) -> Result<EnvironmentHandle> {
        self.check_creation("environment", &spec.id.to_string())?;
        let key = (spec.id.name.clone(), spec.id.version.clone());
        if self.environments.contains_key(&key) {
            return Err(PlatformError::AlreadyExists {
                kind: "environment",
                id: spec.id.to_string(),
            });
        }
        let handle = EnvironmentHandle {
            id: spec.id.clone(),
            image: spec.image.clone(),
            created_at: Utc::now(),
        };
        self.environments.insert(key, handle.clone());
        self.creations += 1;
        Ok(handle)
    }

    fn submit(&mut self, submission: JobSubmission) -> Result<RunHandle> {
        self.next_run += 1;
        let handle = RunHandle {
            id: format!("job-{}", self.next_run),
            display_name: submission.display_name().to_string(),
            experiment: submission.experiment_name().to_string(),
            submitted_at: Utc::now(),
            status: SubmissionStatus::Submitted,
        };
        self.submissions.push(submission);
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::super::job::{CommandJob, InputBinding};
    use super::super::resources::{DataAssetKind, ResourceId};
    use super::*;

    #[test]
    fn test_find_absent_is_none_not_error() {
        let client = InMemoryPlatform::new();
        assert!(client
            .find_data_asset("nope", "1")
            .expect("lookup")
            .is_none());
        assert!(client.find_compute("nope").expect("lookup").is_none());
        assert!(client
            .find_environment("nope", "1")
            .expect("lookup")
            .is_none());
    }

    #[test]
    fn test_created_asset_is_findable() {
        let mut client = InMemoryPlatform::new();
        let spec = DataAssetSpec::new(
            ResourceId::new("diabetes", "3"),
            DataAssetKind::MlTable,
            "diabetes-data/",
        );
        client.create_data_asset(&spec).expect("create");

        let found = client
            .find_data_asset("diabetes", "3")
            .expect("lookup")
            .expect("present");
        assert_eq!(found.kind, DataAssetKind::MlTable);
        assert_eq!(found.uri, "azureml:diabetes:3");
    }

    #[test]
    fn test_submit_records_and_numbers_jobs() {
        let mut client = InMemoryPlatform::new();
        let job = CommandJob::builder()
            .code("./src")
            .command("lanzar train --training_data ${{inputs.input_data}}")
            .input("input_data", InputBinding::uri_file("azureml:diabetes-file:1"))
            .environment("sklearn-env:1")
            .compute("aml-cluster")
            .display_name("diabetes-train-autolog")
            .experiment_name("diabetes-custom-training")
            .build()
            .expect("valid job");

        let first = client
            .submit(JobSubmission::Command(job.clone()))
            .expect("submit");
        let second = client.submit(JobSubmission::Command(job)).expect("submit");

        assert_eq!(first.id, "job-1");
        assert_eq!(second.id, "job-2");
        assert_eq!(first.status, SubmissionStatus::Submitted);
        assert_eq!(first.display_name, "diabetes-train-autolog");
        assert_eq!(first.experiment, "diabetes-custom-training");
        assert_eq!(client.submissions().len(), 2);
    }
}
