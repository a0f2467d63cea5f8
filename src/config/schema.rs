//! YAML schema for submission configs
//!
//! One file describes everything a submission needs: the workspace, the
//! three resources to resolve or create, the command job, and an optional
//! sweep section. Sections convert into the `platform`/`sweep` domain
//! types; serde fills conventional defaults so minimal configs stay short.
//!
//! ```yaml
//! workspace:
//!   subscription_id: 00000000-0000-0000-0000-000000000000
//!   resource_group: ml-rg
//!   workspace_name: ml-ws
//! experiment_name: diabetes-custom-training
//! display_name: diabetes-train-autolog
//! data:
//!   name: diabetes-file
//!   path: diabetes-data/diabetes.csv
//! compute:
//!   name: aml-cluster
//!   size: Standard_DS3_v2
//!   max_instances: 2
//! environment:
//!   name: sklearn-env-custom-training
//!   image: mcr.microsoft.com/azureml/openmpi4.1.0-ubuntu20.04:latest
//!   conda_file: conda.yml
//! job:
//!   code: ./src
//!   command: lanzar train --training_data ${{inputs.input_data}}
//!   inputs:
//!     input_data:
//!       kind: uri_file
//!       path: azureml:diabetes-file:1
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};
use crate::platform::job::{CommandJob, InputBinding};
use crate::platform::resources::{
    ComputeSpec, ComputeTier, DataAssetKind, DataAssetSpec, EnvironmentSpec, ResourceId,
};
use crate::platform::Workspace;
use crate::sweep::{
    BanditPolicy, Goal, SamplingAlgorithm, SearchSpace, SweepLimits, SweepSpec,
};

fn default_version() -> String {
    "1".to_string()
}

fn default_code() -> PathBuf {
    PathBuf::from("./src")
}

fn default_max_instances() -> u32 {
    1
}

fn default_idle_seconds() -> u64 {
    60
}

fn default_timeout_seconds() -> u64 {
    3600
}

/// Complete submission configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitConfig {
    pub workspace: Workspace,
    pub experiment_name: String,
    pub display_name: String,
    pub data: DataSection,
    pub compute: ComputeSection,
    pub environment: EnvironmentSection,
    pub job: JobSection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sweep: Option<SweepSection>,
}

/// Data asset registration section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSection {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub kind: DataAssetKind,
    pub path: String,
}

impl DataSection {
    #[must_use]
    pub fn to_spec(&self) -> DataAssetSpec {
        DataAssetSpec::new(
            ResourceId::new(&self.name, &self.version),
            self.kind,
            &self.path,
        )
    }
}

/// Compute cluster section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputeSection {
    pub name: String,
    pub size: String,
    #[serde(default)]
    pub min_instances: u32,
    #[serde(default = "default_max_instances")]
    pub max_instances: u32,
    #[serde(default = "default_idle_seconds")]
    pub idle_seconds_before_scale_down: u64,
    #[serde(default)]
    pub tier: ComputeTier,
}

impl ComputeSection {
    #[must_use]
    pub fn to_spec(&self) -> ComputeSpec {
        ComputeSpec {
            name: self.name.clone(),
            size: self.size.clone(),
            min_instances: self.min_instances,
            max_instances: self.max_instances,
            idle_seconds_before_scale_down: self.idle_seconds_before_scale_down,
            tier: self.tier,
        }
    }
}

/// Execution environment section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSection {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conda_file: Option<String>,
}

impl EnvironmentSection {
    #[must_use]
    pub fn to_spec(&self) -> EnvironmentSpec {
        let mut spec = EnvironmentSpec::new(
            ResourceId::new(&self.name, &self.version),
            &self.image,
        );
        if let Some(conda) = &self.conda_file {
            spec = spec.with_conda_file(conda);
        }
        spec
    }

    /// The `name:version` reference jobs carry
    #[must_use]
    pub fn reference(&self) -> String {
        format!("{}:{}", self.name, self.version)
    }
}

/// Command job section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSection {
    #[serde(default = "default_code")]
    pub code: PathBuf,
    pub command: String,
    #[serde(default)]
    pub inputs: BTreeMap<String, InputBinding>,
}

/// Hyperparameter sweep section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSection {
    #[serde(default)]
    pub sampling: SamplingAlgorithm,
    pub metric: String,
    #[serde(default)]
    pub goal: Goal,
    pub max_total_trials: usize,
    /// Wall-clock budget in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub early_termination: Option<BanditPolicy>,
    pub search_space: SearchSpace,
}

impl SweepSection {
    #[must_use]
    pub fn to_spec(&self) -> SweepSpec {
        SweepSpec {
            sampling: self.sampling,
            primary_metric: self.metric.clone(),
            goal: self.goal,
            limits: SweepLimits::new(self.max_total_trials, Duration::from_secs(self.timeout)),
            early_termination: self.early_termination,
            search_space: self.search_space.clone(),
        }
    }
}

impl SubmitConfig {
    /// Build the command job described by the config
    pub fn command_job(&self) -> Result<CommandJob> {
        let mut builder = CommandJob::builder()
            .code(self.job.code.clone())
            .command(&self.job.command)
            .environment(self.environment.reference())
            .compute(&self.compute.name)
            .display_name(&self.display_name)
            .experiment_name(&self.experiment_name);
        for (name, binding) in &self.job.inputs {
            builder = builder.input(name, binding.clone());
        }
        Ok(builder.build()?)
    }

    /// The sweep specification, if the config has a sweep section
    #[must_use]
    pub fn sweep_spec(&self) -> Option<SweepSpec> {
        self.sweep.as_ref().map(SweepSection::to_spec)
    }

    /// Cross-field validation beyond what serde enforces
    ///
    /// Checks the command/input pairing by building the job, and the sweep
    /// section (when present) by validating its spec.
    pub fn validate(&self) -> Result<()> {
        if self.experiment_name.is_empty() {
            return Err(ConfigError::Invalid("experiment_name is empty".to_string()));
        }
        if self.display_name.is_empty() {
            return Err(ConfigError::Invalid("display_name is empty".to_string()));
        }
        let job = self.command_job()?;
        if let Some(spec) = self.sweep_spec() {
            spec.validate()?;
            for name in spec.search_space.names() {
                if job.inputs.contains_key(name) {
                    return Err(ConfigError::Invalid(format!(
                        "swept parameter '{name}' collides with a fixed job input"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Load and parse a submission config from a YAML file
pub fn load_submit_config(path: impl AsRef<Path>) -> Result<SubmitConfig> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&text).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}
