//! Platform resource identities, specifications, and handles
//!
//! A submission references three kinds of named platform resources: a data
//! asset, a compute cluster, and an execution environment. Specs describe
//! what to register; handles are what the platform returns once a resource
//! exists. Data assets and environments are versioned; compute clusters are
//! identified by name alone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name + version registration identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId {
    pub name: String,
    pub version: String,
}

impl ResourceId {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// The `azureml:{name}:{version}` reference form jobs use
    #[must_use]
    pub fn uri(&self) -> String {
        format!("azureml:{}:{}", self.name, self.version)
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.name, self.version)
    }
}

/// Shape of a registered data asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataAssetKind {
    /// A single file addressed by URI
    #[default]
    UriFile,
    /// A tabular dataset directory with an MLTable definition
    MlTable,
}

/// Specification for registering a data asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataAssetSpec {
    pub id: ResourceId,
    pub kind: DataAssetKind,
    /// Local or remote path the asset points at
    pub path: String,
}

impl DataAssetSpec {
    pub fn new(id: ResourceId, kind: DataAssetKind, path: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            path: path.into(),
        }
    }
}

/// Billing tier for a compute cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComputeTier {
    #[default]
    Dedicated,
    LowPriority,
}

/// Specification for creating a compute cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputeSpec {
    pub name: String,
    /// VM size, e.g. `Standard_DS3_v2`
    pub size: String,
    pub min_instances: u32,
    pub max_instances: u32,
    pub idle_seconds_before_scale_down: u64,
    pub tier: ComputeTier,
}

impl ComputeSpec {
    /// Single-node dedicated cluster that scales to zero when idle
    pub fn new(name: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: size.into(),
            min_instances: 0,
            max_instances: 1,
            idle_seconds_before_scale_down: 60,
            tier: ComputeTier::Dedicated,
        }
    }

    #[must_use]
    pub fn with_instances(mut self, min: u32, max: u32) -> Self {
        self.min_instances = min;
        self.max_instances = max;
        self
    }

    #[must_use]
    pub fn with_tier(mut self, tier: ComputeTier) -> Self {
        self.tier = tier;
        self
    }
}

/// Specification for registering an execution environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSpec {
    pub id: ResourceId,
    /// Base container image
    pub image: String,
    /// Optional conda dependency file layered on the image
    pub conda_file: Option<String>,
}

impl EnvironmentSpec {
    pub fn new(id: ResourceId, image: impl Into<String>) -> Self {
        Self {
            id,
            image: image.into(),
            conda_file: None,
        }
    }

    #[must_use]
    pub fn with_conda_file(mut self, path: impl Into<String>) -> Self {
        self.conda_file = Some(path.into());
        self
    }
}

/// A registered data asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataAssetHandle {
    pub id: ResourceId,
    pub kind: DataAssetKind,
    /// Platform reference for binding the asset into jobs
    pub uri: String,
    pub created_at: DateTime<Utc>,
}

/// A provisioned compute cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputeHandle {
    pub name: String,
    pub size: String,
    pub created_at: DateTime<Utc>,
}

/// A registered environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentHandle {
    pub id: ResourceId,
    pub image: String,
    pub created_at: DateTime<Utc>,
}
