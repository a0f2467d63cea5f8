//! Configuration: CLI argument types and the YAML submission schema

mod cli;
mod schema;

pub use cli::{
    parse_args, Cli, Command, RunsArgs, SubmitArgs, SweepArgs, TrainArgs, ValidateArgs,
};
pub use schema::{
    load_submit_config, ComputeSection, DataSection, EnvironmentSection, JobSection, SubmitConfig,
    SweepSection,
};

use std::path::PathBuf;

/// Errors from config loading and validation
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Config has no sweep section")]
    MissingSweep,

    #[error(transparent)]
    Platform(#[from] crate::platform::PlatformError),

    #[error(transparent)]
    Sweep(#[from] crate::sweep::SweepError),
}

/// Result alias for config operations
pub type Result<T> = std::result::Result<T, ConfigError>;
