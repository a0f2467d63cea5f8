//! Job specifications
//!
//! A [`CommandJob`] is the declarative description of one training run:
//! a code directory, a command template with `${{inputs.name}}`
//! placeholders, named input bindings, and references to the environment
//! and compute the job runs on. Building the job cross-checks placeholders
//! against bindings so an unbound or dangling input never reaches the
//! scheduler.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{PlatformError, Result};
use crate::sweep::ParameterValue;

/// A named job input
///
/// Either a file reference (a local path or a registered-asset URI) or a
/// literal scalar passed straight through to the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputBinding {
    UriFile { path: String },
    Literal { value: ParameterValue },
}

impl InputBinding {
    pub fn uri_file(path: impl Into<String>) -> Self {
        InputBinding::UriFile { path: path.into() }
    }

    pub fn literal(value: impl Into<ParameterValue>) -> Self {
        InputBinding::Literal {
            value: value.into(),
        }
    }

    /// The string substituted for the placeholder at execution time
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            InputBinding::UriFile { path } => path.clone(),
            InputBinding::Literal { value } => value.to_string(),
        }
    }
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{\{\s*inputs\.([A-Za-z0-9_]+)\s*\}\}").expect("literal pattern compiles")
    })
}

/// Extract the input names referenced by a command template
#[must_use]
pub fn command_placeholders(command: &str) -> BTreeSet<String> {
    placeholder_pattern()
        .captures_iter(command)
        .map(|c| c[1].to_string())
        .collect()
}

/// A validated command job specification
///
/// Construct through [`CommandJob::builder`]; `build()` is the only path,
/// so an instance always has a consistent command/input pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandJob {
    /// Directory uploaded alongside the job
    pub code: PathBuf,
    /// Command template with `${{inputs.name}}` placeholders
    pub command: String,
    pub inputs: BTreeMap<String, InputBinding>,
    /// Environment reference, `name:version`
    pub environment: String,
    /// Compute cluster name
    pub compute: String,
    pub display_name: String,
    pub experiment_name: String,
}

impl CommandJob {
    #[must_use]
    pub fn builder() -> CommandJobBuilder {
        CommandJobBuilder::default()
    }

    /// The command with every placeholder substituted
    #[must_use]
    pub fn resolved_command(&self) -> String {
        let mut resolved = self.command.clone();
        for (name, binding) in &self.inputs {
            let placeholder = format!("${{{{inputs.{name}}}}}");
            resolved = resolved.replace(&placeholder, &binding.render());
        }
        resolved
    }
}

/// Incremental construction of a [`CommandJob`]
#[derive(Debug, Clone, Default)]
pub struct CommandJobBuilder {
    code: PathBuf,
    command: String,
    inputs: BTreeMap<String, InputBinding>,
    environment: String,
    compute: String,
    display_name: String,
    experiment_name: String,
}

impl CommandJobBuilder {
    #[must_use]
    pub fn code(mut self, code: impl Into<PathBuf>) -> Self {
        self.code = code.into();
        self
    }

    #[must_use]
    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    #[must_use]
    pub fn input(mut self, name: impl Into<String>, binding: InputBinding) -> Self {
        self.inputs.insert(name.into(), binding);
        self
    }

    #[must_use]
    pub fn environment(mut self, reference: impl Into<String>) -> Self {
        self.environment = reference.into();
        self
    }

    #[must_use]
    pub fn compute(mut self, name: impl Into<String>) -> Self {
        self.compute = name.into();
        self
    }

    #[must_use]
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    #[must_use]
    pub fn experiment_name(mut self, name: impl Into<String>) -> Self {
        self.experiment_name = name.into();
        self
    }

    /// Validate and produce the job
    ///
    /// Every placeholder in the command must have a binding, and every
    /// binding must be referenced by a placeholder.
    pub fn build(self) -> Result<CommandJob> {
        if self.command.trim().is_empty() {
            return Err(PlatformError::EmptyCommand);
        }

        let referenced = command_placeholders(&self.command);
        for name in &referenced {
            if !self.inputs.contains_key(name) {
                return Err(PlatformError::UnboundInput { name: name.clone() });
            }
        }
        for name in self.inputs.keys() {
            if !referenced.contains(name) {
                return Err(PlatformError::UnusedInput { name: name.clone() });
            }
        }

        Ok(CommandJob {
            code: self.code,
            command: self.command,
            inputs: self.inputs,
            environment: self.environment,
            compute: self.compute,
            display_name: self.display_name,
            experiment_name: self.experiment_name,
        })
    }
}

/// Trial and time caps for an automated classification job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobLimits {
    pub max_trials: usize,
    pub timeout: Duration,
    pub trial_timeout: Duration,
    pub early_termination_enabled: bool,
}

impl Default for JobLimits {
    /// One-hour budget, 20-minute trials, 4 trials, early termination on
    fn default() -> Self {
        Self {
            max_trials: 4,
            timeout: Duration::from_secs(3600),
            trial_timeout: Duration::from_secs(1200),
            early_termination_enabled: true,
        }
    }
}

/// An automated-ML classification job
///
/// The platform picks models and hyperparameters itself; this spec names
/// the training data, the label column, and the metric to optimize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoClassificationJob {
    pub compute: String,
    pub experiment_name: String,
    /// Registered-asset URI of the training table
    pub training_data: String,
    pub target_column: String,
    pub primary_metric: String,
    pub n_cross_validations: u32,
    pub enable_model_explainability: bool,
    pub limits: JobLimits,
}

impl AutoClassificationJob {
    /// Classification over a registered table: accuracy-optimized,
    /// 5-fold cross-validation, explainability on, default [`JobLimits`]
    pub fn new(
        compute: impl Into<String>,
        experiment_name: impl Into<String>,
        training_data: impl Into<String>,
        target_column: impl Into<String>,
    ) -> Self {
        Self {
            compute: compute.into(),
            experiment_name: experiment_name.into(),
            training_data: training_data.into(),
            target_column: target_column.into(),
            primary_metric: "accuracy".to_string(),
            n_cross_validations: 5,
            enable_model_explainability: true,
            limits: JobLimits::default(),
        }
    }

    #[must_use]
    pub fn with_primary_metric(mut self, metric: impl Into<String>) -> Self {
        self.primary_metric = metric.into();
        self
    }

    #[must_use]
    pub fn with_limits(mut self, limits: JobLimits) -> Self {
        self.limits = limits;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> CommandJobBuilder {
        CommandJob::builder()
            .code("./src")
            .command("lanzar train --training_data ${{inputs.input_data}} --C ${{inputs.c}}")
            .input("input_data", InputBinding::uri_file("azureml:diabetes-file:1"))
            .input("c", InputBinding::literal(0.5))
            .environment("sklearn-env:1")
            .compute("aml-cluster")
            .display_name("diabetes-train")
            .experiment_name("diabetes-custom-training")
    }

    #[test]
    fn test_placeholder_extraction() {
        let names = command_placeholders(
            "run ${{inputs.input_data}} --C ${{inputs.c}} --penalty ${{ inputs.penalty }}",
        );
        let expected: BTreeSet<String> = ["input_data", "c", "penalty"]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(names, expected);
        assert!(command_placeholders("no placeholders here").is_empty());
    }

    #[test]
    fn test_build_valid_job() {
        let job = builder().build().expect("valid job");
        assert_eq!(job.compute, "aml-cluster");
        assert_eq!(job.inputs.len(), 2);
    }

    #[test]
    fn test_unbound_placeholder_rejected() {
        let result = CommandJob::builder()
            .command("train --data ${{inputs.missing}}")
            .build();
        assert!(matches!(
            result,
            Err(PlatformError::UnboundInput { name }) if name == "missing"
        ));
    }

    #[test]
    fn test_unused_binding_rejected() {
        let result = builder()
            .input("extra", InputBinding::literal("dangling"))
            .build();
        assert!(matches!(
            result,
            Err(PlatformError::UnusedInput { name }) if name == "extra"
        ));
    }

    #[test]
    fn test_empty_command_rejected() {
        assert!(matches!(
            CommandJob::builder().command("  ").build(),
            Err(PlatformError::EmptyCommand)
        ));
    }

    #[test]
    fn test_resolved_command_substitutes_bindings() {
        let job = builder().build().expect("valid job");
        assert_eq!(
            job.resolved_command(),
            "lanzar train --training_data azureml:diabetes-file:1 --C 0.5"
        );
    }

    #[test]
    fn test_input_binding_serde_uses_kind_tag() {
        let yaml = "kind: uri_file\npath: azureml:diabetes-file:1\n";
        let binding: InputBinding = serde_yaml::from_str(yaml).expect("parse");
        assert_eq!(binding, InputBinding::uri_file("azureml:diabetes-file:1"));

        let yaml = "kind: literal\nvalue: 0.5\n";
        let binding: InputBinding = serde_yaml::from_str(yaml).expect("parse");
        assert_eq!(binding.render(), "0.5");
    }

    #[test]
    fn test_auto_classification_defaults() {
        let job = AutoClassificationJob::new(
            "aml-cluster",
            "diabetes-automl",
            "azureml:diabetes-training:1",
            "Diabetic",
        );
        assert_eq!(job.primary_metric, "accuracy");
        assert_eq!(job.n_cross_validations, 5);
        assert!(job.enable_model_explainability);
        assert_eq!(job.limits.max_trials, 4);
        assert_eq!(job.limits.timeout, Duration::from_secs(3600));
        assert_eq!(job.limits.trial_timeout, Duration::from_secs(1200));
        assert!(job.limits.early_termination_enabled);

        let tuned = job
            .with_primary_metric("AUC_weighted")
            .with_limits(JobLimits {
                max_trials: 10,
                ..JobLimits::default()
            });
        assert_eq!(tuned.primary_metric, "AUC_weighted");
        assert_eq!(tuned.limits.max_trials, 10);
    }

    #[test]
    fn test_job_json_round_trip() {
        let job = builder().build().expect("valid job");
        let json = serde_json::to_string(&job).expect("serialize");
        let back: CommandJob = serde_json::from_str(&json).expect("parse");
        assert_eq!(back, job);
    }
}
