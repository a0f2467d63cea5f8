//! Search space definitions
//!
//! Every swept parameter is an explicit tagged binding: a fixed value, a
//! uniform range, or a discrete choice set. There is no positional or
//! convention-based encoding; the binding kind is always spelled out.

use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Result, SweepError};

/// A concrete parameter value
///
/// Untagged on the wire: YAML/JSON scalars map to the matching variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl ParameterValue {
    /// Numeric view; integers widen to float
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParameterValue::Int(v) => Some(*v as f64),
            ParameterValue::Float(v) => Some(*v),
            ParameterValue::Text(_) => None,
        }
    }

    /// Text view
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParameterValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for ParameterValue {
    fn from(v: f64) -> Self {
        ParameterValue::Float(v)
    }
}

impl From<i64> for ParameterValue {
    fn from(v: i64) -> Self {
        ParameterValue::Int(v)
    }
}

impl From<&str> for ParameterValue {
    fn from(v: &str) -> Self {
        ParameterValue::Text(v.to_string())
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Int(v) => write!(f, "{v}"),
            ParameterValue::Float(v) => write!(f, "{v}"),
            ParameterValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// How one parameter is bound for a sweep
///
/// Tagged with an explicit `kind` on the wire:
///
/// ```yaml
/// c:
///   kind: uniform
///   low: 0.05
///   high: 5.0
/// penalty:
///   kind: choice
///   options: [l1, l2]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParameterBinding {
    /// Always the same value
    Fixed { value: ParameterValue },
    /// Continuous uniform range over `[low, high)`
    Uniform { low: f64, high: f64 },
    /// Uniform pick from a discrete set
    Choice { options: Vec<ParameterValue> },
}

impl ParameterBinding {
    /// Check internal consistency, reporting against the parameter name
    pub fn validate(&self, name: &str) -> Result<()> {
        match self {
            ParameterBinding::Fixed { value } => {
                if let ParameterValue::Float(v) = value {
                    if !v.is_finite() {
                        return Err(SweepError::NonFiniteValue {
                            name: name.to_string(),
                        });
                    }
                }
                Ok(())
            }
            ParameterBinding::Uniform { low, high } => {
                if !(low.is_finite() && high.is_finite() && low < high) {
                    return Err(SweepError::InvalidRange {
                        name: name.to_string(),
                        low: *low,
                        high: *high,
                    });
                }
                Ok(())
            }
            ParameterBinding::Choice { options } => {
                if options.is_empty() {
                    return Err(SweepError::EmptyChoice {
                        name: name.to_string(),
                    });
                }
                Ok(())
            }
        }
    }

    /// Draw one value from this binding
    pub fn sample<R: Rng>(&self, rng: &mut R) -> ParameterValue {
        match self {
            ParameterBinding::Fixed { value } => value.clone(),
            ParameterBinding::Uniform { low, high } => {
                ParameterValue::Float(low + rng.random::<f64>() * (high - low))
            }
            ParameterBinding::Choice { options } => {
                let idx = (rng.random::<f64>() * options.len() as f64).floor() as usize;
                options[idx].clone()
            }
        }
    }
}

/// One sampled configuration: parameter name to concrete value
pub type Assignment = BTreeMap<String, ParameterValue>;

/// Named parameter bindings for a sweep
///
/// Backed by an ordered map so iteration (and therefore seeded sampling)
/// is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchSpace {
    params: BTreeMap<String, ParameterBinding>,
}

impl SearchSpace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a binding
    pub fn insert(&mut self, name: impl Into<String>, binding: ParameterBinding) -> &mut Self {
        self.params.insert(name.into(), binding);
        self
    }

    /// Look up a binding
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParameterBinding> {
        self.params.get(name)
    }

    /// Parameter names in iteration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Validate all bindings; an empty space is invalid for sweeping
    pub fn validate(&self) -> Result<()> {
        if self.params.is_empty() {
            return Err(SweepError::EmptySpace);
        }
        for (name, binding) in &self.params {
            if name.is_empty() {
                return Err(SweepError::EmptyName);
            }
            binding.validate(name)?;
        }
        Ok(())
    }

    /// Draw one assignment, sampling every binding in name order
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Assignment {
        self.params
            .iter()
            .map(|(name, binding)| (name.clone(), binding.sample(rng)))
            .collect()
    }
}
