//! Bandit early termination
//!
//! A trial is pruned when its primary metric trails the best trial's metric
//! by more than a slack fraction at a periodic evaluation checkpoint. The
//! policy holds the parameters only; checkpoint bookkeeping and the actual
//! cancellation belong to the external scheduler.

use serde::{Deserialize, Serialize};

use super::{Goal, Result, SweepError};

/// Decision for one trial at one checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialVerdict {
    /// Trial continues
    Keep,
    /// Trial should be stopped
    Prune,
}

/// Early-termination rule for sweep trials
///
/// Evaluated every `evaluation_interval` checkpoints once `delay_evaluation`
/// checkpoints have passed. With `slack_factor = 0.2` a maximizing trial is
/// pruned when its metric is more than 20% below the best metric seen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BanditPolicy {
    /// Checkpoints between policy applications
    pub evaluation_interval: u64,
    /// Allowed lag behind the best trial, as a fraction of the best metric
    pub slack_factor: f64,
    /// Checkpoints to wait before the first application
    pub delay_evaluation: u64,
}

impl BanditPolicy {
    /// Create a policy, rejecting degenerate parameters
    pub fn new(evaluation_interval: u64, slack_factor: f64, delay_evaluation: u64) -> Result<Self> {
        let policy = Self {
            evaluation_interval,
            slack_factor,
            delay_evaluation,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Check the parameters without constructing
    pub fn validate(&self) -> Result<()> {
        if self.evaluation_interval == 0 {
            return Err(SweepError::InvalidInterval(self.evaluation_interval));
        }
        if !self.slack_factor.is_finite() || self.slack_factor <= 0.0 {
            return Err(SweepError::InvalidSlack(self.slack_factor));
        }
        Ok(())
    }

    /// Whether the policy applies at this checkpoint at all
    #[must_use]
    pub fn applies_at(&self, checkpoint: u64) -> bool {
        checkpoint >= self.delay_evaluation
            && checkpoint > 0
            && checkpoint % self.evaluation_interval == 0
    }

    /// Judge one trial against the best trial at a checkpoint
    ///
    /// Off-interval or pre-delay checkpoints always keep the trial. At an
    /// applicable checkpoint a maximizing trial is pruned when
    /// `trial_metric < best_metric - slack_factor * |best_metric|`; the
    /// comparison is mirrored for [`Goal::Minimize`].
    #[must_use]
    pub fn verdict(
        &self,
        checkpoint: u64,
        trial_metric: f64,
        best_metric: f64,
        goal: Goal,
    ) -> TrialVerdict {
        if !self.applies_at(checkpoint) {
            return TrialVerdict::Keep;
        }
        let slack = self.slack_factor * best_metric.abs();
        let lagging = match goal {
            Goal::Maximize => trial_metric < best_metric - slack,
            Goal::Minimize => trial_metric > best_metric + slack,
        };
        if lagging {
            TrialVerdict::Prune
        } else {
            TrialVerdict::Keep
        }
    }
}
