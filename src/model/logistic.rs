//! Binary logistic regression
//!
//! Fits `p(y=1|x) = sigmoid(x·w + b)` by full-batch proximal gradient
//! descent on internally standardized features. Regularization follows the
//! common `C` parameterization: `C` is the inverse regularization strength,
//! so smaller values penalize harder. The penalty applies to the weights
//! only, never the intercept.
//!
//! # Example
//!
//! ```
//! use lanzar::model::{LogisticRegression, Penalty};
//! use ndarray::{array, Array1};
//!
//! # fn main() -> Result<(), lanzar::model::ModelError> {
//! let x = array![[-2.0], [-1.5], [-1.0], [1.0], [1.5], [2.0]];
//! let y: Array1<f64> = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
//!
//! let model = LogisticRegression::new(1.0, Penalty::L2)?.fit(&x, &y)?;
//! let predicted = model.predict(&x)?;
//! assert_eq!(predicted, y);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Default inverse regularization strength
pub const DEFAULT_C: f64 = 1.0;

/// Default iteration cap for the optimizer
pub const DEFAULT_MAX_ITER: usize = 500;

/// Default convergence tolerance (max absolute coefficient update)
pub const DEFAULT_TOL: f64 = 1e-6;

/// Step size for the gradient updates. Features are standardized before
/// optimization, which bounds the log-loss curvature and keeps this safe.
const LEARNING_RATE: f64 = 0.25;

/// Guard for near-constant columns when standardizing
const MIN_STD: f64 = 1e-12;

/// Errors from model configuration, fitting, and prediction
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Unknown penalty '{0}': expected 'l1' or 'l2'")]
    InvalidPenalty(String),

    #[error("Regularization strength C must be positive and finite, got {0}")]
    InvalidRegularization(f64),

    #[error("Dimension mismatch: model has {expected} features, input has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Row count mismatch: {rows} feature rows vs {labels} labels")]
    RowCountMismatch { rows: usize, labels: usize },

    #[error("Label at row {0} is {1}, expected 0 or 1")]
    InvalidLabel(usize, f64),

    #[error("Training set is empty")]
    EmptyTrainingSet,

    #[error("Optimization diverged: loss became non-finite at iteration {0}")]
    Diverged(usize),
}

/// Result alias for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Regularization penalty applied to the weight vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Penalty {
    /// Absolute-value penalty (sparsifying)
    L1,
    /// Squared-norm penalty
    #[default]
    L2,
}

impl Penalty {
    /// Canonical lowercase name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Penalty::L1 => "l1",
            Penalty::L2 => "l2",
        }
    }
}

impl FromStr for Penalty {
    type Err = ModelError;

    /// Accepts exactly `"l1"` or `"l2"`. Anything else is rejected here,
    /// before any fitting work starts.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "l1" => Ok(Penalty::L1),
            "l2" => Ok(Penalty::L2),
            other => Err(ModelError::InvalidPenalty(other.to_string())),
        }
    }
}

impl fmt::Display for Penalty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Logistic regression estimator
///
/// Configuration only; [`fit`](Self::fit) produces a [`LogisticModel`].
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegression {
    c: f64,
    penalty: Penalty,
    max_iter: usize,
    tol: f64,
}

impl LogisticRegression {
    /// Create an estimator, validating the regularization strength
    pub fn new(c: f64, penalty: Penalty) -> Result<Self> {
        if !c.is_finite() || c <= 0.0 {
            return Err(ModelError::InvalidRegularization(c));
        }
        Ok(Self {
            c,
            penalty,
            max_iter: DEFAULT_MAX_ITER,
            tol: DEFAULT_TOL,
        })
    }

    /// Set the iteration cap
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the convergence tolerance
    #[must_use]
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Inverse regularization strength
    #[must_use]
    pub fn c(&self) -> f64 {
        self.c
    }

    /// Configured penalty
    #[must_use]
    pub fn penalty(&self) -> Penalty {
        self.penalty
    }

    /// Iteration cap
    #[must_use]
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Convergence tolerance
    #[must_use]
    pub fn tol(&self) -> f64 {
        self.tol
    }

    /// Name of the optimizer, as recorded by autologging
    #[must_use]
    pub fn solver(&self) -> &'static str {
        "gd"
    }

    /// Fit the estimator on a feature matrix and 0/1 label vector
    ///
    /// Standardizes each feature column, then runs proximal gradient
    /// descent on the mean log-loss plus `1/(C·n)`-scaled penalty. L2 adds
    /// a ridge term to the gradient; L1 applies a soft-threshold step.
    /// Stops early once the largest coefficient update drops below `tol`.
    pub fn fit(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<LogisticModel> {
        let n = x.nrows();
        let d = x.ncols();
        if n == 0 || d == 0 {
            return Err(ModelError::EmptyTrainingSet);
        }
        if y.len() != n {
            return Err(ModelError::RowCountMismatch {
                rows: n,
                labels: y.len(),
            });
        }
        for (i, &label) in y.iter().enumerate() {
            if label != 0.0 && label != 1.0 {
                return Err(ModelError::InvalidLabel(i, label));
            }
        }

        let means = x.mean_axis(Axis(0)).ok_or(ModelError::EmptyTrainingSet)?;
        let stds = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s < MIN_STD { 1.0 } else { s });
        let xs = (x - &means) / &stds;

        let n_f = n as f64;
        let lambda = 1.0 / (self.c * n_f);

        let mut weights = Array1::<f64>::zeros(d);
        let mut intercept = 0.0_f64;
        let mut n_iter = 0;
        let mut converged = false;

        for iteration in 0..self.max_iter {
            n_iter = iteration + 1;

            let z = xs.dot(&weights) + intercept;
            let probs = z.mapv(sigmoid);
            let loss = log_loss(y, &probs);
            if !loss.is_finite() {
                return Err(ModelError::Diverged(n_iter));
            }

            let residual = &probs - y;
            let grad = xs.t().dot(&residual) / n_f;
            let grad_intercept = residual.sum() / n_f;

            let next_weights = match self.penalty {
                Penalty::L2 => {
                    let step = &grad + &(lambda * &weights);
                    &weights - &(LEARNING_RATE * &step)
                }
                Penalty::L1 => {
                    let moved = &weights - &(LEARNING_RATE * &grad);
                    moved.mapv(|w| soft_threshold(w, LEARNING_RATE * lambda))
                }
            };
            let next_intercept = intercept - LEARNING_RATE * grad_intercept;

            let delta = (&next_weights - &weights)
                .iter()
                .map(|v| v.abs())
                .fold((next_intercept - intercept).abs(), f64::max);

            weights = next_weights;
            intercept = next_intercept;

            if delta < self.tol {
                converged = true;
                break;
            }
        }

        Ok(LogisticModel {
            weights,
            intercept,
            means,
            stds,
            c: self.c,
            penalty: self.penalty,
            n_iter,
            converged,
        })
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self {
            c: DEFAULT_C,
            penalty: Penalty::L2,
            max_iter: DEFAULT_MAX_ITER,
            tol: DEFAULT_TOL,
        }
    }
}

/// A fitted logistic regression classifier
///
/// Owns the learned coefficients plus the feature standardization captured
/// at fit time, so callers predict on raw (unstandardized) features.
#[derive(Debug, Clone)]
pub struct LogisticModel {
    weights: Array1<f64>,
    intercept: f64,
    means: Array1<f64>,
    stds: Array1<f64>,
    /// Inverse regularization strength the model was fit with
    pub c: f64,
    /// Penalty the model was fit with
    pub penalty: Penalty,
    /// Iterations the optimizer actually ran
    pub n_iter: usize,
    /// Whether the optimizer met the tolerance before the iteration cap
    pub converged: bool,
}

impl LogisticModel {
    /// Number of features the model was fit on
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    /// Coefficients mapped back to raw feature space
    #[must_use]
    pub fn coefficients(&self) -> Array1<f64> {
        &self.weights / &self.stds
    }

    /// Intercept in raw feature space
    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.intercept - (&self.weights * &self.means / &self.stds).sum()
    }

    /// Probability of class 1 for each row
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if x.ncols() != self.n_features() {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features(),
                actual: x.ncols(),
            });
        }
        let xs = (x - &self.means) / &self.stds;
        Ok((xs.dot(&self.weights) + self.intercept).mapv(sigmoid))
    }

    /// Hard 0/1 predictions at the 0.5 threshold
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        Ok(self
            .predict_proba(x)?
            .mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 }))
    }
}

#[inline]
fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Mean binary cross-entropy, clamped away from ln(0)
fn log_loss(y: &Array1<f64>, probs: &Array1<f64>) -> f64 {
    const EPS: f64 = 1e-15;
    let n = y.len() as f64;
    y.iter()
        .zip(probs.iter())
        .map(|(&label, &p)| {
            let p = p.clamp(EPS, 1.0 - EPS);
            -(label * p.ln() + (1.0 - label) * (1.0 - p).ln())
        })
        .sum::<f64>()
        / n
}

#[inline]
fn soft_threshold(w: f64, threshold: f64) -> f64 {
    if w > threshold {
        w - threshold
    } else if w < -threshold {
        w + threshold
    } else {
        0.0
    }
}
