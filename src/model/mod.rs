//! Linear classification models

mod logistic;

pub use logistic::{
    LogisticModel, LogisticRegression, ModelError, Penalty, Result, DEFAULT_C, DEFAULT_MAX_ITER,
    DEFAULT_TOL,
};
