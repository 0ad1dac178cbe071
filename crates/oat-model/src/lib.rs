//! # oat-model: Regression Network for PSPS Outage Analysis
//!
//! A configurable feed-forward regression network and its training harness:
//!
//! - [`mlp`]: fully connected layers with hand-derived gradients for the MSE
//!   objective; the stack is fixed and small enough that explicit loops beat
//!   pulling in a tensor framework
//! - [`optim`]: the Adagrad update rule used for full-batch gradient descent
//! - [`train`]: the epoch loop with loss-plateau early stopping
//! - [`tune`]: seeded random hyperparameter search minimizing validation RMSE
//! - [`metrics`]: R²/RMSE/MAE/MAPE regression reporting
//!
//! Models are built from an [`oat_core::ModelConfig`], trained on row-major
//! `f64` feature matrices (see `oat-features`), and discarded after scoring
//! unless a caller keeps them.

pub mod metrics;
pub mod mlp;
pub mod optim;
pub mod train;
pub mod tune;

pub use metrics::{mae, mape, mse, regression_report, rmse, variance, RegressionMetrics};
pub use mlp::{Gradients, Mlp};
pub use optim::Adagrad;
pub use train::{train, TrainReport, LOSS_PLATEAU_TOLERANCE};
pub use tune::{
    read_best_config, run_search, sample_config, write_best_trial, SearchSpace, Trial,
    TuneOutcome, DEFAULT_RMSE_THRESHOLD,
};
