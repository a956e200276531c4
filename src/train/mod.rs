//! Training orchestration.
//!
//! [`run`] splits a dataset into training and validation positions, iterates epochs of
//! shuffled training batches through a [`DataLoader`](crate::dataset::DataLoader),
//! and periodically evaluates one random validation batch. Every step records the
//! scalars `train/loss` and `train/r2`, validation steps also `val/loss` and
//! `val/r2`. At the end the scalars are exported and a [`Checkpoint`] is written.
//!
//! Models plug in through the [`Regressor`] trait; [`ReadoutRegressor`] is the
//! built-in baseline.

mod checkpoint;
mod config;
mod error;
mod metrics;
mod model;
mod scalars;
mod trainer;

pub use checkpoint::Checkpoint;
pub use config::TrainConfig;
pub use error::Error;
pub use metrics::{StepMetrics, mse, r2};
pub use model::{READOUT_DIM, ReadoutRegressor, Regressor, readout};
pub use scalars::{ScalarEvent, ScalarWriter};
pub use trainer::{StepRecord, TrainReport, experiment_id, run, run_with, split_positions};
