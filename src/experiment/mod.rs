//! Repeated-run experiments.
//!
//! An [`Experiment`] runs several contender algorithms on fresh instances of
//! one problem, with matched seeds per repetition, and collects the run
//! reports into [`ExperimentResults`] for statistical comparison.
//!
//! Runs are independent: with the `parallel` feature and
//! [`ExperimentConfig::parallel`] set they are spread over rayon's thread
//! pool, one run per task.

mod config;
mod results;
mod runner;

pub use config::ExperimentConfig;
pub use results::{ExperimentResults, RunRecord};
pub use runner::Experiment;
