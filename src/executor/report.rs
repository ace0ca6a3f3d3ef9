//! Run reports and execution notifications.

use crate::error::ExecutionError;
use std::time::Duration;

/// Outcome of one successful run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunReport {
    /// Algorithm name.
    pub algorithm: String,

    /// Problem name.
    pub problem: String,

    /// Seed the run's RNG was created with.
    pub seed: u64,

    /// Evaluations performed.
    pub evaluations: u64,

    /// Completed epochs.
    pub epochs: usize,

    /// Wall-clock time spent in the run loop.
    pub elapsed: Duration,

    /// Final probe observations, in probe attachment order.
    pub observations: Vec<(String, Option<f64>)>,
}

impl RunReport {
    /// Scalar observation of the probe named `probe`.
    ///
    /// `None` if no such probe was attached or it observed nothing.
    pub fn observation(&self, probe: &str) -> Option<f64> {
        self.observations
            .iter()
            .find(|(name, _)| name == probe)
            .and_then(|(_, value)| *value)
    }
}

/// Start/finish notifications, for both synchronous and asynchronous runs.
///
/// Called on the thread executing the run.
pub trait ExecutionListener: Send + Sync {
    fn run_started(&self, algorithm: &str, problem: &str);

    fn run_finished(&self, outcome: &Result<RunReport, ExecutionError>);
}
