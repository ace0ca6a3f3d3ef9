//! Run probe contract.

use crate::problem::{Direction, SolutionEvaluationListener};
use crate::solution::Solution;
use std::time::Duration;

/// The value harvested by a probe at the end of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum Observation<R> {
    /// Nothing observed (no evaluation happened).
    Empty,
    Score(f64),
    Count(u64),
    Duration(Duration),
    Solution(Solution<R>),
}

impl<R> Observation<R> {
    /// Scalar view of the observation, used for statistics.
    ///
    /// Durations are reported in seconds and solutions by score.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Observation::Empty => None,
            Observation::Score(v) => Some(*v),
            Observation::Count(c) => Some(*c as f64),
            Observation::Duration(d) => Some(d.as_secs_f64()),
            Observation::Solution(s) => s.score().ok(),
        }
    }
}

/// An observer that accumulates one metric over a run.
///
/// Probes are shared (`Arc`) between the caller, who reads the result, and
/// the problem, which notifies them; state therefore lives behind interior
/// mutability. The executor pairs the hooks:
/// `reset → initialise_before_run → (events) → cleanup_after_run`.
pub trait RunProbe<R>: SolutionEvaluationListener<R> {
    /// Name under which the observation appears in reports.
    fn name(&self) -> &str;

    /// Called after the probe is attached to the problem.
    fn initialise_before_run(&self, _direction: Direction) {}

    /// Called before the probe is detached from the problem.
    fn cleanup_after_run(&self) {}

    /// Clears accumulated state for the next run.
    fn reset(&self);

    /// The value accumulated so far.
    fn observation(&self) -> Observation<R>;
}
