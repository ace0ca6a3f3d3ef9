//! Run probes: observers that harvest one metric per run.
//!
//! A probe is attached to the problem as a
//! [`SolutionEvaluationListener`](crate::problem::SolutionEvaluationListener)
//! for the duration of a run and exposes its final value as an
//! [`Observation`].

mod builtin;
mod types;

pub use builtin::{BestScoreProbe, BestSolutionProbe, TimeLengthProbe, TotalEvaluationsProbe};
pub use types::{Observation, RunProbe};
