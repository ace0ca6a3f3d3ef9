//! Stop conditions.
//!
//! A [`StopCondition`] is an independent predicate over the evaluation
//! stream of one run. A [`Problem`](crate::problem::Problem) owns any number
//! of them and stops accepting evaluations as soon as one triggers.
//!
//! # Lifecycle
//!
//! `reset` (idle) → `initialise_before_run` (attached, observing) →
//! triggered → `cleanup_after_run` (detached). Triggered is terminal until
//! the next `reset`.

mod convergence;
mod evaluations;
mod improvement;
mod target;
mod time;

pub use convergence::EvaluationConvergenceStopCondition;
pub use evaluations::EvaluationsStopCondition;
pub use improvement::LackOfImprovementStopCondition;
pub use target::TargetScoreStopCondition;
pub use time::WallClockStopCondition;

use crate::error::{ConfigError, RunError};
use crate::problem::Direction;
use std::fmt;

/// Identifies a stop condition policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopConditionKind {
    /// Fixed total number of evaluations.
    Evaluations,
    /// Last N scores identical.
    EvaluationConvergence,
    /// N evaluations without a new best.
    LackOfImprovement,
    /// Wall-clock limit.
    WallClock,
    /// Target score reached.
    TargetScore,
}

impl StopConditionKind {
    /// Every policy.
    pub const ALL: &'static [StopConditionKind] = &[
        StopConditionKind::Evaluations,
        StopConditionKind::EvaluationConvergence,
        StopConditionKind::LackOfImprovement,
        StopConditionKind::WallClock,
        StopConditionKind::TargetScore,
    ];
}

impl fmt::Display for StopConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StopConditionKind::Evaluations => "evaluations",
            StopConditionKind::EvaluationConvergence => "evaluation convergence",
            StopConditionKind::LackOfImprovement => "lack of improvement",
            StopConditionKind::WallClock => "wall clock",
            StopConditionKind::TargetScore => "target score",
        };
        f.write_str(name)
    }
}

/// A pluggable criterion that ends a run.
pub trait StopCondition: Send + fmt::Debug {
    /// Human-readable name.
    fn name(&self) -> &str;

    /// Policy implemented by this condition.
    fn kind(&self) -> StopConditionKind;

    /// Whether configuration UIs may expose this condition.
    fn is_user_configurable(&self) -> bool {
        true
    }

    /// Checks the condition's own parameters.
    fn validate_configuration(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Starts observing a run. Fails if already attached.
    fn initialise_before_run(&mut self) -> Result<(), RunError>;

    /// Stops observing a run. Fails if not attached.
    fn cleanup_after_run(&mut self) -> Result<(), RunError>;

    /// Observes one evaluated score.
    fn solution_evaluated_event(&mut self, score: f64, direction: Direction);

    /// Whether this condition alone requires the run to stop.
    fn must_stop_internal(&self) -> bool;

    /// Restores the pre-run state.
    fn reset(&mut self);
}

/// Attach/detach bookkeeping shared by the stop conditions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Attachment {
    attached: bool,
}

impl Attachment {
    /// Marks the owner attached.
    pub fn attach(&mut self, name: &str) -> Result<(), RunError> {
        if self.attached {
            return Err(RunError::AlreadyAttached(name.to_string()));
        }
        self.attached = true;
        Ok(())
    }

    /// Marks the owner detached.
    pub fn detach(&mut self, name: &str) -> Result<(), RunError> {
        if !self.attached {
            return Err(RunError::NotAttached(name.to_string()));
        }
        self.attached = false;
        Ok(())
    }

    /// Whether the owner is currently attached.
    pub fn is_attached(&self) -> bool {
        self.attached
    }
}
