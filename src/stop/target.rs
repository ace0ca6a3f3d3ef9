//! Target score.

use super::{Attachment, StopCondition, StopConditionKind};
use crate::error::{ConfigError, RunError};
use crate::problem::Direction;

/// Stops once an evaluated score is at least as good as `target`.
#[derive(Debug, Clone)]
pub struct TargetScoreStopCondition {
    target: f64,
    reached: bool,
    attachment: Attachment,
}

impl TargetScoreStopCondition {
    pub fn new(target: f64) -> Self {
        Self {
            target,
            reached: false,
            attachment: Attachment::default(),
        }
    }

    pub fn target(&self) -> f64 {
        self.target
    }
}

impl StopCondition for TargetScoreStopCondition {
    fn name(&self) -> &str {
        "Target Score"
    }

    fn kind(&self) -> StopConditionKind {
        StopConditionKind::TargetScore
    }

    fn validate_configuration(&self) -> Result<(), ConfigError> {
        if self.target.is_nan() {
            return Err(ConfigError::invalid("target", self.target, "must be a number"));
        }
        Ok(())
    }

    fn initialise_before_run(&mut self) -> Result<(), RunError> {
        self.attachment.attach("Target Score")
    }

    fn cleanup_after_run(&mut self) -> Result<(), RunError> {
        self.attachment.detach("Target Score")
    }

    fn solution_evaluated_event(&mut self, score: f64, direction: Direction) {
        if direction.is_better_or_same(score, self.target) {
            self.reached = true;
        }
    }

    fn must_stop_internal(&self) -> bool {
        self.reached
    }

    fn reset(&mut self) {
        self.reached = false;
    }
}
