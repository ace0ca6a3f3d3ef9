//! Evaluation budget.

use super::{Attachment, StopCondition, StopConditionKind};
use crate::error::{ConfigError, RunError};
use crate::problem::Direction;

/// Stops once a fixed number of evaluations has been performed.
///
/// The comparison is `count >= max_evaluations`, so batches that overshoot
/// still trigger.
#[derive(Debug, Clone)]
pub struct EvaluationsStopCondition {
    max_evaluations: u64,
    count: u64,
    attachment: Attachment,
}

impl EvaluationsStopCondition {
    pub fn new(max_evaluations: u64) -> Self {
        Self {
            max_evaluations,
            count: 0,
            attachment: Attachment::default(),
        }
    }

    /// Configured budget.
    pub fn max_evaluations(&self) -> u64 {
        self.max_evaluations
    }

    /// Evaluations observed in the current run.
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl StopCondition for EvaluationsStopCondition {
    fn name(&self) -> &str {
        "Evaluations"
    }

    fn kind(&self) -> StopConditionKind {
        StopConditionKind::Evaluations
    }

    fn validate_configuration(&self) -> Result<(), ConfigError> {
        if self.max_evaluations == 0 {
            return Err(ConfigError::invalid(
                "max_evaluations",
                self.max_evaluations,
                "must be at least 1",
            ));
        }
        Ok(())
    }

    fn initialise_before_run(&mut self) -> Result<(), RunError> {
        self.attachment.attach("Evaluations")
    }

    fn cleanup_after_run(&mut self) -> Result<(), RunError> {
        self.attachment.detach("Evaluations")
    }

    fn solution_evaluated_event(&mut self, _score: f64, _direction: Direction) {
        self.count += 1;
    }

    fn must_stop_internal(&self) -> bool {
        self.count >= self.max_evaluations
    }

    fn reset(&mut self) {
        self.count = 0;
    }
}
