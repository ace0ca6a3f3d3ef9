//! Lack of improvement.

use super::{Attachment, StopCondition, StopConditionKind};
use crate::error::{ConfigError, RunError};
use crate::problem::Direction;

/// Stops after `window` consecutive evaluations without a strictly better
/// score than the best seen so far in the run.
#[derive(Debug, Clone)]
pub struct LackOfImprovementStopCondition {
    window: usize,
    // NaN until the first evaluation of a run
    best: f64,
    count_since_last_improvement: usize,
    attachment: Attachment,
}

impl LackOfImprovementStopCondition {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            best: f64::NAN,
            count_since_last_improvement: 0,
            attachment: Attachment::default(),
        }
    }

    /// Configured window size.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Evaluations since the last improvement.
    pub fn count_since_last_improvement(&self) -> usize {
        self.count_since_last_improvement
    }

    /// Best score of the run, if any evaluation has been observed.
    pub fn best(&self) -> Option<f64> {
        (!self.best.is_nan()).then_some(self.best)
    }
}

impl StopCondition for LackOfImprovementStopCondition {
    fn name(&self) -> &str {
        "Lack of Improvement"
    }

    fn kind(&self) -> StopConditionKind {
        StopConditionKind::LackOfImprovement
    }

    fn validate_configuration(&self) -> Result<(), ConfigError> {
        if self.window == 0 {
            return Err(ConfigError::invalid("window", self.window, "must be at least 1"));
        }
        Ok(())
    }

    fn initialise_before_run(&mut self) -> Result<(), RunError> {
        self.attachment.attach("Lack of Improvement")
    }

    fn cleanup_after_run(&mut self) -> Result<(), RunError> {
        self.attachment.detach("Lack of Improvement")
    }

    fn solution_evaluated_event(&mut self, score: f64, direction: Direction) {
        if self.best.is_nan() || direction.is_better(score, self.best) {
            self.best = score;
            self.count_since_last_improvement = 0;
        } else {
            self.count_since_last_improvement += 1;
        }
    }

    fn must_stop_internal(&self) -> bool {
        self.count_since_last_improvement >= self.window
    }

    fn reset(&mut self) {
        self.best = f64::NAN;
        self.count_since_last_improvement = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimizing_sequence() {
        let mut sc = LackOfImprovementStopCondition::new(3);
        sc.solution_evaluated_event(10.0, Direction::Minimize);
        assert_eq!(sc.count_since_last_improvement(), 0);

        sc.solution_evaluated_event(9.0, Direction::Minimize);
        assert_eq!(sc.count_since_last_improvement(), 0);
        assert_eq!(sc.best(), Some(9.0));

        sc.solution_evaluated_event(9.0, Direction::Minimize);
        sc.solution_evaluated_event(9.0, Direction::Minimize);
        assert_eq!(sc.count_since_last_improvement(), 2);
        assert!(!sc.must_stop_internal());

        sc.solution_evaluated_event(9.0, Direction::Minimize);
        assert!(sc.must_stop_internal());
    }

    #[test]
    fn test_first_evaluation_always_improves() {
        let mut sc = LackOfImprovementStopCondition::new(1);
        assert_eq!(sc.best(), None);
        sc.solution_evaluated_event(f64::INFINITY, Direction::Minimize);
        assert_eq!(sc.count_since_last_improvement(), 0);
        assert!(!sc.must_stop_internal());
    }

    #[test]
    fn test_maximizing_improvement_resets() {
        let mut sc = LackOfImprovementStopCondition::new(2);
        sc.solution_evaluated_event(1.0, Direction::Maximize);
        sc.solution_evaluated_event(0.5, Direction::Maximize);
        assert_eq!(sc.count_since_last_improvement(), 1);
        sc.solution_evaluated_event(2.0, Direction::Maximize);
        assert_eq!(sc.count_since_last_improvement(), 0);
    }

    #[test]
    fn test_reset() {
        let mut sc = LackOfImprovementStopCondition::new(1);
        sc.solution_evaluated_event(1.0, Direction::Minimize);
        sc.solution_evaluated_event(1.0, Direction::Minimize);
        assert!(sc.must_stop_internal());
        sc.reset();
        assert!(!sc.must_stop_internal());
        assert_eq!(sc.best(), None);
    }
}
