//! Literal stagnation of the evaluation stream.

use super::{Attachment, StopCondition, StopConditionKind};
use crate::error::{ConfigError, RunError};
use crate::problem::Direction;
use std::collections::VecDeque;

/// Stops when the last `window` evaluated scores are bit-identical.
///
/// Scores are compared exactly, without tolerance: the condition catches
/// an algorithm re-evaluating the same candidate over and over.
#[derive(Debug, Clone)]
pub struct EvaluationConvergenceStopCondition {
    window: usize,
    history: VecDeque<f64>,
    attachment: Attachment,
}

impl EvaluationConvergenceStopCondition {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            history: VecDeque::with_capacity(window),
            attachment: Attachment::default(),
        }
    }

    /// Configured window size.
    pub fn window(&self) -> usize {
        self.window
    }
}

impl StopCondition for EvaluationConvergenceStopCondition {
    fn name(&self) -> &str {
        "Evaluation Convergence"
    }

    fn kind(&self) -> StopConditionKind {
        StopConditionKind::EvaluationConvergence
    }

    fn validate_configuration(&self) -> Result<(), ConfigError> {
        if self.window < 2 {
            return Err(ConfigError::invalid("window", self.window, "must be at least 2"));
        }
        Ok(())
    }

    fn initialise_before_run(&mut self) -> Result<(), RunError> {
        self.attachment.attach("Evaluation Convergence")
    }

    fn cleanup_after_run(&mut self) -> Result<(), RunError> {
        self.attachment.detach("Evaluation Convergence")
    }

    fn solution_evaluated_event(&mut self, score: f64, _direction: Direction) {
        if self.window == 0 {
            return;
        }
        if self.history.len() == self.window {
            self.history.pop_front();
        }
        self.history.push_back(score);
    }

    fn must_stop_internal(&self) -> bool {
        if self.window == 0 || self.history.len() < self.window {
            return false;
        }
        self.history
            .iter()
            .zip(self.history.iter().skip(1))
            .all(|(a, b)| a.to_bits() == b.to_bits())
    }

    fn reset(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(sc: &mut EvaluationConvergenceStopCondition, scores: &[f64]) -> Vec<bool> {
        scores
            .iter()
            .map(|&s| {
                sc.solution_evaluated_event(s, Direction::Minimize);
                sc.must_stop_internal()
            })
            .collect()
    }

    #[test]
    fn test_identical_window_triggers_on_fifth() {
        let mut sc = EvaluationConvergenceStopCondition::new(5);
        let states = feed(&mut sc, &[3.0, 3.0, 3.0, 3.0, 3.0]);
        assert_eq!(states, vec![false, false, false, false, true]);
    }

    #[test]
    fn test_last_differs_no_trigger() {
        let mut sc = EvaluationConvergenceStopCondition::new(5);
        let states = feed(&mut sc, &[3.0, 3.0, 3.0, 3.0, 4.0]);
        assert!(states.iter().all(|s| !s));
    }

    #[test]
    fn test_window_slides() {
        let mut sc = EvaluationConvergenceStopCondition::new(3);
        let states = feed(&mut sc, &[1.0, 2.0, 2.0, 2.0]);
        assert_eq!(states, vec![false, false, false, true]);
    }

    #[test]
    fn test_no_tolerance() {
        let mut sc = EvaluationConvergenceStopCondition::new(2);
        feed(&mut sc, &[1.0, 1.0 + f64::EPSILON]);
        assert!(!sc.must_stop_internal());
    }

    #[test]
    fn test_reset_clears_window() {
        let mut sc = EvaluationConvergenceStopCondition::new(2);
        feed(&mut sc, &[1.0, 1.0]);
        assert!(sc.must_stop_internal());
        sc.reset();
        assert!(!sc.must_stop_internal());
        feed(&mut sc, &[1.0]);
        assert!(!sc.must_stop_internal());
    }
}
