//! Wall-clock limit.

use super::{Attachment, StopCondition, StopConditionKind};
use crate::error::{ConfigError, RunError};
use crate::problem::Direction;
use std::time::{Duration, Instant};

/// Stops once `limit` has elapsed since the run was initialised.
///
/// The clock is only checked when the problem asks, so an algorithm that
/// evaluates rarely may overrun by up to one evaluation.
#[derive(Debug, Clone)]
pub struct WallClockStopCondition {
    limit: Duration,
    started: Option<Instant>,
    attachment: Attachment,
}

impl WallClockStopCondition {
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            started: None,
            attachment: Attachment::default(),
        }
    }

    /// Convenience constructor in milliseconds.
    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// Time elapsed in the current run.
    pub fn elapsed(&self) -> Duration {
        self.started.map(|s| s.elapsed()).unwrap_or_default()
    }
}

impl StopCondition for WallClockStopCondition {
    fn name(&self) -> &str {
        "Wall Clock"
    }

    fn kind(&self) -> StopConditionKind {
        StopConditionKind::WallClock
    }

    fn validate_configuration(&self) -> Result<(), ConfigError> {
        if self.limit.is_zero() {
            return Err(ConfigError::invalid(
                "limit_ms",
                self.limit.as_millis(),
                "must be positive",
            ));
        }
        Ok(())
    }

    fn initialise_before_run(&mut self) -> Result<(), RunError> {
        self.attachment.attach("Wall Clock")?;
        self.started = Some(Instant::now());
        Ok(())
    }

    fn cleanup_after_run(&mut self) -> Result<(), RunError> {
        self.attachment.detach("Wall Clock")
    }

    fn solution_evaluated_event(&mut self, _score: f64, _direction: Direction) {}

    fn must_stop_internal(&self) -> bool {
        self.started.is_some_and(|s| s.elapsed() >= self.limit)
    }

    fn reset(&mut self) {
        self.started = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_never_stops() {
        let sc = WallClockStopCondition::new(Duration::from_nanos(1));
        std::thread::sleep(Duration::from_millis(2));
        assert!(!sc.must_stop_internal());
        assert_eq!(sc.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_triggers_after_limit() {
        let mut sc = WallClockStopCondition::new(Duration::from_nanos(1));
        sc.initialise_before_run().unwrap();
        std::thread::sleep(Duration::from_millis(2));
        assert!(sc.must_stop_internal());
        sc.cleanup_after_run().unwrap();
        sc.reset();
        assert!(!sc.must_stop_internal());
    }

    #[test]
    fn test_long_limit_does_not_trigger() {
        let mut sc = WallClockStopCondition::new(Duration::from_secs(3600));
        sc.initialise_before_run().unwrap();
        assert!(!sc.must_stop_internal());
        assert!(sc.elapsed() < sc.limit());
        sc.cleanup_after_run().unwrap();
    }

    #[test]
    fn test_zero_limit_rejected() {
        assert!(WallClockStopCondition::new(Duration::ZERO)
            .validate_configuration()
            .is_err());
    }
}
