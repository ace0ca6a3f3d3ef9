//! Built-in probes: best score, best solution, evaluation count and run time.

use super::types::{Observation, RunProbe};
use crate::problem::{Direction, SolutionEvaluationListener};
use crate::solution::Solution;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
struct Best<T> {
    direction: Direction,
    value: Option<T>,
}

impl<T> Default for Best<T> {
    fn default() -> Self {
        Self {
            direction: Direction::Minimize,
            value: None,
        }
    }
}

/// Best score seen during the run, direction-aware.
#[derive(Debug, Default)]
pub struct BestScoreProbe {
    state: Mutex<Best<f64>>,
}

impl BestScoreProbe {
    pub const NAME: &'static str = "best score";

    pub fn new() -> Self {
        Self::default()
    }

    /// Best score of the current or last run.
    pub fn best_score(&self) -> Option<f64> {
        lock(&self.state).value
    }
}

impl<R> SolutionEvaluationListener<R> for BestScoreProbe {
    fn solution_evaluated_event(&self, solution: &Solution<R>) {
        let Ok(score) = solution.score() else { return };
        let mut state = lock(&self.state);
        let improved = state
            .value
            .is_none_or(|best| state.direction.is_better(score, best));
        if improved {
            state.value = Some(score);
        }
    }

    fn listener_name(&self) -> &str {
        Self::NAME
    }
}

impl<R> RunProbe<R> for BestScoreProbe {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn initialise_before_run(&self, direction: Direction) {
        lock(&self.state).direction = direction;
    }

    fn reset(&self) {
        lock(&self.state).value = None;
    }

    fn observation(&self) -> Observation<R> {
        self.best_score().map_or(Observation::Empty, Observation::Score)
    }
}

/// Copy of the best solution seen during the run.
///
/// Ties keep the earliest solution.
#[derive(Debug)]
pub struct BestSolutionProbe<R> {
    state: Mutex<Best<Solution<R>>>,
}

impl<R> Default for BestSolutionProbe<R> {
    fn default() -> Self {
        Self {
            state: Mutex::new(Best::default()),
        }
    }
}

impl<R: Clone> BestSolutionProbe<R> {
    pub const NAME: &'static str = "best solution";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn best_solution(&self) -> Option<Solution<R>> {
        lock(&self.state).value.clone()
    }
}

impl<R: Clone + Send> SolutionEvaluationListener<R> for BestSolutionProbe<R> {
    fn solution_evaluated_event(&self, solution: &Solution<R>) {
        let Ok(score) = solution.score() else { return };
        let mut state = lock(&self.state);
        let direction = state.direction;
        let improved = match &state.value {
            None => true,
            Some(best) => best.score().is_ok_and(|b| direction.is_better(score, b)),
        };
        if improved {
            state.value = Some(solution.clone());
        }
    }

    fn listener_name(&self) -> &str {
        Self::NAME
    }
}

impl<R: Clone + Send> RunProbe<R> for BestSolutionProbe<R> {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn initialise_before_run(&self, direction: Direction) {
        lock(&self.state).direction = direction;
    }

    fn reset(&self) {
        lock(&self.state).value = None;
    }

    fn observation(&self) -> Observation<R> {
        self.best_solution().map_or(Observation::Empty, Observation::Solution)
    }
}

/// Number of evaluation events seen during the run.
#[derive(Debug, Default)]
pub struct TotalEvaluationsProbe {
    count: AtomicU64,
}

impl TotalEvaluationsProbe {
    pub const NAME: &'static str = "total evaluations";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

impl<R> SolutionEvaluationListener<R> for TotalEvaluationsProbe {
    fn solution_evaluated_event(&self, _solution: &Solution<R>) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    fn listener_name(&self) -> &str {
        Self::NAME
    }
}

impl<R> RunProbe<R> for TotalEvaluationsProbe {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn reset(&self) {
        self.count.store(0, Ordering::Relaxed);
    }

    fn observation(&self) -> Observation<R> {
        Observation::Count(self.total())
    }
}

#[derive(Debug, Default)]
struct Stopwatch {
    started: Option<Instant>,
    elapsed: Option<Duration>,
}

/// Wall-clock length of the run, from attachment to detachment.
#[derive(Debug, Default)]
pub struct TimeLengthProbe {
    watch: Mutex<Stopwatch>,
}

impl TimeLengthProbe {
    pub const NAME: &'static str = "time length";

    pub fn new() -> Self {
        Self::default()
    }

    /// Final length once the run is over, running length while it is not.
    pub fn elapsed(&self) -> Option<Duration> {
        let watch = lock(&self.watch);
        watch.elapsed.or_else(|| watch.started.map(|s| s.elapsed()))
    }
}

impl<R> SolutionEvaluationListener<R> for TimeLengthProbe {
    fn solution_evaluated_event(&self, _solution: &Solution<R>) {}

    fn listener_name(&self) -> &str {
        Self::NAME
    }
}

impl<R> RunProbe<R> for TimeLengthProbe {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn initialise_before_run(&self, _direction: Direction) {
        let mut watch = lock(&self.watch);
        watch.started = Some(Instant::now());
        watch.elapsed = None;
    }

    fn cleanup_after_run(&self) {
        let mut watch = lock(&self.watch);
        watch.elapsed = watch.started.map(|s| s.elapsed());
    }

    fn reset(&self) {
        *lock(&self.watch) = Stopwatch::default();
    }

    fn observation(&self) -> Observation<R> {
        self.elapsed().map_or(Observation::Empty, Observation::Duration)
    }
}
