//! Budget-enforcing evaluation of candidate solutions.

use super::listeners::{ListenerRegistry, SolutionEvaluationListener};
use super::types::{Direction, ProblemDomain};
use crate::error::{ConfigError, EvaluationError, ExecutionError, RunError};
use crate::solution::Solution;
use crate::stop::StopCondition;
use std::sync::Arc;

/// A stop condition and its latched trigger state.
#[derive(Debug)]
struct StopSlot {
    condition: Box<dyn StopCondition>,
    triggered: bool,
}

impl StopSlot {
    fn must_stop(&self) -> bool {
        self.triggered || self.condition.must_stop_internal()
    }
}

/// A problem domain wrapped with its run-scoped evaluation state.
///
/// `Problem` owns the stop conditions and the listener registry of one
/// run. Every evaluation goes through [`cost`](Self::cost) or
/// [`cost_batch`](Self::cost_batch), which refuse to evaluate once any stop
/// condition has triggered.
///
/// # Examples
///
/// ```
/// use u_metabench::domains::Sphere;
/// use u_metabench::problem::Problem;
/// use u_metabench::solution::Solution;
/// use u_metabench::stop::EvaluationsStopCondition;
///
/// let mut problem = Problem::new(Sphere::new(2))
///     .with_stop_condition(EvaluationsStopCondition::new(1))
///     .unwrap();
///
/// let mut a = Solution::new(vec![1.0, 1.0]);
/// let mut b = Solution::new(vec![0.0, 0.0]);
/// problem.cost(&mut a).unwrap();
/// problem.cost(&mut b).unwrap();
///
/// assert_eq!(a.score(), Ok(2.0));
/// assert!(!b.is_evaluated());
/// assert!(!problem.can_evaluate());
/// ```
pub struct Problem<D: ProblemDomain> {
    domain: D,
    stop_conditions: Vec<StopSlot>,
    listeners: ListenerRegistry<D::Representation>,
    evaluations: u64,
}

impl<D: ProblemDomain> Problem<D> {
    /// Wraps a domain with no stop conditions and no listeners.
    pub fn new(domain: D) -> Self {
        Self {
            domain,
            stop_conditions: Vec::new(),
            listeners: ListenerRegistry::default(),
            evaluations: 0,
        }
    }

    /// Builder form of [`add_stop_condition`](Self::add_stop_condition).
    pub fn with_stop_condition<S: StopCondition + 'static>(mut self, condition: S) -> Result<Self, ConfigError> {
        self.add_stop_condition(Box::new(condition))?;
        Ok(self)
    }

    /// Adds a stop condition, composed with the others by logical OR.
    ///
    /// # Errors
    /// The condition's own validation error, or
    /// [`ConfigError::UnsupportedStopCondition`] if the domain does not
    /// accept this kind.
    pub fn add_stop_condition(&mut self, condition: Box<dyn StopCondition>) -> Result<(), ConfigError> {
        condition.validate_configuration()?;
        if !self.domain.supported_stop_conditions().contains(&condition.kind()) {
            return Err(ConfigError::UnsupportedStopCondition {
                condition: condition.name().to_string(),
                problem: self.domain.name().to_string(),
            });
        }
        self.stop_conditions.push(StopSlot {
            condition,
            triggered: false,
        });
        Ok(())
    }

    /// Attached stop conditions, in insertion order.
    pub fn stop_conditions(&self) -> impl Iterator<Item = &dyn StopCondition> {
        self.stop_conditions.iter().map(|slot| slot.condition.as_ref())
    }

    /// Number of stop conditions.
    pub fn stop_condition_count(&self) -> usize {
        self.stop_conditions.len()
    }

    /// The wrapped domain.
    pub fn domain(&self) -> &D {
        &self.domain
    }

    /// The wrapped domain, for configuration between runs.
    pub fn domain_mut(&mut self) -> &mut D {
        &mut self.domain
    }

    pub fn name(&self) -> &str {
        self.domain.name()
    }

    pub fn direction(&self) -> Direction {
        self.domain.direction()
    }

    pub fn is_minimization(&self) -> bool {
        self.domain.direction() == Direction::Minimize
    }

    /// Evaluations performed since the last reset.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// True iff no stop condition requires the run to stop.
    ///
    /// O(number of stop conditions).
    pub fn can_evaluate(&self) -> bool {
        !self.stop_conditions.iter().any(StopSlot::must_stop)
    }

    /// Evaluates one solution.
    ///
    /// A no-op if the solution is already evaluated or the budget is
    /// exhausted; the solution then keeps its previous state. Otherwise the
    /// representation is safety-checked, scored, and every stop condition
    /// and listener is notified in registration order.
    ///
    /// # Errors
    /// [`RunError::UnsafeSolution`] if the domain rejects the candidate.
    pub fn cost(&mut self, solution: &mut Solution<D::Representation>) -> Result<(), RunError> {
        if solution.is_evaluated() || !self.refresh_can_evaluate() {
            return Ok(());
        }

        self.domain
            .check_solution_for_safety(solution.representation())
            .map_err(|reason| RunError::UnsafeSolution {
                problem: self.domain.name().to_string(),
                reason,
            })?;

        let score = self.domain.problem_specific_cost(solution.representation());
        solution.assign_score(score);
        self.evaluations += 1;
        log::trace!("{}: evaluation {} scored {}", self.domain.name(), self.evaluations, score);

        let direction = self.domain.direction();
        for slot in &mut self.stop_conditions {
            slot.condition.solution_evaluated_event(score, direction);
        }
        self.listeners.notify(solution);
        Ok(())
    }

    /// Evaluates a batch in order.
    ///
    /// Already evaluated solutions are skipped. Evaluation stops as soon as
    /// the budget is exhausted, leaving the rest of the batch unevaluated.
    /// Returns the number of solutions evaluated by this call.
    pub fn cost_batch(&mut self, solutions: &mut [Solution<D::Representation>]) -> Result<usize, RunError> {
        let mut evaluated = 0;
        for solution in solutions.iter_mut().filter(|s| !s.is_evaluated()) {
            if !self.refresh_can_evaluate() {
                break;
            }
            self.cost(solution)?;
            evaluated += 1;
        }
        Ok(evaluated)
    }

    /// Strict comparison: `a` improves on `b`.
    pub fn is_better(
        &self,
        a: &Solution<D::Representation>,
        b: &Solution<D::Representation>,
    ) -> Result<bool, EvaluationError> {
        Ok(self.direction().is_better(a.score()?, b.score()?))
    }

    /// Non-worsening comparison: `a` improves on or ties with `b`.
    pub fn is_better_or_same(
        &self,
        a: &Solution<D::Representation>,
        b: &Solution<D::Representation>,
    ) -> Result<bool, EvaluationError> {
        Ok(self.direction().is_better_or_same(a.score()?, b.score()?))
    }

    /// Attaches an evaluation listener for the current run.
    pub fn add_listener(
        &mut self,
        listener: Arc<dyn SolutionEvaluationListener<D::Representation>>,
    ) -> Result<(), RunError> {
        self.listeners.attach(listener)
    }

    /// Detaches a listener attached with [`add_listener`](Self::add_listener).
    pub fn remove_listener(
        &mut self,
        listener: &Arc<dyn SolutionEvaluationListener<D::Representation>>,
    ) -> Result<(), RunError> {
        self.listeners.detach(listener)
    }

    /// Number of attached listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Clears the evaluation count and every stop condition's state.
    pub fn reset(&mut self) {
        self.evaluations = 0;
        for slot in &mut self.stop_conditions {
            slot.condition.reset();
            slot.triggered = false;
        }
    }

    /// Prepares the domain and attaches the stop conditions.
    ///
    /// On failure, stop conditions attached so far are detached again.
    pub fn initialise_before_run(&mut self) -> Result<(), ExecutionError> {
        self.domain.initialise_before_run()?;
        for idx in 0..self.stop_conditions.len() {
            if let Err(e) = self.stop_conditions[idx].condition.initialise_before_run() {
                for slot in &mut self.stop_conditions[..idx] {
                    // attached a moment ago, detaching cannot fail
                    let _ = slot.condition.cleanup_after_run();
                }
                return Err(e.into());
            }
        }
        Ok(())
    }

    /// Detaches the stop conditions. Every condition is detached even if
    /// one fails; the first failure is returned.
    pub fn cleanup_after_run(&mut self) -> Result<(), RunError> {
        let mut first_error = None;
        for slot in &mut self.stop_conditions {
            if let Err(e) = slot.condition.cleanup_after_run() {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Latches newly triggered stop conditions and reports whether
    /// evaluation may continue.
    fn refresh_can_evaluate(&mut self) -> bool {
        let mut can_evaluate = true;
        for slot in &mut self.stop_conditions {
            if !slot.triggered && slot.condition.must_stop_internal() {
                slot.triggered = true;
                log::debug!(
                    "{}: stop condition `{}` triggered after {} evaluations",
                    self.domain.name(),
                    slot.condition.name(),
                    self.evaluations
                );
            }
            can_evaluate &= !slot.triggered;
        }
        can_evaluate
    }
}
