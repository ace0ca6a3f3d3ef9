//! Core trait definitions for algorithms.
//!
//! [`Algorithm`] is the contract between the executor and a concrete
//! optimizer. The executor owns the lifecycle; the algorithm only
//! implements the run loop and its own configuration.

use crate::error::{ConfigError, InitializationError, RunError};
use crate::problem::{Problem, ProblemDomain};
use crate::solution::Solution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Lifecycle state of an algorithm inside an executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlgorithmState {
    /// Configuration not validated yet, or rejected.
    Unconfigured,
    /// Configuration validated, run not started.
    Configured,
    /// Inside the run loop.
    Running,
    /// Run loop returned or failed.
    Finished,
}

/// A consistent, fully evaluated population at the end of an epoch.
#[derive(Debug)]
pub struct EpochSnapshot<'a, R> {
    /// Name of the problem being solved.
    pub problem: &'a str,
    /// Zero-based epoch number.
    pub epoch: usize,
    /// Evaluations performed so far in the run.
    pub evaluations: u64,
    /// The population. Listeners must not retain references past the call.
    pub population: &'a [Solution<R>],
}

/// Observer notified once per completed epoch.
pub trait EpochCompleteListener<R>: Send + Sync {
    fn epoch_complete_event(&self, snapshot: &EpochSnapshot<'_, R>);
}

/// Run-scoped state handed to [`Algorithm::internal_execute_algorithm`].
///
/// Owns the run's random number generator, seeded explicitly by the
/// executor, and the epoch listeners.
pub struct RunContext<R> {
    rng: StdRng,
    seed: u64,
    epoch: usize,
    listeners: Vec<Arc<dyn EpochCompleteListener<R>>>,
}

impl<R> RunContext<R> {
    /// Creates a context whose RNG is seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
            epoch: 0,
            listeners: Vec::new(),
        }
    }

    pub fn with_listeners(mut self, listeners: Vec<Arc<dyn EpochCompleteListener<R>>>) -> Self {
        self.listeners = listeners;
        self
    }

    /// The run's random number generator.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Seed the RNG was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of completed epochs.
    pub fn epochs(&self) -> usize {
        self.epoch
    }

    /// Reports a completed epoch to every listener, in registration order.
    ///
    /// # Errors
    /// [`RunError::InconsistentSnapshot`] if any solution in `population`
    /// is unevaluated. Listeners are not notified in that case.
    pub fn epoch_complete<D: ProblemDomain<Representation = R>>(
        &mut self,
        problem: &Problem<D>,
        population: &[Solution<R>],
    ) -> Result<(), RunError> {
        let unevaluated = population.iter().filter(|s| !s.is_evaluated()).count();
        if unevaluated > 0 {
            return Err(RunError::InconsistentSnapshot {
                epoch: self.epoch,
                unevaluated,
            });
        }

        let snapshot = EpochSnapshot {
            problem: problem.name(),
            epoch: self.epoch,
            evaluations: problem.evaluations(),
            population,
        };
        for listener in &self.listeners {
            listener.epoch_complete_event(&snapshot);
        }
        self.epoch += 1;
        Ok(())
    }
}

/// An optimization algorithm runnable against any problem of domain `D`.
///
/// # Run loop contract
///
/// [`internal_execute_algorithm`](Self::internal_execute_algorithm) must
/// check [`Problem::can_evaluate`] before producing new candidates and
/// return within one iteration once it is false. Batch evaluation may be
/// cut short by the budget, so the guard is re-checked after every
/// evaluation or batch. Each epoch ends with exactly one call to
/// [`RunContext::epoch_complete`] with an evaluated population.
///
/// Randomness comes only from [`RunContext::rng`], so a run is reproducible
/// from its seed.
pub trait Algorithm<D: ProblemDomain>: Send {
    /// Human-readable algorithm name.
    fn name(&self) -> &str;

    /// Tunable parameters as flat `(name, value)` pairs.
    fn parameters(&self) -> Vec<(&'static str, String)>;

    /// One-line description of the configuration.
    fn details(&self) -> String {
        let params: Vec<String> = self
            .parameters()
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        format!("{} [{}]", self.name(), params.join(", "))
    }

    /// Seed for the next run. `None` draws a fresh seed per run.
    fn seed(&self) -> Option<u64>;

    fn set_seed(&mut self, seed: Option<u64>);

    /// Fails fast with the first invalid parameter.
    fn validate_configuration(&self) -> Result<(), ConfigError>;

    /// Derives parameters from the problem (size, direction).
    fn automatically_configure(&mut self, _problem: &Problem<D>) {}

    /// Run-scoped preparation. Called after the problem is initialised.
    fn initialise_before_run(&mut self, _problem: &Problem<D>) -> Result<(), InitializationError> {
        Ok(())
    }

    /// The run loop.
    fn internal_execute_algorithm(
        &mut self,
        problem: &mut Problem<D>,
        ctx: &mut RunContext<D::Representation>,
    ) -> Result<(), RunError>;

    /// Releases run-scoped state. Called whether the run succeeded or not.
    fn cleanup_after_run(&mut self) {}
}

impl<D: ProblemDomain, A: Algorithm<D> + ?Sized> Algorithm<D> for Box<A> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn parameters(&self) -> Vec<(&'static str, String)> {
        (**self).parameters()
    }

    fn details(&self) -> String {
        (**self).details()
    }

    fn seed(&self) -> Option<u64> {
        (**self).seed()
    }

    fn set_seed(&mut self, seed: Option<u64>) {
        (**self).set_seed(seed)
    }

    fn validate_configuration(&self) -> Result<(), ConfigError> {
        (**self).validate_configuration()
    }

    fn automatically_configure(&mut self, problem: &Problem<D>) {
        (**self).automatically_configure(problem)
    }

    fn initialise_before_run(&mut self, problem: &Problem<D>) -> Result<(), InitializationError> {
        (**self).initialise_before_run(problem)
    }

    fn internal_execute_algorithm(
        &mut self,
        problem: &mut Problem<D>,
        ctx: &mut RunContext<D::Representation>,
    ) -> Result<(), RunError> {
        (**self).internal_execute_algorithm(problem, ctx)
    }

    fn cleanup_after_run(&mut self) {
        (**self).cleanup_after_run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::Sphere;
    use std::sync::Mutex;

    #[derive(Default)]
    struct EpochLog {
        sizes: Mutex<Vec<(usize, usize)>>,
    }

    impl EpochCompleteListener<Vec<f64>> for EpochLog {
        fn epoch_complete_event(&self, snapshot: &EpochSnapshot<'_, Vec<f64>>) {
            self.sizes
                .lock()
                .unwrap()
                .push((snapshot.epoch, snapshot.population.len()));
        }
    }

    #[test]
    fn test_epoch_complete_notifies_and_counts() {
        let log = Arc::new(EpochLog::default());
        let listener: Arc<dyn EpochCompleteListener<Vec<f64>>> = log.clone();
        let mut ctx = RunContext::new(1).with_listeners(vec![listener]);
        let mut problem = Problem::new(Sphere::new(1));
        let mut pop = vec![Solution::new(vec![0.5]), Solution::new(vec![1.0])];
        problem.cost_batch(&mut pop).unwrap();

        ctx.epoch_complete(&problem, &pop).unwrap();
        ctx.epoch_complete(&problem, &pop[..1]).unwrap();
        assert_eq!(ctx.epochs(), 2);
        assert_eq!(*log.sizes.lock().unwrap(), vec![(0, 2), (1, 1)]);
    }

    #[test]
    fn test_epoch_complete_rejects_unevaluated() {
        let mut ctx: RunContext<Vec<f64>> = RunContext::new(1);
        let problem = Problem::new(Sphere::new(1));
        let pop = vec![Solution::new(vec![0.5])];
        let err = ctx.epoch_complete(&problem, &pop).unwrap_err();
        assert_eq!(err, RunError::InconsistentSnapshot { epoch: 0, unevaluated: 1 });
        assert_eq!(ctx.epochs(), 0);
    }

    #[test]
    fn test_same_seed_same_stream() {
        use rand::Rng;
        let mut a: RunContext<()> = RunContext::new(99);
        let mut b: RunContext<()> = RunContext::new(99);
        let xs: Vec<u64> = (0..5).map(|_| a.rng().random()).collect();
        let ys: Vec<u64> = (0..5).map(|_| b.rng().random()).collect();
        assert_eq!(xs, ys);
    }
}
