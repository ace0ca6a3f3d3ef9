//! Single-run orchestration of an (algorithm, problem) pairing.

use super::report::{ExecutionListener, RunReport};
use crate::algorithm::{Algorithm, AlgorithmState, EpochCompleteListener, RunContext};
use crate::error::{ConfigError, ExecutionError, RunError};
use crate::probe::RunProbe;
use crate::problem::{Problem, ProblemDomain, SolutionEvaluationListener};
use crate::stop::StopCondition;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

type Probes<R> = Vec<Arc<dyn RunProbe<R>>>;
type Attached<R> = Vec<Arc<dyn SolutionEvaluationListener<R>>>;

/// Runs one algorithm against one problem, with probes and listeners.
///
/// Every call to [`execute_and_wait`](Self::execute_and_wait) is an
/// independent run: the problem, its stop conditions and the probes are
/// reset first, and the RNG is seeded from [`Algorithm::seed`] (a fresh
/// random seed when `None`).
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_metabench::domains::Sphere;
/// use u_metabench::executor::AlgorithmExecutor;
/// use u_metabench::heuristics::RandomSearch;
/// use u_metabench::probe::TotalEvaluationsProbe;
/// use u_metabench::problem::Problem;
/// use u_metabench::stop::EvaluationsStopCondition;
///
/// let evaluations = Arc::new(TotalEvaluationsProbe::new());
/// let mut executor = AlgorithmExecutor::new(Problem::new(Sphere::new(3)), RandomSearch::new().with_seed(1))
///     .with_stop_condition(EvaluationsStopCondition::new(50))
///     .unwrap()
///     .with_probe(evaluations.clone());
///
/// let report = executor.execute_and_wait().unwrap();
/// assert_eq!(report.evaluations, 50);
/// assert_eq!(evaluations.total(), 50);
/// ```
pub struct AlgorithmExecutor<D: ProblemDomain, A: Algorithm<D>> {
    problem: Problem<D>,
    algorithm: A,
    probes: Probes<D::Representation>,
    epoch_listeners: Vec<Arc<dyn EpochCompleteListener<D::Representation>>>,
    execution_listeners: Vec<Arc<dyn ExecutionListener>>,
    automatic_configuration: bool,
    state: AlgorithmState,
}

impl<D: ProblemDomain, A: Algorithm<D>> AlgorithmExecutor<D, A> {
    pub fn new(problem: Problem<D>, algorithm: A) -> Self {
        Self {
            problem,
            algorithm,
            probes: Vec::new(),
            epoch_listeners: Vec::new(),
            execution_listeners: Vec::new(),
            automatic_configuration: false,
            state: AlgorithmState::Unconfigured,
        }
    }

    /// Adds a stop condition to the problem.
    pub fn with_stop_condition<S: StopCondition + 'static>(mut self, condition: S) -> Result<Self, ConfigError> {
        self.problem.add_stop_condition(Box::new(condition))?;
        Ok(self)
    }

    /// Attaches a probe for every subsequent run.
    pub fn with_probe<P: RunProbe<D::Representation> + 'static>(mut self, probe: Arc<P>) -> Self {
        self.probes.push(probe);
        self
    }

    pub fn with_epoch_listener<L: EpochCompleteListener<D::Representation> + 'static>(
        mut self,
        listener: Arc<L>,
    ) -> Self {
        self.epoch_listeners.push(listener);
        self
    }

    pub fn with_execution_listener<L: ExecutionListener + 'static>(mut self, listener: Arc<L>) -> Self {
        self.execution_listeners.push(listener);
        self
    }

    /// Lets the algorithm derive its parameters from the problem before
    /// every run.
    pub fn with_automatic_configuration(mut self, enabled: bool) -> Self {
        self.automatic_configuration = enabled;
        self
    }

    pub fn problem(&self) -> &Problem<D> {
        &self.problem
    }

    pub fn problem_mut(&mut self) -> &mut Problem<D> {
        &mut self.problem
    }

    pub fn algorithm(&self) -> &A {
        &self.algorithm
    }

    pub fn algorithm_mut(&mut self) -> &mut A {
        &mut self.algorithm
    }

    /// Lifecycle state of the last (or current) run.
    pub fn state(&self) -> AlgorithmState {
        self.state
    }

    pub fn into_parts(self) -> (Problem<D>, A) {
        (self.problem, self.algorithm)
    }

    /// Runs to completion on the calling thread.
    ///
    /// # Errors
    /// - [`ExecutionError::Config`]: invalid algorithm configuration or no
    ///   stop condition; nothing was evaluated.
    /// - [`ExecutionError::Initialization`]: the problem or algorithm could
    ///   not be prepared; nothing was evaluated.
    /// - [`ExecutionError::Run`]: the run loop failed. Probes and stop
    ///   conditions are detached regardless.
    pub fn execute_and_wait(&mut self) -> Result<RunReport, ExecutionError> {
        let algorithm = self.algorithm.name().to_string();
        let problem = self.problem.name().to_string();
        for listener in &self.execution_listeners {
            listener.run_started(&algorithm, &problem);
        }

        let outcome = self.run();
        if let Err(e) = &outcome {
            log::warn!("{algorithm} on {problem}: run failed: {e}");
        }

        for listener in &self.execution_listeners {
            listener.run_finished(&outcome);
        }
        outcome
    }

    fn configure(&mut self) -> Result<(), ConfigError> {
        self.state = AlgorithmState::Unconfigured;
        if self.automatic_configuration {
            self.algorithm.automatically_configure(&self.problem);
        }
        self.algorithm.validate_configuration()?;
        if self.problem.stop_condition_count() == 0 {
            return Err(ConfigError::NoStopCondition(self.problem.name().to_string()));
        }
        self.state = AlgorithmState::Configured;
        Ok(())
    }

    fn run(&mut self) -> Result<RunReport, ExecutionError> {
        self.configure()?;

        let seed = self.algorithm.seed().unwrap_or_else(rand::random);
        log::info!(
            "{}: running {} (seed {})",
            self.problem.name(),
            self.algorithm.details(),
            seed
        );

        self.problem.reset();
        for probe in &self.probes {
            probe.reset();
        }

        self.problem.initialise_before_run()?;
        let attached = match attach_probes(&mut self.problem, &self.probes) {
            Ok(attached) => attached,
            Err(e) => {
                let _ = self.problem.cleanup_after_run();
                return Err(e.into());
            }
        };
        if let Err(e) = self.algorithm.initialise_before_run(&self.problem) {
            self.algorithm.cleanup_after_run();
            let _ = teardown(&mut self.problem, &self.probes, &attached);
            return Err(e.into());
        }

        self.state = AlgorithmState::Running;
        let mut ctx = RunContext::new(seed).with_listeners(self.epoch_listeners.clone());
        let started = Instant::now();
        let outcome = self
            .algorithm
            .internal_execute_algorithm(&mut self.problem, &mut ctx);
        let elapsed = started.elapsed();

        self.algorithm.cleanup_after_run();
        let cleanup = teardown(&mut self.problem, &self.probes, &attached);
        self.state = AlgorithmState::Finished;
        outcome?;
        cleanup?;

        let report = RunReport {
            algorithm: self.algorithm.name().to_string(),
            problem: self.problem.name().to_string(),
            seed,
            evaluations: self.problem.evaluations(),
            epochs: ctx.epochs(),
            elapsed,
            observations: self
                .probes
                .iter()
                .map(|p| (p.name().to_string(), p.observation().as_f64()))
                .collect(),
        };
        log::info!(
            "{}: {} finished after {} evaluations, {} epochs, {:.3?}",
            report.problem,
            report.algorithm,
            report.evaluations,
            report.epochs,
            report.elapsed
        );
        Ok(report)
    }
}

impl<D, A> AlgorithmExecutor<D, A>
where
    D: ProblemDomain + 'static,
    A: Algorithm<D> + 'static,
{
    /// Runs on a dedicated thread.
    ///
    /// The executor moves into the thread and is handed back by
    /// [`ExecutionHandle::wait`].
    pub fn execute(mut self) -> ExecutionHandle<D, A> {
        let handle = std::thread::spawn(move || {
            let outcome = self.execute_and_wait();
            (self, outcome)
        });
        ExecutionHandle { handle }
    }
}

type Joined<D, A> = (AlgorithmExecutor<D, A>, Result<RunReport, ExecutionError>);

/// A run in progress on another thread.
pub struct ExecutionHandle<D: ProblemDomain, A: Algorithm<D>> {
    handle: JoinHandle<Joined<D, A>>,
}

impl<D: ProblemDomain, A: Algorithm<D>> ExecutionHandle<D, A> {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Blocks until the run ends.
    ///
    /// Returns the executor for reuse, or `None` with
    /// [`ExecutionError::Panicked`] if the run thread panicked.
    pub fn wait(self) -> (Option<AlgorithmExecutor<D, A>>, Result<RunReport, ExecutionError>) {
        match self.handle.join() {
            Ok((executor, outcome)) => (Some(executor), outcome),
            Err(_) => {
                log::warn!("run thread panicked");
                (None, Err(ExecutionError::Panicked))
            }
        }
    }
}

/// Attaches every probe as an evaluation listener. On failure the probes
/// attached so far are detached again.
fn attach_probes<D: ProblemDomain>(
    problem: &mut Problem<D>,
    probes: &Probes<D::Representation>,
) -> Result<Attached<D::Representation>, RunError> {
    let direction = problem.direction();
    let mut attached: Attached<D::Representation> = Vec::with_capacity(probes.len());
    for probe in probes {
        let listener: Arc<dyn SolutionEvaluationListener<D::Representation>> = probe.clone();
        if let Err(e) = problem.add_listener(listener.clone()) {
            let _ = teardown_probes(problem, probes, &attached);
            return Err(e);
        }
        probe.initialise_before_run(direction);
        attached.push(listener);
    }
    Ok(attached)
}

fn teardown_probes<D: ProblemDomain>(
    problem: &mut Problem<D>,
    probes: &Probes<D::Representation>,
    attached: &Attached<D::Representation>,
) -> Result<(), RunError> {
    let mut first_error = None;
    for (probe, listener) in probes.iter().zip(attached) {
        probe.cleanup_after_run();
        if let Err(e) = problem.remove_listener(listener) {
            first_error.get_or_insert(e);
        }
    }
    first_error.map_or(Ok(()), Err)
}

/// Detaches probes, then stop conditions. Reports the first failure.
fn teardown<D: ProblemDomain>(
    problem: &mut Problem<D>,
    probes: &Probes<D::Representation>,
    attached: &Attached<D::Representation>,
) -> Result<(), RunError> {
    let probes_detached = teardown_probes(problem, probes, attached);
    let problem_cleaned = problem.cleanup_after_run();
    probes_detached.and(problem_cleaned)
}
