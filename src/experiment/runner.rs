//! Repeated-run experiment loop.

use super::config::ExperimentConfig;
use super::results::{ExperimentResults, RunRecord};
use crate::algorithm::Algorithm;
use crate::error::{ConfigError, ExecutionError};
use crate::executor::{AlgorithmExecutor, RunReport};
use crate::probe::{BestScoreProbe, TimeLengthProbe, TotalEvaluationsProbe};
use crate::problem::{Problem, ProblemDomain};
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

type ProblemFactory<D> = Box<dyn Fn() -> Result<Problem<D>, ConfigError> + Send + Sync>;
type AlgorithmFactory<D> = Box<dyn Fn() -> Box<dyn Algorithm<D>> + Send + Sync>;

struct Contender<D: ProblemDomain> {
    name: String,
    factory: AlgorithmFactory<D>,
}

/// Runs every contender `repetitions` times on fresh problem instances.
///
/// Each run gets a new problem from the factory (with its stop conditions)
/// and a new algorithm from the contender's factory, seeded with
/// `base_seed + repetition`. Every run carries a [`BestScoreProbe`], a
/// [`TotalEvaluationsProbe`] and a [`TimeLengthProbe`], so their names are
/// valid statistics for [`ExperimentResults::samples`]. A failed run is
/// recorded and does not stop the others; a run that panics is recorded as
/// [`ExecutionError::Panicked`].
///
/// # Examples
///
/// ```
/// use u_metabench::domains::OneMax;
/// use u_metabench::experiment::{Experiment, ExperimentConfig};
/// use u_metabench::heuristics::{HillClimber, HillClimberConfig, RandomSearch};
/// use u_metabench::probe::BestScoreProbe;
/// use u_metabench::problem::Problem;
/// use u_metabench::stop::EvaluationsStopCondition;
///
/// let results = Experiment::new(ExperimentConfig::default().with_repetitions(5), || {
///     Problem::new(OneMax::new(16)).with_stop_condition(EvaluationsStopCondition::new(100))
/// })
/// .with_contender("random", RandomSearch::new)
/// .with_contender("climber", || HillClimber::new(HillClimberConfig::default()))
/// .run()
/// .unwrap();
///
/// assert_eq!(results.success_count(), 10);
/// assert_eq!(results.samples(BestScoreProbe::NAME)[0].len(), 5);
/// ```
pub struct Experiment<D: ProblemDomain> {
    config: ExperimentConfig,
    problem_factory: ProblemFactory<D>,
    contenders: Vec<Contender<D>>,
    automatic_configuration: bool,
}

impl<D: ProblemDomain + 'static> Experiment<D> {
    pub fn new<F>(config: ExperimentConfig, problem_factory: F) -> Self
    where
        F: Fn() -> Result<Problem<D>, ConfigError> + Send + Sync + 'static,
    {
        Self {
            config,
            problem_factory: Box::new(problem_factory),
            contenders: Vec::new(),
            automatic_configuration: false,
        }
    }

    /// Adds an algorithm under `name`; `factory` builds a fresh instance
    /// for every run.
    pub fn with_contender<A, F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        A: Algorithm<D> + 'static,
        F: Fn() -> A + Send + Sync + 'static,
    {
        self.contenders.push(Contender {
            name: name.into(),
            factory: Box::new(move || Box::new(factory()) as Box<dyn Algorithm<D>>),
        });
        self
    }

    /// Lets each algorithm tune itself to the problem before every run.
    pub fn with_automatic_configuration(mut self, enabled: bool) -> Self {
        self.automatic_configuration = enabled;
        self
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.config.validate()?;
        if self.contenders.is_empty() {
            return Err(ConfigError::invalid("contenders", 0, "at least one contender is required"));
        }
        let mut names = HashSet::new();
        for contender in &self.contenders {
            if !names.insert(contender.name.as_str()) {
                return Err(ConfigError::invalid("contenders", &contender.name, "contender names must be distinct"));
            }
        }
        Ok(())
    }

    /// Executes all runs.
    ///
    /// Only an invalid experiment configuration fails here; run failures
    /// are part of the results.
    pub fn run(&self) -> Result<ExperimentResults, ConfigError> {
        self.validate()?;

        let jobs: Vec<(usize, usize)> = (0..self.contenders.len())
            .flat_map(|c| (0..self.config.repetitions).map(move |r| (c, r)))
            .collect();
        log::info!(
            "experiment: {} contender(s) x {} repetition(s), base seed {}",
            self.contenders.len(),
            self.config.repetitions,
            self.config.base_seed
        );

        let records = self.run_jobs(&jobs);
        let results = ExperimentResults::new(self.contenders.iter().map(|c| c.name.clone()).collect(), records);

        for (record, error) in results.failures() {
            log::warn!(
                "experiment: {} repetition {} (seed {}) failed: {error}",
                record.contender,
                record.repetition,
                record.seed
            );
        }
        log::info!(
            "experiment: {} of {} runs succeeded",
            results.success_count(),
            results.records().len()
        );
        Ok(results)
    }

    #[cfg(feature = "parallel")]
    fn run_jobs(&self, jobs: &[(usize, usize)]) -> Vec<RunRecord> {
        use rayon::prelude::*;

        if self.config.parallel {
            jobs.par_iter().map(|&(c, r)| self.run_one(c, r)).collect()
        } else {
            jobs.iter().map(|&(c, r)| self.run_one(c, r)).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn run_jobs(&self, jobs: &[(usize, usize)]) -> Vec<RunRecord> {
        jobs.iter().map(|&(c, r)| self.run_one(c, r)).collect()
    }

    fn run_one(&self, contender: usize, repetition: usize) -> RunRecord {
        let Contender { name, factory } = &self.contenders[contender];
        let seed = self.config.seed_for(repetition);
        // each run owns fresh problem and algorithm instances
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.execute(factory, seed))).unwrap_or_else(|_| {
            log::warn!("experiment: {name} repetition {repetition} (seed {seed}) panicked");
            Err(ExecutionError::Panicked)
        });
        RunRecord {
            contender: name.clone(),
            repetition,
            seed,
            outcome,
        }
    }

    fn execute(&self, factory: &AlgorithmFactory<D>, seed: u64) -> Result<RunReport, ExecutionError> {
        let problem = (self.problem_factory)()?;
        let mut algorithm = factory();
        algorithm.set_seed(Some(seed));

        AlgorithmExecutor::new(problem, algorithm)
            .with_probe(Arc::new(BestScoreProbe::new()))
            .with_probe(Arc::new(TotalEvaluationsProbe::new()))
            .with_probe(Arc::new(TimeLengthProbe::new()))
            .with_automatic_configuration(self.automatic_configuration)
            .execute_and_wait()
    }
}
