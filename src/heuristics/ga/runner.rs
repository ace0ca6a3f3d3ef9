//! GA evolutionary loop.
//!
//! [`GeneticAlgorithm`] drives the generational cycle:
//! initialization → evaluation → selection → recombination → mutation → repeat.

use super::config::GaConfig;
use crate::algorithm::{Algorithm, RunContext};
use crate::error::{ConfigError, RunError};
use crate::heuristics::seed_parameter;
use crate::problem::{Problem, SearchSpace};
use crate::solution::{normalise_relative_scores, sort_best_first, Solution};
use rand::Rng;

/// Generational GA with elitism over any [`SearchSpace`].
///
/// Each generation keeps the elites with their scores, breeds offspring
/// from parents chosen by index, and evaluates the offspring as one batch.
/// One epoch is one generation. If the budget runs out inside the batch,
/// the unevaluated offspring are dropped and the last epoch reports the
/// smaller, fully evaluated population.
///
/// # Usage
///
/// ```
/// use u_metabench::domains::OneMax;
/// use u_metabench::executor::AlgorithmExecutor;
/// use u_metabench::heuristics::ga::{GaConfig, GeneticAlgorithm};
/// use u_metabench::problem::Problem;
/// use u_metabench::stop::EvaluationsStopCondition;
///
/// let ga = GeneticAlgorithm::new(GaConfig::fast().with_seed(42));
/// let mut executor = AlgorithmExecutor::new(Problem::new(OneMax::new(20)), ga)
///     .with_stop_condition(EvaluationsStopCondition::new(1_000))
///     .unwrap();
/// let report = executor.execute_and_wait().unwrap();
/// assert_eq!(report.evaluations, 1_000);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GeneticAlgorithm {
    config: GaConfig,
}

impl GeneticAlgorithm {
    pub fn new(config: GaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }
}

impl<D: SearchSpace> Algorithm<D> for GeneticAlgorithm {
    fn name(&self) -> &str {
        "Genetic Algorithm"
    }

    fn parameters(&self) -> Vec<(&'static str, String)> {
        vec![
            ("population_size", self.config.population_size.to_string()),
            ("selection", format!("{:?}", self.config.selection)),
            ("elite_ratio", self.config.elite_ratio.to_string()),
            ("crossover_rate", self.config.crossover_rate.to_string()),
            ("mutation_rate", self.config.mutation_rate.to_string()),
            ("seed", seed_parameter(self.config.seed)),
        ]
    }

    fn seed(&self) -> Option<u64> {
        self.config.seed
    }

    fn set_seed(&mut self, seed: Option<u64>) {
        self.config.seed = seed;
    }

    fn validate_configuration(&self) -> Result<(), ConfigError> {
        self.config.validate()
    }

    /// Picks a preset from the problem size, keeping the seed.
    fn automatically_configure(&mut self, problem: &Problem<D>) {
        let seed = self.config.seed;
        self.config = GaConfig {
            seed,
            ..GaConfig::auto_select(problem.domain().size())
        };
    }

    fn internal_execute_algorithm(
        &mut self,
        problem: &mut Problem<D>,
        ctx: &mut RunContext<D::Representation>,
    ) -> Result<(), RunError> {
        let direction = problem.direction();
        let config = &self.config;

        // 1. Initialize and evaluate the population
        let mut population: Vec<Solution<D::Representation>> = (0..config.population_size)
            .map(|_| Solution::new(problem.domain().random_representation(ctx.rng())))
            .collect();
        problem.cost_batch(&mut population)?;
        population.retain(Solution::is_evaluated);
        if population.is_empty() {
            return Ok(());
        }
        ctx.epoch_complete(problem, &population)?;

        // 2. Generational loop, guarded by the budget
        while problem.can_evaluate() {
            normalise_relative_scores(&mut population, direction);
            sort_best_first(&mut population, direction);

            let elite_count = config.elite_count().min(population.len());
            let mut offspring = Vec::with_capacity(config.population_size - elite_count);
            while elite_count + offspring.len() < config.population_size {
                let (Some(p1), Some(p2)) = (
                    config.selection.select(&population, direction, ctx.rng()),
                    config.selection.select(&population, direction, ctx.rng()),
                ) else {
                    break;
                };

                let mut child = if ctx.rng().random_range(0.0..1.0) < config.crossover_rate {
                    problem.domain().recombine(
                        population[p1].representation(),
                        population[p2].representation(),
                        ctx.rng(),
                    )
                } else {
                    population[p1].representation().clone()
                };
                if ctx.rng().random_range(0.0..1.0) < config.mutation_rate {
                    problem.domain().mutate(&mut child, ctx.rng());
                }
                offspring.push(Solution::new(child));
            }

            problem.cost_batch(&mut offspring)?;
            offspring.retain(Solution::is_evaluated);
            if offspring.is_empty() {
                break;
            }

            population.truncate(elite_count);
            population.append(&mut offspring);
            ctx.epoch_complete(problem, &population)?;
        }
        Ok(())
    }
}
