//! SA execution loop.

use super::config::SaConfig;
use crate::algorithm::{Algorithm, RunContext};
use crate::error::{ConfigError, RunError};
use crate::heuristics::seed_parameter;
use crate::problem::{Direction, Problem, SearchSpace};
use crate::solution::Solution;
use rand::Rng;

/// Counters of the last run.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaStatistics {
    /// Moves accepted, improving ones included.
    pub accepted_moves: usize,

    /// Moves that strictly improved on the current solution.
    pub improving_moves: usize,

    /// Times the schedule restarted from the initial temperature.
    pub reheats: usize,

    /// Temperature when the run ended.
    pub final_temperature: f64,
}

/// Simulated Annealing over any [`SearchSpace`].
///
/// One epoch is one temperature level. Moves use the Metropolis criterion
/// on the direction-adjusted score difference.
///
/// # References
///
/// Kirkpatrick et al. (1983), Cerny (1985)
#[derive(Debug, Clone, Default)]
pub struct SimulatedAnnealing {
    config: SaConfig,
    statistics: SaStatistics,
}

impl SimulatedAnnealing {
    pub fn new(config: SaConfig) -> Self {
        Self {
            config,
            statistics: SaStatistics::default(),
        }
    }

    pub fn config(&self) -> &SaConfig {
        &self.config
    }

    /// Counters of the last run.
    pub fn statistics(&self) -> &SaStatistics {
        &self.statistics
    }
}

/// Score change of moving from `current` to `candidate`, positive when worse.
fn worsening(direction: Direction, current: f64, candidate: f64) -> f64 {
    match direction {
        Direction::Minimize => candidate - current,
        Direction::Maximize => current - candidate,
    }
}

impl<D: SearchSpace> Algorithm<D> for SimulatedAnnealing {
    fn name(&self) -> &str {
        "Simulated Annealing"
    }

    fn parameters(&self) -> Vec<(&'static str, String)> {
        vec![
            ("initial_temperature", self.config.initial_temperature.to_string()),
            ("min_temperature", self.config.min_temperature.to_string()),
            ("cooling", format!("{:?}", self.config.cooling)),
            (
                "iterations_per_temperature",
                self.config.iterations_per_temperature.to_string(),
            ),
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

    /// Spends about ten moves per unit of problem size at each level.
    fn automatically_configure(&mut self, problem: &Problem<D>) {
        self.config.iterations_per_temperature = (problem.domain().size() * 10).clamp(10, 1_000);
    }

    fn internal_execute_algorithm(
        &mut self,
        problem: &mut Problem<D>,
        ctx: &mut RunContext<D::Representation>,
    ) -> Result<(), RunError> {
        self.statistics = SaStatistics::default();
        let direction = problem.direction();

        if !problem.can_evaluate() {
            return Ok(());
        }
        let mut current = Solution::new(problem.domain().random_representation(ctx.rng()));
        problem.cost(&mut current)?;
        if !current.is_evaluated() {
            return Ok(());
        }
        let mut current_score = current.score()?;

        let mut temperature = self.config.initial_temperature;
        let mut step = 0usize;

        while problem.can_evaluate() {
            for _ in 0..self.config.inner_iterations() {
                if !problem.can_evaluate() {
                    break;
                }
                let mut neighbor = current.variant();
                problem.domain().mutate(neighbor.representation_mut(), ctx.rng());
                problem.cost(&mut neighbor)?;
                if !neighbor.is_evaluated() {
                    break;
                }
                let neighbor_score = neighbor.score()?;
                let delta = worsening(direction, current_score, neighbor_score);

                // Metropolis acceptance criterion
                let accept = if delta < 0.0 {
                    self.statistics.improving_moves += 1;
                    true
                } else {
                    let probability = (-delta / temperature).exp();
                    ctx.rng().random_range(0.0..1.0) < probability
                };

                if accept {
                    current = neighbor;
                    current_score = neighbor_score;
                    self.statistics.accepted_moves += 1;
                }
            }

            ctx.epoch_complete(problem, std::slice::from_ref(&current))?;

            temperature = self.config.cooling.cool(temperature, step, &self.config);
            step += 1;
            if temperature <= self.config.min_temperature {
                log::debug!("{}: reheating after {} levels", problem.name(), step);
                temperature = self.config.initial_temperature;
                step = 0;
                self.statistics.reheats += 1;
            }
        }

        self.statistics.final_temperature = temperature;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::{OneMax, Sphere};
    use crate::heuristics::sa::CoolingSchedule;
    use crate::probe::{BestScoreProbe, RunProbe};
    use crate::stop::EvaluationsStopCondition;
    use std::sync::Arc;

    fn run_sphere(config: SaConfig, budget: u64, seed: u64) -> (f64, SaStatistics, u64) {
        let mut problem = Problem::new(Sphere::new(2).with_step(0.05))
            .with_stop_condition(EvaluationsStopCondition::new(budget))
            .unwrap();
        let best = Arc::new(BestScoreProbe::new());
        RunProbe::<Vec<f64>>::initialise_before_run(best.as_ref(), Direction::Minimize);
        problem.add_listener(best.clone()).unwrap();

        let mut sa = SimulatedAnnealing::new(config);
        let mut ctx = RunContext::new(seed);
        sa.internal_execute_algorithm(&mut problem, &mut ctx).unwrap();
        (
            best.best_score().unwrap(),
            sa.statistics().clone(),
            problem.evaluations(),
        )
    }

    #[test]
    fn test_sa_sphere_geometric() {
        let config = SaConfig::default()
            .with_initial_temperature(10.0)
            .with_min_temperature(0.001)
            .with_cooling(CoolingSchedule::Geometric { alpha: 0.9 })
            .with_iterations_per_temperature(50);
        let (best, stats, evaluations) = run_sphere(config, 5_000, 42);

        assert_eq!(evaluations, 5_000);
        assert!(best < 0.5, "expected near-zero cost, got {best}");
        assert!(stats.improving_moves > 0);
        assert!(stats.accepted_moves >= stats.improving_moves);
    }

    #[test]
    fn test_sa_reheats_instead_of_stopping() {
        let config = SaConfig::default()
            .with_initial_temperature(1.0)
            .with_min_temperature(0.5)
            .with_cooling(CoolingSchedule::Linear { steps: 2 })
            .with_iterations_per_temperature(10);
        let (_, stats, evaluations) = run_sphere(config, 200, 1);

        assert_eq!(evaluations, 200);
        assert!(stats.reheats >= 5, "got {} reheats", stats.reheats);
    }

    #[test]
    fn test_sa_lundy_mees_maximizes() {
        let mut problem = Problem::new(OneMax::new(20))
            .with_stop_condition(EvaluationsStopCondition::new(2_000))
            .unwrap();
        let best = Arc::new(BestScoreProbe::new());
        RunProbe::<Vec<bool>>::initialise_before_run(best.as_ref(), Direction::Maximize);
        problem.add_listener(best.clone()).unwrap();

        let config = SaConfig::default()
            .with_initial_temperature(2.0)
            .with_min_temperature(0.01)
            .with_cooling(CoolingSchedule::LundyMees { beta: 0.01 });
        let mut sa = SimulatedAnnealing::new(config);
        let mut ctx = RunContext::new(8);
        sa.internal_execute_algorithm(&mut problem, &mut ctx).unwrap();

        assert!(best.best_score().unwrap() >= 17.0);
        // one epoch per move after the initial solution
        assert_eq!(ctx.epochs(), 1_999);
    }

    #[test]
    fn test_automatic_configuration_scales_with_size() {
        let mut sa = SimulatedAnnealing::default();
        Algorithm::<OneMax>::automatically_configure(&mut sa, &Problem::new(OneMax::new(30)));
        assert_eq!(sa.config().iterations_per_temperature, 300);
        Algorithm::<OneMax>::automatically_configure(&mut sa, &Problem::new(OneMax::new(1)));
        assert_eq!(sa.config().iterations_per_temperature, 10);
    }
}
