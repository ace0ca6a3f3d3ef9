//! Single-point hill climbing.

use super::seed_parameter;
use crate::algorithm::{Algorithm, RunContext};
use crate::error::{ConfigError, RunError};
use crate::problem::{Problem, SearchSpace};
use crate::solution::Solution;

/// Configuration for [`HillClimber`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HillClimberConfig {
    /// Accept challengers that tie with the incumbent.
    ///
    /// Lets the search drift across plateaus.
    pub accept_equal: bool,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for HillClimberConfig {
    fn default() -> Self {
        Self {
            accept_equal: true,
            seed: None,
        }
    }
}

impl HillClimberConfig {
    pub fn with_accept_equal(mut self, accept: bool) -> Self {
        self.accept_equal = accept;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Keeps one incumbent and replaces it with a mutated challenger whenever
/// the challenger is better (or not worse, with drift).
#[derive(Debug, Clone, Default)]
pub struct HillClimber {
    config: HillClimberConfig,
}

impl HillClimber {
    pub fn new(config: HillClimberConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HillClimberConfig {
        &self.config
    }
}

impl<D: SearchSpace> Algorithm<D> for HillClimber {
    fn name(&self) -> &str {
        "Hill Climber"
    }

    fn parameters(&self) -> Vec<(&'static str, String)> {
        vec![
            ("accept_equal", self.config.accept_equal.to_string()),
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
        Ok(())
    }

    fn internal_execute_algorithm(
        &mut self,
        problem: &mut Problem<D>,
        ctx: &mut RunContext<D::Representation>,
    ) -> Result<(), RunError> {
        if !problem.can_evaluate() {
            return Ok(());
        }
        let mut incumbent = Solution::new(problem.domain().random_representation(ctx.rng()));
        problem.cost(&mut incumbent)?;
        if !incumbent.is_evaluated() {
            return Ok(());
        }
        ctx.epoch_complete(problem, std::slice::from_ref(&incumbent))?;

        while problem.can_evaluate() {
            let mut challenger = incumbent.variant();
            problem.domain().mutate(challenger.representation_mut(), ctx.rng());
            problem.cost(&mut challenger)?;
            if !challenger.is_evaluated() {
                break;
            }

            let accept = if self.config.accept_equal {
                problem.is_better_or_same(&challenger, &incumbent)?
            } else {
                problem.is_better(&challenger, &incumbent)?
            };
            if accept {
                incumbent = challenger;
            }
            ctx.epoch_complete(problem, std::slice::from_ref(&incumbent))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::{EpochCompleteListener, EpochSnapshot};
    use crate::domains::OneMax;
    use crate::stop::{EvaluationsStopCondition, TargetScoreStopCondition};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Incumbents {
        scores: Mutex<Vec<f64>>,
    }

    impl EpochCompleteListener<Vec<bool>> for Incumbents {
        fn epoch_complete_event(&self, snapshot: &EpochSnapshot<'_, Vec<bool>>) {
            let score = snapshot.population[0].score().unwrap();
            self.scores.lock().unwrap().push(score);
        }
    }

    #[test]
    fn test_incumbent_never_worsens() {
        let incumbents = Arc::new(Incumbents::default());
        let mut problem = Problem::new(OneMax::new(32))
            .with_stop_condition(EvaluationsStopCondition::new(300))
            .unwrap();
        let listener: Arc<dyn EpochCompleteListener<Vec<bool>>> = incumbents.clone();
        let mut ctx = RunContext::new(11).with_listeners(vec![listener]);
        let mut climber = HillClimber::new(HillClimberConfig::default().with_accept_equal(false));
        climber.internal_execute_algorithm(&mut problem, &mut ctx).unwrap();

        let scores = incumbents.scores.lock().unwrap();
        assert_eq!(scores.len(), 300);
        assert!(scores.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_solves_small_onemax() {
        let mut problem = Problem::new(OneMax::new(12))
            .with_stop_condition(EvaluationsStopCondition::new(5_000))
            .unwrap()
            .with_stop_condition(TargetScoreStopCondition::new(12.0))
            .unwrap();
        let mut ctx = RunContext::new(3);
        let mut climber = HillClimber::default();
        climber.internal_execute_algorithm(&mut problem, &mut ctx).unwrap();
        assert!(!problem.can_evaluate());
        assert!(problem.evaluations() < 5_000, "target should be reached first");
    }
}
