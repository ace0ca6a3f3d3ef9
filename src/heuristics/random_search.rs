//! Random search: one random candidate per epoch.

use super::seed_parameter;
use crate::algorithm::{Algorithm, RunContext};
use crate::error::{ConfigError, RunError};
use crate::problem::{Problem, SearchSpace};
use crate::solution::Solution;

/// Samples independent random candidates until the run must stop.
///
/// The baseline every other algorithm should beat.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RandomSearch {
    seed: Option<u64>,
}

impl RandomSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl<D: SearchSpace> Algorithm<D> for RandomSearch {
    fn name(&self) -> &str {
        "Random Search"
    }

    fn parameters(&self) -> Vec<(&'static str, String)> {
        vec![("seed", seed_parameter(self.seed))]
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn set_seed(&mut self, seed: Option<u64>) {
        self.seed = seed;
    }

    fn validate_configuration(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    fn internal_execute_algorithm(
        &mut self,
        problem: &mut Problem<D>,
        ctx: &mut RunContext<D::Representation>,
    ) -> Result<(), RunError> {
        while problem.can_evaluate() {
            let mut candidate = Solution::new(problem.domain().random_representation(ctx.rng()));
            problem.cost(&mut candidate)?;
            if !candidate.is_evaluated() {
                break;
            }
            ctx.epoch_complete(problem, std::slice::from_ref(&candidate))?;
        }
        Ok(())
    }
}
