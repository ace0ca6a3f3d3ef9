//! Reference algorithms.
//!
//! Plug-in implementations of [`Algorithm`](crate::algorithm::Algorithm)
//! for any domain implementing [`SearchSpace`](crate::problem::SearchSpace).
//! They cover both loop shapes of the run contract:
//!
//! - single-point: [`RandomSearch`], [`HillClimber`], [`sa::SimulatedAnnealing`]
//! - population replacement: [`ga::GeneticAlgorithm`]

pub mod ga;
mod hill_climber;
mod random_search;
pub mod sa;

pub use ga::GeneticAlgorithm;
pub use hill_climber::{HillClimber, HillClimberConfig};
pub use random_search::RandomSearch;
pub use sa::SimulatedAnnealing;

/// Renders an optional seed as a parameter value.
pub(crate) fn seed_parameter(seed: Option<u64>) -> String {
    seed.map_or_else(|| "random".to_string(), |s| s.to_string())
}
