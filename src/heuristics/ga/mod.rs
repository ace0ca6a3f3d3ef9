//! Genetic Algorithm.
//!
//! Population-replacement search with elitism over any
//! [`SearchSpace`](crate::problem::SearchSpace); recombination and mutation
//! come from the domain.
//!
//! # Components
//!
//! - [`GaConfig`]: population size, rates, presets, seed
//! - [`Selection`]: tournament, roulette, rank
//! - [`GeneticAlgorithm`]: the [`Algorithm`](crate::algorithm::Algorithm)
//!
//! # References
//!
//! - Holland (1975), "Adaptation in Natural and Artificial Systems"
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization, and
//!   Machine Learning"

mod config;
mod runner;
mod selection;

pub use config::GaConfig;
pub use runner::GeneticAlgorithm;
pub use selection::Selection;
