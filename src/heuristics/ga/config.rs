//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.
//! Termination is not configured here: the run ends when the problem's stop
//! conditions refuse further evaluations.

use super::selection::Selection;
use crate::error::ConfigError;

/// Configuration for the Genetic Algorithm.
///
/// # Defaults
///
/// ```
/// use u_metabench::heuristics::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_metabench::heuristics::ga::{GaConfig, Selection};
///
/// let config = GaConfig::default()
///     .with_population_size(200)
///     .with_selection(Selection::Tournament(5))
///     .with_elite_ratio(0.1)
///     .with_mutation_rate(0.1);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of individuals in the population.
    ///
    /// Larger populations increase diversity but slow down each generation.
    /// Typical range: 50 to 500.
    pub population_size: usize,

    /// Selection strategy for choosing parents.
    pub selection: Selection,

    /// Fraction of the population preserved as elites (0.0 to 1.0).
    ///
    /// Elite individuals are copied unchanged, with their scores, to the
    /// next generation and are never re-evaluated.
    pub elite_ratio: f64,

    /// Probability of recombining a pair of parents (0.0 to 1.0).
    ///
    /// When recombination is not applied, a copy of the first parent is used.
    pub crossover_rate: f64,

    /// Probability of mutating an offspring (0.0 to 1.0).
    pub mutation_rate: f64,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            selection: Selection::default(),
            elite_ratio: 0.1,
            crossover_rate: 0.9,
            mutation_rate: 0.1,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    /// Sets the elite ratio.
    pub fn with_elite_ratio(mut self, ratio: f64) -> Self {
        self.elite_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Convenience builder for setting tournament size.
    ///
    /// Equivalent to `.with_selection(Selection::Tournament(k))`.
    pub fn with_tournament_size(self, k: usize) -> Self {
        self.with_selection(Selection::Tournament(k))
    }

    /// Preset for small problems: small population, light pressure.
    ///
    /// - Population: 50, Tournament(2)
    pub fn fast() -> Self {
        Self {
            population_size: 50,
            selection: Selection::Tournament(2),
            ..Self::default()
        }
    }

    /// Preset for medium problems.
    ///
    /// - Population: 100, Tournament(3)
    pub fn balanced() -> Self {
        Self {
            population_size: 100,
            selection: Selection::Tournament(3),
            ..Self::default()
        }
    }

    /// Preset for large problems: large population, fewer elites.
    ///
    /// - Population: 150, Tournament(4), elite ratio 0.05
    pub fn quality() -> Self {
        Self {
            population_size: 150,
            selection: Selection::Tournament(4),
            elite_ratio: 0.05,
            ..Self::default()
        }
    }

    /// Automatically selects a preset based on problem size.
    ///
    /// - `item_count < 50` → [`fast()`](Self::fast)
    /// - `50 ≤ item_count < 200` → [`balanced()`](Self::balanced)
    /// - `item_count ≥ 200` → [`quality()`](Self::quality)
    ///
    /// The `item_count` is a domain-specific measure of problem size
    /// (bits, dimensions, cities).
    pub fn auto_select(item_count: usize) -> Self {
        if item_count < 50 {
            Self::fast()
        } else if item_count < 200 {
            Self::balanced()
        } else {
            Self::quality()
        }
    }

    /// Number of elites carried into the next generation.
    pub(crate) fn elite_count(&self) -> usize {
        (self.population_size as f64 * self.elite_ratio) as usize
    }

    /// Validates the configuration.
    ///
    /// Returns the first invalid parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::invalid(
                "population_size",
                self.population_size,
                "must be at least 2",
            ));
        }
        if !(0.0..=1.0).contains(&self.elite_ratio) || self.elite_count() >= self.population_size {
            return Err(ConfigError::invalid(
                "elite_ratio",
                self.elite_ratio,
                "elites must leave room for offspring",
            ));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(ConfigError::invalid(
                "crossover_rate",
                self.crossover_rate,
                "must be in [0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::invalid(
                "mutation_rate",
                self.mutation_rate,
                "must be in [0, 1]",
            ));
        }
        if self.selection == Selection::Tournament(0) {
            return Err(ConfigError::invalid("selection", "Tournament(0)", "tournament size must be at least 1"));
        }
        Ok(())
    }
}
