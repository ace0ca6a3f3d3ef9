//! Experiment configuration.

use crate::error::ConfigError;

/// Configuration for repeated-run experiments.
///
/// # Examples
///
/// ```
/// use u_metabench::experiment::ExperimentConfig;
///
/// let config = ExperimentConfig::default()
///     .with_repetitions(20)
///     .with_base_seed(1_000);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.seed_for(3), 1_003);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExperimentConfig {
    /// Independent runs per contender.
    ///
    /// Rank-based comparison of two contenders needs more than 10.
    pub repetitions: usize,

    /// Seed of repetition `r` is `base_seed + r`, shared by all contenders.
    pub base_seed: u64,

    /// Runs are spread over the rayon thread pool when the `parallel`
    /// feature is enabled. Ignored otherwise.
    pub parallel: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            repetitions: 30,
            base_seed: 0,
            parallel: false,
        }
    }
}

impl ExperimentConfig {
    pub fn with_repetitions(mut self, n: usize) -> Self {
        self.repetitions = n;
        self
    }

    pub fn with_base_seed(mut self, seed: u64) -> Self {
        self.base_seed = seed;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Seed of the given repetition.
    pub fn seed_for(&self, repetition: usize) -> u64 {
        self.base_seed.wrapping_add(repetition as u64)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repetitions == 0 {
            return Err(ConfigError::invalid("repetitions", self.repetitions, "must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExperimentConfig::default();
        assert_eq!(config.repetitions, 30);
        assert_eq!(config.base_seed, 0);
        assert!(!config.parallel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_repetitions_rejected() {
        assert!(matches!(
            ExperimentConfig::default().with_repetitions(0).validate(),
            Err(ConfigError::InvalidParameter {
                field: "repetitions",
                ..
            })
        ));
    }

    #[test]
    fn test_seed_wraps() {
        let config = ExperimentConfig::default().with_base_seed(u64::MAX);
        assert_eq!(config.seed_for(0), u64::MAX);
        assert_eq!(config.seed_for(1), 0);
    }
}
