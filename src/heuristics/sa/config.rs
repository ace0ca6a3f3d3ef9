//! SA configuration and cooling schedules.

use crate::error::ConfigError;

/// Cooling schedule for temperature reduction.
///
/// # References
///
/// - Geometric: standard textbook approach
/// - Linear: fixed-duration cooling
/// - LundyMees: Lundy & Mees (1986), with convergence proof
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoolingSchedule {
    /// Geometric (exponential) cooling: `T_{k+1} = alpha * T_k`.
    ///
    /// Most widely used. Typical `alpha`: 0.95 to 0.99.
    Geometric {
        /// Cooling factor in (0, 1). Higher = slower cooling.
        alpha: f64,
    },

    /// Linear cooling: `T_k = T_0 - k * (T_0 - T_min) / steps`.
    ///
    /// Reaches the minimum temperature after `steps` temperature levels.
    Linear {
        /// Number of temperature levels in one cooling cycle.
        steps: usize,
    },

    /// Lundy-Mees cooling: `T_{k+1} = T_k / (1 + beta * T_k)`.
    ///
    /// One iteration per temperature step. Cools fast at high T,
    /// slow at low T.
    ///
    /// Reference: Lundy & Mees (1986)
    LundyMees {
        /// Cooling parameter. Typically `(T_0 - T_min) / (max_iter * T_0 * T_min)`.
        beta: f64,
    },
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        CoolingSchedule::Geometric { alpha: 0.95 }
    }
}

impl CoolingSchedule {
    /// Temperature after level `step` has been completed.
    pub(crate) fn cool(&self, temperature: f64, step: usize, config: &SaConfig) -> f64 {
        match *self {
            CoolingSchedule::Geometric { alpha } => temperature * alpha,
            CoolingSchedule::Linear { steps } => {
                let t = config.initial_temperature
                    - (step + 1) as f64 * (config.initial_temperature - config.min_temperature)
                        / steps as f64;
                t.max(config.min_temperature)
            }
            CoolingSchedule::LundyMees { beta } => temperature / (1.0 + beta * temperature),
        }
    }
}

/// Configuration for [`SimulatedAnnealing`](super::SimulatedAnnealing).
///
/// The evaluation budget comes from the problem's stop conditions. When the
/// temperature falls to `min_temperature` the schedule restarts from
/// `initial_temperature` (reheating), so the run ends only when the problem
/// refuses further evaluations.
///
/// # Examples
///
/// ```
/// use u_metabench::heuristics::sa::{CoolingSchedule, SaConfig};
///
/// let config = SaConfig::default()
///     .with_initial_temperature(100.0)
///     .with_min_temperature(0.001)
///     .with_cooling(CoolingSchedule::Geometric { alpha: 0.98 })
///     .with_iterations_per_temperature(200);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaConfig {
    /// Initial temperature. Higher values allow more exploration.
    pub initial_temperature: f64,

    /// Minimum temperature. Reaching it triggers a reheat.
    pub min_temperature: f64,

    /// Cooling schedule.
    pub cooling: CoolingSchedule,

    /// Number of iterations at each temperature level.
    ///
    /// For `LundyMees`, this is ignored (1 iteration per temperature).
    pub iterations_per_temperature: usize,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            min_temperature: 1e-6,
            cooling: CoolingSchedule::default(),
            iterations_per_temperature: 100,
            seed: None,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_iterations_per_temperature(mut self, n: usize) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Iterations spent at one temperature level.
    pub(crate) fn inner_iterations(&self) -> usize {
        match self.cooling {
            CoolingSchedule::LundyMees { .. } => 1,
            _ => self.iterations_per_temperature,
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_temperature <= 0.0 {
            return Err(ConfigError::invalid(
                "initial_temperature",
                self.initial_temperature,
                "must be positive",
            ));
        }
        if self.min_temperature <= 0.0 {
            return Err(ConfigError::invalid(
                "min_temperature",
                self.min_temperature,
                "must be positive",
            ));
        }
        if self.min_temperature >= self.initial_temperature {
            return Err(ConfigError::invalid(
                "min_temperature",
                self.min_temperature,
                format!("must be less than initial_temperature ({})", self.initial_temperature),
            ));
        }
        if self.iterations_per_temperature == 0 {
            return Err(ConfigError::invalid(
                "iterations_per_temperature",
                0,
                "must be at least 1",
            ));
        }
        match self.cooling {
            CoolingSchedule::Geometric { alpha } => {
                if alpha <= 0.0 || alpha >= 1.0 {
                    return Err(ConfigError::invalid("alpha", alpha, "must be in (0, 1)"));
                }
            }
            CoolingSchedule::LundyMees { beta } => {
                if beta <= 0.0 {
                    return Err(ConfigError::invalid("beta", beta, "must be positive"));
                }
            }
            CoolingSchedule::Linear { steps } => {
                if steps == 0 {
                    return Err(ConfigError::invalid("steps", steps, "must be at least 1"));
                }
            }
        }
        Ok(())
    }
}
