//! Simulated Annealing.
//!
//! Single-point search that accepts worsening moves with probability
//! `exp(-delta / T)` while the temperature `T` follows a cooling schedule.
//!
//! # Components
//!
//! - [`SaConfig`]: temperatures, iterations per level, seed
//! - [`CoolingSchedule`]: geometric, linear, or Lundy-Mees
//! - [`SimulatedAnnealing`]: the [`Algorithm`](crate::algorithm::Algorithm)
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical approach to the traveling salesman problem"
//! - Lundy & Mees (1986), "Convergence of an annealing algorithm"

mod config;
mod runner;

pub use config::{CoolingSchedule, SaConfig};
pub use runner::{SaStatistics, SimulatedAnnealing};
