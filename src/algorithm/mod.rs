//! Algorithm contract.
//!
//! # Core Types
//!
//! - [`Algorithm`]: configuration validation, initialisation, run loop
//! - [`RunContext`]: explicitly seeded RNG and epoch notification for one run
//! - [`EpochCompleteListener`]: per-epoch population observer
//! - [`AlgorithmState`]: `Unconfigured → Configured → Running → Finished`
//!
//! Concrete algorithms live in [`crate::heuristics`].

mod types;

pub use types::{Algorithm, AlgorithmState, EpochCompleteListener, EpochSnapshot, RunContext};
