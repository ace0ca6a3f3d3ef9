//! Execution core and statistical layer for empirical metaheuristic research.
//!
//! Problems and algorithms are plug-ins; this crate defines the contract
//! between them and everything around a run:
//!
//! - **Solutions and problems**: a [`Solution`](solution::Solution) holds a
//!   representation and a lazily assigned score; a
//!   [`Problem`](problem::Problem) wraps a domain, counts evaluations,
//!   notifies evaluation listeners and refuses to evaluate once a stop
//!   condition triggers.
//! - **Stop conditions**: evaluation budget, convergence, improvement
//!   stagnation, target score and wall-clock limit, composed by logical OR.
//! - **Algorithms**: the [`Algorithm`](algorithm::Algorithm) lifecycle,
//!   per-run RNG and epoch notifications.
//! - **Execution**: [`AlgorithmExecutor`](executor::AlgorithmExecutor) runs
//!   one configured algorithm on one problem, synchronously or on its own
//!   thread, with [run probes](probe) collecting statistics.
//! - **Experiments**: repeated, seeded runs of several contenders.
//! - **Statistics**: summaries, normality tests and comparison tests with
//!   automatic test selection.
//!
//! Reference plug-ins ([`domains`], [`heuristics`]) exercise the core.
//!
//! # Example
//!
//! ```
//! use u_metabench::domains::Sphere;
//! use u_metabench::executor::AlgorithmExecutor;
//! use u_metabench::heuristics::sa::{SaConfig, SimulatedAnnealing};
//! use u_metabench::probe::BestScoreProbe;
//! use u_metabench::problem::Problem;
//! use u_metabench::stop::EvaluationsStopCondition;
//! use std::sync::Arc;
//!
//! let best = Arc::new(BestScoreProbe::new());
//! let mut executor = AlgorithmExecutor::new(
//!     Problem::new(Sphere::new(5)),
//!     SimulatedAnnealing::new(SaConfig::default().with_seed(3)),
//! )
//! .with_stop_condition(EvaluationsStopCondition::new(5_000))
//! .unwrap()
//! .with_probe(best.clone());
//!
//! let report = executor.execute_and_wait().unwrap();
//! assert_eq!(report.evaluations, 5_000);
//! assert_eq!(report.observation(BestScoreProbe::NAME), best.best_score());
//! ```
//!
//! # Features
//!
//! - `parallel`: experiment runs on the rayon thread pool
//! - `serde`: `Serialize`/`Deserialize` for configs, reports and statistics

pub mod algorithm;
pub mod domains;
pub mod error;
pub mod executor;
pub mod experiment;
pub mod heuristics;
pub mod probe;
pub mod problem;
pub mod repr;
pub mod solution;
pub mod stats;
pub mod stop;

