//! Problems and their evaluation contract.
//!
//! A concrete domain implements the capability traits in [`types`]; the
//! execution core wraps it in a [`Problem`], which enforces the evaluation
//! budget, checks candidates for safety, and notifies listeners.
//!
//! # Key Types
//!
//! - [`Problem`]: run-scoped evaluation state around a domain
//! - [`Direction`]: minimize or maximize, with the comparison semantics
//! - [`ListenerRegistry`]: ordered, run-scoped evaluation observers

mod evaluation;
mod listeners;
mod types;

pub use evaluation::Problem;
pub use listeners::{ListenerRegistry, SolutionEvaluationListener};
pub use types::{
    BinaryRepresentable, CoordinateRepresentable, Direction, Evaluable, ProblemDomain, SafetyCheckable,
    SearchSpace,
};
