//! Algorithm execution.
//!
//! [`AlgorithmExecutor`] wires an algorithm, a problem, its stop conditions
//! and probes together and drives the lifecycle
//! `Unconfigured → Configured → Running → Finished`, synchronously with
//! [`execute_and_wait`](AlgorithmExecutor::execute_and_wait) or on a
//! dedicated thread with [`execute`](AlgorithmExecutor::execute).

mod report;
mod runner;

pub use report::{ExecutionListener, RunReport};
pub use runner::{AlgorithmExecutor, ExecutionHandle};
