//! Error types for u-metabench.
//!
//! One enum per failure class. Run errors terminate a single run; analysis
//! errors only affect the post-hoc comparison of finished runs.

use thiserror::Error;

/// Invalid configuration, detected before any evaluation occurs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// A parameter holds a value outside its valid range.
    #[error("invalid value for `{field}`: {value} ({reason})")]
    InvalidParameter {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// The problem does not accept this kind of stop condition.
    #[error("stop condition `{condition}` is not supported by problem `{problem}`")]
    UnsupportedStopCondition { condition: String, problem: String },

    /// A run was requested on a problem without any stop condition.
    #[error("problem `{0}` has no stop condition, the run would never end")]
    NoStopCondition(String),
}

impl ConfigError {
    /// Shorthand for [`ConfigError::InvalidParameter`].
    pub fn invalid(field: &'static str, value: impl ToString, reason: impl Into<String>) -> Self {
        ConfigError::InvalidParameter {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Failure while preparing a run (dataset loading, external resources).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InitializationError {
    /// A resource the problem or algorithm needs could not be acquired.
    #[error("resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// Input data was found but could not be interpreted.
    #[error("malformed data: {0}")]
    MalformedData(String),
}

/// Misuse of a solution's evaluation state.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationError {
    /// The score of a solution was read before it was evaluated.
    #[error("score requested from an unevaluated solution")]
    Unevaluated,
}

/// Failure that terminates a running algorithm.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RunError {
    /// The algorithm produced a structurally invalid candidate.
    #[error("unsafe solution rejected by `{problem}`: {reason}")]
    UnsafeSolution { problem: String, reason: String },

    /// A decision was taken on an unevaluated solution.
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    /// A listener or stop condition was attached twice.
    #[error("`{0}` is already attached")]
    AlreadyAttached(String),

    /// A listener or stop condition was detached without being attached.
    #[error("`{0}` is not attached")]
    NotAttached(String),

    /// An epoch snapshot contained solutions that were never evaluated.
    #[error("epoch {epoch} snapshot contains {unevaluated} unevaluated solution(s)")]
    InconsistentSnapshot { epoch: usize, unevaluated: usize },

    /// Algorithm-specific failure.
    #[error("algorithm failure: {0}")]
    Algorithm(String),
}

/// Precondition failure in the statistical comparison layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    /// Wrong number of samples for the chosen test.
    #[error("{test} expects {expected} samples, got {actual}")]
    SampleCount {
        test: &'static str,
        expected: &'static str,
        actual: usize,
    },

    /// Two samples share a name.
    #[error("duplicate sample name `{0}`")]
    DuplicateName(String),

    /// A sample is too small for the test to be valid.
    #[error("sample `{name}` has {actual} observation(s), {test} requires at least {required}")]
    InsufficientSample {
        test: &'static str,
        name: String,
        actual: usize,
        required: usize,
    },

    /// A sample contains NaN or infinite values.
    #[error("sample `{0}` contains non-finite values")]
    NonFinite(String),

    /// Statistics were requested before `calculate()`.
    #[error("summary `{0}` has not been calculated")]
    NotCalculated(String),

    /// A reference distribution rejected its parameters.
    #[error("invalid reference distribution: {0}")]
    Distribution(String),
}

/// Failure reported by the executor for one run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExecutionError {
    /// The run never started.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The run was aborted before its first evaluation.
    #[error(transparent)]
    Initialization(#[from] InitializationError),

    /// The run started and was terminated by an error.
    #[error(transparent)]
    Run(#[from] RunError),

    /// The run panicked: on its own thread for an asynchronous run, or
    /// inside an experiment.
    #[error("run panicked")]
    Panicked,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_names_field_and_value() {
        let err = ConfigError::invalid("population_size", 1, "must be at least 2");
        let text = err.to_string();
        assert!(text.contains("population_size"));
        assert!(text.contains('1'));
    }

    #[test]
    fn test_run_error_wraps_evaluation_error() {
        let err: RunError = EvaluationError::Unevaluated.into();
        assert_eq!(err, RunError::Evaluation(EvaluationError::Unevaluated));
        let exec: ExecutionError = err.into();
        assert!(matches!(exec, ExecutionError::Run(_)));
    }
}
