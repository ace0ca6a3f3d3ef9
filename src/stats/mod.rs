//! Statistical analysis of experiment results.
//!
//! Summaries of per-run statistics, normality tests and comparison tests
//! between algorithms, plus the policy that picks a comparison test from the
//! normality verdicts.
//!
//! # Components
//!
//! - [`RunStatisticSummary`], [`DescriptiveStats`]: moments of one sample
//! - [`NormalityTest`]: Anderson-Darling, Cramér-von Mises, Lilliefors
//! - [`StatisticalComparisonTest`]: Welch t, Mann-Whitney U, ANOVA,
//!   Kruskal-Wallis
//! - [`select_comparison_test`], [`compare_samples`]: test selection
//!
//! # References
//!
//! - Stephens (1986), "Tests based on EDF statistics", in D'Agostino &
//!   Stephens, "Goodness-of-Fit Techniques"
//! - Dallal & Wilkinson (1986), "An analytic approximation to the
//!   distribution of Lilliefors's test statistic for normality"
//! - Derrac et al. (2011), "A practical tutorial on the use of nonparametric
//!   statistical tests as a methodology for comparing evolutionary and swarm
//!   intelligence algorithms"

mod comparison;
mod distribution;
mod normality;
mod policy;
mod summary;

pub use comparison::{ComparisonTestKind, NamedSample, StatisticalComparisonTest};
pub use normality::{NormalityTest, NormalityTestKind};
pub use policy::{compare_samples, select_comparison_test};
pub use summary::{DescriptiveStats, RunStatisticSummary};

use crate::error::AnalysisError;

/// Significance level used to reject a null hypothesis.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// A completed hypothesis test.
pub trait HypothesisTest {
    /// Display name of the test.
    fn name(&self) -> &str;

    /// Test statistic.
    fn statistic(&self) -> f64;

    /// p-value in `[0, 1]`.
    fn p_value(&self) -> f64;

    /// `true` when `p_value() <= SIGNIFICANCE_LEVEL`.
    fn can_reject_null_hypothesis(&self) -> bool {
        self.p_value() <= SIGNIFICANCE_LEVEL
    }

    /// Named values for display.
    fn report(&self) -> Vec<(String, String)>;
}

/// Rejects samples that are too small or contain non-finite values.
pub(crate) fn check_sample(
    test: &'static str,
    name: &str,
    values: &[f64],
    required: usize,
) -> Result<(), AnalysisError> {
    if values.len() < required {
        return Err(AnalysisError::InsufficientSample {
            test,
            name: name.to_string(),
            actual: values.len(),
            required,
        });
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(AnalysisError::NonFinite(name.to_string()));
    }
    Ok(())
}
