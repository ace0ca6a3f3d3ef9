//! Choice of comparison test from normality verdicts.

use super::comparison::{ComparisonTestKind, NamedSample, StatisticalComparisonTest};
use super::normality::{NormalityTest, NormalityTestKind};
use crate::error::AnalysisError;

/// Picks the comparison test for `samples`.
///
/// Every sample is tested with `normality`. If all are normal the
/// parametric test is used (t-test for 2 samples, ANOVA for more),
/// otherwise the rank-based one (Mann-Whitney U, Kruskal-Wallis). A sample
/// too small for the normality test counts as non-normal.
pub fn select_comparison_test(
    samples: &[NamedSample],
    normality: NormalityTestKind,
) -> Result<ComparisonTestKind, AnalysisError> {
    if samples.len() < 2 {
        return Err(AnalysisError::SampleCount {
            test: "comparison",
            expected: "at least 2",
            actual: samples.len(),
        });
    }

    let mut all_normal = true;
    for sample in samples {
        let normal = match NormalityTest::evaluate(normality, sample.name(), sample.values()) {
            Ok(test) => test.is_normal(),
            Err(AnalysisError::InsufficientSample { .. }) => false,
            Err(e) => return Err(e),
        };
        log::debug!("{normality} on `{}`: normal={normal}", sample.name());
        all_normal &= normal;
    }

    Ok(match (all_normal, samples.len()) {
        (true, 2) => ComparisonTestKind::StudentT,
        (true, _) => ComparisonTestKind::Anova,
        (false, 2) => ComparisonTestKind::MannWhitneyU,
        (false, _) => ComparisonTestKind::KruskalWallis,
    })
}

/// Selects a test with [`select_comparison_test`] and runs it.
pub fn compare_samples(
    samples: &[NamedSample],
    normality: NormalityTestKind,
) -> Result<StatisticalComparisonTest, AnalysisError> {
    let kind = select_comparison_test(samples, normality)?;
    log::info!("comparing {} samples with {kind}", samples.len());
    StatisticalComparisonTest::evaluate(kind, samples)
}
