//! Comparison tests between the samples of several algorithms.
//!
//! Two-population tests (Welch's t, Mann-Whitney U) take exactly two
//! samples; n-population tests (one-way ANOVA, Kruskal-Wallis H) take two
//! or more. The null hypothesis is always that the populations do not
//! differ in location.

use super::distribution::{chi_squared_survival, f_survival, student_t_two_sided};
use super::{check_sample, HypothesisTest, SIGNIFICANCE_LEVEL};
use crate::error::AnalysisError;
use statrs::function::erf::erfc;
use std::collections::HashSet;
use std::f64::consts::SQRT_2;
use std::fmt;

/// A labelled sample of one statistic, one value per run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NamedSample {
    name: String,
    values: Vec<f64>,
}

impl NamedSample {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    fn variance(&self) -> f64 {
        let mean = self.mean();
        self.values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (self.values.len() - 1) as f64
    }
}

/// Available comparison tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComparisonTestKind {
    /// Welch's unequal-variance t-test. Parametric, two samples.
    StudentT,
    /// Mann-Whitney U with normal approximation. Non-parametric, two samples
    /// of more than 10 observations each.
    MannWhitneyU,
    /// One-way analysis of variance. Parametric, two or more samples.
    Anova,
    /// Kruskal-Wallis H. Non-parametric, two or more samples.
    KruskalWallis,
}

impl ComparisonTestKind {
    pub fn is_two_population(self) -> bool {
        matches!(self, ComparisonTestKind::StudentT | ComparisonTestKind::MannWhitneyU)
    }

    pub fn is_parametric(self) -> bool {
        matches!(self, ComparisonTestKind::StudentT | ComparisonTestKind::Anova)
    }

    /// Smallest number of observations per sample.
    pub fn minimum_sample_size(self) -> usize {
        match self {
            ComparisonTestKind::StudentT | ComparisonTestKind::Anova => 2,
            ComparisonTestKind::MannWhitneyU => 11,
            ComparisonTestKind::KruskalWallis => 1,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ComparisonTestKind::StudentT => "Student's t (Welch)",
            ComparisonTestKind::MannWhitneyU => "Mann-Whitney U",
            ComparisonTestKind::Anova => "one-way ANOVA",
            ComparisonTestKind::KruskalWallis => "Kruskal-Wallis H",
        }
    }
}

impl fmt::Display for ComparisonTestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of a comparison test.
///
/// # Examples
///
/// ```
/// use u_metabench::stats::{ComparisonTestKind, HypothesisTest, NamedSample, StatisticalComparisonTest};
///
/// let ga = NamedSample::new("GA", vec![10.1, 10.4, 9.8, 10.0, 10.3]);
/// let sa = NamedSample::new("SA", vec![12.0, 12.2, 11.9, 12.4, 12.1]);
/// let test = StatisticalComparisonTest::evaluate(ComparisonTestKind::StudentT, &[ga, sa]).unwrap();
/// assert!(test.can_reject_null_hypothesis());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatisticalComparisonTest {
    kind: ComparisonTestKind,
    sample_names: Vec<String>,
    statistic: f64,
    p_value: f64,
    degrees_of_freedom: Vec<f64>,
    details: Vec<(String, String)>,
}

impl StatisticalComparisonTest {
    /// Runs `kind` on `samples`.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::SampleCount`] when a two-population test does not
    ///   get exactly 2 samples, or an n-population test gets fewer than 2
    /// - [`AnalysisError::DuplicateName`] when two samples share a name
    /// - [`AnalysisError::InsufficientSample`] when a sample is smaller than
    ///   [`ComparisonTestKind::minimum_sample_size`]
    /// - [`AnalysisError::NonFinite`] for NaN or infinite values
    /// - [`AnalysisError::Distribution`] when the reference distribution
    ///   rejects the computed degrees of freedom
    pub fn evaluate(kind: ComparisonTestKind, samples: &[NamedSample]) -> Result<Self, AnalysisError> {
        validate(kind, samples)?;
        let result = match kind {
            ComparisonTestKind::StudentT => welch_t(&samples[0], &samples[1])?,
            ComparisonTestKind::MannWhitneyU => mann_whitney_u(&samples[0], &samples[1]),
            ComparisonTestKind::Anova => anova(samples)?,
            ComparisonTestKind::KruskalWallis => kruskal_wallis(samples)?,
        };
        log::debug!(
            "{kind}: statistic={:.6}, p={:.6} over {} samples",
            result.statistic,
            result.p_value,
            samples.len()
        );

        Ok(Self {
            kind,
            sample_names: samples.iter().map(|s| s.name.clone()).collect(),
            statistic: result.statistic,
            p_value: result.p_value.clamp(0.0, 1.0),
            degrees_of_freedom: result.degrees_of_freedom,
            details: result.details,
        })
    }

    pub fn kind(&self) -> ComparisonTestKind {
        self.kind
    }

    pub fn sample_names(&self) -> &[String] {
        &self.sample_names
    }

    /// Empty for Mann-Whitney U; `[between, within]` for ANOVA.
    pub fn degrees_of_freedom(&self) -> &[f64] {
        &self.degrees_of_freedom
    }
}

impl HypothesisTest for StatisticalComparisonTest {
    fn name(&self) -> &str {
        self.kind.label()
    }

    fn statistic(&self) -> f64 {
        self.statistic
    }

    fn p_value(&self) -> f64 {
        self.p_value
    }

    fn report(&self) -> Vec<(String, String)> {
        let mut report = vec![
            ("test".to_string(), self.kind.to_string()),
            ("samples".to_string(), self.sample_names.join(", ")),
        ];
        report.extend(self.details.iter().cloned());
        report.push(("statistic".into(), format!("{:.6}", self.statistic)));
        if !self.degrees_of_freedom.is_empty() {
            let df: Vec<String> = self.degrees_of_freedom.iter().map(|d| format!("{d:.3}")).collect();
            report.push(("df".into(), df.join(", ")));
        }
        report.push(("p-value".into(), format!("{:.6}", self.p_value)));
        report.push(("alpha".into(), SIGNIFICANCE_LEVEL.to_string()));
        report.push(("reject H0".into(), self.can_reject_null_hypothesis().to_string()));
        report
    }
}

struct Outcome {
    statistic: f64,
    p_value: f64,
    degrees_of_freedom: Vec<f64>,
    details: Vec<(String, String)>,
}

fn validate(kind: ComparisonTestKind, samples: &[NamedSample]) -> Result<(), AnalysisError> {
    let count_ok = if kind.is_two_population() {
        samples.len() == 2
    } else {
        samples.len() >= 2
    };
    if !count_ok {
        return Err(AnalysisError::SampleCount {
            test: kind.label(),
            expected: if kind.is_two_population() { "exactly 2" } else { "at least 2" },
            actual: samples.len(),
        });
    }

    let mut names = HashSet::with_capacity(samples.len());
    for sample in samples {
        if !names.insert(sample.name.as_str()) {
            return Err(AnalysisError::DuplicateName(sample.name.clone()));
        }
    }

    for sample in samples {
        check_sample(kind.label(), &sample.name, &sample.values, kind.minimum_sample_size())?;
    }
    Ok(())
}

fn mean_details(samples: &[&NamedSample]) -> Vec<(String, String)> {
    samples
        .iter()
        .map(|s| (format!("mean {}", s.name), format!("{:.6}", s.mean())))
        .collect()
}

/// Welch's t-test; a zero standard error gives p = 1 for equal means and
/// p = 0 otherwise.
fn welch_t(a: &NamedSample, b: &NamedSample) -> Result<Outcome, AnalysisError> {
    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let (m1, m2) = (a.mean(), b.mean());
    let (q1, q2) = (a.variance() / n1, b.variance() / n2);
    let se2 = q1 + q2;

    let (t, df, p) = if se2 > 0.0 {
        let t = (m1 - m2) / se2.sqrt();
        let df = se2 * se2 / (q1 * q1 / (n1 - 1.0) + q2 * q2 / (n2 - 1.0));
        (t, df, student_t_two_sided(t, df)?)
    } else if m1 == m2 {
        (0.0, n1 + n2 - 2.0, 1.0)
    } else {
        let t = if m1 > m2 { f64::INFINITY } else { f64::NEG_INFINITY };
        (t, n1 + n2 - 2.0, 0.0)
    };

    Ok(Outcome {
        statistic: t,
        p_value: p,
        degrees_of_freedom: vec![df],
        details: mean_details(&[a, b]),
    })
}

/// Average ranks (1-based) of `values`, and the tie term `Σ (t³ - t)`.
fn average_ranks(values: &[f64]) -> (Vec<f64>, f64) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&i, &j| values[i].total_cmp(&values[j]));

    let mut ranks = vec![0.0; values.len()];
    let mut ties = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end share the average of ranks start+1..=end
        let rank = (start + end + 1) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        let t = (end - start) as f64;
        ties += t * t * t - t;
        start = end;
    }
    (ranks, ties)
}

/// Pools the samples and returns the rank sum of each one.
fn rank_sums(samples: &[&NamedSample]) -> (Vec<f64>, f64) {
    let pooled: Vec<f64> = samples.iter().flat_map(|s| s.values.iter().copied()).collect();
    let (ranks, ties) = average_ranks(&pooled);

    let mut sums = Vec::with_capacity(samples.len());
    let mut offset = 0;
    for sample in samples {
        sums.push(ranks[offset..offset + sample.len()].iter().sum());
        offset += sample.len();
    }
    (sums, ties)
}

/// Mann-Whitney U with tie-corrected normal approximation and continuity
/// correction. Reports `U` of the first sample.
fn mann_whitney_u(a: &NamedSample, b: &NamedSample) -> Outcome {
    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let n = n1 + n2;
    let (sums, ties) = rank_sums(&[a, b]);

    let u1 = sums[0] - n1 * (n1 + 1.0) / 2.0;
    let expected = n1 * n2 / 2.0;
    let variance = n1 * n2 / 12.0 * ((n + 1.0) - ties / (n * (n - 1.0)));

    let p = if variance > 0.0 {
        let z = ((u1 - expected).abs() - 0.5).max(0.0) / variance.sqrt();
        erfc(z / SQRT_2)
    } else {
        1.0
    };

    let mut details = vec![
        (format!("U {}", a.name), format!("{u1:.1}")),
        (format!("U {}", b.name), format!("{:.1}", n1 * n2 - u1)),
    ];
    details.extend(mean_details(&[a, b]));
    Outcome {
        statistic: u1,
        p_value: p,
        degrees_of_freedom: Vec::new(),
        details,
    }
}

/// One-way ANOVA. A zero within-group mean square gives p = 1 when the
/// group means coincide and p = 0 otherwise.
fn anova(samples: &[NamedSample]) -> Result<Outcome, AnalysisError> {
    let k = samples.len() as f64;
    let total: usize = samples.iter().map(NamedSample::len).sum();
    let n = total as f64;
    let grand_mean = samples.iter().flat_map(|s| s.values.iter()).sum::<f64>() / n;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for sample in samples {
        let mean = sample.mean();
        ss_between += sample.len() as f64 * (mean - grand_mean).powi(2);
        ss_within += sample.values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    }
    let (df_between, df_within) = (k - 1.0, n - k);
    let ms_between = ss_between / df_between;
    let ms_within = ss_within / df_within;

    let (f, p) = if ms_within > 0.0 {
        let f = ms_between / ms_within;
        (f, f_survival(f, df_between, df_within)?)
    } else if ms_between == 0.0 {
        (0.0, 1.0)
    } else {
        (f64::INFINITY, 0.0)
    };

    let refs: Vec<&NamedSample> = samples.iter().collect();
    let mut details = mean_details(&refs);
    details.push(("MS between".into(), format!("{ms_between:.6}")));
    details.push(("MS within".into(), format!("{ms_within:.6}")));
    Ok(Outcome {
        statistic: f,
        p_value: p,
        degrees_of_freedom: vec![df_between, df_within],
        details,
    })
}

/// Kruskal-Wallis H with tie correction, against chi-squared with `k - 1`
/// degrees of freedom. A sample of identical values gives p = 1.
fn kruskal_wallis(samples: &[NamedSample]) -> Result<Outcome, AnalysisError> {
    let k = samples.len() as f64;
    let n = samples.iter().map(NamedSample::len).sum::<usize>() as f64;
    let refs: Vec<&NamedSample> = samples.iter().collect();
    let (sums, ties) = rank_sums(&refs);

    let h_raw = 12.0 / (n * (n + 1.0))
        * samples
            .iter()
            .zip(&sums)
            .map(|(s, r)| r * r / s.len() as f64)
            .sum::<f64>()
        - 3.0 * (n + 1.0);
    let correction = 1.0 - ties / (n * n * n - n);

    let (h, p) = if correction > 0.0 {
        let h = (h_raw / correction).max(0.0);
        (h, chi_squared_survival(h, k - 1.0)?)
    } else {
        (0.0, 1.0)
    };

    let details = samples
        .iter()
        .zip(&sums)
        .map(|(s, r)| (format!("mean rank {}", s.name), format!("{:.3}", r / s.len() as f64)))
        .collect();
    Ok(Outcome {
        statistic: h,
        p_value: p,
        degrees_of_freedom: vec![k - 1.0],
        details,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample(name: &str, values: &[f64]) -> NamedSample {
        NamedSample::new(name, values.to_vec())
    }

    fn spread(n: usize, offset: f64) -> Vec<f64> {
        (0..n).map(|i| offset + ((i * 7) % 13) as f64 * 0.5).collect()
    }

    #[test]
    fn test_identical_samples_not_rejected() {
        let a = sample("A", &spread(20, 0.0));
        let b = sample("B", &spread(20, 0.0));
        for kind in [
            ComparisonTestKind::StudentT,
            ComparisonTestKind::MannWhitneyU,
            ComparisonTestKind::Anova,
            ComparisonTestKind::KruskalWallis,
        ] {
            let test = StatisticalComparisonTest::evaluate(kind, &[a.clone(), b.clone()]).unwrap();
            assert!(!test.can_reject_null_hypothesis(), "{kind}: p = {}", test.p_value());
            assert!(test.p_value() > 0.9, "{kind}: p = {}", test.p_value());
        }
    }

    #[test]
    fn test_shifted_samples_rejected() {
        let a = sample("A", &spread(20, 0.0));
        let b = sample("B", &spread(20, 100.0));
        for kind in [
            ComparisonTestKind::StudentT,
            ComparisonTestKind::MannWhitneyU,
            ComparisonTestKind::Anova,
            ComparisonTestKind::KruskalWallis,
        ] {
            let test = StatisticalComparisonTest::evaluate(kind, &[a.clone(), b.clone()]).unwrap();
            assert!(test.can_reject_null_hypothesis(), "{kind}: p = {}", test.p_value());
        }
    }

    #[test]
    fn test_welch_t_known_value() {
        // means 3 and 6, variances 2.5 and 2.5, n = 5: t = -3 / 1 = -3, df = 8
        let a = sample("a", &[1.0, 2.0, 3.0, 4.0, 5.0]);
        let b = sample("b", &[4.0, 5.0, 6.0, 7.0, 8.0]);
        let test = StatisticalComparisonTest::evaluate(ComparisonTestKind::StudentT, &[a, b]).unwrap();
        assert!((test.statistic() + 3.0).abs() < 1e-12);
        assert!((test.degrees_of_freedom()[0] - 8.0).abs() < 1e-9);
        assert!((test.p_value() - 0.017071).abs() < 1e-4);
    }

    #[test]
    fn test_welch_t_zero_variance() {
        let same = StatisticalComparisonTest::evaluate(
            ComparisonTestKind::StudentT,
            &[sample("a", &[4.0; 5]), sample("b", &[4.0; 6])],
        )
        .unwrap();
        assert_eq!(same.p_value(), 1.0);

        let apart = StatisticalComparisonTest::evaluate(
            ComparisonTestKind::StudentT,
            &[sample("a", &[4.0; 5]), sample("b", &[5.0; 6])],
        )
        .unwrap();
        assert_eq!(apart.p_value(), 0.0);
        assert!(apart.can_reject_null_hypothesis());
    }

    #[test]
    fn test_anova_textbook_example() {
        let samples = [
            sample("g1", &[6.0, 8.0, 4.0, 5.0, 3.0, 4.0]),
            sample("g2", &[8.0, 12.0, 9.0, 11.0, 6.0, 8.0]),
            sample("g3", &[13.0, 9.0, 11.0, 8.0, 7.0, 12.0]),
        ];
        let test = StatisticalComparisonTest::evaluate(ComparisonTestKind::Anova, &samples).unwrap();
        // MSB = 84 / 2, MSW = 68 / 15
        assert!((test.statistic() - 42.0 / (68.0 / 15.0)).abs() < 1e-9);
        assert_eq!(test.degrees_of_freedom(), &[2.0, 15.0]);
        assert!(test.p_value() > 0.001 && test.p_value() < 0.005, "p = {}", test.p_value());
    }

    #[test]
    fn test_kruskal_wallis_separated_groups() {
        let samples = [
            sample("a", &[1.0, 2.0, 3.0]),
            sample("b", &[4.0, 5.0, 6.0]),
            sample("c", &[7.0, 8.0, 9.0]),
        ];
        let test = StatisticalComparisonTest::evaluate(ComparisonTestKind::KruskalWallis, &samples).unwrap();
        assert!((test.statistic() - 7.2).abs() < 1e-9);
        assert!((test.p_value() - (-3.6f64).exp()).abs() < 1e-9);
    }

    #[test]
    fn test_kruskal_wallis_all_tied() {
        let samples = [sample("a", &[2.0; 4]), sample("b", &[2.0; 3])];
        let test = StatisticalComparisonTest::evaluate(ComparisonTestKind::KruskalWallis, &samples).unwrap();
        assert_eq!(test.p_value(), 1.0);
    }

    #[test]
    fn test_average_ranks_with_ties() {
        let (ranks, ties) = average_ranks(&[10.0, 20.0, 10.0, 30.0, 20.0, 20.0]);
        assert_eq!(ranks, vec![1.5, 4.0, 1.5, 6.0, 4.0, 4.0]);
        // one pair and one triple: (8 - 2) + (27 - 3)
        assert_eq!(ties, 30.0);
    }

    #[test]
    fn test_mann_whitney_requires_more_than_ten() {
        let err = StatisticalComparisonTest::evaluate(
            ComparisonTestKind::MannWhitneyU,
            &[sample("a", &spread(10, 0.0)), sample("b", &spread(20, 0.0))],
        )
        .unwrap_err();
        assert_eq!(
            err,
            AnalysisError::InsufficientSample {
                test: "Mann-Whitney U",
                name: "a".into(),
                actual: 10,
                required: 11,
            }
        );
    }

    #[test]
    fn test_sample_count_validation() {
        let three = [sample("a", &[1.0, 2.0]), sample("b", &[1.0, 2.0]), sample("c", &[1.0, 2.0])];
        assert!(matches!(
            StatisticalComparisonTest::evaluate(ComparisonTestKind::StudentT, &three),
            Err(AnalysisError::SampleCount { expected: "exactly 2", actual: 3, .. })
        ));
        assert!(matches!(
            StatisticalComparisonTest::evaluate(ComparisonTestKind::Anova, &three[..1]),
            Err(AnalysisError::SampleCount { expected: "at least 2", actual: 1, .. })
        ));
        assert!(StatisticalComparisonTest::evaluate(ComparisonTestKind::Anova, &three).is_ok());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = StatisticalComparisonTest::evaluate(
            ComparisonTestKind::KruskalWallis,
            &[sample("GA", &[1.0]), sample("SA", &[2.0]), sample("GA", &[3.0])],
        )
        .unwrap_err();
        assert_eq!(err, AnalysisError::DuplicateName("GA".into()));
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(matches!(
            StatisticalComparisonTest::evaluate(
                ComparisonTestKind::Anova,
                &[sample("a", &[1.0, f64::NAN]), sample("b", &[1.0, 2.0])],
            ),
            Err(AnalysisError::NonFinite(name)) if name == "a"
        ));
    }

    #[test]
    fn test_report_lists_means_and_verdict() {
        let test = StatisticalComparisonTest::evaluate(
            ComparisonTestKind::StudentT,
            &[sample("GA", &[1.0, 2.0, 3.0]), sample("SA", &[1.0, 2.0, 3.0])],
        )
        .unwrap();
        let report = test.report();
        assert_eq!(report[0].1, "Student's t (Welch)");
        assert_eq!(report[1].1, "GA, SA");
        assert!(report.iter().any(|(k, v)| k == "mean GA" && v == "2.000000"));
        assert!(report.iter().any(|(k, v)| k == "reject H0" && v == "false"));
    }

    proptest! {
        #[test]
        fn prop_p_value_in_unit_interval(
            a in proptest::collection::vec(-100.0f64..100.0, 11..30),
            b in proptest::collection::vec(-100.0f64..100.0, 11..30),
        ) {
            let samples = [NamedSample::new("a", a), NamedSample::new("b", b)];
            for kind in [
                ComparisonTestKind::StudentT,
                ComparisonTestKind::MannWhitneyU,
                ComparisonTestKind::Anova,
                ComparisonTestKind::KruskalWallis,
            ] {
                let test = StatisticalComparisonTest::evaluate(kind, &samples).unwrap();
                prop_assert!((0.0..=1.0).contains(&test.p_value()));
            }
        }
    }
}
