//! Descriptive statistics of one run statistic.

use super::check_sample;
use crate::error::AnalysisError;

/// Moments and extremes of a sample.
///
/// Variance and standard deviation use the unbiased `n - 1` denominator.
/// Skewness and kurtosis are the bias-adjusted sample estimates (`G1`, `G2`);
/// kurtosis is excess kurtosis. Both are 0 for constant samples or samples
/// too small to estimate them (fewer than 3 and 4 observations).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DescriptiveStats {
    pub n: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub population_std_dev: f64,
    pub skewness: f64,
    pub kurtosis: f64,
}

impl DescriptiveStats {
    /// Computes the statistics of `values`.
    ///
    /// `name` labels the sample in errors.
    pub fn from_sample(name: &str, values: &[f64]) -> Result<Self, AnalysisError> {
        check_sample("descriptive statistics", name, values, 1)?;

        let n = values.len();
        let nf = n as f64;
        let mean = values.iter().sum::<f64>() / nf;

        let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
        for &v in values {
            let d = v - mean;
            let d2 = d * d;
            m2 += d2;
            m3 += d2 * d;
            m4 += d2 * d2;
        }
        let (m2, m3, m4) = (m2 / nf, m3 / nf, m4 / nf);

        let variance = if n > 1 { m2 * nf / (nf - 1.0) } else { 0.0 };

        let skewness = if n >= 3 && m2 > 0.0 {
            let g1 = m3 / m2.powf(1.5);
            (nf * (nf - 1.0)).sqrt() / (nf - 2.0) * g1
        } else {
            0.0
        };
        let kurtosis = if n >= 4 && m2 > 0.0 {
            let g2 = m4 / (m2 * m2) - 3.0;
            ((nf + 1.0) * g2 + 6.0) * (nf - 1.0) / ((nf - 2.0) * (nf - 3.0))
        } else {
            0.0
        };

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let median = if n % 2 == 1 {
            sorted[n / 2]
        } else {
            0.5 * (sorted[n / 2 - 1] + sorted[n / 2])
        };

        Ok(Self {
            n,
            min: sorted[0],
            max: sorted[n - 1],
            mean,
            median,
            variance,
            std_dev: variance.sqrt(),
            population_std_dev: m2.sqrt(),
            skewness,
            kurtosis,
        })
    }
}

/// Per-run values of one statistic for one algorithm/problem pair.
///
/// The raw sample is fixed at construction; [`calculate`](Self::calculate)
/// derives the statistics from it, and [`stats`](Self::stats) fails until
/// it has been called.
#[derive(Debug, Clone)]
pub struct RunStatisticSummary {
    run_name: String,
    statistic_name: String,
    sample: Vec<f64>,
    stats: Option<DescriptiveStats>,
}

impl RunStatisticSummary {
    pub fn new(run_name: impl Into<String>, statistic_name: impl Into<String>, sample: Vec<f64>) -> Self {
        Self {
            run_name: run_name.into(),
            statistic_name: statistic_name.into(),
            sample,
            stats: None,
        }
    }

    pub fn run_name(&self) -> &str {
        &self.run_name
    }

    pub fn statistic_name(&self) -> &str {
        &self.statistic_name
    }

    pub fn sample(&self) -> &[f64] {
        &self.sample
    }

    /// Computes the statistics from the raw sample.
    pub fn calculate(&mut self) -> Result<&DescriptiveStats, AnalysisError> {
        let stats = DescriptiveStats::from_sample(&self.run_name, &self.sample)?;
        Ok(&*self.stats.insert(stats))
    }

    pub fn is_calculated(&self) -> bool {
        self.stats.is_some()
    }

    pub fn stats(&self) -> Result<&DescriptiveStats, AnalysisError> {
        self.stats
            .as_ref()
            .ok_or_else(|| AnalysisError::NotCalculated(format!("{} / {}", self.run_name, self.statistic_name)))
    }

    /// Named values for display.
    pub fn report(&self) -> Result<Vec<(String, String)>, AnalysisError> {
        let s = self.stats()?;
        Ok(vec![
            ("run".into(), self.run_name.clone()),
            ("statistic".into(), self.statistic_name.clone()),
            ("n".into(), s.n.to_string()),
            ("mean".into(), format!("{:.6}", s.mean)),
            ("std dev".into(), format!("{:.6}", s.std_dev)),
            ("median".into(), format!("{:.6}", s.median)),
            ("min".into(), format!("{:.6}", s.min)),
            ("max".into(), format!("{:.6}", s.max)),
            ("skewness".into(), format!("{:.6}", s.skewness)),
            ("kurtosis".into(), format!("{:.6}", s.kurtosis)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_moments() {
        let s = DescriptiveStats::from_sample("x", &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(s.n, 8);
        assert!((s.mean - 5.0).abs() < 1e-12);
        assert!((s.population_std_dev - 2.0).abs() < 1e-12);
        assert!((s.variance - 32.0 / 7.0).abs() < 1e-12);
        assert!((s.median - 4.5).abs() < 1e-12);
        assert_eq!((s.min, s.max), (2.0, 9.0));
        // right-skewed
        assert!(s.skewness > 0.0);
    }

    #[test]
    fn test_symmetric_sample_has_zero_skewness() {
        let s = DescriptiveStats::from_sample("x", &[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!(s.skewness.abs() < 1e-12);
        // G2 of 1..5 is -1.2
        assert!((s.kurtosis + 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_constant_and_tiny_samples() {
        let s = DescriptiveStats::from_sample("c", &[3.0; 10]).unwrap();
        assert_eq!(s.variance, 0.0);
        assert_eq!(s.skewness, 0.0);
        assert_eq!(s.kurtosis, 0.0);

        let s = DescriptiveStats::from_sample("one", &[3.0]).unwrap();
        assert_eq!(s.variance, 0.0);
        assert_eq!(s.median, 3.0);
    }

    #[test]
    fn test_invalid_samples() {
        assert!(matches!(
            DescriptiveStats::from_sample("e", &[]),
            Err(AnalysisError::InsufficientSample { actual: 0, .. })
        ));
        assert!(matches!(
            DescriptiveStats::from_sample("nan", &[1.0, f64::NAN]),
            Err(AnalysisError::NonFinite(name)) if name == "nan"
        ));
    }

    #[test]
    fn test_summary_requires_calculate() {
        let mut summary = RunStatisticSummary::new("GA", "best score", vec![1.0, 2.0, 3.0]);
        assert!(matches!(summary.stats(), Err(AnalysisError::NotCalculated(_))));
        assert!(summary.report().is_err());

        let mean = summary.calculate().unwrap().mean;
        assert!((mean - 2.0).abs() < 1e-12);
        assert!(summary.is_calculated());
        let report = summary.report().unwrap();
        assert_eq!(report[0], ("run".to_string(), "GA".to_string()));
        assert!(report.iter().any(|(k, v)| k == "mean" && v == "2.000000"));
    }

    proptest! {
        #[test]
        fn prop_mean_within_bounds(values in proptest::collection::vec(-1e6f64..1e6, 1..50)) {
            let s = DescriptiveStats::from_sample("p", &values).unwrap();
            prop_assert!(s.min <= s.mean + 1e-6 && s.mean <= s.max + 1e-6);
            prop_assert!(s.min <= s.median && s.median <= s.max);
            prop_assert!(s.variance >= 0.0);
        }
    }
}
