//! Normality tests with estimated mean and variance.
//!
//! The null hypothesis is that the sample comes from some normal
//! distribution; mean and standard deviation are estimated from the sample,
//! so the p-values use the composite-hypothesis approximations rather than
//! the tables for a fully specified distribution.

use super::distribution::{standard_normal, standard_normal_ln_cdf};
use super::{check_sample, HypothesisTest, SIGNIFICANCE_LEVEL};
use crate::error::AnalysisError;
use statrs::distribution::{ContinuousCDF, Normal};
use std::fmt;

/// Available normality tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NormalityTestKind {
    /// Anderson-Darling, weights the tails. Needs at least 8 observations.
    #[default]
    AndersonDarling,
    /// Cramér-von Mises. Needs at least 8 observations.
    CramerVonMises,
    /// Kolmogorov-Smirnov with the Lilliefors correction. Needs at least 5
    /// observations.
    KolmogorovSmirnov,
}

impl NormalityTestKind {
    pub const ALL: [NormalityTestKind; 3] = [
        NormalityTestKind::AndersonDarling,
        NormalityTestKind::CramerVonMises,
        NormalityTestKind::KolmogorovSmirnov,
    ];

    /// Smallest sample the p-value approximation is valid for.
    pub fn minimum_sample_size(self) -> usize {
        match self {
            NormalityTestKind::AndersonDarling | NormalityTestKind::CramerVonMises => 8,
            NormalityTestKind::KolmogorovSmirnov => 5,
        }
    }

    fn label(self) -> &'static str {
        match self {
            NormalityTestKind::AndersonDarling => "Anderson-Darling",
            NormalityTestKind::CramerVonMises => "Cramér-von Mises",
            NormalityTestKind::KolmogorovSmirnov => "Kolmogorov-Smirnov (Lilliefors)",
        }
    }
}

impl fmt::Display for NormalityTestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of a normality test on one sample.
///
/// # Examples
///
/// ```
/// use u_metabench::stats::{HypothesisTest, NormalityTest, NormalityTestKind};
///
/// let sample: Vec<f64> = (1..=40).map(|i| (i as f64 / 4.0).exp()).collect();
/// let test = NormalityTest::evaluate(NormalityTestKind::AndersonDarling, "growth", &sample).unwrap();
/// assert!(test.can_reject_null_hypothesis());
/// assert!(!test.is_normal());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalityTest {
    kind: NormalityTestKind,
    sample_name: String,
    n: usize,
    statistic: f64,
    p_value: f64,
}

impl NormalityTest {
    /// Runs `kind` on `values`.
    ///
    /// A sample with zero standard deviation gets statistic 0 and p-value 0:
    /// a constant sample is never considered normal.
    pub fn evaluate(kind: NormalityTestKind, name: &str, values: &[f64]) -> Result<Self, AnalysisError> {
        check_sample(kind.label(), name, values, kind.minimum_sample_size())?;

        let n = values.len();
        let nf = n as f64;
        let mean = values.iter().sum::<f64>() / nf;
        let sd = (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (nf - 1.0)).sqrt();

        let (statistic, p_value) = if sd > 0.0 {
            let mut y: Vec<f64> = values.iter().map(|v| (v - mean) / sd).collect();
            y.sort_by(f64::total_cmp);
            let normal = standard_normal()?;
            match kind {
                NormalityTestKind::AndersonDarling => anderson_darling(&normal, &y),
                NormalityTestKind::CramerVonMises => cramer_von_mises(&normal, &y),
                NormalityTestKind::KolmogorovSmirnov => lilliefors(&normal, &y),
            }
        } else {
            (0.0, 0.0)
        };

        Ok(Self {
            kind,
            sample_name: name.to_string(),
            n,
            statistic,
            p_value: p_value.clamp(0.0, 1.0),
        })
    }

    pub fn kind(&self) -> NormalityTestKind {
        self.kind
    }

    pub fn sample_name(&self) -> &str {
        &self.sample_name
    }

    pub fn sample_size(&self) -> usize {
        self.n
    }

    /// `true` when normality cannot be rejected.
    pub fn is_normal(&self) -> bool {
        !self.can_reject_null_hypothesis()
    }
}

impl HypothesisTest for NormalityTest {
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
        vec![
            ("test".into(), self.kind.to_string()),
            ("sample".into(), self.sample_name.clone()),
            ("n".into(), self.n.to_string()),
            ("statistic".into(), format!("{:.6}", self.statistic)),
            ("p-value".into(), format!("{:.6}", self.p_value)),
            ("alpha".into(), SIGNIFICANCE_LEVEL.to_string()),
            ("normal".into(), self.is_normal().to_string()),
        ]
    }
}

/// A² with the small-sample modification `A²(1 + 0.75/n + 2.25/n²)`.
///
/// `y` is the sorted standardized sample. Logs are taken in the normal
/// tails directly so extreme observations do not produce `ln 0`.
fn anderson_darling(normal: &Normal, y: &[f64]) -> (f64, f64) {
    let n = y.len();
    let nf = n as f64;
    let sum: f64 = (0..n)
        .map(|i| {
            let tails = standard_normal_ln_cdf(normal, y[i]) + standard_normal_ln_cdf(normal, -y[n - 1 - i]);
            (2 * i + 1) as f64 * tails
        })
        .sum();
    let a2 = -nf - sum / nf;
    let aa = a2 * (1.0 + 0.75 / nf + 2.25 / (nf * nf));

    let p = if aa < 0.2 {
        1.0 - (-13.436 + 101.14 * aa - 223.73 * aa * aa).exp()
    } else if aa < 0.34 {
        1.0 - (-8.318 + 42.796 * aa - 59.938 * aa * aa).exp()
    } else if aa < 0.6 {
        (0.9177 - 4.279 * aa - 1.38 * aa * aa).exp()
    } else if aa < 10.0 {
        (1.2937 - 5.709 * aa + 0.0186 * aa * aa).exp()
    } else {
        3.7e-24
    };
    (a2, p)
}

/// W² with the modification `W²(1 + 0.5/n)`.
fn cramer_von_mises(normal: &Normal, y: &[f64]) -> (f64, f64) {
    let nf = y.len() as f64;
    let w2 = 1.0 / (12.0 * nf)
        + y.iter()
            .enumerate()
            .map(|(i, &yi)| (normal.cdf(yi) - (2 * i + 1) as f64 / (2.0 * nf)).powi(2))
            .sum::<f64>();
    let ww = w2 * (1.0 + 0.5 / nf);

    let p = if ww < 0.0275 {
        1.0 - (-13.953 + 775.5 * ww - 12542.61 * ww * ww).exp()
    } else if ww < 0.051 {
        1.0 - (-5.903 + 179.546 * ww - 1515.29 * ww * ww).exp()
    } else if ww < 0.092 {
        (0.886 - 31.62 * ww + 10.897 * ww * ww).exp()
    } else if ww < 1.1 {
        (1.111 - 34.242 * ww + 12.832 * ww * ww).exp()
    } else {
        7.37e-10
    };
    (w2, p)
}

/// Largest distance between the empirical and fitted normal CDF, with the
/// Dallal-Wilkinson p-value, switching to Stephens' modified statistic
/// when that p-value exceeds 0.1.
fn lilliefors(normal: &Normal, y: &[f64]) -> (f64, f64) {
    let nf = y.len() as f64;
    let k = y
        .iter()
        .enumerate()
        .map(|(i, &yi)| {
            let z = normal.cdf(yi);
            let above = (i + 1) as f64 / nf - z;
            let below = z - i as f64 / nf;
            above.max(below)
        })
        .fold(0.0, f64::max);

    let (kd, nd) = if nf > 100.0 {
        (k * (nf / 100.0).powf(0.49), 100.0)
    } else {
        (k, nf)
    };
    let mut p = (-7.01256 * kd * kd * (nd + 2.78019) + 2.99587 * kd * (nd + 2.78019).sqrt() - 0.122119
        + 0.974598 / nd.sqrt()
        + 1.67997 / nd)
        .exp();

    if p > 0.1 {
        let kk = (nf.sqrt() - 0.01 + 0.85 / nf.sqrt()) * k;
        p = if kk <= 0.302 {
            1.0
        } else if kk <= 0.5 {
            2.76773 - 19.828315 * kk + 80.709644 * kk.powi(2) - 138.55152 * kk.powi(3) + 81.218052 * kk.powi(4)
        } else if kk <= 0.9 {
            -4.901232 + 40.662806 * kk - 97.490286 * kk.powi(2) + 94.029866 * kk.powi(3) - 32.355711 * kk.powi(4)
        } else if kk <= 1.31 {
            6.198765 - 19.558097 * kk + 23.186922 * kk.powi(2) - 12.234627 * kk.powi(3) + 2.423045 * kk.powi(4)
        } else {
            0.0
        };
    }
    (k, p)
}
