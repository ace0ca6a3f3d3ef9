//! Reference distributions behind the p-values.
//!
//! Thin layer over `statrs`: parameter errors become
//! [`AnalysisError::Distribution`], infinite statistics map to p = 0, and
//! the normal log-CDF stays finite where `Φ(x)` underflows.

use crate::error::AnalysisError;
use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor, Normal, StudentsT};
use std::f64::consts::PI;
use std::fmt::Display;

fn invalid(err: impl Display) -> AnalysisError {
    AnalysisError::Distribution(err.to_string())
}

/// `N(0, 1)`.
pub(crate) fn standard_normal() -> Result<Normal, AnalysisError> {
    Normal::new(0.0, 1.0).map_err(invalid)
}

/// `ln Φ(x)` for the standard normal.
///
/// Uses `ln(1 - Q(x))` above the mean and the leading Mills-ratio term once
/// `Φ(x)` underflows.
pub(crate) fn standard_normal_ln_cdf(normal: &Normal, x: f64) -> f64 {
    if x > 0.0 {
        return (-normal.sf(x)).ln_1p();
    }
    let p = normal.cdf(x);
    if p > 0.0 {
        p.ln()
    } else {
        -0.5 * x * x - (-x).ln() - 0.5 * (2.0 * PI).ln()
    }
}

/// Two-sided p-value of Student's t statistic with `df` degrees of freedom.
pub(crate) fn student_t_two_sided(t: f64, df: f64) -> Result<f64, AnalysisError> {
    if t.is_infinite() {
        return Ok(0.0);
    }
    let dist = StudentsT::new(0.0, 1.0, df).map_err(invalid)?;
    Ok(2.0 * dist.sf(t.abs()))
}

/// Upper tail `P(F > f)` of the F distribution.
pub(crate) fn f_survival(f: f64, d1: f64, d2: f64) -> Result<f64, AnalysisError> {
    if f <= 0.0 {
        return Ok(1.0);
    }
    if f.is_infinite() {
        return Ok(0.0);
    }
    let dist = FisherSnedecor::new(d1, d2).map_err(invalid)?;
    Ok(dist.sf(f))
}

/// Upper tail `P(X > x)` of the chi-squared distribution with `k` degrees
/// of freedom.
pub(crate) fn chi_squared_survival(x: f64, k: f64) -> Result<f64, AnalysisError> {
    if x <= 0.0 {
        return Ok(1.0);
    }
    if x.is_infinite() {
        return Ok(0.0);
    }
    let dist = ChiSquared::new(k).map_err(invalid)?;
    Ok(dist.sf(x))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn test_ln_cdf_matches_cdf_near_the_mean() {
        let normal = standard_normal().unwrap();
        for x in [-3.0, -1.0, 0.0, 0.5, 2.0, 6.0] {
            assert!(close(standard_normal_ln_cdf(&normal, x), normal.cdf(x).ln(), 1e-12), "x = {x}");
        }
    }

    #[test]
    fn test_ln_cdf_deep_tail() {
        let normal = standard_normal().unwrap();
        // Φ(-40) underflows; its log must stay finite and near -x²/2
        let v = standard_normal_ln_cdf(&normal, -40.0);
        assert!(v.is_finite());
        assert!(close(v, -804.608, 0.01), "got {v}");
        // Q(40) underflows too, so ln Φ(40) is 0
        assert_eq!(standard_normal_ln_cdf(&normal, 40.0), 0.0);
    }

    #[test]
    fn test_student_t_critical_values() {
        assert!(close(student_t_two_sided(2.228139, 10.0).unwrap(), 0.05, 1e-6));
        assert!(close(student_t_two_sided(-12.706205, 1.0).unwrap(), 0.05, 1e-6));
        assert!(close(student_t_two_sided(0.0, 7.0).unwrap(), 1.0, 1e-12));
        assert_eq!(student_t_two_sided(f64::NEG_INFINITY, 4.0).unwrap(), 0.0);
    }

    #[test]
    fn test_f_survival() {
        // d1 = 2, d2 = 10: P(F > f) = (1 + d1 f / d2)^(-d2/2)
        assert!(close(f_survival(3.0, 2.0, 10.0).unwrap(), (10.0f64 / 16.0).powi(5), 1e-9));
        assert_eq!(f_survival(0.0, 2.0, 10.0).unwrap(), 1.0);
        assert_eq!(f_survival(f64::INFINITY, 2.0, 10.0).unwrap(), 0.0);
    }

    #[test]
    fn test_chi_squared_survival() {
        // k = 2: P(X > x) = exp(-x/2)
        assert!(close(chi_squared_survival(7.2, 2.0).unwrap(), (-3.6f64).exp(), 1e-9));
        assert!(close(chi_squared_survival(3.841459, 1.0).unwrap(), 0.05, 1e-6));
        assert_eq!(chi_squared_survival(0.0, 3.0).unwrap(), 1.0);
    }

    #[test]
    fn test_invalid_degrees_of_freedom() {
        assert!(matches!(student_t_two_sided(1.0, 0.0), Err(AnalysisError::Distribution(_))));
        assert!(matches!(f_survival(1.0, -1.0, 3.0), Err(AnalysisError::Distribution(_))));
        assert!(matches!(chi_squared_survival(1.0, 0.0), Err(AnalysisError::Distribution(_))));
    }
}
