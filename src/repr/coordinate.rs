//! Real-vector helpers for [`CoordinateRepresentable`] domains.

use crate::problem::CoordinateRepresentable;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Uniformly random point inside the domain's bounds.
pub fn random_point<D: CoordinateRepresentable + ?Sized, G: Rng>(domain: &D, rng: &mut G) -> Vec<f64> {
    let (lo, hi) = domain.bounds();
    (0..domain.dimensions())
        .map(|_| if hi > lo { rng.random_range(lo..=hi) } else { lo })
        .collect()
}

/// Gaussian perturbation of one random coordinate, clamped to the bounds.
///
/// `step` is the standard deviation as a fraction of the bound width.
pub fn perturb<D: CoordinateRepresentable + ?Sized, G: Rng>(
    domain: &D,
    point: &mut [f64],
    step: f64,
    rng: &mut G,
) {
    if point.is_empty() {
        return;
    }
    let (lo, hi) = domain.bounds();
    let sigma = (step * (hi - lo)).abs();
    let idx = rng.random_range(0..point.len());
    let delta = match Normal::new(0.0, sigma) {
        Ok(normal) if sigma > 0.0 => normal.sample(rng),
        _ => 0.0,
    };
    point[idx] = (point[idx] + delta).clamp(lo, hi);
}

/// BLX-alpha crossover, clamped to the bounds.
pub fn blend_crossover<D: CoordinateRepresentable + ?Sized, G: Rng>(
    domain: &D,
    first: &[f64],
    second: &[f64],
    alpha: f64,
    rng: &mut G,
) -> Vec<f64> {
    let (lo, hi) = domain.bounds();
    first
        .iter()
        .zip(second.iter())
        .map(|(&a, &b)| {
            let min = a.min(b);
            let max = a.max(b);
            let range = max - min;
            if range < 1e-15 {
                min
            } else {
                rng.random_range((min - alpha * range)..(max + alpha * range)).clamp(lo, hi)
            }
        })
        .collect()
}

/// Safety check: right dimension count, every coordinate finite and in bounds.
pub fn check_bounds<D: CoordinateRepresentable + ?Sized>(domain: &D, point: &[f64]) -> Result<(), String> {
    let expected = domain.dimensions();
    if point.len() != expected {
        return Err(format!("point has {} coordinates, expected {expected}", point.len()));
    }
    let (lo, hi) = domain.bounds();
    if let Some((i, x)) = point.iter().enumerate().find(|(_, &x)| !(lo..=hi).contains(&x)) {
        return Err(format!("coordinate {i} = {x} is outside [{lo}, {hi}]"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Box3;

    impl CoordinateRepresentable for Box3 {
        fn dimensions(&self) -> usize {
            3
        }
        fn bounds(&self) -> (f64, f64) {
            (-1.0, 1.0)
        }
    }

    #[test]
    fn test_random_point_in_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let p = random_point(&Box3, &mut rng);
            assert!(check_bounds(&Box3, &p).is_ok());
        }
    }

    #[test]
    fn test_perturb_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut p = vec![0.99, -0.99, 0.0];
        for _ in 0..1000 {
            perturb(&Box3, &mut p, 0.5, &mut rng);
            assert!(check_bounds(&Box3, &p).is_ok());
        }
    }

    #[test]
    fn test_blend_crossover_identical_parents() {
        let mut rng = StdRng::seed_from_u64(5);
        let a = vec![0.5, 0.5, 0.5];
        assert_eq!(blend_crossover(&Box3, &a, &a, 0.5, &mut rng), a);
    }

    #[test]
    fn test_check_bounds_rejects() {
        assert!(check_bounds(&Box3, &[0.0, 0.0]).is_err());
        assert!(check_bounds(&Box3, &[0.0, 2.0, 0.0]).is_err());
        assert!(check_bounds(&Box3, &[0.0, f64::NAN, 0.0]).is_err());
    }
}
