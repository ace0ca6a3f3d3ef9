//! Sphere: minimize the sum of squares.

use crate::problem::{CoordinateRepresentable, Direction, Evaluable, SafetyCheckable, SearchSpace};
use crate::repr::coordinate;
use rand::Rng;

/// Continuous function optimization benchmark, `f(x) = sum(x_i^2)`.
///
/// The minimum is 0 at the origin.
#[derive(Debug, Clone)]
pub struct Sphere {
    dimensions: usize,
    lower: f64,
    upper: f64,
    step: f64,
}

impl Sphere {
    /// `dimensions` coordinates in `[-5.12, 5.12]`.
    pub fn new(dimensions: usize) -> Self {
        Self::with_bounds(dimensions, -5.12, 5.12)
    }

    pub fn with_bounds(dimensions: usize, lower: f64, upper: f64) -> Self {
        Self {
            dimensions,
            lower,
            upper,
            step: 0.05,
        }
    }

    /// Mutation standard deviation as a fraction of the bound width.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step.abs();
        self
    }
}

impl Evaluable for Sphere {
    type Representation = Vec<f64>;

    fn name(&self) -> &str {
        "Sphere"
    }

    fn direction(&self) -> Direction {
        Direction::Minimize
    }

    fn problem_specific_cost(&self, point: &Vec<f64>) -> f64 {
        point.iter().map(|x| x * x).sum()
    }

    fn size(&self) -> usize {
        self.dimensions
    }
}

impl SafetyCheckable for Sphere {
    fn check_solution_for_safety(&self, point: &Vec<f64>) -> Result<(), String> {
        coordinate::check_bounds(self, point)
    }
}

impl CoordinateRepresentable for Sphere {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn bounds(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }
}

impl SearchSpace for Sphere {
    fn random_representation<G: Rng>(&self, rng: &mut G) -> Vec<f64> {
        coordinate::random_point(self, rng)
    }

    fn mutate<G: Rng>(&self, point: &mut Vec<f64>, rng: &mut G) {
        coordinate::perturb(self, point, self.step, rng);
    }

    fn recombine<G: Rng>(&self, first: &Vec<f64>, second: &Vec<f64>, rng: &mut G) -> Vec<f64> {
        coordinate::blend_crossover(self, first, second, 0.5, rng)
    }
}
