//! Capability traits implemented by concrete problem domains.
//!
//! The execution core depends only on these traits. A domain implements
//! [`Evaluable`] and [`SafetyCheckable`] to be run at all, [`SearchSpace`]
//! to be searched by the reference heuristics, and optionally one of the
//! representation capabilities to reuse the helpers in [`crate::repr`].

use crate::error::InitializationError;
use crate::stop::StopConditionKind;
use rand::Rng;
use std::cmp::Ordering;

/// Optimization direction of a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Lower scores are better.
    Minimize,
    /// Higher scores are better.
    Maximize,
}

impl Direction {
    /// Strict improvement: ties are not better.
    pub fn is_better(self, a: f64, b: f64) -> bool {
        match self {
            Direction::Minimize => a < b,
            Direction::Maximize => a > b,
        }
    }

    /// Non-worsening: ties count as better.
    pub fn is_better_or_same(self, a: f64, b: f64) -> bool {
        self.is_better(a, b) || a == b
    }

    /// Orders two scores best-first. Incomparable values are equal.
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
        match self {
            Direction::Minimize => ord,
            Direction::Maximize => ord.reverse(),
        }
    }

    /// The worst representable score.
    pub fn worst(self) -> f64 {
        match self {
            Direction::Minimize => f64::INFINITY,
            Direction::Maximize => f64::NEG_INFINITY,
        }
    }
}

/// A domain that can score candidate representations.
pub trait Evaluable: Send {
    /// The opaque candidate representation.
    type Representation: Clone + Send + 'static;

    /// Human-readable problem name.
    fn name(&self) -> &str;

    /// Optimization direction. Fixed per domain.
    fn direction(&self) -> Direction;

    /// Computes the scalar cost of a representation.
    ///
    /// Called only after [`SafetyCheckable::check_solution_for_safety`]
    /// accepted the representation.
    fn problem_specific_cost(&self, representation: &Self::Representation) -> f64;

    /// Loads datasets or acquires external resources before a run.
    fn initialise_before_run(&mut self) -> Result<(), InitializationError> {
        Ok(())
    }

    /// Domain-specific measure of problem size (bits, dimensions, cities).
    ///
    /// Used by algorithms that derive their parameters from the problem.
    fn size(&self) -> usize {
        1
    }

    /// Stop condition kinds this domain accepts.
    fn supported_stop_conditions(&self) -> &[StopConditionKind] {
        StopConditionKind::ALL
    }
}

/// Structural validation of candidates.
pub trait SafetyCheckable: Evaluable {
    /// Rejects representations no correct algorithm can produce.
    ///
    /// Returns a description of the violation. A violation terminates the
    /// run.
    fn check_solution_for_safety(&self, representation: &Self::Representation) -> Result<(), String>;
}

/// Everything the execution core needs from a domain.
pub trait ProblemDomain: Evaluable + SafetyCheckable {}

impl<T: Evaluable + SafetyCheckable> ProblemDomain for T {}

/// Variation operators over a domain's representation.
///
/// Implemented by domains that the reference heuristics can search.
pub trait SearchSpace: ProblemDomain {
    /// Creates a random representation.
    fn random_representation<G: Rng>(&self, rng: &mut G) -> Self::Representation;

    /// Perturbs a representation in place.
    fn mutate<G: Rng>(&self, representation: &mut Self::Representation, rng: &mut G);

    /// Recombines two parents into one child.
    ///
    /// The default implementation clones the first parent.
    fn recombine<G: Rng>(
        &self,
        first: &Self::Representation,
        _second: &Self::Representation,
        _rng: &mut G,
    ) -> Self::Representation {
        first.clone()
    }
}

/// Domains whose candidates are fixed-length bit strings.
pub trait BinaryRepresentable {
    /// Number of bits in every valid candidate.
    fn bit_length(&self) -> usize;
}

/// Domains whose candidates are points in a bounded box.
pub trait CoordinateRepresentable {
    /// Number of coordinates in every valid candidate.
    fn dimensions(&self) -> usize;

    /// Inclusive lower and upper bound shared by all coordinates.
    fn bounds(&self) -> (f64, f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_is_better() {
        assert!(Direction::Minimize.is_better(1.0, 2.0));
        assert!(!Direction::Minimize.is_better(2.0, 2.0));
        assert!(Direction::Maximize.is_better(3.0, 2.0));
        assert!(!Direction::Maximize.is_better(2.0, 2.0));
    }

    #[test]
    fn test_direction_is_better_or_same_accepts_ties() {
        assert!(Direction::Minimize.is_better_or_same(2.0, 2.0));
        assert!(Direction::Maximize.is_better_or_same(2.0, 2.0));
        assert!(!Direction::Minimize.is_better_or_same(3.0, 2.0));
    }

    #[test]
    fn test_direction_compare_best_first() {
        let mut scores = vec![3.0, 1.0, 2.0];
        scores.sort_by(|a, b| Direction::Maximize.compare(*a, *b));
        assert_eq!(scores, vec![3.0, 2.0, 1.0]);
        scores.sort_by(|a, b| Direction::Minimize.compare(*a, *b));
        assert_eq!(scores, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_direction_worst() {
        assert!(Direction::Minimize.is_better(1e300, Direction::Minimize.worst()));
        assert!(Direction::Maximize.is_better(-1e300, Direction::Maximize.worst()));
    }
}
