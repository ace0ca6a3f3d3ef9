//! Candidate solutions and their evaluation state.
//!
//! A [`Solution`] wraps a domain-owned representation (bit string, real
//! vector, permutation, ...) together with the score assigned by
//! [`Problem::cost`](crate::problem::Problem::cost). The core never looks
//! inside the representation.

use crate::error::EvaluationError;
use crate::problem::Direction;

/// A candidate answer plus its evaluation state.
///
/// A solution is created unevaluated and becomes evaluated exactly once,
/// through the problem that owns the evaluation budget. Mutable access to
/// the representation discards the evaluation, so an evaluated score always
/// describes the representation it is stored with.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution<R> {
    representation: R,
    score: Option<f64>,
    normalized_relative_score: Option<f64>,
}

impl<R> Solution<R> {
    /// Creates an unevaluated solution.
    pub fn new(representation: R) -> Self {
        Self {
            representation,
            score: None,
            normalized_relative_score: None,
        }
    }

    /// Returns the domain representation.
    pub fn representation(&self) -> &R {
        &self.representation
    }

    /// Returns the representation for modification.
    ///
    /// The solution becomes unevaluated.
    pub fn representation_mut(&mut self) -> &mut R {
        self.score = None;
        self.normalized_relative_score = None;
        &mut self.representation
    }

    /// Consumes the solution and returns its representation.
    pub fn into_representation(self) -> R {
        self.representation
    }

    /// Whether a score has been assigned.
    pub fn is_evaluated(&self) -> bool {
        self.score.is_some()
    }

    /// Returns the evaluated score.
    ///
    /// # Errors
    /// [`EvaluationError::Unevaluated`] if the solution was never evaluated.
    pub fn score(&self) -> Result<f64, EvaluationError> {
        self.score.ok_or(EvaluationError::Unevaluated)
    }

    pub(crate) fn assign_score(&mut self, score: f64) {
        self.score = Some(score);
    }

    /// Fitness rescaled against the population, in `[0, 1]` (1 = best).
    ///
    /// `None` until [`normalise_relative_scores`] has been applied.
    pub fn normalized_relative_score(&self) -> Option<f64> {
        self.normalized_relative_score
    }

    /// Overrides the normalized relative score.
    pub fn set_normalized_relative_score(&mut self, value: f64) {
        self.normalized_relative_score = Some(value);
    }

    /// Deep copy of the representation with the evaluation state reset.
    ///
    /// Algorithms use this to produce variants of an incumbent.
    pub fn variant(&self) -> Self
    where
        R: Clone,
    {
        Self::new(self.representation.clone())
    }
}

/// Rescales the scores of all evaluated solutions to `[0, 1]`.
///
/// The best score maps to 1 and the worst to 0, whatever the direction.
/// When every evaluated score is equal, all of them map to 1. Unevaluated
/// solutions are left untouched.
pub fn normalise_relative_scores<R>(population: &mut [Solution<R>], direction: Direction) {
    let scores = population.iter().filter_map(|s| s.score);
    let (min, max) = scores.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
        (lo.min(s), hi.max(s))
    });
    if min > max {
        return;
    }

    let range = max - min;
    for solution in population.iter_mut() {
        let Some(score) = solution.score else {
            continue;
        };
        let relative = if range <= 0.0 || !range.is_finite() {
            1.0
        } else {
            match direction {
                Direction::Minimize => (max - score) / range,
                Direction::Maximize => (score - min) / range,
            }
        };
        solution.normalized_relative_score = Some(relative);
    }
}

/// Sorts a population best-first under `direction`.
///
/// Unevaluated solutions sort after every evaluated one. The sort is
/// stable, so equal scores keep their relative order.
pub fn sort_best_first<R>(population: &mut [Solution<R>], direction: Direction) {
    population.sort_by(|a, b| match (a.score, b.score) {
        (Some(x), Some(y)) => direction.compare(x, y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

/// Index of the best evaluated solution, if any.
pub fn best_index<R>(population: &[Solution<R>], direction: Direction) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, solution) in population.iter().enumerate() {
        let Some(score) = solution.score else {
            continue;
        };
        match best {
            Some((_, b)) if !direction.is_better(score, b) => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}
