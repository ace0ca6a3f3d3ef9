//! Selection strategies for the GA.
//!
//! Selection determines which individuals are chosen as parents for
//! recombination. Different strategies provide different selection pressure.
//! Parents are returned as indices into the population.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use crate::problem::Direction;
use crate::solution::Solution;
use rand::Rng;

/// Selection strategy for choosing parents.
///
/// All strategies are direction-aware and expect an evaluated population.
///
/// # Examples
///
/// ```
/// use u_metabench::heuristics::ga::Selection;
///
/// // Tournament with size 3 (moderate selection pressure)
/// let sel = Selection::Tournament(3);
///
/// // Roulette wheel (fitness-proportionate)
/// let sel = Selection::Roulette;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Tournament selection: pick `k` individuals at random, select the best.
    ///
    /// Higher `k` = stronger selection pressure.
    /// - k=2: light pressure (good for diversity)
    /// - k=3-5: moderate pressure (typical default)
    /// - k>5: strong pressure (risk of premature convergence)
    ///
    /// # Complexity
    /// O(k) per selection
    Tournament(usize),

    /// Fitness-proportionate (roulette wheel) selection.
    ///
    /// Weights are the normalized relative scores (best = 1, worst = 0), so
    /// the population must be normalised with
    /// [`normalise_relative_scores`](crate::solution::normalise_relative_scores)
    /// first.
    ///
    /// # Complexity
    /// O(n) per selection (linear scan)
    Roulette,

    /// Rank-based selection.
    ///
    /// Individuals are sorted by score and selection probability is
    /// proportional to rank position, not raw score. This avoids
    /// the scaling problems of roulette wheel selection.
    ///
    /// Reference: Baker (1985), "Adaptive Selection Methods for Genetic
    /// Algorithms"
    ///
    /// # Complexity
    /// O(n log n) per selection (sort)
    Rank,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(3)
    }
}

impl Selection {
    /// Selects a parent index from the population.
    ///
    /// Returns `None` for an empty population.
    pub fn select<R, G: Rng>(
        &self,
        population: &[Solution<R>],
        direction: Direction,
        rng: &mut G,
    ) -> Option<usize> {
        match population.len() {
            0 => None,
            1 => Some(0),
            _ => Some(match self {
                Selection::Tournament(k) => tournament(population, *k, direction, rng),
                Selection::Roulette => roulette(population, rng),
                Selection::Rank => rank(population, direction, rng),
            }),
        }
    }
}

fn score_of<R>(solution: &Solution<R>, direction: Direction) -> f64 {
    solution.score().unwrap_or_else(|_| direction.worst())
}

/// Tournament selection: pick k random individuals, return best.
fn tournament<R, G: Rng>(population: &[Solution<R>], k: usize, direction: Direction, rng: &mut G) -> usize {
    let k = k.max(1);
    let n = population.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if direction.is_better(
            score_of(&population[idx], direction),
            score_of(&population[best_idx], direction),
        ) {
            best_idx = idx;
        }
    }
    best_idx
}

/// Roulette wheel selection over normalized relative scores.
fn roulette<R, G: Rng>(population: &[Solution<R>], rng: &mut G) -> usize {
    let n = population.len();
    let epsilon = 1e-10;

    let weights: Vec<f64> = population
        .iter()
        .map(|s| s.normalized_relative_score().unwrap_or(0.0).max(0.0) + epsilon)
        .collect();

    let total: f64 = weights.iter().sum();
    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > threshold {
            return i;
        }
    }

    n - 1 // floating-point fallback
}

/// Rank-based selection using linear ranking.
///
/// Individuals are sorted best first, then selection probability is
/// proportional to `n - rank`.
fn rank<R, G: Rng>(population: &[Solution<R>], direction: Direction, rng: &mut G) -> usize {
    let n = population.len();

    let mut indexed: Vec<(usize, f64)> = population
        .iter()
        .enumerate()
        .map(|(i, s)| (i, score_of(s, direction)))
        .collect();
    indexed.sort_by(|a, b| direction.compare(a.1, b.1));

    let total: f64 = (n * (n + 1)) as f64 / 2.0;
    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;

    for (rank, &(original_idx, _)) in indexed.iter().enumerate() {
        cumulative += (n - rank) as f64;
        if cumulative > threshold {
            return original_idx;
        }
    }

    indexed[n - 1].0 // floating-point fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution::normalise_relative_scores;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn make_population(scores: &[f64]) -> Vec<Solution<()>> {
        scores
            .iter()
            .map(|&f| {
                let mut s = Solution::new(());
                s.assign_score(f);
                s
            })
            .collect()
    }

    fn counts(selection: Selection, pop: &[Solution<()>], direction: Direction) -> [u32; 4] {
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts = [0u32; 4];
        for _ in 0..10_000 {
            counts[selection.select(pop, direction, &mut rng).unwrap()] += 1;
        }
        counts
    }

    #[test]
    fn test_tournament_favors_best() {
        let pop = make_population(&[10.0, 5.0, 1.0, 8.0]);
        let c = counts(Selection::Tournament(4), &pop, Direction::Minimize);
        assert!(c[2] > 6000, "expected best to dominate, got {c:?}");

        let c = counts(Selection::Tournament(4), &pop, Direction::Maximize);
        assert!(c[0] > 6000, "expected best to dominate, got {c:?}");
    }

    #[test]
    fn test_tournament_size_1_is_random() {
        let pop = make_population(&[10.0, 5.0, 1.0, 8.0]);
        let c = counts(Selection::Tournament(1), &pop, Direction::Minimize);
        for &x in &c {
            assert!(x > 1500, "expected uniform, got counts: {c:?}");
        }
    }

    #[test]
    fn test_roulette_favors_best() {
        let mut pop = make_population(&[100.0, 50.0, 1.0, 80.0]);
        normalise_relative_scores(&mut pop, Direction::Minimize);
        let c = counts(Selection::Roulette, &pop, Direction::Minimize);
        assert!(c[2] > c[1] && c[1] > c[0], "got {c:?}");
        // worst has weight zero
        assert!(c[0] < 10, "got {c:?}");
    }

    #[test]
    fn test_rank_favors_best() {
        let pop = make_population(&[100.0, 50.0, 1.0, 80.0]);
        let c = counts(Selection::Rank, &pop, Direction::Minimize);
        assert!(c[2] > c[0], "best={}, worst={}", c[2], c[0]);

        let c = counts(Selection::Rank, &pop, Direction::Maximize);
        assert!(c[0] > c[2], "best={}, worst={}", c[0], c[2]);
    }

    #[test]
    fn test_single_and_empty_population() {
        let pop = make_population(&[5.0]);
        let mut rng = StdRng::seed_from_u64(42);
        for selection in [Selection::Tournament(3), Selection::Roulette, Selection::Rank] {
            assert_eq!(selection.select(&pop, Direction::Minimize, &mut rng), Some(0));
            assert_eq!(selection.select(&pop[..0], Direction::Minimize, &mut rng), None);
        }
    }

    #[test]
    fn test_equal_scores_select_uniformly() {
        let mut pop = make_population(&[5.0, 5.0, 5.0, 5.0]);
        normalise_relative_scores(&mut pop, Direction::Maximize);
        for selection in [Selection::Tournament(2), Selection::Roulette] {
            let c = counts(selection, &pop, Direction::Maximize);
            for &x in &c {
                assert!(x > 1500, "expected roughly uniform with equal scores, got {c:?}");
            }
        }
    }
}
