//! OneMax: maximize the number of set bits.

use crate::problem::{BinaryRepresentable, Direction, Evaluable, SafetyCheckable, SearchSpace};
use crate::repr::binary;
use rand::Rng;

/// Binary function optimization benchmark. The optimum is all ones.
#[derive(Debug, Clone)]
pub struct OneMax {
    bits: usize,
    mutation_rate: f64,
}

impl OneMax {
    /// Bit strings of length `bits`, per-bit mutation rate `1 / bits`.
    pub fn new(bits: usize) -> Self {
        Self {
            bits,
            mutation_rate: 1.0 / bits.max(1) as f64,
        }
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }
}

impl Evaluable for OneMax {
    type Representation = Vec<bool>;

    fn name(&self) -> &str {
        "OneMax"
    }

    fn direction(&self) -> Direction {
        Direction::Maximize
    }

    fn problem_specific_cost(&self, bits: &Vec<bool>) -> f64 {
        bits.iter().filter(|&&b| b).count() as f64
    }

    fn size(&self) -> usize {
        self.bits
    }
}

impl SafetyCheckable for OneMax {
    fn check_solution_for_safety(&self, bits: &Vec<bool>) -> Result<(), String> {
        binary::check_length(self, bits)
    }
}

impl BinaryRepresentable for OneMax {
    fn bit_length(&self) -> usize {
        self.bits
    }
}

impl SearchSpace for OneMax {
    fn random_representation<G: Rng>(&self, rng: &mut G) -> Vec<bool> {
        binary::random_bits(self, rng)
    }

    fn mutate<G: Rng>(&self, bits: &mut Vec<bool>, rng: &mut G) {
        binary::flip_bits(bits, self.mutation_rate, rng);
    }

    fn recombine<G: Rng>(&self, first: &Vec<bool>, second: &Vec<bool>, rng: &mut G) -> Vec<bool> {
        binary::uniform_crossover(first, second, rng)
    }
}
