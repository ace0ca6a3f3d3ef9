//! Bit-string helpers for [`BinaryRepresentable`] domains.

use crate::problem::BinaryRepresentable;
use rand::Rng;

/// Random bit string of the domain's length.
pub fn random_bits<D: BinaryRepresentable + ?Sized, G: Rng>(domain: &D, rng: &mut G) -> Vec<bool> {
    (0..domain.bit_length()).map(|_| rng.random_bool(0.5)).collect()
}

/// Flips each bit independently with probability `rate`.
///
/// At least one bit is flipped so that a mutation always moves.
pub fn flip_bits<G: Rng>(bits: &mut [bool], rate: f64, rng: &mut G) {
    if bits.is_empty() {
        return;
    }
    let rate = rate.clamp(0.0, 1.0);
    let mut flipped = false;
    for bit in bits.iter_mut() {
        if rng.random_bool(rate) {
            *bit = !*bit;
            flipped = true;
        }
    }
    if !flipped {
        let idx = rng.random_range(0..bits.len());
        bits[idx] = !bits[idx];
    }
}

/// Uniform crossover: each bit comes from either parent with equal odds.
pub fn uniform_crossover<G: Rng>(first: &[bool], second: &[bool], rng: &mut G) -> Vec<bool> {
    first
        .iter()
        .zip(second.iter())
        .map(|(&a, &b)| if rng.random_bool(0.5) { a } else { b })
        .collect()
}

/// Safety check: the bit string has the domain's length.
pub fn check_length<D: BinaryRepresentable + ?Sized>(domain: &D, bits: &[bool]) -> Result<(), String> {
    let expected = domain.bit_length();
    if bits.len() != expected {
        return Err(format!("bit string has {} bits, expected {expected}", bits.len()));
    }
    Ok(())
}

/// Hamming distance between two bit strings of equal length.
pub fn hamming_distance(first: &[bool], second: &[bool]) -> usize {
    first.iter().zip(second.iter()).filter(|(a, b)| a != b).count()
}
