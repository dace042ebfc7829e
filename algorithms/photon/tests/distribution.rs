//! Distribution Tests
//!
//! SMHasher-style sanity checks: no 64-bit collisions over a million
//! distinct short inputs or seeds, and per-bit bias within ±0.5% of an even
//! coin. These are necessary conditions, not the full suite.

use photon::{hash, hash_seeded};
use std::collections::HashSet;

const ROUNDS: u64 = 1 << 20;

#[test]
fn no_collisions_over_a_million_short_inputs() {
    let mut seen = HashSet::with_capacity(ROUNDS as usize);
    for counter in 0..ROUNDS {
        let input = counter.to_le_bytes();
        assert!(
            seen.insert(hash(&input)),
            "collision for counter {counter}"
        );
    }
}

#[test]
fn no_collisions_over_a_million_seeds() {
    let input = b"fixed input, varying seed";
    let mut seen = HashSet::with_capacity(ROUNDS as usize);
    for seed in 0..ROUNDS {
        assert!(
            seen.insert(hash_seeded(input, seed)),
            "collision for seed {seed}"
        );
    }
}

#[test]
fn output_bits_are_unbiased() {
    let mut ones = [0u64; 64];
    for counter in 0..ROUNDS {
        let digest = hash(&counter.to_le_bytes());
        for (bit, count) in ones.iter_mut().enumerate() {
            *count += (digest >> bit) & 1;
        }
    }

    let expected = ROUNDS as f64 / 2.0;
    for (bit, &count) in ones.iter().enumerate() {
        let bias = (count as f64 - expected).abs() / ROUNDS as f64;
        assert!(
            bias < 0.005,
            "bit {bit} biased by {:.3}% ({count} ones in {ROUNDS} samples)",
            bias * 100.0
        );
    }
}

#[test]
fn avalanche_on_single_bit_flips() {
    // Flipping one input bit should flip roughly half the output bits.
    let base = *b"avalanche probe!";
    let reference = hash(&base);
    let mut total_flips = 0u32;
    let mut trials = 0u32;
    for byte in 0..base.len() {
        for bit in 0..8 {
            let mut flipped = base;
            flipped[byte] ^= 1 << bit;
            total_flips += (hash(&flipped) ^ reference).count_ones();
            trials += 1;
        }
    }
    let mean = f64::from(total_flips) / f64::from(trials);
    assert!(
        (24.0..40.0).contains(&mean),
        "mean avalanche {mean} bits, expected near 32"
    );
}
