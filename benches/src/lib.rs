//! Shared helpers for the Photon benchmark suite.

use rand::prelude::*;

/// Randomized input of the given size.
#[must_use]
pub fn random_buffer(size: usize) -> Vec<u8> {
    let mut buffer = vec![0u8; size];
    rand::rng().fill(&mut buffer[..]);
    buffer
}
