//! Public single-call API.

use crate::engine::dispatcher;

/// Computes the 64-bit hash of `input` with seed zero.
///
/// The output is identical on every platform and backend, and identical to
/// streaming the same bytes through a [`Hasher`](crate::Hasher).
///
/// # Example
/// ```rust
/// assert_ne!(photon::hash(b"hello"), photon::hash(b"world"));
/// ```
#[must_use]
#[inline]
pub fn hash(input: &[u8]) -> u64 {
    hash_seeded(input, 0)
}

/// Computes the 64-bit hash of `input` under a caller-chosen seed.
///
/// The seed keys the whole computation; use it for randomized hashing or
/// per-table keying. `hash_seeded(x, 0)` equals [`hash`]`(x)`.
#[must_use]
#[inline]
pub fn hash_seeded(input: &[u8], seed: u64) -> u64 {
    (dispatcher::hash_kernel())(input, seed)
}

/// Sums every byte of `input` into a 64-bit value, wrapping on overflow.
///
/// # Example
/// ```rust
/// assert_eq!(photon::bytesum(b"hi"), 209);
/// ```
#[must_use]
#[inline]
pub fn bytesum(input: &[u8]) -> u64 {
    (dispatcher::bytesum_kernel())(input)
}

/// Fills `buffer` with pseudo-random bytes derived from `nonce`.
///
/// Deterministic: the same `(nonce, buffer length)` pair always produces the
/// same bytes, on every platform and backend. Not a cryptographic generator —
/// one AES round per 128-bit block is mixing, not encryption.
#[inline]
pub fn fill_random(buffer: &mut [u8], nonce: u64) {
    (dispatcher::fill_kernel())(buffer, nonce);
}
