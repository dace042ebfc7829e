//! Incremental hashing.
//!
//! A [`Hasher`] accumulates bytes in any chunking and folds to the exact
//! value the single-shot [`hash_seeded`](crate::hash_seeded) computes over
//! the concatenation. Whole 64-byte blocks absorb straight from the caller's
//! slice; only ragged edges pass through the 64-byte staging buffer.

use crate::engine::dispatcher;
use crate::kernels::constants::BLOCK_SIZE;
use crate::types::HashState;
use core::fmt;

// =============================================================================
// STREAMING HASHER
// =============================================================================

/// Streaming counterpart of [`hash_seeded`](crate::hash_seeded).
///
/// ```rust
/// use photon::Hasher;
///
/// let mut hasher = Hasher::new();
/// hasher.update(b"Chunk 1");
/// hasher.update(b"Chunk 2");
/// assert_eq!(hasher.finish(), photon::hash(b"Chunk 1Chunk 2"));
/// ```
///
/// Equality compares the mixing registers and the key only: two hashers that
/// absorbed the same full blocks compare equal even if different bytes sit
/// in their staging buffers, because they fold identically once fed the same
/// remaining input.
#[derive(Clone)]
pub struct Hasher {
    state: HashState,
    seed: u64,
}

impl Hasher {
    /// Fresh hasher with seed zero.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    /// Fresh hasher keyed by `seed`.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            state: HashState::init(seed),
            seed,
        }
    }

    /// Appends bytes to the stream.
    pub fn update(&mut self, mut data: &[u8]) {
        let absorb = dispatcher::absorb_kernel();

        // Finish a partially staged block first.
        let staged = (self.state.ins_length % BLOCK_SIZE as u64) as usize;
        if staged != 0 {
            let to_copy = data.len().min(BLOCK_SIZE - staged);
            self.state.ins[staged..staged + to_copy].copy_from_slice(&data[..to_copy]);
            self.state.ins_length += to_copy as u64;
            data = &data[to_copy..];
            if staged + to_copy < BLOCK_SIZE {
                return;
            }
            let block = self.state.ins;
            absorb(&mut self.state, &block);
            // Zeroed eagerly so a later fold sees only real bytes above the
            // watermark.
            self.state.ins = [0u8; BLOCK_SIZE];
        }

        // Whole blocks absorb straight from the input, no copies.
        let bulk = data.len() - data.len() % BLOCK_SIZE;
        if bulk > 0 {
            absorb(&mut self.state, &data[..bulk]);
            self.state.ins_length += bulk as u64;
            data = &data[bulk..];
        }

        // Stage the ragged tail.
        if !data.is_empty() {
            self.state.ins[..data.len()].copy_from_slice(data);
            self.state.ins_length += data.len() as u64;
        }
    }

    /// Folds the accumulated state into the 64-bit digest.
    ///
    /// Non-destructive: the hasher can keep streaming afterwards, and a
    /// second fold over the same state returns the same value.
    #[must_use]
    pub fn finish(&self) -> u64 {
        (dispatcher::fold_kernel())(&self.state)
    }

    /// Total number of bytes streamed so far.
    #[must_use]
    pub fn bytes_ingested(&self) -> u64 {
        self.state.ins_length
    }

    /// Restarts the stream with the original seed.
    pub fn reset(&mut self) {
        self.state = HashState::init(self.seed);
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Hasher {
    fn eq(&self, other: &Self) -> bool {
        self.state.same_registers(&other.state)
    }
}

impl Eq for Hasher {}

impl fmt::Debug for Hasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hasher")
            .field("seed", &self.seed)
            .field("bytes_ingested", &self.state.ins_length)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// TRAIT IMPLS
// =============================================================================

impl core::hash::Hasher for Hasher {
    fn finish(&self) -> u64 {
        self.finish()
    }

    fn write(&mut self, bytes: &[u8]) {
        self.update(bytes);
    }
}

/// [`BuildHasher`](core::hash::BuildHasher) handing out seeded [`Hasher`]s,
/// for use with `HashMap` and friends.
///
/// ```rust
/// use photon::HashBuilder;
/// use std::collections::HashMap;
///
/// let mut map: HashMap<&str, u32, _> = HashMap::with_hasher(HashBuilder::with_seed(42));
/// map.insert("answer", 42);
/// assert_eq!(map["answer"], 42);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HashBuilder {
    seed: u64,
}

impl HashBuilder {
    /// Builder whose hashers are keyed by `seed`.
    #[must_use]
    pub const fn with_seed(seed: u64) -> Self {
        Self { seed }
    }
}

impl core::hash::BuildHasher for HashBuilder {
    type Hasher = Hasher;

    fn build_hasher(&self) -> Hasher {
        Hasher::with_seed(self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash_seeded;

    #[test]
    fn staged_and_bulk_paths_agree_with_oneshot() {
        let text: Vec<u8> = (0..=255u8).cycle().take(500).collect();

        // One staged partial, then a span crossing several block boundaries.
        let mut hasher = Hasher::with_seed(9);
        hasher.update(&text[..10]);
        hasher.update(&text[10..300]);
        hasher.update(&text[300..]);
        assert_eq!(hasher.finish(), hash_seeded(&text, 9));
        assert_eq!(hasher.bytes_ingested(), 500);
    }

    #[test]
    fn fold_is_repeatable_and_stream_continues() {
        let mut hasher = Hasher::new();
        hasher.update(b"first");
        let early = hasher.finish();
        assert_eq!(early, hasher.finish(), "fold must not mutate the state");

        hasher.update(b" second");
        assert_eq!(hasher.finish(), crate::hash(b"first second"));
    }

    #[test]
    fn equality_ignores_the_staged_tail() {
        let block = [7u8; 64];
        let mut left = Hasher::new();
        let mut right = Hasher::new();
        left.update(&block);
        right.update(&block);
        left.update(b"abc");
        right.update(b"xyz");
        assert_eq!(left, right);

        let mut other = Hasher::new();
        other.update(&[8u8; 64]);
        assert_ne!(left, other);
    }

    #[test]
    fn empty_updates_are_no_ops() {
        let mut hasher = Hasher::new();
        hasher.update(b"");
        hasher.update(b"data");
        hasher.update(b"");
        assert_eq!(hasher.finish(), crate::hash(b"data"));
    }

    #[test]
    fn reset_restores_the_seeded_state() {
        let mut hasher = Hasher::with_seed(5);
        hasher.update(b"garbage");
        hasher.reset();
        assert_eq!(hasher.finish(), hash_seeded(b"", 5));
    }

    #[test]
    fn std_hasher_integration() {
        use core::hash::{BuildHasher, Hash, Hasher as _};

        let builder = HashBuilder::with_seed(1);
        let mut a = builder.build_hasher();
        let mut b = builder.build_hasher();
        42u64.hash(&mut a);
        42u64.hash(&mut b);
        assert_eq!(a.finish(), b.finish());
    }
}
