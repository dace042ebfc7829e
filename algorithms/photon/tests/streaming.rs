//! Streaming Equivalence Tests
//!
//! The fold must reproduce the single-shot hash for any partition of the
//! input: every split point of a known phrase, byte-by-byte feeding, and
//! randomized partitions of randomized inputs.

use photon::{hash, hash_seeded, Hasher};

struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0
    }
}

fn random_bytes(rng: &mut Lcg, length: usize) -> Vec<u8> {
    let mut out = vec![0u8; length];
    for chunk in out.chunks_mut(8) {
        let word = rng.next().to_le_bytes();
        chunk.copy_from_slice(&word[..chunk.len()]);
    }
    out
}

// =============================================================================
// EXHAUSTIVE SPLITS
// =============================================================================

#[test]
fn every_split_of_the_pangram_agrees() {
    let text = b"The quick brown fox jumps over the lazy dog";
    let expected = hash(text);

    for split in 0..=text.len() {
        let mut hasher = Hasher::new();
        hasher.update(&text[..split]);
        hasher.update(&text[split..]);
        assert_eq!(hasher.finish(), expected, "split at {split}");
    }
}

#[test]
fn byte_by_byte_feeding_agrees_across_block_boundaries() {
    let mut rng = Lcg(0xB10C_B0DD);
    for length in [1usize, 15, 16, 17, 63, 64, 65, 127, 128, 129, 200] {
        let input = random_bytes(&mut rng, length);
        let mut hasher = Hasher::new();
        for byte in &input {
            hasher.update(core::slice::from_ref(byte));
        }
        assert_eq!(hasher.finish(), hash(&input), "length {length}");
    }
}

// =============================================================================
// RANDOMIZED PARTITIONS
// =============================================================================

#[test]
fn random_partitions_reproduce_the_oneshot_hash() {
    let mut rng = Lcg(0x5EED_CAFE);

    for round in 0..10_000 {
        let length = (rng.next() % 100_000) as usize;
        let input = random_bytes(&mut rng, length);
        let seed = rng.next();
        let expected = hash_seeded(&input, seed);

        let mut hasher = Hasher::with_seed(seed);
        let chunks = 1 + (rng.next() % 32) as usize;
        let mut offset = 0;
        for _ in 0..chunks - 1 {
            if offset >= input.len() {
                break;
            }
            let take = (rng.next() as usize) % (input.len() - offset + 1);
            hasher.update(&input[offset..offset + take]);
            offset += take;
        }
        hasher.update(&input[offset..]);

        assert_eq!(
            hasher.finish(),
            expected,
            "round {round}: length {length}, {chunks} chunks, seed {seed:#x}"
        );
    }
}
