//! AES-NI kernel (x86_64).
//!
//! 128-bit SSE registers throughout: `AESENC` for the mixing rounds,
//! `PSHUFB` plus `PADDQ` for the additive half. Byte-summing additionally
//! carries an AVX2 variant with bidirectional traversal for huge buffers.
//!
//! Every function here requires the CPU features named in its
//! `target_feature` attributes; the dispatcher verifies them before handing
//! out a pointer.

#![allow(unsafe_code)]
#![allow(clippy::cast_possible_wrap)]

use crate::kernels::constants::{BLOCK_SIZE, LANE_SIZE, PI, SUM_SHUFFLE};
use crate::kernels::{padded_words, tail_words};
use crate::types::HashState;

use core::arch::x86_64::{
    __m128i, _mm_add_epi64, _mm_aesenc_si128, _mm_cvtsi128_si64, _mm_loadu_si128, _mm_sad_epu8,
    _mm_set1_epi64x, _mm_set_epi64x, _mm_setzero_si128, _mm_shuffle_epi8, _mm_storeu_si128,
    _mm_unpackhi_epi64, _mm_xor_si128,
};

// =============================================================================
// REGISTER HELPERS
// =============================================================================

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn words(lo: u64, hi: u64) -> __m128i {
    _mm_set_epi64x(hi as i64, lo as i64)
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn low_word(vec: __m128i) -> u64 {
    _mm_cvtsi128_si64(vec) as u64
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn high_word(vec: __m128i) -> u64 {
    _mm_cvtsi128_si64(_mm_unpackhi_epi64(vec, vec)) as u64
}

#[inline]
#[target_feature(enable = "sse2", enable = "ssse3")]
unsafe fn shuffle_add(sum: __m128i, block: __m128i) -> __m128i {
    let mask = _mm_loadu_si128(SUM_SHUFFLE.as_ptr().cast());
    _mm_add_epi64(_mm_shuffle_epi8(sum, mask), block)
}

// =============================================================================
// MINIMAL STATE
// =============================================================================

pub(crate) struct MinimalRegs {
    aes: __m128i,
    sum: __m128i,
    key: __m128i,
}

#[inline]
#[target_feature(enable = "sse2")]
pub(crate) unsafe fn minimal_init(seed: u64) -> MinimalRegs {
    let seed_vec = _mm_set1_epi64x(seed as i64);
    MinimalRegs {
        aes: _mm_xor_si128(seed_vec, _mm_loadu_si128(PI.as_ptr().cast())),
        sum: _mm_xor_si128(seed_vec, _mm_loadu_si128(PI.as_ptr().add(8).cast())),
        key: seed_vec,
    }
}

#[inline]
#[target_feature(enable = "sse2", enable = "ssse3", enable = "aes")]
pub(crate) unsafe fn minimal_absorb(state: &mut MinimalRegs, block: __m128i) {
    state.aes = _mm_aesenc_si128(state.aes, block);
    state.sum = shuffle_add(state.sum, block);
}

#[inline]
#[target_feature(enable = "sse2", enable = "aes")]
pub(crate) unsafe fn minimal_finalize(state: &MinimalRegs, length: u64) -> u64 {
    let keyed = _mm_add_epi64(state.key, _mm_set_epi64x(0, length as i64));
    let mixed = _mm_aesenc_si128(state.sum, state.aes);
    // Two rounds against the keyed block; one is not enough for SMHasher.
    low_word(_mm_aesenc_si128(_mm_aesenc_si128(mixed, keyed), mixed))
}

// =============================================================================
// FULL STATE
// =============================================================================

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn lanes_init(seed: u64) -> ([__m128i; 4], [__m128i; 4]) {
    let seed_vec = _mm_set1_epi64x(seed as i64);
    let mut aes = [_mm_setzero_si128(); 4];
    let mut sum = [_mm_setzero_si128(); 4];
    for i in 0..4 {
        aes[i] = _mm_xor_si128(seed_vec, _mm_loadu_si128(PI.as_ptr().add(2 * i).cast()));
        sum[i] = _mm_xor_si128(seed_vec, _mm_loadu_si128(PI.as_ptr().add(8 + 2 * i).cast()));
    }
    (aes, sum)
}

#[inline]
#[target_feature(enable = "sse2", enable = "ssse3", enable = "aes")]
unsafe fn lanes_absorb(aes: &mut [__m128i; 4], sum: &mut [__m128i; 4], chunk: *const u8) {
    for i in 0..4 {
        let ins = _mm_loadu_si128(chunk.add(i * LANE_SIZE).cast());
        aes[i] = _mm_aesenc_si128(aes[i], ins);
        sum[i] = shuffle_add(sum[i], ins);
    }
}

#[inline]
#[target_feature(enable = "sse2", enable = "aes")]
unsafe fn lanes_finalize(aes: &[__m128i; 4], sum: &[__m128i; 4], key: __m128i, length: u64) -> u64 {
    let keyed = _mm_add_epi64(key, _mm_set_epi64x(0, length as i64));
    let mixed0 = _mm_aesenc_si128(sum[0], aes[0]);
    let mixed1 = _mm_aesenc_si128(sum[1], aes[1]);
    let mixed2 = _mm_aesenc_si128(sum[2], aes[2]);
    let mixed3 = _mm_aesenc_si128(sum[3], aes[3]);
    let reduced = _mm_aesenc_si128(
        _mm_aesenc_si128(mixed0, mixed1),
        _mm_aesenc_si128(mixed2, mixed3),
    );
    low_word(_mm_aesenc_si128(_mm_aesenc_si128(reduced, keyed), reduced))
}

// =============================================================================
// ONE-SHOT HASH
// =============================================================================

/// Single-shot hash. Short inputs use the minimal state with overlapping
/// tail blocks; longer ones run the four-lane absorption.
#[target_feature(enable = "sse2", enable = "ssse3", enable = "aes")]
pub unsafe fn hash(text: &[u8], seed: u64) -> u64 {
    let length = text.len();
    if length < BLOCK_SIZE {
        let mut state = minimal_init(seed);
        if length <= 16 {
            let (lo, hi) = padded_words(text);
            minimal_absorb(&mut state, words(lo, hi));
        } else if length <= 32 {
            minimal_absorb(&mut state, _mm_loadu_si128(text.as_ptr().cast()));
            let (lo, hi) = tail_words(text, 32);
            minimal_absorb(&mut state, words(lo, hi));
        } else if length <= 48 {
            minimal_absorb(&mut state, _mm_loadu_si128(text.as_ptr().cast()));
            minimal_absorb(&mut state, _mm_loadu_si128(text.as_ptr().add(16).cast()));
            let (lo, hi) = tail_words(text, 48);
            minimal_absorb(&mut state, words(lo, hi));
        } else {
            minimal_absorb(&mut state, _mm_loadu_si128(text.as_ptr().cast()));
            minimal_absorb(&mut state, _mm_loadu_si128(text.as_ptr().add(16).cast()));
            minimal_absorb(&mut state, _mm_loadu_si128(text.as_ptr().add(32).cast()));
            let (lo, hi) = tail_words(text, 64);
            minimal_absorb(&mut state, words(lo, hi));
        }
        minimal_finalize(&state, length as u64)
    } else {
        let (mut aes, mut sum) = lanes_init(seed);
        let mut offset = 0;
        while offset + BLOCK_SIZE <= length {
            lanes_absorb(&mut aes, &mut sum, text.as_ptr().add(offset));
            offset += BLOCK_SIZE;
        }
        if offset < length {
            let mut staged = [0u8; BLOCK_SIZE];
            staged[..length - offset].copy_from_slice(&text[offset..]);
            lanes_absorb(&mut aes, &mut sum, staged.as_ptr());
        }
        lanes_finalize(&aes, &sum, _mm_set1_epi64x(seed as i64), length as u64)
    }
}

// =============================================================================
// STREAMING
// =============================================================================

/// Absorbs whole 64-byte blocks into the lane registers.
#[target_feature(enable = "sse2", enable = "ssse3", enable = "aes")]
pub(crate) unsafe fn update_blocks(state: &mut HashState, blocks: &[u8]) {
    debug_assert!(blocks.len() % BLOCK_SIZE == 0);
    let mut aes = [_mm_setzero_si128(); 4];
    let mut sum = [_mm_setzero_si128(); 4];
    for i in 0..4 {
        aes[i] = _mm_loadu_si128(state.aes.as_ptr().add(2 * i).cast());
        sum[i] = _mm_loadu_si128(state.sum.as_ptr().add(2 * i).cast());
    }
    for chunk in blocks.chunks_exact(BLOCK_SIZE) {
        lanes_absorb(&mut aes, &mut sum, chunk.as_ptr());
    }
    for i in 0..4 {
        _mm_storeu_si128(state.aes.as_mut_ptr().add(2 * i).cast(), aes[i]);
        _mm_storeu_si128(state.sum.as_mut_ptr().add(2 * i).cast(), sum[i]);
    }
}

/// Non-destructive fold of a streaming state.
#[target_feature(enable = "sse2", enable = "ssse3", enable = "aes")]
pub(crate) unsafe fn fold(state: &HashState) -> u64 {
    let length = state.ins_length;
    if length >= BLOCK_SIZE as u64 {
        let mut aes = [_mm_setzero_si128(); 4];
        let mut sum = [_mm_setzero_si128(); 4];
        for i in 0..4 {
            aes[i] = _mm_loadu_si128(state.aes.as_ptr().add(2 * i).cast());
            sum[i] = _mm_loadu_si128(state.sum.as_ptr().add(2 * i).cast());
        }
        if length % BLOCK_SIZE as u64 != 0 {
            lanes_absorb(&mut aes, &mut sum, state.ins.as_ptr());
        }
        let key = words(state.key[0], state.key[1]);
        lanes_finalize(&aes, &sum, key, length)
    } else {
        // Back to the minimal state: lane zero carries the short-input seed
        // words, and the zero-padded staging buffer provides the blocks.
        let mut minimal = MinimalRegs {
            aes: _mm_loadu_si128(state.aes.as_ptr().cast()),
            sum: _mm_loadu_si128(state.sum.as_ptr().cast()),
            key: words(state.key[0], state.key[1]),
        };
        let staged_blocks = (length.max(1) as usize).div_ceil(LANE_SIZE);
        for i in 0..staged_blocks {
            let block = _mm_loadu_si128(state.ins.as_ptr().add(i * LANE_SIZE).cast());
            minimal_absorb(&mut minimal, block);
        }
        minimal_finalize(&minimal, length)
    }
}

// =============================================================================
// GENERATOR
// =============================================================================

/// Counter-mode generator, four 128-bit blocks per iteration.
#[target_feature(enable = "sse2", enable = "aes")]
pub unsafe fn fill_random(text: &mut [u8], nonce: u64) {
    let nonce_vec = _mm_set1_epi64x(nonce as i64);
    let keys = [
        _mm_xor_si128(nonce_vec, _mm_loadu_si128(PI.as_ptr().cast())),
        _mm_xor_si128(nonce_vec, _mm_loadu_si128(PI.as_ptr().add(2).cast())),
        _mm_xor_si128(nonce_vec, _mm_loadu_si128(PI.as_ptr().add(4).cast())),
        _mm_xor_si128(nonce_vec, _mm_loadu_si128(PI.as_ptr().add(6).cast())),
    ];
    let mut inputs = [
        nonce_vec,
        _mm_set1_epi64x(nonce.wrapping_add(1) as i64),
        _mm_set1_epi64x(nonce.wrapping_add(2) as i64),
        _mm_set1_epi64x(nonce.wrapping_add(3) as i64),
    ];
    let increment = _mm_set1_epi64x(4);

    let length = text.len();
    let mut offset = 0;
    while offset + BLOCK_SIZE <= length {
        for i in 0..4 {
            let generated = _mm_aesenc_si128(inputs[i], keys[i]);
            _mm_storeu_si128(text.as_mut_ptr().add(offset + i * LANE_SIZE).cast(), generated);
            inputs[i] = _mm_add_epi64(inputs[i], increment);
        }
        offset += BLOCK_SIZE;
    }
    if offset < length {
        let mut staged = [0u8; BLOCK_SIZE];
        for i in 0..4 {
            let generated = _mm_aesenc_si128(inputs[i], keys[i]);
            _mm_storeu_si128(staged.as_mut_ptr().add(i * LANE_SIZE).cast(), generated);
        }
        text[offset..].copy_from_slice(&staged[..length - offset]);
    }
}

// =============================================================================
// BYTE-SUM
// =============================================================================

/// SSE2 byte-sum: `PSADBW` against zero collapses 16 bytes into two partial
/// sums per iteration.
#[target_feature(enable = "sse2")]
pub unsafe fn bytesum_sse2(text: &[u8]) -> u64 {
    if text.len() < 16 {
        return crate::kernels::portable::bytesum(text);
    }
    let zero = _mm_setzero_si128();
    let mut sums = zero;
    let mut chunks = text.chunks_exact(16);
    for chunk in &mut chunks {
        let vec = _mm_loadu_si128(chunk.as_ptr().cast());
        sums = _mm_add_epi64(sums, _mm_sad_epu8(vec, zero));
    }
    low_word(sums) + high_word(sums) + crate::kernels::portable::bytesum(chunks.remainder())
}

/// AVX2 byte-sum. Huge buffers walk the aligned body from both ends to
/// spread fetches across memory pages.
#[target_feature(enable = "avx2")]
pub unsafe fn bytesum_avx2(text: &[u8]) -> u64 {
    use core::arch::x86_64::{
        _mm256_add_epi64, _mm256_castsi256_si128, _mm256_extracti128_si256, _mm256_load_si256,
        _mm256_loadu_si256, _mm256_sad_epu8, _mm256_setzero_si256,
    };

    let length = text.len();
    let is_huge = length > 1024 * 1024;
    if length <= 32 {
        return bytesum_sse2(text);
    }

    let zero = _mm256_setzero_si256();
    if !is_huge {
        let mut sums = zero;
        let mut chunks = text.chunks_exact(32);
        for chunk in &mut chunks {
            let vec = _mm256_loadu_si256(chunk.as_ptr().cast());
            sums = _mm256_add_epi64(sums, _mm256_sad_epu8(vec, zero));
        }
        let folded = _mm_add_epi64(
            _mm256_castsi256_si128(sums),
            _mm256_extracti128_si256::<1>(sums),
        );
        low_word(folded) + high_word(folded) + crate::kernels::portable::bytesum(chunks.remainder())
    } else {
        // Align the body, then traverse it from both ends at once.
        let address = text.as_ptr() as usize;
        let head_length = (32 - address % 32) % 32;
        let tail_length = (address + length) % 32;
        let mut body_length = length - head_length - tail_length;

        let mut result = crate::kernels::portable::bytesum(&text[..head_length])
            + crate::kernels::portable::bytesum(&text[length - tail_length..]);

        let mut forward = text.as_ptr().add(head_length);
        let mut sums = zero;
        let mut sums_reversed = zero;
        while body_length >= 64 {
            let vec = _mm256_load_si256(forward.cast());
            sums = _mm256_add_epi64(sums, _mm256_sad_epu8(vec, zero));
            let vec_reversed = _mm256_load_si256(forward.add(body_length - 32).cast());
            sums_reversed = _mm256_add_epi64(sums_reversed, _mm256_sad_epu8(vec_reversed, zero));
            forward = forward.add(32);
            body_length -= 64;
        }
        if body_length >= 32 {
            let vec = _mm256_load_si256(forward.cast());
            sums = _mm256_add_epi64(sums, _mm256_sad_epu8(vec, zero));
        }
        let both = _mm256_add_epi64(sums, sums_reversed);
        let folded = _mm_add_epi64(
            _mm256_castsi256_si128(both),
            _mm256_extracti128_si256::<1>(both),
        );
        result += low_word(folded) + high_word(folded);
        result
    }
}
