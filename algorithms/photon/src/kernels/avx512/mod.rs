//! AVX-512 + VAES kernel (x86_64).
//!
//! The four 128-bit lanes of the full state live in single ZMM registers, so
//! one `VAESENC` plus one `VPSHUFB`/`VPADDQ` pair absorbs 64 bytes per
//! round. Heads and tails go through masked loads and stores instead of
//! staging copies.
//!
//! Short inputs reuse the 128-bit minimal path from the AES-NI kernel with
//! masked tail loads, and streaming folds delegate there as well — the fold
//! is a 128-bit computation no matter how the blocks were absorbed.

#![allow(unsafe_code)]
#![allow(clippy::cast_possible_wrap)]

use crate::kernels::aesni;
use crate::kernels::constants::{BLOCK_SIZE, PI, SUM_SHUFFLE};
use crate::types::HashState;

use core::arch::x86_64::{
    __m128i, __m512i, __mmask16, __mmask64, _mm512_add_epi64, _mm512_aesenc_epi128,
    _mm512_broadcast_i32x4, _mm512_extracti32x4_epi32, _mm512_loadu_si512,
    _mm512_mask_storeu_epi8, _mm512_maskz_loadu_epi8, _mm512_reduce_add_epi64, _mm512_sad_epu8,
    _mm512_set1_epi64, _mm512_set_epi64, _mm512_setzero_si512, _mm512_shuffle_epi8,
    _mm512_storeu_si512, _mm512_xor_si512, _mm_aesenc_si128, _mm_loadu_si128,
    _mm_maskz_loadu_epi8, _mm_set1_epi64x, _mm_setzero_si128, _mm_xor_si128,
};

// =============================================================================
// MASK HELPERS
// =============================================================================

/// Mask selecting the first `length` of 16 byte lanes.
#[inline]
fn mask16_until(length: usize) -> __mmask16 {
    if length >= 16 {
        !0
    } else {
        (1u16 << length) - 1
    }
}

/// Mask selecting the first `length` of 64 byte lanes.
#[inline]
fn mask64_until(length: usize) -> __mmask64 {
    if length >= 64 {
        !0
    } else {
        (1u64 << length) - 1
    }
}

#[inline]
#[target_feature(enable = "avx512f", enable = "avx512bw")]
unsafe fn shuffle_mask_zmm() -> __m512i {
    _mm512_broadcast_i32x4(_mm_loadu_si128(SUM_SHUFFLE.as_ptr().cast()))
}

// =============================================================================
// ONE-SHOT HASH
// =============================================================================

/// Single-shot hash: 128-bit minimal path below one block, 512-bit
/// absorption with a masked tail load above it.
#[target_feature(
    enable = "avx512f",
    enable = "avx512bw",
    enable = "avx512vl",
    enable = "vaes",
    enable = "aes",
    enable = "ssse3",
    enable = "sse2"
)]
pub unsafe fn hash(text: &[u8], seed: u64) -> u64 {
    let length = text.len();
    if length < BLOCK_SIZE {
        let mut state = aesni::minimal_init(seed);
        if length <= 16 {
            let block = if length == 0 {
                _mm_setzero_si128()
            } else {
                _mm_maskz_loadu_epi8(mask16_until(length), text.as_ptr().cast())
            };
            aesni::minimal_absorb(&mut state, block);
        } else if length <= 32 {
            aesni::minimal_absorb(&mut state, _mm_loadu_si128(text.as_ptr().cast()));
            let tail = _mm_maskz_loadu_epi8(mask16_until(length - 16), text.as_ptr().add(16).cast());
            aesni::minimal_absorb(&mut state, tail);
        } else if length <= 48 {
            aesni::minimal_absorb(&mut state, _mm_loadu_si128(text.as_ptr().cast()));
            aesni::minimal_absorb(&mut state, _mm_loadu_si128(text.as_ptr().add(16).cast()));
            let tail = _mm_maskz_loadu_epi8(mask16_until(length - 32), text.as_ptr().add(32).cast());
            aesni::minimal_absorb(&mut state, tail);
        } else {
            aesni::minimal_absorb(&mut state, _mm_loadu_si128(text.as_ptr().cast()));
            aesni::minimal_absorb(&mut state, _mm_loadu_si128(text.as_ptr().add(16).cast()));
            aesni::minimal_absorb(&mut state, _mm_loadu_si128(text.as_ptr().add(32).cast()));
            let tail = _mm_maskz_loadu_epi8(mask16_until(length - 48), text.as_ptr().add(48).cast());
            aesni::minimal_absorb(&mut state, tail);
        }
        return aesni::minimal_finalize(&state, length as u64);
    }

    let seed_vec = _mm512_set1_epi64(seed as i64);
    let mut aes = _mm512_xor_si512(seed_vec, _mm512_loadu_si512(PI.as_ptr().cast()));
    let mut sum = _mm512_xor_si512(seed_vec, _mm512_loadu_si512(PI.as_ptr().add(8).cast()));
    let shuffle = shuffle_mask_zmm();

    let mut offset = 0;
    while offset + BLOCK_SIZE <= length {
        let ins = _mm512_loadu_si512(text.as_ptr().add(offset).cast());
        aes = _mm512_aesenc_epi128(aes, ins);
        sum = _mm512_add_epi64(_mm512_shuffle_epi8(sum, shuffle), ins);
        offset += BLOCK_SIZE;
    }
    if offset < length {
        let ins = _mm512_maskz_loadu_epi8(mask64_until(length - offset), text.as_ptr().add(offset).cast());
        aes = _mm512_aesenc_epi128(aes, ins);
        sum = _mm512_add_epi64(_mm512_shuffle_epi8(sum, shuffle), ins);
    }

    finalize_zmm(aes, sum, _mm_set1_epi64x(seed as i64), length as u64)
}

/// Tree-reduction of the ZMM lane pairs down to the 64-bit digest.
#[inline]
#[target_feature(enable = "avx512f", enable = "aes", enable = "sse2")]
unsafe fn finalize_zmm(aes: __m512i, sum: __m512i, key: __m128i, length: u64) -> u64 {
    use core::arch::x86_64::{_mm_add_epi64, _mm_cvtsi128_si64, _mm_set_epi64x};

    let mixed: [__m128i; 4] = [
        _mm_aesenc_si128(
            _mm512_extracti32x4_epi32::<0>(sum),
            _mm512_extracti32x4_epi32::<0>(aes),
        ),
        _mm_aesenc_si128(
            _mm512_extracti32x4_epi32::<1>(sum),
            _mm512_extracti32x4_epi32::<1>(aes),
        ),
        _mm_aesenc_si128(
            _mm512_extracti32x4_epi32::<2>(sum),
            _mm512_extracti32x4_epi32::<2>(aes),
        ),
        _mm_aesenc_si128(
            _mm512_extracti32x4_epi32::<3>(sum),
            _mm512_extracti32x4_epi32::<3>(aes),
        ),
    ];
    let keyed = _mm_add_epi64(key, _mm_set_epi64x(0, length as i64));
    let reduced = _mm_aesenc_si128(
        _mm_aesenc_si128(mixed[0], mixed[1]),
        _mm_aesenc_si128(mixed[2], mixed[3]),
    );
    _mm_cvtsi128_si64(_mm_aesenc_si128(_mm_aesenc_si128(reduced, keyed), reduced)) as u64
}

// =============================================================================
// STREAMING
// =============================================================================

/// Absorbs whole 64-byte blocks, one `VAESENC` per block.
#[target_feature(enable = "avx512f", enable = "avx512bw", enable = "vaes")]
pub(crate) unsafe fn update_blocks(state: &mut HashState, blocks: &[u8]) {
    debug_assert!(blocks.len() % BLOCK_SIZE == 0);
    let mut aes = _mm512_loadu_si512(state.aes.as_ptr().cast());
    let mut sum = _mm512_loadu_si512(state.sum.as_ptr().cast());
    let shuffle = shuffle_mask_zmm();
    for chunk in blocks.chunks_exact(BLOCK_SIZE) {
        let ins = _mm512_loadu_si512(chunk.as_ptr().cast());
        aes = _mm512_aesenc_epi128(aes, ins);
        sum = _mm512_add_epi64(_mm512_shuffle_epi8(sum, shuffle), ins);
    }
    _mm512_storeu_si512(state.aes.as_mut_ptr().cast(), aes);
    _mm512_storeu_si512(state.sum.as_mut_ptr().cast(), sum);
}

// The fold stays 128-bit no matter how the state was filled; the AES-NI
// implementation is used as-is.

// =============================================================================
// GENERATOR
// =============================================================================

/// Counter-mode generator, one 512-bit `VAESENC` per 64 bytes, masked
/// stores for the tail.
#[target_feature(
    enable = "avx512f",
    enable = "avx512bw",
    enable = "avx512vl",
    enable = "vaes",
    enable = "aes",
    enable = "sse2"
)]
pub unsafe fn fill_random(text: &mut [u8], nonce: u64) {
    let length = text.len();
    if length == 0 {
        return;
    }
    if length <= 16 {
        use core::arch::x86_64::_mm_mask_storeu_epi8;
        let input = _mm_set1_epi64x(nonce as i64);
        let key = _mm_xor_si128(input, _mm_loadu_si128(PI.as_ptr().cast()));
        let generated = _mm_aesenc_si128(input, key);
        _mm_mask_storeu_epi8(text.as_mut_ptr().cast(), mask16_until(length), generated);
        return;
    }

    let key = _mm512_xor_si512(
        _mm512_set1_epi64(nonce as i64),
        _mm512_loadu_si512(PI.as_ptr().cast()),
    );
    let mut input = counter_block(nonce);
    let increment = _mm512_set1_epi64(4);

    let mut offset = 0;
    while offset + BLOCK_SIZE <= length {
        let generated = _mm512_aesenc_epi128(input, key);
        _mm512_storeu_si512(text.as_mut_ptr().add(offset).cast(), generated);
        input = _mm512_add_epi64(input, increment);
        offset += BLOCK_SIZE;
    }
    if offset < length {
        let generated = _mm512_aesenc_epi128(input, key);
        _mm512_mask_storeu_epi8(
            text.as_mut_ptr().add(offset).cast(),
            mask64_until(length - offset),
            generated,
        );
    }
}

#[inline]
#[target_feature(enable = "avx512f")]
unsafe fn counter_block(nonce: u64) -> __m512i {
    _mm512_set_epi64(
        nonce.wrapping_add(3) as i64,
        nonce.wrapping_add(3) as i64,
        nonce.wrapping_add(2) as i64,
        nonce.wrapping_add(2) as i64,
        nonce.wrapping_add(1) as i64,
        nonce.wrapping_add(1) as i64,
        nonce as i64,
        nonce as i64,
    )
}

// =============================================================================
// BYTE-SUM
// =============================================================================

/// `VPSADBW`-based byte-sum with masked heads and tails; huge buffers walk
/// the aligned body from both ends.
#[target_feature(enable = "avx512f", enable = "avx512bw", enable = "avx512vl")]
pub unsafe fn bytesum(text: &[u8]) -> u64 {
    let length = text.len();
    let is_huge = length >= 1024 * 1024;
    let zero = _mm512_setzero_si512();

    if length == 0 {
        return 0;
    }
    if length <= BLOCK_SIZE {
        let vec = _mm512_maskz_loadu_epi8(mask64_until(length), text.as_ptr().cast());
        return _mm512_reduce_add_epi64(_mm512_sad_epu8(vec, zero)) as u64;
    }

    // Align the body so the main loop uses full-width aligned loads.
    let address = text.as_ptr() as usize;
    let head_length = (64 - address % 64) % 64;
    let tail_length = (address + length) % 64;
    let mut body_length = length - head_length - tail_length;

    let head = _mm512_maskz_loadu_epi8(mask64_until(head_length), text.as_ptr().cast());
    let mut sums = _mm512_sad_epu8(head, zero);
    let tail = _mm512_maskz_loadu_epi8(
        mask64_until(tail_length),
        text.as_ptr().add(head_length + body_length).cast(),
    );
    let mut sums_reversed = _mm512_sad_epu8(tail, zero);

    let mut forward = text.as_ptr().add(head_length);
    if !is_huge {
        while body_length >= 64 {
            let vec = _mm512_loadu_si512(forward.cast());
            sums = _mm512_add_epi64(sums, _mm512_sad_epu8(vec, zero));
            forward = forward.add(64);
            body_length -= 64;
        }
    } else {
        while body_length >= 128 {
            let vec = _mm512_loadu_si512(forward.cast());
            sums = _mm512_add_epi64(sums, _mm512_sad_epu8(vec, zero));
            let vec_reversed = _mm512_loadu_si512(forward.add(body_length - 64).cast());
            sums_reversed = _mm512_add_epi64(sums_reversed, _mm512_sad_epu8(vec_reversed, zero));
            forward = forward.add(64);
            body_length -= 128;
        }
        if body_length >= 64 {
            let vec = _mm512_loadu_si512(forward.cast());
            sums = _mm512_add_epi64(sums, _mm512_sad_epu8(vec, zero));
        }
    }

    _mm512_reduce_add_epi64(_mm512_add_epi64(sums, sums_reversed)) as u64
}
