//! NEON + AES kernel (aarch64).
//!
//! `AESE` with a zero round key computes `SubBytes(ShiftRows(state))`, so
//! one x86-style `AESENC` is `AESE` + `AESMC` + `EOR` with the real key.
//! The additive half shuffles through `TBL` and adds as 64-bit lanes;
//! byte-summing widens pairwise.

#![allow(unsafe_code)]

use crate::kernels::constants::{BLOCK_SIZE, LANE_SIZE, PI, SUM_SHUFFLE};
use crate::kernels::{padded_words, tail_words};
use crate::types::HashState;

use core::arch::aarch64::{
    uint8x16_t, vaddq_u64, vaeseq_u8, vaesmcq_u8, vcombine_u64, vcreate_u64, vdupq_n_u8,
    veorq_u8, vgetq_lane_u64, vld1q_u8, vpaddlq_u16, vpaddlq_u32, vpaddlq_u8,
    vreinterpretq_u64_u8, vreinterpretq_u8_u64, vst1q_u8,
};

// =============================================================================
// REGISTER HELPERS
// =============================================================================

#[inline]
#[target_feature(enable = "neon")]
unsafe fn words(lo: u64, hi: u64) -> uint8x16_t {
    vreinterpretq_u8_u64(vcombine_u64(vcreate_u64(lo), vcreate_u64(hi)))
}

#[inline]
#[target_feature(enable = "neon")]
unsafe fn low_word(vec: uint8x16_t) -> u64 {
    vgetq_lane_u64::<0>(vreinterpretq_u64_u8(vec))
}

/// One AES encryption round, matching `AESENC` exactly.
#[inline]
#[target_feature(enable = "neon", enable = "aes")]
unsafe fn aes_round(state: uint8x16_t, key: uint8x16_t) -> uint8x16_t {
    veorq_u8(vaesmcq_u8(vaeseq_u8(state, vdupq_n_u8(0))), key)
}

#[inline]
#[target_feature(enable = "neon")]
unsafe fn shuffle_add(sum: uint8x16_t, block: uint8x16_t) -> uint8x16_t {
    use core::arch::aarch64::vqtbl1q_u8;
    let shuffled = vqtbl1q_u8(sum, vld1q_u8(SUM_SHUFFLE.as_ptr()));
    vreinterpretq_u8_u64(vaddq_u64(
        vreinterpretq_u64_u8(shuffled),
        vreinterpretq_u64_u8(block),
    ))
}

// =============================================================================
// MINIMAL STATE
// =============================================================================

struct MinimalRegs {
    aes: uint8x16_t,
    sum: uint8x16_t,
    key: uint8x16_t,
}

#[inline]
#[target_feature(enable = "neon")]
unsafe fn minimal_init(seed: u64) -> MinimalRegs {
    MinimalRegs {
        aes: words(seed ^ PI[0], seed ^ PI[1]),
        sum: words(seed ^ PI[8], seed ^ PI[9]),
        key: words(seed, seed),
    }
}

#[inline]
#[target_feature(enable = "neon", enable = "aes")]
unsafe fn minimal_absorb(state: &mut MinimalRegs, block: uint8x16_t) {
    state.aes = aes_round(state.aes, block);
    state.sum = shuffle_add(state.sum, block);
}

#[inline]
#[target_feature(enable = "neon", enable = "aes")]
unsafe fn minimal_finalize(state: &MinimalRegs, length: u64) -> u64 {
    let keyed = vreinterpretq_u8_u64(vaddq_u64(
        vreinterpretq_u64_u8(state.key),
        vcombine_u64(vcreate_u64(length), vcreate_u64(0)),
    ));
    let mixed = aes_round(state.sum, state.aes);
    // Two rounds against the keyed block; one is not enough for SMHasher.
    low_word(aes_round(aes_round(mixed, keyed), mixed))
}

// =============================================================================
// FULL STATE
// =============================================================================

#[inline]
#[target_feature(enable = "neon")]
unsafe fn lanes_init(seed: u64) -> ([uint8x16_t; 4], [uint8x16_t; 4]) {
    let mut aes = [vdupq_n_u8(0); 4];
    let mut sum = [vdupq_n_u8(0); 4];
    for i in 0..4 {
        aes[i] = words(seed ^ PI[2 * i], seed ^ PI[2 * i + 1]);
        sum[i] = words(seed ^ PI[8 + 2 * i], seed ^ PI[9 + 2 * i]);
    }
    (aes, sum)
}

#[inline]
#[target_feature(enable = "neon", enable = "aes")]
unsafe fn lanes_absorb(aes: &mut [uint8x16_t; 4], sum: &mut [uint8x16_t; 4], chunk: *const u8) {
    for i in 0..4 {
        let ins = vld1q_u8(chunk.add(i * LANE_SIZE));
        aes[i] = aes_round(aes[i], ins);
        sum[i] = shuffle_add(sum[i], ins);
    }
}

#[inline]
#[target_feature(enable = "neon", enable = "aes")]
unsafe fn lanes_finalize(
    aes: &[uint8x16_t; 4],
    sum: &[uint8x16_t; 4],
    key: uint8x16_t,
    length: u64,
) -> u64 {
    let keyed = vreinterpretq_u8_u64(vaddq_u64(
        vreinterpretq_u64_u8(key),
        vcombine_u64(vcreate_u64(length), vcreate_u64(0)),
    ));
    let mixed0 = aes_round(sum[0], aes[0]);
    let mixed1 = aes_round(sum[1], aes[1]);
    let mixed2 = aes_round(sum[2], aes[2]);
    let mixed3 = aes_round(sum[3], aes[3]);
    let reduced = aes_round(aes_round(mixed0, mixed1), aes_round(mixed2, mixed3));
    low_word(aes_round(aes_round(reduced, keyed), reduced))
}

// =============================================================================
// ONE-SHOT HASH
// =============================================================================

/// Single-shot hash, same dispatch as the portable reference.
#[target_feature(enable = "neon", enable = "aes")]
pub unsafe fn hash(text: &[u8], seed: u64) -> u64 {
    let length = text.len();
    if length < BLOCK_SIZE {
        let mut state = minimal_init(seed);
        if length <= 16 {
            let (lo, hi) = padded_words(text);
            minimal_absorb(&mut state, words(lo, hi));
        } else if length <= 32 {
            minimal_absorb(&mut state, vld1q_u8(text.as_ptr()));
            let (lo, hi) = tail_words(text, 32);
            minimal_absorb(&mut state, words(lo, hi));
        } else if length <= 48 {
            minimal_absorb(&mut state, vld1q_u8(text.as_ptr()));
            minimal_absorb(&mut state, vld1q_u8(text.as_ptr().add(16)));
            let (lo, hi) = tail_words(text, 48);
            minimal_absorb(&mut state, words(lo, hi));
        } else {
            minimal_absorb(&mut state, vld1q_u8(text.as_ptr()));
            minimal_absorb(&mut state, vld1q_u8(text.as_ptr().add(16)));
            minimal_absorb(&mut state, vld1q_u8(text.as_ptr().add(32)));
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
        lanes_finalize(&aes, &sum, words(seed, seed), length as u64)
    }
}

// =============================================================================
// STREAMING
// =============================================================================

/// Absorbs whole 64-byte blocks into the lane registers.
#[target_feature(enable = "neon", enable = "aes")]
pub(crate) unsafe fn update_blocks(state: &mut HashState, blocks: &[u8]) {
    debug_assert!(blocks.len() % BLOCK_SIZE == 0);
    let mut aes = [vdupq_n_u8(0); 4];
    let mut sum = [vdupq_n_u8(0); 4];
    for i in 0..4 {
        aes[i] = words(state.aes[2 * i], state.aes[2 * i + 1]);
        sum[i] = words(state.sum[2 * i], state.sum[2 * i + 1]);
    }
    for chunk in blocks.chunks_exact(BLOCK_SIZE) {
        lanes_absorb(&mut aes, &mut sum, chunk.as_ptr());
    }
    for i in 0..4 {
        let aes_words = vreinterpretq_u64_u8(aes[i]);
        let sum_words = vreinterpretq_u64_u8(sum[i]);
        state.aes[2 * i] = vgetq_lane_u64::<0>(aes_words);
        state.aes[2 * i + 1] = vgetq_lane_u64::<1>(aes_words);
        state.sum[2 * i] = vgetq_lane_u64::<0>(sum_words);
        state.sum[2 * i + 1] = vgetq_lane_u64::<1>(sum_words);
    }
}

/// Non-destructive fold of a streaming state.
#[target_feature(enable = "neon", enable = "aes")]
pub(crate) unsafe fn fold(state: &HashState) -> u64 {
    let length = state.ins_length;
    if length >= BLOCK_SIZE as u64 {
        let mut aes = [vdupq_n_u8(0); 4];
        let mut sum = [vdupq_n_u8(0); 4];
        for i in 0..4 {
            aes[i] = words(state.aes[2 * i], state.aes[2 * i + 1]);
            sum[i] = words(state.sum[2 * i], state.sum[2 * i + 1]);
        }
        if length % BLOCK_SIZE as u64 != 0 {
            lanes_absorb(&mut aes, &mut sum, state.ins.as_ptr());
        }
        lanes_finalize(&aes, &sum, words(state.key[0], state.key[1]), length)
    } else {
        let mut minimal = MinimalRegs {
            aes: words(state.aes[0], state.aes[1]),
            sum: words(state.sum[0], state.sum[1]),
            key: words(state.key[0], state.key[1]),
        };
        let staged_blocks = (length.max(1) as usize).div_ceil(LANE_SIZE);
        for i in 0..staged_blocks {
            minimal_absorb(&mut minimal, vld1q_u8(state.ins.as_ptr().add(i * LANE_SIZE)));
        }
        minimal_finalize(&minimal, length)
    }
}

// =============================================================================
// GENERATOR
// =============================================================================

/// Counter-mode generator, four 128-bit blocks per iteration.
#[target_feature(enable = "neon", enable = "aes")]
pub unsafe fn fill_random(text: &mut [u8], nonce: u64) {
    let keys = [
        words(nonce ^ PI[0], nonce ^ PI[1]),
        words(nonce ^ PI[2], nonce ^ PI[3]),
        words(nonce ^ PI[4], nonce ^ PI[5]),
        words(nonce ^ PI[6], nonce ^ PI[7]),
    ];

    let length = text.len();
    let mut offset = 0;
    let mut lane = 0u64;
    while offset + BLOCK_SIZE <= length {
        for i in 0..4 {
            let counter = nonce.wrapping_add(lane + i as u64);
            let generated = aes_round(words(counter, counter), keys[i]);
            vst1q_u8(text.as_mut_ptr().add(offset + i * LANE_SIZE), generated);
        }
        lane += 4;
        offset += BLOCK_SIZE;
    }
    if offset < length {
        let mut staged = [0u8; BLOCK_SIZE];
        for i in 0..4 {
            let counter = nonce.wrapping_add(lane + i as u64);
            let generated = aes_round(words(counter, counter), keys[i]);
            vst1q_u8(staged.as_mut_ptr().add(i * LANE_SIZE), generated);
        }
        text[offset..].copy_from_slice(&staged[..length - offset]);
    }
}

// =============================================================================
// BYTE-SUM
// =============================================================================

/// Pairwise-widening byte-sum: u8 lanes fold to u16, u32, then u64.
#[target_feature(enable = "neon")]
pub unsafe fn bytesum(text: &[u8]) -> u64 {
    let mut sums = vcombine_u64(vcreate_u64(0), vcreate_u64(0));
    let mut chunks = text.chunks_exact(16);
    for chunk in &mut chunks {
        let vec = vld1q_u8(chunk.as_ptr());
        sums = vaddq_u64(sums, vpaddlq_u32(vpaddlq_u16(vpaddlq_u8(vec))));
    }
    let total = vgetq_lane_u64::<0>(sums) + vgetq_lane_u64::<1>(sums);
    total.wrapping_add(crate::kernels::portable::bytesum(chunks.remainder()))
}
