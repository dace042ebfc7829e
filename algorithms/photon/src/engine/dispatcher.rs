//! Hardware dispatcher.
//!
//! Picks the fastest available kernel per operation. With the `std` feature
//! the choice happens at runtime from CPUID/HWCAP; without it, from the
//! compile-time `target_feature` set. The portable kernel is always there,
//! so selection never fails — and because every kernel computes the same
//! function, the choice is invisible in the output.

use crate::kernels;
use crate::types::{AbsorbFn, BytesumFn, FillFn, FoldFn, HashFn};

// =============================================================================
// FEATURE PROBES
// =============================================================================

#[cfg(target_arch = "x86_64")]
#[inline]
fn has_avx512() -> bool {
    #[cfg(feature = "std")]
    {
        is_x86_feature_detected!("avx512f")
            && is_x86_feature_detected!("avx512bw")
            && is_x86_feature_detected!("avx512vl")
            && is_x86_feature_detected!("vaes")
            && is_x86_feature_detected!("aes")
            && is_x86_feature_detected!("ssse3")
    }
    #[cfg(not(feature = "std"))]
    {
        cfg!(all(
            target_feature = "avx512f",
            target_feature = "avx512bw",
            target_feature = "avx512vl",
            target_feature = "vaes",
            target_feature = "aes",
            target_feature = "ssse3"
        ))
    }
}

#[cfg(target_arch = "x86_64")]
#[inline]
fn has_aesni() -> bool {
    #[cfg(feature = "std")]
    {
        is_x86_feature_detected!("aes") && is_x86_feature_detected!("ssse3")
    }
    #[cfg(not(feature = "std"))]
    {
        cfg!(all(target_feature = "aes", target_feature = "ssse3"))
    }
}

#[cfg(target_arch = "x86_64")]
#[inline]
fn has_avx2() -> bool {
    #[cfg(feature = "std")]
    {
        is_x86_feature_detected!("avx2")
    }
    #[cfg(not(feature = "std"))]
    {
        cfg!(target_feature = "avx2")
    }
}

#[cfg(target_arch = "x86_64")]
#[inline]
fn has_sse2() -> bool {
    #[cfg(feature = "std")]
    {
        is_x86_feature_detected!("sse2")
    }
    #[cfg(not(feature = "std"))]
    {
        cfg!(target_feature = "sse2")
    }
}

#[cfg(target_arch = "aarch64")]
#[inline]
fn has_neon_aes() -> bool {
    #[cfg(feature = "std")]
    {
        std::arch::is_aarch64_feature_detected!("aes")
    }
    #[cfg(not(feature = "std"))]
    {
        cfg!(target_feature = "aes")
    }
}

// =============================================================================
// KERNEL SELECTION
// =============================================================================

/// Fastest single-shot hash kernel for this CPU.
#[inline]
pub(crate) fn hash_kernel() -> HashFn {
    #[cfg(target_arch = "x86_64")]
    {
        if has_avx512() {
            return hash_avx512;
        }
        if has_aesni() {
            return hash_aesni;
        }
    }
    #[cfg(target_arch = "aarch64")]
    {
        if has_neon_aes() {
            return hash_neon;
        }
    }
    kernels::portable::hash
}

/// Fastest byte-sum kernel for this CPU.
#[inline]
pub(crate) fn bytesum_kernel() -> BytesumFn {
    #[cfg(target_arch = "x86_64")]
    {
        if has_avx512() {
            return bytesum_avx512;
        }
        if has_avx2() {
            return bytesum_avx2;
        }
        if has_sse2() {
            return bytesum_sse2;
        }
    }
    #[cfg(target_arch = "aarch64")]
    {
        if has_neon_aes() {
            return bytesum_neon;
        }
    }
    kernels::portable::bytesum
}

/// Fastest generator kernel for this CPU.
#[inline]
pub(crate) fn fill_kernel() -> FillFn {
    #[cfg(target_arch = "x86_64")]
    {
        if has_avx512() {
            return fill_avx512;
        }
        if has_aesni() {
            return fill_aesni;
        }
    }
    #[cfg(target_arch = "aarch64")]
    {
        if has_neon_aes() {
            return fill_neon;
        }
    }
    kernels::portable::fill_random
}

/// Fastest streaming block-absorption kernel for this CPU.
#[inline]
pub(crate) fn absorb_kernel() -> AbsorbFn {
    #[cfg(target_arch = "x86_64")]
    {
        if has_avx512() {
            return absorb_avx512;
        }
        if has_aesni() {
            return absorb_aesni;
        }
    }
    #[cfg(target_arch = "aarch64")]
    {
        if has_neon_aes() {
            return absorb_neon;
        }
    }
    kernels::portable::update_blocks
}

/// Fastest streaming fold kernel for this CPU. The fold is a 128-bit
/// computation on every backend, so AVX-512 CPUs use the AES-NI fold.
#[inline]
pub(crate) fn fold_kernel() -> FoldFn {
    #[cfg(target_arch = "x86_64")]
    {
        if has_aesni() {
            return fold_aesni;
        }
    }
    #[cfg(target_arch = "aarch64")]
    {
        if has_neon_aes() {
            return fold_neon;
        }
    }
    kernels::portable::fold
}

/// Name of the backend the hash kernel resolves to.
#[must_use]
pub(crate) fn active_backend_name() -> &'static str {
    #[cfg(target_arch = "x86_64")]
    {
        if has_avx512() {
            return "AVX-512 + VAES";
        }
        if has_aesni() {
            return "AES-NI";
        }
    }
    #[cfg(target_arch = "aarch64")]
    {
        if has_neon_aes() {
            return "NEON + AES";
        }
    }
    "Portable"
}

// =============================================================================
// SAFE WRAPPERS
// =============================================================================

#[cfg(target_arch = "x86_64")]
mod x86_wrappers {
    use super::kernels;
    use crate::types::HashState;

    // SAFETY throughout: each wrapper is only handed out by the selection
    // functions above, after the CPU features its kernel was compiled for
    // were verified.

    pub(super) fn hash_avx512(text: &[u8], seed: u64) -> u64 {
        unsafe { kernels::avx512::hash(text, seed) }
    }

    pub(super) fn hash_aesni(text: &[u8], seed: u64) -> u64 {
        unsafe { kernels::aesni::hash(text, seed) }
    }

    pub(super) fn bytesum_avx512(text: &[u8]) -> u64 {
        unsafe { kernels::avx512::bytesum(text) }
    }

    pub(super) fn bytesum_avx2(text: &[u8]) -> u64 {
        unsafe { kernels::aesni::bytesum_avx2(text) }
    }

    pub(super) fn bytesum_sse2(text: &[u8]) -> u64 {
        // SSE2 is part of the x86_64 baseline.
        unsafe { kernels::aesni::bytesum_sse2(text) }
    }

    pub(super) fn fill_avx512(text: &mut [u8], nonce: u64) {
        unsafe { kernels::avx512::fill_random(text, nonce) }
    }

    pub(super) fn fill_aesni(text: &mut [u8], nonce: u64) {
        unsafe { kernels::aesni::fill_random(text, nonce) }
    }

    pub(super) fn absorb_avx512(state: &mut HashState, blocks: &[u8]) {
        unsafe { kernels::avx512::update_blocks(state, blocks) }
    }

    pub(super) fn absorb_aesni(state: &mut HashState, blocks: &[u8]) {
        unsafe { kernels::aesni::update_blocks(state, blocks) }
    }

    pub(super) fn fold_aesni(state: &HashState) -> u64 {
        unsafe { kernels::aesni::fold(state) }
    }
}
#[cfg(target_arch = "x86_64")]
use x86_wrappers::*;

#[cfg(target_arch = "aarch64")]
mod arm_wrappers {
    use super::kernels;
    use crate::types::HashState;

    // SAFETY throughout: only selected after the `aes` HWCAP was verified.

    pub(super) fn hash_neon(text: &[u8], seed: u64) -> u64 {
        unsafe { kernels::neon::hash(text, seed) }
    }

    pub(super) fn bytesum_neon(text: &[u8]) -> u64 {
        unsafe { kernels::neon::bytesum(text) }
    }

    pub(super) fn fill_neon(text: &mut [u8], nonce: u64) {
        unsafe { kernels::neon::fill_random(text, nonce) }
    }

    pub(super) fn absorb_neon(state: &mut HashState, blocks: &[u8]) {
        unsafe { kernels::neon::update_blocks(state, blocks) }
    }

    pub(super) fn fold_neon(state: &HashState) -> u64 {
        unsafe { kernels::neon::fold(state) }
    }
}
#[cfg(target_arch = "aarch64")]
use arm_wrappers::*;

// =============================================================================
// CROSS-BACKEND EQUIVALENCE TESTS
// =============================================================================
