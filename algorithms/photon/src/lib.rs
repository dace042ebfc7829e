#![cfg_attr(not(feature = "std"), no_std)]

//! # Photon
//!
//! Portable, high-throughput hashing built on single AES rounds: a seeded
//! 64-bit hash with bit-identical output on every platform, a byte-level
//! checksum, and a deterministic pseudo-random byte generator. Vectorized
//! with AES-NI, AVX-512 + VAES, and NEON where available; a scalar kernel
//! defines the reference output everywhere else.
//!
//! Not cryptographic: one AES round per block buys mixing, not secrecy.
//!
//! # Usage
//! ```rust
//! // Single-shot hashing, optionally seeded.
//! let digest = photon::hash(b"Performance matters");
//! assert_eq!(digest, photon::hash_seeded(b"Performance matters", 0));
//!
//! // Streaming produces the same bits for any chunking.
//! let mut hasher = photon::Hasher::new();
//! hasher.update(b"Performance ");
//! hasher.update(b"matters");
//! assert_eq!(hasher.finish(), digest);
//!
//! // Checksums and deterministic noise.
//! assert_eq!(photon::bytesum(b"hi"), 209);
//! let mut noise = [0u8; 32];
//! photon::fill_random(&mut noise, 42);
//! ```

// =============================================================================
// MODULES
// =============================================================================

mod engine;
// Public for tests and benchmarks only; not part of the stable API.
#[doc(hidden)]
pub mod kernels;
mod oneshot;
mod streaming;
mod types;

// =============================================================================
// EXPORTS
// =============================================================================

pub use oneshot::{bytesum, fill_random, hash, hash_seeded};
pub use streaming::{HashBuilder, Hasher};

/// Returns the name of the hardware backend currently in use.
#[must_use]
pub fn active_backend() -> &'static str {
    engine::dispatcher::active_backend_name()
}
