//! Photon Kernel Constants
//!
//! Two tables drive the whole hash family, and both are "nothing up my
//! sleeve" values:
//!
//! - `PI` holds the first 1024 bits of the hexadecimal expansion of π,
//!   computed with the Bailey-Borwein-Plouffe formula. `pi(16)` starts with
//!   `3.243F6A8885A308D3`, and the digits after the dot are the first entry.
//! - `SUM_SHUFFLE` is the byte permutation applied to the additive half of
//!   the state before every absorption, so that plain 64-bit lane additions
//!   still move entropy across byte positions.
//!
//! Every backend must use these tables verbatim; they are the only numeric
//! constants in the algorithm.

/// Hexadecimal digits of π, 1024 bits as little-endian 64-bit words.
///
/// The first eight words seed the AES half of the state, the last eight the
/// additive half. The counter-mode generator keys its blocks from the first
/// four 128-bit pairs.
pub const PI: [u64; 16] = [
    0x243F_6A88_85A3_08D3,
    0x1319_8A2E_0370_7344,
    0xA409_3822_299F_31D0,
    0x082E_FA98_EC4E_6C89,
    0x4528_21E6_38D0_1377,
    0xBE54_66CF_34E9_0C6C,
    0xC0AC_29B7_C97C_50DD,
    0x3F84_D5B5_B547_0917,
    0x9216_D5D9_8979_FB1B,
    0xD131_0BA6_98DF_B5AC,
    0x2FFD_72DB_D01A_DFB7,
    0xB8E1_AFED_6A26_7E96,
    0xBA7C_9045_F12C_7F99,
    0x24A1_9947_B391_6CF7,
    0x0801_F2E2_858E_FC16,
    0x6369_20D8_7157_4E69,
];

/// Source-byte index for each destination byte of the additive-mix shuffle.
///
/// Applied to each 16-byte lane independently; wider registers repeat the
/// same pattern per 128-bit lane.
pub const SUM_SHUFFLE: [u8; 16] = [
    0x04, 0x0b, 0x09, 0x06, 0x08, 0x0d, 0x0f, 0x05, //
    0x0e, 0x03, 0x01, 0x0c, 0x00, 0x07, 0x0a, 0x02,
];

/// Bytes absorbed per full-state round: four independent 128-bit lanes.
pub const BLOCK_SIZE: usize = 64;

/// Bytes per 128-bit lane.
pub const LANE_SIZE: usize = 16;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shuffle_is_a_permutation() {
        let mut seen = [false; 16];
        for &idx in &SUM_SHUFFLE {
            assert!(!seen[idx as usize], "index {idx} repeated");
            seen[idx as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn pi_starts_with_known_digits() {
        // 3.243F6A8885A308D3...
        assert_eq!(PI[0], 0x243F_6A88_85A3_08D3);
        assert_eq!(PI.len() * 64, 1024);
    }
}
