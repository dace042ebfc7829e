//! Check Command
//!
//! Verifies `<16 hex digits>  <path>` lines produced by the hash mode.

use super::hash::{digest_file, Algorithm};
use anyhow::{Context, Result};
use std::path::Path;

pub fn check_mode(checksum_file: &Path) -> Result<()> {
    let listing = std::fs::read_to_string(checksum_file)
        .with_context(|| format!("Failed to read: {}", checksum_file.display()))?;

    let mut failures = 0usize;
    let mut checked = 0usize;

    for (number, line) in listing.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (digest_hex, path) = line
            .split_once("  ")
            .with_context(|| format!("Malformed line {}: {line:?}", number + 1))?;
        let expected = u64::from_str_radix(digest_hex, 16)
            .with_context(|| format!("Bad digest on line {}: {digest_hex:?}", number + 1))?;

        checked += 1;
        match digest_file(Path::new(path), Algorithm::Hash, 0) {
            Ok(digest) if digest == expected => println!("{path}: OK"),
            Ok(_) => {
                println!("{path}: FAILED");
                failures += 1;
            }
            Err(error) => {
                println!("{path}: FAILED ({error})");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {checked} digest(s) did NOT match");
    }
    Ok(())
}
