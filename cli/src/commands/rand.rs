//! Rand Command
//!
//! Writes the deterministic byte stream for a nonce, for seeding test
//! fixtures and reproducing generator output across machines.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

pub fn generate_bytes(length: usize, nonce: u64, output: Option<&Path>) -> Result<()> {
    let mut buffer = vec![0u8; length];
    photon::fill_random(&mut buffer, nonce);

    match output {
        Some(path) => std::fs::write(path, &buffer)
            .with_context(|| format!("Failed to write: {}", path.display()))?,
        None => std::io::stdout()
            .write_all(&buffer)
            .context("Failed to write to stdout")?,
    }
    Ok(())
}
