//! Hash Command
//!
//! File digests with automatic parallelization across files via Rayon.

use anyhow::{Context, Result};
use clap::ValueEnum;
use rayon::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum Algorithm {
    /// Seeded 64-bit hash
    Hash,
    /// 64-bit byte-sum checksum
    Sum,
}

enum DigestState {
    Hash(photon::Hasher),
    Sum(u64),
}

impl DigestState {
    fn new(algo: Algorithm, seed: u64) -> Self {
        match algo {
            Algorithm::Hash => Self::Hash(photon::Hasher::with_seed(seed)),
            Algorithm::Sum => Self::Sum(0),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Hash(hasher) => hasher.update(data),
            Self::Sum(total) => *total = total.wrapping_add(photon::bytesum(data)),
        }
    }

    fn finish(&self) -> u64 {
        match self {
            Self::Hash(hasher) => hasher.finish(),
            Self::Sum(total) => *total,
        }
    }
}

/// Streams one file through the selected digest.
pub fn digest_file(path: &Path, algo: Algorithm, seed: u64) -> Result<u64> {
    let mut file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open: {}", path.display()))?;

    let mut digest = DigestState::new(algo, seed);
    let mut buffer = [0u8; 128 * 1024];
    loop {
        let read = file
            .read(&mut buffer)
            .with_context(|| format!("Failed to read: {}", path.display()))?;
        if read == 0 {
            break;
        }
        digest.update(&buffer[..read]);
    }
    Ok(digest.finish())
}

/// Hashes files in parallel, printing results in argument order.
pub fn hash_files(files: &[PathBuf], algo: Algorithm, seed: u64) -> Result<()> {
    let results = Mutex::new(Vec::with_capacity(files.len()));
    let errors = Mutex::new(Vec::new());

    files.par_iter().for_each(|path| match digest_file(path, algo, seed) {
        Ok(digest) => results.lock().unwrap().push((path.clone(), digest)),
        Err(error) => errors.lock().unwrap().push((path.clone(), error)),
    });

    let mut results = results.into_inner().unwrap();
    results.sort_by_key(|(path, _)| files.iter().position(|p| p == path).unwrap_or(usize::MAX));
    for (path, digest) in results {
        println!("{digest:016x}  {}", path.display());
    }

    let errors = errors.into_inner().unwrap();
    for (path, error) in &errors {
        eprintln!("Error: {}: {error}", path.display());
    }
    if !errors.is_empty() {
        anyhow::bail!("Failed to digest {} file(s)", errors.len());
    }

    Ok(())
}
