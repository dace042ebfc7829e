//! Photon CLI
//!
//! File hashing, checksum verification, and deterministic byte generation.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{check_mode, generate_bytes, hash_files, Algorithm};
use std::path::PathBuf;

// =============================================================================
// CLI DEFINITION
// =============================================================================

#[derive(Parser)]
#[command(name = "photon")]
#[command(about = "AES-accelerated 64-bit hashing and checksums", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Files to hash (if no subcommand)
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Digest to compute
    #[arg(short, long, value_enum, default_value_t = Algorithm::Hash)]
    algo: Algorithm,

    /// Seed for the hash digest
    #[arg(short, long, default_value_t = 0)]
    seed: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify digests from a checksum file (like sha256sum -c)
    Check {
        #[arg(value_name = "FILE")]
        checksum_file: PathBuf,
    },
    /// Write deterministic pseudo-random bytes for a nonce
    Rand {
        /// Number of bytes to produce
        length: usize,

        /// Nonce keying the generator
        #[arg(short, long, default_value_t = 0)]
        nonce: u64,

        /// Destination file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

// =============================================================================
// ENTRY POINT
// =============================================================================

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Check { checksum_file }) => check_mode(checksum_file)?,
        Some(Commands::Rand {
            length,
            nonce,
            output,
        }) => generate_bytes(*length, *nonce, output.as_deref())?,
        None => {
            if cli.files.is_empty() {
                eprintln!("Error: No files specified");
                eprintln!("Usage: photon [FILE]... or photon --help");
                std::process::exit(1);
            }

            hash_files(&cli.files, cli.algo, cli.seed)?;
        }
    }

    Ok(())
}
