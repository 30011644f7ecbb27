//! # Main — CLI Entry Point
//!
//! Routes CLI subcommands to the scan engine and verification path. Shared
//! concerns live here: logging initialization, the rayon thread pool, and
//! the tester configuration every subcommand consumes.
//!
//! ## Subcommands
//!
//! - `solve` — scan Q_n(q) = q^n − (q−1)^n over a base range for a single
//!   exponent (defaults: n=47, q in [2, 1000]); findings are appended to a
//!   CSV log.
//! - `titanic` — scan the fixed family q = 20^100 + offset across the 25
//!   prime exponents up to 97, writing bilingual discovery certificates.
//! - `verify` — independently re-check claimed PRP rows of a results CSV.
//!
//! ## Global Options
//!
//! - `--mr-rounds`: Miller–Rabin iterations (default 20, error ≤ 4^−20).
//! - `--seed`: fixed witness seed for reproducible runs.
//! - `--threads`: rayon pool size (default all logical cores).
//! - `--log`: path of the append-only findings log.

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "qnhunt", about = "Hunt for probable primes of the form q^n - (q-1)^n")]
struct Cli {
    /// Miller-Rabin rounds (default: 20, error probability <= 4^-20)
    #[arg(long, default_value_t = 20)]
    mr_rounds: u32,

    /// Fixed witness seed for reproducible runs (defaults to OS entropy)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of rayon worker threads (defaults to all logical cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Path of the append-only findings log
    #[arg(long, default_value = "found_primes.log")]
    log: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan Q_n(q) over a base range for a single exponent
    Solve {
        /// Exponent n
        #[arg(long, default_value_t = 47)]
        n: u32,
        /// Start base q
        #[arg(long, default_value_t = 2)]
        q_start: u64,
        /// End base q (inclusive)
        #[arg(long, default_value_t = 1000)]
        q_end: u64,
    },
    /// Scan the family 20^100 + offset across the 25 prime exponents up to 97
    Titanic {
        /// First offset above 20^100
        #[arg(long, default_value_t = 223_311)]
        offset_start: u64,
        /// Last offset (inclusive)
        #[arg(long, default_value_t = 223_411)]
        offset_end: u64,
        /// Directory for certificate and report files
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Re-verify claimed PRP rows from a results CSV (columns: base_q, exponent_n, status)
    Verify {
        /// Path to the results CSV file
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    // Structured logging: LOG_FORMAT=json for machine consumption,
    // human-readable stderr otherwise
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt().json().with_target(false).init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();
    cli::configure_rayon(cli.threads);

    match &cli.command {
        Commands::Solve { n, q_start, q_end } => cli::run_solve(&cli, *n, *q_start, *q_end),
        Commands::Titanic {
            offset_start,
            offset_end,
            out_dir,
        } => cli::run_titanic(&cli, *offset_start, *offset_end, out_dir),
        Commands::Verify { file } => cli::run_verify(&cli, file),
    }
}
