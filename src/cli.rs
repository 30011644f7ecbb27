//! # CLI Execution Functions
//!
//! Extracted from `main.rs` to keep the entry point slim. Contains the
//! execution logic for each subcommand: scan dispatch, titanic certificate
//! runs, results verification, and rayon pool configuration.

use anyhow::Result;
use qnhunt::miller_rabin::MillerRabin;
use qnhunt::progress::Progress;
use qnhunt::report::{CertificateWriter, FindingLog};
use qnhunt::{qn, scan, verify};
use rug::ops::Pow;
use rug::Integer;
use std::path::Path;
use tracing::{info, warn};

use super::Cli;

/// The titanic family base, 20^100 (131 decimal digits).
fn titanic_base() -> Integer {
    Integer::from(20u32).pow(100)
}

/// Exponents for the titanic family: the 25 primes up to 97.
const TITANIC_EXPONENTS: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Configure the global rayon pool. Zero or absent means all logical cores.
pub fn configure_rayon(threads: Option<usize>) {
    if let Some(threads) = threads {
        if threads > 0 {
            if let Err(e) = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
            {
                warn!(error = %e, "could not configure rayon pool, using defaults");
            }
        }
    }
}

/// The tester every subcommand shares: round count plus optional fixed seed.
fn tester_for(cli: &Cli) -> MillerRabin {
    match cli.seed {
        Some(seed) => MillerRabin::with_seed(cli.mr_rounds, seed),
        None => MillerRabin::new(cli.mr_rounds),
    }
}

/// Run a scan with progress reporting and log the aggregate counters.
fn run_scan(
    range: &qn::ScanRange,
    tester: &MillerRabin,
    sink: Option<&dyn qnhunt::FindingSink>,
) -> Result<scan::ScanReport> {
    info!(
        candidates = %range.candidate_count(),
        max_digits = range.max_expected_digits(),
        "scan budget"
    );
    // A candidate count beyond u64 range only loses the percent display
    let progress = match range.candidate_count().to_u64() {
        Some(total) => Progress::for_candidates(total),
        None => Progress::new(),
    };
    let reporter = progress.start_reporter();
    let result = scan::run(range, tester, &progress, sink);
    progress.stop();
    drop(reporter); // reporter exits on its next wake cycle
    if let Ok(report) = &result {
        progress.print_status();
        info!(
            tested = report.tested,
            found = report.found,
            elapsed_secs = format_args!("{:.2}", report.elapsed.as_secs_f64()),
            "scan complete"
        );
    }
    result
}

/// `solve`: scan Q_n(q) over a base range for one exponent, appending
/// findings to the CSV log.
pub fn run_solve(cli: &Cli, n: u32, q_start: u64, q_end: u64) -> Result<()> {
    let range = qn::ScanRange::new(Integer::from(q_start), Integer::from(q_end), vec![n])?;
    info!(
        params = %serde_json::json!({"form": "solve", "n": n, "q_start": q_start, "q_end": q_end}),
        "starting Q_n(q) scan"
    );
    let log = FindingLog::open(&cli.log)?;
    let tester = tester_for(cli);
    let report = run_scan(&range, &tester, Some(&log))?;
    for finding in &report.findings {
        println!(
            "[FOUND] q={}, n={} | Digits: {} | Status: PRP",
            finding.q, finding.n, finding.digit_count
        );
    }
    println!(
        "[*] Scan Complete. Found {} candidates in {:.2}s",
        report.found,
        report.elapsed.as_secs_f64()
    );
    Ok(())
}

/// `titanic`: scan the 20^100 + offset family across the 25 prime exponents
/// up to 97, writing bilingual certificates and a final report.
pub fn run_titanic(cli: &Cli, offset_start: u64, offset_end: u64, out_dir: &Path) -> Result<()> {
    let base = titanic_base();
    let range = qn::ScanRange::new(
        base.clone() + offset_start,
        base.clone() + offset_end,
        TITANIC_EXPONENTS.to_vec(),
    )?;
    info!(
        params = %serde_json::json!({
            "form": "titanic",
            "offset_start": offset_start,
            "offset_end": offset_end,
        }),
        "starting titanic scan"
    );
    let writer = CertificateWriter::new(out_dir, "titanic", base)?;
    let tester = tester_for(cli);
    let report = run_scan(&range, &tester, Some(&writer))?;
    writer.write_summary(report.elapsed)?;
    println!(
        "[*] Scan Complete. Found {} probable primes in {:.2}s",
        report.found,
        report.elapsed.as_secs_f64()
    );
    Ok(())
}

/// `verify`: re-check claimed PRP rows from a results CSV.
pub fn run_verify(cli: &Cli, file: &Path) -> Result<()> {
    let tester = tester_for(cli);
    info!(file = %file.display(), rounds = tester.rounds(), "verifying claimed results");
    let (rows, summary) = verify::verify_file(file, &tester)?;
    for row in &rows {
        if row.valid {
            println!("[✓] q={}, n={} -> Verified PRP", row.q, row.n);
        } else {
            println!("[✗] q={}, n={} -> CLAIMED PRP BUT FAILED CHECK!", row.q, row.n);
        }
    }
    println!(
        "Summary: {} Verified, {} Failed ({} skipped, {} parse errors)",
        summary.verified, summary.failed, summary.skipped, summary.parse_errors
    );
    Ok(())
}
