//! # Scan — Orchestrates One Full Q_n(q) Sweep
//!
//! Drives the Cartesian iteration over (q, n), classifies every candidate,
//! and emits findings in generation order. Bases are processed in fixed-size
//! blocks: within a block each candidate is classified on its own rayon
//! task (each worker owns its candidate end to end), and rayon's indexed
//! collect preserves generation order, so the sequential emission loop after
//! each block sees findings exactly as a single-threaded scan would produce
//! them.
//!
//! A candidate's classification can never abort the scan; only an I/O
//! failure in the sink does.

use anyhow::Result;
use rayon::prelude::*;
use rug::Integer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

use crate::miller_rabin::{MillerRabin, Verdict};
use crate::progress::Progress;
use crate::qn::{Candidate, ScanRange};
use crate::{exact_digits, has_small_factor, FindingSink};

/// Base values per parallel block. Large enough to keep every core busy for
/// multi-exponent scans, small enough that progress stays current.
const BLOCK_BASES: u32 = 64;

/// One probable prime, in scan order. The only record that outlives its
/// candidate — the value itself is dropped after classification.
#[derive(Clone, Debug)]
pub struct Finding {
    pub q: Integer,
    pub n: u32,
    pub digit_count: u64,
    pub verdict: Verdict,
}

impl Finding {
    /// Display form of the candidate, e.g. `9^2 - 8^2`.
    pub fn expression(&self) -> String {
        let q_minus_1 = Integer::from(&self.q - 1u32);
        format!("{}^{} - {}^{}", self.q, self.n, q_minus_1, self.n)
    }
}

/// Aggregate result of one scan.
#[derive(Debug)]
pub struct ScanReport {
    pub findings: Vec<Finding>,
    pub tested: u64,
    pub found: u64,
    pub elapsed: Duration,
}

/// Classify one candidate. Trial division proves most composites without
/// touching GMP's modular exponentiation; every survivor gets the full
/// Miller–Rabin test. The pre-filter can only ever prove compositeness.
fn classify(candidate: &Candidate, tester: &MillerRabin) -> Verdict {
    if has_small_factor(&candidate.value) {
        return Verdict::Composite;
    }
    tester.classify(&candidate.value)
}

/// Run one full scan over `range`, emitting findings to `sink` in
/// generation order.
pub fn run(
    range: &ScanRange,
    tester: &MillerRabin,
    progress: &Arc<Progress>,
    sink: Option<&dyn FindingSink>,
) -> Result<ScanReport> {
    let start = Instant::now();
    let mut findings = Vec::new();
    let mut tested: u64 = 0;

    let mut block_start = range.q_start().clone();
    while block_start <= *range.q_end() {
        let mut block_end = Integer::from(&block_start + (BLOCK_BASES - 1));
        if block_end > *range.q_end() {
            block_end = range.q_end().clone();
        }

        *progress.current.lock().unwrap() = format!(
            "q=[{}..{}] exponents={}",
            block_start,
            block_end,
            range.exponents().len()
        );

        // Materialize this block's (q, n) pairs in generation order.
        let mut pairs: Vec<(Integer, u32)> = Vec::new();
        let mut q = block_start.clone();
        while q <= block_end {
            for &n in range.exponents() {
                pairs.push((q.clone(), n));
            }
            q += 1u32;
        }
        tested += pairs.len() as u64;

        // One candidate per task; indexed collect keeps generation order.
        let block_findings: Vec<Option<Finding>> = pairs
            .into_par_iter()
            .map(|(q, n)| {
                let candidate = Candidate::new(q, n);
                let verdict = classify(&candidate, tester);
                progress.tested.fetch_add(1, Ordering::Relaxed);
                if verdict.is_probably_prime() {
                    Some(Finding {
                        digit_count: exact_digits(&candidate.value),
                        q: candidate.q,
                        n: candidate.n,
                        verdict,
                    })
                } else {
                    None
                }
            })
            .collect();

        for finding in block_findings.into_iter().flatten() {
            progress.found.fetch_add(1, Ordering::Relaxed);
            info!(
                q = %finding.q,
                n = finding.n,
                digits = finding.digit_count,
                "probable prime found"
            );
            if let Some(sink) = sink {
                sink.record(&finding)?;
            }
            findings.push(finding);
        }

        block_start = block_end + 1u32;
    }

    let found = findings.len() as u64;
    Ok(ScanReport {
        findings,
        tested,
        found,
        elapsed: start.elapsed(),
    })
}
