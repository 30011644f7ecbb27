//! # Verify — Independent Re-verification of Claimed Results
//!
//! Re-checks previously claimed probable primes from a tabular results file.
//! The input is CSV with a header naming at least `base_q`, `exponent_n` and
//! `status`; rows whose status contains "PRP" or "PRIME" are re-fed through
//! the generator and tester. The stored status is never trusted: the value
//! is recomputed from (q, n) and classified from scratch.
//!
//! A malformed row is a [`ParseError`]: it is logged, counted, and skipped —
//! one bad row must not abort verification of the rest. Rows that make no
//! primality claim are counted as skipped.

use anyhow::{anyhow, Context, Result};
use rug::Integer;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::miller_rabin::MillerRabin;
use crate::qn;

/// A row the verifier could not interpret. Skipped and counted, never fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: expected at least {expected} columns, got {got}")]
    MissingColumn {
        line: usize,
        expected: usize,
        got: usize,
    },
    #[error("line {line}: invalid base '{value}'")]
    InvalidBase { line: usize, value: String },
    #[error("line {line}: invalid exponent '{value}'")]
    InvalidExponent { line: usize, value: String },
}

/// One re-checked claim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowVerdict {
    pub line: usize,
    pub q: Integer,
    pub n: u32,
    pub valid: bool,
}

/// Aggregate counts for one verification run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VerifySummary {
    pub verified: u64,
    pub failed: u64,
    pub skipped: u64,
    pub parse_errors: u64,
}

/// Header column positions for `base_q`, `exponent_n`, `status`.
struct Columns {
    base_q: usize,
    exponent_n: usize,
    status: usize,
}

fn parse_header(header: &str) -> Result<Columns> {
    let names: Vec<&str> = header.split(',').map(str::trim).collect();
    let find = |name: &str| {
        names
            .iter()
            .position(|&c| c == name)
            .ok_or_else(|| anyhow!("missing column '{}' in header: {}", name, header))
    };
    Ok(Columns {
        base_q: find("base_q")?,
        exponent_n: find("exponent_n")?,
        status: find("status")?,
    })
}

struct ParsedRow {
    q: Integer,
    n: u32,
    status: String,
}

fn parse_row(line_no: usize, line: &str, columns: &Columns) -> Result<ParsedRow, ParseError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let width = columns.base_q.max(columns.exponent_n).max(columns.status) + 1;
    if fields.len() < width {
        return Err(ParseError::MissingColumn {
            line: line_no,
            expected: width,
            got: fields.len(),
        });
    }

    let q_str = fields[columns.base_q];
    let q = Integer::parse(q_str)
        .map(Integer::from)
        .map_err(|_| ParseError::InvalidBase {
            line: line_no,
            value: q_str.to_string(),
        })?;
    // q < 2 can never have produced a candidate; treat it as bad input data
    if q < 2u32 {
        return Err(ParseError::InvalidBase {
            line: line_no,
            value: q_str.to_string(),
        });
    }

    let n_str = fields[columns.exponent_n];
    let n: u32 = n_str.parse().map_err(|_| ParseError::InvalidExponent {
        line: line_no,
        value: n_str.to_string(),
    })?;
    if n == 0 {
        return Err(ParseError::InvalidExponent {
            line: line_no,
            value: n_str.to_string(),
        });
    }

    Ok(ParsedRow {
        q,
        n,
        status: fields[columns.status].to_string(),
    })
}

/// Recompute Q_n(q) from scratch and classify it. Returns true when the
/// claim holds under the tester's round count.
pub fn verify_claim(q: &Integer, n: u32, tester: &MillerRabin) -> bool {
    let value = qn::value(q, n);
    tester.classify(&value).is_probably_prime()
}

/// Verify every claimed row of a reader. Returns the per-row verdicts for
/// claimed rows (in file order) and the summary counts.
pub fn verify_reader(
    reader: impl BufRead,
    tester: &MillerRabin,
) -> Result<(Vec<RowVerdict>, VerifySummary)> {
    let mut lines = reader.lines().enumerate();
    let (_, header) = lines
        .next()
        .ok_or_else(|| anyhow!("results file is empty"))?;
    let columns = parse_header(&header?)?;

    let mut verdicts = Vec::new();
    let mut summary = VerifySummary::default();

    for (idx, line) in lines {
        let line_no = idx + 1;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row = match parse_row(line_no, &line, &columns) {
            Ok(row) => row,
            Err(e) => {
                warn!(error = %e, "skipping malformed row");
                summary.parse_errors += 1;
                continue;
            }
        };

        // Only re-check rows that claim a probable or proven prime
        if !(row.status.contains("PRP") || row.status.contains("PRIME")) {
            summary.skipped += 1;
            continue;
        }

        let valid = verify_claim(&row.q, row.n, tester);
        if valid {
            summary.verified += 1;
        } else {
            summary.failed += 1;
        }
        verdicts.push(RowVerdict {
            line: line_no,
            q: row.q,
            n: row.n,
            valid,
        });
    }

    Ok((verdicts, summary))
}

/// Verify a results CSV on disk.
pub fn verify_file(
    path: &Path,
    tester: &MillerRabin,
) -> Result<(Vec<RowVerdict>, VerifySummary)> {
    let file = File::open(path)
        .with_context(|| format!("cannot open results file {}", path.display()))?;
    verify_reader(BufReader::new(file), tester)
}
