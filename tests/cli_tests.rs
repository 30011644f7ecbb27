//! CLI integration tests using assert_cmd.
//!
//! Help and arg-validation tests plus small end-to-end scans. The titanic
//! subcommand is only exercised through --help here: its candidates run to
//! ~12,600 digits and a real scan takes far too long for a test suite.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

#[allow(deprecated)]
fn qnhunt() -> Command {
    Command::cargo_bin("qnhunt").unwrap()
}

// --- Help and arg validation ---

#[test]
fn help_shows_all_subcommands() {
    qnhunt().arg("--help").assert().success().stdout(
        predicate::str::contains("solve")
            .and(predicate::str::contains("titanic"))
            .and(predicate::str::contains("verify")),
    );
}

#[test]
fn help_solve_shows_args() {
    qnhunt()
        .args(["solve", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--n")
                .and(predicate::str::contains("--q-start"))
                .and(predicate::str::contains("--q-end")),
        );
}

#[test]
fn help_titanic_shows_args() {
    qnhunt()
        .args(["titanic", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--offset-start")
                .and(predicate::str::contains("--offset-end"))
                .and(predicate::str::contains("--out-dir")),
        );
}

#[test]
fn unknown_subcommand_fails() {
    qnhunt()
        .arg("nonexistent")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn verify_missing_file_arg_fails() {
    qnhunt()
        .arg("verify")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

// --- End-to-end scans ---

#[test]
fn solve_square_scan_finds_known_probable_primes() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("found.log");
    qnhunt()
        .args([
            "--seed",
            "1",
            "--log",
            log.to_str().unwrap(),
            "solve",
            "--n",
            "2",
            "--q-start",
            "2",
            "--q-end",
            "10",
        ])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[FOUND] q=2, n=2 | Digits: 1 | Status: PRP")
                .and(predicate::str::contains("[FOUND] q=9, n=2"))
                // Q_2(5) = 9 and Q_2(8) = 15 are composite
                .and(predicate::str::contains("[FOUND] q=5,").not())
                .and(predicate::str::contains("[FOUND] q=8,").not())
                .and(predicate::str::contains("Found 7 candidates")),
        );

    // The log gets one CSV line per finding
    let contents = fs::read_to_string(&log).unwrap();
    assert_eq!(contents.lines().count(), 7);
    assert!(contents.lines().next().unwrap().ends_with(",2,2,1"));
}

#[test]
fn solve_inverted_range_fails() {
    let dir = tempfile::tempdir().unwrap();
    qnhunt()
        .args([
            "--log",
            dir.path().join("found.log").to_str().unwrap(),
            "solve",
            "--q-start",
            "100",
            "--q-end",
            "2",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("inverted"));
}

#[test]
fn solve_base_below_two_fails() {
    let dir = tempfile::tempdir().unwrap();
    qnhunt()
        .args([
            "--log",
            dir.path().join("found.log").to_str().unwrap(),
            "solve",
            "--q-start",
            "1",
            "--q-end",
            "10",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("base must be at least 2"));
}

// --- Verification ---

#[test]
fn verify_classifies_rows_and_summarizes() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("results.csv");
    // Q_2(9) = 17 (prime, claim holds); Q_2(5) = 9 (composite, claim is false);
    // Q_2(8) = 15 marked composite is not re-checked; one malformed row
    fs::write(
        &csv,
        "base_q,exponent_n,status\n\
         9,2,PRP\n\
         5,2,PRP\n\
         8,2,composite\n\
         oops,2,PRP\n",
    )
    .unwrap();

    qnhunt()
        .args(["--seed", "1", "verify", csv.to_str().unwrap()])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("q=9, n=2 -> Verified PRP")
                .and(predicate::str::contains(
                    "q=5, n=2 -> CLAIMED PRP BUT FAILED CHECK!",
                ))
                .and(predicate::str::contains(
                    "Summary: 1 Verified, 1 Failed (1 skipped, 1 parse errors)",
                )),
        );
}

#[test]
fn verify_missing_file_fails() {
    qnhunt()
        .args(["verify", "/no/such/file.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot open results file"));
}

#[test]
fn verify_missing_header_fails() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("results.csv");
    fs::write(&csv, "a,b,c\n1,2,3\n").unwrap();
    qnhunt()
        .args(["verify", csv.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing column"));
}
