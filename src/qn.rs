//! # Qn — Candidate Generation for Q_n(q) = q^n − (q−1)^n
//!
//! Produces the lazy, deterministic sequence of candidates for one scan:
//! outer iteration over the base q (ascending), inner iteration over the
//! exponent set in the order supplied. Every value is computed as an exact
//! difference of two exact GMP exponentiations — there is no modulus in this
//! family, so no modular shortcut applies.
//!
//! Candidate sizes grow as ~n·log10(q) decimal digits; [`expected_digits`]
//! exposes that estimate so callers can budget before launching a scan.
//! For the extended family (q = 20^100 + offset, n up to 97) a single
//! candidate already runs to ~12,600 digits.

use rug::ops::Pow;
use rug::Integer;
use thiserror::Error;

/// Invalid scan configuration. Fatal to the scan that attempted it — no
/// partial results are produced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("base range is inverted: q_start {start} > q_end {end}")]
    InvertedRange { start: Integer, end: Integer },
    #[error("base must be at least 2, got {0}")]
    BaseTooSmall(Integer),
    #[error("exponents must be at least 1")]
    ExponentZero,
    #[error("exponent set is empty")]
    EmptyExponentSet,
}

/// Exact Q_n(q) = q^n − (q−1)^n.
///
/// Strictly positive for q ≥ 2, n ≥ 1 since q^n > (q−1)^n.
pub fn value(q: &Integer, n: u32) -> Integer {
    let qn = Integer::from(q.pow(n));
    let pn = Integer::from(q - 1u32).pow(n);
    let v = qn - pn;
    debug_assert!(v > 0u32, "Q_{}({}) must be positive", n, q);
    v
}

/// Estimated decimal digit count of Q_n(q), ≈ n·log10(q).
///
/// Never materializes the value: log10(q) comes from the mantissa/exponent
/// decomposition, which stays accurate for bases of any size. This slightly
/// overestimates (it is really the digit count of q^n), which is the right
/// direction for budgeting memory and time before a scan.
pub fn expected_digits(q: &Integer, n: u32) -> u64 {
    let (mantissa, exp) = q.to_f64_exp();
    let log10_q = mantissa.log10() + exp as f64 * std::f64::consts::LOG10_2;
    (log10_q * n as f64) as u64 + 1
}

/// One (q, n) pair with its exact value. Immutable; consumed once by the
/// tester and then dropped — values this large are never cached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub q: Integer,
    pub n: u32,
    pub value: Integer,
}

impl Candidate {
    pub fn new(q: Integer, n: u32) -> Self {
        let value = value(&q, n);
        Candidate { q, n, value }
    }
}

/// Validated scan configuration: inclusive base range plus exponent set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanRange {
    q_start: Integer,
    q_end: Integer,
    exponents: Vec<u32>,
}

impl ScanRange {
    /// Validates q_start ≥ 2, q_start ≤ q_end, and a non-empty exponent set
    /// with every exponent ≥ 1.
    pub fn new(
        q_start: Integer,
        q_end: Integer,
        exponents: Vec<u32>,
    ) -> Result<Self, DomainError> {
        if q_start < 2u32 {
            return Err(DomainError::BaseTooSmall(q_start));
        }
        if q_start > q_end {
            return Err(DomainError::InvertedRange {
                start: q_start,
                end: q_end,
            });
        }
        if exponents.is_empty() {
            return Err(DomainError::EmptyExponentSet);
        }
        if exponents.contains(&0) {
            return Err(DomainError::ExponentZero);
        }
        Ok(ScanRange {
            q_start,
            q_end,
            exponents,
        })
    }

    pub fn q_start(&self) -> &Integer {
        &self.q_start
    }

    pub fn q_end(&self) -> &Integer {
        &self.q_end
    }

    /// Exponents in the order supplied at construction — never resorted.
    pub fn exponents(&self) -> &[u32] {
        &self.exponents
    }

    /// Number of base values in the inclusive range.
    pub fn base_count(&self) -> Integer {
        Integer::from(&self.q_end - &self.q_start) + 1u32
    }

    /// Total candidates the scan will generate.
    pub fn candidate_count(&self) -> Integer {
        self.base_count() * self.exponents.len() as u64
    }

    /// Largest expected digit count across the whole range, for budgeting.
    pub fn max_expected_digits(&self) -> u64 {
        self.exponents
            .iter()
            .map(|&n| expected_digits(&self.q_end, n))
            .max()
            .unwrap_or(1)
    }

    /// Lazy candidate sequence in scan order. Restartable: the range is pure
    /// data, so each call starts a fresh pass from q_start.
    pub fn candidates(&self) -> Candidates<'_> {
        Candidates {
            range: self,
            q: self.q_start.clone(),
            next_exp: 0,
        }
    }
}

/// Iterator over a [`ScanRange`]'s candidates. Values are computed on
/// demand; nothing is retained between steps.
pub struct Candidates<'a> {
    range: &'a ScanRange,
    q: Integer,
    next_exp: usize,
}

impl Iterator for Candidates<'_> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        if self.q > self.range.q_end {
            return None;
        }
        let n = self.range.exponents[self.next_exp];
        let candidate = Candidate::new(self.q.clone(), n);
        self.next_exp += 1;
        if self.next_exp == self.range.exponents.len() {
            self.next_exp = 0;
            self.q += 1u32;
        }
        Some(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values_match_hand_computation() {
        // Q_2(2) = 4-1 = 3, Q_2(3) = 9-4 = 5, Q_2(4) = 16-9 = 7, Q_2(5) = 25-16 = 9
        for (q, expected) in [(2u32, 3u32), (3, 5), (4, 7), (5, 9)] {
            assert_eq!(
                value(&Integer::from(q), 2),
                Integer::from(expected),
                "Q_2({}) mismatch",
                q
            );
        }
    }

    #[test]
    fn value_is_exact_for_large_exponents() {
        // Q_47(2) = 2^47 - 1 = 140737488355327
        let v = value(&Integer::from(2u32), 47);
        assert_eq!(v, Integer::from(140_737_488_355_327u64));
    }

    #[test]
    fn value_is_positive_across_range() {
        for q in 2u32..50 {
            for n in 1u32..20 {
                assert!(
                    value(&Integer::from(q), n) > 0u32,
                    "Q_{}({}) should be positive",
                    n,
                    q
                );
            }
        }
    }

    #[test]
    fn value_with_exponent_one_is_one() {
        // Q_1(q) = q - (q-1) = 1 for every base
        for q in [2u32, 10, 1000] {
            assert_eq!(value(&Integer::from(q), 1), 1u32);
        }
    }

    #[test]
    fn huge_base_value_has_expected_magnitude() {
        // q = 20^100 + 223311, n = 2: Q_2(q) = q^2 - (q-1)^2 = 2q - 1
        let q = Integer::from(20u32).pow(100) + 223_311u32;
        let v = value(&q, 2);
        let expected = Integer::from(2u32) * &q - 1u32;
        assert_eq!(v, expected);
    }

    #[test]
    fn expected_digits_tracks_exact_count() {
        for (q, n) in [(2u32, 47u32), (999, 47), (10, 100), (7, 200)] {
            let est = expected_digits(&Integer::from(q), n);
            let exact = crate::exact_digits(&value(&Integer::from(q), n));
            let diff = (est as i64 - exact as i64).abs();
            assert!(
                diff <= 2,
                "expected_digits({}, {}) = {} but exact = {}",
                q,
                n,
                est,
                exact
            );
        }
    }

    #[test]
    fn scan_order_is_base_major_exponent_minor() {
        let range = ScanRange::new(Integer::from(2u32), Integer::from(3u32), vec![5, 2, 3]).unwrap();
        let pairs: Vec<(u32, u32)> = range
            .candidates()
            .map(|c| (c.q.to_u32().unwrap(), c.n))
            .collect();
        // Exponents stay in supplied order (5, 2, 3) — never resorted
        assert_eq!(pairs, vec![(2, 5), (2, 2), (2, 3), (3, 5), (3, 2), (3, 3)]);
    }

    #[test]
    fn single_base_range_scans_every_exponent_once() {
        let range =
            ScanRange::new(Integer::from(7u32), Integer::from(7u32), vec![1, 2, 3]).unwrap();
        let candidates: Vec<Candidate> = range.candidates().collect();
        assert_eq!(candidates.len(), 3);
        assert!(candidates.iter().all(|c| c.q == 7u32));
    }

    #[test]
    fn candidates_are_restartable() {
        let range = ScanRange::new(Integer::from(2u32), Integer::from(5u32), vec![2]).unwrap();
        let first: Vec<Integer> = range.candidates().map(|c| c.value).collect();
        let second: Vec<Integer> = range.candidates().map(|c| c.value).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn candidate_count_matches_iteration() {
        let range =
            ScanRange::new(Integer::from(2u32), Integer::from(10u32), vec![2, 3]).unwrap();
        assert_eq!(range.candidate_count(), 18u32);
        assert_eq!(range.candidates().count(), 18);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err =
            ScanRange::new(Integer::from(10u32), Integer::from(2u32), vec![2]).unwrap_err();
        assert!(matches!(err, DomainError::InvertedRange { .. }));
    }

    #[test]
    fn base_below_two_is_rejected() {
        for q in [0u32, 1] {
            let err =
                ScanRange::new(Integer::from(q), Integer::from(10u32), vec![2]).unwrap_err();
            assert!(matches!(err, DomainError::BaseTooSmall(_)), "q={}", q);
        }
    }

    #[test]
    fn zero_exponent_is_rejected() {
        let err =
            ScanRange::new(Integer::from(2u32), Integer::from(10u32), vec![2, 0]).unwrap_err();
        assert_eq!(err, DomainError::ExponentZero);
    }

    #[test]
    fn empty_exponent_set_is_rejected() {
        let err = ScanRange::new(Integer::from(2u32), Integer::from(10u32), vec![]).unwrap_err();
        assert_eq!(err, DomainError::EmptyExponentSet);
    }

    #[test]
    fn max_expected_digits_uses_largest_base_and_exponent() {
        let range =
            ScanRange::new(Integer::from(2u32), Integer::from(1000u32), vec![47]).unwrap();
        let est = range.max_expected_digits();
        let exact = crate::exact_digits(&value(&Integer::from(1000u32), 47));
        assert!((est as i64 - exact as i64).abs() <= 2, "est={} exact={}", est, exact);
    }
}
