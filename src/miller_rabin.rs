//! # MillerRabin — Probabilistic Primality Classification
//!
//! Classifies an arbitrary-precision non-negative integer as composite or
//! probably prime with k rounds of the Miller–Rabin test. Each round either
//! proves compositeness with certainty or passes, and a uniformly random
//! witness passes an odd composite with probability at most 1/4 — so a
//! k-round ProbablyPrime verdict carries error probability ≤ 4^−k. The
//! default of 20 rounds bounds the error at roughly 1 in 10^12.
//!
//! The whole test runs on `rug::Integer`: candidates in this search reach
//! tens of thousands of decimal digits, and truncating to machine words
//! would be a correctness bug, not an optimization.
//!
//! ## Witness randomness
//!
//! Witnesses come from GMP's Mersenne Twister (`rug::rand::RandState`),
//! seeded per classification either from the configured seed or from OS
//! entropy. A fixed seed makes runs byte-for-byte reproducible — useful in
//! tests — at the cost of sampling the same witness sequence every run; it
//! changes the practical, not the theoretical, error rate.
//!
//! ## References
//!
//! - Gary L. Miller, "Riemann's Hypothesis and Tests for Primality", 1976.
//! - Michael O. Rabin, "Probabilistic Algorithm for Testing Primality", 1980.

use rug::rand::RandState;
use rug::Integer;

/// Default round count: error probability ≤ 4^−20 ≈ 1 in 10^12.
pub const DEFAULT_ROUNDS: u32 = 20;

/// Outcome of classifying one value. Composite verdicts are certain;
/// ProbablyPrime carries the round count its confidence derives from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Composite,
    ProbablyPrime { rounds: u32 },
}

impl Verdict {
    pub fn is_probably_prime(self) -> bool {
        matches!(self, Verdict::ProbablyPrime { .. })
    }

    /// log2 of the false-positive bound: 4^−k gives −2k. None for composites,
    /// which are proven, not sampled.
    pub fn error_bound_log2(self) -> Option<i64> {
        match self {
            Verdict::Composite => None,
            Verdict::ProbablyPrime { rounds } => Some(-2 * i64::from(rounds)),
        }
    }
}

/// Miller–Rabin tester: round count plus optional witness seed. Cheap to
/// clone and share; `classify` builds its own random state per call, so one
/// tester can serve many rayon workers concurrently.
#[derive(Clone, Debug)]
pub struct MillerRabin {
    rounds: u32,
    seed: Option<u64>,
}

impl MillerRabin {
    /// Tester with OS-entropy witness seeding.
    pub fn new(rounds: u32) -> Self {
        MillerRabin { rounds, seed: None }
    }

    /// Tester with a fixed witness seed for reproducible runs.
    pub fn with_seed(rounds: u32, seed: u64) -> Self {
        MillerRabin {
            rounds,
            seed: Some(seed),
        }
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Classify n. Composite results short-circuit: the first witness that
    /// proves compositeness ends the test without running remaining rounds.
    pub fn classify(&self, n: &Integer) -> Verdict {
        if *n < 2u32 {
            return Verdict::Composite;
        }
        if *n == 2u32 || *n == 3u32 {
            return Verdict::ProbablyPrime {
                rounds: self.rounds,
            };
        }
        if n.is_even() {
            return Verdict::Composite;
        }

        // n − 1 = d · 2^r with d odd; r is the trailing-zero count of n − 1.
        let n_minus_1 = Integer::from(n - 1u32);
        let r = n_minus_1.find_one(0).expect("n > 3, so n - 1 is nonzero");
        let d = Integer::from(&n_minus_1 >> r);

        let mut rng = RandState::new();
        let seed = self.seed.unwrap_or_else(rand::random::<u64>);
        rng.seed(&Integer::from(seed));

        // Witnesses uniform in [2, n−2], i.e. 2 + uniform [0, n−3).
        let span = Integer::from(n - 3u32);
        for _ in 0..self.rounds {
            let a = Integer::from(&span).random_below(&mut rng) + 2u32;
            let mut x = match a.pow_mod(&d, n) {
                Ok(x) => x,
                Err(_) => unreachable!("pow_mod cannot fail for a positive exponent"),
            };
            if x == 1u32 || x == n_minus_1 {
                continue;
            }
            let mut witness_proves_composite = true;
            for _ in 1..r {
                x = x.square() % n;
                if x == n_minus_1 {
                    witness_proves_composite = false;
                    break;
                }
            }
            if witness_proves_composite {
                return Verdict::Composite;
            }
        }
        Verdict::ProbablyPrime {
            rounds: self.rounds,
        }
    }
}

impl Default for MillerRabin {
    fn default() -> Self {
        MillerRabin::new(DEFAULT_ROUNDS)
    }
}
