pub mod certificate;
pub mod miller_rabin;
pub mod progress;
pub mod qn;
pub mod report;
pub mod scan;
pub mod verify;

use rug::Integer;

/// Sink for probable-prime findings, invoked in scan order. Implementations
/// own all formatting and I/O (CSV log, certificate files); the scan itself
/// only hands over [`scan::Finding`] records.
pub trait FindingSink: Send + Sync {
    fn record(&self, finding: &scan::Finding) -> anyhow::Result<()>;
}

/// The first 64 primes, checked by the trial-division pre-filter.
const SMALL_PRIMES: [u32; 64] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283, 293, 307,
    311,
];

/// Trial-division pre-filter. True means n has a table prime as a proper
/// factor and is certainly composite; false passes n on to the full
/// Miller-Rabin test. A value equal to a table prime is prime, not composite.
pub fn has_small_factor(n: &Integer) -> bool {
    SMALL_PRIMES.iter().any(|&p| n.is_divisible_u(p) && *n != p)
}

/// Exact decimal digit count. Materializes the full decimal string, which is
/// what findings report anyway; use [`qn::expected_digits`] to budget before
/// a value exists.
pub fn exact_digits(n: &Integer) -> u64 {
    n.to_string_radix(10).len() as u64
}
