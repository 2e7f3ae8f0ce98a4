//! Sequential prime scanning.

use dhgen_bignum::{BigUint, EntropySource};
use dhgen_types::BignumError;
use std::cmp::Ordering;

/// Certainty for sequential scanning; far beyond the deterministic tiers
/// for small values.
const SCAN_CERTAINTY: u32 = 57;

/// Collect the next `count` primes at or above `start`, scanning odd
/// values in ascending order. A start below 3 yields 2 first.
pub fn sequential_primes(
    entropy: &mut dyn EntropySource,
    start: &BigUint,
    count: usize,
) -> Result<Vec<BigUint>, BignumError> {
    let mut results = Vec::with_capacity(count);
    let mut n = start.clone();

    if n.cmp_scalar(3) == Ordering::Less {
        if count > 0 {
            results.push(BigUint::from_u32(2));
        }
        n.set(3);
    }

    // All remaining primes are odd.
    n.set_bit(0);
    while results.len() < count {
        if n.is_prime(SCAN_CERTAINTY, entropy)? {
            results.push(n.clone());
        }
        n.add_scalar(2);
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dhgen_bignum::OsEntropy;

    fn small(v: u64) -> BigUint {
        BigUint::from_u64(v)
    }

    #[test]
    fn test_first_primes() {
        let mut entropy = OsEntropy;
        let primes = sequential_primes(&mut entropy, &small(2), 10).unwrap();
        let expected: Vec<_> = [2u64, 3, 5, 7, 11, 13, 17, 19, 23, 29]
            .iter()
            .map(|&v| small(v))
            .collect();
        assert_eq!(primes, expected);
    }

    #[test]
    fn test_next_prime_after_even_start() {
        let mut entropy = OsEntropy;
        let primes = sequential_primes(&mut entropy, &small(90), 2).unwrap();
        assert_eq!(primes, vec![small(97), small(101)]);
    }

    #[test]
    fn test_start_included_when_prime() {
        let mut entropy = OsEntropy;
        let primes = sequential_primes(&mut entropy, &small(97), 1).unwrap();
        assert_eq!(primes, vec![small(97)]);
    }

    #[test]
    fn test_large_start() {
        let mut entropy = OsEntropy;
        let primes = sequential_primes(&mut entropy, &small(999_988_889_999), 1).unwrap();
        assert_eq!(primes.len(), 1);
        assert!(primes[0].cmp(&small(999_988_889_999)) != Ordering::Less);
        assert!(primes[0].is_prime(7, &mut entropy).unwrap());
    }
}
