//! Primitive-root search.
//!
//! A proof-log row p,2,q,r gives the full factorization p - 1 = 2qr, and
//! g is a primitive root of p exactly when g^((p-1)/f) mod p != 1 for
//! every prime factor f of p - 1. Primitive roots are the generators
//! wanted for g^x mod p key exchange: they produce the maximal cyclic
//! group.

use dhgen_bignum::{is_prime_u64, mod_pow_u64, BigUint, EntropySource};
use dhgen_store::ProofLog;
use dhgen_types::GenError;
use std::cmp::Ordering;
use tracing::debug;

/// Primality screening applied to the logged factors before they are
/// trusted as a factorization.
const FACTOR_CERTAINTY: u32 = 27;

/// Outcome of a proof-log root search.
#[derive(Debug)]
pub enum RootSearch {
    /// No row's prime matched the prefix.
    NotFound,
    /// A logged factor of p - 1 failed its primality check, so roots
    /// cannot be proven from this row (typically a composite r).
    CompositeFactor { prime: BigUint, factor: BigUint },
    /// Primitive roots in ascending order; fewer than requested when the
    /// scan reaches p - 1 first.
    Roots { prime: BigUint, roots: Vec<BigUint> },
}

/// Find up to `count` primitive roots of the prime whose leading digits
/// match `prefix` in the proof log, scanning candidates upward from
/// `start`.
pub fn primitive_roots(
    entropy: &mut dyn EntropySource,
    proofs: &ProofLog,
    prefix: &str,
    start: u32,
    count: usize,
    in_base: u32,
) -> Result<RootSearch, GenError> {
    let row = match proofs.find_prefix(prefix, in_base)? {
        Some(row) => row,
        None => return Ok(RootSearch::NotFound),
    };

    let prime = row.p;
    let mut n_minus_1 = prime.clone();
    n_minus_1.sub_scalar(1);
    let factors = [BigUint::from_u32(2), row.q, row.r];

    debug!(bits = prime.bit_len(), "verifying primality of the logged factors");
    for factor in &factors {
        if !factor.is_prime(FACTOR_CERTAINTY, entropy)? {
            return Ok(RootSearch::CompositeFactor {
                prime,
                factor: factor.clone(),
            });
        }
    }

    let mut exponents = Vec::with_capacity(factors.len());
    for factor in &factors {
        exponents.push(n_minus_1.div(factor)?);
    }

    let mut roots = Vec::new();
    let mut g = BigUint::from_u32(start.max(2));
    while roots.len() < count && g.cmp(&n_minus_1) == Ordering::Less {
        let mut primitive = true;
        for exponent in &exponents {
            if g.pow_mod(exponent, &prime)?.cmp_scalar(1) == Ordering::Equal {
                primitive = false;
                break;
            }
        }
        if primitive {
            roots.push(g.clone());
        }
        g.add_scalar(1);
    }
    Ok(RootSearch::Roots { prime, roots })
}

/// Exhaustive generator check for a literal small prime: g is primitive
/// iff the powers g^x mod p do not return to g before x reaches p. Too
/// slow beyond a few million, but independent of any proof log.
pub fn brute_force_roots(prime: u32, start: u32, count: usize) -> Option<Vec<u32>> {
    if !is_prime_u64(prime as u64) {
        return None;
    }
    let p = prime as u64;
    let mut roots = Vec::new();
    let mut base = start.max(2) as u64;
    while base < p && roots.len() < count {
        let mut x = 2u64;
        while x < p {
            if mod_pow_u64(base, x, p) == base {
                break;
            }
            x += 1;
        }
        if x == p {
            roots.push(base as u32);
        }
        base += 1;
    }
    Some(roots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dhgen_bignum::OsEntropy;

    fn big(v: u64) -> BigUint {
        BigUint::from_u64(v)
    }

    #[test]
    fn test_brute_force_known_roots() {
        // The primitive roots of 23 are 5, 7, 10, 11, 14, 15, 17, 19, 20, 21.
        assert_eq!(brute_force_roots(23, 2, 3).unwrap(), vec![5, 7, 10]);
        assert_eq!(brute_force_roots(23, 11, 2).unwrap(), vec![11, 14]);
        assert!(brute_force_roots(21, 2, 1).is_none());
    }

    #[test]
    fn test_roots_from_proof_row() {
        let dir = tempfile::tempdir().unwrap();
        let log = ProofLog::new(dir.path().join("primes.proof"));
        // 31 = 2 * 3 * 5 + 1 with both factors prime.
        log.append(&big(31), &big(3), &big(5), 10).unwrap();

        let mut entropy = OsEntropy;
        match primitive_roots(&mut entropy, &log, "31", 2, 3, 10).unwrap() {
            RootSearch::Roots { prime, roots } => {
                assert_eq!(prime, big(31));
                // The primitive roots of 31 start 3, 11, 12.
                assert_eq!(roots, vec![big(3), big(11), big(12)]);
            }
            other => panic!("expected roots, got {other:?}"),
        }
    }

    #[test]
    fn test_agrees_with_brute_force() {
        let dir = tempfile::tempdir().unwrap();
        let log = ProofLog::new(dir.path().join("primes.proof"));
        // 2339 = 2 * 7 * 167 + 1 with both factors prime.
        log.append(&big(2339), &big(7), &big(167), 10).unwrap();

        let mut entropy = OsEntropy;
        let from_log = match primitive_roots(&mut entropy, &log, "2339", 2, 4, 10).unwrap() {
            RootSearch::Roots { roots, .. } => roots,
            other => panic!("expected roots, got {other:?}"),
        };
        let brute: Vec<_> = brute_force_roots(2339, 2, 4)
            .unwrap()
            .into_iter()
            .map(|r| big(r as u64))
            .collect();
        assert_eq!(from_log, brute);
    }

    #[test]
    fn test_composite_factor_detected() {
        let dir = tempfile::tempdir().unwrap();
        let log = ProofLog::new(dir.path().join("primes.proof"));
        // 91 = 7 * 13 is composite; a row claiming it as q must be refused.
        log.append(&big(4_369_821), &big(91), &big(24_010), 10).unwrap();

        let mut entropy = OsEntropy;
        match primitive_roots(&mut entropy, &log, "4369821", 2, 1, 10).unwrap() {
            RootSearch::CompositeFactor { factor, .. } => assert_eq!(factor, big(91)),
            other => panic!("expected composite factor, got {other:?}"),
        }
    }

    #[test]
    fn test_prefix_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let log = ProofLog::new(dir.path().join("primes.proof"));
        log.append(&big(31), &big(3), &big(5), 10).unwrap();

        let mut entropy = OsEntropy;
        assert!(matches!(
            primitive_roots(&mut entropy, &log, "77", 2, 1, 10).unwrap(),
            RootSearch::NotFound
        ));
    }
}
