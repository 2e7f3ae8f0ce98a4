//! Product of the odd primes below 1000.

use dhgen_bignum::{is_prime_u64, BigUint};

/// Build 3 * 5 * 7 * ... * 997 as a single value.
///
/// Computed once per process and shared read-only across constructor
/// invocations; one GCD against it trial-divides a candidate by every
/// odd prime below 1000 at once.
pub fn odd_prime_product() -> BigUint {
    let mut product = BigUint::from_u32(3);
    let mut n = 5u64;
    while n < 1000 {
        if is_prime_u64(n) {
            product.mul_scalar(n as u32);
        }
        n += 2;
    }
    product
}
