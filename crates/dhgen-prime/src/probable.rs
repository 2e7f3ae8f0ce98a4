//! Probabilistic prime generation.

use dhgen_bignum::{BigUint, EntropySource};
use dhgen_types::BignumError;

/// Draw random odd candidates of exactly `bits` bits (top bit forced)
/// until one passes `certainty` rounds of testing. `bits` must be at
/// least 2.
pub fn probable_prime(
    entropy: &mut dyn EntropySource,
    bits: usize,
    certainty: u32,
) -> Result<BigUint, BignumError> {
    loop {
        let mut candidate = BigUint::random_bits(entropy, bits)?;
        candidate.set_bit(0);
        candidate.set_bit(bits - 1);
        if candidate.is_prime(certainty, entropy)? {
            return Ok(candidate);
        }
    }
}

/// Default certainty for a target width: 7 proves up to 48 bits outright;
/// wider targets add 50 random-witness rounds.
pub fn default_certainty(bits: usize) -> u32 {
    if bits > 48 {
        57
    } else {
        7
    }
}
