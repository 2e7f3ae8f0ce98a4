//! Primality testing.
//!
//! Miller-Rabin rounds with deterministic witness tiers for small widths
//! and random witnesses beyond them. The published witness sets prove:
//!
//!   n < 1,373,653            with {2, 3}
//!   n < 9,080,191            with {31, 73}
//!   n < 4,759,123,141        with {2, 7, 61}
//!   n < 1,122,004,669,633    with {2, 13, 23, 1662803}
//!   n < 2,152,302,898,747    with {2, 3, 5, 7, 11}
//!   n < 3,474,749,660,383    with {2, 3, 5, 7, 11, 13}
//!   n < 341,550,071,728,321  with {2, 3, 5, 7, 11, 13, 17}
//!
//! so certainty 3 proves 32-bit values outright and certainty 7 proves
//! 48-bit values outright.

use crate::bignum::BigUint;
use crate::entropy::EntropySource;
use dhgen_types::BignumError;
use std::cmp::Ordering;

/// Deterministic witness tiers for certainty 1-7. Witness 2 always runs
/// first and is not repeated here.
const WITNESS_TIERS: [&[u32]; 7] = [
    &[3],
    &[31, 73],
    &[7, 61],
    &[13, 23, 1_662_803],
    &[3, 5, 7, 11],
    &[3, 5, 7, 11, 13],
    &[3, 5, 7, 11, 13, 17],
];

/// Largest value the deepest witness tier proves outright.
pub const MAX_PROVABLE_U64: u64 = 341_550_071_728_321;

impl BigUint {
    /// One Miller-Rabin round against `witness`. Self must be odd and
    /// at least 3.
    ///
    /// Decomposes self - 1 = 2^s * d with d odd; the witness passes if
    /// witness^d is 1 or self - 1, or some squaring within s - 1 steps
    /// reaches self - 1. A false return is a proof of compositeness.
    pub fn miller_rabin(&self, witness: &BigUint) -> Result<bool, BignumError> {
        let mut n_minus_1 = self.clone();
        n_minus_1.sub_scalar(1);

        let mut d = n_minus_1.clone();
        let mut s = 0usize;
        while !d.is_odd() {
            d.shift(1);
            s += 1;
        }

        let mut b = witness.pow_mod(&d, self)?;
        if b.cmp_scalar(1) == Ordering::Equal {
            return Ok(true);
        }
        for _ in 0..s.saturating_sub(1) {
            if b == n_minus_1 {
                return Ok(true);
            }
            b = b.mul(&b).mod_reduce(self)?;
        }
        Ok(b == n_minus_1)
    }

    /// Tiered Miller-Rabin primality test.
    ///
    /// Certainty 0 accepts on the witness-2 round alone. Certainty 1-7
    /// runs the matching deterministic tier; anything above 7 adds the
    /// excess as rounds with uniform random witnesses in [2, n-2], which
    /// only apply beyond 48 bits (below that the tier is already a proof).
    /// Any failing round rejects immediately.
    pub fn is_prime(
        &self,
        certainty: u32,
        entropy: &mut dyn EntropySource,
    ) -> Result<bool, BignumError> {
        match self.cmp_scalar(2) {
            Ordering::Less => return Ok(false),
            Ordering::Equal => return Ok(true),
            Ordering::Greater => {}
        }
        if !self.is_odd() {
            return Ok(false);
        }
        if !self.miller_rabin(&BigUint::from_u32(2))? {
            return Ok(false);
        }
        if certainty == 0 {
            return Ok(true);
        }

        let tier = WITNESS_TIERS[certainty.min(7) as usize - 1];
        for &witness in tier {
            if self.cmp_scalar(witness) == Ordering::Greater
                && !self.miller_rabin(&BigUint::from_u32(witness))?
            {
                return Ok(false);
            }
        }

        let mut extra = certainty.saturating_sub(tier.len() as u32 + 1);
        if extra == 0 || self.bit_len() <= 48 {
            return Ok(true);
        }

        let mut bound = self.clone();
        bound.sub_scalar(4);
        while extra > 0 {
            let mut witness = BigUint::random_below(entropy, &bound)?;
            witness.add_scalar(2);
            if !self.miller_rabin(&witness)? {
                return Ok(false);
            }
            extra -= 1;
        }
        Ok(true)
    }
}

/// Native modular exponentiation with 128-bit intermediates.
pub fn mod_pow_u64(base: u64, exponent: u64, modulus: u64) -> u64 {
    let m = modulus as u128;
    let mut result: u128 = 1;
    let mut base = base as u128 % m;
    let mut exp = exponent;
    while exp != 0 {
        if exp & 1 == 1 {
            result = result * base % m;
        }
        exp >>= 1;
        base = base * base % m;
    }
    result as u64
}

/// One native Miller-Rabin round. `n` must be odd and at least 3.
pub fn miller_rabin_u64(witness: u64, n: u64) -> bool {
    let mut d = n - 1;
    let mut s = 0;
    while d & 1 == 0 {
        d >>= 1;
        s += 1;
    }
    let mut b = mod_pow_u64(witness, d, n);
    if b == 1 {
        return true;
    }
    for _ in 0..s - 1 {
        if b == n - 1 {
            return true;
        }
        b = mod_pow_u64(b, 2, n);
    }
    b == n - 1
}

/// Native primality test, deterministic for all 32-bit values via the
/// witnesses 2, 7, and 61.
pub fn is_prime_u64(n: u64) -> bool {
    if n == 2 {
        return true;
    }
    if n <= 1 || n & 1 == 0 {
        return false;
    }
    miller_rabin_u64(2, n) && (n <= 7 || miller_rabin_u64(7, n)) && (n <= 61 || miller_rabin_u64(61, n))
}
