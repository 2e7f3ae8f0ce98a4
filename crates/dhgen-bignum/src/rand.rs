//! Random big-number generation.

use crate::bignum::{BigUint, LIMB_BITS};
use crate::entropy::EntropySource;
use dhgen_types::BignumError;
use std::cmp::Ordering;

impl BigUint {
    /// Draw a random value of at most `bits` bits (the high bit is not
    /// guaranteed to be set).
    pub fn random_bits(
        entropy: &mut dyn EntropySource,
        bits: usize,
    ) -> Result<BigUint, BignumError> {
        let limbs = bits.div_ceil(LIMB_BITS).max(1);
        let mut value = BigUint::from_limbs(vec![0; limbs]);
        entropy.fill_bits(value.limbs_mut(), bits)?;
        Ok(value)
    }

    /// Draw a uniformly distributed value in [0, bound).
    ///
    /// Oversamples at twice the bound's width plus one bit, then rejects
    /// draws above the largest multiple-of-bound cutoff before reducing.
    /// The rejection step is what keeps the modulo reduction unbiased;
    /// without it the low residues would be over-represented.
    pub fn random_below(
        entropy: &mut dyn EntropySource,
        bound: &BigUint,
    ) -> Result<BigUint, BignumError> {
        if bound.cmp_scalar(2) == Ordering::Less {
            return Ok(BigUint::zero());
        }

        let bits = (bound.bit_len() << 1) + 1;
        // cutoff = (2^bits - 1) - ((2^bits - 1) mod bound) - 1
        let mut cutoff = BigUint::with_bits(LIMB_BITS, 1);
        cutoff.shift(-(bits as i32));
        cutoff.sub_scalar(1);
        let tail = cutoff.mod_reduce(bound)?;
        cutoff.sub(&tail);
        cutoff.sub_scalar(1);

        loop {
            let draw = BigUint::random_bits(entropy, bits)?;
            if draw.cmp(&cutoff) != Ordering::Greater {
                return draw.mod_reduce(bound);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::OsEntropy;

    #[test]
    fn test_random_bits_width() {
        let mut entropy = OsEntropy;
        for bits in [1usize, 7, 31, 32, 33, 129] {
            let r = BigUint::random_bits(&mut entropy, bits).unwrap();
            assert!(r.bit_len() <= bits, "{bits}-bit draw too wide");
        }
    }

    #[test]
    fn test_random_below_in_range() {
        let mut entropy = OsEntropy;
        let bound = BigUint::from_u32(1000);
        for _ in 0..200 {
            let r = BigUint::random_below(&mut entropy, &bound).unwrap();
            assert_eq!(r.cmp(&bound), Ordering::Less);
        }
    }

    #[test]
    fn test_random_below_small_bound() {
        let mut entropy = OsEntropy;
        assert!(BigUint::random_below(&mut entropy, &BigUint::zero())
            .unwrap()
            .is_zero());
        assert!(BigUint::random_below(&mut entropy, &BigUint::from_u32(1))
            .unwrap()
            .is_zero());
    }

    #[test]
    fn test_random_below_covers_range() {
        // With bound 2 every draw is a coin flip; both faces should appear.
        let mut entropy = OsEntropy;
        let bound = BigUint::from_u32(2);
        let mut seen = [false, false];
        for _ in 0..64 {
            let r = BigUint::random_below(&mut entropy, &bound).unwrap();
            seen[if r.is_zero() { 0 } else { 1 }] = true;
        }
        assert!(seen[0] && seen[1]);
    }
}
