//! Arithmetic operations for BigUint.
//!
//! Schoolbook algorithms throughout: double-width per-limb products with
//! explicit carry propagation, binary long division, and a binary-search
//! integer square root. Clarity is preferred over asymptotic speed.

use crate::bignum::{BigUint, DoubleLimb, Limb, LIMB_BITS};
use dhgen_types::BignumError;
use std::cmp::Ordering;

impl BigUint {
    /// Add: self + other.
    pub fn add(&self, other: &BigUint) -> BigUint {
        let max_len = self.num_limbs().max(other.num_limbs());
        let mut limbs = vec![0 as Limb; max_len + 1];
        let mut carry: DoubleLimb = 0;
        for (i, limb) in limbs.iter_mut().enumerate().take(max_len) {
            let sum = self.limb(i) as DoubleLimb + other.limb(i) as DoubleLimb + carry;
            *limb = sum as Limb;
            carry = sum >> LIMB_BITS;
        }
        limbs[max_len] = carry as Limb;
        BigUint::from_limbs(limbs)
    }

    /// Add a native scalar in place, growing on carry overflow.
    pub fn add_scalar(&mut self, value: Limb) {
        let mut carry = value as DoubleLimb;
        let mut i = 0;
        while carry != 0 {
            if i == self.num_limbs() {
                self.grow(1);
            }
            let sum = self.limbs()[i] as DoubleLimb + carry;
            self.limbs_mut()[i] = sum as Limb;
            carry = sum >> LIMB_BITS;
            i += 1;
        }
    }

    /// Subtract in place: self -= other.
    ///
    /// Callers must guarantee self >= other. When they do not, a borrow
    /// propagating past the most significant limb is silently dropped and
    /// the resulting value is unspecified.
    pub fn sub(&mut self, other: &BigUint) {
        let mut borrow: DoubleLimb = 0;
        let other_limbs = other.num_limbs();
        for i in 0..self.num_limbs() {
            let take = other.limb(i) as DoubleLimb + borrow;
            let have = self.limbs()[i] as DoubleLimb;
            if have >= take {
                self.limbs_mut()[i] = (have - take) as Limb;
                borrow = 0;
                if i + 1 >= other_limbs {
                    break;
                }
            } else {
                self.limbs_mut()[i] = (have + (1 << LIMB_BITS) - take) as Limb;
                borrow = 1;
            }
        }
    }

    /// Subtract a native scalar in place. Same underflow contract as
    /// [`BigUint::sub`].
    pub fn sub_scalar(&mut self, value: Limb) {
        let mut borrow: DoubleLimb = value as DoubleLimb;
        for i in 0..self.num_limbs() {
            if borrow == 0 {
                break;
            }
            let have = self.limbs()[i] as DoubleLimb;
            if have >= borrow {
                self.limbs_mut()[i] = (have - borrow) as Limb;
                borrow = 0;
            } else {
                self.limbs_mut()[i] = (have + (1 << LIMB_BITS) - borrow) as Limb;
                borrow = 1;
            }
        }
    }

    /// Multiply: self * other, into freshly allocated storage.
    ///
    /// The result is always distinct from both operands; the borrow checker
    /// rules out the aliasing the schoolbook inner loop cannot tolerate.
    /// Use [`BigUint::mul_scalar`] for the in-place scalar variant.
    pub fn mul(&self, other: &BigUint) -> BigUint {
        let e1 = self.top_limb_index();
        let e2 = other.top_limb_index();
        let mut limbs = vec![0 as Limb; e1 + e2 + 2];
        for i in 0..=e1 {
            let mut carry: DoubleLimb = 0;
            for (j, &other_limb) in other.limbs().iter().enumerate().take(e2 + 1) {
                let product = self.limbs()[i] as DoubleLimb * other_limb as DoubleLimb
                    + limbs[i + j] as DoubleLimb
                    + carry;
                limbs[i + j] = product as Limb;
                carry = product >> LIMB_BITS;
            }
            limbs[i + e2 + 1] = carry as Limb;
        }
        BigUint::from_limbs(limbs)
    }

    /// Multiply by a native scalar in place, growing on overflow.
    pub fn mul_scalar(&mut self, value: Limb) {
        let mut carry: DoubleLimb = 0;
        for i in 0..self.num_limbs() {
            let product = self.limbs()[i] as DoubleLimb * value as DoubleLimb + carry;
            self.limbs_mut()[i] = product as Limb;
            carry = product >> LIMB_BITS;
        }
        if carry != 0 {
            let top = self.num_limbs();
            self.grow(1);
            self.limbs_mut()[top] = carry as Limb;
        }
    }

    /// Division with remainder via binary long division.
    pub fn div_rem(&self, divisor: &BigUint) -> Result<(BigUint, BigUint), BignumError> {
        if divisor.is_zero() {
            return Err(BignumError::DivisionByZero);
        }
        let bits = self.bit_len();
        let mut quotient = BigUint::from_limbs(vec![0; bits.div_ceil(LIMB_BITS).max(1)]);
        let mut remainder = BigUint::zero();
        for i in (0..bits).rev() {
            remainder.shift(-1);
            if self.bit(i) {
                remainder.limbs_mut()[0] |= 1;
            }
            if remainder.cmp(divisor) != Ordering::Less {
                remainder.sub(divisor);
                quotient.set_bit(i);
            }
        }
        Ok((quotient, remainder))
    }

    /// Quotient of self / divisor.
    pub fn div(&self, divisor: &BigUint) -> Result<BigUint, BignumError> {
        Ok(self.div_rem(divisor)?.0)
    }

    /// Modular reduction: self mod modulus.
    pub fn mod_reduce(&self, modulus: &BigUint) -> Result<BigUint, BignumError> {
        Ok(self.div_rem(modulus)?.1)
    }

    /// Divide by a native scalar in place, using a double-width running
    /// remainder per limb.
    pub fn div_scalar(&mut self, value: Limb) -> Result<(), BignumError> {
        if value == 0 {
            return Err(BignumError::DivisionByZero);
        }
        let mut rem: DoubleLimb = 0;
        for i in (0..self.num_limbs()).rev() {
            let dividend = (rem << LIMB_BITS) | self.limbs()[i] as DoubleLimb;
            self.limbs_mut()[i] = (dividend / value as DoubleLimb) as Limb;
            rem = dividend % value as DoubleLimb;
        }
        Ok(())
    }

    /// Remainder of self mod a native scalar.
    pub fn rem_scalar(&self, value: Limb) -> Result<Limb, BignumError> {
        if value == 0 {
            return Err(BignumError::DivisionByZero);
        }
        let mut rem: DoubleLimb = 0;
        for i in (0..self.num_limbs()).rev() {
            let dividend = (rem << LIMB_BITS) | self.limbs()[i] as DoubleLimb;
            rem = dividend % value as DoubleLimb;
        }
        Ok(rem as Limb)
    }

    /// Signed shift: negative values shift left (extending storage as the
    /// new high bits require), positive values shift right (storage is not
    /// reclaimed). Arbitrarily large magnitudes are supported.
    pub fn shift(&mut self, shift: i32) {
        if shift > 0 {
            let offset = shift as usize / LIMB_BITS;
            let bits = shift as usize % LIMB_BITS;
            let len = self.num_limbs();
            for i in 0..len {
                let low = if i + offset < len {
                    self.limbs()[i + offset] >> bits
                } else {
                    0
                };
                let high = if bits > 0 && i + offset + 1 < len {
                    self.limbs()[i + offset + 1] << (LIMB_BITS - bits)
                } else {
                    0
                };
                self.limbs_mut()[i] = high | low;
            }
        } else if shift < 0 {
            if self.is_zero() {
                return;
            }
            let shift = shift.unsigned_abs() as usize;
            let offset = shift / LIMB_BITS;
            let bits = shift % LIMB_BITS;
            let needed = (self.bit_len() + shift).div_ceil(LIMB_BITS);
            self.ensure_limbs(needed);
            for i in (0..self.num_limbs()).rev() {
                let high = if i >= offset {
                    self.limbs()[i - offset] << bits
                } else {
                    0
                };
                let low = if bits > 0 && i >= offset + 1 {
                    self.limbs()[i - offset - 1] >> (LIMB_BITS - bits)
                } else {
                    0
                };
                self.limbs_mut()[i] = high | low;
            }
        }
    }

    /// Plain exponentiation: self ^ exp.
    ///
    /// Large exponents grow the result without bound; use
    /// [`BigUint::pow_mod`] when a modulus applies.
    pub fn pow(&self, exp: &BigUint) -> BigUint {
        let mut result = BigUint::from_u32(1);
        let mut base = self.clone();
        let mut exp = exp.clone();
        while !exp.is_zero() {
            if exp.is_odd() {
                result = result.mul(&base);
            }
            exp.shift(1);
            if exp.is_zero() {
                break;
            }
            base = base.mul(&base);
        }
        result
    }

    /// Modular exponentiation: self ^ exp mod modulus.
    ///
    /// Binary square-and-multiply over the exponent bits, least significant
    /// first, reducing after every multiply to bound operand growth.
    pub fn pow_mod(&self, exp: &BigUint, modulus: &BigUint) -> Result<BigUint, BignumError> {
        if modulus.is_zero() {
            return Err(BignumError::DivisionByZero);
        }
        let mut result = BigUint::from_u32(1);
        let mut base = self.mod_reduce(modulus)?;
        let mut exp = exp.clone();
        while !exp.is_zero() {
            if exp.is_odd() {
                result = result.mul(&base).mod_reduce(modulus)?;
            }
            exp.shift(1);
            if exp.is_zero() {
                break;
            }
            base = base.mul(&base).mod_reduce(modulus)?;
        }
        Ok(result)
    }

    /// Integer square root by binary search.
    ///
    /// The bracket starts from bit-width-derived bounds and is narrowed by
    /// midpoint squaring until it collapses or the square matches exactly.
    pub fn sqrt(&self) -> BigUint {
        let width = self.bit_len();
        if width <= 1 {
            return self.clone();
        }
        let mut max = self.clone();
        let mut min = BigUint::zero();
        if width > 3 {
            max.shift((width / 2 - 1) as i32);
            min = self.clone();
            min.shift((width / 2 + 1) as i32);
        }

        let mut result = min.add(&max);
        result.shift(1);
        let mut product = result.mul(&result);
        let mut limit = min.clone();
        limit.add_scalar(1);

        while limit.cmp(&max) == Ordering::Less {
            let cmp = product.cmp(self);
            if cmp == Ordering::Equal {
                break;
            }
            if cmp == Ordering::Less {
                min.assign(&result);
                limit.assign(&min);
                limit.add_scalar(1);
            } else {
                max.assign(&result);
            }
            result = min.add(&max);
            result.shift(1);
            product = result.mul(&result);
        }
        result
    }
}
