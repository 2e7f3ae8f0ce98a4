//! Greatest common divisor.

use crate::bignum::BigUint;
use std::cmp::Ordering;

impl BigUint {
    /// Binary GCD.
    ///
    /// Extracts the common power of two, strips remaining factors of two
    /// from each operand, then subtract-and-reduces the larger from the
    /// smaller until the operands meet. Returns the GCD together with a
    /// flag reporting whether it is exactly 1; the flag is what the
    /// trial-division pre-filter consumes. A zero operand yields the other
    /// operand with the flag false.
    pub fn gcd(&self, other: &BigUint) -> (BigUint, bool) {
        if self.is_zero() {
            return (other.clone(), false);
        }
        if other.is_zero() {
            return (self.clone(), false);
        }

        let shift = self.trailing_zeros().min(other.trailing_zeros());
        let mut x = self.clone();
        x.shift(x.trailing_zeros() as i32);
        let mut y = other.clone();
        y.shift(y.trailing_zeros() as i32);

        loop {
            match x.cmp(&y) {
                Ordering::Equal => break,
                Ordering::Greater => std::mem::swap(&mut x, &mut y),
                Ordering::Less => {}
            }
            if x.cmp_scalar(1) == Ordering::Equal {
                break;
            }
            y.sub(&x);
            y.shift(y.trailing_zeros() as i32);
        }

        let is_one = shift == 0 && x.cmp_scalar(1) == Ordering::Equal;
        x.shift(-(shift as i32));
        (x, is_one)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: u64) -> BigUint {
        BigUint::from_u64(v)
    }

    #[test]
    fn test_known_gcd() {
        let (g, one) = big(9).gcd(&big(15));
        assert_eq!(g, big(3));
        assert!(!one);
    }

    #[test]
    fn test_gcd_divides_both() {
        for (a, b) in [(12u64, 8u64), (270, 192), (1 << 20, 48), (97 * 89, 89 * 3)] {
            let (g, _) = big(a).gcd(&big(b));
            assert!(big(a).mod_reduce(&g).unwrap().is_zero(), "gcd({a},{b}) | {a}");
            assert!(big(b).mod_reduce(&g).unwrap().is_zero(), "gcd({a},{b}) | {b}");
        }
    }

    #[test]
    fn test_coprime_flag() {
        let (g, one) = big(17).gcd(&big(13));
        assert_eq!(g, big(1));
        assert!(one);

        let (g, one) = big(1 << 8).gcd(&big(3));
        assert_eq!(g, big(1));
        assert!(one);
    }

    #[test]
    fn test_zero_inputs() {
        let (g, one) = BigUint::zero().gcd(&big(42));
        assert_eq!(g, big(42));
        assert!(!one);

        let (g, one) = big(42).gcd(&BigUint::zero());
        assert_eq!(g, big(42));
        assert!(!one);
    }

    #[test]
    fn test_power_of_two_factor() {
        let (g, one) = big(96).gcd(&big(160));
        assert_eq!(g, big(32));
        assert!(!one);
    }
}
