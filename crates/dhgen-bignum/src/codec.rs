//! Text conversion for BigUint in any base from 2 to 16.

use crate::bignum::BigUint;
use dhgen_types::BignumError;

const BASE_CHARS: &[u8; 16] = b"0123456789ABCDEF";

impl BigUint {
    /// Parse a string in the given base (2-16), case-insensitively.
    ///
    /// Characters outside the active digit alphabet are ignored, so commas,
    /// whitespace, and line terminators can pass through unfiltered. A
    /// string with no usable digits parses to 0.
    pub fn from_str_radix(text: &str, base: u32) -> Result<BigUint, BignumError> {
        if !(2..=16).contains(&base) {
            return Err(BignumError::InvalidBase(base));
        }
        let mut result = BigUint::zero();
        for c in text.chars() {
            let upper = c.to_ascii_uppercase();
            if let Some(digit) = BASE_CHARS.iter().position(|&d| d as char == upper) {
                if (digit as u32) < base {
                    result.mul_scalar(base);
                    result.add_scalar(digit as u32);
                }
            }
        }
        Ok(result)
    }

    /// Render in the given base (2-16) with no leading zeros; value 0
    /// renders as "0". Hex digits are uppercase.
    pub fn to_str_radix(&self, base: u32) -> Result<String, BignumError> {
        if !(2..=16).contains(&base) {
            return Err(BignumError::InvalidBase(base));
        }
        if self.is_zero() {
            return Ok("0".to_string());
        }
        let mut digits = Vec::new();
        let mut num = self.clone();
        while !num.is_zero() {
            let digit = num.rem_scalar(base)?;
            digits.push(BASE_CHARS[digit as usize]);
            num.div_scalar(base)?;
        }
        digits.reverse();
        Ok(String::from_utf8(digits).unwrap_or_default())
    }
}

impl std::fmt::Display for BigUint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_str_radix(10) {
            Ok(s) => f.write_str(&s),
            Err(_) => Err(std::fmt::Error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_all_bases() {
        let values = [0u64, 1, 2, 255, 4096, 0xDEAD_BEEF, u64::MAX >> 4];
        for base in 2..=16 {
            for &v in &values {
                let n = BigUint::from_u64(v);
                let text = n.to_str_radix(base).unwrap();
                let back = BigUint::from_str_radix(&text, base).unwrap();
                assert_eq!(back, n, "value {v} base {base} via {text}");
            }
        }
    }

    #[test]
    fn test_base12_to_binary() {
        let n = BigUint::from_str_radix("B9A838B0987", 12).unwrap();
        assert_eq!(
            n.to_str_radix(2).unwrap(),
            "1010101001110110001001101001000001110111"
        );
    }

    #[test]
    fn test_junk_characters_ignored() {
        let clean = BigUint::from_str_radix("123456", 10).unwrap();
        let noisy = BigUint::from_str_radix(" 12,34\t5-6\n", 10).unwrap();
        assert_eq!(clean, noisy);

        // Hex letters are not digits in base 10 and fall through.
        let filtered = BigUint::from_str_radix("1F2", 10).unwrap();
        assert_eq!(filtered, BigUint::from_u32(12));
    }

    #[test]
    fn test_case_insensitive_hex() {
        let lower = BigUint::from_str_radix("deadbeef", 16).unwrap();
        let upper = BigUint::from_str_radix("DEADBEEF", 16).unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower.to_str_radix(16).unwrap(), "DEADBEEF");
    }

    #[test]
    fn test_zero_and_empty() {
        assert_eq!(BigUint::zero().to_str_radix(10).unwrap(), "0");
        assert!(BigUint::from_str_radix("", 10).unwrap().is_zero());
        assert!(BigUint::from_str_radix("xyz", 10).unwrap().is_zero());
    }

    #[test]
    fn test_invalid_base() {
        assert!(BigUint::from_str_radix("1", 1).is_err());
        assert!(BigUint::from_str_radix("1", 17).is_err());
        assert!(BigUint::from_u32(1).to_str_radix(0).is_err());
    }

    #[test]
    fn test_display_is_decimal() {
        assert_eq!(format!("{}", BigUint::from_u64(1_234_567_890_123)), "1234567890123");
    }
}
