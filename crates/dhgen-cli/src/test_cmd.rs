//! Primality test command.

use dhgen_bignum::{BigUint, EntropySource};
use dhgen_prime::odd_prime_product;
use dhgen_store::detect_base;
use std::cmp::Ordering;

pub fn run(
    entropy: &mut dyn EntropySource,
    value: &str,
    in_base: u32,
    out_base: u32,
    certainty: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let in_base = detect_base(value, in_base);
    let n = BigUint::from_str_radix(value, in_base)?;
    println!("Testing {}", n.to_str_radix(out_base)?);

    match n.cmp_scalar(2) {
        Ordering::Less => println!("Number is not prime because it's {n}"),
        Ordering::Equal => println!("Number is prime."),
        Ordering::Greater if !n.is_odd() => println!("Number is not prime because it's even"),
        _ => {
            let sieve = odd_prime_product();
            let (divisor, coprime) = sieve.gcd(&n);
            if n.cmp_scalar(997) == Ordering::Greater && !coprime && divisor != n {
                println!(
                    "Number is not prime with divisor of {}",
                    divisor.to_str_radix(out_base)?
                );
            } else if n.is_prime(certainty, entropy)? {
                if n.bit_len() <= 48 {
                    println!("Number is prime; small enough for a Miller-Rabin proof.");
                } else {
                    println!("Number appears to be prime.");
                }
            } else {
                println!("Number is not prime; deemed composite by Miller-Rabin.");
            }
        }
    }
    Ok(())
}
