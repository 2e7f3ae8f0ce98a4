//! Sequential prime generation command.

use dhgen_bignum::{BigUint, EntropySource};
use dhgen_prime::sequential_primes;
use dhgen_store::detect_base;

pub fn run(
    entropy: &mut dyn EntropySource,
    start: &str,
    count: usize,
    in_base: u32,
    out_base: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let in_base = detect_base(start, in_base);
    let start = BigUint::from_str_radix(start, in_base)?;
    for prime in sequential_primes(entropy, &start, count)? {
        println!("{}", prime.to_str_radix(out_base)?);
    }
    Ok(())
}
