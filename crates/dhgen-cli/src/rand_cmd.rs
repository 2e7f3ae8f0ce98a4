//! Probabilistic generation command.

use dhgen_bignum::EntropySource;
use dhgen_prime::{default_certainty, probable_prime};
use dhgen_store::PrimeCache;
use std::path::PathBuf;

pub fn run(
    entropy: &mut dyn EntropySource,
    bits: usize,
    count: usize,
    certainty: Option<u32>,
    out_base: u32,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let bits = bits.max(2);
    let certainty = certainty.unwrap_or_else(|| default_certainty(bits));
    let cache = output.map(PrimeCache::new);

    for _ in 0..count {
        let prime = probable_prime(entropy, bits, certainty)?;
        println!("{}", prime.to_str_radix(out_base)?);
        if let Some(cache) = &cache {
            cache.append(&prime, out_base)?;
        }
    }
    Ok(())
}
