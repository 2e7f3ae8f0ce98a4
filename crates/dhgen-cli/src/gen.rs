//! Constructive generation command.

use dhgen_bignum::EntropySource;
use dhgen_prime::{odd_prime_product, GenOptions, Generator, RFactor};
use dhgen_store::{PrimeCache, ProofLog};
use std::path::PathBuf;

pub struct Options {
    pub bits: usize,
    pub count: usize,
    pub composite_r: bool,
    pub proven_r: bool,
    pub from_cache: bool,
    pub recycle: bool,
    pub in_base: u32,
    pub out_base: u32,
    pub quiet: bool,
    pub primes: PathBuf,
    pub proofs: PathBuf,
}

pub fn run(
    entropy: &mut dyn EntropySource,
    opts: Options,
) -> Result<(), Box<dyn std::error::Error>> {
    if opts.bits < 12 {
        println!("12 bits is the minimum constructible prime width. The");
        println!("probabilistic generator (dhgen rand) produces proven primes");
        println!("up to 48 bits. For primitive roots of small primes, use it");
        println!("together with the exhaustive finder (dhgen roots --literal),");
        println!("which handles primes up to about 10 million.");
        return Ok(());
    }

    let sieve = odd_prime_product();
    let cache = PrimeCache::new(&opts.primes);
    let log = ProofLog::new(&opts.proofs);
    let r_factor = if opts.composite_r {
        RFactor::Composite
    } else if opts.proven_r {
        RFactor::Proven
    } else {
        RFactor::Probable
    };
    let gen_options = GenOptions {
        r_factor,
        from_cache: opts.from_cache || opts.recycle,
        recycle: opts.recycle,
        max_q_restarts: None,
        in_base: opts.in_base,
        out_base: opts.out_base,
    };

    for _ in 0..opts.count {
        let result = Generator::new(&mut *entropy, &sieve, gen_options.clone())
            .with_prime_cache(&cache)
            .with_proof_log(&log)
            .proven_prime(opts.bits)?;

        if !opts.quiet {
            if let Some(triple) = &result.proof {
                let cofactor = if opts.out_base == 2 { "10" } else { "2" };
                println!(
                    "{} bits, {} tries: {},{},{},{}",
                    opts.bits,
                    result.tries,
                    triple.p.to_str_radix(opts.out_base)?,
                    cofactor,
                    triple.q.to_str_radix(opts.out_base)?,
                    triple.r.to_str_radix(opts.out_base)?
                );
            }
        }
        println!("Prime found: {}", result.prime.to_str_radix(opts.out_base)?);
        cache.append(&result.prime, opts.out_base)?;
    }
    Ok(())
}
