//! Primitive-root search command.

use dhgen_bignum::EntropySource;
use dhgen_prime::{brute_force_roots, primitive_roots, RootSearch};
use dhgen_store::ProofLog;
use std::path::Path;

pub fn run(
    entropy: &mut dyn EntropySource,
    prefix: &str,
    proofs: &Path,
    count: usize,
    start: u32,
    literal: bool,
    in_base: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    if literal {
        let value: u32 = prefix.parse().unwrap_or(0);
        match brute_force_roots(value, start, count) {
            Some(roots) => {
                let rendered: Vec<String> = roots.iter().map(|r| r.to_string()).collect();
                println!("{}", rendered.join(" "));
            }
            None => println!("{value} does not appear to be prime."),
        }
        return Ok(());
    }

    let log = ProofLog::new(proofs);
    match primitive_roots(entropy, &log, prefix, start, count, in_base)? {
        RootSearch::NotFound => println!("{prefix} not found in proofs file."),
        RootSearch::CompositeFactor { prime, factor } => {
            println!("Skipping {prime}, {factor} is composite.");
        }
        RootSearch::Roots { prime, roots } => {
            println!(
                "Primitive roots >= {} of the {}-bit prime:",
                start,
                prime.bit_len()
            );
            println!("{prime}");
            println!("Root g is primitive if g ^ ((p-1)/f) mod p <> 1 for all factors f of p-1");
            let rendered: Vec<String> = roots.iter().map(|r| r.to_string()).collect();
            println!("{}", rendered.join(" "));
        }
    }
    Ok(())
}
