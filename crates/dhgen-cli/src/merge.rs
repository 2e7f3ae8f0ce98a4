//! Cache merge, stats, proof extraction, and display command.

use dhgen_store::{MergeIndex, PrimeCache, ProofLog};
use dhgen_types::StoreError;
use dhgen_utils::hexdump::hexdump;
use std::path::PathBuf;

pub struct Options {
    pub files: Vec<PathBuf>,
    pub write: Option<PathBuf>,
    pub bits: Option<usize>,
    pub list: bool,
    pub proof: Option<String>,
    pub display: Option<String>,
    pub dump: bool,
    pub wrap: Option<usize>,
    pub in_base: u32,
    pub out_base: u32,
}

pub fn run(opts: Options) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(prefix) = &opts.proof {
        return extract_proofs(&opts, prefix);
    }
    if let Some(prefix) = &opts.display {
        return display_prime(&opts, prefix);
    }
    merge_files(&opts)
}

/// Hunt down a prime's proof rows, recursively including the rows that
/// prove its factors.
fn extract_proofs(opts: &Options, prefix: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = opts.files.first().ok_or("no proofs file given")?;
    let log = ProofLog::new(path);
    let rows = log.chain(prefix, opts.in_base)?;
    if rows.is_empty() {
        println!("{prefix} not found in proofs file.");
        return Ok(());
    }

    let out = opts.write.as_ref().map(ProofLog::new);
    for row in &rows {
        println!(
            "Found {}-bit p {}... {}-bit q {}... {}-bit r {}...",
            row.p.bit_len(),
            head(&row.p.to_str_radix(opts.out_base)?),
            row.q.bit_len(),
            head(&row.q.to_str_radix(opts.out_base)?),
            row.r.bit_len(),
            head(&row.r.to_str_radix(opts.out_base)?)
        );
        if let Some(out) = &out {
            out.append(&row.p, &row.q, &row.r, opts.out_base)?;
        }
    }
    Ok(())
}

/// Show the full digits of a cached prime, optionally wrapped or as a
/// hexdump of its magnitude bytes.
fn display_prime(opts: &Options, prefix: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = opts.files.first().ok_or("no primes file given")?;
    let cache = PrimeCache::new(path);
    match cache.find_prefix(prefix, opts.in_base)? {
        Some((value, _)) => {
            let text = value.to_str_radix(opts.out_base)?;
            println!(
                "{} bits wide, {} characters, base {}:",
                value.bit_len(),
                text.len(),
                opts.out_base
            );
            match opts.wrap {
                Some(width) if width > 0 => {
                    for chunk in text.as_bytes().chunks(width) {
                        println!("{}", std::str::from_utf8(chunk)?);
                    }
                }
                _ => println!("{text}"),
            }
            if opts.dump {
                print!("{}", hexdump(&value.to_bytes_be()));
            }
        }
        None => println!("{prefix} not found."),
    }
    Ok(())
}

/// Load the input files into the dedup index, print stats, and
/// optionally write the merged set back out.
fn merge_files(opts: &Options) -> Result<(), Box<dyn std::error::Error>> {
    if opts.files.is_empty() {
        return Err("no input files given".into());
    }

    let mut index = MergeIndex::new();
    for file in &opts.files {
        match index.load_file(file, opts.in_base, opts.bits) {
            Ok(summary) => println!(
                "{}: {} primes loaded, {} duplicates skipped",
                file.display(),
                summary.inserted,
                summary.duplicates
            ),
            Err(StoreError::FileNotFound(path)) => println!("{path} not found."),
            Err(e) => return Err(e.into()),
        }
    }

    if opts.list {
        for entry in index.iter() {
            let text = entry.value()?.to_str_radix(opts.out_base)?;
            println!("{}\t{}...", entry.bits, head(&text));
        }
    }

    println!("bits\tcount");
    for (bits, count) in index.stats() {
        println!("{bits}\t{count}");
    }

    if let Some(path) = &opts.write {
        let written = index.write_to(path, opts.out_base)?;
        println!("{} primes written to {}", written, path.display());
    }
    Ok(())
}

fn head(text: &str) -> &str {
    &text[..text.len().min(8)]
}
