use clap::{Parser, Subcommand};
use dhgen_bignum::{EntropySource, OsEntropy, SeedFileRng};
use std::path::PathBuf;

mod gen;
mod merge;
mod rand_cmd;
mod roots;
mod seq;
mod stir;
mod test_cmd;

/// dhgen command-line tool for constructing and managing provable primes.
#[derive(Parser)]
#[command(name = "dhgen")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Draw randomness from a persisted seed-file stream instead of the
    /// OS random device. The stream state is rewritten on exit.
    #[arg(long, global = true)]
    seed_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Construct proven primes of the form p = 2qr + 1.
    Gen {
        /// Target width in bits (64, 80, 128, 256, ...).
        #[arg(short, long)]
        bits: usize,
        /// Generate this many primes.
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
        /// Allow the r cofactor of the generated prime to be composite.
        #[arg(short = 'm', long)]
        composite_r: bool,
        /// Construct r recursively as a proven prime instead of random
        /// draws plus Miller-Rabin.
        #[arg(short = 'u', long, conflicts_with = "composite_r")]
        proven_r: bool,
        /// Source r candidates from the primes file.
        #[arg(short = 'f', long)]
        from_cache: bool,
        /// Reset q and rescan when the primes file is exhausted
        /// (implies --from-cache).
        #[arg(short = 'z', long)]
        recycle: bool,
        /// Number base for reading the primes file.
        #[arg(short = 'i', long, default_value = "10")]
        in_base: u32,
        /// Number base for output, including to files.
        #[arg(short = 'o', long, default_value = "10")]
        out_base: u32,
        /// Less screen output.
        #[arg(short, long)]
        quiet: bool,
        /// Primes cache file.
        #[arg(long, default_value = "./primes")]
        primes: PathBuf,
        /// Proof log file.
        #[arg(long, default_value = "./primes.proof")]
        proofs: PathBuf,
    },
    /// Generate random primes probabilistically.
    Rand {
        /// Target width in bits.
        #[arg(short, long)]
        bits: usize,
        /// Generate this many primes.
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
        /// Override the number of tests performed.
        #[arg(short, long)]
        certainty: Option<u32>,
        /// Number base for output, including to the file.
        #[arg(short = 'o', long, default_value = "10")]
        out_base: u32,
        /// Also append results to this file.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Test a literal value for primality.
    Test {
        /// The value to test (hex digits switch a base-10 input to 16).
        value: String,
        /// Number base for input.
        #[arg(short = 'i', long, default_value = "10")]
        in_base: u32,
        /// Number base for output.
        #[arg(short = 'o', long, default_value = "10")]
        out_base: u32,
        /// Override the number of tests performed.
        #[arg(short, long, default_value = "57")]
        certainty: u32,
    },
    /// Generate sequential primes from a starting value.
    Seq {
        /// Starting value.
        start: String,
        /// Generate this many primes.
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
        /// Number base of the starting value.
        #[arg(short = 'i', long, default_value = "10")]
        in_base: u32,
        /// Number base for output.
        #[arg(short = 'o', long, default_value = "10")]
        out_base: u32,
    },
    /// Merge prime cache files, discard duplicates, and show stats.
    Merge {
        /// Input files (cache files; the proof log for --proof).
        files: Vec<PathBuf>,
        /// Write merged primes here (stats only when omitted).
        #[arg(short = 'w', long)]
        write: Option<PathBuf>,
        /// Load only primes of this width.
        #[arg(short, long)]
        bits: Option<usize>,
        /// List the first digits of every loaded prime.
        #[arg(short, long)]
        list: bool,
        /// Extract proof rows for the prime beginning with this prefix.
        #[arg(short, long)]
        proof: Option<String>,
        /// Display the full prime beginning with this prefix.
        #[arg(short, long)]
        display: Option<String>,
        /// Hexdump the displayed prime's magnitude bytes.
        #[arg(long, requires = "display")]
        dump: bool,
        /// Break displayed digits at this width.
        #[arg(short = 's', long)]
        wrap: Option<usize>,
        /// Number base for input files.
        #[arg(short = 'i', long, default_value = "10")]
        in_base: u32,
        /// Number base for output.
        #[arg(short = 'o', long, default_value = "10")]
        out_base: u32,
    },
    /// Find primitive roots using a proof log.
    Roots {
        /// Digits the target prime begins with, or a literal prime
        /// with --literal.
        prefix: String,
        /// Proof log file.
        #[arg(long, default_value = "./primes.proof")]
        proofs: PathBuf,
        /// Compute this many roots.
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
        /// Skip testing roots below this value.
        #[arg(short, long, default_value = "2")]
        start: u32,
        /// No proof log; find roots of a literal small prime by
        /// exhaustive search.
        #[arg(short = 'c', long)]
        literal: bool,
        /// Number base for the proof log.
        #[arg(short = 'i', long, default_value = "10")]
        in_base: u32,
    },
    /// Stir keyboard entropy into a seed file.
    Stir {
        /// Seed file to perturb.
        #[arg(default_value = "./dhgen.seed")]
        file: PathBuf,
    },
}

enum Entropy {
    Os(OsEntropy),
    Seeded(SeedFileRng),
}

/// Clamp a user-supplied base into the supported 2-16 range.
pub(crate) fn clamp_base(base: u32) -> u32 {
    base.clamp(2, 16)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut entropy = match &cli.seed_file {
        Some(path) => Entropy::Seeded(SeedFileRng::open(path)),
        None => Entropy::Os(OsEntropy),
    };
    let source: &mut dyn EntropySource = match &mut entropy {
        Entropy::Os(os) => os,
        Entropy::Seeded(seeded) => seeded,
    };

    let result = match cli.command {
        Commands::Gen {
            bits,
            count,
            composite_r,
            proven_r,
            from_cache,
            recycle,
            in_base,
            out_base,
            quiet,
            primes,
            proofs,
        } => gen::run(
            source,
            gen::Options {
                bits,
                count,
                composite_r,
                proven_r,
                from_cache,
                recycle,
                in_base: clamp_base(in_base),
                out_base: clamp_base(out_base),
                quiet,
                primes,
                proofs,
            },
        ),
        Commands::Rand {
            bits,
            count,
            certainty,
            out_base,
            output,
        } => rand_cmd::run(source, bits, count, certainty, clamp_base(out_base), output),
        Commands::Test {
            value,
            in_base,
            out_base,
            certainty,
        } => test_cmd::run(source, &value, clamp_base(in_base), clamp_base(out_base), certainty),
        Commands::Seq {
            start,
            count,
            in_base,
            out_base,
        } => seq::run(source, &start, count, clamp_base(in_base), clamp_base(out_base)),
        Commands::Merge {
            files,
            write,
            bits,
            list,
            proof,
            display,
            dump,
            wrap,
            in_base,
            out_base,
        } => merge::run(merge::Options {
            files,
            write,
            bits,
            list,
            proof,
            display,
            dump,
            wrap,
            in_base: clamp_base(in_base),
            out_base: clamp_base(out_base),
        }),
        Commands::Roots {
            prefix,
            proofs,
            count,
            start,
            literal,
            in_base,
        } => roots::run(source, &prefix, &proofs, count, start, literal, clamp_base(in_base)),
        Commands::Stir { file } => stir::run(&file),
    };

    if let Entropy::Seeded(seeded) = &mut entropy {
        if let Err(e) = seeded.persist() {
            eprintln!("Error: could not rewrite seed file: {e}");
        }
    }

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
