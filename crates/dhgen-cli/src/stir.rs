//! Seed-file stirring command.

use dhgen_bignum::SeedFileRng;
use std::io::BufRead;
use std::path::Path;

pub fn run(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Type up to 80 chars of gibberish, Enter when done");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;

    let mut rng = SeedFileRng::open(file);
    rng.stir(line.trim_end().as_bytes());
    rng.persist()?;
    println!("Seed state written to {}", file.display());
    Ok(())
}
