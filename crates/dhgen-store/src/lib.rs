#![forbid(unsafe_code)]
#![doc = "File-backed prime cache, proof log, and merge index for dhgen."]

mod base;
pub mod cache;
pub mod index;
pub mod proof;

pub use base::detect_base;
pub use cache::{CacheScan, PrimeCache};
pub use index::{CachedPrime, LoadSummary, MergeIndex, MergeOutcome};
pub use proof::{ProofLog, ProofRow};
