//! Append-only prime cache: newline-delimited magnitudes in a text file.

use crate::base::detect_base;
use dhgen_bignum::BigUint;
use dhgen_types::StoreError;
use std::cmp::Ordering;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// A prime cache file. Lines are appended, never rewritten in place.
pub struct PrimeCache {
    path: PathBuf,
}

impl PrimeCache {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one value rendered in `base`.
    pub fn append(&self, value: &BigUint, base: u32) -> Result<(), StoreError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", value.to_str_radix(base)?)?;
        Ok(())
    }

    /// Open a sequential scan over the cached values.
    pub fn scan(&self, in_base: u32) -> Result<CacheScan, StoreError> {
        Ok(CacheScan {
            reader: BufReader::new(open_existing(&self.path)?),
            base: in_base,
        })
    }

    /// Find the first cached value whose leading digits match `prefix`
    /// case-insensitively. Returns the value and the base it was stored in.
    pub fn find_prefix(
        &self,
        prefix: &str,
        in_base: u32,
    ) -> Result<Option<(BigUint, u32)>, StoreError> {
        let reader = BufReader::new(open_existing(&self.path)?);
        for line in reader.lines() {
            let line = line?;
            let token = line.trim();
            if token.len() >= prefix.len() && token[..prefix.len()].eq_ignore_ascii_case(prefix) {
                let base = detect_base(token, in_base);
                return Ok(Some((BigUint::from_str_radix(token, base)?, base)));
            }
        }
        Ok(None)
    }
}

fn open_existing(path: &Path) -> Result<File, StoreError> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            StoreError::FileNotFound(path.display().to_string())
        } else {
            StoreError::Io(e)
        }
    })
}

/// Sequential reader over a prime cache, consuming lines as it goes.
#[derive(Debug)]
pub struct CacheScan {
    reader: BufReader<File>,
    base: u32,
}

impl CacheScan {
    /// Return the next cached value in [low, 2*low], skipping values
    /// outside the window. `None` once the file is exhausted.
    pub fn next_in_range(&mut self, low: &BigUint) -> Result<Option<BigUint>, StoreError> {
        let mut high = low.clone();
        high.shift(-1);
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                tracing::debug!("prime cache exhausted");
                return Ok(None);
            }
            let base = detect_base(&line, self.base);
            let candidate = BigUint::from_str_radix(&line, base)?;
            if candidate.cmp(low) != Ordering::Less && candidate.cmp(&high) != Ordering::Greater {
                return Ok(Some(candidate));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_scan() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PrimeCache::new(dir.path().join("primes"));

        for v in [100u64, 5000, 7001, 9000, 20000] {
            cache.append(&BigUint::from_u64(v), 10).unwrap();
        }

        // Window [5000, 10000] picks up 5000, 7001, 9000 in file order.
        let low = BigUint::from_u64(5000);
        let mut scan = cache.scan(10).unwrap();
        let mut found = Vec::new();
        while let Some(v) = scan.next_in_range(&low).unwrap() {
            found.push(v);
        }
        assert_eq!(
            found,
            vec![
                BigUint::from_u64(5000),
                BigUint::from_u64(7001),
                BigUint::from_u64(9000)
            ]
        );
    }

    #[test]
    fn test_scan_detects_hex_lines() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PrimeCache::new(dir.path().join("primes"));
        cache.append(&BigUint::from_u64(0xABCD), 16).unwrap();

        let low = BigUint::from_u64(0x8000);
        let mut scan = cache.scan(10).unwrap();
        let v = scan.next_in_range(&low).unwrap().unwrap();
        assert_eq!(v, BigUint::from_u64(0xABCD));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PrimeCache::new(dir.path().join("absent"));
        match cache.scan(10) {
            Err(StoreError::FileNotFound(path)) => assert!(path.contains("absent")),
            other => panic!("expected FileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_find_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PrimeCache::new(dir.path().join("primes"));
        cache.append(&BigUint::from_u64(73_592_201), 10).unwrap();
        cache.append(&BigUint::from_u64(99_991), 10).unwrap();

        let (v, base) = cache.find_prefix("7359", 10).unwrap().unwrap();
        assert_eq!(v, BigUint::from_u64(73_592_201));
        assert_eq!(base, 10);
        assert!(cache.find_prefix("4242", 10).unwrap().is_none());
    }
}
