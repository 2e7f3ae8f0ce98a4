//! Append-only proof log: CSV rows of p,2,q,r where p = 2qr + 1.

use crate::base::detect_base;
use dhgen_bignum::BigUint;
use dhgen_types::StoreError;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// One recorded factorization p = 2 * q * r + 1.
#[derive(Debug, Clone)]
pub struct ProofRow {
    pub p: BigUint,
    pub q: BigUint,
    pub r: BigUint,
    /// Base the row was stored in (after per-line detection).
    pub base: u32,
}

/// A proof log file. Rows are appended, never rewritten in place.
pub struct ProofLog {
    path: PathBuf,
}

impl ProofLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one p,2,q,r row rendered in `base`.
    pub fn append(
        &self,
        p: &BigUint,
        q: &BigUint,
        r: &BigUint,
        base: u32,
    ) -> Result<(), StoreError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(
            file,
            "{},2,{},{}",
            p.to_str_radix(base)?,
            q.to_str_radix(base)?,
            r.to_str_radix(base)?
        )?;
        Ok(())
    }

    /// Find the first row whose leading field starts with `prefix`,
    /// case-insensitively. Supports incremental lookups: the prefix does
    /// not need to be the whole number.
    pub fn find_prefix(&self, prefix: &str, in_base: u32) -> Result<Option<ProofRow>, StoreError> {
        let file = File::open(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::FileNotFound(self.path.display().to_string())
            } else {
                StoreError::Io(e)
            }
        })?;
        let reader = BufReader::new(file);
        for line in reader.lines() {
            let line = line?;
            let lead = first_field(&line);
            if lead.len() >= prefix.len() && lead[..prefix.len()].eq_ignore_ascii_case(prefix) {
                return Ok(Some(parse_row(&line, in_base)?));
            }
        }
        Ok(None)
    }

    /// Collect the proof chain rooted at the row matching `prefix`: the
    /// row itself, then recursively the rows proving its q and r factors.
    /// A factor with no row of its own (directly provable widths, or a
    /// composite r) simply ends its branch. When a decimal lookup of an
    /// inner factor misses, the same value is retried as hex, mirroring
    /// mixed-base log files.
    pub fn chain(&self, prefix: &str, in_base: u32) -> Result<Vec<ProofRow>, StoreError> {
        let mut rows = Vec::new();
        self.chain_inner(prefix, in_base, true, &mut rows)?;
        Ok(rows)
    }

    fn chain_inner(
        &self,
        prefix: &str,
        in_base: u32,
        top: bool,
        rows: &mut Vec<ProofRow>,
    ) -> Result<(), StoreError> {
        let mut found = self.find_prefix(prefix, in_base)?;
        if found.is_none() && !top && in_base == 10 {
            let value = BigUint::from_str_radix(prefix, 10)?;
            let hex = value.to_str_radix(16)?;
            found = self.find_prefix(&hex, 16)?;
        }
        if let Some(row) = found {
            let q_text = row.q.to_str_radix(row.base)?;
            let r_text = row.r.to_str_radix(row.base)?;
            let base = row.base;
            rows.push(row);
            self.chain_inner(&q_text, base, false, rows)?;
            self.chain_inner(&r_text, base, false, rows)?;
        }
        Ok(())
    }
}

/// Leading field of a CSV row, with separators trimmed off both ends.
fn first_field(line: &str) -> &str {
    let trimmed = line.trim_start_matches([',', ' ', '\t', '\r', '\n']);
    match trimmed.find([',', ' ', '\t', '\r', '\n']) {
        Some(end) => &trimmed[..end],
        None => trimmed,
    }
}

fn parse_row(line: &str, in_base: u32) -> Result<ProofRow, StoreError> {
    let base = detect_base(line, in_base);
    let mut fields = line
        .split([',', ' ', '\t', '\r', '\n'])
        .filter(|f| !f.is_empty());
    let p = field_value(fields.next(), base)?;
    let _cofactor = fields.next(); // the literal constant 2
    let q = field_value(fields.next(), base)?;
    let r = field_value(fields.next(), base)?;
    Ok(ProofRow { p, q, r, base })
}

fn field_value(field: Option<&str>, base: u32) -> Result<BigUint, StoreError> {
    // Absent fields parse as zero, like any other unusable text.
    Ok(BigUint::from_str_radix(field.unwrap_or(""), base)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: u64) -> BigUint {
        BigUint::from_u64(v)
    }

    #[test]
    fn test_append_and_find() {
        let dir = tempfile::tempdir().unwrap();
        let log = ProofLog::new(dir.path().join("primes.proof"));

        // 2 * 1019 * 1033 + 1 = 2105255
        log.append(&big(2_105_255), &big(1019), &big(1033), 10).unwrap();

        let row = log.find_prefix("2105", 10).unwrap().unwrap();
        assert_eq!(row.p, big(2_105_255));
        assert_eq!(row.q, big(1019));
        assert_eq!(row.r, big(1033));
        assert_eq!(row.base, 10);

        assert!(log.find_prefix("999", 10).unwrap().is_none());
    }

    #[test]
    fn test_prefix_is_case_insensitive_hex() {
        let dir = tempfile::tempdir().unwrap();
        let log = ProofLog::new(dir.path().join("primes.proof"));
        log.append(&big(0xABCDEF), &big(0xAB), &big(0xCD), 16).unwrap();

        let row = log.find_prefix("abcd", 10).unwrap().unwrap();
        assert_eq!(row.p, big(0xABCDEF));
        assert_eq!(row.base, 16);
    }

    #[test]
    fn test_chain_walks_factors() {
        let dir = tempfile::tempdir().unwrap();
        let log = ProofLog::new(dir.path().join("primes.proof"));

        // An outer row whose q has its own row; r and the inner factors
        // have none, so the chain is exactly two rows deep.
        log.append(&big(1019), &big(19), &big(17), 10).unwrap();
        log.append(&big(2_105_255), &big(1019), &big(1033), 10).unwrap();

        let rows = log.chain("2105255", 10).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].p, big(2_105_255));
        assert_eq!(rows[1].p, big(1019));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let log = ProofLog::new(dir.path().join("absent.proof"));
        assert!(matches!(
            log.find_prefix("1", 10),
            Err(StoreError::FileNotFound(_))
        ));
    }
}
