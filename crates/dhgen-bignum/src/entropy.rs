//! Entropy sources feeding random big-number generation.
//!
//! Randomness is never ambient: every function that draws bits takes an
//! explicit `EntropySource` handle owned by the caller.

use crate::bignum::{Limb, LIMB_BITS};
use dhgen_types::BignumError;
use sha2::{Digest, Sha512};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use zeroize::Zeroize;

/// A stream of cryptographically strong random bits.
pub trait EntropySource {
    /// Fill `limbs` so that exactly the low `bits` bits are meaningful:
    /// the final partial limb is right-shifted and every limb beyond the
    /// covered range is zeroed. `limbs` must hold at least
    /// `bits.div_ceil(LIMB_BITS)` elements.
    fn fill_bits(&mut self, limbs: &mut [Limb], bits: usize) -> Result<(), BignumError>;
}

/// Shift the top partial limb down and clear everything above `bits`.
fn trim_to_bits(limbs: &mut [Limb], bits: usize) {
    let used = bits.div_ceil(LIMB_BITS);
    let partial = bits % LIMB_BITS;
    if partial != 0 {
        limbs[used - 1] >>= LIMB_BITS - partial;
    }
    for limb in limbs.iter_mut().skip(used) {
        *limb = 0;
    }
}

/// The operating system's secure random device.
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill_bits(&mut self, limbs: &mut [Limb], bits: usize) -> Result<(), BignumError> {
        let used = bits.div_ceil(LIMB_BITS);
        let mut buf = vec![0u8; used * 4];
        getrandom::getrandom(&mut buf).map_err(|_| BignumError::EntropyFailure)?;
        for (limb, chunk) in limbs.iter_mut().zip(buf.chunks_exact(4)) {
            *limb = Limb::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        trim_to_bits(limbs, bits);
        Ok(())
    }
}

/// A hash-based pseudorandom stream seeded from a persisted state file.
///
/// Each SHA-512 block yields 64 bytes: 48 are served to the caller and 16
/// are fed back into the hash state to perturb the next block. `stir` mixes
/// caller-supplied entropy into the state, and `persist` writes the next
/// 64-byte state back to the seed file (Base64-wrapped) so later runs
/// diverge from earlier ones. A missing seed file starts from the empty
/// hash state.
pub struct SeedFileRng {
    hasher: Sha512,
    buf: [u8; 64],
    remain: usize,
    path: PathBuf,
}

impl SeedFileRng {
    /// Open the stream, absorbing the persisted seed state if present.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let mut hasher = Sha512::new();
        if let Ok(text) = fs::read_to_string(&path) {
            if let Ok(seed) = dhgen_utils::base64::decode(&text) {
                hasher.update(&seed);
            }
        }
        SeedFileRng {
            hasher,
            buf: [0; 64],
            remain: 0,
            path,
        }
    }

    /// Mix caller-supplied entropy into the hash state. Anything hard to
    /// reproduce later is good input.
    pub fn stir(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    /// Read raw stream bytes.
    pub fn read(&mut self, out: &mut [u8]) {
        for byte in out {
            if self.remain == 0 {
                let digest = self.hasher.finalize_reset();
                self.buf.copy_from_slice(&digest);
                self.hasher.update(&self.buf[48..]);
                self.remain = 48;
            }
            self.remain -= 1;
            *byte = self.buf[self.remain];
        }
    }

    /// Cycle the generator once more and write the resulting state to the
    /// seed file for the next run. Ends the useful life of this stream.
    pub fn persist(&mut self) -> io::Result<()> {
        self.hasher.update(self.buf);
        let digest = self.hasher.finalize_reset();
        self.buf.copy_from_slice(&digest);
        fs::write(&self.path, dhgen_utils::base64::encode(&self.buf))
    }
}

impl EntropySource for SeedFileRng {
    fn fill_bits(&mut self, limbs: &mut [Limb], bits: usize) -> Result<(), BignumError> {
        let used = bits.div_ceil(LIMB_BITS);
        let mut chunk = [0u8; 4];
        for limb in limbs.iter_mut().take(used) {
            self.read(&mut chunk);
            *limb = Limb::from_le_bytes(chunk);
        }
        trim_to_bits(limbs, bits);
        Ok(())
    }
}

impl Drop for SeedFileRng {
    fn drop(&mut self) {
        self.buf.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_entropy_respects_bits() {
        let mut entropy = OsEntropy;
        let mut limbs = [0 as Limb; 4];
        entropy.fill_bits(&mut limbs, 40).unwrap();
        assert!(limbs[1] < 1 << 8);
        assert_eq!(limbs[2], 0);
        assert_eq!(limbs[3], 0);
    }

    #[test]
    fn test_seed_stream_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed");
        fs::write(&path, dhgen_utils::base64::encode(b"fixed seed state")).unwrap();

        let mut a = SeedFileRng::open(&path);
        let mut b = SeedFileRng::open(&path);
        let mut buf_a = [0u8; 100];
        let mut buf_b = [0u8; 100];
        a.read(&mut buf_a);
        b.read(&mut buf_b);
        assert_eq!(buf_a, buf_b);
    }

    #[test]
    fn test_stir_diverges() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed");

        let mut a = SeedFileRng::open(&path);
        let mut b = SeedFileRng::open(&path);
        b.stir(b"gibberish");
        let mut buf_a = [0u8; 64];
        let mut buf_b = [0u8; 64];
        a.read(&mut buf_a);
        b.read(&mut buf_b);
        assert_ne!(buf_a, buf_b);
    }

    #[test]
    fn test_persist_rolls_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed");

        let mut first = SeedFileRng::open(&path);
        let mut buf1 = [0u8; 16];
        first.read(&mut buf1);
        first.persist().unwrap();

        let stored = fs::read_to_string(&path).unwrap();
        assert_eq!(dhgen_utils::base64::decode(&stored).unwrap().len(), 64);

        let mut second = SeedFileRng::open(&path);
        let mut buf2 = [0u8; 16];
        second.read(&mut buf2);
        assert_ne!(buf1, buf2);
    }
}
