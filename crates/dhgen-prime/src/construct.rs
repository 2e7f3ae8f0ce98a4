//! Constructive generation of proven primes of the form p = 2qr + 1.
//!
//! Pocklington's criterion: when q is a prime factor of n - 1 with
//! q > sqrt(n) - 1, n is prime if some base a satisfies
//! a^(n-1) ≡ 1 (mod n) and gcd(a^((n-1)/q) - 1, n) = 1. The q factor is
//! itself constructed recursively, bottoming out at widths a deterministic
//! Miller-Rabin witness set proves outright, so every accepted prime
//! carries an inductive proof regardless of whether r is prime.

use dhgen_bignum::{is_prime_u64, BigUint, EntropySource, Limb, MAX_PROVABLE_U64};
use dhgen_store::{CacheScan, PrimeCache, ProofLog};
use dhgen_types::{BignumError, GenError};
use std::cmp::Ordering;
use tracing::{debug, trace};

/// How the r cofactor is sourced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RFactor {
    /// Draw random candidates and screen them probabilistically. The
    /// default, and the only mode whose proof rows feed the primitive
    /// root finder.
    #[default]
    Probable,
    /// Allow composite r. Far faster; the prime's own proof is
    /// unaffected, but the factorization of p - 1 stays incomplete.
    Composite,
    /// Construct r recursively as a proven prime.
    Proven,
}

/// Screening strength for freshly drawn r candidates; proves r outright
/// up to 48 bits. Tunable.
const R_PRESCREEN_CERTAINTY: u32 = 7;
/// Post-acceptance screening for prime r beyond 48 bits. Tunable.
const R_FINAL_CERTAINTY: u32 = 57;
/// Witness certainty for the directly provable base cases.
const BASE_CASE_CERTAINTY: u32 = 7;

#[derive(Debug, Clone)]
pub struct GenOptions {
    pub r_factor: RFactor,
    /// Source r candidates from the prime cache.
    pub from_cache: bool,
    /// When the cache runs dry, restart with a fresh q and rescan it
    /// instead of falling back to random generation.
    pub recycle: bool,
    /// Cap on q restarts before giving up. `None` searches until a proof
    /// lands, which is the normal generator behavior.
    pub max_q_restarts: Option<usize>,
    pub in_base: u32,
    pub out_base: u32,
}

impl Default for GenOptions {
    fn default() -> Self {
        Self {
            r_factor: RFactor::default(),
            from_cache: false,
            recycle: false,
            max_q_restarts: None,
            in_base: 10,
            out_base: 10,
        }
    }
}

/// The certificate behind an accepted prime: p = 2 * q * r + 1.
#[derive(Debug, Clone)]
pub struct ProofTriple {
    pub p: BigUint,
    pub q: BigUint,
    pub r: BigUint,
}

/// A constructed prime plus how it was reached. Directly provable widths
/// carry no triple.
#[derive(Debug)]
pub struct Generated {
    pub prime: BigUint,
    pub proof: Option<ProofTriple>,
    pub tries: usize,
}

/// Proven-prime constructor.
///
/// Borrows an entropy handle, the shared small-prime product, and the
/// optional repositories; it owns no state of its own, so independent
/// constructions can run side by side as long as each has a private
/// entropy source.
pub struct Generator<'a> {
    entropy: &'a mut dyn EntropySource,
    sieve: &'a BigUint,
    options: GenOptions,
    primes: Option<&'a PrimeCache>,
    proofs: Option<&'a ProofLog>,
}

impl<'a> Generator<'a> {
    pub fn new(
        entropy: &'a mut dyn EntropySource,
        sieve: &'a BigUint,
        options: GenOptions,
    ) -> Self {
        Self {
            entropy,
            sieve,
            options,
            primes: None,
            proofs: None,
        }
    }

    /// Record newly drawn prime r values and accepted primes here.
    pub fn with_prime_cache(mut self, cache: &'a PrimeCache) -> Self {
        self.primes = Some(cache);
        self
    }

    /// Record every accepted (p, q, r) triple here.
    pub fn with_proof_log(mut self, log: &'a ProofLog) -> Self {
        self.proofs = Some(log);
        self
    }

    /// Construct a proven prime of exactly `bits` bits. Widths below 12
    /// are not constructible as 2qr + 1; use the probabilistic generator
    /// for those.
    pub fn proven_prime(&mut self, bits: usize) -> Result<Generated, GenError> {
        let require_prime_r = self.options.r_factor != RFactor::Composite;
        self.construct_width(bits, require_prime_r)
    }

    fn construct_width(
        &mut self,
        bits: usize,
        require_prime_r: bool,
    ) -> Result<Generated, GenError> {
        // Directly provable widths short-circuit, unless a prime r is
        // demanded: then even small targets go through the construction
        // so the full factorization of p - 1 lands in the log.
        if !require_prime_r && bits <= 48 {
            if bits <= 32 {
                let prime = self.random_prime_u32(bits)?;
                return Ok(Generated {
                    prime: BigUint::from_u64(prime),
                    proof: None,
                    tries: 0,
                });
            }
            loop {
                let mut n = BigUint::random_bits(self.entropy, bits)?;
                n.set_bit(0);
                n.set_bit(bits - 1);
                if n.is_prime(BASE_CASE_CERTAINTY, self.entropy)? {
                    return Ok(Generated {
                        prime: n,
                        proof: None,
                        tries: 0,
                    });
                }
            }
        }

        let mut use_cache = require_prime_r && self.options.from_cache;
        let mut restarts = 0usize;
        loop {
            // q wider than half the target keeps q > sqrt(n) for any n of
            // the requested width.
            let k = (bits >> 1) + 1 + (bits & 1);
            let q = self.construct_width(k, false)?.prime;

            // r range [rmm, 2rmm] forces 2qr + 1 into exactly `bits` bits.
            let mut span = BigUint::with_bits(Limb::BITS as usize, 1);
            span.shift(-((bits as i32) - 2));
            let rmm = span.div(&q)?;
            debug!(bits, k, rmm_bits = rmm.bit_len(), "q selected, searching r range");

            let mut scan = if use_cache { self.open_cache_scan(&mut use_cache) } else { None };

            let mut tries = 0usize;
            while tries < bits {
                let r = if require_prime_r {
                    match self.next_prime_r(&rmm, &mut scan, &mut use_cache)? {
                        Some(r) => r,
                        // Cache dry under recycle: fresh q, rescan.
                        None => break,
                    }
                } else {
                    self.random_odd_r(&rmm)?
                };

                if let Some(n) = self.pocklington_check(&q, &r)? {
                    if require_prime_r
                        && bits > 48
                        && !r.is_prime(R_FINAL_CERTAINTY, self.entropy)?
                    {
                        trace!("r failed final screening");
                        tries += 1;
                        continue;
                    }
                    if let Some(log) = self.proofs {
                        log.append(&n, &q, &r, self.options.out_base)?;
                    }
                    debug!(bits, tries, "Pocklington proof complete");
                    return Ok(Generated {
                        prime: n.clone(),
                        proof: Some(ProofTriple { p: n, q, r }),
                        tries,
                    });
                }
                tries += 1;
            }

            debug!(bits, "candidate budget exhausted, restarting with fresh q");
            restarts += 1;
            if let Some(cap) = self.options.max_q_restarts {
                if restarts > cap {
                    return Err(GenError::Number(BignumError::ConstructionExhausted));
                }
            }
        }
    }

    /// Construct a proven prime in [min, 2 * min). Internal form used when
    /// r itself must be proven; r's primality never feeds the caller's
    /// proof, so its own cofactor may be composite.
    fn construct_range(&mut self, min: &BigUint) -> Result<Generated, GenError> {
        if min.cmp(&BigUint::from_u64(MAX_PROVABLE_U64)) == Ordering::Less {
            loop {
                let mut n = BigUint::random_below(self.entropy, min)?;
                n = n.add(min);
                if n.is_prime(BASE_CASE_CERTAINTY, self.entropy)? {
                    return Ok(Generated {
                        prime: n,
                        proof: None,
                        tries: 0,
                    });
                }
            }
        }

        let mut restarts = 0usize;
        loop {
            let mut lower = min.sqrt();
            lower.shift(-3);
            let q = self.construct_range(&lower)?.prime;

            let mut rmm = min.div(&q)?;
            rmm.shift(1);
            debug!(rmm_bits = rmm.bit_len(), "q selected for range target");

            let mut tries = 0usize;
            let budget = rmm.bit_len();
            while tries < budget {
                let r = self.random_odd_r(&rmm)?;
                if let Some(n) = self.pocklington_check(&q, &r)? {
                    if let Some(log) = self.proofs {
                        log.append(&n, &q, &r, self.options.out_base)?;
                    }
                    return Ok(Generated {
                        prime: n.clone(),
                        proof: Some(ProofTriple { p: n, q, r }),
                        tries,
                    });
                }
                tries += 1;
            }

            restarts += 1;
            if let Some(cap) = self.options.max_q_restarts {
                if restarts > cap {
                    return Err(GenError::Number(BignumError::ConstructionExhausted));
                }
            }
        }
    }

    /// Apply the Pocklington gates to n = 2qr + 1. Returns the accepted n,
    /// or None if any gate rejects the candidate.
    fn pocklington_check(
        &mut self,
        q: &BigUint,
        r: &BigUint,
    ) -> Result<Option<BigUint>, GenError> {
        let mut n_minus_1 = q.mul(r);
        n_minus_1.shift(-1); // 2qr
        let mut n = n_minus_1.clone();
        n.add_scalar(1); // 2qr + 1

        // One GCD trial-divides by every odd prime below 1000.
        let (_, coprime) = self.sieve.gcd(&n);
        if !coprime {
            trace!("rejected by small-prime sieve");
            return Ok(None);
        }

        let base = BigUint::from_u32(2);
        let fermat = base.pow_mod(&n_minus_1, &n)?;
        if fermat.cmp_scalar(1) != Ordering::Equal {
            trace!("rejected by Fermat gate");
            return Ok(None);
        }

        // gcd(2^((n-1)/q) - 1, n) must be 1.
        let mut exp = r.clone();
        exp.shift(-1); // 2r = (n-1)/q
        let mut witness = base.pow_mod(&exp, &n)?;
        witness.sub_scalar(1);
        let (_, unity) = witness.gcd(&n);
        if !unity {
            trace!("rejected by Pocklington gcd gate");
            return Ok(None);
        }

        Ok(Some(n))
    }

    fn open_cache_scan(&mut self, use_cache: &mut bool) -> Option<CacheScan> {
        let cache = match self.primes {
            Some(cache) => cache,
            None => {
                *use_cache = false;
                return None;
            }
        };
        match cache.scan(self.options.in_base) {
            Ok(scan) => Some(scan),
            Err(_) => {
                debug!("prime cache unavailable, generating r instead");
                *use_cache = false;
                None
            }
        }
    }

    /// Produce the next prime r candidate in [rmm, 2rmm], from the cache
    /// scan, recursive construction, or fresh random draws depending on
    /// configuration. `None` asks the caller to restart with a fresh q
    /// (recycle mode with an exhausted cache).
    fn next_prime_r(
        &mut self,
        rmm: &BigUint,
        scan: &mut Option<CacheScan>,
        use_cache: &mut bool,
    ) -> Result<Option<BigUint>, GenError> {
        if let Some(active) = scan.as_mut() {
            match active.next_in_range(rmm) {
                Ok(Some(candidate)) => {
                    trace!("testing cached r");
                    return Ok(Some(candidate));
                }
                _ => {
                    *scan = None;
                    if self.options.recycle {
                        return Ok(None);
                    }
                    *use_cache = false;
                }
            }
        }

        let r = if self.options.r_factor == RFactor::Proven {
            self.construct_range(rmm)?.prime
        } else {
            let mut r;
            loop {
                r = self.random_odd_r(rmm)?;
                if r.is_prime(R_PRESCREEN_CERTAINTY, self.entropy)? {
                    break;
                }
            }
            r
        };
        // Cache fresh work before the costlier gates run.
        if let Some(cache) = self.primes {
            cache.append(&r, self.options.out_base)?;
        }
        trace!("testing newly generated r");
        Ok(Some(r))
    }

    /// Random odd value in [rmm, 2rmm].
    fn random_odd_r(&mut self, rmm: &BigUint) -> Result<BigUint, BignumError> {
        let mut r = BigUint::random_below(self.entropy, rmm)?;
        r = r.add(rmm);
        r.set_bit(0);
        Ok(r)
    }

    /// Random u32-range prime of exactly `bits` bits, proven by the
    /// 2/7/61 witness set.
    fn random_prime_u32(&mut self, bits: usize) -> Result<u64, BignumError> {
        let mut limbs = [0 as Limb; 1];
        loop {
            self.entropy.fill_bits(&mut limbs, bits)?;
            let mut num = limbs[0] as u64;
            num |= 1;
            num |= 1 << (bits - 1);
            if is_prime_u64(num) {
                return Ok(num);
            }
        }
    }
}
