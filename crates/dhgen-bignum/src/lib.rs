#![forbid(unsafe_code)]
#![doc = "Arbitrary-precision unsigned integer arithmetic for dhgen."]

mod bignum;
mod codec;
mod entropy;
mod gcd;
mod ops;
mod prime;
mod rand;

pub use bignum::{BigUint, DoubleLimb, Limb, LIMB_BITS};
pub use entropy::{EntropySource, OsEntropy, SeedFileRng};
pub use prime::{is_prime_u64, miller_rabin_u64, mod_pow_u64, MAX_PROVABLE_U64};
