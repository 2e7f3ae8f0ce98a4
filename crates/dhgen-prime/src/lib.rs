#![forbid(unsafe_code)]
#![doc = "Constructive and probabilistic prime generation for dhgen."]

mod construct;
mod probable;
mod roots;
mod sequential;
mod small;

pub use construct::{GenOptions, Generated, Generator, ProofTriple, RFactor};
pub use probable::{default_certainty, probable_prime};
pub use roots::{brute_force_roots, primitive_roots, RootSearch};
pub use sequential::sequential_primes;
pub use small::odd_prime_product;
