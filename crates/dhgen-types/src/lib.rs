#![forbid(unsafe_code)]
#![doc = "Common types and error codes for dhgen."]

pub mod error;

pub use error::*;
