#![forbid(unsafe_code)]
#![doc = "Utility functions for dhgen: Base64, CRC-32, hexdump."]

pub mod base64;
pub mod crc;
pub mod hexdump;
