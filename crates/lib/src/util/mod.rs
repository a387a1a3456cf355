//! Shared utilities.
//!
//! Checksums for dependency artifacts, plus test helpers and doubles.

pub mod hash;

#[cfg(test)]
pub mod testutil;
