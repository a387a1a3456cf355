//! SHA-256 helpers for dependency verification.
//!
//! Checksums are compared as lowercase hexadecimal strings, the format used by
//! `sha256` fields in `buildpack.toml`.

use std::fs;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

/// Hash a file's contents.
///
/// Returns the full 64-character SHA-256 hash of the file, streaming the file
/// in fixed-size chunks so large archives are never held in memory.
pub fn hash_file(path: &Path) -> std::io::Result<String> {
  let mut file = fs::File::open(path)?;

  let mut hasher = Sha256::new();
  let mut buffer = [0u8; 8192];

  loop {
    let bytes_read = file.read(&mut buffer)?;
    if bytes_read == 0 {
      break;
    }
    hasher.update(&buffer[..bytes_read]);
  }

  Ok(hex::encode(hasher.finalize()))
}

/// Hash arbitrary bytes.
pub fn hash_bytes(data: &[u8]) -> String {
  let mut hasher = Sha256::new();
  hasher.update(data);
  hex::encode(hasher.finalize())
}

/// Compare a computed checksum against an expected one from a manifest.
///
/// Manifests are hand edited often enough that upper-case hex shows up; the
/// comparison ignores case.
pub fn checksum_matches(expected: &str, actual: &str) -> bool {
  expected.eq_ignore_ascii_case(actual)
}
