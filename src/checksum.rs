//! SHA-256 digests for downloaded release artifacts.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 of a byte slice and return it as lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Returns true if `digest` is a well-formed SHA-256 hex string.
pub fn is_valid_digest(digest: &str) -> bool {
    digest.len() == 64 && digest.chars().all(|c| c.is_ascii_hexdigit())
}
