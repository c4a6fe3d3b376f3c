//! Content fingerprinting.
//!
//! Briefs and their outcome records are correlated by hash equality, so
//! the fingerprint must be stable across producers: SHA-256 over the
//! content body and the five address lines, newline-separated, hex-encoded.

use sha2::{Digest, Sha256};

use crate::types::Brief;

/// Compute the SHA-256 hex digest of a byte slice.
pub fn sha256_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Compute the content fingerprint of a brief.
///
/// Covers `text` and all five address lines; delivery state and the
/// `created` timestamp are excluded so re-submissions of identical content
/// fingerprint identically.
pub fn fingerprint(brief: &Brief) -> String {
    let mut hasher = Sha256::new();
    hasher.update(brief.text.as_bytes());
    for line in brief.address.lines() {
        hasher.update(b"\n");
        hasher.update(line.as_bytes());
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AddressLines;

    #[test]
    fn test_sha256_bytes_known_vector() {
        assert_eq!(
            sha256_bytes(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_fingerprint_ignores_created_and_state() {
        let address = AddressLines::new("A", "B", "C", "D", "E");
        let mut first = crate::types::Brief::new("body", address.clone(), "2024-01-01T00:00:00Z");
        let second = crate::types::Brief::new("body", address, "2025-06-30T12:00:00Z");
        first.begin_send().expect("send");

        assert_eq!(fingerprint(&first), fingerprint(&second));
    }

    #[test]
    fn test_fingerprint_distinguishes_line_boundaries() {
        // "ab" in line1 must not collide with "a" + "b" across lines.
        let joined = crate::types::Brief::new(
            "body",
            AddressLines::new("ab", "", "", "", ""),
            "2024-01-01T00:00:00Z",
        );
        let split = crate::types::Brief::new(
            "body",
            AddressLines::new("a", "b", "", "", ""),
            "2024-01-01T00:00:00Z",
        );
        assert_ne!(fingerprint(&joined), fingerprint(&split));
    }
}
