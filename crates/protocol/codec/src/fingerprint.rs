//! Short Keccak-256 fingerprints.
//!
//! A fingerprint is the first [`FINGERPRINT_BYTES`] bytes of the digest rendered as
//! lowercase hex. It identifies payloads for grouping and lookup and is not
//! collision resistant.

use alloy_primitives::{hex, keccak256};

/// The number of digest bytes kept in a fingerprint.
pub const FINGERPRINT_BYTES: usize = 4;

/// Returns the 8 hex character fingerprint of `bytes`.
pub fn fingerprint(bytes: &[u8]) -> String {
    hex::encode(&keccak256(bytes)[..FINGERPRINT_BYTES])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_of_empty_input() {
        assert_eq!(fingerprint(&[]), "c5d24601");
    }

    #[test]
    fn test_fingerprint_of_signature_text() {
        assert_eq!(fingerprint(b"kill(address)"), "cbf0b0c0");
        assert_eq!(fingerprint(b"transfer(address,uint256)"), "a9059cbb");
    }
}
