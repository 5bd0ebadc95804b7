//! SHA-256 helpers shared by every hash in the protocol.

use crate::Scalar;
use digest::Digest;
use sha2::Sha256;

pub fn sha256(bytes: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(bytes));
    out
}

/// Lowercase hex digest, as carried in ballot payload hashes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(sha256(bytes))
}

/// Unpadded standard base64 digest, as used for the signed message hash.
pub fn sha256_base64(bytes: &[u8]) -> String {
    base64::encode_config(&sha256(bytes), base64::STANDARD_NO_PAD)
}

/// Fiat-Shamir reduction: the digest interpreted as a big-endian integer,
/// reduced mod the group order.
pub fn hash_to_scalar(input: &str) -> Scalar {
    Scalar::from_be_bytes_mod_order(&sha256(input.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_known_answer() {
        assert_eq!(
            sha256_hex(b"Hello Chaum!"),
            "7d90a8d6e5be1edd85a966762aa9627f69eea0a1e3a45c2b7a722e76f115798b"
        );
    }

    #[test]
    fn base64_is_unpadded() {
        // 32 bytes of digest always base64-encode to 43 chars without padding
        assert_eq!(sha256_base64(b"x").len(), 43);
        assert!(!sha256_base64(b"x").ends_with('='));
    }

    #[test]
    fn hash_to_scalar_deterministic() {
        assert_eq!(hash_to_scalar("prove|abc"), hash_to_scalar("prove|abc"));
        assert_ne!(hash_to_scalar("prove|abc"), hash_to_scalar("prove|abd"));
    }
}
