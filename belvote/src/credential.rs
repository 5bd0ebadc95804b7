//! Voter credentials: a pseudonymous key pair derived deterministically from
//! a secret voting code. The pair is never stored; the voter re-derives it
//! from the code every time.

use crate::*;

/// A voter's credential key pair: public = g^private.
#[derive(Debug, Clone, Copy)]
pub struct CredentialPair {
    pub private: Scalar,
    pub public: Point,
}

/// Voting codes are four alphanumeric groups of 5-6-5-6 characters.
pub fn check_voting_code(code: &str) -> bool {
    const GROUP_LENS: [usize; 4] = [5, 6, 5, 6];
    let groups: Vec<&str> = code.split('-').collect();
    groups.len() == GROUP_LENS.len()
        && groups
            .iter()
            .zip(&GROUP_LENS)
            .all(|(group, &len)| group.len() == len && group.bytes().all(|b| b.is_ascii_alphanumeric()))
}

/// Deterministic credential derivation. Two domain-separated hashes of the
/// secret code are concatenated into a 512-bit integer and reduced mod L;
/// identical (uuid, code) inputs always yield the bit-identical pair.
pub fn derive_credential(election_uuid: &str, code: &str) -> CredentialPair {
    let prefix = format!("derive_credential|{}", election_uuid);
    let h0 = hash::sha256(format!("{}|0|{}", prefix, code).as_bytes());
    let h1 = hash::sha256(format!("{}|1|{}", prefix, code).as_bytes());

    let mut concatenated = [0u8; 64];
    concatenated[..32].copy_from_slice(&h0);
    concatenated[32..].copy_from_slice(&h1);

    let private = Scalar::from_be_bytes_mod_order(&concatenated);
    CredentialPair {
        private,
        public: Point::generator() * private,
    }
}
