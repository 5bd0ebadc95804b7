//! Schnorr-style proof of knowledge binding a payload hash to a credential's
//! private key.

use crate::*;
use rand_core::{CryptoRng, RngCore};

fn challenge(message_hash: &str, commitment: &Point) -> Scalar {
    hash::hash_to_scalar(&format!("sig|{}|{}", message_hash, commitment.to_hex()))
}

/// Sign a message hash with a credential private key:
/// w random, A = g^w, c = H("sig|hash|A") mod L, s = w - private * c.
pub fn sign<R: RngCore + CryptoRng>(
    private: &Scalar,
    message_hash: &str,
    rng: &mut R,
) -> Signature {
    let w = Scalar::random(rng);
    let commitment = Point::generator() * w;
    let c = challenge(message_hash, &commitment);
    let s = w - *private * c;
    Signature {
        hash: message_hash.to_string(),
        proof: ProofTranscript {
            challenge: c,
            response: s,
        },
    }
}

/// Verify the proof of knowledge: recompute A' = g^s * public^c and accept
/// iff the challenge matches. The caller separately checks that the signed
/// hash is the payload's hash-without-signature.
pub fn verify(public: &Point, signature: &Signature) -> bool {
    let commitment =
        Point::generator() * signature.proof.response + *public * signature.proof.challenge;
    signature.proof.challenge == challenge(&signature.hash, &commitment)
}
