//! Canonical serialization of ballot payloads.
//!
//! There is exactly one permitted serialization of a payload: compact JSON
//! with fields in declared order (election_uuid, election_hash, credential,
//! answers, signature; per answer: choices, proof, individual_proofs,
//! overall_proof, blank_proof). A payload that parses identically under a
//! lenient decoder but serializes differently would be signed and verified
//! over different bytes than displayed; the canonical check rejects it.

use crate::*;

/// Borrowed view of a payload with the signature field excluded, serialized
/// in the same canonical order as the payload itself.
#[derive(Serialize)]
struct PayloadWithoutSignature<'a> {
    election_uuid: &'a str,
    election_hash: &'a str,
    credential: &'a Point,
    answers: &'a [Answer],
}

/// The canonical serialization, signature included.
pub fn canonical_bytes(payload: &BallotPayload) -> Vec<u8> {
    serde_json::to_vec(payload).expect("belvote: unexpected error serializing ballot payload")
}

/// Hex hash of the full canonical form; what `payload_hash` must equal.
pub fn canonical_hash(payload: &BallotPayload) -> String {
    hash::sha256_hex(&canonical_bytes(payload))
}

/// Unpadded-base64 hash of the canonical form with the signature excluded;
/// this is the message the ballot signature signs.
pub fn hash_without_signature(payload: &BallotPayload) -> String {
    hash_without_signature_parts(
        &payload.election_uuid,
        &payload.election_hash,
        &payload.credential,
        &payload.answers,
    )
}

pub(crate) fn hash_without_signature_parts(
    election_uuid: &str,
    election_hash: &str,
    credential: &Point,
    answers: &[Answer],
) -> String {
    let view = PayloadWithoutSignature {
        election_uuid,
        election_hash,
        credential,
        answers,
    };
    let bytes =
        serde_json::to_vec(&view).expect("belvote: unexpected error serializing ballot payload");
    hash::sha256_base64(&bytes)
}

/// The carried payload hash must equal the recomputed hash of the canonical
/// form. Defends against field-reordering and extra-field attacks.
pub fn check_is_canonical(ballot: &Ballot) -> Result<(), ValidationError> {
    if canonical_hash(&ballot.payload) == ballot.payload_hash {
        Ok(())
    } else {
        Err(ValidationError::NotCanonical)
    }
}
