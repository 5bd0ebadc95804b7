//! The ballot wire format.
//!
//! Field order in these structs is canonical: the canonical serialization of
//! a payload is its compact JSON in declared order, and every hash in the
//! system is computed over that form.

use crate::*;

/// An ElGamal-style encryption of an integer message m:
/// alpha = g^r, beta = Y^r * g^m.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Ciphertext {
    pub alpha: Point,
    pub beta: Point,
}

impl Ciphertext {
    pub fn zero() -> Ciphertext {
        Ciphertext {
            alpha: Point::identity(),
            beta: Point::identity(),
        }
    }

    /// Componentwise sum; the homomorphic combination of two encryptions.
    pub fn combine(&self, other: &Ciphertext) -> Ciphertext {
        Ciphertext {
            alpha: self.alpha + other.alpha,
            beta: self.beta + other.beta,
        }
    }

    /// The `alpha,beta` form the ciphertext takes inside challenge strings.
    pub fn to_wire_string(&self) -> String {
        format!("{},{}", self.alpha.to_hex(), self.beta.to_hex())
    }
}

/// One branch of a Sigma-protocol transcript.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ProofTranscript {
    pub challenge: Scalar,
    pub response: Scalar,
}

/// The encrypted choices of one answer. The shape is resolved once at parse
/// time, never inferred from runtime structure afterwards.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Choices {
    Multi(Vec<Ciphertext>),
    Single(Ciphertext),
}

impl Choices {
    /// The choice list of a homomorphic answer, if that is what this is.
    pub fn as_multi(&self) -> Option<&[Ciphertext]> {
        match self {
            Choices::Multi(choices) => Some(choices),
            Choices::Single(_) => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ciphertext> {
        let slice = match self {
            Choices::Multi(choices) => &choices[..],
            Choices::Single(choice) => std::slice::from_ref(choice),
        };
        slice.iter()
    }
}

/// One voter response to one question.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Answer {
    pub choices: Choices,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<ProofTranscript>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub individual_proofs: Option<Vec<Vec<ProofTranscript>>>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_proof: Option<Vec<ProofTranscript>>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blank_proof: Option<Vec<ProofTranscript>>,
}

/// Schnorr-style signature binding a payload hash to a credential.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Signature {
    pub hash: String,
    pub proof: ProofTranscript,
}

/// The signed ballot content.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BallotPayload {
    pub election_uuid: String,
    pub election_hash: String,
    pub credential: Point,
    pub answers: Vec<Answer>,
    pub signature: Signature,
}

/// The unit submitted for verification: the payload plus the hash of its
/// serialization. The hash is fixed at parse time and never trusted blindly;
/// the canonical check always recomputes and compares it.
#[derive(Debug, Clone, PartialEq)]
pub struct Ballot {
    pub payload: BallotPayload,
    pub payload_hash: String,
}

impl Ballot {
    /// Parse a ballot from its exact submitted bytes. The payload hash is
    /// computed over those bytes, so any re-serialization difference shows up
    /// in the canonical check.
    pub fn parse(raw: &str) -> Result<Ballot, Error> {
        let payload: BallotPayload = serde_json::from_str(raw)?;
        Ok(Ballot {
            payload,
            payload_hash: hash::sha256_hex(raw.as_bytes()),
        })
    }

    /// Build a ballot from a payload we constructed ourselves, hashing its
    /// canonical serialization.
    pub fn from_payload(payload: BallotPayload) -> Ballot {
        let payload_hash = canonical::canonical_hash(&payload);
        Ballot {
            payload,
            payload_hash,
        }
    }

    /// The canonical JSON of the payload.
    pub fn to_json(&self) -> String {
        String::from_utf8(canonical::canonical_bytes(&self.payload))
            .expect("belvote: canonical JSON is always UTF-8")
    }
}
