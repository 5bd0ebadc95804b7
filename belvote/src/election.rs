//! Election setup: the public parameters every ballot is checked against.

use crate::*;

/// The election setup, as published by the election administrator.
///
/// The fingerprint binds every proof in every ballot to this specific
/// election instance; `credentials_weights` lists the registered public
/// credentials.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ElectionSetup {
    pub fingerprint: String,

    #[serde(rename = "credentialsWeights")]
    pub credentials_weights: Vec<CredentialWeight>,

    pub election: Election,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CredentialWeight {
    /// Encoded public credential point
    pub credential: String,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u64>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Election {
    pub uuid: String,
    pub public_key: Point,
    pub questions: Vec<Question>,
}

/// Admissibility policy for one ballot section: how many of the listed
/// answers a voter may select, and whether a blank vote is allowed.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Question {
    #[serde(rename = "type")]
    #[serde(default)]
    pub kind: QuestionKind,

    #[serde(default)]
    pub blank: bool,

    pub min: u64,
    pub max: u64,
    pub answers: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Homomorphic,
    NonHomomorphic,
}

impl Default for QuestionKind {
    fn default() -> Self {
        QuestionKind::Homomorphic
    }
}

impl ElectionSetup {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Membership test by exact encoded-point equality
    pub fn is_registered(&self, credential: &Point) -> bool {
        let encoded = credential.to_hex();
        self.credentials_weights
            .iter()
            .any(|cw| cw.credential == encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_setup() {
        let json = r#"{
            "fingerprint": "rdkcspQGItOfIMt1C9DDcyKKPmprzmCaWM/01fiLmDE",
            "credentialsWeights": [
                {"credential": "6666666666666666666666666666666666666666666666666666666666666658"}
            ],
            "election": {
                "uuid": "nV3AmL8rjyKaSL",
                "public_key": "6666666666666666666666666666666666666666666666666666666666666658",
                "questions": [
                    {"min": 0, "max": 1, "answers": ["Yes", "No"]},
                    {"type": "NonHomomorphic", "blank": true, "min": 0, "max": 2, "answers": ["A", "B", "C"]}
                ]
            }
        }"#;
        let setup = ElectionSetup::from_json(json).unwrap();
        assert_eq!(setup.election.questions.len(), 2);
        assert_eq!(setup.election.questions[0].kind, QuestionKind::Homomorphic);
        assert!(!setup.election.questions[0].blank);
        assert_eq!(
            setup.election.questions[1].kind,
            QuestionKind::NonHomomorphic
        );
        assert!(setup.election.questions[1].blank);
        assert!(setup.is_registered(&Point::generator()));
    }
}
