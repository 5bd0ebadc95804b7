use thiserror::Error;

/// Error types
#[derive(Debug, Error)]
pub enum Error {
    #[error("belvote: malformed point encoding: {0}")]
    MalformedPoint(String),

    #[error("belvote: malformed scalar encoding: {0}")]
    MalformedScalar(String),

    #[error("belvote: JSON error deserializing: {0}")]
    JSONDeserialization(#[from] serde_json::Error),

    #[error("belvote: voting code does not match the XXXXX-XXXXXX-XXXXX-XXXXXX format")]
    MalformedVotingCode,

    #[error("belvote: voting code does not correspond to any registered credential")]
    UnknownVotingCode,

    #[error("belvote: expected {expected} choice lists (one per question), got {got}")]
    WrongNumberOfChoiceLists { expected: usize, got: usize },

    #[error("belvote: question {question}: expected {expected} choices, got {got}")]
    WrongNumberOfChoices {
        question: usize,
        expected: usize,
        got: usize,
    },

    #[error("belvote: question {question}: choices must be 0 or 1")]
    ChoiceOutOfRange { question: usize },

    #[error("belvote: question {question}: {count} selections outside the allowed [{min}, {max}]")]
    SelectionCountOutOfRange {
        question: usize,
        count: u64,
        min: u64,
        max: u64,
    },

    #[error("belvote: question {question}: a blank vote excludes all other selections")]
    BlankVoteNotExclusive { question: usize },

    #[error("belvote: question {question}: cannot generate answers for non-homomorphic questions")]
    NonHomomorphicQuestion { question: usize },

    #[error("belvote: proved value is not in the allowed set")]
    ValueNotInAllowedSet,

    #[error("belvote: generated ballot failed self-check: {0}")]
    SelfCheckFailed(String),
}

/// Coarse classification of a validation failure, for audit purposes.
///
/// `Format` rejections happen before any cryptographic check runs;
/// `Integrity` means the ballot is not the authentic signed content;
/// `Policy` means an authentic ballot that the election rules reject;
/// `Unsupported` marks checks this crate cannot perform, which callers
/// must never treat as a security guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Format,
    Integrity,
    Policy,
    Unsupported,
}

/// Ballot validation errors, one variant per rejectable property
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("ballot election_uuid does not correspond to the election uuid")]
    ElectionMismatch,

    #[error("recomputed canonical hash does not match the ballot payload hash")]
    NotCanonical,

    #[error("credential is not registered for this election")]
    UnregisteredCredential,

    #[error("a ballot with the same payload hash was already accepted")]
    DuplicateBallot,

    #[error("expected {expected} answers (one per question), got {got}")]
    AnswerCountMismatch { expected: usize, got: usize },

    #[error("question {question}: expected a list of encrypted choices")]
    MalformedChoices { question: usize },

    #[error("question {question}, choice {choice}: alpha,beta are not valid curve points")]
    InvalidChoicePoint { question: usize, choice: usize },

    #[error("signature hash does not match the payload hash without signature")]
    SignatureHashMismatch,

    #[error("signature proof of knowledge does not verify")]
    InvalidSignature,

    #[error("question {question}: missing {proof} proof")]
    MissingProof {
        question: usize,
        proof: &'static str,
    },

    #[error("question {question}: expected {expected} individual proofs, got {got}")]
    IndividualProofCountMismatch {
        question: usize,
        expected: usize,
        got: usize,
    },

    #[error("question {question}, choice {choice}: individual proof does not verify")]
    InvalidIndividualProof { question: usize, choice: usize },

    #[error("question {question}: overall proof does not verify")]
    InvalidOverallProof { question: usize },

    #[error("question {question}: non-homomorphic questions are not implemented")]
    NonHomomorphicUnsupported { question: usize },

    #[error("question {question}: blank-vote proof verification is not implemented")]
    BlankProofUnsupported { question: usize },
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        use ValidationError::*;
        match self {
            ElectionMismatch => ErrorKind::Policy,
            NotCanonical => ErrorKind::Integrity,
            UnregisteredCredential => ErrorKind::Policy,
            DuplicateBallot => ErrorKind::Policy,
            AnswerCountMismatch { .. } => ErrorKind::Format,
            MalformedChoices { .. } => ErrorKind::Format,
            InvalidChoicePoint { .. } => ErrorKind::Format,
            SignatureHashMismatch => ErrorKind::Integrity,
            InvalidSignature => ErrorKind::Integrity,
            MissingProof { .. } => ErrorKind::Format,
            IndividualProofCountMismatch { .. } => ErrorKind::Format,
            InvalidIndividualProof { .. } => ErrorKind::Integrity,
            InvalidOverallProof { .. } => ErrorKind::Integrity,
            NonHomomorphicUnsupported { .. } => ErrorKind::Unsupported,
            BlankProofUnsupported { .. } => ErrorKind::Unsupported,
        }
    }
}
