//! Ballot verification: runs every check a ballot must pass against an
//! election setup and reports each outcome individually.

use crate::*;

/// Outcome of one check. `Unsupported` is distinct from both pass and fail:
/// the check could not be performed, and the report surfaces that instead of
/// silently passing.
#[derive(Debug)]
pub enum CheckStatus {
    Pass,
    Fail(ValidationError),
    Unsupported(ValidationError),
}

#[derive(Debug)]
pub struct CheckResult {
    pub section: &'static str,
    pub message: String,
    pub status: CheckStatus,
}

/// The per-ballot verification report: one entry per check performed, in
/// pipeline order.
#[derive(Debug, Default)]
pub struct BallotReport {
    pub checks: Vec<CheckResult>,
}

impl BallotReport {
    /// True iff no check failed. Unsupported checks do not fail the ballot,
    /// but see `is_fully_checked`.
    pub fn is_valid(&self) -> bool {
        !self
            .checks
            .iter()
            .any(|check| matches!(check.status, CheckStatus::Fail(_)))
    }

    /// True iff every check ran and passed: a stronger claim than
    /// `is_valid`, and the one audits should rely on.
    pub fn is_fully_checked(&self) -> bool {
        self.checks
            .iter()
            .all(|check| matches!(check.status, CheckStatus::Pass))
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks
            .iter()
            .filter(|check| matches!(check.status, CheckStatus::Fail(_)))
    }

    fn record(&mut self, message: String, result: Result<(), ValidationError>) {
        let status = match result {
            Ok(()) => CheckStatus::Pass,
            Err(err) if err.kind() == ErrorKind::Unsupported => CheckStatus::Unsupported(err),
            Err(err) => CheckStatus::Fail(err),
        };
        self.checks.push(CheckResult {
            section: "ballots",
            message,
            status,
        });
    }
}

/// Verifies ballots against one election setup. The registry carries the
/// duplicate state for the session; verifying the same ballot twice through
/// the same verifier fails the uniqueness check the second time.
pub struct Verifier<'a> {
    setup: &'a ElectionSetup,
    registry: &'a BallotRegistry,
}

impl<'a> Verifier<'a> {
    pub fn new(setup: &'a ElectionSetup, registry: &'a BallotRegistry) -> Self {
        Verifier { setup, registry }
    }

    /// Run the full check pipeline over one parsed ballot.
    pub fn verify(&self, ballot: &Ballot) -> BallotReport {
        let mut report = BallotReport::default();
        let payload = &ballot.payload;

        report.record(
            "Corresponds to the election".to_string(),
            if payload.election_uuid == self.setup.election.uuid {
                Ok(())
            } else {
                Err(ValidationError::ElectionMismatch)
            },
        );

        report.record(
            "Is canonical".to_string(),
            canonical::check_is_canonical(ballot),
        );

        report.record(
            "Has a valid credential".to_string(),
            if self.setup.is_registered(&payload.credential) {
                Ok(())
            } else {
                Err(ValidationError::UnregisteredCredential)
            },
        );

        report.record(
            "Is unique".to_string(),
            if self.registry.accept(&ballot.payload_hash) {
                Ok(())
            } else {
                Err(ValidationError::DuplicateBallot)
            },
        );

        let questions = &self.setup.election.questions;
        let answer_count_ok = payload.answers.len() == questions.len();
        report.record(
            "Has one answer per question".to_string(),
            if answer_count_ok {
                Ok(())
            } else {
                Err(ValidationError::AnswerCountMismatch {
                    expected: questions.len(),
                    got: payload.answers.len(),
                })
            },
        );

        report.record(
            "Encrypted choices alpha,beta are valid curve points".to_string(),
            self.check_choice_points(payload),
        );

        report.record(
            "Hash without signature is correct".to_string(),
            if payload.signature.hash == canonical::hash_without_signature(payload) {
                Ok(())
            } else {
                Err(ValidationError::SignatureHashMismatch)
            },
        );

        report.record(
            "Valid signature".to_string(),
            if signature::verify(&payload.credential, &payload.signature) {
                Ok(())
            } else {
                Err(ValidationError::InvalidSignature)
            },
        );

        // Proof checks are per-question and need the question/answer pairing,
        // so they only run when the counts line up.
        if answer_count_ok {
            for (question_index, (question, answer)) in
                questions.iter().zip(&payload.answers).enumerate()
            {
                self.check_answer(&mut report, payload, question_index, question, answer);
            }
        }

        report
    }

    fn check_choice_points(&self, payload: &BallotPayload) -> Result<(), ValidationError> {
        for (question, answer) in payload.answers.iter().enumerate() {
            for (choice, ciphertext) in answer.choices.iter().enumerate() {
                if !ciphertext.alpha.is_valid() || !ciphertext.beta.is_valid() {
                    return Err(ValidationError::InvalidChoicePoint { question, choice });
                }
            }
        }
        Ok(())
    }

    fn check_answer(
        &self,
        report: &mut BallotReport,
        payload: &BallotPayload,
        question_index: usize,
        question: &Question,
        answer: &Answer,
    ) {
        if question.kind == QuestionKind::NonHomomorphic {
            report.record(
                format!("Valid proofs for question {}", question_index + 1),
                Err(ValidationError::NonHomomorphicUnsupported {
                    question: question_index,
                }),
            );
            return;
        }

        let y = &self.setup.election.public_key;
        let context = format!("{}|{}", self.setup.fingerprint, payload.credential.to_hex());

        // A blank-capable question carries one extra leading ciphertext for
        // the blank choice; it gets an individual proof like the others.
        let expected = question.answers.len() + question.blank as usize;

        let choices = match answer.choices.as_multi() {
            Some(choices) => choices,
            None => {
                report.record(
                    format!("Valid individual proofs for question {}", question_index + 1),
                    Err(ValidationError::MalformedChoices {
                        question: question_index,
                    }),
                );
                return;
            }
        };

        let individual_proofs = match &answer.individual_proofs {
            Some(proofs) => proofs,
            None => {
                report.record(
                    format!("Valid individual proofs for question {}", question_index + 1),
                    Err(ValidationError::MissingProof {
                        question: question_index,
                        proof: "individual",
                    }),
                );
                return;
            }
        };

        if choices.len() != expected || individual_proofs.len() != expected {
            report.record(
                format!("Valid individual proofs for question {}", question_index + 1),
                Err(ValidationError::IndividualProofCountMismatch {
                    question: question_index,
                    expected,
                    got: individual_proofs.len(),
                }),
            );
            return;
        }

        let mut individual = Ok(());
        for (choice, (ciphertext, proof)) in choices.iter().zip(individual_proofs).enumerate() {
            if !proof::verify_interval(y, &ciphertext.alpha, &ciphertext.beta, proof, &[0, 1], &context)
            {
                individual = Err(ValidationError::InvalidIndividualProof {
                    question: question_index,
                    choice,
                });
                break;
            }
        }
        report.record(
            format!("Valid individual proofs for question {}", question_index + 1),
            individual,
        );

        if question.blank {
            report.record(
                format!("Valid blank proof for question {}", question_index + 1),
                Err(ValidationError::BlankProofUnsupported {
                    question: question_index,
                }),
            );
            return;
        }

        report.record(
            format!(
                "Valid overall proof (without blank vote) for question {}",
                question_index + 1
            ),
            self.check_overall_proof(question_index, question, answer, choices, &context),
        );
    }

    fn check_overall_proof(
        &self,
        question_index: usize,
        question: &Question,
        answer: &Answer,
        choices: &[Ciphertext],
        context: &str,
    ) -> Result<(), ValidationError> {
        let overall_proof = answer
            .overall_proof
            .as_ref()
            .ok_or(ValidationError::MissingProof {
                question: question_index,
                proof: "overall",
            })?;

        let sum = choices
            .iter()
            .fold(Ciphertext::zero(), |acc, ct| acc.combine(ct));

        // The overall context additionally binds every choice ciphertext
        let wires: Vec<String> = choices.iter().map(Ciphertext::to_wire_string).collect();
        let context = format!("{}|{}", context, wires.join(","));
        let allowed: Vec<u64> = (question.min..=question.max).collect();

        if proof::verify_interval(
            &self.setup.election.public_key,
            &sum.alpha,
            &sum.beta,
            overall_proof,
            &allowed,
            &context,
        ) {
            Ok(())
        } else {
            Err(ValidationError::InvalidOverallProof {
                question: question_index,
            })
        }
    }
}
