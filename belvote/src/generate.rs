//! Ballot generation: the prover side of the protocol.
//!
//! Given a voter's secret code and plaintext selections, produces a complete
//! signed ballot that the verifier accepts. Generation ends with a self-check:
//! the finished ballot is run through the full verification pipeline against a
//! fresh registry, and generation fails rather than emit a ballot its own
//! verifier would reject.

use crate::*;
use rand_core::{CryptoRng, RngCore};

/// Generate a signed ballot for the given selections.
///
/// `choices` holds one selection vector per question, aligned with the setup's
/// question list. Entries are 0 or 1, one per listed answer; blank-capable
/// questions carry one extra leading entry for the blank choice.
pub fn generate_ballot<R: RngCore + CryptoRng>(
    setup: &ElectionSetup,
    secret_code: &str,
    choices: &[Vec<u64>],
    rng: &mut R,
) -> Result<Ballot, Error> {
    if !credential::check_voting_code(secret_code) {
        return Err(Error::MalformedVotingCode);
    }
    let pair = credential::derive_credential(&setup.election.uuid, secret_code);
    if !setup.is_registered(&pair.public) {
        return Err(Error::UnknownVotingCode);
    }

    let questions = &setup.election.questions;
    if choices.len() != questions.len() {
        return Err(Error::WrongNumberOfChoiceLists {
            expected: questions.len(),
            got: choices.len(),
        });
    }

    let context = format!("{}|{}", setup.fingerprint, pair.public.to_hex());
    let mut answers = Vec::with_capacity(questions.len());
    for (question_index, (question, selections)) in questions.iter().zip(choices).enumerate() {
        answers.push(generate_answer(
            setup,
            question_index,
            question,
            selections,
            &context,
            rng,
        )?);
    }

    let signed_hash = canonical::hash_without_signature_parts(
        &setup.election.uuid,
        &setup.fingerprint,
        &pair.public,
        &answers,
    );
    let signature = signature::sign(&pair.private, &signed_hash, rng);

    let ballot = Ballot::from_payload(BallotPayload {
        election_uuid: setup.election.uuid.clone(),
        election_hash: setup.fingerprint.clone(),
        credential: pair.public,
        answers,
        signature,
    });

    // A ballot the verifier rejects must never leave the prover
    let registry = BallotRegistry::new();
    let report = Verifier::new(setup, &registry).verify(&ballot);
    if let Some(failure) = report.failures().next() {
        return Err(Error::SelfCheckFailed(failure.message.clone()));
    }
    Ok(ballot)
}

fn generate_answer<R: RngCore + CryptoRng>(
    setup: &ElectionSetup,
    question_index: usize,
    question: &Question,
    selections: &[u64],
    context: &str,
    rng: &mut R,
) -> Result<Answer, Error> {
    if question.kind == QuestionKind::NonHomomorphic {
        return Err(Error::NonHomomorphicQuestion {
            question: question_index,
        });
    }

    let expected = question.answers.len() + question.blank as usize;
    if selections.len() != expected {
        return Err(Error::WrongNumberOfChoices {
            question: question_index,
            expected,
            got: selections.len(),
        });
    }
    if selections.iter().any(|&m| m > 1) {
        return Err(Error::ChoiceOutOfRange {
            question: question_index,
        });
    }
    check_selection_policy(question_index, question, selections)?;

    let y = &setup.election.public_key;

    // Encrypt each selection with fresh randomness, keeping the randomness
    // for the proofs.
    let mut ciphertexts = Vec::with_capacity(selections.len());
    let mut randomness = Vec::with_capacity(selections.len());
    for &m in selections {
        let r = Scalar::random(rng);
        ciphertexts.push(Ciphertext {
            alpha: Point::generator() * r,
            beta: *y * r + Point::generator() * Scalar::from_u64(m),
        });
        randomness.push(r);
    }

    let mut individual_proofs = Vec::with_capacity(selections.len());
    for ((ciphertext, r), &m) in ciphertexts.iter().zip(&randomness).zip(selections) {
        individual_proofs.push(proof::prove_interval(
            y,
            &ciphertext.alpha,
            &ciphertext.beta,
            r,
            m,
            &[0, 1],
            context,
            rng,
        )?);
    }

    // Both the overall and the blank proof bind the full choice-ciphertext
    // list into their challenge context, on top of the election and
    // credential binding.
    let wires: Vec<String> = ciphertexts.iter().map(Ciphertext::to_wire_string).collect();
    let bound_context = format!("{}|{}", context, wires.join(","));

    let (overall_proof, blank_proof) = if question.blank {
        (
            Some(vec![]),
            Some(generate_blank_proof(
                y,
                &ciphertexts,
                &randomness,
                selections,
                &bound_context,
                rng,
            )),
        )
    } else {
        let sum = ciphertexts
            .iter()
            .fold(Ciphertext::zero(), |acc, ct| acc.combine(ct));
        let r_sum = randomness
            .iter()
            .fold(Scalar::zero(), |acc, &r| acc + r);
        let m_sum: u64 = selections.iter().sum();

        let allowed: Vec<u64> = (question.min..=question.max).collect();
        (
            Some(proof::prove_interval(
                y,
                &sum.alpha,
                &sum.beta,
                &r_sum,
                m_sum,
                &allowed,
                &bound_context,
                rng,
            )?),
            None,
        )
    };

    Ok(Answer {
        choices: Choices::Multi(ciphertexts),
        proof: None,
        individual_proofs: Some(individual_proofs),
        overall_proof,
        blank_proof,
    })
}

/// Enforce the question's selection policy on the plaintext choices before
/// anything is encrypted.
fn check_selection_policy(
    question_index: usize,
    question: &Question,
    selections: &[u64],
) -> Result<(), Error> {
    if question.blank {
        // Index 0 is the blank marker; a blank vote excludes all others,
        // otherwise the remaining selections must satisfy [min, max].
        let rest_sum: u64 = selections[1..].iter().sum();
        if selections[0] == 1 {
            if rest_sum != 0 {
                return Err(Error::BlankVoteNotExclusive {
                    question: question_index,
                });
            }
        } else if rest_sum < question.min || rest_sum > question.max {
            return Err(Error::SelectionCountOutOfRange {
                question: question_index,
                count: rest_sum,
                min: question.min,
                max: question.max,
            });
        }
    } else {
        let count: u64 = selections.iter().sum();
        if count < question.min || count > question.max {
            return Err(Error::SelectionCountOutOfRange {
                question: question_index,
                count,
                min: question.min,
                max: question.max,
            });
        }
    }
    Ok(())
}

/// Blank proof: "the blank ciphertext encrypts 0" or "the rest-sum encrypts
/// 0", whichever is true for these selections.
fn generate_blank_proof<R: RngCore + CryptoRng>(
    y: &Point,
    ciphertexts: &[Ciphertext],
    randomness: &[Scalar],
    selections: &[u64],
    context: &str,
    rng: &mut R,
) -> Vec<ProofTranscript> {
    let first = ciphertexts[0];
    let rest_sum = ciphertexts[1..]
        .iter()
        .fold(Ciphertext::zero(), |acc, ct| acc.combine(ct));

    let first_is_zero = selections[0] == 0;
    let witness = if first_is_zero {
        randomness[0]
    } else {
        randomness[1..]
            .iter()
            .fold(Scalar::zero(), |acc, &r| acc + r)
    };

    proof::prove_blank(y, &first, &rest_sum, &witness, first_is_zero, context, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    const CODE: &str = "s5Rqs-2BEmdQ-jS7qs-Kv2nLh";

    fn test_setup(rng: &mut ChaCha20Rng, questions: Vec<Question>) -> ElectionSetup {
        let uuid = "nV3AmL8rjyKaSL".to_string();
        let pair = credential::derive_credential(&uuid, CODE);
        ElectionSetup {
            fingerprint: "rdkcspQGItOfIMt1C9DDcyKKPmprzmCaWM/01fiLmDE".to_string(),
            credentials_weights: vec![CredentialWeight {
                credential: pair.public.to_hex(),
                weight: None,
            }],
            election: Election {
                uuid,
                public_key: Point::generator() * Scalar::random(rng),
                questions,
            },
        }
    }

    fn simple_question() -> Question {
        Question {
            kind: QuestionKind::Homomorphic,
            blank: false,
            min: 0,
            max: 1,
            answers: vec!["Yes".to_string(), "No".to_string()],
        }
    }

    #[test]
    fn rejects_malformed_code() {
        let mut rng = ChaCha20Rng::seed_from_u64(10);
        let setup = test_setup(&mut rng, vec![simple_question()]);
        assert!(matches!(
            generate_ballot(&setup, "not-a-code", &[vec![1, 0]], &mut rng),
            Err(Error::MalformedVotingCode)
        ));
    }

    #[test]
    fn rejects_unregistered_code() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let mut setup = test_setup(&mut rng, vec![simple_question()]);
        setup.credentials_weights.clear();
        assert!(matches!(
            generate_ballot(&setup, CODE, &[vec![1, 0]], &mut rng),
            Err(Error::UnknownVotingCode)
        ));
    }

    #[test]
    fn rejects_wrong_choice_shapes() {
        let mut rng = ChaCha20Rng::seed_from_u64(12);
        let setup = test_setup(&mut rng, vec![simple_question()]);

        assert!(matches!(
            generate_ballot(&setup, CODE, &[], &mut rng),
            Err(Error::WrongNumberOfChoiceLists { expected: 1, got: 0 })
        ));
        assert!(matches!(
            generate_ballot(&setup, CODE, &[vec![1]], &mut rng),
            Err(Error::WrongNumberOfChoices { .. })
        ));
        assert!(matches!(
            generate_ballot(&setup, CODE, &[vec![2, 0]], &mut rng),
            Err(Error::ChoiceOutOfRange { .. })
        ));
        assert!(matches!(
            generate_ballot(&setup, CODE, &[vec![1, 1]], &mut rng),
            Err(Error::SelectionCountOutOfRange { count: 2, .. })
        ));
    }

    #[test]
    fn blank_vote_must_be_exclusive() {
        let mut rng = ChaCha20Rng::seed_from_u64(13);
        let mut question = simple_question();
        question.blank = true;
        question.min = 1;
        let setup = test_setup(&mut rng, vec![question]);

        assert!(matches!(
            generate_ballot(&setup, CODE, &[vec![1, 1, 0]], &mut rng),
            Err(Error::BlankVoteNotExclusive { .. })
        ));
        // Non-blank vote still honors min
        assert!(matches!(
            generate_ballot(&setup, CODE, &[vec![0, 0, 0]], &mut rng),
            Err(Error::SelectionCountOutOfRange { count: 0, .. })
        ));
        // Blank vote bypasses min
        assert!(generate_ballot(&setup, CODE, &[vec![1, 0, 0]], &mut rng).is_ok());
    }

    #[test]
    fn non_homomorphic_generation_is_refused() {
        let mut rng = ChaCha20Rng::seed_from_u64(14);
        let mut question = simple_question();
        question.kind = QuestionKind::NonHomomorphic;
        let setup = test_setup(&mut rng, vec![question]);
        assert!(matches!(
            generate_ballot(&setup, CODE, &[vec![1, 0]], &mut rng),
            Err(Error::NonHomomorphicQuestion { question: 0 })
        ));
    }
}
