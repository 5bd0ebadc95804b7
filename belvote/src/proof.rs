//! Non-interactive zero-knowledge proofs over ballot ciphertexts.
//!
//! The workhorse is the interval-membership proof: a disjunctive (OR) Sigma
//! protocol proving that a ciphertext (alpha, beta) = (g^r, Y^r * g^m)
//! encrypts a value m from a finite allowed set, without revealing which.
//! Every branch except the real one is simulated from a random transcript;
//! the real branch's challenge is fixed by the Fiat-Shamir hash so that the
//! challenges always sum to it. The same engine proves each encrypted choice
//! is 0 or 1 and that the selection total lies in the question's range.
//!
//! The blank-vote proof is a separate two-branch disjunction with its own
//! hash domain, so its challenges can never collide with interval-proof
//! challenges over the same ciphertexts.

use crate::*;
use rand_core::{CryptoRng, RngCore};

/// The Fiat-Shamir challenge binding a proof to its context and to every
/// branch commitment, in branch order.
fn challenge_interval(context: &str, alpha: &Point, beta: &Point, commitments: &[Point]) -> Scalar {
    let encoded: Vec<String> = commitments.iter().map(Point::to_hex).collect();
    hash::hash_to_scalar(&format!(
        "prove|{}|{},{}|{}",
        context,
        alpha.to_hex(),
        beta.to_hex(),
        encoded.join(",")
    ))
}

/// Reconstruct the branch commitments a verifier derives from a transcript:
/// A_i = g^s_i * alpha^c_i, B_i = Y^s_i * (beta * (g^m_i)^-1)^c_i.
fn branch_commitments(
    y: &Point,
    alpha: &Point,
    beta: &Point,
    transcript: &ProofTranscript,
    value: u64,
) -> (Point, Point) {
    let a = Point::generator() * transcript.response + *alpha * transcript.challenge;
    let g_m = Point::generator() * Scalar::from_u64(value);
    let b = *y * transcript.response + (*beta + (-g_m)) * transcript.challenge;
    (a, b)
}

/// Verify a disjunctive interval-membership proof: one transcript per allowed
/// value, accepted iff the challenges sum to the hash of all reconstructed
/// commitments. This single equation checks every branch at once; it can only
/// hold if exactly one branch was proven for real.
pub fn verify_interval(
    y: &Point,
    alpha: &Point,
    beta: &Point,
    transcripts: &[ProofTranscript],
    allowed: &[u64],
    context: &str,
) -> bool {
    if transcripts.len() != allowed.len() || transcripts.is_empty() {
        return false;
    }

    let mut commitments = Vec::with_capacity(transcripts.len() * 2);
    let mut challenge_sum = Scalar::zero();
    for (transcript, &value) in transcripts.iter().zip(allowed) {
        let (a, b) = branch_commitments(y, alpha, beta, transcript, value);
        commitments.push(a);
        commitments.push(b);
        challenge_sum = challenge_sum + transcript.challenge;
    }

    challenge_interval(context, alpha, beta, &commitments) == challenge_sum
}

/// Produce a disjunctive interval-membership proof for a ciphertext known to
/// encrypt `value` with randomness `r`. Branches for other allowed values are
/// simulated; the real branch commits (g^w, Y^w) and its challenge is fixed
/// as h minus the sum of the simulated challenges.
pub fn prove_interval<R: RngCore + CryptoRng>(
    y: &Point,
    alpha: &Point,
    beta: &Point,
    r: &Scalar,
    value: u64,
    allowed: &[u64],
    context: &str,
    rng: &mut R,
) -> Result<Vec<ProofTranscript>, Error> {
    let real = allowed
        .iter()
        .position(|&m| m == value)
        .ok_or(Error::ValueNotInAllowedSet)?;

    let w = Scalar::random(rng);
    let mut transcripts = Vec::with_capacity(allowed.len());
    let mut commitments = Vec::with_capacity(allowed.len() * 2);

    for (i, &m) in allowed.iter().enumerate() {
        if i == real {
            // Placeholder transcript; fixed after hashing
            transcripts.push(ProofTranscript {
                challenge: Scalar::zero(),
                response: Scalar::zero(),
            });
            commitments.push(Point::generator() * w);
            commitments.push(*y * w);
        } else {
            let transcript = ProofTranscript {
                challenge: Scalar::random(rng),
                response: Scalar::random(rng),
            };
            let (a, b) = branch_commitments(y, alpha, beta, &transcript, m);
            transcripts.push(transcript);
            commitments.push(a);
            commitments.push(b);
        }
    }

    let h = challenge_interval(context, alpha, beta, &commitments);
    let mut simulated_sum = Scalar::zero();
    for (i, transcript) in transcripts.iter().enumerate() {
        if i != real {
            simulated_sum = simulated_sum + transcript.challenge;
        }
    }

    let real_challenge = h - simulated_sum;
    transcripts[real] = ProofTranscript {
        challenge: real_challenge,
        response: w - *r * real_challenge,
    };
    Ok(transcripts)
}

/// The blank-proof challenge, domain-separated from interval proofs.
fn challenge_blank(context: &str, commitments: &[Point]) -> Scalar {
    let encoded: Vec<String> = commitments.iter().map(Point::to_hex).collect();
    hash::hash_to_scalar(&format!("bproof0|{}|{}", context, encoded.join(",")))
}

/// Two-branch disjunctive proof that either the first choice ciphertext or
/// the sum of the remaining choice ciphertexts encrypts zero. `witness` is
/// the encryption randomness of whichever ciphertext is zero, selected by
/// `first_is_zero`. `context` must bind the election fingerprint, the
/// credential, and the full choice-ciphertext list, so the proof cannot be
/// replayed against a different set of choices. Transcripts come back in
/// fixed branch order [first-choice branch, rest-sum branch].
///
/// Only generation is implemented; verification of blank-capable questions is
/// surfaced as an unsupported check by the verifier.
pub fn prove_blank<R: RngCore + CryptoRng>(
    y: &Point,
    first: &Ciphertext,
    rest_sum: &Ciphertext,
    witness: &Scalar,
    first_is_zero: bool,
    context: &str,
    rng: &mut R,
) -> Vec<ProofTranscript> {
    let simulated = ProofTranscript {
        challenge: Scalar::random(rng),
        response: Scalar::random(rng),
    };
    let simulated_over = if first_is_zero { rest_sum } else { first };
    let sim_a = Point::generator() * simulated.response + simulated_over.alpha * simulated.challenge;
    let sim_b = *y * simulated.response + simulated_over.beta * simulated.challenge;

    let w = Scalar::random(rng);
    let real_a = Point::generator() * w;
    let real_b = *y * w;

    // Commitments are hashed in branch order regardless of which is real
    let commitments = if first_is_zero {
        [real_a, real_b, sim_a, sim_b]
    } else {
        [sim_a, sim_b, real_a, real_b]
    };
    let h = challenge_blank(context, &commitments);

    let real_challenge = h - simulated.challenge;
    let real = ProofTranscript {
        challenge: real_challenge,
        response: w - *witness * real_challenge,
    };

    if first_is_zero {
        vec![real, simulated]
    } else {
        vec![simulated, real]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn encrypt<R: rand_core::RngCore + rand_core::CryptoRng>(
        y: &Point,
        m: u64,
        rng: &mut R,
    ) -> (Ciphertext, Scalar) {
        let r = Scalar::random(rng);
        let ct = Ciphertext {
            alpha: Point::generator() * r,
            beta: *y * r + Point::generator() * Scalar::from_u64(m),
        };
        (ct, r)
    }

    fn test_key(rng: &mut ChaCha20Rng) -> Point {
        Point::generator() * Scalar::random(rng)
    }

    #[test]
    fn completeness_binary_set() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let y = test_key(&mut rng);
        for m in 0..=1 {
            let (ct, r) = encrypt(&y, m, &mut rng);
            let proof =
                prove_interval(&y, &ct.alpha, &ct.beta, &r, m, &[0, 1], "ctx", &mut rng).unwrap();
            assert_eq!(proof.len(), 2);
            assert!(verify_interval(&y, &ct.alpha, &ct.beta, &proof, &[0, 1], "ctx"));
        }
    }

    #[test]
    fn completeness_wider_interval() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let y = test_key(&mut rng);
        let allowed = [1u64, 2, 3, 4];
        for &m in &allowed {
            let (ct, r) = encrypt(&y, m, &mut rng);
            let proof =
                prove_interval(&y, &ct.alpha, &ct.beta, &r, m, &allowed, "ctx", &mut rng).unwrap();
            assert!(verify_interval(&y, &ct.alpha, &ct.beta, &proof, &allowed, "ctx"));
        }
    }

    #[test]
    fn value_outside_set_cannot_be_proven() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let y = test_key(&mut rng);
        let (ct, r) = encrypt(&y, 2, &mut rng);
        assert!(matches!(
            prove_interval(&y, &ct.alpha, &ct.beta, &r, 2, &[0, 1], "ctx", &mut rng),
            Err(Error::ValueNotInAllowedSet)
        ));

        // Claiming the ciphertext encrypts a different in-set value fails
        let forged =
            prove_interval(&y, &ct.alpha, &ct.beta, &r, 1, &[0, 1], "ctx", &mut rng).unwrap();
        assert!(!verify_interval(&y, &ct.alpha, &ct.beta, &forged, &[0, 1], "ctx"));
    }

    #[test]
    fn tampered_transcripts_are_rejected() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let y = test_key(&mut rng);
        let (ct, r) = encrypt(&y, 1, &mut rng);
        let proof = prove_interval(&y, &ct.alpha, &ct.beta, &r, 1, &[0, 1], "ctx", &mut rng).unwrap();

        for i in 0..2 {
            let mut tampered = proof.clone();
            tampered[i].challenge = tampered[i].challenge + Scalar::one();
            assert!(!verify_interval(&y, &ct.alpha, &ct.beta, &tampered, &[0, 1], "ctx"));

            let mut tampered = proof.clone();
            tampered[i].response = tampered[i].response + Scalar::one();
            assert!(!verify_interval(&y, &ct.alpha, &ct.beta, &tampered, &[0, 1], "ctx"));
        }
    }

    #[test]
    fn context_binding() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let y = test_key(&mut rng);
        let (ct, r) = encrypt(&y, 0, &mut rng);
        let proof = prove_interval(&y, &ct.alpha, &ct.beta, &r, 0, &[0, 1], "ctx", &mut rng).unwrap();
        assert!(!verify_interval(&y, &ct.alpha, &ct.beta, &proof, &[0, 1], "other-ctx"));
    }

    #[test]
    fn wrong_length_proofs_are_rejected() {
        let mut rng = ChaCha20Rng::seed_from_u64(6);
        let y = test_key(&mut rng);
        let (ct, r) = encrypt(&y, 0, &mut rng);
        let proof = prove_interval(&y, &ct.alpha, &ct.beta, &r, 0, &[0, 1], "ctx", &mut rng).unwrap();
        assert!(!verify_interval(&y, &ct.alpha, &ct.beta, &proof[..1], &[0, 1], "ctx"));
        assert!(!verify_interval(&y, &ct.alpha, &ct.beta, &[], &[], "ctx"));
    }

    #[test]
    fn blank_proof_challenges_sum_to_hash() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let y = test_key(&mut rng);

        // Voter did not pick blank: first choice encrypts 0
        let (first, r0) = encrypt(&y, 0, &mut rng);
        let (rest, _) = encrypt(&y, 1, &mut rng);
        let proof = prove_blank(&y, &first, &rest, &r0, true, "ctx", &mut rng);
        assert_eq!(proof.len(), 2);

        // The real branch must satisfy its own verification equations:
        // A0 = g^s0 * alpha0^c0 and B0 = Y^s0 * beta0^c0 reproduce (g^w, Y^w)
        let a0 = Point::generator() * proof[0].response + first.alpha * proof[0].challenge;
        let b0 = y * proof[0].response + first.beta * proof[0].challenge;
        let a_s = Point::generator() * proof[1].response + rest.alpha * proof[1].challenge;
        let b_s = y * proof[1].response + rest.beta * proof[1].challenge;
        let h = challenge_blank("ctx", &[a0, b0, a_s, b_s]);
        assert_eq!(proof[0].challenge + proof[1].challenge, h);
    }

    #[test]
    fn blank_proof_blank_vote_branch() {
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        let y = test_key(&mut rng);

        // Voter picked blank: first encrypts 1, the rest sum to 0
        let (first, _) = encrypt(&y, 1, &mut rng);
        let (rest, r_s) = encrypt(&y, 0, &mut rng);
        let proof = prove_blank(&y, &first, &rest, &r_s, false, "ctx", &mut rng);

        let a0 = Point::generator() * proof[0].response + first.alpha * proof[0].challenge;
        let b0 = y * proof[0].response + first.beta * proof[0].challenge;
        let a_s = Point::generator() * proof[1].response + rest.alpha * proof[1].challenge;
        let b_s = y * proof[1].response + rest.beta * proof[1].challenge;
        let h = challenge_blank("ctx", &[a0, b0, a_s, b_s]);
        assert_eq!(proof[0].challenge + proof[1].challenge, h);
    }
}
