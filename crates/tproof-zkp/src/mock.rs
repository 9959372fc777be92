//! # Mock Proving Backend
//!
//! A deterministic, transparent backend for development and testing.
//! Produces SHA-256-based "proofs" that are verifiable but provide **no
//! zero-knowledge guarantees** and **no soundness**: anyone holding the
//! verifying key can recompute a proof for any public inputs.
//!
//! ## How It Works
//!
//! - `setup()` draws a 32-byte trapdoor. The verifying key carries
//!   `binding = SHA256(trapdoor)`, the constraint-system shape digest, and
//!   the public input count.
//! - `prove()` runs the same satisfiability preflight as the real backend,
//!   then computes
//!   `SHA256(domain || binding || shape_digest || public_inputs)`.
//! - `verify()` recomputes the digest from the verifying key and checks
//!   equality.
//!
//! Because setup consumes randomness, two setups of the same circuit yield
//! incompatible keys, exactly like a real trusted setup.
//!
//! ## Security Warning
//!
//! **NOT PRIVATE, NOT SOUND.** Never register a mock verifying key with a
//! platform that settles real state.

use ark_ff::{BigInteger, PrimeField};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use tproof_circuits::{CircuitSpecification, Fr};
use tproof_core::BackendError;

use crate::compile::{preflight, CompiledConstraintSystem};
use crate::traits::{private, ProvingBackend};

/// Scheme tag for mock proofs.
pub const MOCK_SHA256: &str = "mock-sha256";

const PROOF_DOMAIN: &[u8] = b"tproof/mock-proof/v1";

/// Mock proving key: the shape it was generated for and the setup trapdoor.
#[derive(Debug, Clone, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct MockProvingKey {
    shape_digest: [u8; 32],
    trapdoor: [u8; 32],
}

/// Mock verifying key.
#[derive(Debug, Clone, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct MockVerifyingKey {
    shape_digest: [u8; 32],
    num_public_inputs: u64,
    binding: [u8; 32],
}

/// A mock proof: one SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct MockProof {
    digest: [u8; 32],
}

/// Transparent SHA-256 backend. No ZK privacy.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockBackend;

impl private::Sealed for MockBackend {}

impl ProvingBackend for MockBackend {
    type ProvingKey = MockProvingKey;
    type VerifyingKey = MockVerifyingKey;
    type Proof = MockProof;

    fn scheme(&self) -> &'static str {
        MOCK_SHA256
    }

    fn setup<S: CircuitSpecification, R: RngCore + CryptoRng>(
        &self,
        cs: &CompiledConstraintSystem,
        rng: &mut R,
    ) -> Result<(Self::ProvingKey, Self::VerifyingKey), BackendError> {
        cs.ensure_matches(&self.compile::<S>()?)?;
        tracing::info!(circuit = S::NAME, "mock setup");
        let mut trapdoor = [0u8; 32];
        rng.fill_bytes(&mut trapdoor);
        let pk = MockProvingKey {
            shape_digest: *cs.shape_digest(),
            trapdoor,
        };
        let vk = MockVerifyingKey {
            shape_digest: *cs.shape_digest(),
            num_public_inputs: cs.num_public_inputs() as u64,
            binding: Sha256::digest(trapdoor).into(),
        };
        Ok((pk, vk))
    }

    fn prove<S: CircuitSpecification, R: RngCore + CryptoRng>(
        &self,
        cs: &CompiledConstraintSystem,
        instance: &S,
        pk: &Self::ProvingKey,
        _rng: &mut R,
    ) -> Result<Self::Proof, BackendError> {
        if &pk.shape_digest != cs.shape_digest() {
            return Err(BackendError::Proving(format!(
                "proving key was not generated for `{}`",
                cs.circuit()
            )));
        }
        let synthesized = preflight(cs, instance)?;
        let binding: [u8; 32] = Sha256::digest(pk.trapdoor).into();
        let digest = proof_digest(&binding, &pk.shape_digest, &synthesized.public_inputs());
        tracing::debug!(circuit = S::NAME, "mock proof generated");
        Ok(MockProof { digest })
    }

    fn verify(
        &self,
        proof: &Self::Proof,
        vk: &Self::VerifyingKey,
        public_inputs: &[Fr],
    ) -> Result<bool, BackendError> {
        let expected = vk.num_public_inputs as usize;
        if public_inputs.len() != expected {
            return Err(BackendError::PublicInputCount {
                expected,
                found: public_inputs.len(),
            });
        }
        let valid = proof.digest == proof_digest(&vk.binding, &vk.shape_digest, public_inputs);
        tracing::debug!(valid, "mock proof checked");
        Ok(valid)
    }
}

fn proof_digest(binding: &[u8; 32], shape_digest: &[u8; 32], public_inputs: &[Fr]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(PROOF_DOMAIN);
    hasher.update(binding);
    hasher.update(shape_digest);
    hasher.update((public_inputs.len() as u64).to_le_bytes());
    for input in public_inputs {
        hasher.update(input.into_bigint().to_bytes_le());
    }
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use tproof_circuits::{CollatzStep, SimpleCubic};

    use crate::compile::public_inputs;

    #[test]
    fn collatz_proof_verifies() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let cs = MockBackend.compile::<CollatzStep>().unwrap();
        let (pk, vk) = MockBackend.setup::<CollatzStep, _>(&cs, &mut rng).unwrap();
        let instance = CollatzStep::step(7, "toto.collatz").unwrap();
        let proof = MockBackend.prove(&cs, &instance, &pk, &mut rng).unwrap();
        let publics = public_inputs(&instance).unwrap();
        assert!(MockBackend.verify(&proof, &vk, &publics).unwrap());

        let mut tampered = publics.clone();
        tampered[3] = Fr::from(23u64);
        assert!(!MockBackend.verify(&proof, &vk, &tampered).unwrap());
    }

    #[test]
    fn proofs_are_deterministic() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let cs = MockBackend.compile::<SimpleCubic>().unwrap();
        let (pk, _) = MockBackend.setup::<SimpleCubic, _>(&cs, &mut rng).unwrap();
        let instance = SimpleCubic::witness(4);
        let a = MockBackend.prove(&cs, &instance, &pk, &mut rng).unwrap();
        let b = MockBackend.prove(&cs, &instance, &pk, &mut rng).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn setups_are_not_interchangeable() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let cs = MockBackend.compile::<SimpleCubic>().unwrap();
        let (pk_a, vk_a) = MockBackend.setup::<SimpleCubic, _>(&cs, &mut rng).unwrap();
        let (_, vk_b) = MockBackend.setup::<SimpleCubic, _>(&cs, &mut rng).unwrap();
        assert_ne!(vk_a, vk_b);
        let instance = SimpleCubic::witness(4);
        let proof = MockBackend.prove(&cs, &instance, &pk_a, &mut rng).unwrap();
        let publics = public_inputs(&instance).unwrap();
        assert!(!MockBackend.verify(&proof, &vk_b, &publics).unwrap());
    }

    #[test]
    fn foreign_proving_key_is_rejected() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let cubic = MockBackend.compile::<SimpleCubic>().unwrap();
        let collatz = MockBackend.compile::<CollatzStep>().unwrap();
        let (cubic_pk, _) = MockBackend.setup::<SimpleCubic, _>(&cubic, &mut rng).unwrap();
        let instance = CollatzStep::reset(4, "toto.collatz").unwrap();
        let err = MockBackend
            .prove(&collatz, &instance, &cubic_pk, &mut rng)
            .unwrap_err();
        assert!(matches!(err, BackendError::Proving(_)));
    }

    #[test]
    fn wrong_public_input_count_is_an_error() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let cs = MockBackend.compile::<SimpleCubic>().unwrap();
        let (_, vk) = MockBackend.setup::<SimpleCubic, _>(&cs, &mut rng).unwrap();
        let proof = MockProof { digest: [0; 32] };
        let err = MockBackend.verify(&proof, &vk, &[]).unwrap_err();
        assert_eq!(err, BackendError::PublicInputCount { expected: 1, found: 0 });
    }
}
