//! # Proof Packager
//!
//! Written once against [`ProvingBackend`]: compile a specification, run
//! its one-time setup, turn an instance into a [`ProofArtifact`], verify
//! an artifact the way an external verifier would, and read the semantic
//! transition back out.
//!
//! Every backend failure is returned to the caller. Nothing is discarded.

use std::fmt;

use ark_serialize::Compress;
use rand::{CryptoRng, RngCore};
use tproof_circuits::CircuitSpecification;
use tproof_core::{BackendError, SemanticTransition, TproofError, ValidationError};

use crate::artifact::ProofArtifact;
use crate::codec;
use crate::compile::{public_inputs, CompiledConstraintSystem};
use crate::registration::ContractRegistration;
use crate::traits::ProvingBackend;

/// A constraint system with its key pair. Read-only once produced.
#[derive(Clone)]
pub struct CompiledCircuit<B: ProvingBackend> {
    pub cs: CompiledConstraintSystem,
    pub pk: B::ProvingKey,
    pub vk: B::VerifyingKey,
}

impl<B: ProvingBackend> fmt::Debug for CompiledCircuit<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledCircuit")
            .field("cs", &self.cs)
            .finish_non_exhaustive()
    }
}

/// Packages instances into artifacts with backend `B`.
#[derive(Debug, Default, Clone)]
pub struct ProofPackager<B: ProvingBackend> {
    backend: B,
}

impl<B: ProvingBackend> ProofPackager<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Compile `S` into its constraint system.
    pub fn compile<S: CircuitSpecification>(&self) -> Result<CompiledConstraintSystem, BackendError> {
        self.backend.compile::<S>()
    }

    /// One-time setup for `cs`.
    pub fn setup<S: CircuitSpecification, R: RngCore + CryptoRng>(
        &self,
        cs: &CompiledConstraintSystem,
        rng: &mut R,
    ) -> Result<(B::ProvingKey, B::VerifyingKey), BackendError> {
        self.backend.setup::<S, R>(cs, rng)
    }

    /// Compile and set up `S` in one go.
    pub fn compile_and_setup<S: CircuitSpecification, R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
    ) -> Result<CompiledCircuit<B>, BackendError> {
        let cs = self.compile::<S>()?;
        let (pk, vk) = self.setup::<S, R>(&cs, rng)?;
        Ok(CompiledCircuit { cs, pk, vk })
    }

    /// Prove `instance` and package the proof, the verifying key and the
    /// public projection of `instance`.
    pub fn generate_proof<S: CircuitSpecification, R: RngCore + CryptoRng>(
        &self,
        cs: &CompiledConstraintSystem,
        instance: &S,
        pk: &B::ProvingKey,
        vk: &B::VerifyingKey,
        rng: &mut R,
    ) -> Result<ProofArtifact, BackendError> {
        let proof = self.backend.prove(cs, instance, pk, rng)?;
        let publics = public_inputs(instance)?;
        let artifact = ProofArtifact::pack::<B>(&proof, vk, &publics)?;
        tracing::debug!(
            circuit = S::NAME,
            scheme = self.backend.scheme(),
            proof_bytes = artifact.proof.len(),
            "proof packaged"
        );
        Ok(artifact)
    }

    /// Verify an artifact from its three byte strings alone.
    pub fn verify_artifact(&self, artifact: &ProofArtifact) -> Result<bool, BackendError> {
        let decoded = artifact.decode::<B>()?;
        self.backend
            .verify(&decoded.proof, &decoded.verifying_key, &decoded.public_inputs)
    }

    /// The semantic transition behind `artifact`, read from the instance it
    /// was built from.
    ///
    /// # Errors
    ///
    /// [`ValidationError::ArtifactMismatch`] when the artifact's public
    /// witness is not the public projection of `instance`.
    pub fn extract_data<S: CircuitSpecification>(
        &self,
        artifact: &ProofArtifact,
        instance: &S,
    ) -> Result<SemanticTransition, TproofError> {
        let packaged = artifact.public_inputs()?;
        let expected = public_inputs(instance)?;
        if packaged != expected {
            let detail = match packaged.iter().zip(&expected).position(|(a, b)| a != b) {
                Some(index) => format!(
                    "public input {index} differs from the projection of the `{}` instance",
                    S::NAME
                ),
                None => format!(
                    "public witness has {} inputs, instance of `{}` projects {}",
                    packaged.len(),
                    S::NAME,
                    expected.len()
                ),
            };
            return Err(ValidationError::ArtifactMismatch(detail).into());
        }
        Ok(instance.semantic_transition())
    }

    /// Registration payload for `contract_name`, seeded with the initial
    /// state of `transition`.
    pub fn registration(
        &self,
        contract_name: &str,
        vk: &B::VerifyingKey,
        transition: &SemanticTransition,
    ) -> Result<ContractRegistration, BackendError> {
        Ok(ContractRegistration {
            verifier: self.backend.scheme().to_string(),
            verifying_key: codec::encode(vk, Compress::Yes)?,
            contract_name: contract_name.to_string(),
            initial_state: transition.initial_state.clone(),
        })
    }
}
