//! # Groth16 Proving Backend
//!
//! Groth16 over BN254 via `ark-groth16`.
//!
//! ## Properties
//!
//! - **Proof size:** 128 bytes compressed (constant, independent of circuit size).
//! - **Verification time:** Constant (3 pairing checks).
//! - **Trusted setup:** Required, circuit-specific. Keys from one setup are
//!   incompatible with keys from any other, which is why the compiled
//!   circuit is cached and never regenerated.

use ark_bn254::Bn254;
use ark_groth16::Groth16;
use ark_snark::{CircuitSpecificSetupSNARK, SNARK};
use rand::{CryptoRng, RngCore};
use tproof_circuits::{CircuitSpecification, Fr, Synthesizer};
use tproof_core::BackendError;

use crate::compile::{preflight, CompiledConstraintSystem};
use crate::traits::{private, ProvingBackend};

/// Scheme tag for Groth16 over BN254.
pub const GROTH16_BN254: &str = "groth16-bn254";

/// Groth16 proving backend over BN254.
#[derive(Debug, Default, Clone, Copy)]
pub struct Groth16Backend;

impl private::Sealed for Groth16Backend {}

impl ProvingBackend for Groth16Backend {
    type ProvingKey = ark_groth16::ProvingKey<Bn254>;
    type VerifyingKey = ark_groth16::VerifyingKey<Bn254>;
    type Proof = ark_groth16::Proof<Bn254>;

    fn scheme(&self) -> &'static str {
        GROTH16_BN254
    }

    fn setup<S: CircuitSpecification, R: RngCore + CryptoRng>(
        &self,
        cs: &CompiledConstraintSystem,
        rng: &mut R,
    ) -> Result<(Self::ProvingKey, Self::VerifyingKey), BackendError> {
        cs.ensure_matches(&self.compile::<S>()?)?;
        tracing::info!(circuit = S::NAME, constraints = cs.num_constraints(), "groth16 setup");
        Groth16::<Bn254>::circuit_specific_setup(Synthesizer(S::blank()), rng)
            .map_err(|e| BackendError::Setup(e.to_string()))
    }

    fn prove<S: CircuitSpecification, R: RngCore + CryptoRng>(
        &self,
        cs: &CompiledConstraintSystem,
        instance: &S,
        pk: &Self::ProvingKey,
        rng: &mut R,
    ) -> Result<Self::Proof, BackendError> {
        preflight(cs, instance)?;
        let proof = Groth16::<Bn254>::prove(pk, Synthesizer(instance.clone()), rng)
            .map_err(|e| BackendError::Proving(e.to_string()))?;
        tracing::debug!(circuit = S::NAME, "groth16 proof generated");
        Ok(proof)
    }

    fn verify(
        &self,
        proof: &Self::Proof,
        vk: &Self::VerifyingKey,
        public_inputs: &[Fr],
    ) -> Result<bool, BackendError> {
        let expected = vk.gamma_abc_g1.len().saturating_sub(1);
        if public_inputs.len() != expected {
            return Err(BackendError::PublicInputCount {
                expected,
                found: public_inputs.len(),
            });
        }
        let valid = Groth16::<Bn254>::verify(vk, public_inputs, proof)
            .map_err(|e| BackendError::Verification(e.to_string()))?;
        tracing::debug!(valid, "groth16 proof checked");
        Ok(valid)
    }
}
