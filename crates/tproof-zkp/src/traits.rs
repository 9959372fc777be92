//! # Proving Backend Trait
//!
//! Defines the abstract interface every proving backend implements. The
//! packager and the compiled-circuit cache are written once against it.
//!
//! ## Sealed
//!
//! The trait is sealed: only backends defined in this crate can implement
//! it. Downstream code picks a backend by type, never supplies its own.
//!
//! ## Security Invariant
//!
//! Backends check the instance against the compiled constraint system
//! before proving. An instance for a different specification, or one that
//! does not satisfy its own, surfaces as a [`BackendError`], never as an
//! invalid proof.

use std::fmt::Debug;

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand::{CryptoRng, RngCore};
use tproof_circuits::{CircuitSpecification, Fr};
use tproof_core::BackendError;

use crate::compile::CompiledConstraintSystem;

pub(crate) mod private {
    pub trait Sealed {}
}

/// Abstract interface for a proving backend.
///
/// Keys and proofs are canonically serialisable, which is what the
/// artifact and the cache persist.
pub trait ProvingBackend: private::Sealed + Debug + Default + Clone + Send + Sync + 'static {
    /// Key used to produce proofs for one constraint system.
    type ProvingKey: CanonicalSerialize + CanonicalDeserialize + Clone + Send + Sync;
    /// Key used to check proofs for one constraint system.
    type VerifyingKey: CanonicalSerialize + CanonicalDeserialize + Clone + PartialEq + Send + Sync;
    /// The proof object.
    type Proof: CanonicalSerialize + CanonicalDeserialize + Clone + PartialEq + Send + Sync;

    /// Scheme tag a verifier registers keys under.
    fn scheme(&self) -> &'static str;

    /// Compile the specification's shape.
    fn compile<S: CircuitSpecification>(&self) -> Result<CompiledConstraintSystem, BackendError> {
        CompiledConstraintSystem::from_specification::<S>()
    }

    /// Generate a key pair for `cs`. Consumes randomness: two calls never
    /// return compatible keys.
    fn setup<S: CircuitSpecification, R: RngCore + CryptoRng>(
        &self,
        cs: &CompiledConstraintSystem,
        rng: &mut R,
    ) -> Result<(Self::ProvingKey, Self::VerifyingKey), BackendError>;

    /// Prove that `instance` satisfies `cs`.
    fn prove<S: CircuitSpecification, R: RngCore + CryptoRng>(
        &self,
        cs: &CompiledConstraintSystem,
        instance: &S,
        pk: &Self::ProvingKey,
        rng: &mut R,
    ) -> Result<Self::Proof, BackendError>;

    /// Check `proof` against `vk` and the public inputs.
    ///
    /// `Ok(false)` is a well-formed proof that does not verify. A public
    /// input count the key was not generated for is an error.
    fn verify(
        &self,
        proof: &Self::Proof,
        vk: &Self::VerifyingKey,
        public_inputs: &[Fr],
    ) -> Result<bool, BackendError>;
}
