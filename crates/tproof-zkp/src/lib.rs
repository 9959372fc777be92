//! # tproof-zkp: Proving Backends and Proof Packaging
//!
//! ## Architecture
//!
//! - **Traits** (`traits.rs`): the sealed [`ProvingBackend`] trait. Mock and
//!   real backends are interchangeable at compile time.
//!
//! - **Compile** (`compile.rs`): [`CompiledConstraintSystem`], the
//!   backend-independent shape of a specification, plus the satisfiability
//!   preflight every backend runs before proving.
//!
//! - **Groth16** (`groth16.rs`): [`Groth16Backend`], Groth16 over BN254.
//!
//! - **Mock** (`mock.rs`): [`MockBackend`], transparent SHA-256 "proofs"
//!   for development and fast tests. No ZK privacy, no soundness.
//!
//! - **Artifact** (`artifact.rs`): [`ProofArtifact`], the three byte strings
//!   an external verifier consumes.
//!
//! - **Packager** (`packager.rs`): [`ProofPackager`], compile/setup/prove/
//!   verify/extract written once against the backend trait.
//!
//! ## Crate Policy
//!
//! - Depends on `tproof-core` and `tproof-circuits` internally.
//! - Only this crate can add backends.
//! - No `unsafe`.

pub mod artifact;
pub mod codec;
pub mod compile;
pub mod groth16;
pub mod mock;
pub mod packager;
pub mod registration;
pub mod traits;

pub use artifact::{DecodedArtifact, ProofArtifact};
pub use compile::{public_inputs, CompiledConstraintSystem};
pub use groth16::{Groth16Backend, GROTH16_BN254};
pub use mock::{MockBackend, MOCK_SHA256};
pub use packager::{CompiledCircuit, ProofPackager};
pub use registration::ContractRegistration;
pub use traits::ProvingBackend;
