//! # tproof-core: Foundational Types for Transition Proofs
//!
//! This crate is the leaf of the workspace DAG. It defines the data shapes
//! every other crate agrees on: the fixed transition envelope embedded by
//! each circuit specification, the semantic view of a proven transition,
//! and the error taxonomy shared by witness building, proving, and the
//! compiled-circuit cache.
//!
//! ## Key Design Principles
//!
//! 1. **Fixed capacities, declared lengths.** Byte fields (`identity`,
//!    `tx_hash`) and value arrays carry an explicit declared length next to
//!    zero-padded storage. Oversized values are rejected at construction,
//!    never truncated.
//!
//! 2. **No proving-backend types here.** Values are plain `u64`s and bytes.
//!    Lifting into field elements happens in `tproof-circuits`.
//!
//! 3. **One error taxonomy.** `SpecificationViolation`, `ValidationError`,
//!    `BackendError`, and `PersistenceError`, unified by [`TproofError`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tproof-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod encoding;
pub mod envelope;
pub mod error;
pub mod transition;

pub use envelope::{
    FixedBytes, Identity, TransitionEnvelope, TxHash, ENVELOPE_VERSION, IDENTITY_CAPACITY,
    TX_HASH_CAPACITY,
};
pub use error::{
    BackendError, PersistenceError, SpecificationViolation, TproofError, ValidationError,
};
pub use transition::SemanticTransition;
