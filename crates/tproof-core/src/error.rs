//! # Error Types: Structured Error Hierarchy
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - [`SpecificationViolation`]: an instance fails its own specification's
//!   constraints. A conforming witness builder never produces one, so
//!   seeing it at runtime indicates a builder/specification inconsistency.
//! - [`ValidationError`]: caller-supplied data violates a documented
//!   precondition (oversized identity, unsupported role, overflow).
//! - [`BackendError`]: the proving backend could not compile, set up,
//!   prove, verify, or (de)serialize.
//! - [`PersistenceError`]: the compiled-circuit cache could not read or
//!   write its blob, or the blob is corrupt.
//!
//! None of these are recovered locally; callers decide whether to retry.

use thiserror::Error;

/// Top-level error type for transition proofs.
#[derive(Error, Debug)]
pub enum TproofError {
    /// An instance does not satisfy its specification.
    #[error(transparent)]
    Specification(#[from] SpecificationViolation),

    /// Caller-supplied data violates a precondition.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The proving backend signalled a failure.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// The compiled-circuit cache failed.
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// An instance was rejected by its circuit specification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("instance rejected by circuit `{circuit}`: {reason}")]
pub struct SpecificationViolation {
    /// Name of the rejecting circuit specification.
    pub circuit: String,
    /// The first unsatisfied constraint, or the synthesis failure.
    pub reason: String,
}

/// Caller-supplied data violates a documented precondition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A fixed-capacity byte field received more bytes than it can hold.
    #[error("{field} is {len} bytes, capacity is {capacity}")]
    CapacityExceeded {
        /// Envelope field name.
        field: &'static str,
        /// Supplied length in bytes.
        len: usize,
        /// Field capacity in bytes.
        capacity: usize,
    },

    /// A bounded value array received more entries than it can hold.
    #[error("{field} has {len} entries, capacity is {capacity}")]
    TooManyValues {
        /// Envelope field name.
        field: &'static str,
        /// Supplied number of entries.
        len: usize,
        /// Array capacity.
        capacity: usize,
    },

    /// The requested witness role is not supported by the specification.
    #[error("circuit `{circuit}` does not support the `{role}` witness role")]
    UnsupportedRole {
        /// Circuit specification name.
        circuit: &'static str,
        /// Requested role.
        role: String,
    },

    /// The specification does not carry an execution-context identity.
    #[error("circuit `{circuit}` does not carry an execution-context identity")]
    IdentityNotCarried {
        /// Circuit specification name.
        circuit: &'static str,
    },

    /// A computed value does not fit the host representation.
    #[error("value out of range: {0}")]
    ValueOutOfRange(String),

    /// An artifact was paired with an instance it was not produced from.
    #[error("artifact does not match instance: {0}")]
    ArtifactMismatch(String),
}

/// The proving backend signalled a failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Constraint synthesis failed.
    #[error("synthesis failed for `{circuit}`: {reason}")]
    Synthesis {
        /// Circuit specification name.
        circuit: String,
        /// Underlying synthesis error.
        reason: String,
    },

    /// The instance compiles to a different constraint system than the one
    /// supplied.
    #[error("constraint system mismatch: compiled for `{expected}`, instance is `{found}`")]
    ShapeMismatch {
        /// Circuit the constraint system was compiled from.
        expected: String,
        /// Circuit the instance belongs to.
        found: String,
    },

    /// The instance does not satisfy the constraint system.
    #[error("unsatisfiable witness for `{circuit}`: {reason}")]
    Unsatisfied {
        /// Circuit specification name.
        circuit: String,
        /// The first unsatisfied constraint.
        reason: String,
    },

    /// Trusted setup failed.
    #[error("setup failed: {0}")]
    Setup(String),

    /// Proof generation failed.
    #[error("proving failed: {0}")]
    Proving(String),

    /// Verification could not be carried out.
    #[error("verification failed: {0}")]
    Verification(String),

    /// The number of public inputs does not match the verifying key.
    #[error("verifying key expects {expected} public inputs, got {found}")]
    PublicInputCount {
        /// Public inputs the verifying key was generated for.
        expected: usize,
        /// Public inputs supplied.
        found: usize,
    },

    /// Canonical (de)serialization of key material, proofs, or public inputs
    /// failed.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// The compiled-circuit cache failed.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// The underlying storage could not be read or written.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored blob could not be decoded.
    #[error("corrupt compiled circuit at `{key}`: {reason}")]
    Corrupt {
        /// Storage key.
        key: String,
        /// Decoding failure.
        reason: String,
    },

    /// The stored blob belongs to a different circuit specification.
    #[error("compiled circuit at `{key}` was built for `{stored}`, not `{requested}`")]
    CircuitMismatch {
        /// Storage key.
        key: String,
        /// Circuit recorded in the blob.
        stored: String,
        /// Circuit requested by the caller.
        requested: String,
    },

    /// Nothing is stored under the key.
    #[error("no compiled circuit stored at `{0}`")]
    NotFound(String),

    /// The storage key is not a plain file-name-safe identifier.
    #[error("invalid storage key {0:?}: must match [a-z0-9][a-z0-9._-]{{0,127}}")]
    InvalidKey(String),

    /// Compiling or setting up the circuit for first-time population failed.
    #[error("could not populate `{key}`: {source}")]
    Populate {
        /// Storage key.
        key: String,
        /// Backend failure.
        #[source]
        source: BackendError,
    },
}
