//! # Compiled Constraint System
//!
//! The backend-independent record of a specification's shape: its name,
//! variable and constraint counts, and a SHA-256 digest over the R1CS
//! matrices. It is what setup binds keys to and what the cache persists
//! last.
//!
//! Compilation synthesises the blank assignment in setup mode, so it is a
//! pure function of the specification type.

use ark_ff::{BigInteger, PrimeField};
use ark_relations::r1cs::{ConstraintMatrices, SynthesisError};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use sha2::{Digest, Sha256};
use tproof_circuits::{synthesize, synthesize_shape, CircuitSpecification, Fr, Synthesized};
use tproof_core::BackendError;

/// Domain separator for the shape digest.
const SHAPE_DOMAIN: &[u8] = b"tproof/r1cs-shape/v1";

/// A compiled constraint system.
#[derive(Debug, Clone, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct CompiledConstraintSystem {
    circuit: String,
    num_instance_variables: u64,
    num_witness_variables: u64,
    num_constraints: u64,
    shape_digest: [u8; 32],
}

impl CompiledConstraintSystem {
    /// Compile `S` from its blank assignment.
    pub fn from_specification<S: CircuitSpecification>() -> Result<Self, BackendError> {
        let shape = synthesize_shape::<S>().map_err(|e| synthesis_error::<S>(e))?;
        let compiled = Self::from_synthesized::<S>(&shape)?;
        tracing::debug!(
            circuit = S::NAME,
            constraints = compiled.num_constraints,
            public_inputs = compiled.num_public_inputs(),
            "compiled constraint system"
        );
        Ok(compiled)
    }

    fn from_synthesized<S: CircuitSpecification>(
        synthesized: &Synthesized,
    ) -> Result<Self, BackendError> {
        let matrices = synthesized.matrices().ok_or_else(|| BackendError::Synthesis {
            circuit: S::NAME.to_string(),
            reason: "constraint matrices were not constructed".to_string(),
        })?;
        Ok(Self {
            circuit: S::NAME.to_string(),
            num_instance_variables: synthesized.num_instance_variables() as u64,
            num_witness_variables: synthesized.num_witness_variables() as u64,
            num_constraints: synthesized.num_constraints() as u64,
            shape_digest: shape_digest(&matrices),
        })
    }

    /// Name of the specification this system was compiled from.
    pub fn circuit(&self) -> &str {
        &self.circuit
    }

    pub fn num_constraints(&self) -> u64 {
        self.num_constraints
    }

    pub fn num_witness_variables(&self) -> u64 {
        self.num_witness_variables
    }

    /// Public inputs a verifier supplies, excluding the constant one.
    pub fn num_public_inputs(&self) -> usize {
        self.num_instance_variables.saturating_sub(1) as usize
    }

    pub fn shape_digest(&self) -> &[u8; 32] {
        &self.shape_digest
    }

    /// Fail unless `other` has the same shape as `self`.
    pub fn ensure_matches(&self, other: &Self) -> Result<(), BackendError> {
        if self == other {
            return Ok(());
        }
        Err(BackendError::ShapeMismatch {
            expected: self.circuit.clone(),
            found: other.circuit.clone(),
        })
    }
}

/// Synthesise `instance`, confirm it compiles to `cs` and satisfies it.
///
/// Every backend runs this before proving.
pub(crate) fn preflight<S: CircuitSpecification>(
    cs: &CompiledConstraintSystem,
    instance: &S,
) -> Result<Synthesized, BackendError> {
    if cs.circuit != S::NAME {
        return Err(BackendError::ShapeMismatch {
            expected: cs.circuit.clone(),
            found: S::NAME.to_string(),
        });
    }
    let synthesized = synthesize(instance).map_err(|e| synthesis_error::<S>(e))?;
    cs.ensure_matches(&CompiledConstraintSystem::from_synthesized::<S>(&synthesized)?)?;
    match synthesized.first_unsatisfied() {
        Ok(None) => Ok(synthesized),
        Ok(Some(constraint)) => Err(BackendError::Unsatisfied {
            circuit: S::NAME.to_string(),
            reason: format!("constraint {constraint} is not satisfied"),
        }),
        Err(e) => Err(synthesis_error::<S>(e)),
    }
}

/// The public-input projection of `instance`, in allocation order.
pub fn public_inputs<S: CircuitSpecification>(instance: &S) -> Result<Vec<Fr>, BackendError> {
    let synthesized = synthesize(instance).map_err(|e| synthesis_error::<S>(e))?;
    Ok(synthesized.public_inputs())
}

fn synthesis_error<S: CircuitSpecification>(e: SynthesisError) -> BackendError {
    BackendError::Synthesis {
        circuit: S::NAME.to_string(),
        reason: e.to_string(),
    }
}

fn shape_digest(matrices: &ConstraintMatrices<Fr>) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(SHAPE_DOMAIN);
    for count in [
        matrices.num_instance_variables,
        matrices.num_witness_variables,
        matrices.num_constraints,
    ] {
        hasher.update((count as u64).to_le_bytes());
    }
    for matrix in [&matrices.a, &matrices.b, &matrices.c] {
        hasher.update((matrix.len() as u64).to_le_bytes());
        for row in matrix {
            hasher.update((row.len() as u64).to_le_bytes());
            for (coeff, index) in row {
                hasher.update(coeff.into_bigint().to_bytes_le());
                hasher.update((*index as u64).to_le_bytes());
            }
        }
    }
    hasher.finalize().into()
}
