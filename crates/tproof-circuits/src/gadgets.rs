//! # Envelope Gadget
//!
//! Allocates a [`TransitionEnvelope`] inside a constraint system and
//! provides the small arithmetic helpers the specifications share.
//!
//! ## Allocation Order
//!
//! Public variables are allocated in a fixed order, which is also the order
//! of the public-input projection:
//!
//! 1. `version`, `input_len`, `output_len`
//! 2. `output` slots
//! 3. `identity_len`, then the identity limbs
//! 4. the tx-hash limbs
//!
//! The `input` slots are allocated with the mode chosen by the caller.
//!
//! Byte fields are packed into little-endian limbs of [`LIMB_BYTES`] bytes,
//! so every limb is strictly below the field modulus.

use ark_ff::{PrimeField, Zero};
use ark_r1cs_std::alloc::{AllocVar, AllocationMode};
use ark_r1cs_std::boolean::Boolean;
use ark_r1cs_std::eq::EqGadget;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::fields::FieldVar;
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};
use tproof_core::TransitionEnvelope;

use crate::Fr;

/// Bytes per packed field limb.
pub const LIMB_BYTES: usize = 31;

/// Number of limbs needed to pack `capacity` bytes.
pub const fn limb_count(capacity: usize) -> usize {
    capacity.div_ceil(LIMB_BYTES)
}

/// Pack bytes into little-endian field limbs of [`LIMB_BYTES`] bytes.
pub fn pack_bytes(bytes: &[u8]) -> Vec<Fr> {
    bytes
        .chunks(LIMB_BYTES)
        .map(Fr::from_le_bytes_mod_order)
        .collect()
}

/// Allocated envelope variables.
#[derive(Clone)]
pub struct EnvelopeVar {
    pub version: FpVar<Fr>,
    pub input_len: FpVar<Fr>,
    pub input: Vec<FpVar<Fr>>,
    pub output_len: FpVar<Fr>,
    pub output: Vec<FpVar<Fr>>,
    pub identity_len: FpVar<Fr>,
    pub identity: Vec<FpVar<Fr>>,
    pub tx_hash: Vec<FpVar<Fr>>,
}

impl EnvelopeVar {
    /// Allocate `envelope` in `cs`. Metadata, outputs and byte fields are
    /// public; inputs use `input_mode`.
    pub fn allocate<const IN: usize, const OUT: usize>(
        cs: ConstraintSystemRef<Fr>,
        envelope: &TransitionEnvelope<IN, OUT>,
        input_mode: AllocationMode,
    ) -> Result<Self, SynthesisError> {
        let public = |value: Fr| FpVar::new_input(cs.clone(), || Ok(value));

        let version = public(Fr::from(envelope.version()))?;
        let input_len = public(Fr::from(envelope.input_len() as u64))?;
        let output_len = public(Fr::from(envelope.output_len() as u64))?;
        let output = envelope
            .output_slots()
            .iter()
            .map(|v| public(Fr::from(*v)))
            .collect::<Result<Vec<_>, _>>()?;

        let identity_len = public(Fr::from(envelope.identity().len() as u64))?;
        let identity = pack_bytes(envelope.identity().padded())
            .into_iter()
            .map(public)
            .collect::<Result<Vec<_>, _>>()?;
        let tx_hash = pack_bytes(envelope.tx_hash().padded())
            .into_iter()
            .map(public)
            .collect::<Result<Vec<_>, _>>()?;

        let input = envelope
            .input_slots()
            .iter()
            .map(|v| FpVar::new_variable(cs.clone(), || Ok(Fr::from(*v)), input_mode))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            version,
            input_len,
            input,
            output_len,
            output,
            identity_len,
            identity,
            tx_hash,
        })
    }

    /// Enforce `version == expected`.
    pub fn enforce_version(&self, expected: u64) -> Result<(), SynthesisError> {
        self.version.enforce_equal(&FpVar::constant(Fr::from(expected)))
    }
}

/// Allocate the 64 little-endian bits of `value` as witnesses and enforce
/// that they recompose to `var`.
pub fn u64_bits(
    cs: ConstraintSystemRef<Fr>,
    var: &FpVar<Fr>,
    value: u64,
) -> Result<Vec<Boolean<Fr>>, SynthesisError> {
    let bits = (0..u64::BITS)
        .map(|i| Boolean::new_witness(cs.clone(), || Ok((value >> i) & 1 == 1)))
        .collect::<Result<Vec<_>, _>>()?;
    weighted_sum(&bits).enforce_equal(var)?;
    Ok(bits)
}

/// `sum(bits[i] * 2^i)`. Linear, emits no constraints.
pub fn weighted_sum(bits: &[Boolean<Fr>]) -> FpVar<Fr> {
    let mut coeff = Fr::from(1u64);
    let mut acc = FpVar::<Fr>::zero();
    for bit in bits {
        acc += FpVar::from(bit.clone()) * coeff;
        coeff += coeff;
    }
    acc
}

/// `value^{-1}`, or zero when `value` is zero.
pub fn inverse_or_zero(value: Fr) -> Fr {
    ark_ff::Field::inverse(&value).unwrap_or_else(Fr::zero)
}
