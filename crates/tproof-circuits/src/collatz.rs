//! # Collatz Step Specification
//!
//! Proves that the declared output is a legal successor of the declared
//! input:
//!
//! - `version == 1`, exactly one input and exactly one output.
//! - Input `1` is terminal. The only move out of it is a reset, and the
//!   reset target may be anything except `0`.
//! - Any other input steps by parity: even halves, odd goes to `3c + 1`.
//!
//! Parity comes from a 64-bit decomposition of the input, and the
//! terminal/step split is a constrained boolean. No host-side branching on
//! the assignment, so every instance compiles to the same shape.
//!
//! The input is private. Outputs, lengths, identity and tx hash are public.

use ark_r1cs_std::alloc::{AllocVar, AllocationMode};
use ark_r1cs_std::eq::EqGadget;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::fields::FieldVar;
use ark_r1cs_std::select::CondSelectGadget;
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};
use tproof_core::{
    Identity, SemanticTransition, TransitionEnvelope, TxHash, ValidationError, ENVELOPE_VERSION,
};

use crate::gadgets::{inverse_or_zero, u64_bits, weighted_sum, EnvelopeVar};
use crate::spec::CircuitSpecification;
use crate::witness::{WitnessBuilder, WitnessRole};
use crate::Fr;

/// Envelope version the Collatz specification accepts.
pub const COLLATZ_VERSION: u64 = ENVELOPE_VERSION;

/// The successor of `current`: `1 -> 1`, even `c -> c/2`, odd `c -> 3c+1`.
///
/// Returns `None` when `3c + 1` does not fit in a `u64`.
pub fn collatz_next(current: u64) -> Option<u64> {
    match current {
        1 => Some(1),
        c if c % 2 == 0 => Some(c / 2),
        c => c.checked_mul(3)?.checked_add(1),
    }
}

/// A single Collatz transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollatzStep {
    envelope: TransitionEnvelope<1, 1>,
}

impl CollatzStep {
    /// Leave the terminal state for `to`.
    ///
    /// `to == 0` builds, but is rejected by the specification.
    pub fn reset(to: u64, identity: &str) -> Result<Self, ValidationError> {
        let envelope =
            TransitionEnvelope::new(&[1], &[to], Identity::from_name(identity)?, TxHash::empty())?;
        Ok(Self { envelope })
    }

    /// Advance `current` by one step.
    pub fn step(current: u64, identity: &str) -> Result<Self, ValidationError> {
        let next = collatz_next(current).ok_or_else(|| {
            ValidationError::ValueOutOfRange(format!("successor of {current} overflows u64"))
        })?;
        let envelope = TransitionEnvelope::new(
            &[current],
            &[next],
            Identity::from_name(identity)?,
            TxHash::empty(),
        )?;
        Ok(Self { envelope })
    }

    /// Wrap an arbitrary envelope, legal or not.
    pub fn from_envelope(envelope: TransitionEnvelope<1, 1>) -> Self {
        Self { envelope }
    }

    /// Attach a transaction hash.
    pub fn with_tx_hash(self, tx_hash: TxHash) -> Self {
        Self {
            envelope: self.envelope.with_tx_hash(tx_hash),
        }
    }

    pub fn envelope(&self) -> &TransitionEnvelope<1, 1> {
        &self.envelope
    }
}

impl CircuitSpecification for CollatzStep {
    const NAME: &'static str = "collatz-step";

    fn blank() -> Self {
        Self {
            envelope: TransitionEnvelope::blank(),
        }
    }

    fn define(&self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let env = EnvelopeVar::allocate(cs.clone(), &self.envelope, AllocationMode::Witness)?;
        let one = FpVar::<Fr>::one();

        env.enforce_version(COLLATZ_VERSION)?;
        env.input_len.enforce_equal(&one)?;
        env.output_len.enforce_equal(&one)?;

        let input = &env.input[0];
        let output = &env.output[0];
        let is_terminal = input.is_eq(&one)?;
        let is_step = input.is_neq(&one)?;

        // Reset: output must be invertible, i.e. nonzero.
        let output_value = Fr::from(self.envelope.output_slots()[0]);
        let inverse = FpVar::new_witness(cs.clone(), || Ok(inverse_or_zero(output_value)))?;
        (output * &inverse).conditional_enforce_equal(&one, &is_terminal)?;

        // Step: parity from the low bit.
        let bits = u64_bits(cs, input, self.envelope.input_slots()[0])?;
        let halved = weighted_sum(&bits[1..]);
        let tripled = input * Fr::from(3u64) + Fr::from(1u64);
        let next = FpVar::conditionally_select(&bits[0], &tripled, &halved)?;
        output.conditional_enforce_equal(&next, &is_step)?;

        Ok(())
    }

    fn semantic_transition(&self) -> SemanticTransition {
        SemanticTransition::from(&self.envelope)
    }
}

impl WitnessBuilder for CollatzStep {
    fn roles() -> &'static [WitnessRole] {
        &[WitnessRole::Reset, WitnessRole::Step]
    }

    fn build_instance(
        role: WitnessRole,
        value: u64,
        identity: &str,
    ) -> Result<Self, ValidationError> {
        match role {
            WitnessRole::Reset => Self::reset(value, identity),
            WitnessRole::Step => Self::step(value, identity),
            WitnessRole::Single => Err(Self::unsupported(role)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{check, synthesize, synthesize_shape};
    use tproof_core::IDENTITY_CAPACITY;

    const ID: &str = "toto.collatz";

    fn assert_rejected(instance: &CollatzStep) {
        let err = check(instance).unwrap_err();
        assert_eq!(err.circuit, "collatz-step");
    }

    #[test]
    fn successor_table() {
        for (current, next) in [(4, 2), (2, 1), (1, 1), (3, 10), (7, 22)] {
            assert_eq!(collatz_next(current), Some(next));
            let instance = CollatzStep::step(current, ID).unwrap();
            assert_eq!(instance.envelope().output(), &[next]);
            check(&instance).unwrap();
        }
    }

    #[test]
    fn successor_overflow_is_reported() {
        assert_eq!(collatz_next(u64::MAX), None);
        let err = CollatzStep::step(u64::MAX, ID).unwrap_err();
        assert!(matches!(err, ValidationError::ValueOutOfRange(_)));
        // Largest odd value whose successor still fits.
        let edge = 6_148_914_691_236_517_203u64;
        assert_eq!(collatz_next(edge), Some(u64::MAX - 5));
        assert_eq!(collatz_next(edge + 2), None);
        check(&CollatzStep::step(edge, ID).unwrap()).unwrap();
    }

    #[test]
    fn reset_to_zero_is_rejected() {
        let instance = CollatzStep::reset(0, ID).unwrap();
        assert_rejected(&instance);
    }

    #[test]
    fn reset_to_nonzero_is_accepted() {
        check(&CollatzStep::reset(4, ID).unwrap()).unwrap();
        check(&CollatzStep::reset(u64::MAX, ID).unwrap()).unwrap();
    }

    #[test]
    fn leaving_terminal_state_requires_nonzero_target() {
        let env = TransitionEnvelope::new(&[1], &[0], Identity::empty(), TxHash::empty()).unwrap();
        assert_rejected(&CollatzStep::from_envelope(env));
    }

    #[test]
    fn wrong_successor_is_rejected() {
        for (input, output) in [(4, 3), (3, 5), (7, 11), (2, 2)] {
            let env =
                TransitionEnvelope::new(&[input], &[output], Identity::empty(), TxHash::empty())
                    .unwrap();
            assert_rejected(&CollatzStep::from_envelope(env));
        }
    }

    #[test]
    fn version_mismatch_is_rejected() {
        let env = CollatzStep::step(4, ID).unwrap().envelope().clone().with_version(2);
        assert_rejected(&CollatzStep::from_envelope(env));
    }

    #[test]
    fn arity_mismatch_is_rejected() {
        let no_output = TransitionEnvelope::new(&[4], &[], Identity::empty(), TxHash::empty()).unwrap();
        assert_rejected(&CollatzStep::from_envelope(no_output));
        let no_input = TransitionEnvelope::new(&[], &[2], Identity::empty(), TxHash::empty()).unwrap();
        assert_rejected(&CollatzStep::from_envelope(no_input));
    }

    #[test]
    fn identity_capacity_is_enforced_by_builder() {
        let at_capacity = "c".repeat(IDENTITY_CAPACITY);
        let instance = CollatzStep::reset(4, &at_capacity).unwrap();
        check(&instance).unwrap();

        let over = "c".repeat(IDENTITY_CAPACITY + 1);
        let err = CollatzStep::build_instance(WitnessRole::Reset, 4, &over).unwrap_err();
        assert!(matches!(err, ValidationError::CapacityExceeded { len: 257, .. }));
    }

    #[test]
    fn single_role_is_unsupported() {
        let err = CollatzStep::build_instance(WitnessRole::Single, 4, ID).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnsupportedRole {
                circuit: "collatz-step",
                role: "single".to_string(),
            }
        );
        assert!(!CollatzStep::roles().contains(&WitnessRole::Single));
    }

    #[test]
    fn semantic_transition_of_reset() {
        let t = CollatzStep::reset(4, ID).unwrap().semantic_transition();
        assert_eq!(t.version, 1);
        assert_eq!(SemanticTransition::decode_state(&t.initial_state), Some(vec![1]));
        assert_eq!(SemanticTransition::decode_state(&t.next_state), Some(vec![4]));
        assert_eq!(t.identity_name(), ID);
        assert!(t.tx_hash.is_empty());
    }

    #[test]
    fn tx_hash_is_carried_publicly() {
        let tx = TxHash::new("tx_hash", b"abc").unwrap();
        let instance = CollatzStep::step(3, ID).unwrap().with_tx_hash(tx);
        check(&instance).unwrap();
        assert_eq!(instance.semantic_transition().tx_hash, b"abc");
        let publics = synthesize(&instance).unwrap().public_inputs();
        assert_eq!(publics[14], Fr::from(0x63_62_61u64));
    }

    #[test]
    fn input_is_not_public() {
        let instance = CollatzStep::step(7, ID).unwrap();
        let publics = synthesize(&instance).unwrap().public_inputs();
        assert_eq!(publics.len(), 17);
        assert_eq!(publics[0], Fr::from(1u64)); // version
        assert_eq!(publics[3], Fr::from(22u64)); // output
        assert!(!publics.contains(&Fr::from(7u64)));
    }

    #[test]
    fn shape_does_not_depend_on_assignment() {
        let shape = synthesize_shape::<CollatzStep>().unwrap();
        let shape_matrices = shape.matrices().unwrap();
        for instance in [
            CollatzStep::reset(9, ID).unwrap(),
            CollatzStep::step(6, ID).unwrap(),
            CollatzStep::step(1, "").unwrap(),
        ] {
            let concrete = synthesize(&instance).unwrap();
            assert_eq!(concrete.num_constraints(), shape.num_constraints());
            assert_eq!(concrete.num_instance_variables(), shape.num_instance_variables());
            assert_eq!(concrete.num_witness_variables(), shape.num_witness_variables());
            let matrices = concrete.matrices().unwrap();
            assert_eq!(matrices.a, shape_matrices.a);
            assert_eq!(matrices.b, shape_matrices.b);
            assert_eq!(matrices.c, shape_matrices.c);
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn every_step_witness_is_accepted(current in 0u64..=(u64::MAX - 1) / 3) {
                let instance = CollatzStep::build_instance(WitnessRole::Step, current, "p").unwrap();
                prop_assert!(check(&instance).is_ok());
            }

            #[test]
            fn every_nonzero_reset_is_accepted(to in 1u64..=u64::MAX, name in "[a-z.]{0,64}") {
                let instance = CollatzStep::build_instance(WitnessRole::Reset, to, &name).unwrap();
                prop_assert!(check(&instance).is_ok());
            }

            #[test]
            fn altered_output_is_rejected(current in 2u64..1 << 40, delta in 1u64..1000) {
                let next = collatz_next(current).unwrap();
                let env = TransitionEnvelope::new(
                    &[current],
                    &[next + delta],
                    Identity::empty(),
                    TxHash::empty(),
                ).unwrap();
                prop_assert!(check(&CollatzStep::from_envelope(env)).is_err());
            }
        }
    }
}
