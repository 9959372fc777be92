//! Simple cubic specification: `y == x^3 + x + 5`, `x` private, `y` public.
//!
//! Carries no envelope and no execution-context identity.

use ark_ff::{BigInteger, PrimeField};
use ark_r1cs_std::alloc::AllocVar;
use ark_r1cs_std::eq::EqGadget;
use ark_r1cs_std::fields::fp::FpVar;
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};
use tproof_core::{SemanticTransition, ValidationError};

use crate::spec::CircuitSpecification;
use crate::witness::{WitnessBuilder, WitnessRole};
use crate::Fr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleCubic {
    x: u64,
    y: Fr,
}

impl SimpleCubic {
    /// An arbitrary assignment, satisfying or not.
    pub fn new(x: u64, y: Fr) -> Self {
        Self { x, y }
    }

    /// The satisfying assignment for `x`.
    pub fn witness(x: u64) -> Self {
        let fx = Fr::from(x);
        Self {
            x,
            y: fx * fx * fx + fx + Fr::from(5u64),
        }
    }

    pub fn x(&self) -> u64 {
        self.x
    }

    pub fn y(&self) -> Fr {
        self.y
    }
}

impl CircuitSpecification for SimpleCubic {
    const NAME: &'static str = "simple-cubic";

    fn blank() -> Self {
        Self::new(0, Fr::from(0u64))
    }

    fn define(&self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let x = FpVar::new_witness(cs.clone(), || Ok(Fr::from(self.x)))?;
        let y = FpVar::new_input(cs, || Ok(self.y))?;
        let x_cubed = &x * &x * &x;
        (x_cubed + &x + Fr::from(5u64)).enforce_equal(&y)
    }

    fn semantic_transition(&self) -> SemanticTransition {
        SemanticTransition {
            version: 0,
            initial_state: Vec::new(),
            next_state: self.y.into_bigint().to_bytes_be(),
            identity: Vec::new(),
            tx_hash: Vec::new(),
        }
    }
}

impl WitnessBuilder for SimpleCubic {
    fn roles() -> &'static [WitnessRole] {
        &[WitnessRole::Single]
    }

    fn build_instance(
        role: WitnessRole,
        value: u64,
        identity: &str,
    ) -> Result<Self, ValidationError> {
        if role != WitnessRole::Single {
            return Err(Self::unsupported(role));
        }
        if !identity.is_empty() {
            return Err(ValidationError::IdentityNotCarried {
                circuit: Self::NAME,
            });
        }
        Ok(Self::witness(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{check, synthesize};

    #[test]
    fn witness_for_three_is_35() {
        let instance = SimpleCubic::witness(3);
        assert_eq!(instance.y(), Fr::from(35u64));
        check(&instance).unwrap();
        assert_eq!(synthesize(&instance).unwrap().public_inputs(), vec![Fr::from(35u64)]);
    }

    #[test]
    fn wrong_output_is_rejected() {
        let err = check(&SimpleCubic::new(3, Fr::from(36u64))).unwrap_err();
        assert_eq!(err.circuit, "simple-cubic");
    }

    #[test]
    fn large_x_does_not_overflow() {
        check(&SimpleCubic::witness(u64::MAX)).unwrap();
    }

    #[test]
    fn builder_rejects_identity_and_foreign_roles() {
        assert!(matches!(
            SimpleCubic::build_instance(WitnessRole::Single, 3, "toto"),
            Err(ValidationError::IdentityNotCarried { .. })
        ));
        assert!(matches!(
            SimpleCubic::build_instance(WitnessRole::Step, 3, ""),
            Err(ValidationError::UnsupportedRole { .. })
        ));
        assert_eq!(
            SimpleCubic::build_instance(WitnessRole::Single, 3, "").unwrap(),
            SimpleCubic::witness(3)
        );
    }

    #[test]
    fn next_state_is_big_endian_y() {
        let t = SimpleCubic::witness(3).semantic_transition();
        assert_eq!(t.next_state.len(), 32);
        assert_eq!(t.next_state[31], 35);
        assert!(t.next_state[..31].iter().all(|b| *b == 0));
        assert!(t.initial_state.is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn every_cubic_witness_is_accepted(x in any::<u64>()) {
                prop_assert!(check(&SimpleCubic::witness(x)).is_ok());
            }
        }
    }
}
