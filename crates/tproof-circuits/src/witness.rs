//! Witness builders: concrete values plus an identity in, a fully assigned
//! instance out.

use std::fmt;

use tproof_core::ValidationError;

use crate::spec::CircuitSpecification;

/// What a built instance is meant to prove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WitnessRole {
    /// Leave the terminal state for a fresh starting value.
    Reset,
    /// Advance the current value by one step.
    Step,
    /// The only role of a single-relation specification.
    Single,
}

impl fmt::Display for WitnessRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Reset => "reset",
            Self::Step => "step",
            Self::Single => "single",
        };
        f.write_str(name)
    }
}

/// Builds instances of a specification from concrete values.
///
/// Every instance returned by [`WitnessBuilder::build_instance`] is accepted
/// by [`crate::check`].
pub trait WitnessBuilder: CircuitSpecification + Sized {
    /// Roles this specification supports.
    fn roles() -> &'static [WitnessRole];

    /// Build an instance for `role`.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnsupportedRole`] for a role outside
    /// [`WitnessBuilder::roles`], [`ValidationError::CapacityExceeded`] for
    /// an oversized identity, and [`ValidationError::ValueOutOfRange`] when
    /// the successor value does not fit.
    fn build_instance(role: WitnessRole, value: u64, identity: &str)
        -> Result<Self, ValidationError>;

    /// The error returned for a role outside [`WitnessBuilder::roles`].
    fn unsupported(role: WitnessRole) -> ValidationError {
        ValidationError::UnsupportedRole {
            circuit: Self::NAME,
            role: role.to_string(),
        }
    }
}
