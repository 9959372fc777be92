//! # tproof-circuits: Circuit Specifications
//!
//! A circuit specification is a pure function, expressed as R1CS
//! constraints, from a transition envelope (plus any specification-specific
//! fields) to accept/reject. Each specification implements
//! [`CircuitSpecification`]; everything downstream (compilation, setup,
//! proving, packaging, caching) is written once against that capability.
//!
//! ## Specifications
//!
//! - [`CollatzStep`]: "is the declared output a legal successor of the
//!   declared input". `1` is terminal: the only move out of it is a reset
//!   to any nonzero value.
//! - [`SimpleCubic`]: `y == x^3 + x + 5` with `x` private and `y` public.
//!
//! ## Witness Builders
//!
//! [`WitnessBuilder`] turns concrete values and an execution-context
//! identity into a fully assigned instance. Every instance a builder
//! produces is accepted by [`check`]; the tests in each specification
//! module hold the two sides consistent.

pub mod collatz;
pub mod cubic;
pub mod gadgets;
pub mod spec;
pub mod witness;

pub use collatz::{collatz_next, CollatzStep, COLLATZ_VERSION};
pub use cubic::SimpleCubic;
pub use spec::{check, synthesize, synthesize_shape, CircuitSpecification, Synthesized, Synthesizer};
pub use witness::{WitnessBuilder, WitnessRole};

/// Scalar field every specification is defined over.
pub type Fr = ark_bn254::Fr;
