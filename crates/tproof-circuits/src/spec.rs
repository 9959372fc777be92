//! # Circuit Specification Capability
//!
//! [`CircuitSpecification`] is the single polymorphic seam between the
//! domain rules and the proving backend. A specification value doubles as
//! its own instance: the struct holds a full assignment, and
//! [`CircuitSpecification::define`] allocates it and emits constraints.
//!
//! The constraint system's *shape* must not depend on the assignment, so
//! compiling from [`CircuitSpecification::blank`] and proving from any
//! concrete instance yield identical matrices.

use ark_relations::r1cs::{
    ConstraintMatrices, ConstraintSynthesizer, ConstraintSystem, ConstraintSystemRef,
    OptimizationGoal, SynthesisError, SynthesisMode,
};
use tproof_core::{SemanticTransition, SpecificationViolation};

use crate::Fr;

/// A circuit specification: the constraint rule for one transition family.
pub trait CircuitSpecification: Clone + Send + Sync + 'static {
    /// Stable identity of the specification's structure.
    const NAME: &'static str;

    /// The all-zero assignment used for compilation and setup.
    fn blank() -> Self;

    /// Allocate this assignment in `cs` and emit the specification's
    /// constraints.
    ///
    /// Must only branch on values through constraints (boolean selection,
    /// conditional equality); host-side branching would make the shape
    /// depend on the assignment.
    fn define(&self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError>;

    /// The application view of this instance.
    fn semantic_transition(&self) -> SemanticTransition;
}

/// Adapter handing a specification to arkworks' proving machinery.
#[derive(Debug, Clone)]
pub struct Synthesizer<S>(pub S);

impl<S: CircuitSpecification> ConstraintSynthesizer<Fr> for Synthesizer<S> {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        self.0.define(cs)
    }
}

/// A finalized constraint system produced from one specification.
pub struct Synthesized {
    circuit: &'static str,
    cs: ConstraintSystemRef<Fr>,
}

impl Synthesized {
    /// Name of the specification this system was synthesized from.
    pub fn circuit(&self) -> &'static str {
        self.circuit
    }

    pub fn num_constraints(&self) -> usize {
        self.cs.num_constraints()
    }

    /// Instance variables, including the constant `1`.
    pub fn num_instance_variables(&self) -> usize {
        self.cs.num_instance_variables()
    }

    pub fn num_witness_variables(&self) -> usize {
        self.cs.num_witness_variables()
    }

    /// The R1CS matrices, or `None` if matrix construction was disabled.
    pub fn matrices(&self) -> Option<ConstraintMatrices<Fr>> {
        self.cs.to_matrices()
    }

    /// The public half of the assignment, in allocation order, without the
    /// leading constant `1`. Empty for shape-only systems.
    pub fn public_inputs(&self) -> Vec<Fr> {
        self.cs
            .borrow()
            .map(|cs| cs.instance_assignment.iter().skip(1).copied().collect())
            .unwrap_or_default()
    }

    /// The first unsatisfied constraint, if any.
    pub fn first_unsatisfied(&self) -> Result<Option<String>, SynthesisError> {
        self.cs.which_is_unsatisfied()
    }
}

impl std::fmt::Debug for Synthesized {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synthesized")
            .field("circuit", &self.circuit)
            .field("constraints", &self.num_constraints())
            .field("instance_variables", &self.num_instance_variables())
            .field("witness_variables", &self.num_witness_variables())
            .finish()
    }
}

/// Synthesize a concrete instance with its full assignment.
pub fn synthesize<S: CircuitSpecification>(instance: &S) -> Result<Synthesized, SynthesisError> {
    run(instance, SynthesisMode::Prove {
        construct_matrices: true,
    })
}

/// Synthesize the shape of `S` from its blank assignment, without values.
pub fn synthesize_shape<S: CircuitSpecification>() -> Result<Synthesized, SynthesisError> {
    run(&S::blank(), SynthesisMode::Setup)
}

fn run<S: CircuitSpecification>(
    instance: &S,
    mode: SynthesisMode,
) -> Result<Synthesized, SynthesisError> {
    let cs = ConstraintSystem::<Fr>::new_ref();
    cs.set_optimization_goal(OptimizationGoal::Constraints);
    cs.set_mode(mode);
    instance.define(cs.clone())?;
    cs.finalize();
    Ok(Synthesized {
        circuit: S::NAME,
        cs,
    })
}

/// Evaluate the specification on a concrete instance: accept, or reject
/// with the reason.
pub fn check<S: CircuitSpecification>(instance: &S) -> Result<(), SpecificationViolation> {
    let reject = |reason: String| SpecificationViolation {
        circuit: S::NAME.to_string(),
        reason,
    };
    let synthesized = synthesize(instance).map_err(|e| reject(e.to_string()))?;
    match synthesized.first_unsatisfied() {
        Ok(None) => Ok(()),
        Ok(Some(constraint)) => {
            tracing::debug!(circuit = S::NAME, %constraint, "instance rejected");
            Err(reject(format!("unsatisfied constraint {constraint}")))
        }
        Err(e) => Err(reject(e.to_string())),
    }
}
