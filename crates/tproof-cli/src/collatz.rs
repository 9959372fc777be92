//! # Collatz CLI: prove resets and steps of a Collatz sequence.
//!
//! ```bash
//! # Seed a new sequence at 4 for the `toto.collatz` execution context:
//! tproof collatz reset --to 4 --identity toto.collatz
//!
//! # Prove the step out of the current value:
//! tproof collatz next --current 4 --identity toto.collatz
//! ```
//!
//! Each command writes `collatz_proof.json` and
//! `collatz_registration.json`, and prints the initial state and
//! verifying key a platform needs to register the contract.

use anyhow::Result;
use clap::{Args, Subcommand};
use tproof_circuits::{CollatzStep, WitnessBuilder, WitnessRole};
use tproof_zkp::{Groth16Backend, MockBackend, ProvingBackend};

use crate::config::{BackendKind, ProverConfig};
use crate::prove::{print_summary, prove_to_file, write_json};

/// Storage key of the Collatz compiled circuit.
pub const COLLATZ_CIRCUIT_KEY: &str = "collatz_circuit";

#[derive(Args, Debug)]
pub struct CollatzArgs {
    #[command(subcommand)]
    pub command: CollatzCommand,

    /// Execution-context identity bound into the proof (at most 256 bytes).
    #[arg(long, global = true, default_value = "toto.collatz")]
    pub identity: String,

    /// Contract name for the registration payload.
    #[arg(long, global = true, default_value = "collatz")]
    pub contract: String,
}

#[derive(Subcommand, Debug)]
pub enum CollatzCommand {
    /// Leave the terminal state 1 for a fresh starting value.
    Reset {
        /// New starting value. Must be nonzero.
        #[arg(long, default_value_t = 4)]
        to: u64,
    },

    /// Advance the current value by one step.
    Next {
        /// Current value of the sequence.
        #[arg(long)]
        current: u64,
    },
}

impl CollatzCommand {
    fn role_and_value(&self) -> (WitnessRole, u64) {
        match self {
            Self::Reset { to } => (WitnessRole::Reset, *to),
            Self::Next { current } => (WitnessRole::Step, *current),
        }
    }
}

pub fn run_collatz(args: &CollatzArgs, config: &ProverConfig) -> Result<u8> {
    match config.backend {
        BackendKind::Groth16 => prove_collatz::<Groth16Backend>(args, config),
        BackendKind::Mock => prove_collatz::<MockBackend>(args, config),
    }
}

fn prove_collatz<B: ProvingBackend>(args: &CollatzArgs, config: &ProverConfig) -> Result<u8> {
    let (role, value) = args.command.role_and_value();
    let instance = CollatzStep::build_instance(role, value, &args.identity)?;
    let proved = prove_to_file::<B, _>(
        config,
        COLLATZ_CIRCUIT_KEY,
        &args.contract,
        &instance,
        "collatz_proof.json",
    )?;
    write_json(
        &config.output_dir,
        "collatz_registration.json",
        &serde_json::to_string_pretty(&proved.registration)?,
    )?;
    print_summary(&proved)?;
    Ok(0)
}
