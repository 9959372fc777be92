//! # Simple CLI: prove `y = x^3 + x + 5`.
//!
//! ```bash
//! tproof simple --x 4
//! ```
//!
//! Writes `simple_proof.json` and prints the verifying key.

use anyhow::Result;
use clap::Args;
use tproof_circuits::{SimpleCubic, WitnessBuilder, WitnessRole};
use tproof_zkp::{Groth16Backend, MockBackend, ProvingBackend};

use crate::config::{BackendKind, ProverConfig};
use crate::prove::{print_summary, prove_to_file};

/// Storage key of the simple-cubic compiled circuit.
pub const SIMPLE_CIRCUIT_KEY: &str = "simple_circuit";

#[derive(Args, Debug)]
pub struct SimpleArgs {
    /// The private input.
    #[arg(long, default_value_t = 4)]
    pub x: u64,

    /// Contract name for the registration payload.
    #[arg(long, default_value = "simple")]
    pub contract: String,
}

pub fn run_simple(args: &SimpleArgs, config: &ProverConfig) -> Result<u8> {
    match config.backend {
        BackendKind::Groth16 => prove_simple::<Groth16Backend>(args, config),
        BackendKind::Mock => prove_simple::<MockBackend>(args, config),
    }
}

fn prove_simple<B: ProvingBackend>(args: &SimpleArgs, config: &ProverConfig) -> Result<u8> {
    let instance = SimpleCubic::build_instance(WitnessRole::Single, args.x, "")?;
    let proved = prove_to_file::<B, _>(
        config,
        SIMPLE_CIRCUIT_KEY,
        &args.contract,
        &instance,
        "simple_proof.json",
    )?;
    print_summary(&proved)?;
    Ok(0)
}
