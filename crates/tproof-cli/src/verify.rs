//! # Verify CLI: check a proof artifact the way an external verifier would.
//!
//! ```bash
//! tproof verify collatz_proof.json
//! ```
//!
//! Uses only the three byte strings in the artifact. Exits `0` when the
//! proof verifies and `2` when it does not.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tproof_zkp::{Groth16Backend, MockBackend, ProofArtifact, ProofPackager, ProvingBackend};

use crate::config::{BackendKind, ProverConfig};

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Path to a proof artifact JSON file.
    pub artifact: PathBuf,
}

pub fn run_verify(args: &VerifyArgs, config: &ProverConfig) -> Result<u8> {
    let json = fs::read_to_string(&args.artifact)
        .with_context(|| format!("reading {}", args.artifact.display()))?;
    let artifact = ProofArtifact::from_json(&json)
        .with_context(|| format!("parsing {}", args.artifact.display()))?;
    let valid = match config.backend {
        BackendKind::Groth16 => verify_with::<Groth16Backend>(&artifact)?,
        BackendKind::Mock => verify_with::<MockBackend>(&artifact)?,
    };
    if valid {
        println!("OK: proof verifies ({})", args.artifact.display());
        Ok(0)
    } else {
        println!("FAIL: proof does not verify ({})", args.artifact.display());
        Ok(2)
    }
}

fn verify_with<B: ProvingBackend>(artifact: &ProofArtifact) -> Result<bool> {
    let packager = ProofPackager::new(B::default());
    let valid = packager
        .verify_artifact(artifact)
        .with_context(|| format!("verifying with {}", packager.backend().scheme()))?;
    Ok(valid)
}
