//! End-to-end runs of the subcommand handlers against a temporary cache and
//! output directory, using the mock backend.

use std::fs;

use tproof_cli::collatz::{run_collatz, CollatzArgs, CollatzCommand, COLLATZ_CIRCUIT_KEY};
use tproof_cli::config::{BackendKind, ProverConfig};
use tproof_cli::simple::{run_simple, SimpleArgs, SIMPLE_CIRCUIT_KEY};
use tproof_cli::verify::{run_verify, VerifyArgs};
use tproof_zkp::{ContractRegistration, ProofArtifact};

fn config(dir: &tempfile::TempDir) -> ProverConfig {
    ProverConfig::default().with_overrides(
        Some(dir.path().join("circuits")),
        Some(dir.path().join("out")),
        Some(BackendKind::Mock),
    )
}

fn collatz(command: CollatzCommand) -> CollatzArgs {
    CollatzArgs {
        command,
        identity: "toto.collatz".to_string(),
        contract: "collatz".to_string(),
    }
}

#[test]
fn simple_proves_and_verifies() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(&dir);
    let args = SimpleArgs {
        x: 4,
        contract: "simple".to_string(),
    };
    assert_eq!(run_simple(&args, &cfg).unwrap(), 0);

    let artifact = cfg.output_dir.join("simple_proof.json");
    assert!(artifact.is_file());
    assert!(cfg
        .cache_dir
        .join(format!("{SIMPLE_CIRCUIT_KEY}.bin"))
        .is_file());

    let code = run_verify(&VerifyArgs { artifact }, &cfg).unwrap();
    assert_eq!(code, 0);
}

#[test]
fn collatz_reset_writes_registration_with_initial_state() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(&dir);
    let code = run_collatz(&collatz(CollatzCommand::Reset { to: 4 }), &cfg).unwrap();
    assert_eq!(code, 0);

    let json = fs::read_to_string(cfg.output_dir.join("collatz_registration.json")).unwrap();
    let registration: ContractRegistration = serde_json::from_str(&json).unwrap();
    assert_eq!(registration.contract_name, "collatz");
    assert_eq!(registration.verifier, "mock-sha256");
    assert_eq!(registration.initial_state, 1u64.to_be_bytes().to_vec());
    assert!(cfg
        .cache_dir
        .join(format!("{COLLATZ_CIRCUIT_KEY}.bin"))
        .is_file());
}

#[test]
fn collatz_step_reuses_cached_circuit() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(&dir);
    run_collatz(&collatz(CollatzCommand::Reset { to: 4 }), &cfg).unwrap();
    let cached = fs::read(cfg.cache_dir.join(format!("{COLLATZ_CIRCUIT_KEY}.bin"))).unwrap();

    run_collatz(&collatz(CollatzCommand::Next { current: 4 }), &cfg).unwrap();
    let again = fs::read(cfg.cache_dir.join(format!("{COLLATZ_CIRCUIT_KEY}.bin"))).unwrap();
    assert_eq!(cached, again);

    let artifact = cfg.output_dir.join("collatz_proof.json");
    assert_eq!(run_verify(&VerifyArgs { artifact }, &cfg).unwrap(), 0);
}

#[test]
fn collatz_reset_to_zero_fails() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(&dir);
    assert!(run_collatz(&collatz(CollatzCommand::Reset { to: 0 }), &cfg).is_err());
    assert!(!cfg.output_dir.join("collatz_proof.json").exists());
}

#[test]
fn oversized_identity_fails() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(&dir);
    let mut args = collatz(CollatzCommand::Next { current: 7 });
    args.identity = "x".repeat(257);
    assert!(run_collatz(&args, &cfg).is_err());
}

#[test]
fn tampered_proof_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(&dir);
    run_collatz(&collatz(CollatzCommand::Next { current: 6 }), &cfg).unwrap();

    let path = cfg.output_dir.join("collatz_proof.json");
    let mut artifact = ProofArtifact::from_json(&fs::read_to_string(&path).unwrap()).unwrap();
    let last = artifact.proof.len() - 1;
    artifact.proof[last] ^= 0x01;
    fs::write(&path, artifact.to_json().unwrap()).unwrap();

    assert_eq!(run_verify(&VerifyArgs { artifact: path }, &cfg).unwrap(), 2);
}

#[test]
fn missing_artifact_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(&dir);
    let args = VerifyArgs {
        artifact: dir.path().join("nope.json"),
    };
    assert!(run_verify(&args, &cfg).is_err());
}
