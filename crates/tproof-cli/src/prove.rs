//! Shared proving flow: load or create the compiled circuit, prove, write
//! the artifact.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use rand::rngs::OsRng;
use tproof_cache::{CircuitCache, FsCircuitStore};
use tproof_circuits::CircuitSpecification;
use tproof_core::encoding::to_base64;
use tproof_core::SemanticTransition;
use tproof_zkp::{CompiledCircuit, ContractRegistration, ProofArtifact, ProvingBackend};

use crate::config::ProverConfig;

/// Result of one proving run.
pub struct Proved<B: ProvingBackend> {
    pub compiled: Arc<CompiledCircuit<B>>,
    pub artifact: ProofArtifact,
    pub artifact_path: PathBuf,
    pub transition: SemanticTransition,
    pub registration: ContractRegistration,
}

/// Prove `instance` against the circuit cached under `key` and write the
/// artifact to `{output_dir}/{artifact_name}`.
pub fn prove_to_file<B: ProvingBackend, S: CircuitSpecification>(
    config: &ProverConfig,
    key: &str,
    contract_name: &str,
    instance: &S,
    artifact_name: &str,
) -> Result<Proved<B>> {
    let cache = CircuitCache::new(B::default(), FsCircuitStore::new(&config.cache_dir));
    let compiled = cache
        .load_or_create::<S>(key)
        .with_context(|| format!("loading compiled circuit `{key}`"))?;

    let packager = cache.packager();
    let artifact = packager
        .generate_proof(&compiled.cs, instance, &compiled.pk, &compiled.vk, &mut OsRng)
        .with_context(|| format!("proving `{}`", S::NAME))?;
    let transition = packager
        .extract_data(&artifact, instance)
        .context("reading the proven transition")?;
    let registration = packager.registration(contract_name, &compiled.vk, &transition)?;

    let artifact_path = write_json(&config.output_dir, artifact_name, &artifact.to_json()?)?;
    tracing::info!(path = %artifact_path.display(), circuit = S::NAME, "artifact written");

    Ok(Proved {
        compiled,
        artifact,
        artifact_path,
        transition,
        registration,
    })
}

/// Write `contents` to `{dir}/{name}`, creating `dir` if needed.
pub fn write_json(dir: &Path, name: &str, contents: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(name);
    fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// Print the verifying key and the registration payload.
pub fn print_summary<B: ProvingBackend>(proved: &Proved<B>) -> Result<()> {
    println!("Proof generated and saved to {}", proved.artifact_path.display());
    if !proved.transition.initial_state.is_empty() {
        println!("Initial state: {}", to_base64(&proved.transition.initial_state));
    }
    println!("Verifying key: {}", to_base64(&proved.artifact.verifying_key));
    println!("Registration payload:");
    println!("{}", serde_json::to_string_pretty(&proved.registration)?);
    Ok(())
}
