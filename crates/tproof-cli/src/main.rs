//! # tproof CLI entry point
//!
//! Parses command-line arguments, resolves the prover configuration and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tproof_cli::collatz::{run_collatz, CollatzArgs};
use tproof_cli::config::{BackendKind, ProverConfig};
use tproof_cli::simple::{run_simple, SimpleArgs};
use tproof_cli::verify::{run_verify, VerifyArgs};

/// tproof: zero-knowledge proofs of state transitions.
///
/// Compiles circuit specifications to R1CS, runs the trusted setup once per
/// circuit, proves transitions and packages the proof, verifying key and
/// public witness for an external verifier.
#[derive(Parser, Debug)]
#[command(name = "tproof", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Directory holding compiled circuits. Overrides TPROOF_CACHE_DIR.
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Output directory for generated artifacts. Overrides TPROOF_OUTPUT_DIR.
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Proving backend. Overrides TPROOF_BACKEND.
    #[arg(long, global = true, value_enum)]
    backend: Option<BackendKind>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Prove knowledge of x with x^3 + x + 5 = y.
    Simple(SimpleArgs),

    /// Prove a Collatz reset or step.
    Collatz(CollatzArgs),

    /// Verify a proof artifact.
    Verify(VerifyArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }

    let config = match ProverConfig::from_env() {
        Ok(config) => config.with_overrides(cli.cache_dir, cli.output_dir, cli.backend),
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::from(1);
        }
    };
    tracing::debug!(
        cache_dir = %config.cache_dir.display(),
        output_dir = %config.output_dir.display(),
        backend = %config.backend,
        "resolved configuration"
    );

    let result = match cli.command {
        Commands::Simple(args) => run_simple(&args, &config),
        Commands::Collatz(args) => run_collatz(&args, &config),
        Commands::Verify(args) => run_verify(&args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
