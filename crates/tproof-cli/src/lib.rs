//! # tproof-cli: prover command-line tool
//!
//! Provides the `tproof` command-line interface over the proving stack:
//! compile and cache circuits, prove transitions, verify artifacts.
//!
//! ## Subcommands
//!
//! - `tproof simple`: prove knowledge of `x` with `x^3 + x + 5 = y`.
//! - `tproof collatz reset|next`: prove a Collatz state transition.
//! - `tproof verify`: check a proof artifact from its bytes alone.
//!
//! ```bash
//! tproof collatz reset --to 4 --identity toto.collatz
//! tproof verify collatz_proof.json
//! ```
//!
//! Compiled circuits are cached under `--cache-dir` (or
//! `TPROOF_CACHE_DIR`), so the trusted setup runs once per circuit.

pub mod collatz;
pub mod config;
pub mod prove;
pub mod simple;
pub mod verify;
