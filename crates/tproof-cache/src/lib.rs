//! # tproof-cache: Compiled-Circuit Cache
//!
//! Compiles and sets up each circuit specification once, persists the
//! result, and hands the same keys back on every later run.
//!
//! - `store.rs`: the [`CircuitStore`] persistence collaborator, with a
//!   filesystem and an in-memory implementation.
//! - `layout.rs`: the blob layout (proving key, verifying key, constraint
//!   system, in that order).
//! - `cache.rs`: [`CircuitCache`], with per-key setup arbitration.

pub mod cache;
pub mod layout;
pub mod store;

pub use cache::CircuitCache;
pub use store::{validate_key, CircuitStore, FsCircuitStore, MemoryCircuitStore};
