//! # Compiled-Circuit Cache
//!
//! `load_or_create` returns the one compiled circuit for a storage key: on
//! first use it compiles, runs setup and persists; afterwards it reads the
//! stored keys back verbatim. Setup is never silently re-run, because keys
//! from a second setup are incompatible with anything already published.
//!
//! ## Concurrency
//!
//! "Check the store, else set up and write" runs under a per-key lock, so
//! racing callers for one key in one process perform exactly one setup.
//! Different keys proceed in parallel. Across processes sharing a store,
//! first-time population goes through [`CircuitStore::write_new`]: the
//! first blob to land wins, and a loser discards its own keys and returns
//! the stored ones. Only [`CircuitCache::recreate`] replaces a stored blob.
//!
//! Lock entries are dropped once no caller holds them, so the lock table
//! only grows with the number of keys in use at the same time.
//!
//! ## Validation
//!
//! A loaded constraint system must equal the freshly compiled shape of the
//! requested specification. A mismatch is reported, not repaired:
//! regenerating requires an explicit [`CircuitCache::recreate`].

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::OsRng;
use tproof_circuits::CircuitSpecification;
use tproof_core::{BackendError, PersistenceError};
use tproof_zkp::{CompiledCircuit, CompiledConstraintSystem, ProofPackager, ProvingBackend};

use crate::layout;
use crate::store::CircuitStore;

/// Cache of compiled circuits over a [`CircuitStore`].
pub struct CircuitCache<B: ProvingBackend, St: CircuitStore> {
    packager: ProofPackager<B>,
    store: St,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<B: ProvingBackend, St: CircuitStore> CircuitCache<B, St> {
    pub fn new(backend: B, store: St) -> Self {
        Self {
            packager: ProofPackager::new(backend),
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn packager(&self) -> &ProofPackager<B> {
        &self.packager
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    /// Load the compiled circuit stored under `key`, or compile, set up and
    /// store it if there is none.
    ///
    /// # Errors
    ///
    /// - [`PersistenceError::Corrupt`] when the stored blob cannot be decoded.
    /// - [`PersistenceError::CircuitMismatch`] when it was built for another
    ///   specification or an earlier shape of this one.
    /// - [`PersistenceError::Populate`] when compilation or setup fails.
    pub fn load_or_create<S: CircuitSpecification>(
        &self,
        key: &str,
    ) -> Result<Arc<CompiledCircuit<B>>, PersistenceError> {
        self.with_key_lock(key, || -> Result<_, PersistenceError> {
            let expected = self.compile::<S>(key)?;
            if self.store.exists(key)? {
                let circuit = self.load_stored::<S>(key, &expected)?;
                tracing::debug!(key, circuit = S::NAME, "loaded compiled circuit");
                return Ok(circuit);
            }
            let circuit = self.set_up::<S>(key, expected)?;
            let blob = self.encode(key, &circuit)?;
            if !self.store.write_new(key, &blob)? {
                tracing::info!(
                    key,
                    circuit = S::NAME,
                    "compiled circuit stored concurrently by another writer; using stored keys"
                );
                return self.load_stored::<S>(key, &circuit.cs);
            }
            log_created::<S, _>(key, &circuit, blob.len());
            Ok(Arc::new(circuit))
        })
    }

    /// Discard whatever is stored under `key` and run a fresh setup.
    ///
    /// Every artifact and registration made with the previous keys stops
    /// verifying against the new ones.
    pub fn recreate<S: CircuitSpecification>(
        &self,
        key: &str,
    ) -> Result<Arc<CompiledCircuit<B>>, PersistenceError> {
        self.with_key_lock(key, || -> Result<_, PersistenceError> {
            tracing::warn!(key, circuit = S::NAME, "regenerating compiled circuit");
            let cs = self.compile::<S>(key)?;
            let circuit = self.set_up::<S>(key, cs)?;
            let blob = self.encode(key, &circuit)?;
            self.store.write(key, &blob)?;
            log_created::<S, _>(key, &circuit, blob.len());
            Ok(Arc::new(circuit))
        })
    }

    fn compile<S: CircuitSpecification>(
        &self,
        key: &str,
    ) -> Result<CompiledConstraintSystem, PersistenceError> {
        self.packager.compile::<S>().map_err(|e| populate_error(key, e))
    }

    /// Read the blob under `key` and check it holds `expected`.
    fn load_stored<S: CircuitSpecification>(
        &self,
        key: &str,
        expected: &CompiledConstraintSystem,
    ) -> Result<Arc<CompiledCircuit<B>>, PersistenceError> {
        let blob = self.store.read(key)?;
        let circuit = layout::decode::<B>(key, &blob)?;
        if &circuit.cs != expected {
            return Err(PersistenceError::CircuitMismatch {
                key: key.to_string(),
                stored: circuit.cs.circuit().to_string(),
                requested: S::NAME.to_string(),
            });
        }
        Ok(Arc::new(circuit))
    }

    fn set_up<S: CircuitSpecification>(
        &self,
        key: &str,
        cs: CompiledConstraintSystem,
    ) -> Result<CompiledCircuit<B>, PersistenceError> {
        let (pk, vk) = self
            .packager
            .setup::<S, _>(&cs, &mut OsRng)
            .map_err(|e| populate_error(key, e))?;
        Ok(CompiledCircuit { cs, pk, vk })
    }

    fn encode(&self, key: &str, circuit: &CompiledCircuit<B>) -> Result<Vec<u8>, PersistenceError> {
        layout::encode(circuit).map_err(|e| populate_error(key, e))
    }

    /// Run `f` holding the lock for `key`, dropping the lock entry afterwards
    /// unless another caller is waiting on it.
    fn with_key_lock<T>(&self, key: &str, f: impl FnOnce() -> T) -> T {
        let lock = self
            .locks
            .lock()
            .entry(key.to_string())
            .or_default()
            .clone();
        let result = {
            let _guard = lock.lock();
            f()
        };
        let mut locks = self.locks.lock();
        // One reference in the table, one here.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(key);
        }
        result
    }

    #[cfg(test)]
    fn lock_entries(&self) -> usize {
        self.locks.lock().len()
    }
}

fn log_created<S: CircuitSpecification, B: ProvingBackend>(
    key: &str,
    circuit: &CompiledCircuit<B>,
    bytes: usize,
) {
    tracing::info!(
        key,
        circuit = S::NAME,
        constraints = circuit.cs.num_constraints(),
        bytes,
        "compiled circuit created"
    );
}

fn populate_error(key: &str, source: BackendError) -> PersistenceError {
    PersistenceError::Populate {
        key: key.to_string(),
        source,
    }
}
