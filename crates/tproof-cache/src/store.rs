//! # Circuit Store
//!
//! The persistence collaborator behind the compiled-circuit cache: opaque
//! blobs keyed by a storage key, with an explicit existence query.
//!
//! ## Storage Keys
//!
//! Keys must match `^[a-z0-9][a-z0-9._-]{0,127}$`, so a key is always a
//! single safe file name and can never escape the store root.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tproof_core::PersistenceError;

/// Blob storage for compiled circuits.
pub trait CircuitStore: Send + Sync {
    /// Whether a blob is stored under `key`.
    fn exists(&self, key: &str) -> Result<bool, PersistenceError>;

    /// Read the blob stored under `key`.
    ///
    /// Returns [`PersistenceError::NotFound`] when nothing is stored.
    fn read(&self, key: &str) -> Result<Vec<u8>, PersistenceError>;

    /// Store `bytes` under `key`, replacing any previous blob. Readers see
    /// either the old blob or the new one, never a partial write.
    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), PersistenceError>;

    /// Store `bytes` under `key` only if nothing is stored there yet.
    ///
    /// Returns `false` and leaves the existing blob untouched when another
    /// writer got there first. Atomic across every store sharing the
    /// same backing location.
    fn write_new(&self, key: &str, bytes: &[u8]) -> Result<bool, PersistenceError>;
}

/// Validate a storage key.
pub fn validate_key(key: &str) -> Result<(), PersistenceError> {
    let invalid = || PersistenceError::InvalidKey(key.to_string());
    if key.is_empty() || key.len() > 128 {
        return Err(invalid());
    }
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c.is_ascii_digit() => {}
        _ => return Err(invalid()),
    }
    if chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-')) {
        Ok(())
    } else {
        Err(invalid())
    }
}

/// Filesystem store: one `{root}/{key}.bin` file per key.
///
/// The root directory is created on first write.
#[derive(Debug, Clone)]
pub struct FsCircuitStore {
    root: PathBuf,
}

impl FsCircuitStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the blob for `key`.
    pub fn path(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.bin")))
    }
}

impl CircuitStore for FsCircuitStore {
    fn exists(&self, key: &str) -> Result<bool, PersistenceError> {
        Ok(self.path(key)?.try_exists()?)
    }

    fn read(&self, key: &str) -> Result<Vec<u8>, PersistenceError> {
        let path = self.path(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(PersistenceError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), PersistenceError> {
        let path = self.path(key)?;
        let tmp = self.staged(bytes)?;
        tmp.persist(&path).map_err(|e| PersistenceError::Io(e.error))?;
        tracing::debug!(key, path = %path.display(), bytes = bytes.len(), "stored compiled circuit");
        Ok(())
    }

    fn write_new(&self, key: &str, bytes: &[u8]) -> Result<bool, PersistenceError> {
        let path = self.path(key)?;
        let tmp = self.staged(bytes)?;
        match tmp.persist_noclobber(&path) {
            Ok(_) => {
                tracing::debug!(key, path = %path.display(), bytes = bytes.len(), "stored compiled circuit");
                Ok(true)
            }
            Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(PersistenceError::Io(e.error)),
        }
    }
}

impl FsCircuitStore {
    /// Fully written and synced temporary file beside the blobs, ready to
    /// be renamed into place.
    fn staged(&self, bytes: &[u8]) -> Result<tempfile::NamedTempFile, PersistenceError> {
        fs::create_dir_all(&self.root)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        Ok(tmp)
    }
}

/// In-memory store for tests and short-lived processes.
#[derive(Debug, Default)]
pub struct MemoryCircuitStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryCircuitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.lock().is_empty()
    }
}

impl CircuitStore for MemoryCircuitStore {
    fn exists(&self, key: &str) -> Result<bool, PersistenceError> {
        validate_key(key)?;
        Ok(self.blobs.lock().contains_key(key))
    }

    fn read(&self, key: &str) -> Result<Vec<u8>, PersistenceError> {
        validate_key(key)?;
        self.blobs
            .lock()
            .get(key)
            .cloned()
            .ok_or_else(|| PersistenceError::NotFound(key.to_string()))
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), PersistenceError> {
        validate_key(key)?;
        self.blobs.lock().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn write_new(&self, key: &str, bytes: &[u8]) -> Result<bool, PersistenceError> {
        validate_key(key)?;
        match self.blobs.lock().entry(key.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(bytes.to_vec());
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_validation() {
        for ok in ["collatz_circuit", "simple-circuit", "a", "v1.2"] {
            validate_key(ok).unwrap();
        }
        let long = "x".repeat(129);
        for bad in ["", "../etc/passwd", "Upper", "-lead", "a/b", long.as_str()] {
            assert!(matches!(validate_key(bad), Err(PersistenceError::InvalidKey(_))));
        }
    }

    #[test]
    fn fs_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsCircuitStore::new(dir.path().join("circuits"));
        assert!(!store.exists("collatz_circuit").unwrap());
        assert!(matches!(
            store.read("collatz_circuit"),
            Err(PersistenceError::NotFound(_))
        ));

        store.write("collatz_circuit", b"blob").unwrap();
        assert!(store.exists("collatz_circuit").unwrap());
        assert_eq!(store.read("collatz_circuit").unwrap(), b"blob");
        assert!(dir.path().join("circuits/collatz_circuit.bin").is_file());

        store.write("collatz_circuit", b"replaced").unwrap();
        assert_eq!(store.read("collatz_circuit").unwrap(), b"replaced");
    }

    #[test]
    fn fs_store_leaves_no_temporary_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsCircuitStore::new(dir.path());
        store.write("a", b"1").unwrap();
        store.write("b", b"2").unwrap();
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.iter().all(|n| n.ends_with(".bin")));
    }

    #[test]
    fn fs_store_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsCircuitStore::new(dir.path());
        assert!(matches!(
            store.write("../escape", b"x"),
            Err(PersistenceError::InvalidKey(_))
        ));
    }

    #[test]
    fn fs_store_write_new_never_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsCircuitStore::new(dir.path());
        assert!(store.write_new("collatz_circuit", b"first").unwrap());
        assert!(!store.write_new("collatz_circuit", b"second").unwrap());
        assert_eq!(store.read("collatz_circuit").unwrap(), b"first");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn fs_store_exists_reports_stat_failures() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("locked");
        let store = FsCircuitStore::new(&root);
        store.write("k", b"v").unwrap();
        fs::set_permissions(&root, fs::Permissions::from_mode(0o000)).unwrap();
        // Privileged users bypass directory permissions.
        let readable = fs::read_dir(&root).is_ok();
        let result = store.exists("k");
        fs::set_permissions(&root, fs::Permissions::from_mode(0o755)).unwrap();
        if !readable {
            assert!(matches!(result, Err(PersistenceError::Io(_))));
        }
    }

    #[test]
    fn memory_store_write_new_never_replaces() {
        let store = MemoryCircuitStore::new();
        assert!(store.write_new("k", b"first").unwrap());
        assert!(!store.write_new("k", b"second").unwrap());
        assert_eq!(store.read("k").unwrap(), b"first");
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryCircuitStore::new();
        assert!(store.is_empty());
        store.write("k", b"v").unwrap();
        assert!(store.exists("k").unwrap());
        assert_eq!(store.read("k").unwrap(), b"v");
        assert_eq!(store.len(), 1);
    }
}
