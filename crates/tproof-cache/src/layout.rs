//! # Persistence Layout
//!
//! A compiled circuit is stored as one blob:
//!
//! ```text
//! proving key || verifying key || constraint system
//! ```
//!
//! Each part is the uncompressed canonical encoding. The constraint system
//! is always written last and read last, and nothing may follow it.

use ark_serialize::{CanonicalDeserialize, Compress, Validate};
use tproof_core::{BackendError, PersistenceError};
use tproof_zkp::codec;
use tproof_zkp::{CompiledCircuit, CompiledConstraintSystem, ProvingBackend};

/// Encode `circuit` in storage order.
pub fn encode<B: ProvingBackend>(circuit: &CompiledCircuit<B>) -> Result<Vec<u8>, BackendError> {
    let mut blob = codec::encode(&circuit.pk, Compress::No)?;
    blob.extend(codec::encode(&circuit.vk, Compress::No)?);
    blob.extend(codec::encode(&circuit.cs, Compress::No)?);
    Ok(blob)
}

/// Decode a blob written by [`encode`].
pub fn decode<B: ProvingBackend>(
    key: &str,
    blob: &[u8],
) -> Result<CompiledCircuit<B>, PersistenceError> {
    let mut reader = blob;
    let pk = read_part::<B::ProvingKey>(key, "proving key", &mut reader)?;
    let vk = read_part::<B::VerifyingKey>(key, "verifying key", &mut reader)?;
    let cs = read_part::<CompiledConstraintSystem>(key, "constraint system", &mut reader)?;
    if !reader.is_empty() {
        return Err(PersistenceError::Corrupt {
            key: key.to_string(),
            reason: format!("{} trailing bytes after constraint system", reader.len()),
        });
    }
    Ok(CompiledCircuit { cs, pk, vk })
}

fn read_part<T: CanonicalDeserialize>(
    key: &str,
    part: &str,
    reader: &mut &[u8],
) -> Result<T, PersistenceError> {
    T::deserialize_with_mode(reader, Compress::No, Validate::Yes).map_err(|e| {
        PersistenceError::Corrupt {
            key: key.to_string(),
            reason: format!("{part}: {e}"),
        }
    })
}
