//! Canonical byte encodings of backend objects.
//!
//! Artifacts carry the compressed encoding. Decoding consumes the whole
//! input: trailing bytes are an error.

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, Compress, Validate};
use tproof_core::BackendError;

/// Encode `value` in canonical form.
pub fn encode<T: CanonicalSerialize>(value: &T, compress: Compress) -> Result<Vec<u8>, BackendError> {
    let mut bytes = Vec::with_capacity(value.serialized_size(compress));
    value
        .serialize_with_mode(&mut bytes, compress)
        .map_err(|e| BackendError::Serialization(e.to_string()))?;
    Ok(bytes)
}

/// Decode exactly one canonical value from `bytes`.
pub fn decode<T: CanonicalDeserialize>(
    what: &str,
    bytes: &[u8],
    compress: Compress,
) -> Result<T, BackendError> {
    let mut reader = bytes;
    let value = T::deserialize_with_mode(&mut reader, compress, Validate::Yes)
        .map_err(|e| BackendError::Serialization(format!("{what}: {e}")))?;
    if !reader.is_empty() {
        return Err(BackendError::Serialization(format!(
            "{what}: {} trailing bytes",
            reader.len()
        )));
    }
    Ok(value)
}
