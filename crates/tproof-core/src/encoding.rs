//! Serde helpers for byte fields in JSON documents.
//!
//! Byte strings (proofs, keys, public witnesses, state digests) travel as
//! standard-alphabet, padded base64 strings, the same encoding a generic
//! structured-record encoder produces for raw byte slices.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Encode bytes as padded standard base64.
pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode padded standard base64.
pub fn from_base64(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(encoded)
}

/// `#[serde(with = "tproof_core::encoding::base64_bytes")]` for `Vec<u8>` fields.
pub mod base64_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::to_base64(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::from_base64(&s).map_err(serde::de::Error::custom)
    }
}
