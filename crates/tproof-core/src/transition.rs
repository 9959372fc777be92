//! # Semantic Transition
//!
//! The human/application view of a proven transition: before and after
//! state, the execution-context identity, and the transaction hash. This
//! is what a platform registers as a contract's initial state and what a
//! client displays after proving.
//!
//! States are byte strings. Envelope values are encoded as the
//! concatenation of their 8-byte big-endian forms, so a single-value state
//! of `1` is `00 00 00 00 00 00 00 01`.

use serde::{Deserialize, Serialize};

use crate::encoding::base64_bytes;
use crate::envelope::TransitionEnvelope;

/// A proven transition, re-read from the instance that produced the proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticTransition {
    /// Envelope schema version, `0` for specifications without an envelope.
    pub version: u64,
    /// Encoded state before the transition.
    #[serde(with = "base64_bytes")]
    pub initial_state: Vec<u8>,
    /// Encoded state after the transition.
    #[serde(with = "base64_bytes")]
    pub next_state: Vec<u8>,
    /// Meaningful identity bytes.
    #[serde(with = "base64_bytes")]
    pub identity: Vec<u8>,
    /// Meaningful transaction-hash bytes.
    #[serde(with = "base64_bytes")]
    pub tx_hash: Vec<u8>,
}

impl SemanticTransition {
    /// Encode values as concatenated 8-byte big-endian words.
    pub fn encode_state(values: &[u64]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_be_bytes()).collect()
    }

    /// Decode a state produced by [`SemanticTransition::encode_state`].
    ///
    /// Returns `None` when the length is not a multiple of eight.
    pub fn decode_state(bytes: &[u8]) -> Option<Vec<u64>> {
        if bytes.len() % 8 != 0 {
            return None;
        }
        Some(
            bytes
                .chunks_exact(8)
                .map(|chunk| {
                    let mut word = [0u8; 8];
                    word.copy_from_slice(chunk);
                    u64::from_be_bytes(word)
                })
                .collect(),
        )
    }

    /// The identity as UTF-8, lossily.
    pub fn identity_name(&self) -> String {
        String::from_utf8_lossy(&self.identity).into_owned()
    }
}

impl<const IN: usize, const OUT: usize> From<&TransitionEnvelope<IN, OUT>> for SemanticTransition {
    fn from(envelope: &TransitionEnvelope<IN, OUT>) -> Self {
        Self {
            version: envelope.version(),
            initial_state: Self::encode_state(envelope.input()),
            next_state: Self::encode_state(envelope.output()),
            identity: envelope.identity().as_slice().to_vec(),
            tx_hash: envelope.tx_hash().as_slice().to_vec(),
        }
    }
}
