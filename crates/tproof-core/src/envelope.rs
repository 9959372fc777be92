//! # Fixed Transition Envelope
//!
//! The field layout every circuit specification embeds: a schema version,
//! bounded input/output arrays with explicit declared lengths, the
//! execution-context identity (fixed capacity plus declared length), and a
//! transaction hash.
//!
//! ## Invariants
//!
//! - `input_len <= IN`, `output_len <= OUT`, `identity.len() <= 256`,
//!   `tx_hash.len() <= 64`. Enforced by the constructors; the fields are
//!   private so the invariant cannot be broken afterwards.
//! - Unused slots are zero.
//!
//! The envelope does not enforce exact arities. Each specification asserts
//! the lengths it requires.

use crate::error::ValidationError;

/// Schema version carried by every envelope built in this workspace.
pub const ENVELOPE_VERSION: u64 = 1;

/// Capacity of the execution-context identity, in bytes.
pub const IDENTITY_CAPACITY: usize = 256;

/// Capacity of the transaction hash, in bytes.
pub const TX_HASH_CAPACITY: usize = 64;

/// A fixed-capacity byte array with a declared length.
///
/// Bytes past `len` are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedBytes<const N: usize> {
    len: usize,
    bytes: [u8; N],
}

impl<const N: usize> FixedBytes<N> {
    /// An empty value: declared length zero, all padding.
    pub const fn empty() -> Self {
        Self {
            len: 0,
            bytes: [0u8; N],
        }
    }

    /// Copy `data` into a new value.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::CapacityExceeded`] when `data` is longer
    /// than `N`. Oversized data is never truncated.
    pub fn new(field: &'static str, data: &[u8]) -> Result<Self, ValidationError> {
        if data.len() > N {
            return Err(ValidationError::CapacityExceeded {
                field,
                len: data.len(),
                capacity: N,
            });
        }
        let mut bytes = [0u8; N];
        bytes[..data.len()].copy_from_slice(data);
        Ok(Self {
            len: data.len(),
            bytes,
        })
    }

    /// Declared length.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the declared length is zero.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The meaningful bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// The full zero-padded storage.
    pub fn padded(&self) -> &[u8; N] {
        &self.bytes
    }

    /// Capacity in bytes.
    pub const fn capacity() -> usize {
        N
    }
}

impl<const N: usize> Default for FixedBytes<N> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Execution-context identity: the byte-encoded name of the application
/// or contract instance a transition belongs to.
pub type Identity = FixedBytes<IDENTITY_CAPACITY>;

/// Opaque transaction identifier carried through every proof.
pub type TxHash = FixedBytes<TX_HASH_CAPACITY>;

impl FixedBytes<IDENTITY_CAPACITY> {
    /// Build an identity from its string form.
    pub fn from_name(name: &str) -> Result<Self, ValidationError> {
        Self::new("identity", name.as_bytes())
    }
}

/// The shared transition envelope, generic over input and output capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionEnvelope<const IN: usize, const OUT: usize> {
    version: u64,
    input_len: usize,
    input: [u64; IN],
    output_len: usize,
    output: [u64; OUT],
    identity: Identity,
    tx_hash: TxHash,
}

impl<const IN: usize, const OUT: usize> TransitionEnvelope<IN, OUT> {
    /// Build an envelope at [`ENVELOPE_VERSION`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TooManyValues`] when `input` or `output`
    /// exceed their capacity.
    pub fn new(
        input: &[u64],
        output: &[u64],
        identity: Identity,
        tx_hash: TxHash,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            version: ENVELOPE_VERSION,
            input_len: input.len(),
            input: pad("input", input)?,
            output_len: output.len(),
            output: pad("output", output)?,
            identity,
            tx_hash,
        })
    }

    /// The all-zero assignment. Its shape is what circuits compile from.
    pub fn blank() -> Self {
        Self {
            version: 0,
            input_len: 0,
            input: [0; IN],
            output_len: 0,
            output: [0; OUT],
            identity: Identity::empty(),
            tx_hash: TxHash::empty(),
        }
    }

    /// Override the schema version. Used to exercise version checks.
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Replace the transaction hash.
    pub fn with_tx_hash(mut self, tx_hash: TxHash) -> Self {
        self.tx_hash = tx_hash;
        self
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn input_len(&self) -> usize {
        self.input_len
    }

    /// Full padded input storage.
    pub fn input_slots(&self) -> &[u64; IN] {
        &self.input
    }

    /// The meaningful inputs.
    pub fn input(&self) -> &[u64] {
        &self.input[..self.input_len]
    }

    pub fn output_len(&self) -> usize {
        self.output_len
    }

    /// Full padded output storage.
    pub fn output_slots(&self) -> &[u64; OUT] {
        &self.output
    }

    /// The meaningful outputs.
    pub fn output(&self) -> &[u64] {
        &self.output[..self.output_len]
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn tx_hash(&self) -> &TxHash {
        &self.tx_hash
    }
}

fn pad<const N: usize>(field: &'static str, values: &[u64]) -> Result<[u64; N], ValidationError> {
    if values.len() > N {
        return Err(ValidationError::TooManyValues {
            field,
            len: values.len(),
            capacity: N,
        });
    }
    let mut slots = [0u64; N];
    slots[..values.len()].copy_from_slice(values);
    Ok(slots)
}
