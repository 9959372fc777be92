//! Contract registration payload.
//!
//! The shape a hosting platform's register command expects: the verifier
//! scheme, the verifying key, the contract name and its initial public
//! state. Producing it is all this crate does; submitting it is the
//! platform's job.

use serde::{Deserialize, Serialize};
use tproof_core::encoding::base64_bytes;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractRegistration {
    /// Backend scheme tag, e.g. `groth16-bn254`.
    pub verifier: String,
    #[serde(with = "base64_bytes")]
    pub verifying_key: Vec<u8>,
    pub contract_name: String,
    #[serde(with = "base64_bytes")]
    pub initial_state: Vec<u8>,
}
