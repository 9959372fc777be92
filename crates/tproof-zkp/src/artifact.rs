//! # Proof Artifact
//!
//! The portable bundle handed to an external verifier: proof bytes,
//! verifying-key bytes and public-input bytes, each the backend's canonical
//! compressed encoding. Verification needs nothing else.
//!
//! JSON form:
//!
//! ```json
//! { "proof": "<base64>", "verifyingKey": "<base64>", "publicWitness": "<base64>" }
//! ```

use ark_serialize::Compress;
use serde::{Deserialize, Serialize};
use tproof_circuits::Fr;
use tproof_core::encoding::base64_bytes;
use tproof_core::BackendError;

use crate::codec;
use crate::traits::ProvingBackend;

/// Immutable proof bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofArtifact {
    #[serde(with = "base64_bytes")]
    pub proof: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub verifying_key: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub public_witness: Vec<u8>,
}

/// A decoded artifact.
pub struct DecodedArtifact<B: ProvingBackend> {
    pub proof: B::Proof,
    pub verifying_key: B::VerifyingKey,
    pub public_inputs: Vec<Fr>,
}

impl ProofArtifact {
    /// Encode backend objects into an artifact.
    pub fn pack<B: ProvingBackend>(
        proof: &B::Proof,
        vk: &B::VerifyingKey,
        public_inputs: &[Fr],
    ) -> Result<Self, BackendError> {
        Ok(Self {
            proof: codec::encode(proof, Compress::Yes)?,
            verifying_key: codec::encode(vk, Compress::Yes)?,
            public_witness: codec::encode(&public_inputs.to_vec(), Compress::Yes)?,
        })
    }

    /// Decode the three byte strings with `B`'s canonical readers.
    pub fn decode<B: ProvingBackend>(&self) -> Result<DecodedArtifact<B>, BackendError> {
        Ok(DecodedArtifact {
            proof: codec::decode("proof", &self.proof, Compress::Yes)?,
            verifying_key: codec::decode("verifying key", &self.verifying_key, Compress::Yes)?,
            public_inputs: self.public_inputs()?,
        })
    }

    /// Decode only the public witness.
    pub fn public_inputs(&self) -> Result<Vec<Fr>, BackendError> {
        codec::decode("public witness", &self.public_witness, Compress::Yes)
    }

    pub fn to_json(&self) -> Result<String, BackendError> {
        serde_json::to_string_pretty(self).map_err(|e| BackendError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, BackendError> {
        serde_json::from_str(json).map_err(|e| BackendError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBackend;

    fn sample() -> ProofArtifact {
        ProofArtifact {
            proof: vec![1, 2, 3],
            verifying_key: vec![4, 5],
            public_witness: codec::encode(&vec![Fr::from(35u64)], Compress::Yes).unwrap(),
        }
    }

    #[test]
    fn json_uses_camel_case_base64_fields() {
        let json = sample().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["proof"], "AQID");
        assert_eq!(value["verifyingKey"], "BAU=");
        assert!(value["publicWitness"].is_string());
        assert_eq!(ProofArtifact::from_json(&json).unwrap(), sample());
    }

    #[test]
    fn public_witness_decodes_independently() {
        assert_eq!(sample().public_inputs().unwrap(), vec![Fr::from(35u64)]);
    }

    #[test]
    fn garbage_proof_bytes_fail_to_decode() {
        let err = sample().decode::<MockBackend>().err().unwrap();
        assert!(matches!(err, BackendError::Serialization(_)));
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let err = ProofArtifact::from_json(r#"{"proof":"AQID"}"#).unwrap_err();
        assert!(matches!(err, BackendError::Serialization(_)));
    }
}
