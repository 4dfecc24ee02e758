use plexus_common::{Address, Payload, Word};
use serde::{Deserialize, Serialize};

/// The caller-supplied part of an attestation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttestationRequestData {
    /// Subject of the attestation.
    pub recipient: Address,
    /// Zero for attestations that never expire.
    pub expiration_time: u64,
    /// Whether the attestation may be revoked later.
    pub revocable: bool,
    /// Uid of an existing attestation this one refers to, or zero.
    pub ref_uid: Word,
    /// The encoded payload.
    pub data: Payload,
    /// Value handed to the schema's resolver.
    pub value: u128,
}

/// A single attestation under a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationRequest {
    /// Uid of the schema.
    pub schema: Word,
    /// The attestation.
    pub data: AttestationRequestData,
}

/// Several attestations under one schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiAttestationRequest {
    /// Uid of the schema.
    pub schema: Word,
    /// The attestations, committed together or not at all.
    pub data: Vec<AttestationRequestData>,
}

/// The caller-supplied part of a revocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevocationRequestData {
    /// Uid of the attestation to revoke.
    pub uid: Word,
    /// Value handed to the schema's resolver.
    pub value: u128,
}

/// A single revocation under a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationRequest {
    /// Uid of the schema.
    pub schema: Word,
    /// The revocation.
    pub data: RevocationRequestData,
}

/// Several revocations under one schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiRevocationRequest {
    /// Uid of the schema.
    pub schema: Word,
    /// The revocations, committed together or not at all.
    pub data: Vec<RevocationRequestData>,
}

impl From<AttestationRequest> for MultiAttestationRequest {
    fn from(request: AttestationRequest) -> Self {
        Self {
            schema: request.schema,
            data: vec![request.data],
        }
    }
}

impl From<RevocationRequest> for MultiRevocationRequest {
    fn from(request: RevocationRequest) -> Self {
        Self {
            schema: request.schema,
            data: vec![request.data],
        }
    }
}
