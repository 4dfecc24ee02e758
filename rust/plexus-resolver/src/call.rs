use plexus_common::{Address, Payload, Word};
use serde::{Deserialize, Serialize};

use crate::ResolverError;

/// Call depth ceiling used when the ledger does not supply one.
pub const DEFAULT_CALL_DEPTH_LIMIT: usize = 1024;

/// An attestation as presented to resolvers.
///
/// Resolvers never own attestations; they see them through a
/// [`ResolverCall`] for the duration of one decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation {
    /// Attestation uid.
    pub uid: Word,
    /// Uid of the schema it was made under.
    pub schema: Word,
    /// Creation time, in seconds.
    pub time: u64,
    /// Expiration time, in seconds. Zero means it never expires.
    pub expiration_time: u64,
    /// Revocation time, in seconds. Zero means it is not revoked.
    pub revocation_time: u64,
    /// The attestation this one refers to, or [`Word::ZERO`].
    pub ref_uid: Word,
    /// Subject of the attestation.
    pub recipient: Address,
    /// Party that made the attestation.
    pub attester: Address,
    /// Whether the attestation may be revoked.
    pub revocable: bool,
    /// The encoded payload.
    pub data: Payload,
}

/// A single resolver invocation.
///
/// Carries the attestation under decision, the value attached to the
/// request, and how many resolvers deep the call already is.
#[derive(Debug, Clone, Copy)]
pub struct ResolverCall<'a> {
    attestation: &'a Attestation,
    value: u128,
    depth: usize,
    depth_limit: usize,
}

impl<'a> ResolverCall<'a> {
    /// A top-level call with the default depth limit.
    pub fn new(attestation: &'a Attestation, value: u128) -> Self {
        Self {
            attestation,
            value,
            depth: 0,
            depth_limit: DEFAULT_CALL_DEPTH_LIMIT,
        }
    }

    /// Sets the maximum nesting depth of resolver-to-resolver calls.
    pub fn with_depth_limit(mut self, depth_limit: usize) -> Self {
        self.depth_limit = depth_limit;
        self
    }

    /// The attestation under decision.
    pub fn attestation(&self) -> &'a Attestation {
        self.attestation
    }

    /// Value attached to the request.
    pub fn value(&self) -> u128 {
        self.value
    }

    /// Number of resolvers between the ledger and this call.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The same call, one resolver deeper.
    ///
    /// Attestation and value are carried over untouched.
    pub fn descend(&self) -> Result<Self, ResolverError> {
        let depth = self.depth + 1;
        if depth > self.depth_limit {
            return Err(ResolverError::CallDepthExceeded {
                limit: self.depth_limit,
            });
        }
        Ok(Self { depth, ..*self })
    }
}
