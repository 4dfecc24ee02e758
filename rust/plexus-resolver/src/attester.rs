use plexus_common::Address;
use serde::{Deserialize, Serialize};

use crate::{Resolver, ResolverCall, ResolverError};

/// How an [`AttesterResolver`] treats revocations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevokePolicy {
    /// Every revocation is allowed.
    #[default]
    Unrestricted,
    /// Revocations are gated like attestations.
    AttesterOnly,
}

/// Leaf resolver that only lets one address attest.
#[derive(Debug, Clone)]
pub struct AttesterResolver {
    address: Address,
    attester: Address,
    revoke_policy: RevokePolicy,
}

impl AttesterResolver {
    /// A resolver at `address` that only accepts attestations made by `attester`.
    pub fn new(address: Address, attester: Address) -> Self {
        Self {
            address,
            attester,
            revoke_policy: RevokePolicy::default(),
        }
    }

    /// Sets how revocations are treated.
    pub fn with_revoke_policy(mut self, revoke_policy: RevokePolicy) -> Self {
        self.revoke_policy = revoke_policy;
        self
    }

    /// The only address allowed to attest.
    pub fn attester(&self) -> Address {
        self.attester
    }

    fn is_attester(&self, call: &ResolverCall<'_>) -> bool {
        let allowed = call.attestation().attester == self.attester;
        if !allowed {
            tracing::debug!(
                resolver = %self.address,
                attester = %call.attestation().attester,
                "attester not allowed"
            );
        }
        allowed
    }
}

impl Resolver for AttesterResolver {
    fn address(&self) -> Address {
        self.address
    }

    fn is_payable(&self) -> bool {
        false
    }

    fn on_attest(&self, call: &ResolverCall<'_>) -> Result<bool, ResolverError> {
        self.accept_value(call.value())?;
        Ok(self.is_attester(call))
    }

    fn on_revoke(&self, call: &ResolverCall<'_>) -> Result<bool, ResolverError> {
        self.accept_value(call.value())?;
        Ok(match self.revoke_policy {
            RevokePolicy::Unrestricted => true,
            RevokePolicy::AttesterOnly => self.is_attester(call),
        })
    }
}
