use plexus_common::{Address, OutOfBounds};

use crate::PluginId;

/// Errors raised while resolving an attestation or a revocation.
///
/// Every variant is a rejection of the call it was raised in. Errors raised
/// by a delegated resolver reach the caller as they were raised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolverError {
    /// The payload is too short to hold the plugin id.
    #[error(transparent)]
    OutOfBounds(#[from] OutOfBounds),

    /// No resolver was ever registered under the plugin id.
    #[error("Unknown plugin {plugin}")]
    UnknownPlugin {
        /// The id read from the payload.
        plugin: PluginId,
    },

    /// A handle points at a resolver that has since been dropped.
    #[error("Resolver {resolver} is no longer available")]
    ResolverDropped {
        /// Address the handle was created for.
        resolver: Address,
    },

    /// Value was attached to a call on a resolver that does not accept it.
    #[error("Resolver {resolver} is not payable (attached value: {value})")]
    NotPayable {
        /// The non-payable resolver.
        resolver: Address,
        /// The attached value.
        value: u128,
    },

    /// The registrant is not allowed to bind plugins on this dispatcher.
    #[error("Registrant {registrant} may not register plugins on {resolver}")]
    Unauthorized {
        /// The dispatcher that refused the registration.
        resolver: Address,
        /// The party that attempted it.
        registrant: Address,
    },

    /// Nested dispatch went deeper than the ledger allows.
    #[error("Call depth limit of {limit} exceeded")]
    CallDepthExceeded {
        /// The limit supplied by the ledger.
        limit: usize,
    },

    /// A resolver-specific failure.
    #[error("Resolver {resolver} failed: {reason}")]
    Fault {
        /// The failing resolver.
        resolver: Address,
        /// Human readable reason.
        reason: String,
    },
}
