use plexus_common::{Address, Word};
use plexus_resolver::ResolverError;

/// Errors raised by the schema registry and the ledger.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// A schema with the same uid is already registered.
    #[error("Schema {schema} already exists")]
    AlreadyExists {
        /// Uid of the existing schema.
        schema: Word,
    },

    /// The schema is unknown, or does not match the attestation.
    #[error("Invalid schema {schema}")]
    InvalidSchema {
        /// The offending schema uid.
        schema: Word,
    },

    /// The expiration time is not in the future.
    #[error("Invalid expiration time {expiration_time} (now: {now})")]
    InvalidExpirationTime {
        /// Requested expiration.
        expiration_time: u64,
        /// Ledger time.
        now: u64,
    },

    /// A revocable attestation was requested on an irrevocable schema, or an
    /// irrevocable attestation was asked to be revoked.
    #[error("Irrevocable")]
    Irrevocable,

    /// No attestation with this uid exists.
    #[error("Attestation {uid} not found")]
    NotFound {
        /// The missing uid.
        uid: Word,
    },

    /// Only the attester may revoke an attestation.
    #[error("Access denied: {revoker} may not revoke {uid}")]
    AccessDenied {
        /// The attestation.
        uid: Word,
        /// The party that attempted the revocation.
        revoker: Address,
    },

    /// The attestation was already revoked.
    #[error("Attestation {uid} already revoked")]
    AlreadyRevoked {
        /// The attestation.
        uid: Word,
    },

    /// Value was attached to a request on a schema without a resolver.
    #[error("Not payable (attached value: {value})")]
    NotPayable {
        /// The attached value.
        value: u128,
    },

    /// The resolver refused the attestation.
    #[error("Invalid attestation {uid}")]
    InvalidAttestation {
        /// Uid the attestation would have had.
        uid: Word,
    },

    /// The resolver refused the revocation.
    #[error("Invalid revocation {uid}")]
    InvalidRevocation {
        /// The attestation.
        uid: Word,
    },

    /// The resolver failed; carries its error as raised.
    #[error(transparent)]
    Resolver(#[from] ResolverError),
}
