use std::collections::HashMap;

use plexus_common::{Address, Word};
use plexus_resolver::ResolverHandle;

use crate::LedgerError;

/// A registered schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRecord {
    /// See [`schema_uid`].
    pub uid: Word,
    /// Resolver consulted for every attestation and revocation, if any.
    pub resolver: Option<ResolverHandle>,
    /// Whether attestations under this schema may be revocable.
    pub revocable: bool,
    /// The schema definition, e.g. `"bytes32 pluginId,bytes32 details"`.
    pub schema: String,
}

/// Derives the uid of a schema from its definition, resolver and
/// revocability.
///
/// `resolver` is [`Address::ZERO`] for schemas without a resolver.
pub fn schema_uid(schema: &str, resolver: Address, revocable: bool) -> Word {
    Word::hash_iter([
        schema.as_bytes(),
        resolver.bytes().as_slice(),
        &[revocable as u8],
    ])
}

/// Registry of schemas, keyed by uid.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    records: HashMap<Word, SchemaRecord>,
}

impl SchemaRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a schema and returns its uid.
    ///
    /// The same definition may be registered again with a different resolver
    /// or revocability, since those yield a different uid.
    pub fn register(
        &mut self,
        schema: &str,
        resolver: Option<ResolverHandle>,
        revocable: bool,
    ) -> Result<Word, LedgerError> {
        let resolver_address = resolver
            .as_ref()
            .map_or(Address::ZERO, ResolverHandle::address);
        let uid = schema_uid(schema, resolver_address, revocable);

        if self.records.contains_key(&uid) {
            return Err(LedgerError::AlreadyExists { schema: uid });
        }

        tracing::info!(%uid, resolver = %resolver_address, revocable, schema, "schema registered");
        self.records.insert(
            uid,
            SchemaRecord {
                uid,
                resolver,
                revocable,
                schema: schema.to_string(),
            },
        );
        Ok(uid)
    }

    /// The record registered under `uid`.
    pub fn schema(&self, uid: &Word) -> Option<&SchemaRecord> {
        self.records.get(uid)
    }
}
