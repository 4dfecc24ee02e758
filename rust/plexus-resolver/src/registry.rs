use std::collections::HashMap;

use plexus_common::{Address, Word};
use serde::{Deserialize, Serialize};

use crate::{PluginId, ResolverError, ResolverHandle};

/// Record of a plugin registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginRegistered {
    /// The freshly issued id.
    pub plugin: PluginId,
    /// Address of the resolver bound to it.
    pub resolver: Address,
    /// The party that registered it.
    pub registrant: Address,
}

/// Binds plugin ids to resolvers.
///
/// Ids are derived from the registry's `domain`, a monotonic nonce, the
/// resolver address and the registrant, so they are unique for the lifetime
/// of the registry and distinct across registries with different domains.
/// Bindings are permanent: there is no way to remove or rebind an id.
#[derive(Debug)]
pub struct PluginRegistry {
    domain: Address,
    nonce: u64,
    bindings: HashMap<PluginId, ResolverHandle>,
    journal: Vec<PluginRegistered>,
}

impl PluginRegistry {
    /// An empty registry. `domain` is mixed into every id it issues.
    pub fn new(domain: Address) -> Self {
        Self {
            domain,
            nonce: 0,
            bindings: HashMap::new(),
            journal: Vec::new(),
        }
    }

    /// The domain ids are issued in.
    pub fn domain(&self) -> Address {
        self.domain
    }

    /// Binds `handle` to a fresh plugin id and returns the id.
    pub fn register(&mut self, registrant: Address, handle: ResolverHandle) -> PluginId {
        let plugin = loop {
            let candidate = self.next_id(&handle, &registrant);
            if !self.bindings.contains_key(&candidate) {
                break candidate;
            }
        };

        let record = PluginRegistered {
            plugin,
            resolver: handle.address(),
            registrant,
        };
        tracing::info!(
            domain = %self.domain,
            plugin = %record.plugin,
            resolver = %record.resolver,
            registrant = %record.registrant,
            "plugin registered"
        );

        self.bindings.insert(plugin, handle);
        self.journal.push(record);
        plugin
    }

    /// Looks up the resolver bound to `plugin`.
    pub fn resolve(&self, plugin: &PluginId) -> Result<&ResolverHandle, ResolverError> {
        self.bindings
            .get(plugin)
            .ok_or(ResolverError::UnknownPlugin { plugin: *plugin })
    }

    /// Every registration so far, oldest first.
    pub fn registrations(&self) -> &[PluginRegistered] {
        &self.journal
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether there is nothing in it.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn next_id(&mut self, handle: &ResolverHandle, registrant: &Address) -> PluginId {
        let nonce = self.nonce.to_be_bytes();
        self.nonce += 1;

        PluginId::from(Word::hash_iter([
            self.domain.bytes().as_slice(),
            nonce.as_slice(),
            handle.address().bytes().as_slice(),
            registrant.bytes().as_slice(),
        ]))
    }
}
