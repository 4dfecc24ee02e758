use std::sync::Arc;

use parking_lot::RwLock;
use plexus_common::{Address, extract_word};

use crate::{
    DispatchSettings, PluginId, PluginRegistered, PluginRegistry, Resolver, ResolverCall,
    ResolverError, ResolverHandle,
};

/// Resolver that routes every call to a registered plugin resolver.
///
/// For each attestation or revocation the dispatcher reads the [`PluginId`]
/// at [`DispatchSettings::plugin_offset`] of the payload, looks it up in its
/// own [`PluginRegistry`] and forwards the call. Whatever the plugin resolver
/// returns, verdict or error, is returned as is. Revocations are routed
/// through the payload of the original attestation, so they are gated by the
/// same plugin that gated the attestation.
///
/// Plugin resolvers may themselves be dispatchers; each level reads its id
/// from its own offset.
#[derive(Debug)]
pub struct DispatchResolver {
    address: Address,
    settings: DispatchSettings,
    registry: RwLock<PluginRegistry>,
}

impl DispatchResolver {
    /// A dispatcher with default settings.
    pub fn new(address: Address) -> Self {
        Self::with_settings(address, DispatchSettings::default())
    }

    /// A dispatcher with explicit settings.
    pub fn with_settings(address: Address, settings: DispatchSettings) -> Self {
        Self {
            address,
            settings,
            registry: RwLock::new(PluginRegistry::new(address)),
        }
    }

    /// The settings this was created with.
    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    /// Binds `handle` to a fresh plugin id on behalf of `registrant`.
    ///
    /// The id is what attesters embed in their payloads to select the
    /// resolver.
    pub fn register(
        &self,
        registrant: Address,
        handle: ResolverHandle,
    ) -> Result<PluginId, ResolverError> {
        if !self.settings.registration.permits(&registrant) {
            tracing::warn!(
                resolver = %self.address,
                %registrant,
                "plugin registration refused"
            );
            return Err(ResolverError::Unauthorized {
                resolver: self.address,
                registrant,
            });
        }

        Ok(self.registry.write().register(registrant, handle))
    }

    /// The resolver bound to `plugin`.
    pub fn plugin(&self, plugin: &PluginId) -> Result<ResolverHandle, ResolverError> {
        self.registry.read().resolve(plugin).cloned()
    }

    /// Every registration made on this dispatcher, oldest first.
    pub fn registrations(&self) -> Vec<PluginRegistered> {
        self.registry.read().registrations().to_vec()
    }

    /// Reads the plugin id out of an encoded payload.
    pub fn plugin_id(&self, payload: &[u8]) -> Result<PluginId, ResolverError> {
        Ok(extract_word(payload, self.settings.plugin_offset)?.into())
    }

    fn route(&self, call: &ResolverCall<'_>) -> Result<Arc<dyn Resolver>, ResolverError> {
        self.accept_value(call.value())?;

        let plugin = self.plugin_id(&call.attestation().data)?;
        // The registry guard is released here, before the plugin runs, so a
        // plugin may call back into this dispatcher.
        let handle = self.plugin(&plugin).inspect_err(|_| {
            tracing::warn!(resolver = %self.address, %plugin, "unknown plugin");
        })?;
        let target = handle.upgrade()?;

        tracing::debug!(
            resolver = %self.address,
            %plugin,
            target = %handle.address(),
            depth = call.depth(),
            "dispatching"
        );
        Ok(target)
    }
}

impl Resolver for DispatchResolver {
    fn address(&self) -> Address {
        self.address
    }

    fn is_payable(&self) -> bool {
        self.settings.payable
    }

    fn on_attest(&self, call: &ResolverCall<'_>) -> Result<bool, ResolverError> {
        let target = self.route(call)?;
        target.on_attest(&call.descend()?)
    }

    fn on_revoke(&self, call: &ResolverCall<'_>) -> Result<bool, ResolverError> {
        let target = self.route(call)?;
        target.on_revoke(&call.descend()?)
    }
}
