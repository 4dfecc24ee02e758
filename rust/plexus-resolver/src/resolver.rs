use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use plexus_common::Address;

use crate::{ResolverCall, ResolverError};

/// Authorization hook bound to a schema.
///
/// The ledger calls [`Resolver::on_attest`] before committing an attestation
/// and [`Resolver::on_revoke`] before committing a revocation. `Ok(false)`
/// and `Err(_)` both abort the operation; the error additionally tells the
/// caller why.
///
/// Leaf policies decide on their own. A [`DispatchResolver`] forwards to
/// another resolver, so resolvers nest through this one interface.
///
/// [`DispatchResolver`]: crate::DispatchResolver
pub trait Resolver: Send + Sync {
    /// Address this resolver is deployed at.
    fn address(&self) -> Address;

    /// Whether calls may carry a non-zero value.
    fn is_payable(&self) -> bool;

    /// Decides whether the attestation in `call` may be committed.
    fn on_attest(&self, call: &ResolverCall<'_>) -> Result<bool, ResolverError>;

    /// Decides whether the attestation in `call` may be revoked.
    fn on_revoke(&self, call: &ResolverCall<'_>) -> Result<bool, ResolverError>;

    /// Fails with [`ResolverError::NotPayable`] when `value` is non-zero and
    /// this resolver is not payable.
    fn accept_value(&self, value: u128) -> Result<(), ResolverError> {
        if value != 0 && !self.is_payable() {
            return Err(ResolverError::NotPayable {
                resolver: self.address(),
                value,
            });
        }
        Ok(())
    }
}

/// Non-owning reference to a deployed resolver.
///
/// Two handles are equal when they carry the same address and point at the
/// same resolver instance. The resolver itself stays owned by whoever created it; once every [`Arc`] to
/// it is gone, [`ResolverHandle::upgrade`] fails with
/// [`ResolverError::ResolverDropped`].
#[derive(Clone)]
pub struct ResolverHandle {
    address: Address,
    target: Weak<dyn Resolver>,
}

impl ResolverHandle {
    /// A handle to `resolver` that does not keep it alive.
    pub fn new<R>(resolver: &Arc<R>) -> Self
    where
        R: Resolver + 'static,
    {
        let target: Weak<dyn Resolver> = Arc::<R>::downgrade(resolver);
        Self {
            address: resolver.address(),
            target,
        }
    }

    /// Address of the referenced resolver.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Obtains the resolver, if it still exists.
    pub fn upgrade(&self) -> Result<Arc<dyn Resolver>, ResolverError> {
        self.target.upgrade().ok_or(ResolverError::ResolverDropped {
            resolver: self.address,
        })
    }
}

impl From<&Arc<dyn Resolver>> for ResolverHandle {
    fn from(resolver: &Arc<dyn Resolver>) -> Self {
        Self {
            address: resolver.address(),
            target: Arc::downgrade(resolver),
        }
    }
}

impl PartialEq for ResolverHandle {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address && Weak::ptr_eq(&self.target, &other.target)
    }
}

impl Eq for ResolverHandle {}

impl Hash for ResolverHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address.hash(state);
    }
}

impl Debug for ResolverHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ResolverHandle").field(&self.address).finish()
    }
}
