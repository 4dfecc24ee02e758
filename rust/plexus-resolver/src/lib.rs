#![warn(missing_docs)]

//! Attestation resolvers and plugin dispatch.
//!
//! A [`Resolver`] is the authorization hook a schema is bound to: the ledger
//! asks it whether an attestation (or a revocation) may proceed, handing it a
//! [`ResolverCall`] that borrows the [`Attestation`] and carries any attached
//! value.
//!
//! The [`DispatchResolver`] decides nothing on its own. It reads a
//! [`PluginId`] out of the attestation payload, looks it up in its
//! [`PluginRegistry`] and forwards the call to the resolver registered under
//! that id, returning that resolver's verdict unchanged:
//!
//! ```text
//! payload: [ plugin id (32 bytes) | details ... ]
//!                 │
//!                 ▼
//!   DispatchResolver ── registry ──▶ ResolverHandle ──▶ AttesterResolver
//!                                                      (or another dispatcher)
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use plexus_common::{Address, Payload, Word};
//! use plexus_resolver::{
//!     Attestation, AttesterResolver, DispatchResolver, Resolver, ResolverCall, ResolverHandle,
//! };
//!
//! let alice = Address::derive(&[b"alice"]);
//! let dispatcher = DispatchResolver::new(Address::derive(&[b"dispatcher"]));
//! let leaf = Arc::new(AttesterResolver::new(Address::derive(&[b"leaf"]), alice));
//!
//! let plugin = dispatcher.register(alice, ResolverHandle::new(&leaf)).unwrap();
//!
//! let attestation = Attestation {
//!     attester: alice,
//!     data: Payload::from_words(&[plugin.into(), Word::ZERO]),
//!     ..Default::default()
//! };
//! assert!(dispatcher.on_attest(&ResolverCall::new(&attestation, 0)).unwrap());
//! ```
//!
//! Failures are never turned into an implicit "allow": a payload too short to
//! hold a plugin id, an id nobody registered, or a registered resolver that no
//! longer exists all surface as a [`ResolverError`].

mod error;
pub use error::*;

mod call;
pub use call::*;

mod resolver;
pub use resolver::*;

mod plugin;
pub use plugin::*;

mod registry;
pub use registry::*;

mod settings;
pub use settings::*;

mod dispatch;
pub use dispatch::*;

mod attester;
pub use attester::*;
