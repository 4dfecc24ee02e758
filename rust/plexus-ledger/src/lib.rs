#![warn(missing_docs)]

//! In-memory schema registry and attestation ledger.
//!
//! The [`Ledger`] is the party that drives resolvers: every attestation and
//! revocation is checked against its schema and then submitted to the
//! schema's resolver, and only committed once that resolver agrees. Batched
//! operations are all-or-nothing.
//!
//! There are no signatures, balances or fees here; values attached to
//! requests are only handed to resolvers.

mod error;
pub use error::*;

mod settings;
pub use settings::*;

mod schema;
pub use schema::*;

mod request;
pub use request::*;

mod ledger;
pub use ledger::*;
