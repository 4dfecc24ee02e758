#![warn(missing_docs)]

//! Shared primitives for the plugin-dispatch resolver workspace.
//!
//! Everything here is pure data: fixed-width [`Word`]s and the bounds-checked
//! [`extract_word`] that reads them out of opaque buffers, party and resolver
//! [`Address`]es, attestation [`Payload`]s, and a [`SchemaEncoder`] for
//! schemas made of static fields.

mod word;
pub use word::*;

mod address;
pub use address::*;

mod payload;
pub use payload::*;

mod encoder;
pub use encoder::*;
