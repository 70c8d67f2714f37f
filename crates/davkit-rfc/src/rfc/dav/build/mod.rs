//! `WebDAV` XML request bodies.
//!
//! [`XmlEmitter`] turns tag operations into a document; the builders below
//! use it for the `PROPFIND` and `sync-collection` bodies the client sends.

mod emitter;
mod propfind;
mod sync_collection;

pub use emitter::XmlEmitter;
pub use propfind::{default_properties, propfind_body};
pub use sync_collection::{SYNC_LEVEL, sync_collection_body};
