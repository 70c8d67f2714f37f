//! `WebDAV` client operations over a pluggable HTTP transport.

pub mod client;
pub mod error;
pub mod store;
pub mod transport;

pub use client::{DavClient, property_names};
pub use error::{ClientError, ClientResult, TransportError, TransportResult};
pub use store::DavConfigStore;
pub use transport::{DavMethod, DavRequest, DavResponse, Transport};
