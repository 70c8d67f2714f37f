//! `WebDAV` client protocol layer.
//!
//! Builds `PROPFIND` and `REPORT` request bodies and interprets
//! `multistatus` responses. Nothing in this crate performs I/O.

pub mod error;
pub mod rfc;
