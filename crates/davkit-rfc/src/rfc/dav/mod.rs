//! `WebDAV` (RFC 4918) and collection synchronization (RFC 6578) support.
//!
//! Request bodies are produced by [`build`], responses are read by
//! [`parse`] into the structural [`core::Multistatus`] form and converted
//! into [`model::ChildResource`] values by [`model`].

pub mod build;
pub mod core;
pub mod model;
pub mod parse;

#[cfg(test)]
mod tests;
