//! DAV response parsing.
//!
//! Response bodies are first read into an owned element tree with
//! `quick-xml`, then checked against the multistatus grammar by a small
//! recursive-descent pass.

mod error;
mod error_body;
mod multistatus;
mod tree;

pub use error::{MultistatusError, ParseResult};
pub use error_body::parse_error;
pub use multistatus::{
    MultistatusRoot, multistatus_from_element, parse_document, parse_mkcol_response,
    parse_multistatus,
};
pub use tree::read_document;
