//! HTTP transport boundary.
//!
//! The client builds a [`DavRequest`] per operation and hands it to a
//! [`Transport`]; connection reuse, timeouts and TLS belong to the
//! transport.

mod http;

#[cfg(test)]
pub(crate) mod mock;

use std::fmt;

use davkit_rfc::rfc::dav::core::Depth;

pub use http::ReqwestTransport;
use crate::error::TransportResult;

/// HTTP methods issued by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DavMethod {
    Propfind,
    Report,
    Get,
    Put,
}

impl DavMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Propfind => "PROPFIND",
            Self::Report => "REPORT",
            Self::Get => "GET",
            Self::Put => "PUT",
        }
    }
}

impl fmt::Display for DavMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DavRequest {
    pub method: DavMethod,
    /// Server-absolute path, or a path relative to the transport's base URL.
    pub path: String,
    pub depth: Option<Depth>,
    pub content_type: Option<&'static str>,
    /// Additional headers, sent in order.
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl DavRequest {
    #[must_use]
    pub fn new(method: DavMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            depth: None,
            content_type: None,
            headers: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_depth(mut self, depth: Depth) -> Self {
        self.depth = Some(depth);
        self
    }

    #[must_use]
    pub fn with_headers<'a>(mut self, headers: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        self.headers.extend(
            headers
                .into_iter()
                .map(|(name, value)| (name.to_owned(), value.to_owned())),
        );
        self
    }

    #[must_use]
    pub fn with_body(mut self, content_type: &'static str, body: String) -> Self {
        self.content_type = Some(content_type);
        self.body = Some(body);
        self
    }

    /// Returns the value of a header set on this request.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A complete response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DavResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl DavResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests to a DAV server.
///
/// Implementations must be safe to share between concurrent operations.
pub trait Transport: Send + Sync {
    /// Sends `request` and returns the response, whatever its status.
    ///
    /// ## Errors
    /// Returns an error only for faults that prevent a response from being
    /// read, such as I/O failures or an unusable URL.
    fn execute(&self, request: DavRequest)
    -> impl Future<Output = TransportResult<DavResponse>> + Send;

    /// Returns the server-absolute, still-encoded path `path` addresses.
    ///
    /// The default treats every path as server-absolute.
    ///
    /// ## Errors
    /// Returns an error if `path` cannot be resolved.
    fn resolve_path(&self, path: &str) -> TransportResult<String> {
        Ok(path.to_owned())
    }
}
