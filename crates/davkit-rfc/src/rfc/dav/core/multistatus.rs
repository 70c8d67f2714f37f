//! Structural multistatus types (RFC 4918 §14.16, RFC 6578 §6.4).
//!
//! These mirror the document grammar one to one. Interpretation into
//! per-resource descriptors happens in [`crate::rfc::dav::model`].

use super::element::XmlElement;
use super::href::Href;
use super::status::Status;

/// A parsed `multistatus` or `mkcol-response` document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Multistatus {
    /// Individual responses, in document order.
    pub responses: Vec<ResponseElement>,
    /// Optional response description.
    pub description: Option<String>,
    /// Sync token (for sync-collection).
    pub sync_token: Option<String>,
}

impl Multistatus {
    /// Returns true if there are no responses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

/// A single `response` element.
///
/// Exactly one of `status` (href+status form) and `propstats`
/// (href+propstat form) is populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseElement {
    /// The first `href`.
    pub href: Href,
    /// Further `href`s sharing `status` in the href+status form.
    pub extra_hrefs: Vec<Href>,
    /// Resource-level status.
    pub status: Option<Status>,
    /// Property groups, one per distinct status.
    pub propstats: Vec<Propstat>,
    /// Optional `error` element.
    pub error: Option<XmlElement>,
    /// Optional response description.
    pub description: Option<String>,
}

impl ResponseElement {
    /// Creates a response for an href with nothing else filled in.
    #[must_use]
    pub fn new(href: impl Into<Href>) -> Self {
        Self {
            href: href.into(),
            extra_hrefs: Vec::new(),
            status: None,
            propstats: Vec::new(),
            error: None,
            description: None,
        }
    }
}

/// A `propstat` element: properties sharing one status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Propstat {
    /// Children of `prop`, in document order.
    pub properties: Vec<XmlElement>,
    /// HTTP status for every property in the group.
    pub status: Status,
    /// Optional `error` element.
    pub error: Option<XmlElement>,
    /// Optional description.
    pub description: Option<String>,
}
