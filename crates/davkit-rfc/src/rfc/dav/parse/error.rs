//! Multistatus parse error types.

use thiserror::Error;

use crate::rfc::dav::core::QName;

/// Result type for DAV response parsing.
pub type ParseResult<T> = Result<T, MultistatusError>;

/// A fatal protocol violation found while reading a DAV response.
///
/// Every variant names the offending element so the caller can report it.
/// None of these are recoverable: they mean the server and client disagree
/// about the protocol.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MultistatusError {
    #[error("XML error: {0}")]
    Xml(String),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("document has no root element")]
    EmptyDocument,

    #[error("unbound namespace prefix: {0}")]
    UnknownPrefix(String),

    #[error("expected root element {expected}, found {found}")]
    UnexpectedRootElement { expected: QName, found: QName },

    #[error("bad multistatus: expected (response*, responsedescription?, sync-token?), found {found}")]
    MalformedMultistatus { found: QName },

    #[error("bad multistatus: responsedescription must be the last element, found {following} after it")]
    MisplacedResponseDescription { following: QName },

    #[error("bad multistatus: more than one sync-token")]
    DuplicateSyncToken,

    #[error("bad response: expected href, found {}", describe(.found.as_ref()))]
    MissingHref { found: Option<QName> },

    #[error("bad response for {href}: cannot have both status and propstat")]
    ConflictingResponseForm { href: String },

    #[error("bad response for {href}: neither status nor propstat present")]
    IncompleteResponse { href: String },

    #[error("bad response for {href}: unexpected element {found}")]
    UnexpectedResponseChild { href: String, found: QName },

    #[error("bad response for {href}: multiple error elements")]
    DuplicateError { href: String },

    #[error("bad response for {href}: multiple responsedescription elements")]
    DuplicateResponseDescription { href: String },

    #[error("bad propstat: expected prop, found {}", describe(.found.as_ref()))]
    MissingProp { found: Option<QName> },

    #[error("bad propstat: expected status, found {}", describe(.found.as_ref()))]
    MissingPropstatStatus { found: Option<QName> },

    #[error("bad propstat: expected error or responsedescription, found {found}")]
    UnexpectedPropstatChild { found: QName },

    #[error("bad http status line: {line:?}")]
    BadHttpStatusLine { line: String },

    #[error("expected a single response, found {count}")]
    MultipleResponsesForSingleResource { count: usize },
}

fn describe(found: Option<&QName>) -> String {
    found.map_or_else(|| "nothing".to_owned(), ToString::to_string)
}

impl From<quick_xml::Error> for MultistatusError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for MultistatusError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml(err.to_string())
    }
}

impl From<quick_xml::encoding::EncodingError> for MultistatusError {
    fn from(err: quick_xml::encoding::EncodingError) -> Self {
        Self::Encoding(err.to_string())
    }
}
