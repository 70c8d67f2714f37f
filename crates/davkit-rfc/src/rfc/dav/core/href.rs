//! DAV href type.

use std::fmt;

use percent_encoding::percent_decode_str;

/// A `WebDAV` href as it appeared on the wire (still percent-encoded).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Href(pub String);

impl Href {
    /// Creates a new href.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the href as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// URL-decodes the href.
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected.
    #[must_use]
    pub fn decode(&self) -> String {
        decode_uri(&self.0)
    }

    /// Returns the decoded path, with origin and query removed first.
    ///
    /// `%23` and `%3F` decode to `#` and `?` inside the path instead of
    /// ending it.
    #[must_use]
    pub fn path(&self) -> String {
        decode_path(&self.0)
    }
}

impl fmt::Display for Href {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Href {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Href {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Percent-decodes a URI or path.
#[must_use]
pub fn decode_uri(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

/// Returns the path component of an absolute or server-relative URI.
///
/// `http://host:8080/cal/a.ics?x=1` and `/cal/a.ics` both yield `/cal/a.ics`.
/// `uri` must still be percent-encoded.
#[must_use]
pub fn uri_path(uri: &str) -> &str {
    let without_authority = match uri.find("://") {
        Some(scheme_end) => {
            let after = &uri[scheme_end + 3..];
            after.find('/').map_or("/", |slash| &after[slash..])
        }
        None => uri,
    };

    let end = without_authority
        .find(['?', '#'])
        .unwrap_or(without_authority.len());
    &without_authority[..end]
}

/// Extracts the path of an encoded URI and percent-decodes it.
#[must_use]
pub fn decode_path(uri: &str) -> String {
    decode_uri(uri_path(uri))
}

/// Returns true if two decoded paths are equal.
///
/// Trailing slashes are ignored so that `/cal` and `/cal/` compare equal.
#[must_use]
pub fn same_path(a: &str, b: &str) -> bool {
    a.trim_end_matches('/') == b.trim_end_matches('/')
}

/// Appends a trailing slash to a collection path if it has none.
#[must_use]
pub fn collection_path(path: &str) -> String {
    if path.ends_with('/') {
        path.to_owned()
    } else {
        format!("{path}/")
    }
}
