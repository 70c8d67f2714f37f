//! XML namespaces, qualified names and the per-request namespace registry.

use std::borrow::Cow;
use std::fmt;

use davkit_core::error::{CoreError, CoreResult};

pub const DAV_NS: &str = "DAV:";
pub const CALDAV_NS: &str = "urn:ietf:params:xml:ns:caldav";
pub const CARDDAV_NS: &str = "urn:ietf:params:xml:ns:carddav";
/// Apple calendar server extensions.
pub const CS_NS: &str = "http://calendarserver.org/ns/";

/// Namespace URI of an element. The empty URI means "no namespace".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(pub Cow<'static, str>);

impl Namespace {
    pub const DAV: Self = Self(Cow::Borrowed(DAV_NS));
    pub const CALDAV: Self = Self(Cow::Borrowed(CALDAV_NS));

    #[must_use]
    pub fn new(uri: impl Into<Cow<'static, str>>) -> Self {
        Self(uri.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prefix used for well-known namespaces in generated documents.
    fn conventional_prefix(&self) -> Option<&'static str> {
        Some(match self.as_str() {
            DAV_NS => "D",
            CALDAV_NS => "C",
            CARDDAV_NS => "CR",
            CS_NS => "CS",
            _ => return None,
        })
    }
}

impl From<&'static str> for Namespace {
    fn from(uri: &'static str) -> Self {
        Self::new(uri)
    }
}

impl From<String> for Namespace {
    fn from(uri: String) -> Self {
        Self::new(uri)
    }
}

/// An expanded element name: namespace URI plus local name.
///
/// Prefixes never take part in comparison; they exist only while reading
/// or writing a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub namespace: Namespace,
    pub local_name: Cow<'static, str>,
}

impl QName {
    #[must_use]
    pub fn new(namespace: impl Into<Namespace>, local_name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            namespace: namespace.into(),
            local_name: local_name.into(),
        }
    }

    /// A name in the `DAV:` namespace.
    #[must_use]
    pub fn dav(local_name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Namespace::DAV, local_name)
    }

    /// A name in the `CalDAV` namespace.
    #[must_use]
    pub fn caldav(local_name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Namespace::CALDAV, local_name)
    }

    /// Parses Clark notation, `{namespace}local`.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidName` if the braces are missing or the
    /// local name is empty.
    pub fn from_clark(value: &str) -> CoreResult<Self> {
        let invalid = || CoreError::InvalidName(format!("expected {{namespace}}local, found {value:?}"));

        let rest = value.trim().strip_prefix('{').ok_or_else(invalid)?;
        let (namespace, local_name) = rest.split_once('}').ok_or_else(invalid)?;

        if local_name.is_empty() {
            return Err(invalid());
        }

        Ok(Self::new(namespace.to_owned(), local_name.to_owned()))
    }

    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    #[must_use]
    pub fn namespace_uri(&self) -> &str {
        self.namespace.as_str()
    }
}

/// Clark notation, the same form [`QName::from_clark`] reads.
impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}{}", self.namespace_uri(), self.local_name)
    }
}

/// `DAV:` element names used when building requests and reading responses.
pub mod dav_names {
    use super::QName;

    #[must_use]
    pub fn multistatus() -> QName {
        QName::dav("multistatus")
    }
    #[must_use]
    pub fn mkcol_response() -> QName {
        QName::dav("mkcol-response")
    }
    #[must_use]
    pub fn response() -> QName {
        QName::dav("response")
    }
    #[must_use]
    pub fn responsedescription() -> QName {
        QName::dav("responsedescription")
    }
    #[must_use]
    pub fn href() -> QName {
        QName::dav("href")
    }
    #[must_use]
    pub fn status() -> QName {
        QName::dav("status")
    }
    #[must_use]
    pub fn propstat() -> QName {
        QName::dav("propstat")
    }
    #[must_use]
    pub fn prop() -> QName {
        QName::dav("prop")
    }
    #[must_use]
    pub fn error() -> QName {
        QName::dav("error")
    }
    #[must_use]
    pub fn propfind() -> QName {
        QName::dav("propfind")
    }
    #[must_use]
    pub fn sync_collection() -> QName {
        QName::dav("sync-collection")
    }
    #[must_use]
    pub fn sync_token() -> QName {
        QName::dav("sync-token")
    }
    #[must_use]
    pub fn sync_level() -> QName {
        QName::dav("sync-level")
    }
    #[must_use]
    pub fn collection() -> QName {
        QName::dav("collection")
    }
    #[must_use]
    pub fn resourcetype() -> QName {
        QName::dav("resourcetype")
    }
    #[must_use]
    pub fn displayname() -> QName {
        QName::dav("displayname")
    }
    #[must_use]
    pub fn getetag() -> QName {
        QName::dav("getetag")
    }
}

/// Namespace table for one outgoing XML document.
///
/// Each namespace is stored once, keyed by URI, and assigned a prefix the
/// first time it is registered. Well-known namespaces keep their
/// conventional prefix; others get `ns0`, `ns1`, ...
#[derive(Debug, Clone, Default)]
pub struct NamespaceRegistry {
    entries: Vec<(Namespace, String)>,
    generated: usize,
}

impl NamespaceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with `DAV:` already registered.
    #[must_use]
    pub fn with_dav() -> Self {
        let mut registry = Self::new();
        registry.register(&Namespace::DAV);
        registry
    }

    /// Registers a namespace and returns its prefix.
    ///
    /// Registering an already known URI returns the existing prefix. The
    /// empty namespace cannot be bound to a prefix and is skipped.
    pub fn register(&mut self, namespace: &Namespace) -> Option<&str> {
        if namespace.as_str().is_empty() {
            return None;
        }

        let index = match self.position(namespace.as_str()) {
            Some(index) => index,
            None => {
                let prefix = self.next_prefix(namespace);
                self.entries.push((namespace.clone(), prefix));
                self.entries.len() - 1
            }
        };

        Some(&self.entries[index].1)
    }

    /// Returns the prefix assigned to a namespace URI.
    #[must_use]
    pub fn prefix_of(&self, uri: &str) -> Option<&str> {
        self.position(uri).map(|index| self.entries[index].1.as_str())
    }

    /// Iterates `(prefix, uri)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(namespace, prefix)| (prefix.as_str(), namespace.as_str()))
    }

    /// Returns the number of registered namespaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, uri: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(namespace, _)| namespace.as_str() == uri)
    }

    fn prefix_taken(&self, prefix: &str) -> bool {
        self.entries.iter().any(|(_, p)| p == prefix)
    }

    fn next_prefix(&mut self, namespace: &Namespace) -> String {
        if let Some(prefix) = namespace.conventional_prefix()
            && !self.prefix_taken(prefix)
        {
            return prefix.to_owned();
        }

        loop {
            let candidate = format!("ns{}", self.generated);
            self.generated += 1;
            if !self.prefix_taken(&candidate) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_clark_notation() {
        let name = QName::new("http://example.com/ns", "color");
        assert_eq!(name.to_string(), "{http://example.com/ns}color");
        assert_eq!(QName::from_clark(&name.to_string()).unwrap(), name);
    }

    #[test]
    fn qname_from_clark() {
        let qname = QName::from_clark("{urn:ietf:params:xml:ns:caldav}calendar-data").unwrap();
        assert_eq!(qname, QName::caldav("calendar-data"));

        let qname = QName::from_clark("{}bare").unwrap();
        assert_eq!(qname.namespace_uri(), "");
        assert_eq!(qname.local_name(), "bare");
    }

    #[test]
    fn qname_from_clark_rejects_plain_names() {
        assert!(QName::from_clark("getetag").is_err());
        assert!(QName::from_clark("{DAV:}").is_err());
        assert!(QName::from_clark("{DAV:getetag").is_err());
    }

    #[test]
    fn registry_dedupes_by_uri() {
        let mut registry = NamespaceRegistry::with_dav();
        let first = registry.register(&Namespace::DAV).map(str::to_owned);

        assert_eq!(first.as_deref(), Some("D"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn registry_skips_empty_namespace() {
        let mut registry = NamespaceRegistry::with_dav();

        assert_eq!(registry.register(&Namespace::new("")), None);
        assert_eq!(registry.iter().collect::<Vec<_>>(), vec![("D", "DAV:")]);
    }

    #[test]
    fn registry_generates_prefixes_for_unknown_namespaces() {
        let mut registry = NamespaceRegistry::with_dav();
        registry.register(&Namespace::new("http://example.com/a"));
        registry.register(&Namespace::CALDAV);
        registry.register(&Namespace::new("http://example.com/b"));
        registry.register(&Namespace::new("http://example.com/a"));

        let pairs: Vec<_> = registry.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("D", "DAV:"),
                ("ns0", "http://example.com/a"),
                ("C", CALDAV_NS),
                ("ns1", "http://example.com/b"),
            ]
        );
        assert_eq!(registry.prefix_of(CALDAV_NS), Some("C"));
        assert_eq!(registry.prefix_of("http://example.com/missing"), None);
    }
}
