//! Per-resource descriptors built from multistatus responses.

use std::cmp::Ordering;

use crate::rfc::dav::core::href::{decode_path, decode_uri};
use crate::rfc::dav::core::{QName, Status, XmlElement, dav_names};

/// One property returned for a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyValue {
    /// Property name.
    pub name: QName,
    /// The property element as returned; interpretation is up to the caller.
    pub element: XmlElement,
    /// Status of the propstat group the property came from.
    pub status: Status,
}

impl PropertyValue {
    /// Returns the trimmed text content of the property.
    #[must_use]
    pub fn text(&self) -> String {
        self.element.text()
    }

    /// Returns true if the server reported the property with a 2xx status.
    #[must_use]
    pub fn is_found(&self) -> bool {
        self.status.is_success()
    }
}

/// A resource discovered by `PROPFIND` or `REPORT`.
///
/// `status` is set for href+status responses; href+propstat responses carry
/// a status per property instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildResource {
    /// URL-decoded href, absolute or server-relative.
    pub uri: String,
    /// Decoded path of the href, origin and query removed before decoding.
    pub path: String,
    /// Further decoded hrefs sharing `status`.
    pub extra_uris: Vec<String>,
    pub display_name: Option<String>,
    /// True iff `resourcetype` contained `DAV:collection`.
    pub is_collection: bool,
    /// Children of `resourcetype`, in order.
    pub resource_types: Vec<XmlElement>,
    /// Properties in the order the server returned them.
    pub properties: Vec<PropertyValue>,
    pub status: Option<Status>,
    pub error: Option<XmlElement>,
    pub description: Option<String>,
}

impl ChildResource {
    /// Creates a descriptor from a still-encoded href.
    #[must_use]
    pub fn new(href: &str) -> Self {
        Self {
            uri: decode_uri(href),
            path: decode_path(href),
            extra_uris: Vec::new(),
            display_name: None,
            is_collection: false,
            resource_types: Vec::new(),
            properties: Vec::new(),
            status: None,
            error: None,
            description: None,
        }
    }

    /// Returns the property with the given name.
    #[must_use]
    pub fn find_property(&self, name: &QName) -> Option<&PropertyValue> {
        self.properties.iter().find(|p| p.name == *name)
    }

    /// Returns the entity tag if the server reported one.
    #[must_use]
    pub fn etag(&self) -> Option<String> {
        self.find_property(&dav_names::getetag())
            .filter(|p| p.is_found())
            .map(PropertyValue::text)
    }

    /// Returns true if `resourcetype` contained the given marker.
    #[must_use]
    pub fn has_resource_type(&self, name: &QName) -> bool {
        self.resource_types.iter().any(|rt| rt.is(name))
    }

    /// Returns true if the resource itself was reported with a non-2xx
    /// status, e.g. a member removed since the last sync.
    #[must_use]
    pub fn is_gone(&self) -> bool {
        self.status.is_some_and(|status| !status.is_success())
    }

    /// Ordering for display: non-collections first, then by display name,
    /// with unnamed resources before named ones.
    #[must_use]
    pub fn display_order(&self, other: &Self) -> Ordering {
        self.is_collection
            .cmp(&other.is_collection)
            .then_with(|| match (&self.display_name, &other.display_name) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

/// Interpreted multistatus: resources plus document-level values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultistatusResult {
    /// Resources in document order.
    pub children: Vec<ChildResource>,
    pub response_description: Option<String>,
    /// New token returned by `sync-collection`.
    pub sync_token: Option<String>,
}

impl MultistatusResult {
    /// Resources reported with a non-2xx resource status.
    pub fn removed(&self) -> impl Iterator<Item = &ChildResource> {
        self.children.iter().filter(|child| child.is_gone())
    }

    /// Resources reported as present.
    pub fn changed(&self) -> impl Iterator<Item = &ChildResource> {
        self.children.iter().filter(|child| !child.is_gone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: Option<&str>, is_collection: bool) -> ChildResource {
        let mut child = ChildResource::new("/x");
        child.display_name = name.map(str::to_owned);
        child.is_collection = is_collection;
        child
    }

    #[test]
    fn display_order_puts_collections_last() {
        let mut children = vec![
            named(Some("b"), true),
            named(Some("z"), false),
            named(None, false),
            named(Some("a"), true),
            named(Some("m"), false),
        ];
        children.sort_by(ChildResource::display_order);

        let order: Vec<_> = children
            .iter()
            .map(|c| (c.is_collection, c.display_name.as_deref()))
            .collect();
        assert_eq!(
            order,
            vec![
                (false, None),
                (false, Some("m")),
                (false, Some("z")),
                (true, Some("a")),
                (true, Some("b")),
            ]
        );
    }

    #[test]
    fn etag_ignores_missing_property() {
        let mut child = ChildResource::new("/cal/a.ics");
        child.properties.push(PropertyValue {
            name: dav_names::getetag(),
            element: XmlElement::new(dav_names::getetag()),
            status: Status::NOT_FOUND,
        });
        assert_eq!(child.etag(), None);

        child.properties[0] = PropertyValue {
            name: dav_names::getetag(),
            element: XmlElement::with_text(dav_names::getetag(), "\"e1\""),
            status: Status::OK,
        };
        assert_eq!(child.etag().as_deref(), Some("\"e1\""));
    }

    #[test]
    fn removed_and_changed_split_on_status() {
        let mut gone = ChildResource::new("/cal/old.ics");
        gone.status = Some(Status::NOT_FOUND);
        let present = ChildResource::new("/cal/new.ics");

        let result = MultistatusResult {
            children: vec![gone, present],
            response_description: None,
            sync_token: Some("t2".to_owned()),
        };

        assert_eq!(result.removed().count(), 1);
        assert_eq!(result.changed().next().unwrap().uri, "/cal/new.ics");
    }
}
