//! `sync-collection` REPORT bodies (RFC 6578 §3.2).

use super::emitter::XmlEmitter;
use crate::rfc::dav::core::{Namespace, NamespaceRegistry, QName, dav_names};

/// The only sync level requested: immediate children.
pub const SYNC_LEVEL: &str = "1";

/// Builds a `sync-collection` body.
///
/// `sync_token` of `None` requests an initial sync and is sent as an empty
/// `sync-token` element. `getetag` is always requested; caller properties
/// are deduplicated against it and each other.
///
/// ## Errors
/// Returns an error if writing the document fails.
#[tracing::instrument(skip_all, fields(initial = sync_token.is_none(), properties = properties.len()))]
pub fn sync_collection_body(
    sync_token: Option<&str>,
    properties: &[QName],
    namespaces: &[Namespace],
) -> Result<String, quick_xml::Error> {
    let mut registry = NamespaceRegistry::with_dav();
    for namespace in namespaces {
        registry.register(namespace);
    }

    let mut emitter = XmlEmitter::new(registry);
    emitter.open_tag(&dav_names::sync_collection());

    match sync_token {
        Some(token) => emitter.property(&dav_names::sync_token(), token),
        None => emitter.empty_tag(&dav_names::sync_token()),
    };

    emitter.property(&dav_names::sync_level(), SYNC_LEVEL);
    emitter.open_tag(&dav_names::prop());

    let mut requested = vec![dav_names::getetag()];
    emitter.empty_tag(&dav_names::getetag());
    for property in properties {
        if requested.contains(property) {
            continue;
        }
        emitter.empty_tag(property);
        requested.push(property.clone());
    }

    emitter.close_tag(&dav_names::prop());
    emitter.close_tag(&dav_names::sync_collection());

    emitter.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::dav::parse::read_document;

    #[test]
    fn initial_sync_sends_empty_token() {
        let xml = sync_collection_body(None, &[], &[]).unwrap();
        let root = read_document(xml.as_bytes()).unwrap();

        assert_eq!(root.name, dav_names::sync_collection());
        let children: Vec<_> = root.elements().map(|e| e.name.clone()).collect();
        assert_eq!(
            children,
            vec![dav_names::sync_token(), dav_names::sync_level(), dav_names::prop()]
        );

        let token = root.child(&dav_names::sync_token()).unwrap();
        assert!(token.is_empty());
        assert_eq!(root.child(&dav_names::sync_level()).unwrap().text(), "1");
        assert!(xml.contains("<D:sync-token/>"));
    }

    #[test]
    fn incremental_sync_sends_previous_token() {
        let xml = sync_collection_body(
            Some("http://example.com/sync/42"),
            &[dav_names::getetag(), QName::caldav("calendar-data")],
            &[],
        )
        .unwrap();
        let root = read_document(xml.as_bytes()).unwrap();

        assert_eq!(
            root.child(&dav_names::sync_token()).unwrap().text(),
            "http://example.com/sync/42"
        );

        let props: Vec<_> = root
            .child(&dav_names::prop())
            .unwrap()
            .elements()
            .map(|e| e.name.clone())
            .collect();
        assert_eq!(props, vec![dav_names::getetag(), QName::caldav("calendar-data")]);
    }
}
