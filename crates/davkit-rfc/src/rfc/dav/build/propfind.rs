//! `PROPFIND` request bodies.

use super::emitter::XmlEmitter;
use crate::rfc::dav::core::{Namespace, NamespaceRegistry, QName, dav_names};

/// Properties requested by every `PROPFIND`.
#[must_use]
pub fn default_properties() -> [QName; 2] {
    [dav_names::displayname(), dav_names::resourcetype()]
}

/// Builds a `PROPFIND` body requesting `displayname`, `resourcetype` and
/// `properties`.
///
/// Caller properties are deduplicated against the defaults and each other.
/// `namespaces` are declared on the root even when unused.
///
/// ## Errors
/// Returns an error if writing the document fails.
#[tracing::instrument(skip_all, fields(properties = properties.len()))]
pub fn propfind_body(properties: &[QName], namespaces: &[Namespace]) -> Result<String, quick_xml::Error> {
    let mut registry = NamespaceRegistry::with_dav();
    for namespace in namespaces {
        registry.register(namespace);
    }

    let mut emitter = XmlEmitter::new(registry);
    emitter.open_tag(&dav_names::propfind());
    emitter.open_tag(&dav_names::prop());

    let mut requested: Vec<QName> = Vec::with_capacity(properties.len() + 2);
    for property in default_properties().iter().chain(properties) {
        if requested.contains(property) {
            continue;
        }
        emitter.empty_tag(property);
        requested.push(property.clone());
    }

    emitter.close_tag(&dav_names::prop());
    emitter.close_tag(&dav_names::propfind());

    tracing::debug!(requested = requested.len(), "Built PROPFIND body");

    emitter.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::dav::parse::read_document;

    fn requested(xml: &str) -> Vec<QName> {
        let root = read_document(xml.as_bytes()).unwrap();
        assert_eq!(root.name, dav_names::propfind());
        root.child(&dav_names::prop())
            .unwrap()
            .elements()
            .map(|e| e.name.clone())
            .collect()
    }

    #[test]
    fn defaults_only() {
        let xml = propfind_body(&[], &[]).unwrap();
        assert_eq!(requested(&xml), default_properties().to_vec());
    }

    #[test]
    fn caller_properties_are_deduplicated() {
        let xml = propfind_body(
            &[
                dav_names::resourcetype(),
                dav_names::getetag(),
                QName::caldav("calendar-data"),
                dav_names::getetag(),
                dav_names::displayname(),
            ],
            &[],
        )
        .unwrap();

        assert_eq!(
            requested(&xml),
            vec![
                dav_names::displayname(),
                dav_names::resourcetype(),
                dav_names::getetag(),
                QName::caldav("calendar-data"),
            ]
        );
    }

    #[test]
    fn extra_namespaces_are_declared_on_root() {
        let xml = propfind_body(&[], &[Namespace::new("http://example.com/ns")]).unwrap();
        assert!(xml.contains(r#"<D:propfind xmlns:D="DAV:" xmlns:ns0="http://example.com/ns">"#));
    }

    #[test]
    fn empty_namespace_is_not_declared() {
        let xml = propfind_body(&[], &[Namespace::new("")]).unwrap();
        assert!(xml.contains(r#"<D:propfind xmlns:D="DAV:">"#));
        assert!(!xml.contains(r#"xmlns:ns0"#));
    }
}
