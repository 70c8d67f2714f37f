//! Namespace-aware XML emitter for request bodies.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::rfc::dav::core::{NamespaceRegistry, QName, XmlElement, XmlNode};

#[derive(Debug, Clone)]
enum Op {
    Open(QName),
    Empty(QName),
    Text(String),
    Close(QName),
    Fragment(XmlElement),
}

/// Builds an XML document from a sequence of tag operations.
///
/// Names are resolved against a [`NamespaceRegistry`]; a namespace used by
/// any operation is registered on first use. Every namespace is declared
/// once on the root element when [`XmlEmitter::finish`] renders the document.
///
/// Closing a tag other than the innermost open one is a programming error
/// and panics.
#[derive(Debug)]
pub struct XmlEmitter {
    namespaces: NamespaceRegistry,
    ops: Vec<Op>,
    open: Vec<QName>,
    root_done: bool,
}

impl XmlEmitter {
    /// Creates an emitter using the given namespace table.
    #[must_use]
    pub fn new(namespaces: NamespaceRegistry) -> Self {
        Self {
            namespaces,
            ops: Vec::new(),
            open: Vec::new(),
            root_done: false,
        }
    }

    /// Returns the namespace table.
    #[must_use]
    pub fn namespaces(&self) -> &NamespaceRegistry {
        &self.namespaces
    }

    /// Opens an element.
    pub fn open_tag(&mut self, name: &QName) -> &mut Self {
        self.check_root();
        register(&mut self.namespaces, name);
        self.open.push(name.clone());
        self.ops.push(Op::Open(name.clone()));
        self
    }

    /// Writes an element with no content.
    pub fn empty_tag(&mut self, name: &QName) -> &mut Self {
        self.check_root();
        register(&mut self.namespaces, name);
        self.ops.push(Op::Empty(name.clone()));
        self.finish_root_if_closed();
        self
    }

    /// Writes an element containing only text.
    pub fn property(&mut self, name: &QName, text: &str) -> &mut Self {
        self.open_tag(name);
        self.ops.push(Op::Text(text.to_owned()));
        self.close_tag(name)
    }

    /// Closes the innermost open element.
    ///
    /// # Panics
    /// Panics if `name` is not the innermost open element.
    pub fn close_tag(&mut self, name: &QName) -> &mut Self {
        match self.open.pop() {
            Some(ref innermost) if innermost == name => {}
            Some(innermost) => {
                panic!("close_tag({name}) does not match innermost open tag {innermost}")
            }
            None => panic!("close_tag({name}) with no open tag"),
        }
        self.ops.push(Op::Close(name.clone()));
        self.finish_root_if_closed();
        self
    }

    /// Writes a previously parsed element and its content.
    pub fn element(&mut self, element: &XmlElement) -> &mut Self {
        self.check_root();
        register_tree(&mut self.namespaces, element);
        self.ops.push(Op::Fragment(element.clone()));
        self.finish_root_if_closed();
        self
    }

    /// Renders the document.
    ///
    /// # Panics
    /// Panics if an element is still open.
    ///
    /// ## Errors
    /// Returns an error if writing fails.
    pub fn finish(self) -> Result<String, quick_xml::Error> {
        if let Some(open) = self.open.last() {
            panic!("finish() with unclosed tag {open}");
        }

        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        let mut declared = false;
        for op in &self.ops {
            match op {
                Op::Open(name) => {
                    let start = self.start(name, &mut declared);
                    writer.write_event(Event::Start(start))?;
                }
                Op::Empty(name) => {
                    let start = self.start(name, &mut declared);
                    writer.write_event(Event::Empty(start))?;
                }
                Op::Text(text) => {
                    writer.write_event(Event::Text(BytesText::new(text)))?;
                }
                Op::Close(name) => {
                    writer.write_event(Event::End(BytesEnd::new(self.prefixed(name))))?;
                }
                Op::Fragment(element) => {
                    self.write_fragment(&mut writer, element, &mut declared)?;
                }
            }
        }

        into_string(writer.into_inner())
    }

    fn check_root(&self) {
        assert!(
            !self.root_done,
            "XML document already has a complete root element"
        );
    }

    fn finish_root_if_closed(&mut self) {
        if self.open.is_empty() {
            self.root_done = true;
        }
    }

    fn prefixed(&self, name: &QName) -> String {
        match self.namespaces.prefix_of(name.namespace_uri()) {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}:{}", name.local_name()),
            _ => name.local_name().to_owned(),
        }
    }

    fn start(&self, name: &QName, declared: &mut bool) -> BytesStart<'static> {
        let mut start = BytesStart::new(self.prefixed(name));
        if !*declared {
            for (prefix, uri) in self.namespaces.iter() {
                start.push_attribute((format!("xmlns:{prefix}").as_str(), uri));
            }
            *declared = true;
        }
        start
    }

    fn write_fragment<W: std::io::Write>(
        &self,
        writer: &mut Writer<W>,
        element: &XmlElement,
        declared: &mut bool,
    ) -> Result<(), quick_xml::Error> {
        let mut start = self.start(&element.name, declared);
        for (key, value) in &element.attributes {
            // Prefixed attributes lose their declaration when detached.
            if key.contains(':') && !key.starts_with("xml:") {
                continue;
            }
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if element.children.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        for node in &element.children {
            match node {
                XmlNode::Element(child) => self.write_fragment(writer, child, declared)?,
                XmlNode::Text(text) => {
                    writer.write_event(Event::Text(BytesText::new(text)))?;
                }
            }
        }
        writer.write_event(Event::End(BytesEnd::new(self.prefixed(&element.name))))?;
        Ok(())
    }
}

/// Registers the namespace of `name`; elements in no namespace stay unprefixed.
fn register(namespaces: &mut NamespaceRegistry, name: &QName) {
    namespaces.register(&name.namespace);
}

fn register_tree(namespaces: &mut NamespaceRegistry, element: &XmlElement) {
    register(namespaces, &element.name);
    for child in element.elements() {
        register_tree(namespaces, child);
    }
}

fn into_string(bytes: Vec<u8>) -> Result<String, quick_xml::Error> {
    String::from_utf8(bytes).map_err(|e| {
        tracing::error!("Generated invalid UTF-8 in XML body: {}", e);
        quick_xml::Error::Io(std::sync::Arc::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "Invalid UTF-8 in XML output",
        )))
    })
}

impl XmlElement {
    /// Serializes this element as a standalone document.
    ///
    /// ## Errors
    /// Returns an error if writing fails.
    pub fn to_xml(&self) -> Result<String, quick_xml::Error> {
        let mut emitter = XmlEmitter::new(NamespaceRegistry::new());
        emitter.element(self);
        emitter.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::dav::core::{Namespace, dav_names};
    use crate::rfc::dav::parse::read_document;

    #[test]
    fn declares_namespaces_on_root_only() {
        let mut emitter = XmlEmitter::new(NamespaceRegistry::with_dav());
        emitter
            .open_tag(&dav_names::propfind())
            .open_tag(&dav_names::prop())
            .empty_tag(&QName::caldav("calendar-data"))
            .empty_tag(&QName::new("http://example.com/ns", "color"))
            .close_tag(&dav_names::prop())
            .close_tag(&dav_names::propfind());

        let xml = emitter.finish().unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains(
            r#"<D:propfind xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav" xmlns:ns0="http://example.com/ns">"#
        ));
        assert!(xml.contains("<C:calendar-data/>"));
        assert!(xml.contains("<ns0:color/>"));
        assert_eq!(xml.matches("xmlns:").count(), 3);
    }

    #[test]
    fn property_escapes_text() {
        let mut emitter = XmlEmitter::new(NamespaceRegistry::with_dav());
        emitter.property(&dav_names::sync_token(), "http://example.com/sync?a=1&b=<2>");
        let xml = emitter.finish().unwrap();

        assert!(xml.contains("a=1&amp;b=&lt;2&gt;"));
        let root = read_document(xml.as_bytes()).unwrap();
        assert_eq!(root.text(), "http://example.com/sync?a=1&b=<2>");
    }

    #[test]
    #[should_panic(expected = "does not match innermost open tag")]
    fn mismatched_close_panics() {
        let mut emitter = XmlEmitter::new(NamespaceRegistry::with_dav());
        emitter
            .open_tag(&dav_names::propfind())
            .open_tag(&dav_names::prop())
            .close_tag(&dav_names::propfind());
    }

    #[test]
    #[should_panic(expected = "with no open tag")]
    fn close_without_open_panics() {
        let mut emitter = XmlEmitter::new(NamespaceRegistry::with_dav());
        emitter.close_tag(&dav_names::prop());
    }

    #[test]
    fn element_round_trips_through_reader() {
        let source = br#"<X:color xmlns:X="http://example.com/ns" kind="rgb"><X:r>255</X:r><D:href xmlns:D="DAV:">/a</D:href></X:color>"#;
        let element = read_document(source).unwrap();

        let xml = element.to_xml().unwrap();
        let reread = read_document(xml.as_bytes()).unwrap();

        assert_eq!(reread, element);
        assert_eq!(
            reread.name.namespace,
            Namespace::new("http://example.com/ns")
        );
    }
}
