//! Owned XML element tree.
//!
//! Responses are read into this form before the multistatus grammar is
//! checked, and property values are handed to callers as subtrees.

use super::namespace::QName;

/// A node inside an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// A namespace-resolved XML element and its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// Resolved element name.
    pub name: QName,
    /// Attributes other than namespace declarations, as written.
    pub attributes: Vec<(String, String)>,
    /// Child elements and text, in document order.
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Creates an empty element.
    #[must_use]
    pub fn new(name: QName) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Creates an element containing only text.
    #[must_use]
    pub fn with_text(name: QName, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.push_text(&text.into());
        element
    }

    /// Appends a child element.
    pub fn push_element(&mut self, child: Self) {
        self.children.push(XmlNode::Element(child));
    }

    /// Appends text, merging with a preceding text node.
    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        if let Some(XmlNode::Text(existing)) = self.children.last_mut() {
            existing.push_str(text);
        } else {
            self.children.push(XmlNode::Text(text.to_owned()));
        }
    }

    /// Returns true if this element has the given name.
    #[must_use]
    pub fn is(&self, name: &QName) -> bool {
        self.name == *name
    }

    /// Iterates the child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// Consumes the element, returning its child elements.
    #[must_use]
    pub fn into_elements(self) -> Vec<XmlElement> {
        self.children
            .into_iter()
            .filter_map(|node| match node {
                XmlNode::Element(element) => Some(element),
                XmlNode::Text(_) => None,
            })
            .collect()
    }

    /// Returns the first child element with the given name.
    #[must_use]
    pub fn child(&self, name: &QName) -> Option<&XmlElement> {
        self.elements().find(|element| element.is(name))
    }

    /// Returns the direct text content with surrounding whitespace trimmed.
    #[must_use]
    pub fn text(&self) -> String {
        let mut text = String::new();
        for node in &self.children {
            if let XmlNode::Text(value) = node {
                text.push_str(value);
            }
        }
        text.trim().to_owned()
    }

    /// Returns true if there are no child elements and no non-blank text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.iter().all(|node| match node {
            XmlNode::Element(_) => false,
            XmlNode::Text(text) => text.trim().is_empty(),
        })
    }

    /// Returns the value of an unprefixed attribute.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Drops whitespace-only text nodes when the element has element children.
    pub(crate) fn normalize_whitespace(&mut self) {
        let has_elements = self
            .children
            .iter()
            .any(|node| matches!(node, XmlNode::Element(_)));

        if has_elements {
            self.children.retain(|node| match node {
                XmlNode::Element(_) => true,
                XmlNode::Text(text) => !text.trim().is_empty(),
            });
        }
    }
}
