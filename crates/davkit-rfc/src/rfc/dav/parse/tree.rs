//! Namespace-aware reading of a whole XML document into an element tree.

use quick_xml::NsReader;
use quick_xml::encoding::Decoder;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::name::ResolveResult;

use super::error::{MultistatusError, ParseResult};
use crate::rfc::dav::core::{Namespace, QName, XmlElement};

/// Reads a document and returns its root element.
///
/// ## Errors
/// Returns an error if the document is not well-formed, uses an undeclared
/// prefix, or has no root element.
#[tracing::instrument(skip(xml), fields(xml_len = xml.len()))]
pub fn read_document(xml: &[u8]) -> ParseResult<XmlElement> {
    let mut reader = NsReader::from_reader(xml);
    let decoder = reader.decoder();

    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let (resolved, event) = reader.read_resolved_event_into(&mut buf)?;
        let namespace = resolve_namespace(resolved, decoder)?;

        match event {
            Event::Start(ref e) => {
                stack.push(start_element(e, namespace, decoder)?);
            }
            Event::Empty(ref e) => {
                let element = start_element(e, namespace, decoder)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| MultistatusError::Xml("unbalanced end tag".to_owned()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(ref e) => {
                if let Some(parent) = stack.last_mut() {
                    parent.push_text(&decoder.decode(e.as_ref())?);
                }
            }
            Event::CData(ref e) => {
                if let Some(parent) = stack.last_mut() {
                    parent.push_text(&decoder.decode(e.as_ref())?);
                }
            }
            Event::GeneralRef(ref e) => {
                if let Some(parent) = stack.last_mut() {
                    parent.push_text(&resolve_reference(e, decoder)?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(MultistatusError::Xml("unexpected end of document".to_owned()));
    }

    root.ok_or(MultistatusError::EmptyDocument)
}

fn resolve_namespace(resolved: ResolveResult<'_>, decoder: Decoder) -> ParseResult<Namespace> {
    match resolved {
        ResolveResult::Bound(ns) => Ok(Namespace::new(decoder.decode(ns.as_ref())?.into_owned())),
        ResolveResult::Unbound => Ok(Namespace::new("")),
        ResolveResult::Unknown(prefix) => Err(MultistatusError::UnknownPrefix(
            String::from_utf8_lossy(&prefix).into_owned(),
        )),
    }
}

fn start_element(
    e: &BytesStart<'_>,
    namespace: Namespace,
    decoder: Decoder,
) -> ParseResult<XmlElement> {
    let local_name = decoder.decode(e.local_name().as_ref())?.into_owned();
    let mut element = XmlElement::new(QName::new(namespace, local_name));

    for attr in e.attributes() {
        let attr = attr?;
        let key = decoder.decode(attr.key.as_ref())?;
        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }
        let value = attr
            .unescape_value()
            .map_err(|err| MultistatusError::Xml(err.to_string()))?
            .into_owned();
        element.attributes.push((key.into_owned(), value));
    }

    Ok(element)
}

fn resolve_reference(e: &BytesRef<'_>, decoder: Decoder) -> ParseResult<String> {
    if let Some(ch) = e
        .resolve_char_ref()
        .map_err(|err| MultistatusError::Xml(err.to_string()))?
    {
        return Ok(ch.to_string());
    }

    let name = decoder.decode(e.as_ref())?;
    resolve_predefined_entity(&name)
        .map(str::to_owned)
        .ok_or_else(|| MultistatusError::Xml(format!("unknown entity &{name};")))
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    mut element: XmlElement,
) -> ParseResult<()> {
    element.normalize_whitespace();

    if let Some(parent) = stack.last_mut() {
        parent.push_element(element);
        return Ok(());
    }

    if root.is_some() {
        return Err(MultistatusError::Xml(
            "more than one root element".to_owned(),
        ));
    }

    *root = Some(element);
    Ok(())
}
