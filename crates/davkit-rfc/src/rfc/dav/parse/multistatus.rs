//! `multistatus` and `mkcol-response` parsing.
//!
//! Grammar, in document order:
//!
//! ```text
//! root     := response* responsedescription? sync-token?
//! response := href ((href*, status) | propstat+) error? responsedescription?
//! propstat := prop status error? responsedescription?
//! ```
//!
//! `sync-token` is recognised by name wherever it appears among the root's
//! children; `responsedescription` may only be followed by `sync-token`.

use super::error::{MultistatusError, ParseResult};
use super::tree::read_document;
use crate::rfc::dav::core::{
    Href, Multistatus, Propstat, QName, ResponseElement, Status, XmlElement, dav_names,
};

/// Root element a caller expects in a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultistatusRoot {
    /// `DAV:multistatus`, returned by `PROPFIND` and `REPORT`.
    Multistatus,
    /// `DAV:mkcol-response`, returned by extended `MKCOL` (RFC 5689).
    MkcolResponse,
}

impl MultistatusRoot {
    /// Returns the qualified name of the root element.
    #[must_use]
    pub fn qname(self) -> QName {
        match self {
            Self::Multistatus => dav_names::multistatus(),
            Self::MkcolResponse => dav_names::mkcol_response(),
        }
    }
}

/// Parses a `multistatus` response body.
///
/// ## Errors
/// Returns an error if the body is not well-formed XML or does not follow
/// the multistatus grammar.
pub fn parse_multistatus(xml: &[u8]) -> ParseResult<Multistatus> {
    parse_document(xml, MultistatusRoot::Multistatus)
}

/// Parses an extended `MKCOL` response body.
///
/// ## Errors
/// Returns an error if the body is not well-formed XML or does not follow
/// the multistatus grammar.
pub fn parse_mkcol_response(xml: &[u8]) -> ParseResult<Multistatus> {
    parse_document(xml, MultistatusRoot::MkcolResponse)
}

/// Parses a response body whose root must be `expected`.
///
/// ## Errors
/// Returns `UnexpectedRootElement` if the root does not match, or any other
/// [`MultistatusError`] for a grammar violation.
#[tracing::instrument(skip(xml), fields(xml_len = xml.len()))]
pub fn parse_document(xml: &[u8], expected: MultistatusRoot) -> ParseResult<Multistatus> {
    let root = read_document(xml)?;
    let multistatus = multistatus_from_element(&root, expected)?;

    tracing::debug!(
        responses = multistatus.responses.len(),
        has_sync_token = multistatus.sync_token.is_some(),
        "Parsed multistatus"
    );

    Ok(multistatus)
}

/// Interprets an already-read root element.
///
/// ## Errors
/// Same as [`parse_document`], minus XML well-formedness errors.
pub fn multistatus_from_element(
    root: &XmlElement,
    expected: MultistatusRoot,
) -> ParseResult<Multistatus> {
    let expected_name = expected.qname();
    if !root.is(&expected_name) {
        return Err(MultistatusError::UnexpectedRootElement {
            expected: expected_name,
            found: root.name.clone(),
        });
    }

    let children: Vec<&XmlElement> = root.elements().collect();
    let mut multistatus = Multistatus::default();

    for (index, child) in children.iter().enumerate() {
        if child.is(&dav_names::responsedescription()) {
            if let Some(following) = children[index + 1..]
                .iter()
                .find(|c| !c.is(&dav_names::sync_token()))
            {
                return Err(MultistatusError::MisplacedResponseDescription {
                    following: following.name.clone(),
                });
            }
            multistatus.description = Some(child.text());
        } else if child.is(&dav_names::sync_token()) {
            if multistatus.sync_token.is_some() {
                return Err(MultistatusError::DuplicateSyncToken);
            }
            multistatus.sync_token = Some(child.text());
        } else if child.is(&dav_names::response()) {
            multistatus.responses.push(parse_response(child)?);
        } else {
            return Err(MultistatusError::MalformedMultistatus {
                found: child.name.clone(),
            });
        }
    }

    Ok(multistatus)
}

fn parse_response(element: &XmlElement) -> ParseResult<ResponseElement> {
    let mut children = element.elements();

    let href = match children.next() {
        Some(first) if first.is(&dav_names::href()) => Href::new(first.text()),
        other => {
            return Err(MultistatusError::MissingHref {
                found: other.map(|e| e.name.clone()),
            });
        }
    };

    let mut response = ResponseElement::new(href);
    let href = || response_label(element);

    for child in children {
        if child.is(&dav_names::href()) {
            if response.status.is_some() || !response.propstats.is_empty() {
                return Err(MultistatusError::UnexpectedResponseChild {
                    href: href(),
                    found: child.name.clone(),
                });
            }
            response.extra_hrefs.push(Href::new(child.text()));
        } else if child.is(&dav_names::status()) {
            if !response.propstats.is_empty() {
                return Err(MultistatusError::ConflictingResponseForm { href: href() });
            }
            if response.status.is_some() {
                return Err(MultistatusError::UnexpectedResponseChild {
                    href: href(),
                    found: child.name.clone(),
                });
            }
            response.status = Some(parse_status(child)?);
        } else if child.is(&dav_names::propstat()) {
            if response.status.is_some() || !response.extra_hrefs.is_empty() {
                return Err(MultistatusError::ConflictingResponseForm { href: href() });
            }
            response.propstats.push(parse_propstat(child)?);
        } else if child.is(&dav_names::error()) {
            if response.error.is_some() {
                return Err(MultistatusError::DuplicateError { href: href() });
            }
            response.error = Some(child.clone());
        } else if child.is(&dav_names::responsedescription()) {
            if response.description.is_some() {
                return Err(MultistatusError::DuplicateResponseDescription { href: href() });
            }
            response.description = Some(child.text());
        } else {
            return Err(MultistatusError::UnexpectedResponseChild {
                href: href(),
                found: child.name.clone(),
            });
        }
    }

    if response.status.is_none() && response.propstats.is_empty() {
        return Err(MultistatusError::IncompleteResponse { href: href() });
    }

    Ok(response)
}

fn parse_propstat(element: &XmlElement) -> ParseResult<Propstat> {
    let mut children = element.elements();

    let prop = match children.next() {
        Some(first) if first.is(&dav_names::prop()) => first,
        other => {
            return Err(MultistatusError::MissingProp {
                found: other.map(|e| e.name.clone()),
            });
        }
    };

    let status = match children.next() {
        Some(second) if second.is(&dav_names::status()) => parse_status(second)?,
        other => {
            return Err(MultistatusError::MissingPropstatStatus {
                found: other.map(|e| e.name.clone()),
            });
        }
    };

    let mut propstat = Propstat {
        properties: prop.elements().cloned().collect(),
        status,
        error: None,
        description: None,
    };

    for child in children {
        if child.is(&dav_names::error()) && propstat.error.is_none() && propstat.description.is_none()
        {
            propstat.error = Some(child.clone());
        } else if child.is(&dav_names::responsedescription()) && propstat.description.is_none() {
            propstat.description = Some(child.text());
        } else {
            return Err(MultistatusError::UnexpectedPropstatChild {
                found: child.name.clone(),
            });
        }
    }

    Ok(propstat)
}

/// Reads a `status` element, `HTTP/<version> <code> <reason>`.
fn parse_status(element: &XmlElement) -> ParseResult<Status> {
    let line = element.text();
    Status::from_status_line(&line).ok_or(MultistatusError::BadHttpStatusLine { line })
}

fn response_label(element: &XmlElement) -> String {
    element
        .child(&dav_names::href())
        .map(XmlElement::text)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MKCOL_RESPONSE: &[u8] = br#"<?xml version="1.0" encoding="utf-8"?>
<D:mkcol-response xmlns:D="DAV:">
  <D:response>
    <D:href>/cal/new/</D:href>
    <D:propstat>
      <D:prop><D:displayname/></D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
</D:mkcol-response>"#;

    #[test]
    fn mkcol_response_root() {
        let parsed = parse_mkcol_response(MKCOL_RESPONSE).unwrap();
        assert_eq!(parsed.responses.len(), 1);
        assert_eq!(parsed.responses[0].href.as_str(), "/cal/new/");
    }

    #[test]
    fn mkcol_response_is_not_a_multistatus() {
        let err = parse_multistatus(MKCOL_RESPONSE).unwrap_err();
        assert_eq!(
            err,
            MultistatusError::UnexpectedRootElement {
                expected: dav_names::multistatus(),
                found: dav_names::mkcol_response(),
            }
        );
    }

    #[test]
    fn status_element_text_must_be_a_status_line() {
        let element = XmlElement::with_text(dav_names::status(), "HTTP/1.1 OK");
        assert_eq!(
            parse_status(&element).unwrap_err(),
            MultistatusError::BadHttpStatusLine {
                line: "HTTP/1.1 OK".to_owned()
            }
        );
    }
}
