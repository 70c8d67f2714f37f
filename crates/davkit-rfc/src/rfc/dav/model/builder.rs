//! Conversion of structural responses into [`ChildResource`] values.

use super::resource::{ChildResource, MultistatusResult, PropertyValue};
use crate::rfc::dav::core::href::{decode_path, same_path};
use crate::rfc::dav::core::{Href, Multistatus, ResponseElement, dav_names};
use crate::rfc::dav::parse::{MultistatusError, ParseResult};

/// Builds the descriptor for one `response` element.
///
/// Every `prop` child becomes a [`PropertyValue`] tagged with its propstat
/// status, except `resourcetype`, whose children populate
/// `resource_types` and `is_collection`.
#[must_use]
pub fn build_child(response: ResponseElement) -> ChildResource {
    let mut child = ChildResource::new(response.href.as_str());
    child.extra_uris = response.extra_hrefs.iter().map(Href::decode).collect();
    child.status = response.status;
    child.error = response.error;
    child.description = response.description;

    for propstat in response.propstats {
        let status = propstat.status;

        for element in propstat.properties {
            if element.is(&dav_names::resourcetype()) {
                for resource_type in element.into_elements() {
                    if resource_type.is(&dav_names::collection()) {
                        child.is_collection = true;
                    }
                    child.resource_types.push(resource_type);
                }
                continue;
            }

            if element.is(&dav_names::displayname()) && status.is_success() {
                child.display_name = Some(element.text());
            }

            child.properties.push(PropertyValue {
                name: element.name.clone(),
                element,
                status,
            });
        }
    }

    child
}

/// Builds the full result, keeping every response.
#[must_use]
pub fn build_result(multistatus: Multistatus) -> MultistatusResult {
    MultistatusResult {
        children: multistatus.responses.into_iter().map(build_child).collect(),
        response_description: multistatus.description,
        sync_token: multistatus.sync_token,
    }
}

/// Builds the members of a collection, dropping the collection's own entry.
///
/// A depth-1 `PROPFIND` reports the collection itself alongside its
/// members; the entry whose path equals `parent_path` is removed.
/// `parent_path` must be server-absolute and still percent-encoded.
#[must_use]
pub fn build_children(multistatus: Multistatus, parent_path: &str) -> Vec<ChildResource> {
    let parent = decode_path(parent_path);

    multistatus
        .responses
        .into_iter()
        .map(build_child)
        .filter(|child| {
            let is_self = same_path(&child.path, &parent);
            if is_self {
                tracing::trace!(uri = %child.uri, "Skipping collection self-reference");
            }
            !is_self
        })
        .collect()
}

/// Builds the descriptor for a depth-0 request.
///
/// ## Errors
/// Returns `MultipleResponsesForSingleResource` if more than one `response`
/// was returned. No response at all yields `Ok(None)`.
pub fn build_single(multistatus: Multistatus) -> ParseResult<Option<ChildResource>> {
    let count = multistatus.responses.len();
    if count > 1 {
        return Err(MultistatusError::MultipleResponsesForSingleResource { count });
    }

    Ok(multistatus.responses.into_iter().next().map(build_child))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::dav::core::{Propstat, QName, Status, XmlElement};

    fn resourcetype(markers: &[QName]) -> XmlElement {
        let mut element = XmlElement::new(dav_names::resourcetype());
        for marker in markers {
            element.push_element(XmlElement::new(marker.clone()));
        }
        element
    }

    fn propstat_response(href: &str, status: Status, properties: Vec<XmlElement>) -> ResponseElement {
        let mut response = ResponseElement::new(href);
        response.propstats.push(Propstat {
            properties,
            status,
            error: None,
            description: None,
        });
        response
    }

    #[test]
    fn resourcetype_becomes_markers_not_a_property() {
        let response = propstat_response(
            "/cal/",
            Status::OK,
            vec![
                resourcetype(&[dav_names::collection(), QName::caldav("calendar")]),
                XmlElement::with_text(dav_names::displayname(), "Work"),
            ],
        );

        let child = build_child(response);
        assert!(child.is_collection);
        assert!(child.has_resource_type(&QName::caldav("calendar")));
        assert_eq!(child.resource_types.len(), 2);
        assert_eq!(child.display_name.as_deref(), Some("Work"));
        assert_eq!(child.properties.len(), 1);
        assert_eq!(child.properties[0].name, dav_names::displayname());
        assert!(child.status.is_none());
    }

    #[test]
    fn non_collection_resourcetype() {
        let response = propstat_response(
            "/cal/a.ics",
            Status::OK,
            vec![resourcetype(&[QName::caldav("calendar")])],
        );
        assert!(!build_child(response).is_collection);
    }

    #[test]
    fn missing_displayname_is_not_used_as_name() {
        let response = propstat_response(
            "/cal/a.ics",
            Status::NOT_FOUND,
            vec![XmlElement::new(dav_names::displayname())],
        );

        let child = build_child(response);
        assert_eq!(child.display_name, None);
        assert_eq!(child.properties[0].status, Status::NOT_FOUND);
    }

    #[test]
    fn href_status_form_keeps_status_and_decodes_all_hrefs() {
        let mut response = ResponseElement::new("/cal/a%20b.ics");
        response.extra_hrefs.push(Href::new("/cal/c%2Bd.ics"));
        response.status = Some(Status::NOT_FOUND);

        let child = build_child(response);
        assert_eq!(child.uri, "/cal/a b.ics");
        assert_eq!(child.extra_uris, vec!["/cal/c+d.ics"]);
        assert_eq!(child.status, Some(Status::NOT_FOUND));
        assert!(child.properties.is_empty());
    }

    #[test]
    fn build_children_filters_parent_by_path() {
        let multistatus = Multistatus {
            responses: vec![
                propstat_response("http://example.com/my%20cal/", Status::OK, Vec::new()),
                propstat_response("/my%20cal/a.ics", Status::OK, Vec::new()),
            ],
            description: None,
            sync_token: None,
        };

        let children = build_children(multistatus, "/my%20cal");
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].uri, "/my cal/a.ics");
    }

    #[test]
    fn build_single_rejects_multiple_responses() {
        let multistatus = Multistatus {
            responses: vec![
                propstat_response("/a", Status::OK, Vec::new()),
                propstat_response("/b", Status::OK, Vec::new()),
            ],
            description: None,
            sync_token: None,
        };

        assert_eq!(
            build_single(multistatus).unwrap_err(),
            MultistatusError::MultipleResponsesForSingleResource { count: 2 }
        );
        assert_eq!(build_single(Multistatus::default()).unwrap(), None);
    }
}
