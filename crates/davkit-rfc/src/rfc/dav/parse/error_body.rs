//! Best-effort reading of `DAV:error` response bodies.

use super::tree::read_document;
use crate::rfc::dav::core::{XmlElement, dav_names};

/// Extracts the single condition element from a `DAV:error` body.
///
/// Returns `None` if the body is not well-formed, its root is not
/// `DAV:error`, or the root does not hold exactly one child element. Used
/// for diagnostics only, so no failure is reported beyond a debug event.
#[tracing::instrument(skip(body), fields(body_len = body.len()))]
#[must_use]
pub fn parse_error(body: &[u8]) -> Option<XmlElement> {
    let root = match read_document(body) {
        Ok(root) => root,
        Err(err) => {
            tracing::debug!(error = %err, "Error body is not well-formed XML");
            return None;
        }
    };

    if !root.is(&dav_names::error()) {
        tracing::debug!(root = %root.name, "Error body root is not DAV:error");
        return None;
    }

    let mut conditions = root.into_elements();
    if conditions.len() != 1 {
        tracing::debug!(count = conditions.len(), "Error body does not hold a single condition");
        return None;
    }

    conditions.pop()
}
