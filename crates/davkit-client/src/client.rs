//! DAV operations: property retrieval, collection listing and incremental
//! synchronization.

use davkit_core::config::ClientConfig;
use davkit_core::constants::{SC_MULTI_STATUS, XML_CONTENT_TYPE};
use davkit_rfc::error::RfcError;
use davkit_rfc::rfc::dav::build::{propfind_body, sync_collection_body};
use davkit_rfc::rfc::dav::core::href::collection_path;
use davkit_rfc::rfc::dav::core::{Depth, Multistatus, Namespace, QName, XmlElement};
use davkit_rfc::rfc::dav::model::{
    ChildResource, MultistatusResult, build_children, build_result, build_single,
};
use davkit_rfc::rfc::dav::parse::{parse_error, parse_multistatus};

use crate::error::{ClientError, ClientResult};
use crate::transport::{DavMethod, DavRequest, DavResponse, Transport};

/// A `WebDAV` client bound to one transport.
///
/// Extra headers and namespaces are fixed at construction and applied to
/// every request. Each request builds its own namespace table, so a client
/// can be shared between tasks.
#[derive(Debug)]
pub struct DavClient<T: Transport> {
    transport: T,
    extra_headers: Vec<(String, String)>,
    namespaces: Vec<Namespace>,
}

impl<T: Transport> DavClient<T> {
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            extra_headers: Vec::new(),
            namespaces: Vec::new(),
        }
    }

    /// Creates a client using the extra headers and namespaces from `config`.
    #[must_use]
    pub fn from_config(transport: T, config: &ClientConfig) -> Self {
        Self {
            transport,
            extra_headers: config
                .extra_headers
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
            namespaces: config
                .namespaces
                .iter()
                .map(|uri| Namespace::new(uri.clone()))
                .collect(),
        }
    }

    /// Adds a header sent with every request.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }

    /// Adds a namespace declared on every request body.
    #[must_use]
    pub fn with_namespace(mut self, namespace: Namespace) -> Self {
        self.namespaces.push(namespace);
        self
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// ## Summary
    /// Retrieves `displayname`, `resourcetype` and `properties` for a single
    /// resource with a depth-0 `PROPFIND`.
    ///
    /// Returns `Ok(None)` if the server did not answer 207 Multi-Status or
    /// returned no `response` element.
    ///
    /// ## Errors
    /// Returns an error for transport faults, for a response body that
    /// violates the multistatus grammar, and when more than one `response`
    /// element is returned.
    #[tracing::instrument(skip(self, properties), fields(properties = properties.len()))]
    pub async fn get_properties(
        &self,
        path: &str,
        properties: &[QName],
    ) -> ClientResult<Option<ChildResource>> {
        let body = propfind_body(properties, &self.namespaces)?;
        let Some(multistatus) = self
            .multistatus(DavMethod::Propfind, path, Depth::Zero, body)
            .await?
        else {
            return Ok(None);
        };

        let child = build_single(multistatus)?;
        if child.is_none() {
            tracing::warn!("Multistatus for single resource holds no response");
        }

        Ok(child)
    }

    /// ## Summary
    /// Lists the members of a collection with a depth-1 `PROPFIND`.
    ///
    /// `parent_path` is treated as a collection and gets a trailing slash.
    /// The collection's own entry is dropped, matched by the path the
    /// transport resolves `parent_path` to. Returns `Ok(None)` if the
    /// server did not answer 207 Multi-Status, and an empty list for an
    /// empty collection.
    ///
    /// ## Errors
    /// Returns an error for transport faults or a response body that
    /// violates the multistatus grammar.
    #[tracing::instrument(skip(self, properties), fields(properties = properties.len()))]
    pub async fn list_children(
        &self,
        parent_path: &str,
        properties: &[QName],
    ) -> ClientResult<Option<Vec<ChildResource>>> {
        let parent = collection_path(parent_path);
        let body = propfind_body(properties, &self.namespaces)?;
        let Some(multistatus) = self
            .multistatus(DavMethod::Propfind, &parent, Depth::One, body)
            .await?
        else {
            return Ok(None);
        };

        let children = build_children(multistatus, &self.transport.resolve_path(&parent)?);
        tracing::debug!(children = children.len(), "Listed collection");

        Ok(Some(children))
    }

    /// ## Summary
    /// Runs a `sync-collection` REPORT on `path`.
    ///
    /// `sync_token` of `None` requests an initial sync. `getetag` is always
    /// requested. The returned result carries the server's new token for the
    /// next call. Returns `Ok(None)` if the server did not answer 207
    /// Multi-Status, which includes an expired token.
    ///
    /// ## Errors
    /// Returns an error for transport faults or a response body that
    /// violates the multistatus grammar.
    #[tracing::instrument(skip(self, sync_token, properties), fields(initial = sync_token.is_none()))]
    pub async fn sync_report(
        &self,
        path: &str,
        sync_token: Option<&str>,
        properties: &[QName],
    ) -> ClientResult<Option<MultistatusResult>> {
        let body = sync_collection_body(sync_token, properties, &self.namespaces)?;
        let Some(multistatus) = self
            .multistatus(DavMethod::Report, path, Depth::Zero, body)
            .await?
        else {
            return Ok(None);
        };

        let result = build_result(multistatus);
        tracing::debug!(
            changed = result.changed().count(),
            removed = result.removed().count(),
            has_sync_token = result.sync_token.is_some(),
            "Sync report complete"
        );

        Ok(Some(result))
    }

    /// Extracts the condition element from a `DAV:error` body, if there is
    /// exactly one. Never fails.
    #[must_use]
    pub fn parse_error(&self, body: &[u8]) -> Option<XmlElement> {
        parse_error(body)
    }

    /// ## Summary
    /// Fetches a resource.
    ///
    /// ## Errors
    /// Returns an error for transport faults only; any status is returned.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, path: &str) -> ClientResult<DavResponse> {
        let request = self.request(DavMethod::Get, path);
        Ok(self.transport.execute(request).await?)
    }

    /// ## Summary
    /// Stores a resource.
    ///
    /// ## Errors
    /// Returns an error for transport faults only; any status is returned.
    #[tracing::instrument(skip(self, body), fields(body_len = body.len()))]
    pub async fn put(
        &self,
        path: &str,
        content_type: &'static str,
        body: String,
    ) -> ClientResult<DavResponse> {
        let request = self
            .request(DavMethod::Put, path)
            .with_body(content_type, body);
        Ok(self.transport.execute(request).await?)
    }

    fn request(&self, method: DavMethod, path: &str) -> DavRequest {
        DavRequest::new(method, path).with_headers(
            self.extra_headers
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        )
    }

    /// Sends a multistatus-producing request; non-207 statuses yield `None`.
    async fn multistatus(
        &self,
        method: DavMethod,
        path: &str,
        depth: Depth,
        body: String,
    ) -> ClientResult<Option<Multistatus>> {
        tracing::debug!(%method, path, %depth, body_len = body.len(), "Sending request");

        let request = self
            .request(method, path)
            .with_depth(depth)
            .with_body(XML_CONTENT_TYPE, body);
        let response = self.transport.execute(request).await?;

        if response.status != SC_MULTI_STATUS {
            match parse_error(&response.body) {
                Some(condition) => tracing::warn!(
                    status = response.status,
                    condition = %condition.name,
                    "Expected 207 Multi-Status"
                ),
                None => tracing::warn!(status = response.status, "Expected 207 Multi-Status"),
            }
            return Ok(None);
        }

        Ok(Some(parse_multistatus(&response.body)?))
    }
}

/// ## Summary
/// Parses property names written as `{namespace}local`.
///
/// ## Errors
/// Returns an error naming the first entry that is not in that form.
pub fn property_names<S: AsRef<str>>(names: &[S]) -> ClientResult<Vec<QName>> {
    names
        .iter()
        .map(|name| {
            QName::from_clark(name.as_ref()).map_err(|e| ClientError::from(RfcError::from(e)))
        })
        .collect()
}
