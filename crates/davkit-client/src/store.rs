//! Configuration documents stored as XML resources in a DAV collection.

use std::sync::Arc;

use davkit_core::constants::XML_DOCUMENT_CONTENT_TYPE;
use davkit_rfc::rfc::dav::core::href::{collection_path, decode_path, uri_path};

use crate::client::DavClient;
use crate::error::{ClientError, ClientResult};
use crate::transport::{DavMethod, Transport};

const CONFIG_SUFFIX: &str = ".xml";

/// A store of named XML documents, one `<name>.xml` resource each, under a
/// collection URL.
#[derive(Debug)]
pub struct DavConfigStore<T: Transport> {
    client: Arc<DavClient<T>>,
    location: String,
    path: String,
}

impl<T: Transport> Clone for DavConfigStore<T> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            location: self.location.clone(),
            path: self.path.clone(),
        }
    }
}

impl<T: Transport> DavConfigStore<T> {
    /// Creates a store rooted at `location`, an absolute URL or a
    /// server-absolute path. A trailing slash is added if missing.
    #[must_use]
    pub fn new(client: Arc<DavClient<T>>, location: &str) -> Self {
        let location = collection_path(location);
        let path = collection_path(uri_path(&location));

        Self {
            client,
            location,
            path,
        }
    }

    /// Collection URL of the store.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// ## Summary
    /// Names of the documents in the store, without the `.xml` suffix.
    ///
    /// Sub-collections and resources not ending in `.xml` are skipped.
    ///
    /// ## Errors
    /// Returns an error if the collection does not exist or the listing
    /// fails.
    #[tracing::instrument(skip(self), fields(location = %self.location))]
    pub async fn list_configs(&self) -> ClientResult<Vec<String>> {
        let children = self
            .client
            .list_children(&self.path, &[])
            .await?
            .ok_or_else(|| ClientError::Store(format!("no collection at {}", self.location)))?;

        let parent = decode_path(&self.path);
        let names = children
            .iter()
            .filter(|child| !child.is_collection)
            .filter_map(|child| {
                child
                    .path
                    .strip_prefix(parent.as_str())?
                    .strip_suffix(CONFIG_SUFFIX)
                    .map(str::to_owned)
            })
            .collect::<Vec<_>>();

        tracing::debug!(count = names.len(), "Listed configurations");
        Ok(names)
    }

    /// ## Summary
    /// Fetches the document `name`.
    ///
    /// Returns `Ok(None)` for any status other than 200.
    ///
    /// ## Errors
    /// Returns an error if the request fails or the body is not UTF-8.
    #[tracing::instrument(skip(self), fields(location = %self.location))]
    pub async fn get_config(&self, name: &str) -> ClientResult<Option<String>> {
        let response = self.client.get(&self.document_path(name)).await?;
        if response.status != 200 {
            tracing::debug!(status = response.status, "Configuration not available");
            return Ok(None);
        }

        String::from_utf8(response.body)
            .map(Some)
            .map_err(|e| ClientError::Store(format!("configuration {name} is not UTF-8: {e}")))
    }

    /// ## Summary
    /// Stores `xml` as the document `name`, replacing any previous version.
    ///
    /// ## Errors
    /// Returns an error if the request fails or the server does not answer
    /// with a 2xx status.
    #[tracing::instrument(skip(self, xml), fields(location = %self.location))]
    pub async fn save_config(&self, name: &str, xml: &str) -> ClientResult<()> {
        let path = self.document_path(name);
        let response = self
            .client
            .put(&path, XML_DOCUMENT_CONTENT_TYPE, xml.to_owned())
            .await?;

        if !response.is_success() {
            return Err(ClientError::UnexpectedStatus {
                method: DavMethod::Put.as_str(),
                path,
                status: response.status,
            });
        }

        Ok(())
    }

    /// ## Summary
    /// Returns the store rooted at the sub-collection `name`.
    ///
    /// ## Errors
    /// Returns an error if the sub-collection does not exist; it is not
    /// created.
    #[tracing::instrument(skip(self), fields(location = %self.location))]
    pub async fn sub_store(&self, name: &str) -> ClientResult<Self> {
        let path = collection_path(&format!("{}{name}", self.path));

        if self.client.get_properties(&path, &[]).await?.is_none() {
            return Err(ClientError::Store(format!(
                "no collection at {path}: mkcol not implemented"
            )));
        }

        let origin = self.location.strip_suffix(&self.path).unwrap_or_default();
        Ok(Self {
            client: Arc::clone(&self.client),
            location: format!("{origin}{path}"),
            path,
        })
    }

    fn document_path(&self, name: &str) -> String {
        format!("{}{name}{CONFIG_SUFFIX}", self.path)
    }
}
