use std::time::Duration;

use davkit_core::config::ClientConfig;
use davkit_rfc::rfc::dav::core::Depth;
use reqwest::{Client, Method, Url};

use super::{DavRequest, DavResponse, Transport};
use crate::error::{TransportError, TransportResult};

/// [`Transport`] backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// ## Summary
    /// Creates a transport for the server at `config.base_url`.
    ///
    /// Request paths starting with `/` replace the base path; other paths
    /// resolve against it.
    ///
    /// ## Errors
    /// Returns an error if the base URL does not parse or the client cannot
    /// be built.
    pub fn new(config: &ClientConfig) -> TransportResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {e}", config.base_url)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> TransportResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| TransportError::InvalidUrl(format!("{path}: {e}")))
    }
}

impl Transport for ReqwestTransport {
    #[tracing::instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn execute(&self, request: DavRequest) -> TransportResult<DavResponse> {
        let method = Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|e| TransportError::InvalidMethod(e.to_string()))?;
        let url = self.url(&request.path)?;

        let mut builder = self.client.request(method, url);
        if let Some((name, value)) = request.depth.map(Depth::header) {
            builder = builder.header(name, value);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(content_type) = request.content_type {
            builder = builder.header(reqwest::header::CONTENT_TYPE, content_type);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_owned(), value.to_owned()))
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        tracing::debug!(status, body_len = body.len(), "Received response");

        Ok(DavResponse {
            status,
            headers,
            body,
        })
    }

    fn resolve_path(&self, path: &str) -> TransportResult<String> {
        self.url(path).map(|url| url.path().to_owned())
    }
}
