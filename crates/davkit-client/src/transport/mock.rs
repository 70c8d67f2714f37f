//! In-memory transport replaying canned responses.

use std::collections::VecDeque;
use std::sync::Mutex;

use reqwest::Url;

use super::{DavRequest, DavResponse, Transport};
use crate::error::{TransportError, TransportResult};

#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<DavResponse>>,
    requests: Mutex<Vec<DavRequest>>,
    base_url: Option<Url>,
}

impl MockTransport {
    pub fn new(responses: impl IntoIterator<Item = DavResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
            base_url: None,
        }
    }

    /// Resolves relative request paths against `base_url`.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(Url::parse(base_url).unwrap());
        self
    }

    pub fn multistatus(body: &str) -> Self {
        Self::new([DavResponse::new(207, body)])
    }

    pub fn requests(&self) -> Vec<DavRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> DavRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

impl Transport for MockTransport {
    async fn execute(&self, request: DavRequest) -> TransportResult<DavResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TransportError::Other("no response queued".to_owned()))
    }

    fn resolve_path(&self, path: &str) -> TransportResult<String> {
        match &self.base_url {
            Some(base) => base
                .join(path)
                .map(|url| url.path().to_owned())
                .map_err(|e| TransportError::InvalidUrl(e.to_string())),
            None => Ok(path.to_owned()),
        }
    }
}
