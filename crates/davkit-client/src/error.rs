use davkit_rfc::error::RfcError;
use davkit_rfc::rfc::dav::parse::MultistatusError;
use thiserror::Error;

/// Faults raised by a transport before a response status is available
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid method: {0}")]
    InvalidMethod(String),

    #[error("Transport error: {0}")]
    Other(String),
}

pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// DAV client errors
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Rfc(#[from] RfcError),

    #[error("Unexpected status {status} for {method} {path}")]
    UnexpectedStatus {
        method: &'static str,
        path: String,
        status: u16,
    },

    #[error("Store error: {0}")]
    Store(String),
}

impl ClientError {
    /// Returns the protocol violation, if this error is one.
    #[must_use]
    pub fn as_protocol_violation(&self) -> Option<&MultistatusError> {
        match self {
            Self::Rfc(RfcError::Multistatus(err)) => Some(err),
            _ => None,
        }
    }
}

impl From<MultistatusError> for ClientError {
    fn from(err: MultistatusError) -> Self {
        Self::Rfc(RfcError::Multistatus(err))
    }
}

impl From<quick_xml::Error> for ClientError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Rfc(RfcError::Xml(err))
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
