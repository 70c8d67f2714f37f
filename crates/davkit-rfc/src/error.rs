use thiserror::Error;

use crate::rfc::dav::parse::MultistatusError;

/// Protocol layer errors
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("Multistatus error: {0}")]
    Multistatus(#[from] MultistatusError),

    #[error("XML write error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error(transparent)]
    CoreError(#[from] davkit_core::error::CoreError),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
