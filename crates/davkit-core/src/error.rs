use thiserror::Error;

/// Errors shared by every davkit crate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid property name: {0}")]
    InvalidName(String),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
