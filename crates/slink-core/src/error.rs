//! Error types for slink core operations.
//!
//! Errors are descriptive at the core level. The resolution engine folds them
//! into coarse outcome classes, and the CLI / API layers map those to exit
//! codes and status codes.

use thiserror::Error;

/// Result type alias for slink operations.
pub type Result<T> = std::result::Result<T, SlinkError>;

/// Core error type for slink operations.
#[derive(Debug, Error)]
pub enum SlinkError {
    /// Missing or malformed request fields, bad identifier shape
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Tag did not verify: wrong key, or tampered salt/nonce/ciphertext
    #[error("Authentication failed")]
    AuthenticationFailure,

    /// Envelope names a cipher this build does not implement
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Envelope format version this build does not implement
    #[error("Unsupported envelope version: {0}")]
    UnsupportedVersion(u32),

    /// Envelope text is not valid JSON, lacks a key, or carries bad base64
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Record does not exist in the store
    #[error("Not found: {0}")]
    NotFound(String),

    /// Store could not be reached or rejected the request
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Primitive failure outside the authentication path
    #[error("Encryption error: {0}")]
    Crypto(String),
}

impl SlinkError {
    /// True for failures raised while opening an envelope with a key.
    ///
    /// These are never retriable: the same key cannot succeed on a second try.
    pub fn is_access_denied(&self) -> bool {
        matches!(
            self,
            SlinkError::AuthenticationFailure
                | SlinkError::UnsupportedAlgorithm(_)
                | SlinkError::UnsupportedVersion(_)
        )
    }
}

impl From<std::io::Error> for SlinkError {
    fn from(err: std::io::Error) -> Self {
        SlinkError::StorageUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for SlinkError {
    fn from(err: serde_json::Error) -> Self {
        SlinkError::MalformedEnvelope(err.to_string())
    }
}

impl From<reqwest::Error> for SlinkError {
    fn from(err: reqwest::Error) -> Self {
        SlinkError::StorageUnavailable(err.to_string())
    }
}
