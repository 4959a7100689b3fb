//! Error types for gantry.

use thiserror::Error;

/// Result type alias for gantry operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gantry operations.
#[derive(Error, Debug)]
pub enum Error {
    // Bundle container errors
    #[error("bundle not found: {0}")]
    BundleNotFound(String),

    #[error("not a valid bundle: {0}")]
    BundleInvalid(String),

    #[error("unsupported bundle format version: {0}")]
    UnsupportedFormatVersion(u16),

    #[error("bundle digest mismatch (recorded {recorded}, computed {computed})")]
    DigestMismatch { recorded: String, computed: String },

    // Manifest errors
    #[error("manifest rejected: {0}")]
    ManifestInvalid(String),

    // Context construction errors
    #[error("code context construction failed: {0}")]
    CodeContextFailed(String),

    #[error("resource context construction failed: {0}")]
    ResourceContextFailed(String),

    #[error("asset decoding failed: {0}")]
    AssetDecodeFailed(String),

    // Serialization errors
    #[error("serialization error: {0}")]
    SerializationError(String),

    #[error("deserialization error: {0}")]
    DeserializationError(String),

    // Generic errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}
