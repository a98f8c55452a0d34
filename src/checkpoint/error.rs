//! Snapshot error types.

use thiserror::Error;

/// Errors that can occur while saving or restoring form snapshots
#[derive(Debug, Error, PartialEq)]
pub enum CheckpointError {
    /// Encoding a snapshot as JSON or binary failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Decoding a snapshot from JSON or binary failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    #[error("Unsupported snapshot version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Snapshot does not fit the form it is restored into
    #[error("Snapshot validation failed: {0}")]
    ValidationFailed(String),
}
