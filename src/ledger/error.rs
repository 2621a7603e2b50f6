//! Snapshot error types.

use thiserror::Error;

/// Errors that can occur while reading or writing the history snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot slot could not be read or written
    #[error("Snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization to JSON failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// The stored snapshot is not valid JSON for this format
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Snapshot version is not supported by this version
    #[error("Unsupported snapshot version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}
