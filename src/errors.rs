//! Preference Store Error Hierarchy
//!
//! Defines error types for the durable preference store, categorized by
//! operational concern: disk storage, snapshot encoding, and configuration.
//!
//! Most failures never reach callers. Load-time decode errors degrade to an
//! empty preference set, background write failures are only logged, and a
//! synchronous commit reports durability as a plain bool.

use std::path::PathBuf;

use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Disk-level failures during snapshot load/save
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Snapshot encode/decode failures
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Store configuration validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Disk I/O failures during load/save operations
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// I/O failure with the offending path attached
    #[error("Error occurred at path: {path}")]
    Path {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Snapshot could not be serialized
    #[error("Failed to encode snapshot: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Persisted bytes could not be deserialized
    #[error("Failed to decode snapshot: {0}")]
    Deserialize(#[source] serde_json::Error),

    /// Object value whose type id has not been registered
    #[error("Object type is not registered: {0}")]
    UnregisteredType(String),
}
