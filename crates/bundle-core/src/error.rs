//! Error types for bundle-core

use std::path::PathBuf;

/// Result type for bundle-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in bundle-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No destination configured and no home directory to default to
    #[error("Destination directory not set and failed to get user home directory")]
    MissingDestination,

    /// Configuration file exists but could not be read
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid JSON for the expected shape
    #[error("Failed to parse config file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// The destination root could not be created
    #[error("Failed to create destination directory {path}: {source}")]
    CreateDestination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Mirroring the bundle failed
    #[error("Sync failed: {0}")]
    Sync(#[source] bundle_fs::Error),

    /// The stamp could not be written after a successful mirror
    #[error("Failed to update version file: {0}")]
    Stamp(#[source] bundle_fs::Error),

    /// Filesystem error from bundle-fs
    #[error(transparent)]
    Fs(#[from] bundle_fs::Error),
}
