//! Error types for entry resolution and launch

use std::path::PathBuf;

/// Errors that can occur while resolving or starting an entry program
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    /// The entry program does not exist
    #[error("Entry program not found: {path}")]
    NotFound {
        /// The joined path that was checked
        path: PathBuf,
    },

    /// The entry resolves outside its authorized base directory
    #[error("Entry program path is outside {base}, refusing to execute: {path}")]
    OutsideBase {
        /// Resolved absolute entry path
        path: PathBuf,
        /// Authorized base directory
        base: PathBuf,
    },

    /// Filesystem error while resolving paths
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being resolved
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The program could not be started
    #[error("Failed to start entry program {path}: {source}")]
    Spawn {
        /// Program that failed to start
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from bundle-fs path handling
    #[error(transparent)]
    Fs(#[from] bundle_fs::Error),

    /// Unrecognized launch mode text
    #[error("Unknown launch mode '{0}' (expected 'detach' or 'wait')")]
    UnknownMode(String),
}

impl LaunchError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is a containment refusal rather than a failure.
    pub fn is_refusal(&self) -> bool {
        matches!(self, Self::OutsideBase { .. })
    }
}

/// Result type alias for launch operations
pub type Result<T> = std::result::Result<T, LaunchError>;
