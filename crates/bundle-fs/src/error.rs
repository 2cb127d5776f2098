//! Error types for bundle-fs

use std::path::PathBuf;

/// Result type for bundle-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Step of a single file copy that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStage {
    OpenSource,
    CreateDestination,
    Transfer,
    SetPermissions,
}

impl std::fmt::Display for CopyStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::OpenSource => "failed to open source file",
            Self::CreateDestination => "failed to create destination file",
            Self::Transfer => "failed to copy file content",
            Self::SetPermissions => "failed to set file mode",
        };
        f.write_str(text)
    }
}

/// Errors that can occur in bundle-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk source tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("{stage} {source_path} -> {dest_path}: {source}")]
    CopyFile {
        stage: CopyStage,
        source_path: PathBuf,
        dest_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Worker count must be at least 1")]
    InvalidWorkers,

    #[error("Failed to start copy workers: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn copy(
        stage: CopyStage,
        source_path: impl Into<PathBuf>,
        dest_path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::CopyFile {
            stage,
            source_path: source_path.into(),
            dest_path: dest_path.into(),
            source,
        }
    }
}
