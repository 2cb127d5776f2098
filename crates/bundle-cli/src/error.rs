//! Error types for bundle-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that end a run with exit code 1
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from bundle-core
    #[error(transparent)]
    Core(#[from] bundle_core::Error),

    /// Error from bundle-launch
    #[error(transparent)]
    Launch(#[from] bundle_launch::LaunchError),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
