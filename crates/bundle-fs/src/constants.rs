//! Well-known names inside bundles and destinations.

use std::path::Path;

/// Fixed file and directory names the engine treats specially.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundlePath {
    /// The `.version` stamp file at the destination root
    VersionFile,
    /// The `.git` directory (version-control metadata, never mirrored)
    GitDir,
    /// The `wrapper.config.json` file next to the executable
    ConfigFile,
}

impl BundlePath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VersionFile => ".version",
            Self::GitDir => ".git",
            Self::ConfigFile => "wrapper.config.json",
        }
    }
}

impl AsRef<Path> for BundlePath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for BundlePath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for BundlePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
