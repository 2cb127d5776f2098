//! Configuration layers and their resolution into a [`SyncRequest`]
//!
//! Two layers exist: `wrapper.config.json` beside the executable, then
//! command-line flags. Each is a [`WrapperConfig`]; later layers override
//! earlier ones field by field, and unset or empty values never override.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bundle_launch::LaunchMode;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::request::SyncRequest;

/// Directory created under the user's home when no destination is given.
pub const DEFAULT_DEST_DIR: &str = "Aiwb_Application";

/// Log level used when none is configured.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// One configuration layer.
///
/// Field names match the JSON file keys (`log-level`, `launch-mode`).
/// Unknown keys are ignored so older wrappers accept newer files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct WrapperConfig {
    /// Writable destination directory
    pub dest: Option<PathBuf>,
    /// Subdirectory of `dest` to mirror into
    pub name: Option<String>,
    /// Ignore the version stamp
    pub force: Option<bool>,
    /// `debug`, `info`, `warn` or `error`
    pub log_level: Option<String>,
    /// Entry program, relative to the bundle or its mirror
    pub entry: Option<PathBuf>,
    /// Mirror the bundle before launching
    pub copy: Option<bool>,
    /// `detach` or `wait`
    pub launch_mode: Option<LaunchMode>,
    /// Concurrent copy bound
    pub workers: Option<usize>,
}

/// Final configuration of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub request: SyncRequest,
    pub log_level: String,
}

impl WrapperConfig {
    /// Parse a configuration layer from JSON text.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load a configuration file.
    ///
    /// Returns `Ok(None)` when the file does not exist. A file that exists
    /// but cannot be read or parsed is an error; callers decide whether to
    /// continue with defaults.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        tracing::debug!(?path, "Looking for config file");
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(Error::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::parse(&content, path).map(Some)
    }

    /// Overlay `other` on top of `self`. Set, non-empty values win.
    pub fn merge(&mut self, other: &WrapperConfig) {
        if let Some(dest) = other.dest.as_ref().filter(|p| !p.as_os_str().is_empty()) {
            self.dest = Some(dest.clone());
        }
        if let Some(name) = other.name.as_ref().filter(|n| !n.is_empty()) {
            self.name = Some(name.clone());
        }
        if other.force.is_some() {
            self.force = other.force;
        }
        if let Some(level) = other.log_level.as_ref().filter(|l| !l.is_empty()) {
            self.log_level = Some(level.clone());
        }
        if let Some(entry) = other.entry.as_ref().filter(|p| !p.as_os_str().is_empty()) {
            self.entry = Some(entry.clone());
        }
        if other.copy.is_some() {
            self.copy = other.copy;
        }
        if other.launch_mode.is_some() {
            self.launch_mode = other.launch_mode;
        }
        if other.workers.is_some() {
            self.workers = other.workers;
        }
    }

    /// Resolve against the current user's home directory.
    pub fn resolve(&self, source_root: impl Into<PathBuf>) -> Result<ResolvedConfig> {
        self.resolve_with_home(source_root, dirs::home_dir())
    }

    /// Resolve with an explicit home directory for the default destination.
    ///
    /// `dest` falls back to `<home>/Aiwb_Application`; a configured `name`
    /// is joined onto whichever destination wins.
    pub fn resolve_with_home(
        &self,
        source_root: impl Into<PathBuf>,
        home: Option<PathBuf>,
    ) -> Result<ResolvedConfig> {
        let base_dest = match (&self.dest, home) {
            (Some(dest), _) if !dest.as_os_str().is_empty() => dest.clone(),
            (_, Some(home)) => home.join(DEFAULT_DEST_DIR),
            _ => return Err(Error::MissingDestination),
        };
        let dest_root = match self.name.as_deref() {
            Some(name) if !name.is_empty() => base_dest.join(name),
            _ => base_dest,
        };

        let request = SyncRequest {
            source_root: source_root.into(),
            dest_root,
            force: self.force.unwrap_or(false),
            copy_enabled: self.copy.unwrap_or(false),
            entry: self.entry.clone().filter(|p| !p.as_os_str().is_empty()),
            launch_mode: self.launch_mode.unwrap_or_default(),
            workers: self.workers,
        };

        Ok(ResolvedConfig {
            request,
            log_level: self
                .log_level
                .clone()
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }
}
