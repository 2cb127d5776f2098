//! The immutable description of one run.

use std::path::{Path, PathBuf};

use bundle_fs::CopyOptions;
use bundle_launch::LaunchMode;

/// Everything a run needs, fixed once configuration is resolved.
///
/// Components receive this explicitly; nothing reads process-wide state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    /// The read-only bundle being mirrored
    pub source_root: PathBuf,
    /// The writable mirror location (already joined with `name`)
    pub dest_root: PathBuf,
    /// Mirror even when the stamp matches
    pub force: bool,
    /// Mirror at all; when off the entry runs from `source_root`
    pub copy_enabled: bool,
    /// Entry program, relative to the containment base
    pub entry: Option<PathBuf>,
    /// Launch discipline for the entry program
    pub launch_mode: LaunchMode,
    /// Concurrent copy bound
    pub workers: Option<usize>,
}

impl SyncRequest {
    /// A request with defaults for everything but the two roots.
    pub fn new(source_root: impl Into<PathBuf>, dest_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            dest_root: dest_root.into(),
            force: false,
            copy_enabled: false,
            entry: None,
            launch_mode: LaunchMode::default(),
            workers: None,
        }
    }

    pub fn copy_options(&self) -> CopyOptions {
        CopyOptions {
            workers: self.workers,
        }
    }

    /// Directory the entry program is resolved in and must stay inside.
    pub fn entry_base(&self) -> &Path {
        if self.copy_enabled {
            &self.dest_root
        } else {
            &self.source_root
        }
    }
}
