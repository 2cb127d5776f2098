//! Removal of destination directories that ended up empty.

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::{Error, Result};

/// Result of [`prune_if_empty`] on the root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReapOutcome {
    /// The directory did not exist.
    Missing,
    /// The directory (and every empty directory below it) was removed.
    Removed,
    /// The directory still holds these entries and was kept.
    Retained(Vec<OsString>),
}

/// Remove `dir` if, after pruning empty subdirectories, nothing is left.
///
/// Single post-order pass: every subdirectory is pruned first and reports
/// whether it was removed, so the directory is listed only once. A failure
/// inside a subdirectory is logged and leaves that subdirectory in place.
pub fn prune_if_empty(dir: &Path) -> Result<ReapOutcome> {
    match fs::symlink_metadata(dir) {
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!("Directory does not exist: {}", dir.display());
            return Ok(ReapOutcome::Missing);
        }
        Err(e) => return Err(Error::io(dir, e)),
        Ok(_) => {}
    }

    let remaining = prune_children(dir)?;
    if remaining.is_empty() {
        tracing::info!("Removing empty destination directory: {}", dir.display());
        fs::remove_dir(dir).map_err(|e| Error::io(dir, e))?;
        return Ok(ReapOutcome::Removed);
    }

    tracing::info!("Destination directory is not empty, keeping it: {}", dir.display());
    for name in &remaining {
        tracing::info!("  - {}", name.to_string_lossy());
    }
    Ok(ReapOutcome::Retained(remaining))
}

/// Prune empty subdirectories of `dir` and return the names still present.
fn prune_children(dir: &Path) -> Result<Vec<OsString>> {
    let mut remaining = Vec::new();

    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);

        if is_dir && prune_subdir(&entry.path()) {
            continue;
        }
        remaining.push(entry.file_name());
    }

    remaining.sort();
    Ok(remaining)
}

/// Returns `true` when `dir` was empty after pruning and has been removed.
fn prune_subdir(dir: &Path) -> bool {
    let emptied = prune_children(dir).and_then(|remaining| {
        if !remaining.is_empty() {
            return Ok(false);
        }
        fs::remove_dir(dir).map_err(|e| Error::io(dir, e))?;
        tracing::debug!("Removed empty subdirectory: {}", dir.display());
        Ok(true)
    });

    match emptied {
        Ok(removed) => removed,
        Err(e) => {
            tracing::warn!("Failed to remove empty subdirectory: {}", e);
            false
        }
    }
}
