//! Entry path resolution and containment checking

use std::path::{Path, PathBuf};

use bundle_fs::path;

use crate::error::{LaunchError, Result};

/// A resolved, validated entry program ready to launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPlan {
    /// Canonical absolute path of the program
    pub resolved_path: PathBuf,
    /// Absolute working directory for the child
    pub working_dir: PathBuf,
    /// Canonical directory the program was required to stay inside
    pub containment_base: PathBuf,
}

impl EntryPlan {
    /// Resolve `relative_entry` inside `base_dir` and pair it with the
    /// working directory the child should start in.
    pub fn resolve(base_dir: &Path, relative_entry: &Path, working_dir: &Path) -> Result<Self> {
        let containment_base =
            dunce::canonicalize(base_dir).map_err(|e| LaunchError::io(base_dir, e))?;
        let resolved_path = resolve_entry(base_dir, relative_entry)?;
        let working_dir = path::absolute(working_dir)?;

        Ok(Self {
            resolved_path,
            working_dir,
            containment_base,
        })
    }
}

/// Join `base_dir` and `relative_entry` and verify the result stays inside
/// `base_dir`.
///
/// Both paths are canonicalized first, so `..` segments and symlinks that
/// lead out of the base are caught. Anything whose path relative to the base
/// starts with `..` is refused with [`LaunchError::OutsideBase`].
pub fn resolve_entry(base_dir: &Path, relative_entry: &Path) -> Result<PathBuf> {
    let joined = base_dir.join(relative_entry);
    if !joined.exists() {
        return Err(LaunchError::NotFound { path: joined });
    }

    let entry_abs = dunce::canonicalize(&joined).map_err(|e| LaunchError::io(&joined, e))?;
    let base_abs = dunce::canonicalize(base_dir).map_err(|e| LaunchError::io(base_dir, e))?;

    let relative = path::relative_to(&base_abs, &entry_abs);
    if path::escapes_base(&relative) {
        return Err(LaunchError::OutsideBase {
            path: entry_abs,
            base: base_abs,
        });
    }

    tracing::debug!(entry = %entry_abs.display(), "Entry program absolute path");
    Ok(entry_abs)
}
