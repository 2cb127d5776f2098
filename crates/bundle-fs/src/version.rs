//! Version stamps
//!
//! A bundle's version is the base name of its directory: content-addressed
//! caches already name each implementation after its hash (for example
//! `sha256new_<digest>`), so no hashing pass over the tree is needed. The
//! destination records the last mirrored version in a `.version` file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::constants::BundlePath;
use crate::{Result, io, path};

/// Location of the stamp file for a destination root.
pub fn stamp_path(dest_root: &Path) -> PathBuf {
    dest_root.join(BundlePath::VersionFile)
}

/// Derive the version identifier of a source directory.
///
/// Returns the final path component verbatim. Paths without a usable final
/// component (`bundle/..`, `.`) are made absolute first; if even that has no
/// base name the whole path text is used.
pub fn derive_version(source_root: &Path) -> String {
    if let Some(name) = source_root.file_name() {
        return name.to_string_lossy().into_owned();
    }

    path::absolute(source_root)
        .ok()
        .and_then(|abs| abs.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| source_root.to_string_lossy().into_owned())
}

/// Read the stamp stored in `dest_root`, trimmed of surrounding whitespace.
///
/// Returns `Ok(None)` when no stamp file exists.
pub fn read_stamp(dest_root: &Path) -> Result<Option<String>> {
    let stamp = stamp_path(dest_root);
    match io::read_text(&stamp) {
        Ok(content) => Ok(Some(content.trim().to_string())),
        Err(crate::Error::Io { source, .. }) if source.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Whether the destination must be (re)synchronized for `current_version`.
///
/// A missing or unreadable stamp counts as "needs sync"; it is never an
/// error.
pub fn needs_sync(dest_root: &Path, current_version: &str) -> bool {
    match read_stamp(dest_root) {
        Ok(None) => {
            tracing::info!("Version file not found, need sync");
            true
        }
        Err(e) => {
            tracing::info!("Failed to read version file: {}, need sync", e);
            true
        }
        Ok(Some(stored)) if stored != current_version => {
            tracing::info!(
                stored = %stored,
                current = %current_version,
                "Version mismatch, need sync"
            );
            true
        }
        Ok(Some(_)) => false,
    }
}

/// Record `version` as the mirrored version of `dest_root`.
///
/// The file holds exactly the version string, with no trailing newline.
pub fn write_stamp(dest_root: &Path, version: &str) -> Result<()> {
    io::write_atomic(&stamp_path(dest_root), version.as_bytes())
}
