//! Executable entry programs for launch tests.
//!
//! Scripts are plain `/bin/sh` files, so these helpers are Unix-only.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

/// Write an executable shell script at `path` running `body`.
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn write_script(path: &Path, body: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, format!("#!/bin/sh\n{body}\n"))
        .unwrap_or_else(|e| panic!("write_script: failed to write {}: {e}", path.display()));
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// Script that exits with `code`.
pub fn exit_with(path: &Path, code: i32) {
    write_script(path, &format!("exit {code}"));
}

/// Script that writes its working directory to `marker` and exits 0.
pub fn record_cwd(path: &Path, marker: &Path) {
    write_script(path, &format!("pwd -P > '{}'", marker.display()));
}
