//! Lexical path helpers shared by the copier and the entry launcher.
//!
//! Nothing here touches the filesystem except [`absolute`], which only
//! consults the current working directory.

use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// Resolve `.` and `..` components without consulting the filesystem.
///
/// `..` directly under a root is dropped (`/..` is `/`). Leading `..`
/// components of a relative path are preserved, because there is nothing
/// to pop them against.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Absolute, lexically normalized form of `path`.
///
/// Relative paths are anchored at the current working directory. Symlinks
/// are not resolved.
pub fn absolute(path: &Path) -> Result<PathBuf> {
    let anchored = std::path::absolute(path).map_err(|e| Error::io(path, e))?;
    Ok(normalize_lexically(&anchored))
}

/// Lexical relative path leading from `base` to `target`.
///
/// Both inputs should already be absolute and normalized. When the two
/// paths share no root (different drive prefixes on Windows), `target` is
/// returned unchanged, which [`escapes_base`] reports as an escape.
pub fn relative_to(base: &Path, target: &Path) -> PathBuf {
    let base_parts: Vec<Component<'_>> = base.components().collect();
    let target_parts: Vec<Component<'_>> = target.components().collect();

    let roots_match = match (base_parts.first(), target_parts.first()) {
        (Some(Component::Prefix(a)), Some(Component::Prefix(b))) => a == b,
        (Some(Component::Prefix(_)), _) | (_, Some(Component::Prefix(_))) => false,
        _ => true,
    };
    if !roots_match {
        return target.to_path_buf();
    }

    let shared = base_parts
        .iter()
        .zip(target_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in shared..base_parts.len() {
        relative.push(Component::ParentDir);
    }
    for part in &target_parts[shared..] {
        relative.push(part);
    }
    if relative.as_os_str().is_empty() {
        relative.push(Component::CurDir);
    }
    relative
}

/// Whether a relative path produced by [`relative_to`] leaves its base.
pub fn escapes_base(relative: &Path) -> bool {
    match relative.components().next() {
        Some(Component::ParentDir) => true,
        Some(Component::RootDir) | Some(Component::Prefix(_)) => true,
        _ => false,
    }
}

/// Whether `path` equals `root` or lies below it.
///
/// Component-wise and case sensitive: `/a/cache2` is not under `/a/cache`.
pub fn is_within(path: &Path, root: &Path) -> bool {
    path.starts_with(root)
}
