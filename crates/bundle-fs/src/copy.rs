//! Concurrent source-to-destination tree mirroring.
//!
//! The walk runs on the calling thread and creates directories in walk
//! order; every regular file becomes a [`CopyTask`] spawned onto a bounded
//! rayon pool. A directory is always created before any file below it is
//! dispatched, so workers never race on their parent directory. Each worker
//! owns a distinct destination path, so the copy phase needs no locking.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};

use rayon::ThreadPoolBuilder;
use walkdir::{DirEntry, WalkDir};

use crate::constants::BundlePath;
use crate::{CopyStage, Error, Result, path};

/// Tuning knobs for [`sync_tree`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyOptions {
    /// Maximum number of concurrent file copies.
    ///
    /// `None` uses the available parallelism, capped at 8.
    pub workers: Option<usize>,
}

impl CopyOptions {
    /// Effective worker count.
    pub fn worker_limit(&self) -> Result<usize> {
        match self.workers {
            Some(0) => Err(Error::InvalidWorkers),
            Some(n) => Ok(n),
            None => {
                let n_cpu = std::thread::available_parallelism()
                    .map(|v| v.get())
                    .unwrap_or(1);
                Ok(n_cpu.clamp(1, 8))
            }
        }
    }
}

/// Counters for one [`sync_tree`] run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Directories mirrored below the destination root.
    pub dirs_mirrored: u64,
    /// Files copied successfully.
    pub files_copied: u64,
    /// Bytes written across all copied files.
    pub bytes_copied: u64,
    /// Entries excluded by a skip rule (pruned subtrees count once).
    pub skipped: u64,
}

impl std::fmt::Display for SyncReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[SYNC] dirs={} files={} bytes={} skipped={}",
            self.dirs_mirrored, self.files_copied, self.bytes_copied, self.skipped
        )
    }
}

/// Why an entry was left out of the mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The entry is the stamp file itself.
    VersionFile,
    /// A path component is version-control metadata.
    VcsMetadata,
    /// The entry lies inside the destination root.
    InsideDestination,
}

/// Evaluate the skip rules for one walk entry.
///
/// `relative` is the entry's path relative to the source root, `absolute`
/// its absolute form, and `dest_root` the absolute destination root. Every
/// reason also prunes the entry's subtree when the entry is a directory.
pub fn skip_reason(relative: &Path, absolute: &Path, dest_root: &Path) -> Option<SkipReason> {
    if relative == Path::new(BundlePath::VersionFile.as_str()) {
        return Some(SkipReason::VersionFile);
    }
    if relative
        .components()
        .any(|c| c.as_os_str() == BundlePath::GitDir.as_str())
    {
        return Some(SkipReason::VcsMetadata);
    }
    if path::is_within(absolute, dest_root) {
        return Some(SkipReason::InsideDestination);
    }
    None
}

/// One file to mirror. Lives only as long as its copy.
#[derive(Debug)]
struct CopyTask {
    source_file: PathBuf,
    dest_file: PathBuf,
}

impl CopyTask {
    /// Stream the file and mirror its permission bits. Returns bytes written.
    ///
    /// Not atomic: a failure part way leaves a partial destination file.
    fn run(&self) -> Result<u64> {
        let mut source =
            File::open(&self.source_file).map_err(|e| self.fail(CopyStage::OpenSource, e))?;
        let permissions = source
            .metadata()
            .map_err(|e| self.fail(CopyStage::OpenSource, e))?
            .permissions();

        let mut dest = self
            .create_destination()
            .map_err(|e| self.fail(CopyStage::CreateDestination, e))?;
        let bytes =
            io::copy(&mut source, &mut dest).map_err(|e| self.fail(CopyStage::Transfer, e))?;
        drop(dest);

        fs::set_permissions(&self.dest_file, permissions)
            .map_err(|e| self.fail(CopyStage::SetPermissions, e))?;
        Ok(bytes)
    }

    /// Create or truncate the destination file.
    ///
    /// A read-only file left by an earlier mirror of a read-only bundle is
    /// made owner-writable and the create is retried once.
    fn create_destination(&self) -> io::Result<File> {
        let denied = match File::create(&self.dest_file) {
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => e,
            other => return other,
        };

        let permissions = match fs::symlink_metadata(&self.dest_file) {
            Ok(meta) if meta.is_file() && meta.permissions().readonly() => meta.permissions(),
            _ => return Err(denied),
        };
        tracing::debug!(file = %self.dest_file.display(), "Unlocking read-only mirrored file");
        fs::set_permissions(&self.dest_file, owner_writable(permissions))?;
        File::create(&self.dest_file)
    }

    fn fail(&self, stage: CopyStage, source: io::Error) -> Error {
        Error::copy(stage, &self.source_file, &self.dest_file, source)
    }
}

/// Mirror `source_root` into `dest_root`.
///
/// Directories are created non-destructively with the source's permission
/// bits (plus owner write, so the mirror stays populatable). Files are
/// copied concurrently, overwriting existing destination files. Nothing is
/// ever deleted from the destination.
///
/// The first failed file copy is returned once every dispatched copy has
/// finished; later failures are discarded. A walk or directory-creation
/// error stops the walk immediately, still after in-flight copies finish.
pub fn sync_tree(source_root: &Path, dest_root: &Path, options: CopyOptions) -> Result<SyncReport> {
    let source_abs = path::absolute(source_root)?;
    let dest_abs = path::absolute(dest_root)?;
    let workers = options.worker_limit()?;

    tracing::debug!(
        source = %source_abs.display(),
        dest = %dest_abs.display(),
        workers,
        "Mirroring tree"
    );

    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("bundle-copy-{i}"))
        .build()?;

    let first_error: OnceLock<Error> = OnceLock::new();
    let files_copied = AtomicU64::new(0);
    let bytes_copied = AtomicU64::new(0);

    let walked = pool.scope(|scope| -> Result<(u64, u64)> {
        let mut dirs_mirrored = 0u64;
        let mut pruned = 0u64;
        let mut special = 0u64;

        let walker = WalkDir::new(&source_abs)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                let relative = relative_path(&source_abs, entry);
                match skip_reason(relative, entry.path(), &dest_abs) {
                    Some(reason) => {
                        log_skip(entry, reason);
                        pruned += 1;
                        false
                    }
                    None => true,
                }
            });

        for entry in walker {
            let entry = entry?;
            let relative = relative_path(&source_abs, &entry);
            let target = dest_abs.join(relative);
            let file_type = entry.file_type();

            if file_type.is_dir() {
                if entry.depth() == 0 {
                    fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
                } else {
                    create_mirrored_dir(&entry, &target)?;
                    dirs_mirrored += 1;
                }
            } else if file_type.is_symlink() && points_to_dir(entry.path()) {
                if mirror_dir_link(entry.path(), &target)? {
                    dirs_mirrored += 1;
                } else {
                    special += 1;
                }
            } else if file_type.is_file() || file_type.is_symlink() {
                let task = CopyTask {
                    source_file: entry.into_path(),
                    dest_file: target,
                };
                let first_error = &first_error;
                let files_copied = &files_copied;
                let bytes_copied = &bytes_copied;
                scope.spawn(move |_| match task.run() {
                    Ok(bytes) => {
                        tracing::debug!(file = %task.dest_file.display(), bytes, "Copied");
                        files_copied.fetch_add(1, Ordering::Relaxed);
                        bytes_copied.fetch_add(bytes, Ordering::Relaxed);
                    }
                    Err(e) => {
                        if let Err(dropped) = first_error.set(e) {
                            tracing::debug!("Dropping additional copy failure: {}", dropped);
                        }
                    }
                });
            } else {
                tracing::warn!("Special file skipped: {}", entry.path().display());
                special += 1;
            }
        }

        Ok((dirs_mirrored, pruned + special))
    });

    let (dirs_mirrored, skipped) = walked?;
    if let Some(err) = first_error.into_inner() {
        return Err(err);
    }

    Ok(SyncReport {
        dirs_mirrored,
        files_copied: files_copied.into_inner(),
        bytes_copied: bytes_copied.into_inner(),
        skipped,
    })
}

fn relative_path<'a>(source_root: &Path, entry: &'a DirEntry) -> &'a Path {
    entry
        .path()
        .strip_prefix(source_root)
        .unwrap_or_else(|_| entry.path())
}

fn log_skip(entry: &DirEntry, reason: SkipReason) {
    match reason {
        SkipReason::InsideDestination => tracing::info!(
            "Skipping destination directory to avoid infinite recursion: {}",
            entry.path().display()
        ),
        SkipReason::VersionFile | SkipReason::VcsMetadata => {
            tracing::debug!(path = %entry.path().display(), ?reason, "Skipped")
        }
    }
}

#[cfg(unix)]
fn create_mirrored_dir(entry: &DirEntry, target: &Path) -> Result<()> {
    use std::os::unix::fs::{DirBuilderExt, PermissionsExt};

    let mode = entry.metadata()?.permissions().mode();
    fs::DirBuilder::new()
        .recursive(true)
        .mode((mode & 0o7777) | 0o200)
        .create(target)
        .map_err(|e| Error::io(target, e))
}

#[cfg(not(unix))]
fn create_mirrored_dir(_entry: &DirEntry, target: &Path) -> Result<()> {
    fs::create_dir_all(target).map_err(|e| Error::io(target, e))
}

#[cfg(unix)]
fn owner_writable(permissions: fs::Permissions) -> fs::Permissions {
    use std::os::unix::fs::PermissionsExt;

    fs::Permissions::from_mode(permissions.mode() | 0o200)
}

#[cfg(not(unix))]
#[allow(clippy::permissions_set_readonly_false)]
fn owner_writable(mut permissions: fs::Permissions) -> fs::Permissions {
    permissions.set_readonly(false);
    permissions
}

fn points_to_dir(link: &Path) -> bool {
    fs::metadata(link).map(|m| m.is_dir()).unwrap_or(false)
}

/// Recreate a directory symlink in the mirror with the same link text.
///
/// The link is never walked through. An existing link with the same text is
/// kept; a different one is replaced. Returns `false` when the link was
/// skipped.
#[cfg(unix)]
fn mirror_dir_link(link: &Path, target: &Path) -> Result<bool> {
    let link_text = fs::read_link(link).map_err(|e| Error::io(link, e))?;
    match fs::read_link(target) {
        Ok(existing) if existing == link_text => return Ok(true),
        Ok(_) => fs::remove_file(target).map_err(|e| Error::io(target, e))?,
        Err(_) => {}
    }
    std::os::unix::fs::symlink(&link_text, target).map_err(|e| Error::io(target, e))?;
    tracing::debug!(link = %target.display(), to = %link_text.display(), "Mirrored directory link");
    Ok(true)
}

#[cfg(not(unix))]
fn mirror_dir_link(link: &Path, _target: &Path) -> Result<bool> {
    tracing::warn!("Directory link skipped: {}", link.display());
    Ok(false)
}
