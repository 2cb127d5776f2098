//! [`TestBundle`] builder for mirroring scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Version-style name used for bundles created with [`TestBundle::new`].
pub const DEFAULT_VERSION: &str = "sha256new_abc123";

/// A temporary workspace holding a source bundle directory named after its
/// version, and room for a destination next to it.
///
/// # Example
///
/// ```rust,no_run
/// use bundle_test_utils::bundle::TestBundle;
///
/// let bundle = TestBundle::new();
/// bundle.add_file("bin/app", "#!/bin/sh\n");
/// bundle.add_file(".git/HEAD", "ref: refs/heads/main\n");
/// let dest = bundle.dest();
/// ```
pub struct TestBundle {
    temp_dir: TempDir,
    source: PathBuf,
}

impl Default for TestBundle {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBundle {
    /// Create an empty bundle named [`DEFAULT_VERSION`].
    pub fn new() -> Self {
        Self::with_version(DEFAULT_VERSION)
    }

    /// Create an empty bundle whose directory is called `version`.
    pub fn with_version(version: &str) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join(version);
        fs::create_dir_all(&source).unwrap();
        Self { temp_dir, source }
    }

    /// Root of the temporary workspace.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The bundle (source) directory.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// A destination path beside the bundle. Not created.
    pub fn dest(&self) -> PathBuf {
        self.root().join("dest")
    }

    /// Write `content` to `path` relative to the bundle, creating parents.
    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.source.join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("add_file: failed to write {}: {e}", full_path.display()));
        full_path
    }

    /// Write a file and give it Unix permission bits `mode`.
    #[cfg(unix)]
    pub fn add_file_with_mode(&self, path: &str, content: &str, mode: u32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let full_path = self.add_file(path, content);
        fs::set_permissions(&full_path, fs::Permissions::from_mode(mode)).unwrap();
        full_path
    }

    /// Create an (empty) directory relative to the bundle.
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.source.join(path);
        fs::create_dir_all(&full_path).unwrap();
        full_path
    }

    /// Relative paths of every regular file in the bundle, sorted.
    pub fn files(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_files(&self.source, &self.source, &mut out);
        out.sort();
        out
    }

    /// Assert that `path` (relative to `dest`) exists with the same bytes as
    /// the bundle's file at the same relative path.
    ///
    /// # Panics
    /// Panics with a descriptive message on mismatch.
    pub fn assert_mirrored(&self, dest: &Path, path: &str) {
        let source_path = self.source.join(path);
        let dest_path = dest.join(path);
        let expected = fs::read(&source_path)
            .unwrap_or_else(|_| panic!("Could not read source file: {}", source_path.display()));
        let actual = fs::read(&dest_path)
            .unwrap_or_else(|_| panic!("Expected mirrored file: {}", dest_path.display()));
        assert!(
            expected == actual,
            "Mirrored content differs for {}",
            dest_path.display()
        );
    }

    /// Assert that `path` (relative to `dest`) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_not_mirrored(&self, dest: &Path, path: &str) {
        let full_path = dest.join(path);
        assert!(
            !full_path.exists(),
            "Expected path NOT to be mirrored: {}",
            full_path.display()
        );
    }
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<String>) {
    for entry in fs::read_dir(dir).unwrap() {
        let entry = entry.unwrap();
        let path = entry.path();
        if entry.file_type().unwrap().is_dir() {
            collect_files(root, &path, out);
        } else {
            let rel = path.strip_prefix(root).unwrap();
            out.push(rel.to_string_lossy().replace('\\', "/"));
        }
    }
}
