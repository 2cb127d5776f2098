//! Scenarios spanning several runs against the same destination.

use bundle_core::{SyncEngine, SyncRequest, SyncStatus};
use bundle_test_utils::bundle::TestBundle;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;

fn mirror(source: &Path, dest: &Path) -> SyncStatus {
    let mut request = SyncRequest::new(source, dest);
    request.copy_enabled = true;
    SyncEngine::new(request).run().unwrap().sync
}

#[test]
fn test_new_bundle_version_replaces_stamp() {
    let v1 = TestBundle::with_version("sha256new_aaa111");
    v1.add_file("bin/app", "v1");
    v1.add_file("lib/old.so", "old");
    let dest = v1.root().join("mirror");

    assert!(matches!(mirror(v1.source(), &dest), SyncStatus::Synced(_)));
    assert_eq!(mirror(v1.source(), &dest), SyncStatus::UpToDate);

    let v2 = TestBundle::with_version("sha256new_bbb222");
    v2.add_file("bin/app", "v2");

    assert!(matches!(mirror(v2.source(), &dest), SyncStatus::Synced(_)));
    assert_eq!(fs::read_to_string(dest.join(".version")).unwrap(), "sha256new_bbb222");
    assert_eq!(fs::read_to_string(dest.join("bin/app")).unwrap(), "v2");
    // Files absent from the new bundle are left alone
    assert!(dest.join("lib/old.so").exists());
}

#[test]
fn test_stamp_in_bundle_never_reaches_destination() {
    let bundle = TestBundle::new();
    bundle.add_file("bin/app", "app");
    bundle.add_file(".version", "sha256new_stale");

    mirror(bundle.source(), &bundle.dest());

    // The destination stamp names this bundle, not the stamp it shipped with
    assert_eq!(
        fs::read_to_string(bundle.dest().join(".version")).unwrap(),
        bundle_test_utils::bundle::DEFAULT_VERSION
    );
}

#[test]
fn test_destination_nested_in_bundle_terminates() {
    let bundle = TestBundle::new();
    bundle.add_file("bin/app", "app");
    let dest = bundle.source().join("cache");

    let first = mirror(bundle.source(), &dest);
    let SyncStatus::Synced(report) = first else {
        panic!("expected Synced, got {first:?}");
    };
    assert_eq!(report.files_copied, 1);
    assert!(!dest.join("cache").exists());

    assert_eq!(mirror(bundle.source(), &dest), SyncStatus::UpToDate);
}

#[test]
fn test_vcs_metadata_is_never_mirrored() {
    let bundle = TestBundle::new();
    bundle.add_file("bin/app", "app");
    bundle.add_file(".git/config", "[core]");
    bundle.add_file("vendor/lib/.git/HEAD", "ref");
    bundle.add_file("vendor/lib/src.c", "int x;");

    mirror(bundle.source(), &bundle.dest());

    bundle.assert_mirrored(&bundle.dest(), "vendor/lib/src.c");
    bundle.assert_not_mirrored(&bundle.dest(), ".git");
    bundle.assert_not_mirrored(&bundle.dest(), "vendor/lib/.git");
}

#[cfg(unix)]
#[test]
fn test_mirror_preserves_executable_bits() {
    use std::os::unix::fs::PermissionsExt;

    let bundle = TestBundle::new();
    bundle.add_file_with_mode("bin/app", "#!/bin/sh\n", 0o755);
    bundle.add_file_with_mode("etc/secret", "s", 0o600);

    mirror(bundle.source(), &bundle.dest());

    let mode = |rel: &str| {
        fs::metadata(bundle.dest().join(rel)).unwrap().permissions().mode() & 0o777
    };
    assert_eq!(mode("bin/app"), 0o755);
    assert_eq!(mode("etc/secret"), 0o600);
}
