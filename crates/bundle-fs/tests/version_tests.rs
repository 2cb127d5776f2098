//! Stamp lifecycle across sync passes.

use bundle_fs::{CopyOptions, derive_version, needs_sync, read_stamp, sync_tree, write_stamp};
use bundle_test_utils::bundle::TestBundle;
use rstest::rstest;
use std::path::Path;

#[rstest]
#[case("/cache/sha256new_abc123", "sha256new_abc123")]
#[case("/cache/sha256new_abc123/", "sha256new_abc123")]
#[case("relative/app-2.0", "app-2.0")]
#[case("plain", "plain")]
fn derive_version_takes_base_name(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(derive_version(Path::new(input)), expected);
}

#[test]
fn first_run_needs_sync_and_stamp_matches_afterwards() {
    let bundle = TestBundle::new();
    bundle.add_file("bin/app", "app");
    let dest = bundle.dest();
    std::fs::create_dir_all(&dest).unwrap();

    let version = derive_version(bundle.source());
    assert_eq!(version, "sha256new_abc123");
    assert!(needs_sync(&dest, &version));

    sync_tree(bundle.source(), &dest, CopyOptions::default()).unwrap();
    write_stamp(&dest, &version).unwrap();

    assert_eq!(
        std::fs::read_to_string(dest.join(".version")).unwrap(),
        "sha256new_abc123"
    );
    assert!(!needs_sync(&dest, &version));
}

#[test]
fn new_bundle_version_invalidates_stamp() {
    let old = TestBundle::with_version("sha256new_old");
    let dest = old.dest();
    write_stamp(&dest, &derive_version(old.source())).unwrap();

    assert!(needs_sync(&dest, "sha256new_new"));
    assert_eq!(read_stamp(&dest).unwrap().as_deref(), Some("sha256new_old"));
}

#[test]
fn write_stamp_leaves_no_temp_files() {
    let bundle = TestBundle::new();
    let dest = bundle.dest();

    write_stamp(&dest, "v1").unwrap();
    write_stamp(&dest, "v2").unwrap();

    let names: Vec<_> = std::fs::read_dir(&dest)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec![".version".to_string()]);
    assert_eq!(read_stamp(&dest).unwrap().as_deref(), Some("v2"));
}
