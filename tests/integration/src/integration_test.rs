//! End-to-end integration test for a wrapper run
//!
//! Exercises the complete flow: config file -> flag overrides -> resolved
//! request -> sync -> entry planning -> launch or cleanup.

use bundle_core::{EntryState, SyncEngine, SyncStatus, WrapperConfig};
use bundle_fs::ReapOutcome;
use bundle_test_utils::bundle::{DEFAULT_VERSION, TestBundle};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};

/// Write `wrapper.config.json` into the bundle and return its path.
fn write_config(bundle: &TestBundle, json: &serde_json::Value) -> PathBuf {
    let path = bundle.source().join("wrapper.config.json");
    fs::write(&path, serde_json::to_string_pretty(json).unwrap()).unwrap();
    path
}

fn load(path: &Path) -> WrapperConfig {
    WrapperConfig::load(path).unwrap().unwrap()
}

#[test]
fn test_config_file_drives_mirror() {
    let bundle = TestBundle::new();
    bundle.add_file("bin/app", "app");
    bundle.add_file("share/readme.txt", "hello");
    let config_path = write_config(
        &bundle,
        &serde_json::json!({
            "dest": bundle.root().join("apps"),
            "name": "tool",
            "copy": true,
        }),
    );

    let resolved = load(&config_path)
        .resolve_with_home(bundle.source(), None)
        .unwrap();
    let dest = bundle.root().join("apps").join("tool");
    assert_eq!(resolved.request.dest_root, dest);

    let outcome = SyncEngine::new(resolved.request).run().unwrap();

    match outcome.sync {
        // The config file itself is part of the bundle
        SyncStatus::Synced(report) => assert_eq!(report.files_copied, 3),
        other => panic!("expected Synced, got {other:?}"),
    }
    bundle.assert_mirrored(&dest, "bin/app");
    bundle.assert_mirrored(&dest, "share/readme.txt");
    assert_eq!(fs::read_to_string(dest.join(".version")).unwrap(), DEFAULT_VERSION);
}

#[test]
fn test_flags_override_file_values() {
    let bundle = TestBundle::new();
    bundle.add_file("bin/app", "app");
    let config_path = write_config(
        &bundle,
        &serde_json::json!({ "dest": bundle.root().join("from-file"), "copy": true }),
    );

    let mut config = load(&config_path);
    config.merge(&WrapperConfig {
        dest: Some(bundle.dest()),
        copy: Some(false),
        ..Default::default()
    });
    let resolved = config.resolve_with_home(bundle.source(), None).unwrap();

    assert_eq!(resolved.request.dest_root, bundle.dest());
    let engine = SyncEngine::new(resolved.request);
    let outcome = engine.run().unwrap();

    assert_eq!(outcome.sync, SyncStatus::CopyDisabled);
    assert_eq!(engine.reap().unwrap(), ReapOutcome::Removed);
    assert!(!bundle.root().join("from-file").exists());
}

#[test]
fn test_home_default_destination() {
    let bundle = TestBundle::new();
    bundle.add_file("bin/app", "app");
    let home = bundle.root().join("home");

    let config = WrapperConfig {
        copy: Some(true),
        ..Default::default()
    };
    let resolved = config.resolve_with_home(bundle.source(), Some(home.clone())).unwrap();
    SyncEngine::new(resolved.request).run().unwrap();

    bundle.assert_mirrored(&home.join("Aiwb_Application"), "bin/app");
}

#[cfg(unix)]
#[test]
fn test_entry_runs_from_mirror_and_reports_exit_code() {
    use bundle_launch::{LaunchMode, launch};
    use bundle_test_utils::script;

    let bundle = TestBundle::new();
    script::exit_with(&bundle.source().join("bin/run.sh"), 4);

    let config = WrapperConfig {
        dest: Some(bundle.dest()),
        copy: Some(true),
        entry: Some(PathBuf::from("bin/run.sh")),
        launch_mode: Some(LaunchMode::Wait),
        ..Default::default()
    };
    let resolved = config.resolve_with_home(bundle.source(), None).unwrap();
    let engine = SyncEngine::new(resolved.request);
    let outcome = engine.run().unwrap();

    let EntryState::Ready(plan) = outcome.entry else {
        panic!("expected a launchable entry, got {:?}", outcome.entry);
    };
    assert!(plan.resolved_path.starts_with(fs::canonicalize(bundle.dest()).unwrap()));

    let launched = launch(&plan, engine.request().launch_mode).unwrap();
    assert_eq!(launched.exit_code(), 4);
}

#[test]
fn test_refused_entry_falls_through_to_cleanup() {
    let bundle = TestBundle::new();
    fs::write(bundle.root().join("evil.exe"), "evil").unwrap();

    let config = WrapperConfig {
        dest: Some(bundle.dest()),
        entry: Some(PathBuf::from("../evil.exe")),
        ..Default::default()
    };
    let resolved = config.resolve_with_home(bundle.source(), None).unwrap();
    let engine = SyncEngine::new(resolved.request);
    let outcome = engine.run().unwrap();

    assert!(matches!(&outcome.entry, EntryState::Skipped(e) if e.is_refusal()));
    assert_eq!(engine.reap().unwrap(), ReapOutcome::Removed);
}
