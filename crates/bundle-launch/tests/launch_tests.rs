//! Launch tests that run real child processes.
//!
//! Entry programs are `/bin/sh` scripts, so these only run on Unix.

#![cfg(unix)]

use bundle_launch::{EntryPlan, LaunchError, LaunchMode, LaunchOutcome, launch};
use bundle_test_utils::script;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn wait_for(path: &Path) -> bool {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        if fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    false
}

#[test]
fn wait_mode_returns_child_exit_code() {
    let temp = TempDir::new().unwrap();
    script::exit_with(&temp.path().join("bin/app"), 3);

    let plan = EntryPlan::resolve(temp.path(), Path::new("bin/app"), temp.path()).unwrap();
    let outcome = launch(&plan, LaunchMode::Wait).unwrap();

    assert_eq!(outcome, LaunchOutcome::Exited { code: 3 });
    assert_eq!(outcome.exit_code(), 3);
}

#[test]
fn wait_mode_success_is_zero() {
    let temp = TempDir::new().unwrap();
    script::exit_with(&temp.path().join("app"), 0);

    let plan = EntryPlan::resolve(temp.path(), Path::new("app"), temp.path()).unwrap();

    assert_eq!(launch(&plan, LaunchMode::Wait).unwrap().exit_code(), 0);
}

#[test]
fn child_runs_in_planned_working_directory() {
    let temp = TempDir::new().unwrap();
    let bundle = temp.path().join("bundle");
    let workdir = temp.path().join("work");
    fs::create_dir_all(&workdir).unwrap();
    let marker = temp.path().join("cwd.txt");
    script::record_cwd(&bundle.join("app"), &marker);

    let plan = EntryPlan::resolve(&bundle, Path::new("app"), &workdir).unwrap();
    launch(&plan, LaunchMode::Wait).unwrap();

    let recorded = fs::read_to_string(&marker).unwrap();
    assert_eq!(
        Path::new(recorded.trim()),
        dunce::canonicalize(&workdir).unwrap()
    );
}

#[test]
fn child_inherits_environment() {
    let temp = TempDir::new().unwrap();
    let marker = temp.path().join("path.txt");
    script::write_script(
        &temp.path().join("app"),
        &format!("printf '%s' \"$PATH\" > '{}'", marker.display()),
    );

    let plan = EntryPlan::resolve(temp.path(), Path::new("app"), temp.path()).unwrap();
    launch(&plan, LaunchMode::Wait).unwrap();

    let inherited = fs::read_to_string(&marker).unwrap();
    assert_eq!(inherited, std::env::var("PATH").unwrap_or_default());
}

#[test]
fn detach_mode_returns_pid_without_waiting() {
    let temp = TempDir::new().unwrap();
    let marker = temp.path().join("done.txt");
    script::write_script(
        &temp.path().join("app"),
        &format!("sleep 1\necho done > '{}'", marker.display()),
    );

    let plan = EntryPlan::resolve(temp.path(), Path::new("app"), temp.path()).unwrap();
    let started = Instant::now();
    let outcome = launch(&plan, LaunchMode::Detach).unwrap();

    assert!(started.elapsed() < Duration::from_secs(1));
    match outcome {
        LaunchOutcome::Detached { pid } => assert!(pid > 0),
        other => panic!("expected detached outcome, got {other:?}"),
    }
    assert_eq!(outcome.exit_code(), 0);
    assert!(wait_for(&marker), "detached child never finished");
}

#[test]
fn non_executable_entry_fails_to_spawn() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("data.txt"), "not a program").unwrap();

    let plan = EntryPlan::resolve(temp.path(), Path::new("data.txt"), temp.path()).unwrap();
    let err = launch(&plan, LaunchMode::Wait).unwrap_err();

    assert!(matches!(err, LaunchError::Spawn { .. }), "got {err:?}");
}

#[test]
fn escaping_entry_is_never_launched() {
    let temp = TempDir::new().unwrap();
    let base = temp.path().join("a/b");
    fs::create_dir_all(&base).unwrap();
    let marker = temp.path().join("pwned.txt");
    script::write_script(
        &temp.path().join("evil.exe"),
        &format!("touch '{}'", marker.display()),
    );

    let err = EntryPlan::resolve(&base, Path::new("../../evil.exe"), &base).unwrap_err();

    assert!(err.is_refusal());
    assert!(!marker.exists());
}
