use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::tempdir;

fn healthscan(home: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
    cargo_bin_cmd!("healthscan")
        .env("HEALTHSCAN_HOME", home)
        .env_remove("HEALTHSCAN_USER")
        .args(args)
        .assert()
}

fn show_json(home: &Path) -> Value {
    let output = cargo_bin_cmd!("healthscan")
        .env("HEALTHSCAN_HOME", home)
        .args(["session", "show", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_fresh_home_is_first_launch() {
    let dir = tempdir().unwrap();

    healthscan(dir.path(), &["session", "show"])
        .success()
        .stdout(predicate::str::contains("state: unauthenticated, first launch"));

    let state = show_json(dir.path());
    assert_eq!(state["loading"], false);
    assert_eq!(state["isFirstLaunch"], true);
    assert_eq!(state["isAuthenticated"], false);
}

#[test]
fn test_login_then_logout() {
    let dir = tempdir().unwrap();

    healthscan(dir.path(), &["session", "login", "--user", "ana"])
        .success()
        .stdout(predicate::str::contains("Signed in as ana"));
    assert!(dir.path().join("session.json").exists());

    healthscan(dir.path(), &["session", "show"])
        .success()
        .stdout(predicate::str::contains("state: authenticated"))
        .stdout(predicate::str::contains("user: ana"));

    healthscan(dir.path(), &["session", "logout"])
        .success()
        .stdout(predicate::str::contains("Signed out"));
    assert_eq!(show_json(dir.path())["isAuthenticated"], false);

    // Logging out twice is fine.
    healthscan(dir.path(), &["session", "logout"]).success();
}

#[test]
fn test_login_defaults_to_demo_user() {
    let dir = tempdir().unwrap();
    healthscan(dir.path(), &["session", "login"])
        .success()
        .stdout(predicate::str::contains("Signed in as demo"));
}

#[test]
fn test_login_rejects_blank_user() {
    let dir = tempdir().unwrap();
    healthscan(dir.path(), &["session", "login", "--user", "  "])
        .failure()
        .stderr(predicate::str::contains("must not be empty"));
}

#[test]
fn test_expired_session_is_unauthenticated() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("session.json"),
        r#"{"user":"ana","issued_at":"2020-01-01T00:00:00Z","expires_at":"2020-01-08T00:00:00Z"}"#,
    )
    .unwrap();

    assert_eq!(show_json(dir.path())["isAuthenticated"], false);
}

#[test]
fn test_reset_restores_first_launch() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("launched"), "").unwrap();
    assert_eq!(show_json(dir.path())["isFirstLaunch"], false);

    healthscan(dir.path(), &["session", "login"]).success();
    healthscan(dir.path(), &["session", "reset"])
        .success()
        .stdout(predicate::str::contains("next launch starts at Landing"));

    let state = show_json(dir.path());
    assert_eq!(state["isFirstLaunch"], true);
    assert_eq!(state["isAuthenticated"], false);
    assert!(!dir.path().join("session.json").exists());
}
