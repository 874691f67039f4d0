//! Integration tests for commands that need no network

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn thali_cmd(db_path: &Path) -> Command {
    let mut cmd = Command::cargo_bin("thali").unwrap();
    cmd.env("THALI_DB", db_path)
        .env("THALI_CONFIG", db_path.with_extension("yml"))
        // nothing listens here, so index calls fail fast
        .env("THALI_CHROMA_HOST", "127.0.0.1")
        .env("THALI_CHROMA_PORT", "9")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let db_dir = TempDir::new().unwrap();
    thali_cmd(&db_dir.path().join("prefs.sqlite"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("prefs"))
        .stdout(predicate::str::contains("mcp"));
}

#[test]
fn test_prefs_partial_update_round_trip() {
    let db_dir = TempDir::new().unwrap();
    let db_path = db_dir.path().join("prefs.sqlite");

    thali_cmd(&db_path)
        .args(["prefs", "set", "asha", "--diet", "jain", "--allergy", "peanut", "--allergy", "sesame"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Preferences saved for 'asha'"));

    thali_cmd(&db_path)
        .args(["prefs", "set", "asha", "--spice", "mild"])
        .assert()
        .success();

    let output = thali_cmd(&db_path)
        .args(["--format", "json", "prefs", "show", "asha"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let prefs: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(prefs["user_id"], "asha");
    assert_eq!(prefs["dietary_type"], "jain");
    assert_eq!(prefs["spice_level"], "mild");
    assert_eq!(prefs["allergens"], serde_json::json!(["peanut", "sesame"]));
}

#[test]
fn test_prefs_show_unknown_user() {
    let db_dir = TempDir::new().unwrap();
    thali_cmd(&db_dir.path().join("prefs.sqlite"))
        .args(["prefs", "show", "nobody"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No preferences saved for 'nobody'"));
}

#[test]
fn test_search_with_index_down_is_empty() {
    let db_dir = TempDir::new().unwrap();
    thali_cmd(&db_dir.path().join("prefs.sqlite"))
        .args(["--format", "json", "search", "dosa", "--allergy", "peanut"])
        .assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));
}

#[test]
fn test_get_with_index_down_is_not_found() {
    let db_dir = TempDir::new().unwrap();
    thali_cmd(&db_dir.path().join("prefs.sqlite"))
        .args(["get", "masala-dosa"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Dish not found: masala-dosa"));
}

#[test]
fn test_invalid_format_is_rejected() {
    let db_dir = TempDir::new().unwrap();
    thali_cmd(&db_dir.path().join("prefs.sqlite"))
        .args(["--format", "xml", "prefs", "show", "asha"])
        .assert()
        .failure();
}

#[test]
fn test_index_commands_do_not_open_the_store() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "").unwrap();
    // Parent is a regular file, so the store can never be created here
    let db_path = blocker.join("prefs.sqlite");

    thali_cmd(&db_path)
        .args(["--format", "json", "search", "dosa"])
        .assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));
    assert!(!db_path.exists());

    thali_cmd(&db_path)
        .args(["prefs", "show", "asha"])
        .assert()
        .failure();
}
