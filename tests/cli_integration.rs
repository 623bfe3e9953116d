//! CLI integration tests for tasklist
//!
//! These tests drive the binary against a temporary project, checking that
//! every command persists through the slot file and that later commands
//! see the result.

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command instance for the tasklist binary
fn tasklist_cmd() -> assert_cmd::Command {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("tasklist"))
}

/// Create a temporary directory and initialize a tasklist project
fn setup_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    tasklist_cmd().arg("init").arg(dir.path()).assert().success();
    dir
}

/// Add a todo and return its ID
fn add_todo(dir: &TempDir, title: &str) -> u64 {
    let output = tasklist_cmd()
        .current_dir(dir.path())
        .args(["add", title, "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    json["id"].as_u64().unwrap()
}

/// List todos as JSON
fn list_json(dir: &TempDir, filter: &str) -> serde_json::Value {
    let output = tasklist_cmd()
        .current_dir(dir.path())
        .args(["list", "--filter", filter, "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    serde_json::from_str(&stdout).unwrap()
}

fn titles(list: &serde_json::Value) -> Vec<String> {
    list["todos"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap().to_string())
        .collect()
}

fn slot_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join(".tasklist").join("todos_v1.json")
}

// =============================================================================
// Initialization Tests
// =============================================================================

#[test]
fn test_init_creates_structure() {
    let dir = TempDir::new().unwrap();

    tasklist_cmd()
        .arg("init")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized tasklist project"));

    assert!(dir.path().join(".tasklist").is_dir());
    assert!(dir.path().join(".tasklist/config.toml").is_file());
    assert!(dir.path().join(".tasklist/.gitignore").is_file());
}

#[test]
fn test_init_is_idempotent() {
    let dir = TempDir::new().unwrap();

    tasklist_cmd().arg("init").arg(dir.path()).assert().success();
    tasklist_cmd().arg("init").arg(dir.path()).assert().success();
}

#[test]
fn test_commands_require_project() {
    let dir = TempDir::new().unwrap();

    tasklist_cmd()
        .current_dir(dir.path())
        .args(["add", "Orphan"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not in a tasklist project"));
}

// =============================================================================
// Add / List Tests
// =============================================================================

#[test]
fn test_add_prepends_newest_first() {
    let dir = setup_project();

    add_todo(&dir, "Buy milk");
    add_todo(&dir, "Walk dog");

    let list = list_json(&dir, "all");
    assert_eq!(titles(&list), vec!["Walk dog", "Buy milk"]);
    assert_eq!(list["remaining"], 2);
}

#[test]
fn test_add_joins_words_and_trims() {
    let dir = setup_project();

    tasklist_cmd()
        .current_dir(dir.path())
        .args(["add", "  Buy", "oat", "milk  "])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added todo:"))
        .stdout(predicate::str::contains("Buy oat milk"));

    let list = list_json(&dir, "all");
    assert_eq!(titles(&list), vec!["Buy oat milk"]);
}

#[test]
fn test_add_blank_title_is_ignored() {
    let dir = setup_project();

    tasklist_cmd()
        .current_dir(dir.path())
        .args(["add", "   "])
        .assert()
        .success();

    let list = list_json(&dir, "all");
    assert!(titles(&list).is_empty());
    assert!(!slot_path(&dir).exists());
}

#[test]
fn test_add_writes_slot_file() {
    let dir = setup_project();
    let id = add_todo(&dir, "Buy milk");

    let raw = fs::read_to_string(slot_path(&dir)).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(stored[0]["id"], id);
    assert_eq!(stored[0]["title"], "Buy milk");
    assert_eq!(stored[0]["completed"], false);
    assert!(stored[0]["createdAt"].is_i64());
}

#[test]
fn test_list_text_output() {
    let dir = setup_project();
    add_todo(&dir, "Buy milk");

    tasklist_cmd()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("[ ]  Buy milk"))
        .stdout(predicate::str::contains("1 item left"));
}

#[test]
fn test_list_empty() {
    let dir = setup_project();

    tasklist_cmd()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No todos"))
        .stdout(predicate::str::contains("0 items left"));
}

// =============================================================================
// Toggle / Filter Tests
// =============================================================================

#[test]
fn test_toggle_and_filters() {
    let dir = setup_project();

    let milk = add_todo(&dir, "Buy milk");
    add_todo(&dir, "Walk dog");

    tasklist_cmd()
        .current_dir(dir.path())
        .args(["toggle", &milk.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed todo"));

    assert_eq!(titles(&list_json(&dir, "completed")), vec!["Buy milk"]);
    assert_eq!(titles(&list_json(&dir, "active")), vec!["Walk dog"]);
    assert_eq!(list_json(&dir, "all")["remaining"], 1);

    tasklist_cmd()
        .current_dir(dir.path())
        .args(["toggle", &milk.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reopened todo"));

    assert!(titles(&list_json(&dir, "completed")).is_empty());
}

#[test]
fn test_toggle_unknown_id_fails() {
    let dir = setup_project();
    add_todo(&dir, "Buy milk");

    tasklist_cmd()
        .current_dir(dir.path())
        .args(["toggle", "12345"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Todo not found: 12345"));
}

#[test]
fn test_invalid_id_is_rejected() {
    let dir = setup_project();

    tasklist_cmd()
        .current_dir(dir.path())
        .args(["remove", "not-a-number"])
        .assert()
        .failure();
}

#[test]
fn test_toggle_all_and_clear_completed() {
    let dir = setup_project();
    add_todo(&dir, "A");
    add_todo(&dir, "B");

    tasklist_cmd()
        .current_dir(dir.path())
        .arg("toggle-all")
        .assert()
        .success();
    assert!(titles(&list_json(&dir, "active")).is_empty());

    tasklist_cmd()
        .current_dir(dir.path())
        .args(["toggle-all", "--uncheck"])
        .assert()
        .success();
    assert!(titles(&list_json(&dir, "completed")).is_empty());

    let c = add_todo(&dir, "C");
    tasklist_cmd()
        .current_dir(dir.path())
        .args(["toggle", &c.to_string()])
        .assert()
        .success();

    tasklist_cmd()
        .current_dir(dir.path())
        .arg("clear-completed")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 1 completed todo"));

    assert_eq!(titles(&list_json(&dir, "all")), vec!["B", "A"]);
}

// =============================================================================
// Edit / Remove Tests
// =============================================================================

#[test]
fn test_edit_updates_title() {
    let dir = setup_project();
    let id = add_todo(&dir, "Old title");

    tasklist_cmd()
        .current_dir(dir.path())
        .args(["edit", &id.to_string(), "  New title "])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated todo"));

    assert_eq!(titles(&list_json(&dir, "all")), vec!["New title"]);
}

#[test]
fn test_edit_to_empty_removes() {
    let dir = setup_project();
    let id = add_todo(&dir, "X");

    tasklist_cmd()
        .current_dir(dir.path())
        .args(["edit", &id.to_string(), ""])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed todo"));

    assert!(titles(&list_json(&dir, "all")).is_empty());
}

#[test]
fn test_remove() {
    let dir = setup_project();
    let a = add_todo(&dir, "A");
    add_todo(&dir, "B");

    tasklist_cmd()
        .current_dir(dir.path())
        .args(["remove", &a.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed todo"));

    assert_eq!(titles(&list_json(&dir, "all")), vec!["B"]);

    tasklist_cmd()
        .current_dir(dir.path())
        .args(["remove", &a.to_string()])
        .assert()
        .failure();
}

// =============================================================================
// Count / Persistence Tests
// =============================================================================

#[test]
fn test_count() {
    let dir = setup_project();
    let a = add_todo(&dir, "A");
    add_todo(&dir, "B");
    add_todo(&dir, "C");

    tasklist_cmd()
        .current_dir(dir.path())
        .args(["toggle", &a.to_string()])
        .assert()
        .success();

    tasklist_cmd()
        .current_dir(dir.path())
        .arg("count")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 items left"));

    let output = tasklist_cmd()
        .current_dir(dir.path())
        .args(["count", "--format", "json"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["remaining"], 2);
    assert_eq!(json["completed"], 1);
    assert_eq!(json["total"], 3);
}

#[test]
fn test_corrupt_slot_falls_back_to_empty() {
    let dir = setup_project();
    fs::write(slot_path(&dir), "{ this is not json").unwrap();

    tasklist_cmd()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No todos"))
        .stderr(predicate::str::contains("Failed to load todos"));

    // The next mutation overwrites the bad slot
    add_todo(&dir, "Fresh start");
    assert_eq!(titles(&list_json(&dir, "all")), vec!["Fresh start"]);
}

#[test]
fn test_write_failure_is_not_fatal() {
    let dir = setup_project();
    fs::write(
        dir.path().join(".tasklist/config.toml"),
        "max_slot_bytes = 10\n",
    )
    .unwrap();

    tasklist_cmd()
        .current_dir(dir.path())
        .args(["add", "A title that does not fit"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Failed to persist todos"))
        .stderr(predicate::str::contains("Warning: Changes were not saved"));

    assert!(!slot_path(&dir).exists());
}

#[test]
fn test_sequential_ids_from_config() {
    let dir = setup_project();
    fs::write(
        dir.path().join(".tasklist/config.toml"),
        "id_strategy = \"sequential\"\n",
    )
    .unwrap();

    assert_eq!(add_todo(&dir, "First"), 1);
    assert_eq!(add_todo(&dir, "Second"), 2);
}

#[test]
fn test_default_filter_from_config() {
    let dir = setup_project();
    let a = add_todo(&dir, "Done one");
    add_todo(&dir, "Open one");
    tasklist_cmd()
        .current_dir(dir.path())
        .args(["toggle", &a.to_string()])
        .assert()
        .success();

    fs::write(
        dir.path().join(".tasklist/config.toml"),
        "default_filter = \"active\"\n",
    )
    .unwrap();

    tasklist_cmd()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Open one"))
        .stdout(predicate::str::contains("Done one").not());
}

#[test]
fn test_works_from_subdirectory() {
    let dir = setup_project();
    let sub = dir.path().join("nested").join("deeper");
    fs::create_dir_all(&sub).unwrap();

    tasklist_cmd()
        .current_dir(&sub)
        .args(["add", "From below"])
        .assert()
        .success();

    assert_eq!(titles(&list_json(&dir, "all")), vec!["From below"]);
}
