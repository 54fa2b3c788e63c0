//! Integration tests for the `ck` CLI.
//!
//! Each test points `ck` at a task file in a temp directory, runs it as a
//! subprocess, and checks stdout, stderr and the file contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Get the path to the built `ck` binary.
fn ck_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("ck");
    path
}

/// Run `ck` with the task file set through the environment and the config
/// directory isolated from the user's own.
fn ck(root: &Path, args: &[&str]) -> Output {
    Command::new(ck_bin())
        .args(args)
        .env("CHECKLIST_FILE", root.join("tasks.json"))
        .env("XDG_CONFIG_HOME", root.join("config"))
        .env("HOME", root)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

fn assert_ok(out: &Output) {
    assert!(
        out.status.success(),
        "ck failed: stdout={} stderr={}",
        stdout(out),
        stderr(out)
    );
}

/// Texts in list order, via `list --json`
fn list_texts(root: &Path) -> Vec<String> {
    let out = ck(root, &["list", "--json"]);
    assert_ok(&out);
    let view: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    view["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["text"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn add_prints_new_id_and_persists() {
    let tmp = TempDir::new().unwrap();
    let out = ck(tmp.path(), &["add", "Buy", "milk"]);
    assert_ok(&out);
    assert_eq!(stdout(&out).trim(), "1");

    let out = ck(tmp.path(), &["add", "Call bank", "--due", "2000-01-01"]);
    assert_ok(&out);
    assert_eq!(stdout(&out).trim(), "2");

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(tmp.path().join("tasks.json")).unwrap()).unwrap();
    assert_eq!(saved[0]["text"], "Buy milk");
    assert_eq!(saved[1]["dueDate"], "2000-01-01");
}

#[test]
fn list_marks_urgent_and_completed() {
    let tmp = TempDir::new().unwrap();
    assert_ok(&ck(tmp.path(), &["add", "Overdue", "--due", "2000-01-01"]));
    assert_ok(&ck(tmp.path(), &["add", "Done"]));
    assert_ok(&ck(tmp.path(), &["toggle", "2"]));

    let out = ck(tmp.path(), &["list"]);
    assert_ok(&out);
    let text = stdout(&out);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "1 [ ] ! Overdue  Due: 01 Jan 2000");
    assert_eq!(lines[1], "2 [x]   Done     Due: none");
    assert_eq!(lines.last(), Some(&"1 of 2 pending"));
}

#[test]
fn list_filter_hides_other_tasks() {
    let tmp = TempDir::new().unwrap();
    assert_ok(&ck(tmp.path(), &["add", "a"]));
    assert_ok(&ck(tmp.path(), &["add", "b"]));
    assert_ok(&ck(tmp.path(), &["toggle", "1"]));

    let out = ck(tmp.path(), &["list", "--filter", "pending", "--json"]);
    assert_ok(&out);
    let view: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(view["filter"], "pending");
    assert_eq!(view["rows"].as_array().unwrap().len(), 1);
    assert_eq!(view["rows"][0]["text"], "b");
    assert_eq!(view["show_empty_state"], false);
}

#[test]
fn empty_list_shows_hint() {
    let tmp = TempDir::new().unwrap();
    let out = ck(tmp.path(), &["list"]);
    assert_ok(&out);
    assert!(stdout(&out).starts_with("No tasks yet."));
}

#[test]
fn blank_text_exits_with_error() {
    let tmp = TempDir::new().unwrap();
    let out = ck(tmp.path(), &["add", "   "]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("error: task text cannot be empty"));
    assert!(!tmp.path().join("tasks.json").exists());
}

#[test]
fn unknown_id_exits_with_error() {
    let tmp = TempDir::new().unwrap();
    assert_ok(&ck(tmp.path(), &["add", "a"]));
    for args in [&["toggle", "9"][..], &["rm", "9"], &["edit", "9", "x"]] {
        let out = ck(tmp.path(), args);
        assert_eq!(out.status.code(), Some(1), "args {:?}", args);
        assert!(stderr(&out).contains("task not found: 9"));
    }
}

#[test]
fn edit_rm_and_mv() {
    let tmp = TempDir::new().unwrap();
    for text in ["a", "b", "c"] {
        assert_ok(&ck(tmp.path(), &["add", text]));
    }

    assert_ok(&ck(tmp.path(), &["edit", "2", "bee"]));
    assert_eq!(list_texts(tmp.path()), vec!["a", "bee", "c"]);

    assert_ok(&ck(tmp.path(), &["mv", "3", "--top"]));
    assert_eq!(list_texts(tmp.path()), vec!["c", "a", "bee"]);

    assert_ok(&ck(tmp.path(), &["mv", "3", "--after", "2"]));
    assert_eq!(list_texts(tmp.path()), vec!["a", "bee", "c"]);

    assert_ok(&ck(tmp.path(), &["rm", "1"]));
    assert_eq!(list_texts(tmp.path()), vec!["bee", "c"]);
}

#[test]
fn corrupt_file_warns_but_succeeds() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("tasks.json"), "definitely not json").unwrap();

    let out = ck(tmp.path(), &["list"]);
    assert_ok(&out);
    assert!(stderr(&out).contains("warning: could not load tasks"));
}

#[test]
fn file_flag_overrides_environment() {
    let tmp = TempDir::new().unwrap();
    let other = tmp.path().join("other.json");
    let out = ck(tmp.path(), &["--file", other.to_str().unwrap(), "add", "elsewhere"]);
    assert_ok(&out);
    assert!(other.exists());
    assert!(!tmp.path().join("tasks.json").exists());
}

#[test]
fn config_sets_default_filter_and_date_format() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("ck.toml");
    fs::write(
        &config,
        "[ui]\ndefault_filter = \"completed\"\ndate_format = \"%Y/%m/%d\"\n",
    )
    .unwrap();
    assert_ok(&ck(tmp.path(), &["add", "open"]));
    assert_ok(&ck(tmp.path(), &["add", "closed", "--due", "2030-05-06"]));
    assert_ok(&ck(tmp.path(), &["toggle", "2"]));

    let out = ck(tmp.path(), &["--config", config.to_str().unwrap(), "list"]);
    assert_ok(&out);
    let text = stdout(&out);
    assert!(text.contains("closed  Due: 2030/05/06"));
    assert!(!text.contains("open"));
}

#[test]
fn missing_explicit_config_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope.toml");
    let out = ck(tmp.path(), &["--config", missing.to_str().unwrap(), "list"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).starts_with("error: could not read"));
}
