//! Integration tests for the `tl` CLI.
//!
//! Each test creates a temp data directory, runs `tl -C <dir>` as a
//! subprocess, and verifies stdout and/or the stored snapshot.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Get the path to the built `tl` binary.
fn tl_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("tl");
    path
}

/// Run `tl` against the data directory, returning (stdout, stderr, success).
fn run_tl(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(tl_bin())
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .expect("failed to run tl");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `tl` expecting success, return stdout.
fn run_tl_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_tl(dir, args);
    if !success {
        panic!(
            "tl {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Add a task and return its id.
fn add(dir: &Path, args: &[&str]) -> String {
    let mut full = vec!["add"];
    full.extend_from_slice(args);
    run_tl_ok(dir, &full).trim().to_string()
}

fn stored(dir: &Path) -> serde_json::Value {
    let text = fs::read_to_string(dir.join("todos.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

// ---------------------------------------------------------------------------
// Write command tests
// ---------------------------------------------------------------------------

#[test]
fn test_add_persists_sanitized_text() {
    let tmp = tempfile::TempDir::new().unwrap();
    let id = add(tmp.path(), &["Fish", "&", "chips", "--priority", "high", "-c", "shopping"]);
    assert!(id.parse::<i64>().is_ok(), "id should be a millisecond timestamp: {}", id);

    let data = stored(tmp.path());
    let arr = data.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["id"], id.as_str());
    // `&` is not one of the escaped characters
    assert_eq!(arr[0]["text"], "Fish & chips");
    assert_eq!(arr[0]["completed"], false);
    assert_eq!(arr[0]["priority"], "high");
    assert_eq!(arr[0]["category"], "shopping");
    assert!(arr[0]["createdAt"].is_string());
}

#[test]
fn test_add_escapes_markup_characters() {
    let tmp = tempfile::TempDir::new().unwrap();
    add(tmp.path(), &["a/b <c>"]);
    add(tmp.path(), &["it's \"done\""]);

    let data = stored(tmp.path());
    assert_eq!(data[0]["text"], "a&#x2F;b &lt;c&gt;");
    assert_eq!(data[1]["text"], "it&#x27;s &quot;done&quot;");

    // Text output shows the characters as typed
    let out = run_tl_ok(tmp.path(), &["list"]);
    assert!(out.contains("a/b <c>"));
    assert!(out.contains("it's \"done\""));
}

#[test]
fn test_add_rejects_unsafe_text() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_tl(tmp.path(), &["add", "<script>alert(1)</script>"]);
    assert!(!success);
    assert!(stderr.contains("error:"));
    assert!(stderr.contains("unsafe"));
    assert!(!tmp.path().join("todos.json").exists());
}

#[test]
fn test_add_rejects_blank_text() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_tl(tmp.path(), &["add", "   "]);
    assert!(!success);
    assert!(stderr.contains("empty"));
}

#[test]
fn test_add_unknown_priority() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_tl(tmp.path(), &["add", "x", "--priority", "urgent"]);
    assert!(!success);
    assert!(stderr.contains("unknown priority 'urgent'"));
}

#[test]
fn test_config_defaults_apply() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.toml"),
        "[defaults]\npriority = \"low\"\ncategory = \"health\"\n",
    )
    .unwrap();
    add(tmp.path(), &["Stretch"]);
    let data = stored(tmp.path());
    assert_eq!(data[0]["priority"], "low");
    assert_eq!(data[0]["category"], "health");
}

#[test]
fn test_toggle_done_and_clear() {
    let tmp = tempfile::TempDir::new().unwrap();
    let a = add(tmp.path(), &["first"]);
    let b = add(tmp.path(), &["second"]);

    let out = run_tl_ok(tmp.path(), &["toggle", &a]);
    assert!(out.starts_with("[x]"));
    let out = run_tl_ok(tmp.path(), &["toggle", &a]);
    assert!(out.starts_with("[ ]"));

    run_tl_ok(tmp.path(), &["done", &b]);
    let (out, stderr, success) = run_tl(tmp.path(), &["done", &b]);
    assert!(success);
    assert!(out.starts_with("[x]"));
    assert!(stderr.contains("already completed"));

    let out = run_tl_ok(tmp.path(), &["clear"]);
    assert_eq!(out.trim(), "cleared 1 completed task");
    let data = stored(tmp.path());
    assert_eq!(data.as_array().unwrap().len(), 1);
    assert_eq!(data[0]["id"], a.as_str());
}

#[test]
fn test_edit_and_rm() {
    let tmp = tempfile::TempDir::new().unwrap();
    let id = add(tmp.path(), &["draft"]);

    let out = run_tl_ok(tmp.path(), &["edit", &id, "final", "<version>"]);
    assert!(out.contains("final <version>"));
    assert_eq!(stored(tmp.path())[0]["text"], "final &lt;version&gt;");

    let (_, stderr, success) = run_tl(tmp.path(), &["edit", &id, "onload=steal()"]);
    assert!(!success);
    assert!(stderr.contains("unsafe"));
    assert_eq!(stored(tmp.path())[0]["text"], "final &lt;version&gt;");

    let out = run_tl_ok(tmp.path(), &["rm", &id]);
    assert_eq!(out.trim(), format!("deleted {}", id));
    assert!(stored(tmp.path()).as_array().unwrap().is_empty());
}

#[test]
fn test_unknown_id_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_tl(tmp.path(), &["toggle", "42"]);
    assert!(!success);
    assert!(stderr.contains("task not found: 42"));
}

// ---------------------------------------------------------------------------
// Read command tests
// ---------------------------------------------------------------------------

#[test]
fn test_list_sorted_by_priority() {
    let tmp = tempfile::TempDir::new().unwrap();
    add(tmp.path(), &["low thing", "-p", "low"]);
    add(tmp.path(), &["high thing", "-p", "high"]);
    add(tmp.path(), &["medium thing"]);

    let out = run_tl_ok(tmp.path(), &["list"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("high thing"));
    assert!(lines[1].contains("medium thing"));
    assert!(lines[2].contains("low thing"));
}

#[test]
fn test_list_filters() {
    let tmp = tempfile::TempDir::new().unwrap();
    let a = add(tmp.path(), &["open"]);
    let b = add(tmp.path(), &["closed"]);
    run_tl_ok(tmp.path(), &["done", &b]);

    let out = run_tl_ok(tmp.path(), &["list", "--filter", "active"]);
    assert!(out.contains(&a));
    assert!(!out.contains(&b));

    let out = run_tl_ok(tmp.path(), &["list", "--filter", "completed"]);
    assert!(out.contains(&b));
    assert!(!out.contains(&a));

    let (_, stderr, success) = run_tl(tmp.path(), &["list", "--filter", "someday"]);
    assert!(!success);
    assert!(stderr.contains("unknown filter"));
}

#[test]
fn test_list_empty_message() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_tl_ok(tmp.path(), &["list", "--filter", "completed"]);
    assert_eq!(out.trim(), "No completed tasks");
}

#[test]
fn test_list_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    add(tmp.path(), &["<b>bold</b>"]);
    let out = run_tl_ok(tmp.path(), &["list", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let arr = parsed.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["text"], "&lt;b&gt;bold&lt;&#x2F;b&gt;");
    assert_eq!(arr[0]["priority"], "medium");
}

#[test]
fn test_board_json_counts() {
    let tmp = tempfile::TempDir::new().unwrap();
    add(tmp.path(), &["one"]);
    let b = add(tmp.path(), &["two"]);
    run_tl_ok(tmp.path(), &["toggle", &b]);

    let out = run_tl_ok(tmp.path(), &["--json", "board"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["all"]["count"], 2);
    assert_eq!(parsed["active"]["count"], 1);
    assert_eq!(parsed["completed"]["count"], 1);
    assert_eq!(parsed["completed"]["tasks"][0]["id"], b.as_str());
}

#[test]
fn test_board_text() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_tl_ok(tmp.path(), &["board"]);
    assert!(out.contains("== All (0) =="));
    assert!(out.contains("No todos yet"));
    assert!(out.contains("No active tasks"));
    assert!(out.contains("No completed tasks"));
}

#[test]
fn test_stats() {
    let tmp = tempfile::TempDir::new().unwrap();
    let a = add(tmp.path(), &["a"]);
    add(tmp.path(), &["b"]);
    add(tmp.path(), &["c"]);
    run_tl_ok(tmp.path(), &["done", &a]);

    let out = run_tl_ok(tmp.path(), &["stats"]);
    assert_eq!(out.trim(), "total 3  active 2  completed 1  progress 33%");

    let out = run_tl_ok(tmp.path(), &["stats", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["total"], 3);
    assert_eq!(parsed["completion_rate"], 33);
}

#[test]
fn test_export_html() {
    let tmp = tempfile::TempDir::new().unwrap();
    add(tmp.path(), &["<img src=x>"]);
    let page = tmp.path().join("board.html");
    run_tl_ok(tmp.path(), &["export", "--html", "-o", page.to_str().unwrap()]);

    let html = fs::read_to_string(&page).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("&lt;img src=x&gt;"));
    assert!(!html.contains("<img"));

    let (_, stderr, success) = run_tl(tmp.path(), &["export"]);
    assert!(!success);
    assert!(stderr.contains("--html"));
}

// ---------------------------------------------------------------------------
// Stored data tolerance
// ---------------------------------------------------------------------------

#[test]
fn test_legacy_records_load() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(
        tmp.path().join("todos.json"),
        r#"[{"id":"1700000000000","text":"legacy","completed":false,
             "createdAt":"2023-11-14T22:13:20.000Z","category":"work"}]"#,
    )
    .unwrap();

    let out = run_tl_ok(tmp.path(), &["list", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed[0]["priority"], "medium");
    assert_eq!(parsed[0]["category"], "work");
}

#[test]
fn test_corrupt_snapshot_is_kept_aside() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("todos.json"), "{oops").unwrap();

    let (out, stderr, success) = run_tl(tmp.path(), &["list"]);
    assert!(success);
    assert_eq!(out.trim(), "No todos yet");
    assert!(stderr.contains("warning: stored tasks were unreadable"));
    assert_eq!(
        fs::read_to_string(tmp.path().join("todos.corrupt.json")).unwrap(),
        "{oops"
    );

    // The next write replaces the broken snapshot
    add(tmp.path(), &["fresh start"]);
    assert_eq!(stored(tmp.path()).as_array().unwrap().len(), 1);
}

#[test]
fn test_dropped_records_warn() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(
        tmp.path().join("todos.json"),
        r#"[{"id":"1","text":"ok","createdAt":"2024-01-01T00:00:00Z"},
            {"id":"2","text":"bad","createdAt":"never"}]"#,
    )
    .unwrap();
    let (out, stderr, success) = run_tl(tmp.path(), &["list"]);
    assert!(success);
    assert!(out.contains("ok"));
    assert!(stderr.contains("skipped 1 unreadable task record"));
}

#[test]
fn test_invalid_config_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[ui]\nlayout = \"grid\"\n").unwrap();
    let (_, stderr, success) = run_tl(tmp.path(), &["list"]);
    assert!(!success);
    assert!(stderr.contains("config.toml"));
}

#[test]
fn test_log_file_written() {
    let tmp = tempfile::TempDir::new().unwrap();
    add(tmp.path(), &["logged"]);
    let logs: Vec<_> = fs::read_dir(tmp.path().join("logs"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(logs.iter().any(|name| name.starts_with("tally")));
}
