//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against an isolated data
//! directory and verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command against `data_dir` and return (stdout, stderr, code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "focusreel-cli", "--quiet", "--"])
        .args(args)
        .env("FOCUSREEL_DATA_DIR", data_dir)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_cli_success(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "CLI command failed: {args:?}\nstderr: {stderr}");
    stdout
}

#[test]
fn timer_status_reports_idle_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = run_cli_success(dir.path(), &["timer", "status"]);
    let snapshot: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(snapshot["type"], "StateSnapshot");
    assert_eq!(snapshot["state"], "idle");
    assert_eq!(snapshot["seconds_left"], 1800);
}

#[test]
fn timer_start_and_pause_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = run_cli_success(dir.path(), &["timer", "start"]);
    assert!(stdout.contains("SessionStarted"));

    let stdout = run_cli_success(dir.path(), &["timer", "pause"]);
    assert!(stdout.contains("SessionPaused"));

    // Pausing again is a no-op reported as a snapshot.
    let stdout = run_cli_success(dir.path(), &["timer", "pause"]);
    assert!(stdout.contains("StateSnapshot"));
}

#[test]
fn timer_duration_sets_and_re_bases() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = run_cli_success(dir.path(), &["timer", "duration", "15"]);
    assert!(stdout.contains("SessionReset"));

    let stdout = run_cli_success(dir.path(), &["timer", "duration"]);
    assert_eq!(stdout.trim(), "15");

    let stdout = run_cli_success(dir.path(), &["timer", "status"]);
    let snapshot: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(snapshot["seconds_left"], 900);
}

#[test]
fn timer_duration_rejects_zero() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["timer", "duration", "0"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Invalid focus duration"));
}

#[test]
fn goal_add_list_remove() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = run_cli_success(dir.path(), &["goal", "add", "Web", "web dev tutorial"]);
    let goal: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(goal["label"], "Web");
    let id = goal["id"].as_str().unwrap().to_string();

    let stdout = run_cli_success(dir.path(), &["goal", "list"]);
    let goals: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(goals.as_array().unwrap().len(), 1);

    run_cli_success(dir.path(), &["goal", "remove", &id]);
    let stdout = run_cli_success(dir.path(), &["goal", "list"]);
    let goals: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(goals.as_array().unwrap().is_empty());
}

#[test]
fn ended_session_accrues_and_gates_on_reflection() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = run_cli_success(dir.path(), &["goal", "add", "AI", "transformer internals"]);
    let goal: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let goal_id = goal["id"].as_str().unwrap().to_string();

    run_cli_success(
        dir.path(),
        &[
            "session", "begin", "--goal", &goal_id, "--video", "abc123", "--title",
            "Attention is all you need", "--channel", "AI Talks", "--duration", "18:02",
        ],
    );
    run_cli_success(dir.path(), &["player", "playing"]);
    let stdout = run_cli_success(dir.path(), &["player", "ended"]);
    assert!(stdout.contains("SessionCompleted"));

    // A short reflection is rejected with a nonzero exit.
    let (_, stderr, code) = run_cli(dir.path(), &["session", "reflect", "nice"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Reflection too short"));

    let stdout = run_cli_success(
        dir.path(),
        &[
            "session",
            "reflect",
            "positional encodings are just a clever hack",
        ],
    );
    assert!(stdout.contains("ReflectionSaved"));

    let stdout = run_cli_success(dir.path(), &["reflect", "list"]);
    let reflections: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(reflections.as_array().unwrap().len(), 1);
    assert_eq!(reflections[0]["video_id"], "abc123");

    let stdout = run_cli_success(dir.path(), &["reflect", "export", "abc123"]);
    assert!(stdout.contains("Title      : Attention is all you need"));
    assert!(stdout.contains("Reflection:"));
}

#[test]
fn config_get_and_set() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = run_cli_success(dir.path(), &["config", "get", "session.default_minutes"]);
    assert_eq!(stdout.trim(), "30");

    run_cli_success(dir.path(), &["config", "set", "player.seek_step_secs", "5"]);
    let stdout = run_cli_success(dir.path(), &["config", "get", "player.seek_step_secs"]);
    assert_eq!(stdout.trim(), "5");

    let (_, stderr, code) = run_cli(dir.path(), &["config", "get", "player.bogus"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown config key"));
}
