//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against the dev data directory
//! and verify outputs.

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "focusbank-cli", "--"])
        .args(args)
        .env("FOCUSBANK_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_help() {
    let (stdout, _stderr, code) = run_cli(&["--help"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Focusbank CLI"));
}

#[test]
fn test_config_show_is_json() {
    let (stdout, _stderr, code) = run_cli(&["config", "show"]);
    assert_eq!(code, 0);
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert!(value.get("work_duration").is_some());
}

#[test]
fn test_timer_status_reports_phase() {
    let (stdout, _stderr, code) = run_cli(&["timer", "status"]);
    assert_eq!(code, 0);
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert!(value.get("phase").is_some());
    assert!(value.get("bank_secs").is_some());
}

#[test]
fn test_task_add_and_list() {
    let (stdout, _stderr, code) = run_cli(&["task", "add", "e2e task", "--estimate", "2"]);
    assert_eq!(code, 0);
    let task: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(task["name"], "e2e task");

    let (stdout, _stderr, code) = run_cli(&["task", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("e2e task"));
}

#[test]
fn test_unknown_mode_fails() {
    let (_stdout, stderr, code) = run_cli(&["timer", "activate", "nap"]);
    assert!(code != 0);
    assert!(stderr.contains("unknown mode"));
}
