//! Basic CLI E2E tests.
//!
//! Commands run via `cargo run` against an isolated data directory so the
//! tests never touch a real profile.

use std::path::Path;
use std::process::Command;

fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new("cargo")
        .args(["run", "-p", "studyloop-cli", "--quiet", "--"])
        .args(args)
        .env("STUDYLOOP_DATA_DIR", data_dir)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

#[test]
fn timer_status_reports_idle() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["timer", "status"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("\"idle\""), "expected idle state: {stdout}");
}

#[test]
fn start_tick_reset_save_round_trip() {
    let dir = tempfile::tempdir().unwrap();

    let (code, stdout, _) = run_cli(dir.path(), &["timer", "start"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("SessionStarted"), "got: {stdout}");

    // 125 focus seconds -> two whole minutes studied.
    let (code, stdout, _) = run_cli(dir.path(), &["timer", "tick", "--count", "125"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("PointsAwarded"), "got: {stdout}");

    let (code, stdout, _) = run_cli(dir.path(), &["timer", "reset"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("SavePromptRequested"), "got: {stdout}");

    let (code, stdout, _) = run_cli(dir.path(), &["timer", "save", "Algebra"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("SessionSaved"), "got: {stdout}");

    let (code, stdout, _) = run_cli(dir.path(), &["history", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Algebra"), "got: {stdout}");
    assert!(stdout.contains("2 min"), "got: {stdout}");
}

#[test]
fn sub_minute_reset_discards() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["timer", "start"]);
    run_cli(dir.path(), &["timer", "tick", "--count", "45"]);

    let (code, stdout, _) = run_cli(dir.path(), &["timer", "reset"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("SessionReset"), "got: {stdout}");

    let (code, stdout, _) = run_cli(dir.path(), &["history", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("no saved sessions"), "got: {stdout}");
}

#[test]
fn stats_track_awarded_points() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["timer", "start"]);
    run_cli(dir.path(), &["timer", "tick", "--count", "180"]);

    let (code, stdout, _) = run_cli(dir.path(), &["stats", "all"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("total points:        3"), "got: {stdout}");
}

#[test]
fn config_set_get_round_trip() {
    let dir = tempfile::tempdir().unwrap();

    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "modes.short_focus_min"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "25");

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "modes.short_focus_min", "30"]);
    assert_eq!(code, 0);

    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "modes.short_focus_min"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "30");

    let (code, _, stderr) = run_cli(dir.path(), &["config", "get", "ui.theme"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown key"), "got: {stderr}");
}

#[test]
fn pause_resume_exit_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["timer", "start"]);
    run_cli(dir.path(), &["timer", "tick", "--count", "5"]);

    let (code, stdout, _) = run_cli(dir.path(), &["timer", "pause"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("SessionPaused"), "got: {stdout}");

    let (code, stdout, _) = run_cli(dir.path(), &["timer", "resume"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("SessionResumed"), "got: {stdout}");
}
