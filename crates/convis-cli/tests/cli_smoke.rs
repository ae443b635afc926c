//! CLI binary smoke tests using assert_cmd.
//!
//! These tests exercise the compiled `convis` binary to verify that
//! argument parsing, help text, and error handling work end-to-end.

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("convis").unwrap()
}

// ---------------------------------------------------------------------------
// Top-level
// ---------------------------------------------------------------------------

#[test]
fn no_args_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("demo"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("convis"));
}

#[test]
fn unknown_option_is_a_usage_error() {
    cmd().args(["demo", "--frobnicate"]).assert().code(2);
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn config_prints_default_retina_json() {
    cmd()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"model\": \"retina\""))
        .stdout(predicate::str::contains("\"frame_duration\""));
}

#[test]
fn config_prints_ln_json() {
    cmd()
        .args(["config", "--model", "ln"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"model\": \"ln\""));
}

// ---------------------------------------------------------------------------
// demo
// ---------------------------------------------------------------------------

#[test]
fn small_demo_writes_report_and_csv() {
    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("demo.html");
    let csv = dir.path().join("demo.csv");
    cmd()
        .args([
            "demo",
            "--frames",
            "10",
            "--run-frames",
            "60",
            "--dt",
            "20",
            "--stride",
            "10",
            "--size",
            "5",
        ])
        .arg("--output")
        .arg(&report)
        .arg("--csv")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Retina("));

    let html = std::fs::read_to_string(&report).unwrap();
    assert!(html.contains("On Cells (1 line = 1 pixel)"));
    assert!(html.contains("Mean Activity of On and Off Cells"));
    let rows = std::fs::read_to_string(&csv).unwrap();
    assert_eq!(rows.lines().count(), 61);
}

#[test]
fn demo_accepts_step_beyond_input_length() {
    cmd()
        .args([
            "demo",
            "--no-report",
            "--frames",
            "5",
            "--run-frames",
            "8",
            "--size",
            "2",
            "--dt",
            "18446744073709551615",
        ])
        .assert()
        .success();
}

#[test]
fn demo_nonexistent_config_errors() {
    cmd()
        .args(["demo", "--no-report", "--config", "/nonexistent/retina.json"])
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

#[test]
fn run_prints_summary() {
    cmd()
        .args([
            "run", "--stimulus", "bar", "--frames", "40", "--size", "6", "--model", "ln",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("LnModel\t40\t"));
}

#[test]
fn run_unknown_stimulus_is_rejected() {
    cmd()
        .args(["run", "--stimulus", "noise"])
        .assert()
        .code(2);
}

#[test]
fn run_config_model_mismatch_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ln.json");
    std::fs::write(&path, r#"{"model": "ln"}"#).unwrap();
    cmd()
        .args(["run", "--frames", "10", "--size", "3", "--model", "retina", "--config"])
        .arg(&path)
        .assert()
        .failure();
}
