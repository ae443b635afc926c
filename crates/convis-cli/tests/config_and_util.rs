//! Integration tests for CLI config resolution and the output helpers.

use std::path::PathBuf;

use convis::config::{save_config, LnConfig, ModelConfig};
use convis::stimuli::StimulusKind;
use convis_cli::demo::{run_demo, DemoOptions};
use convis_cli::simulate::{run_simulation, RunOptions};
use convis_cli::util::{default_config_json, resolve_model_config};

// ---------------------------------------------------------------------------
// resolve_model_config
// ---------------------------------------------------------------------------

#[test]
fn config_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ln.json");
    let ln = LnConfig {
        gain: 5.0,
        ..LnConfig::default()
    };
    save_config(&path, &ModelConfig::Ln(ln.clone())).unwrap();

    let resolved = resolve_model_config(Some(&path), None).unwrap();
    assert_eq!(resolved, ModelConfig::Ln(ln));
    assert!(resolve_model_config(Some(&path), Some("ln")).is_ok());
    assert!(resolve_model_config(Some(&path), Some("retina")).is_err());
}

#[test]
fn missing_config_file_errors() {
    let path = PathBuf::from("/nonexistent/convis.json");
    let err = resolve_model_config(Some(&path), None).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to load config"));
}

#[test]
fn default_config_json_round_trips() {
    let json = default_config_json("retina").unwrap();
    let parsed: ModelConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, ModelConfig::default());
    assert!(default_config_json("cnn").is_err());
}

// ---------------------------------------------------------------------------
// demo and run drivers
// ---------------------------------------------------------------------------

#[test]
fn demo_writes_report() {
    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("report.html");
    let options = DemoOptions {
        frames: 10,
        run_frames: 30,
        dt: 7,
        stride: 5,
        size: 4,
        output: Some(report.clone()),
        ..DemoOptions::default()
    };
    let summary = run_demo(&options).unwrap();
    assert_eq!(summary.frames, 30);
    assert!(std::fs::read_to_string(&report)
        .unwrap()
        .contains("Every 5th frame of activity"));
}

#[test]
fn demo_rejects_ln_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ln.json");
    save_config(&path, &ModelConfig::Ln(LnConfig::default())).unwrap();
    let options = DemoOptions {
        config: Some(path),
        output: None,
        ..DemoOptions::default()
    };
    assert!(run_demo(&options).is_err());
}

#[test]
fn run_writes_report_and_csv() {
    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("run.html");
    let csv = dir.path().join("run.csv");
    let options = RunOptions {
        stimulus: StimulusKind::Flash,
        frames: 50,
        size: 6,
        dt: 20,
        output: Some(report.clone()),
        csv: Some(csv.clone()),
        ..RunOptions::default()
    };
    let summary = run_simulation(&options).unwrap();
    assert_eq!(summary.model, "Retina");
    assert!(report.exists());
    let text = std::fs::read_to_string(&csv).unwrap();
    assert!(text.starts_with("time,on,off"));
    assert_eq!(text.lines().count(), 51);
}

#[test]
fn run_rejects_zero_step() {
    let options = RunOptions {
        frames: 10,
        size: 3,
        dt: 0,
        ..RunOptions::default()
    };
    assert!(run_simulation(&options).is_err());
}
