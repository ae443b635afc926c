//! Integration tests for configuration files and CSV export.

use convis::config::{load_config, save_config, ModelConfig, RetinaConfig};
use convis::io::write_traces_csv;
use convis::{Retina, VisionModel};
use convis::stimuli;

#[test]
fn config_round_trips_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("retina.json");

    let mut retina = RetinaConfig::default();
    retina.seed = 1234;
    retina.opl.center_sigma = 1.5;
    let config = ModelConfig::Retina(retina);
    save_config(&path, &config).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"model\": \"retina\""));
    assert_eq!(load_config(&path).unwrap(), config);
}

#[test]
fn load_config_rejects_invalid_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{"model": "retina", "frame_duration": 0.0}"#).unwrap();
    assert!(load_config(&path).is_err());
}

#[test]
fn load_config_reports_missing_file() {
    assert!(load_config("/nonexistent/convis.json").is_err());
}

#[test]
fn load_config_rejects_unknown_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cnn.json");
    std::fs::write(&path, r#"{"model": "cnn"}"#).unwrap();
    assert!(load_config(&path).is_err());
}

#[test]
fn mean_activity_exports_to_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mean.csv");

    let mut retina = Retina::new();
    let output = retina.forward(stimuli::ones(50, 4, 4).view()).unwrap();
    let (on, off) = output.mean_activity().unwrap();
    write_traces_csv(&path, 0.001, &[("on", on.view()), ("off", off.view())]).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("time,on,off"));
    assert_eq!(lines.count(), 50);
}
