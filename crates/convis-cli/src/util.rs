use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use convis::config::{load_config, ModelConfig};
use convis::io::write_traces_csv;
use convis::report::Report;
use convis::ModelOutput;

/// Resolve the model configuration from an optional file and an optional model name.
///
/// Without a file the defaults of the named model (or of the retina) are used.
/// With both, the file must describe the named model.
pub fn resolve_model_config(config: Option<&PathBuf>, model: Option<&str>) -> Result<ModelConfig> {
    match (config, model) {
        (Some(path), model) => {
            let loaded = load_config(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?;
            if let Some(name) = model {
                if !loaded.name().eq_ignore_ascii_case(name) {
                    anyhow::bail!(
                        "Config {} describes a {} model, but --model {} was requested",
                        path.display(),
                        loaded.name(),
                        name
                    );
                }
            }
            Ok(loaded)
        }
        (None, Some(name)) => ModelConfig::from_str(name).map_err(anyhow::Error::msg),
        (None, None) => Ok(ModelConfig::default()),
    }
}

/// Pretty JSON of the default configuration for `model`.
pub fn default_config_json(model: &str) -> Result<String> {
    let config = ModelConfig::from_str(model).map_err(anyhow::Error::msg)?;
    Ok(serde_json::to_string_pretty(&config)?)
}

pub fn save_report(report: &Report, path: &Path) -> Result<()> {
    report
        .save_to_file(path)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(())
}

/// Export the mean On and Off activity per frame.
pub fn save_mean_activity_csv(output: &ModelOutput, frame_duration: f32, path: &Path) -> Result<()> {
    let (on, off) = output.mean_activity()?;
    write_traces_csv(path, frame_duration, &[("on", on.view()), ("off", off.view())])
        .with_context(|| format!("Failed to write CSV: {}", path.display()))?;
    Ok(())
}

/// English ordinal of `n`, e.g. 1st, 2nd, 3rd, 11th, 22nd.
pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}
