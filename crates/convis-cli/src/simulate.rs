//! `convis run`: drive any model with a synthetic stimulus.
use std::path::PathBuf;

use anyhow::{Context, Result};
use convis::models::factory::build_model;
use convis::report::{plot_5d_matshow, plot_traces, Report, ReportSection};
use convis::stimuli::StimulusKind;
use convis::tensor::{every_nth_frame, to_5d};

use crate::util::{ordinal, resolve_model_config, save_mean_activity_csv, save_report};

/// Stimulus frames shown in the report.
const STIMULUS_SNAPSHOTS: usize = 10;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub stimulus: StimulusKind,
    pub frames: usize,
    pub size: usize,
    pub dt: usize,
    pub model: Option<String>,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub csv: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            stimulus: StimulusKind::Flash,
            frames: 1000,
            size: 20,
            dt: 100,
            model: None,
            config: None,
            output: None,
            csv: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub model: String,
    pub frames: usize,
    pub mean_on: f32,
    pub mean_off: f32,
}

pub fn run_simulation(options: &RunOptions) -> Result<RunSummary> {
    let config = resolve_model_config(options.config.as_ref(), options.model.as_deref())?;
    let frame_duration = config.frame_duration();
    let mut model = build_model(config)?;
    log::info!("{}", model);

    let stimulus = options
        .stimulus
        .generate(options.frames, options.size, options.size)
        .context("Failed to generate stimulus")?;
    let output = model
        .run(stimulus.view(), options.dt)
        .with_context(|| format!("{} failed on {:?} stimulus", model.name(), options.stimulus))?;

    let (on, off) = output.mean_activity()?;
    let summary = RunSummary {
        model: model.name().to_string(),
        frames: output.n_frames(),
        mean_on: on.mean().unwrap_or(0.0),
        mean_off: off.mean().unwrap_or(0.0),
    };
    log::info!(
        "{}: {} frames, mean On activity {:.4}, mean Off activity {:.4}",
        summary.model,
        summary.frames,
        summary.mean_on,
        summary.mean_off
    );

    if let Some(path) = options.output.as_ref() {
        let mut report = Report::new(
            "convis",
            env!("CARGO_PKG_VERSION"),
            &format!("{} on {:?} stimulus", summary.model, options.stimulus),
        );

        let stride = (options.frames / STIMULUS_SNAPSHOTS).max(1);
        let stimulus_5d = to_5d(stimulus);
        let mut section = ReportSection::new("Stimulus");
        section.add_plot(plot_5d_matshow(
            every_nth_frame(stimulus_5d.view(), stride)?,
            &format!("Every {} stimulus frame", ordinal(stride)),
        )?);
        report.add_section(section);

        let mut section = ReportSection::new("Mean Activity of On and Off Cells");
        section.add_plot(plot_traces(
            &[("On", on.view()), ("Off", off.view())],
            "Mean Activity of On and Off Cells",
            frame_duration,
        )?);
        report.add_section(section);

        save_report(&report, path)?;
    }
    if let Some(path) = options.csv.as_ref() {
        save_mean_activity_csv(&output, frame_duration, path)?;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ln_model_responds_to_a_grating() {
        let options = RunOptions {
            stimulus: StimulusKind::Grating,
            frames: 60,
            size: 8,
            dt: 25,
            model: Some("ln".to_string()),
            ..RunOptions::default()
        };
        let summary = run_simulation(&options).unwrap();
        assert_eq!(summary.model, "LnModel");
        assert_eq!(summary.frames, 60);
        assert!(summary.mean_on > 0.0);
    }
}
