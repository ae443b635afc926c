//! The retina demonstration: build a default retina, call it directly, run it
//! in steps and plot what the On and Off cells did.
use std::path::PathBuf;

use anyhow::{Context, Result};
use convis::config::ModelConfig;
use convis::report::{plot_5d_matshow, plot_5d_time, plot_traces, Report, ReportSection};
use convis::stimuli;
use convis::tensor::{every_nth_frame, mean_over_time_axis};
use convis::{ModelOutput, Retina, VisionModel};
use maud::html;

use crate::util::{ordinal, resolve_model_config, save_mean_activity_csv, save_report};

#[derive(Debug, Clone)]
pub struct DemoOptions {
    /// Frames of the direct call.
    pub frames: usize,
    /// Frames of the stepped run.
    pub run_frames: usize,
    /// Frames per step of the stepped run.
    pub dt: usize,
    /// Frame stride of the activity snapshot figure.
    pub stride: usize,
    /// Height and width of the stimulus.
    pub size: usize,
    pub config: Option<PathBuf>,
    /// Report destination; `None` skips the report.
    pub output: Option<PathBuf>,
    pub csv: Option<PathBuf>,
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self {
            frames: 100,
            run_frames: 2000,
            dt: 100,
            stride: 50,
            size: 20,
            config: None,
            output: Some(PathBuf::from("convis_demo_report.html")),
            csv: None,
        }
    }
}

/// Spike counts of the stepped run.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoSummary {
    pub frames: usize,
    pub on_spikes: f32,
    pub off_spikes: f32,
}

pub fn run_demo(options: &DemoOptions) -> Result<DemoSummary> {
    let mut retina = match options.config.as_ref() {
        Some(path) => match resolve_model_config(Some(path), Some("retina"))? {
            ModelConfig::Retina(config) => Retina::with_config(config)?,
            ModelConfig::Ln(_) => anyhow::bail!("The demo needs a retina configuration"),
        },
        None => Retina::new(),
    };
    println!("{}", retina);

    let size = options.size;
    let output = retina
        .forward(stimuli::ones(options.frames, size, size).view())
        .context("Direct call failed")?;
    log::info!(
        "Direct call: {} populations of shape {:?}",
        output.len(),
        output[0].shape()
    );

    let output = retina
        .run(stimuli::ones(options.run_frames, size, size).view(), options.dt)
        .context("Stepped run failed")?;
    log::info!(
        "Stepped run: {} populations of shape {:?}",
        output.len(),
        output[0].shape()
    );

    let frame_duration = retina.config().frame_duration;
    if let Some(path) = options.output.as_ref() {
        let report = build_report(&output, options.stride, frame_duration)?;
        save_report(&report, path)?;
    }
    if let Some(path) = options.csv.as_ref() {
        save_mean_activity_csv(&output, frame_duration, path)?;
    }

    Ok(DemoSummary {
        frames: output.n_frames(),
        on_spikes: output[0].sum(),
        off_spikes: output[1].sum(),
    })
}

fn build_report(output: &ModelOutput, stride: usize, frame_duration: f32) -> Result<Report> {
    let mut report = Report::new("convis", env!("CARGO_PKG_VERSION"), "Retina demo");

    let title = "On Cells (1 line = 1 pixel)";
    let mut section = ReportSection::new(title);
    section.add_plot(plot_5d_time(output[0].view().into_dyn(), title)?);
    report.add_section(section);

    let title = format!("Every {} frame of activity", ordinal(stride));
    let mut section = ReportSection::new(&title);
    let frames = every_nth_frame(output[0].view(), stride)?;
    section.add_plot(plot_5d_matshow(frames, &title)?);
    report.add_section(section);

    // axis 2 is time, everything else is averaged
    let on = mean_over_time_axis(output[0].view())?;
    let off = mean_over_time_axis(output[1].view())?;
    let title = "Mean Activity of On and Off Cells";
    let mut section = ReportSection::new(title);
    section.add_content(html! {
        p { "Spikes per frame averaged over all pixels." }
        p { "On: " (format!("{:.4}", on.mean().unwrap_or(0.0))) ", Off: " (format!("{:.4}", off.mean().unwrap_or(0.0))) }
    });
    section.add_plot(plot_traces(
        &[("On", on.view()), ("Off", off.view())],
        title,
        frame_duration,
    )?);
    report.add_section(section);

    Ok(report)
}
