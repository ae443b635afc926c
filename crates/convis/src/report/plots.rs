use itertools_num::linspace;
use ndarray::{s, Array1, ArrayView1, ArrayView5, ArrayViewD, Axis, Ix1, Ix5};
use plotly::common::Mode;
use plotly::layout::{Axis as PlotAxis, GridPattern, Layout, LayoutGrid};
use plotly::{HeatMap, Plot, Scatter};

use crate::error::{ConvisError, Result};

/// Upper bound on the number of pixel traces drawn by [`plot_5d_time`].
pub const MAX_TRACES: usize = 400;

/// Columns of the frame grid drawn by [`plot_5d_matshow`].
const MATSHOW_COLUMNS: usize = 5;

/// Plot activity over time.
///
/// A five-dimensional `(batch, channel, time, height, width)` array gives one
/// line per pixel (averaged over batch and channel, at most [`MAX_TRACES`]
/// evenly sampled pixels). A one-dimensional array is drawn as a single line.
pub fn plot_5d_time(values: ArrayViewD<f32>, title: &str) -> Result<Plot> {
    let mut plot = Plot::new();
    match values.ndim() {
        1 => {
            let trace = values
                .into_dimensionality::<Ix1>()
                .map_err(|e| ConvisError::ShapeMismatch("1-d".to_string(), e.to_string()))?;
            plot.add_trace(line(trace, "mean").show_legend(false));
        }
        5 => {
            let values = values
                .into_dimensionality::<Ix5>()
                .map_err(|e| ConvisError::ShapeMismatch("5-d".to_string(), e.to_string()))?;
            let pixels = pixel_traces(values)?;
            let step = pixels.len().div_ceil(MAX_TRACES);
            for (i, (name, trace)) in pixels.iter().enumerate().step_by(step.max(1)) {
                log::trace!("plot_5d_time: trace {} ({})", i, name);
                plot.add_trace(line(trace.view(), name.as_str()).show_legend(false));
            }
        }
        n => {
            return Err(ConvisError::ShapeMismatch(
                "a 1-d or 5-d array".to_string(),
                format!("{}-d array", n),
            ))
        }
    }

    plot.set_layout(
        Layout::new()
            .title(title)
            .x_axis(PlotAxis::new().title("Frame"))
            .y_axis(PlotAxis::new().title("Activity")),
    );
    Ok(plot)
}

/// Plot several named traces in one figure with time in seconds on the x axis.
pub fn plot_traces(
    traces: &[(&str, ArrayView1<f32>)],
    title: &str,
    frame_duration: f32,
) -> Result<Plot> {
    if traces.is_empty() {
        return Err(ConvisError::EmptyInput);
    }

    let mut plot = Plot::new();
    for (name, trace) in traces {
        let n = trace.len();
        let end = n.saturating_sub(1) as f64 * frame_duration as f64;
        let time: Vec<f64> = linspace(0.0, end, n).collect();
        let y: Vec<f64> = trace.iter().map(|&v| v as f64).collect();
        plot.add_trace(Scatter::new(time, y).mode(Mode::Lines).name(*name));
    }

    plot.set_layout(
        Layout::new()
            .title(title)
            .x_axis(PlotAxis::new().title("Time (s)"))
            .y_axis(PlotAxis::new().title("Mean activity")),
    );
    Ok(plot)
}

/// Show every frame of a `(batch, channel, time, height, width)` array as a heat map.
///
/// Batch and channel are averaged; frames are laid out row by row.
pub fn plot_5d_matshow(values: ArrayView5<f32>, title: &str) -> Result<Plot> {
    let frames = values
        .mean_axis(Axis(0))
        .and_then(|v| v.mean_axis(Axis(0)))
        .ok_or(ConvisError::EmptyInput)?;
    let n_frames = frames.len_of(Axis(0));
    if n_frames == 0 {
        return Err(ConvisError::EmptyInput);
    }

    let columns = n_frames.min(MATSHOW_COLUMNS);
    let rows = n_frames.div_ceil(columns);

    let mut plot = Plot::new();
    for (i, frame) in frames.axis_iter(Axis(0)).enumerate() {
        let z: Vec<Vec<f64>> = frame
            .outer_iter()
            .map(|row| row.iter().map(|&v| v as f64).collect())
            .collect();
        let suffix = if i == 0 { String::new() } else { (i + 1).to_string() };
        let (name, x_ref, y_ref) = (
            format!("frame {}", i),
            format!("x{}", suffix),
            format!("y{}", suffix),
        );
        plot.add_trace(
            HeatMap::new_z(z)
                .name(name.as_str())
                .x_axis(x_ref.as_str())
                .y_axis(y_ref.as_str()),
        );
    }

    plot.set_layout(
        Layout::new().title(title).grid(
            LayoutGrid::new()
                .rows(rows)
                .columns(columns)
                .pattern(GridPattern::Independent),
        ),
    );
    Ok(plot)
}

fn line(trace: ArrayView1<f32>, name: &str) -> Box<Scatter<f64, f64>> {
    let x: Vec<f64> = (0..trace.len()).map(|t| t as f64).collect();
    let y: Vec<f64> = trace.iter().map(|&v| v as f64).collect();
    Scatter::new(x, y).mode(Mode::Lines).name(name)
}

/// Per-pixel time courses, averaged over batch and channel.
fn pixel_traces(values: ArrayView5<f32>) -> Result<Vec<(String, Array1<f32>)>> {
    let (_, _, n_frames, h, w) = values.dim();
    if n_frames == 0 || h * w == 0 {
        return Err(ConvisError::EmptyInput);
    }
    let merged = values
        .mean_axis(Axis(0))
        .and_then(|v| v.mean_axis(Axis(0)))
        .ok_or(ConvisError::EmptyInput)?;
    let mut traces = Vec::with_capacity(h * w);
    for y in 0..h {
        for x in 0..w {
            let trace = merged.slice(s![.., y, x]).to_owned();
            traces.push((format!("pixel ({}, {})", y, x), trace));
        }
    }
    Ok(traces)
}
