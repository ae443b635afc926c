//! Synthetic `(time, height, width)` stimuli with values in `[0, 1]`.
use std::f32::consts::PI;
use std::str::FromStr;

use ndarray::Array3;

use crate::error::{invalid, Result};

/// Constant full-field light.
pub fn ones(frames: usize, height: usize, width: usize) -> Array3<f32> {
    Array3::ones((frames, height, width))
}

/// Constant full-field stimulus at `value`, clamped to `[0, 1]`.
pub fn full(frames: usize, height: usize, width: usize, value: f32) -> Array3<f32> {
    Array3::from_elem((frames, height, width), value.clamp(0.0, 1.0))
}

/// Centered square of `size` pixels switching on and off every `period / 2` frames.
pub fn flashing_square(
    frames: usize,
    height: usize,
    width: usize,
    size: usize,
    period: usize,
) -> Result<Array3<f32>> {
    if period < 2 {
        return Err(invalid("flash period must be at least 2 frames"));
    }
    let size = size.min(height).min(width);
    let (y0, x0) = ((height - size) / 2, (width - size) / 2);
    Ok(Array3::from_shape_fn((frames, height, width), |(t, y, x)| {
        let lit = (t % period) < period / 2;
        let inside = (y0..y0 + size).contains(&y) && (x0..x0 + size).contains(&x);
        if lit && inside {
            1.0
        } else {
            0.0
        }
    }))
}

/// Vertical bright bar of `bar_width` pixels moving right at `speed` pixels per frame.
///
/// The bar wraps around at the right border.
pub fn moving_bar(
    frames: usize,
    height: usize,
    width: usize,
    bar_width: usize,
    speed: f32,
) -> Result<Array3<f32>> {
    if width == 0 || bar_width == 0 {
        return Err(invalid("bar and frame width must be positive"));
    }
    let w = width as f32;
    Ok(Array3::from_shape_fn((frames, height, width), |(t, _, x)| {
        let left = (t as f32 * speed).rem_euclid(w);
        let offset = (x as f32 - left).rem_euclid(w);
        if offset < bar_width as f32 {
            1.0
        } else {
            0.0
        }
    }))
}

/// Sinusoidal grating drifting along the horizontal axis.
///
/// Periods are given in pixels and frames respectively.
pub fn moving_grating(
    frames: usize,
    height: usize,
    width: usize,
    spatial_period: f32,
    temporal_period: f32,
) -> Result<Array3<f32>> {
    if !(spatial_period > 0.0) || !(temporal_period > 0.0) {
        return Err(invalid("grating periods must be positive"));
    }
    Ok(Array3::from_shape_fn((frames, height, width), |(t, _, x)| {
        let phase = 2.0 * PI * (x as f32 / spatial_period - t as f32 / temporal_period);
        0.5 + 0.5 * phase.sin()
    }))
}

/// Named stimulus families used by the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StimulusKind {
    Ones,
    Flash,
    Bar,
    Grating,
}

impl StimulusKind {
    /// Generate a stimulus of this kind with sensible proportions for the frame size.
    pub fn generate(&self, frames: usize, height: usize, width: usize) -> Result<Array3<f32>> {
        match self {
            StimulusKind::Ones => Ok(ones(frames, height, width)),
            StimulusKind::Flash => flashing_square(frames, height, width, (width / 2).max(1), 200),
            StimulusKind::Bar => moving_bar(frames, height, width, (width / 5).max(1), 0.05),
            StimulusKind::Grating => {
                moving_grating(frames, height, width, (width as f32 / 2.0).max(2.0), 250.0)
            }
        }
    }
}

impl FromStr for StimulusKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ones" => Ok(StimulusKind::Ones),
            "flash" => Ok(StimulusKind::Flash),
            "bar" => Ok(StimulusKind::Bar),
            "grating" => Ok(StimulusKind::Grating),
            _ => Err(format!(
                "Unknown stimulus: {}. Expected one of: ones, flash, bar, grating",
                s
            )),
        }
    }
}
