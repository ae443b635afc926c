use std::fmt;

use ndarray::ArrayView3;

use crate::config::LnConfig;
use crate::error::Result;
use crate::filters::{rectify, ExpCascade, GaussianBlur};
use crate::models::{ModelOutput, VisionModel};
use crate::tensor::{check_frame_shape, validate_stimulus};

/// Linear-nonlinear model: difference of Gaussians, temporal low-pass, rectification.
///
/// The On population reports the positive part of the linear drive, the Off
/// population the negative part, both as firing rates.
#[derive(Debug, Clone)]
pub struct LnModel {
    config: LnConfig,
    center: GaussianBlur,
    surround: GaussianBlur,
    lowpass: ExpCascade,
    spatial_shape: Option<(usize, usize)>,
}

impl LnModel {
    pub fn new() -> Self {
        Self::build(LnConfig::default())
    }

    pub fn with_config(config: LnConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: LnConfig) -> Self {
        Self {
            center: GaussianBlur::new(config.center_sigma),
            surround: GaussianBlur::new(config.surround_sigma),
            lowpass: ExpCascade::new(config.tau, config.stages, config.frame_duration),
            spatial_shape: None,
            config,
        }
    }

    pub fn config(&self) -> &LnConfig {
        &self.config
    }
}

impl Default for LnModel {
    fn default() -> Self {
        Self::new()
    }
}

impl VisionModel for LnModel {
    fn forward(&mut self, input: ArrayView3<f32>) -> Result<ModelOutput> {
        validate_stimulus(input)?;
        check_frame_shape(&mut self.spatial_shape, input)?;
        let center = self.center.apply(input);
        let surround = self.surround.apply(input);
        let drive = self
            .lowpass
            .apply((center - surround * self.config.surround_weight).view());

        let gain = self.config.gain;
        let on = drive.mapv(|v| gain * rectify(v));
        let off = drive.mapv(|v| gain * rectify(-v));
        ModelOutput::from_3d(on, off)
    }

    fn reset(&mut self) {
        self.lowpass.reset();
        self.spatial_shape = None;
    }

    fn name(&self) -> &str {
        "LnModel"
    }
}

impl fmt::Display for LnModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let c = &self.config;
        write!(
            f,
            "LnModel(center_sigma={}, surround_sigma={}, surround_weight={}, tau={}, \
             stages={}, gain={}, frame_duration={}s)",
            c.center_sigma,
            c.surround_sigma,
            c.surround_weight,
            c.tau,
            c.stages,
            c.gain,
            c.frame_duration
        )
    }
}
