use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{invalid, Result};
use crate::filters::MAX_KERNEL_RADIUS;

/// Outer plexiform layer: center/surround linear filtering.
///
/// Spatial extents are in pixels, time constants in seconds.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OplConfig {
    pub center_sigma: f32,
    pub center_tau: f32,
    pub center_stages: usize,
    pub undershoot_tau: f32,
    pub undershoot_weight: f32,
    pub surround_sigma: f32,
    pub surround_tau: f32,
    pub surround_weight: f32,
    pub amplification: f32,
}

impl Default for OplConfig {
    fn default() -> Self {
        Self {
            center_sigma: 0.9,
            center_tau: 0.01,
            center_stages: 1,
            undershoot_tau: 0.1,
            undershoot_weight: 0.8,
            surround_sigma: 2.35,
            surround_tau: 0.004,
            surround_weight: 1.0,
            amplification: 10.0,
        }
    }
}

/// Contrast gain control acting on the bipolar signal.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BipolarConfig {
    /// Inert leak conductance `g0` (Hz).
    pub inert_leak: f32,
    /// Feedback amplification `lambda` of the quadratic gain term.
    pub feedback_amplification: f32,
    pub adaptation_sigma: f32,
    pub adaptation_tau: f32,
}

impl Default for BipolarConfig {
    fn default() -> Self {
        Self {
            inert_leak: 50.0,
            feedback_amplification: 50.0,
            adaptation_sigma: 0.2,
            adaptation_tau: 0.005,
        }
    }
}

/// Transient filtering and static nonlinearity feeding the ganglion cells.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GanglionInputConfig {
    pub sigma: f32,
    pub transient_tau: f32,
    pub transient_weight: f32,
    pub amplification: f32,
    pub threshold: f32,
    pub value_at_threshold: f32,
}

impl Default for GanglionInputConfig {
    fn default() -> Self {
        Self {
            sigma: 0.0,
            transient_tau: 0.02,
            transient_weight: 0.75,
            amplification: 100.0,
            threshold: 0.0,
            value_at_threshold: 80.0,
        }
    }
}

/// Leaky integrate-and-fire spiking stage.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SpikeConfig {
    pub leak: f32,
    pub noise_sigma: f32,
    pub refractory_mean: f32,
    pub refractory_stdev: f32,
}

impl Default for SpikeConfig {
    fn default() -> Self {
        Self {
            leak: 50.0,
            noise_sigma: 0.0,
            refractory_mean: 0.005,
            refractory_stdev: 0.0,
        }
    }
}

/// Full parameter set of a [`crate::models::Retina`].
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RetinaConfig {
    /// Simulated seconds per input frame.
    pub frame_duration: f32,
    pub seed: u64,
    pub record_intermediates: bool,
    pub opl: OplConfig,
    pub bipolar: BipolarConfig,
    pub ganglion_input: GanglionInputConfig,
    pub spikes: SpikeConfig,
}

impl Default for RetinaConfig {
    fn default() -> Self {
        Self {
            frame_duration: 0.001,
            seed: 42,
            record_intermediates: false,
            opl: OplConfig::default(),
            bipolar: BipolarConfig::default(),
            ganglion_input: GanglionInputConfig::default(),
            spikes: SpikeConfig::default(),
        }
    }
}

impl RetinaConfig {
    /// Reject parameter combinations the simulation cannot handle.
    pub fn validate(&self) -> Result<()> {
        positive("frame_duration", self.frame_duration)?;

        let opl = &self.opl;
        blur_sigma("opl.center_sigma", opl.center_sigma)?;
        non_negative("opl.center_tau", opl.center_tau)?;
        non_negative("opl.undershoot_tau", opl.undershoot_tau)?;
        blur_sigma("opl.surround_sigma", opl.surround_sigma)?;
        non_negative("opl.surround_tau", opl.surround_tau)?;
        if opl.center_stages == 0 {
            return Err(invalid("opl.center_stages must be at least 1"));
        }

        let bip = &self.bipolar;
        positive("bipolar.inert_leak", bip.inert_leak)?;
        non_negative("bipolar.feedback_amplification", bip.feedback_amplification)?;
        blur_sigma("bipolar.adaptation_sigma", bip.adaptation_sigma)?;
        non_negative("bipolar.adaptation_tau", bip.adaptation_tau)?;

        let gang = &self.ganglion_input;
        blur_sigma("ganglion_input.sigma", gang.sigma)?;
        non_negative("ganglion_input.transient_tau", gang.transient_tau)?;
        non_negative("ganglion_input.amplification", gang.amplification)?;
        positive("ganglion_input.value_at_threshold", gang.value_at_threshold)?;

        let spikes = &self.spikes;
        non_negative("spikes.leak", spikes.leak)?;
        non_negative("spikes.noise_sigma", spikes.noise_sigma)?;
        non_negative("spikes.refractory_mean", spikes.refractory_mean)?;
        non_negative("spikes.refractory_stdev", spikes.refractory_stdev)?;
        Ok(())
    }
}

/// Parameters of the linear-nonlinear model.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LnConfig {
    pub frame_duration: f32,
    pub center_sigma: f32,
    pub surround_sigma: f32,
    pub surround_weight: f32,
    pub tau: f32,
    pub stages: usize,
    /// Output firing rate per unit of rectified drive (Hz).
    pub gain: f32,
}

impl Default for LnConfig {
    fn default() -> Self {
        Self {
            frame_duration: 0.001,
            center_sigma: 1.0,
            surround_sigma: 3.0,
            surround_weight: 0.9,
            tau: 0.02,
            stages: 3,
            gain: 100.0,
        }
    }
}

impl LnConfig {
    pub fn validate(&self) -> Result<()> {
        positive("frame_duration", self.frame_duration)?;
        blur_sigma("center_sigma", self.center_sigma)?;
        blur_sigma("surround_sigma", self.surround_sigma)?;
        non_negative("tau", self.tau)?;
        non_negative("gain", self.gain)?;
        if self.stages == 0 {
            return Err(invalid("stages must be at least 1"));
        }
        Ok(())
    }
}

/// Central configuration selecting a model and its parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "model", rename_all = "lowercase")]
pub enum ModelConfig {
    Retina(RetinaConfig),
    Ln(LnConfig),
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig::Retina(RetinaConfig::default())
    }
}

impl ModelConfig {
    pub fn name(&self) -> &'static str {
        match self {
            ModelConfig::Retina(_) => "retina",
            ModelConfig::Ln(_) => "ln",
        }
    }

    pub fn frame_duration(&self) -> f32 {
        match self {
            ModelConfig::Retina(c) => c.frame_duration,
            ModelConfig::Ln(c) => c.frame_duration,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            ModelConfig::Retina(c) => c.validate(),
            ModelConfig::Ln(c) => c.validate(),
        }
    }
}

impl FromStr for ModelConfig {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "retina" => Ok(ModelConfig::Retina(RetinaConfig::default())),
            "ln" => Ok(ModelConfig::Ln(LnConfig::default())),
            _ => Err(format!(
                "Unknown model type: {}. Expected one of: retina, ln",
                s
            )),
        }
    }
}

/// Load a model configuration from a JSON file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ModelConfig> {
    let content = std::fs::read_to_string(&path)?;
    let config: ModelConfig = serde_json::from_str(&content)?;
    config.validate()?;
    log::debug!(
        "Loaded {} config from {}",
        config.name(),
        path.as_ref().display()
    );
    Ok(config)
}

/// Write a model configuration as pretty JSON.
pub fn save_config<P: AsRef<Path>>(path: P, config: &ModelConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn positive(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{} must be positive, got {}", name, value)))
    }
}

/// Sigmas must keep the blur kernel within `MAX_KERNEL_RADIUS` pixels.
fn blur_sigma(name: &str, value: f32) -> Result<()> {
    non_negative(name, value)?;
    if (3.0 * value).ceil() > MAX_KERNEL_RADIUS as f32 {
        return Err(invalid(format!(
            "{} must be at most {}, got {}",
            name,
            MAX_KERNEL_RADIUS as f32 / 3.0,
            value
        )));
    }
    Ok(())
}

fn non_negative(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{} must be non-negative, got {}", name, value)))
    }
}
