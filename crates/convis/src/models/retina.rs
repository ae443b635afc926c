use std::fmt;

use ndarray::{Array3, ArrayView3};

use crate::config::RetinaConfig;
use crate::error::Result;
use crate::layers::{
    ContrastGainControl, GanglionInput, GanglionSpikes, OuterPlexiformLayer, Polarity,
};
use crate::models::{ModelOutput, VisionModel};
use crate::tensor::{check_frame_shape, validate_stimulus};

/// Internal signals of the last call, kept when `record_intermediates` is set.
#[derive(Debug, Clone)]
pub struct Intermediates {
    pub opl: Array3<f32>,
    pub bipolar: Array3<f32>,
    pub ganglion_input_on: Array3<f32>,
    pub ganglion_input_off: Array3<f32>,
}

/// Virtual Retina style model with On and Off spiking ganglion populations.
///
/// ```text
/// stimulus -> OPL -> contrast gain control -+-> ganglion input (On)  -> spikes (On)
///                                           +-> ganglion input (Off) -> spikes (Off)
/// ```
///
/// # Example
///
/// ```
/// use convis::{Retina, VisionModel};
/// use ndarray::Array3;
///
/// let mut retina = Retina::new();
/// let output = retina.forward(Array3::<f32>::ones((100, 20, 20)).view()).unwrap();
/// assert_eq!(output[0].shape(), &[1, 1, 100, 20, 20]);
/// ```
#[derive(Debug, Clone)]
pub struct Retina {
    config: RetinaConfig,
    opl: OuterPlexiformLayer,
    bipolar: ContrastGainControl,
    ganglion_input_on: GanglionInput,
    ganglion_input_off: GanglionInput,
    spikes_on: GanglionSpikes,
    spikes_off: GanglionSpikes,
    spatial_shape: Option<(usize, usize)>,
    frames_seen: usize,
    intermediates: Option<Intermediates>,
}

impl Retina {
    /// Build a retina with the default parameters.
    pub fn new() -> Self {
        Self::build(RetinaConfig::default())
    }

    pub fn with_config(config: RetinaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: RetinaConfig) -> Self {
        let dt = config.frame_duration;
        Self {
            opl: OuterPlexiformLayer::new(&config.opl, dt),
            bipolar: ContrastGainControl::new(&config.bipolar, dt),
            ganglion_input_on: GanglionInput::new(&config.ganglion_input, Polarity::On, dt),
            ganglion_input_off: GanglionInput::new(&config.ganglion_input, Polarity::Off, dt),
            spikes_on: GanglionSpikes::new(&config.spikes, Polarity::On, dt, config.seed),
            spikes_off: GanglionSpikes::new(&config.spikes, Polarity::Off, dt, config.seed),
            spatial_shape: None,
            frames_seen: 0,
            intermediates: None,
            config,
        }
    }

    pub fn config(&self) -> &RetinaConfig {
        &self.config
    }

    /// Frames processed since construction or the last reset.
    pub fn frames_seen(&self) -> usize {
        self.frames_seen
    }

    /// Simulated time in seconds since construction or the last reset.
    pub fn elapsed(&self) -> f32 {
        self.frames_seen as f32 * self.config.frame_duration
    }

    pub fn intermediates(&self) -> Option<&Intermediates> {
        self.intermediates.as_ref()
    }
}

impl Default for Retina {
    fn default() -> Self {
        Self::new()
    }
}

impl VisionModel for Retina {
    fn forward(&mut self, input: ArrayView3<f32>) -> Result<ModelOutput> {
        validate_stimulus(input)?;
        check_frame_shape(&mut self.spatial_shape, input)?;

        let opl = self.opl.forward(input);
        let bipolar = self.bipolar.forward(opl.view());
        let current_on = self.ganglion_input_on.forward(bipolar.view());
        let current_off = self.ganglion_input_off.forward(bipolar.view());
        let spikes_on = self.spikes_on.forward(current_on.view());
        let spikes_off = self.spikes_off.forward(current_off.view());

        self.frames_seen += input.dim().0;
        log::debug!(
            "Retina: {} frames ({} total), {} On / {} Off spikes",
            input.dim().0,
            self.frames_seen,
            spikes_on.sum(),
            spikes_off.sum()
        );

        self.intermediates = if self.config.record_intermediates {
            Some(Intermediates {
                opl,
                bipolar,
                ganglion_input_on: current_on,
                ganglion_input_off: current_off,
            })
        } else {
            None
        };

        ModelOutput::from_3d(spikes_on, spikes_off)
    }

    fn reset(&mut self) {
        self.opl.reset();
        self.bipolar.reset();
        self.ganglion_input_on.reset();
        self.ganglion_input_off.reset();
        self.spikes_on.reset();
        self.spikes_off.reset();
        self.spatial_shape = None;
        self.frames_seen = 0;
        self.intermediates = None;
    }

    fn name(&self) -> &str {
        "Retina"
    }
}

impl fmt::Display for Retina {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Retina(")?;
        writeln!(
            f,
            "  frame_duration={}s, seed={}, frames_seen={}",
            self.config.frame_duration, self.config.seed, self.frames_seen
        )?;
        writeln!(f, "  (opl): {}", self.opl)?;
        writeln!(f, "  (bipolar): {}", self.bipolar)?;
        writeln!(f, "  (ganglion_input_on): {}", self.ganglion_input_on)?;
        writeln!(f, "  (ganglion_input_off): {}", self.ganglion_input_off)?;
        writeln!(f, "  (ganglion_spikes_on): {}", self.spikes_on)?;
        writeln!(f, "  (ganglion_spikes_off): {}", self.spikes_off)?;
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvisError;

    #[test]
    fn display_lists_every_layer() {
        let text = Retina::new().to_string();
        for layer in ["opl", "bipolar", "ganglion_input_on", "ganglion_spikes_off"] {
            assert!(text.contains(layer), "missing {} in {}", layer, text);
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let mut config = RetinaConfig::default();
        config.frame_duration = -1.0;
        assert!(Retina::with_config(config).is_err());
    }

    #[test]
    fn spatial_shape_is_fixed_until_reset() {
        let mut retina = Retina::new();
        retina.forward(Array3::<f32>::ones((5, 4, 4)).view()).unwrap();
        let err = retina.forward(Array3::<f32>::ones((5, 3, 4)).view());
        assert!(matches!(err, Err(ConvisError::ShapeMismatch(_, _))));
        retina.reset();
        assert!(retina.forward(Array3::<f32>::ones((5, 3, 4)).view()).is_ok());
    }

    #[test]
    fn records_intermediates_on_request() {
        let config = RetinaConfig {
            record_intermediates: true,
            ..RetinaConfig::default()
        };
        let mut retina = Retina::with_config(config).unwrap();
        retina.forward(Array3::<f32>::ones((8, 3, 3)).view()).unwrap();
        let rec = retina.intermediates().unwrap();
        assert_eq!(rec.opl.dim(), (8, 3, 3));
        assert_eq!(rec.ganglion_input_off.dim(), (8, 3, 3));
        assert!(Retina::new().intermediates().is_none());
    }

    #[test]
    fn elapsed_tracks_frames() {
        let mut retina = Retina::new();
        retina.run(Array3::<f32>::zeros((30, 2, 2)).view(), 7).unwrap();
        assert_eq!(retina.frames_seen(), 30);
        assert!((retina.elapsed() - 0.03).abs() < 1e-6);
    }
}
