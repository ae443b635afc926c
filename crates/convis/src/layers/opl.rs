use std::fmt;

use ndarray::{Array3, ArrayView3};

use crate::config::OplConfig;
use crate::filters::{ExpCascade, GaussianBlur, Transient};

/// Outer plexiform layer: center minus weighted surround.
///
/// ```text
/// C = G(center_sigma) * T(undershoot) * E(center_tau, center_stages) * I
/// S = G(surround_sigma) * E(surround_tau) * C
/// out = amplification * (C - surround_weight * S)
/// ```
#[derive(Debug, Clone)]
pub struct OuterPlexiformLayer {
    config: OplConfig,
    center_lowpass: ExpCascade,
    undershoot: Transient,
    center_blur: GaussianBlur,
    surround_lowpass: ExpCascade,
    surround_blur: GaussianBlur,
}

impl OuterPlexiformLayer {
    pub fn new(config: &OplConfig, dt: f32) -> Self {
        Self {
            config: config.clone(),
            center_lowpass: ExpCascade::new(config.center_tau, config.center_stages, dt),
            undershoot: Transient::new(config.undershoot_weight, config.undershoot_tau, dt),
            center_blur: GaussianBlur::new(config.center_sigma),
            surround_lowpass: ExpCascade::new(config.surround_tau, 1, dt),
            surround_blur: GaussianBlur::new(config.surround_sigma),
        }
    }

    pub fn config(&self) -> &OplConfig {
        &self.config
    }

    pub fn forward(&mut self, input: ArrayView3<f32>) -> Array3<f32> {
        let center = self.center_lowpass.apply(input);
        let center = self.undershoot.apply(center.view());
        let center = self.center_blur.apply(center.view());

        let surround = self.surround_lowpass.apply(center.view());
        let surround = self.surround_blur.apply(surround.view());

        let (w, gain) = (self.config.surround_weight, self.config.amplification);
        (center - surround * w) * gain
    }

    pub fn reset(&mut self) {
        self.center_lowpass.reset();
        self.undershoot.reset();
        self.surround_lowpass.reset();
    }
}

impl fmt::Display for OuterPlexiformLayer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let c = &self.config;
        write!(
            f,
            "OuterPlexiformLayer(center_sigma={}, center_tau={}, center_stages={}, \
             undershoot_weight={}, undershoot_tau={}, surround_sigma={}, surround_tau={}, \
             surround_weight={}, amplification={})",
            c.center_sigma,
            c.center_tau,
            c.center_stages,
            c.undershoot_weight,
            c.undershoot_tau,
            c.surround_sigma,
            c.surround_tau,
            c.surround_weight,
            c.amplification
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_surround_cancels_sustained_light() {
        let mut opl = OuterPlexiformLayer::new(&OplConfig::default(), 0.001);
        let out = opl.forward(Array3::<f32>::ones((1500, 6, 6)).view());
        // onset response is positive, the sustained response vanishes
        let peak = out.iter().cloned().fold(f32::MIN, f32::max);
        assert!(peak > 0.1);
        assert!(out[[1499, 3, 3]].abs() < 1e-2);
    }

    #[test]
    fn without_surround_center_is_amplified() {
        let config = OplConfig {
            surround_weight: 0.0,
            undershoot_weight: 0.0,
            ..OplConfig::default()
        };
        let mut opl = OuterPlexiformLayer::new(&config, 0.001);
        let out = opl.forward(Array3::<f32>::ones((300, 4, 4)).view());
        assert!((out[[299, 2, 2]] - config.amplification).abs() < 1e-2);
    }
}
