use std::fmt;

use ndarray::{Array2, Array3, ArrayView3, Axis, Zip};

use crate::config::BipolarConfig;
use crate::filters::{ExpCascade, GainControl, GaussianBlur};

/// Contrast gain control of the bipolar signal.
///
/// The bipolar potential obeys `dV/dt = I - g_A V` where the conductance
/// `g_A = E(adaptation_tau) * G(adaptation_sigma) * (g0 + lambda V^2)` is fed
/// back from the potential itself. Each frame uses the exact solution of the
/// linear ODE for frozen `g_A`, which stays stable for any frame duration.
#[derive(Debug, Clone)]
pub struct ContrastGainControl {
    config: BipolarConfig,
    dt: f32,
    gain: GainControl,
    blur: GaussianBlur,
    adaptation: ExpCascade,
    potential: Option<Array2<f32>>,
}

impl ContrastGainControl {
    pub fn new(config: &BipolarConfig, dt: f32) -> Self {
        Self {
            config: config.clone(),
            dt,
            gain: GainControl::new(config.inert_leak, config.feedback_amplification),
            blur: GaussianBlur::new(config.adaptation_sigma),
            adaptation: ExpCascade::new(config.adaptation_tau, 1, dt)
                .with_resting(config.inert_leak),
            potential: None,
        }
    }

    pub fn config(&self) -> &BipolarConfig {
        &self.config
    }

    /// Current bipolar potential, if any frame has been processed.
    pub fn potential(&self) -> Option<&Array2<f32>> {
        self.potential.as_ref()
    }

    pub fn forward(&mut self, input: ArrayView3<f32>) -> Array3<f32> {
        let (_, h, w) = input.dim();
        let mut out = Array3::<f32>::zeros(input.raw_dim());
        let dt = self.dt;

        for (mut dst, current) in out.axis_iter_mut(Axis(0)).zip(input.axis_iter(Axis(0))) {
            let v = match self.potential.take() {
                Some(v) if v.dim() == (h, w) => v,
                _ => Array2::zeros((h, w)),
            };
            let conductance = self
                .adaptation
                .step(self.blur.apply_frame(self.gain.apply(&v).view()).view());

            let mut v = v;
            Zip::from(&mut v)
                .and(&current)
                .and(&conductance)
                .for_each(|v, &i, &g| {
                    let v_inf = i / g;
                    *v = v_inf + (*v - v_inf) * (-g * dt).exp();
                });
            dst.assign(&v);
            self.potential = Some(v);
        }
        out
    }

    pub fn reset(&mut self) {
        self.adaptation.reset();
        self.potential = None;
    }
}

impl fmt::Display for ContrastGainControl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let c = &self.config;
        write!(
            f,
            "ContrastGainControl(inert_leak={}, feedback_amplification={}, \
             adaptation_sigma={}, adaptation_tau={})",
            c.inert_leak, c.feedback_amplification, c.adaptation_sigma, c.adaptation_tau
        )
    }
}
