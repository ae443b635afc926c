use std::fmt;
use std::str::FromStr;

use ndarray::{s, Array3, ArrayView3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::distribution::Normal;

use crate::config::{GanglionInputConfig, SpikeConfig};
use crate::filters::{GanglionNonlinearity, GaussianBlur, Transient};

/// Sign of the bipolar signal a ganglion population responds to.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    On,
    Off,
}

impl Polarity {
    pub fn sign(&self) -> f32 {
        match self {
            Polarity::On => 1.0,
            Polarity::Off => -1.0,
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Polarity::On => write!(f, "On"),
            Polarity::Off => write!(f, "Off"),
        }
    }
}

impl FromStr for Polarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "on" => Ok(Polarity::On),
            "off" => Ok(Polarity::Off),
            _ => Err(format!("Unknown polarity: {}. Expected 'on' or 'off'", s)),
        }
    }
}

/// Input current of a ganglion population: `G(sigma) * N(sign * T(V_bip))`.
#[derive(Debug, Clone)]
pub struct GanglionInput {
    polarity: Polarity,
    config: GanglionInputConfig,
    transient: Transient,
    nonlinearity: GanglionNonlinearity,
    blur: GaussianBlur,
}

impl GanglionInput {
    pub fn new(config: &GanglionInputConfig, polarity: Polarity, dt: f32) -> Self {
        Self {
            polarity,
            config: config.clone(),
            transient: Transient::new(config.transient_weight, config.transient_tau, dt),
            nonlinearity: GanglionNonlinearity::new(
                config.amplification,
                config.threshold,
                config.value_at_threshold,
            ),
            blur: GaussianBlur::new(config.sigma),
        }
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn forward(&mut self, bipolar: ArrayView3<f32>) -> Array3<f32> {
        let signed = bipolar.mapv(|v| v * self.polarity.sign());
        let transient = self.transient.apply(signed.view());
        let current = self.nonlinearity.apply(&transient);
        self.blur.apply(current.view())
    }

    pub fn reset(&mut self) {
        self.transient.reset();
    }
}

impl fmt::Display for GanglionInput {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let c = &self.config;
        write!(
            f,
            "GanglionInput(polarity={}, sigma={}, transient_tau={}, transient_weight={}, \
             amplification={}, threshold={}, value_at_threshold={})",
            self.polarity,
            c.sigma,
            c.transient_tau,
            c.transient_weight,
            c.amplification,
            c.threshold,
            c.value_at_threshold
        )
    }
}

/// Membrane threshold of the integrate-and-fire cells.
const SPIKE_THRESHOLD: f32 = 1.0;

#[derive(Debug, Clone)]
struct Cell {
    potential: f32,
    refractory_steps: u32,
    rng: StdRng,
}

#[derive(Debug, Clone, Copy)]
struct LifParams {
    dt: f32,
    leak: f32,
    noise_sigma: f32,
    refractory_mean: f32,
    refractory_stdev: f32,
}

impl Cell {
    fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let potential = rng.gen::<f32>();
        Self {
            potential,
            refractory_steps: 0,
            rng,
        }
    }

    /// Integrate one frame of input current, returning 1.0 on a spike.
    fn step(&mut self, current: f32, p: &LifParams, normal: &Normal) -> f32 {
        if self.refractory_steps > 0 {
            self.refractory_steps -= 1;
            return 0.0;
        }

        let mut dv = p.dt * (current - p.leak * self.potential);
        if p.noise_sigma > 0.0 {
            let xi = self.rng.sample(normal) as f32;
            dv += p.noise_sigma * p.dt.sqrt() * xi;
        }
        self.potential += dv;

        if self.potential < SPIKE_THRESHOLD {
            return 0.0;
        }
        self.potential = 0.0;
        let mut refractory = p.refractory_mean;
        if p.refractory_stdev > 0.0 {
            refractory += p.refractory_stdev * self.rng.sample(normal) as f32;
        }
        self.refractory_steps = (refractory.max(0.0) / p.dt).round() as u32;
        1.0
    }
}

/// Leaky integrate-and-fire population, one cell per pixel.
///
/// Every cell owns a random generator seeded from the population seed, its
/// polarity and its index, so spike trains do not depend on how the stimulus
/// is chunked or on how rayon schedules the cells.
#[derive(Debug, Clone)]
pub struct GanglionSpikes {
    config: SpikeConfig,
    polarity: Polarity,
    dt: f32,
    seed: u64,
    normal: Normal,
    cells: Vec<Cell>,
    shape: (usize, usize),
}

impl GanglionSpikes {
    pub fn new(config: &SpikeConfig, polarity: Polarity, dt: f32, seed: u64) -> Self {
        Self {
            config: config.clone(),
            polarity,
            dt,
            seed,
            // zero mean and unit deviation are always accepted
            normal: Normal::new(0.0, 1.0).expect("standard normal"),
            cells: Vec::new(),
            shape: (0, 0),
        }
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    fn cell_seed(&self, index: usize) -> u64 {
        let offset = match self.polarity {
            Polarity::On => 0x9E37_79B9_7F4A_7C15,
            Polarity::Off => 0xC2B2_AE3D_27D4_EB4F,
        };
        self.seed
            .wrapping_mul(0x2545_F491_4F6C_DD1D)
            .wrapping_add(offset)
            .wrapping_add(index as u64)
    }

    /// Membrane potentials in row-major pixel order.
    pub fn potentials(&self) -> Vec<f32> {
        self.cells.iter().map(|c| c.potential).collect()
    }

    pub fn forward(&mut self, current: ArrayView3<f32>) -> Array3<f32> {
        let (_, h, w) = current.dim();
        if self.shape != (h, w) || self.cells.len() != h * w {
            self.cells = (0..h * w).map(|i| Cell::new(self.cell_seed(i))).collect();
            self.shape = (h, w);
        }

        let params = LifParams {
            dt: self.dt,
            leak: self.config.leak,
            noise_sigma: self.config.noise_sigma,
            refractory_mean: self.config.refractory_mean,
            refractory_stdev: self.config.refractory_stdev,
        };
        let normal = &self.normal;

        let trains: Vec<Vec<f32>> = self
            .cells
            .par_iter_mut()
            .enumerate()
            .map(|(idx, cell)| {
                current
                    .slice(s![.., idx / w, idx % w])
                    .iter()
                    .map(|&i| cell.step(i, &params, normal))
                    .collect()
            })
            .collect();

        let mut out = Array3::<f32>::zeros(current.raw_dim());
        for (idx, train) in trains.iter().enumerate() {
            for (t, &spike) in train.iter().enumerate() {
                out[[t, idx / w, idx % w]] = spike;
            }
        }
        let n_spikes = out.sum();
        log::trace!(
            "{} ganglion cells fired {} spikes over {} frames",
            self.polarity,
            n_spikes,
            current.dim().0
        );
        out
    }

    pub fn reset(&mut self) {
        self.cells.clear();
        self.shape = (0, 0);
    }
}

impl fmt::Display for GanglionSpikes {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let c = &self.config;
        write!(
            f,
            "GanglionSpikes(polarity={}, leak={}, noise_sigma={}, refractory_mean={}, \
             refractory_stdev={}, threshold={})",
            self.polarity,
            c.leak,
            c.noise_sigma,
            c.refractory_mean,
            c.refractory_stdev,
            SPIKE_THRESHOLD
        )
    }
}
