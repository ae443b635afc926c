use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis, Zip};

/// Cascade of first-order exponential low-pass stages.
///
/// Each stage computes `y[t] = a * y[t-1] + (1 - a) * x[t]` with
/// `a = exp(-dt / tau)`, so the cascade has unit gain for constant input.
/// A non-positive `tau` turns every stage into the identity. State is kept
/// between calls and lazily sized to the first frame seen.
#[derive(Debug, Clone)]
pub struct ExpCascade {
    tau: f32,
    stages: usize,
    decay: f32,
    resting: f32,
    states: Vec<Array2<f32>>,
}

impl ExpCascade {
    pub fn new(tau: f32, stages: usize, dt: f32) -> Self {
        let decay = if tau > 0.0 { (-dt / tau).exp() } else { 0.0 };
        Self {
            tau,
            stages,
            decay,
            resting: 0.0,
            states: Vec::new(),
        }
    }

    /// Start every stage at `value` instead of zero.
    pub fn with_resting(mut self, value: f32) -> Self {
        self.resting = value;
        self
    }

    pub fn tau(&self) -> f32 {
        self.tau
    }

    pub fn stages(&self) -> usize {
        self.stages
    }

    pub fn decay(&self) -> f32 {
        self.decay
    }

    /// Forget the filter history.
    pub fn reset(&mut self) {
        self.states.clear();
    }

    /// Advance the cascade by one frame and return its output.
    pub fn step(&mut self, frame: ArrayView2<f32>) -> Array2<f32> {
        let dim = frame.raw_dim();
        if self.states.first().map(|s| s.raw_dim() != dim).unwrap_or(true) {
            self.states = (0..self.stages)
                .map(|_| Array2::from_elem(dim.clone(), self.resting))
                .collect();
        }

        let a = self.decay;
        let mut x = frame.to_owned();
        for state in self.states.iter_mut() {
            Zip::from(&mut *state)
                .and(&x)
                .for_each(|s, &v| *s = a * *s + (1.0 - a) * v);
            x.assign(state);
        }
        x
    }

    /// Filter a `(time, height, width)` block frame by frame.
    pub fn apply(&mut self, input: ArrayView3<f32>) -> Array3<f32> {
        let mut out = Array3::<f32>::zeros(input.raw_dim());
        for (mut dst, src) in out.axis_iter_mut(Axis(0)).zip(input.axis_iter(Axis(0))) {
            dst.assign(&self.step(src));
        }
        out
    }
}

/// High-pass transient filter `y = x - weight * E_tau(x)`.
///
/// With `weight = 1` the response to a constant decays to zero, smaller
/// weights leave a sustained `(1 - weight)` fraction.
#[derive(Debug, Clone)]
pub struct Transient {
    weight: f32,
    lowpass: ExpCascade,
}

impl Transient {
    pub fn new(weight: f32, tau: f32, dt: f32) -> Self {
        Self {
            weight,
            lowpass: ExpCascade::new(tau, 1, dt),
        }
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn tau(&self) -> f32 {
        self.lowpass.tau()
    }

    pub fn reset(&mut self) {
        self.lowpass.reset();
    }

    pub fn step(&mut self, frame: ArrayView2<f32>) -> Array2<f32> {
        let smooth = self.lowpass.step(frame);
        &frame - &(smooth * self.weight)
    }

    pub fn apply(&mut self, input: ArrayView3<f32>) -> Array3<f32> {
        let mut out = Array3::<f32>::zeros(input.raw_dim());
        for (mut dst, src) in out.axis_iter_mut(Axis(0)).zip(input.axis_iter(Axis(0))) {
            dst.assign(&self.step(src));
        }
        out
    }
}
