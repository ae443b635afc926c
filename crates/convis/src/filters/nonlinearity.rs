use ndarray::{Array, ArrayBase, Data, Dimension};

/// Half-wave rectification.
#[inline]
pub fn rectify(v: f32) -> f32 {
    v.max(0.0)
}

/// Static nonlinearity turning the transient bipolar signal into a ganglion current.
///
/// Below the threshold `v0` the curve saturates smoothly towards zero,
/// above it grows linearly with slope `lambda`:
///
/// ```text
/// N(v) = i0 / (1 - lambda * (v - v0) / i0)   for v < v0
/// N(v) = i0 + lambda * (v - v0)              otherwise
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GanglionNonlinearity {
    pub lambda: f32,
    pub v0: f32,
    pub i0: f32,
}

impl GanglionNonlinearity {
    pub fn new(lambda: f32, v0: f32, i0: f32) -> Self {
        Self { lambda, v0, i0 }
    }

    #[inline]
    pub fn eval(&self, v: f32) -> f32 {
        if v < self.v0 {
            self.i0 / (1.0 - self.lambda * (v - self.v0) / self.i0)
        } else {
            self.i0 + self.lambda * (v - self.v0)
        }
    }

    pub fn apply<S, D>(&self, input: &ArrayBase<S, D>) -> Array<f32, D>
    where
        S: Data<Elem = f32>,
        D: Dimension,
    {
        input.mapv(|v| self.eval(v))
    }
}

/// Quadratic conductance `g0 + lambda * v^2` of the contrast gain control loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainControl {
    pub g0: f32,
    pub lambda: f32,
}

impl GainControl {
    pub fn new(g0: f32, lambda: f32) -> Self {
        Self { g0, lambda }
    }

    #[inline]
    pub fn eval(&self, v: f32) -> f32 {
        self.g0 + self.lambda * v * v
    }

    pub fn apply<S, D>(&self, input: &ArrayBase<S, D>) -> Array<f32, D>
    where
        S: Data<Elem = f32>,
        D: Dimension,
    {
        input.mapv(|v| self.eval(v))
    }
}
