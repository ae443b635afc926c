use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis, Zip};

/// Largest kernel radius in pixels; wider kernels are truncated.
pub const MAX_KERNEL_RADIUS: usize = 1024;

/// Separable, normalized Gaussian blur with edge-replicating borders.
///
/// `sigma` is given in pixels. A non-positive `sigma` leaves frames unchanged.
#[derive(Debug, Clone)]
pub struct GaussianBlur {
    sigma: f32,
    kernel: Vec<f32>,
}

impl GaussianBlur {
    pub fn new(sigma: f32) -> Self {
        Self {
            sigma,
            kernel: gaussian_kernel(sigma),
        }
    }

    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    pub fn kernel(&self) -> &[f32] {
        &self.kernel
    }

    pub fn is_identity(&self) -> bool {
        self.kernel.len() == 1
    }

    /// Blur a single `(height, width)` frame.
    pub fn apply_frame(&self, frame: ArrayView2<f32>) -> Array2<f32> {
        if self.is_identity() {
            return frame.to_owned();
        }
        let rows = convolve_axis(frame, &self.kernel, Axis(1));
        convolve_axis(rows.view(), &self.kernel, Axis(0))
    }

    /// Blur every frame of a `(time, height, width)` block in parallel.
    pub fn apply(&self, input: ArrayView3<f32>) -> Array3<f32> {
        if self.is_identity() {
            return input.to_owned();
        }
        let mut out = Array3::<f32>::zeros(input.raw_dim());
        Zip::from(out.axis_iter_mut(Axis(0)))
            .and(input.axis_iter(Axis(0)))
            .par_for_each(|mut dst, src| dst.assign(&self.apply_frame(src)));
        out
    }
}

/// Sampled Gaussian truncated at three standard deviations, summing to one.
fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    if !(sigma > 0.0) {
        return vec![1.0];
    }
    let radius = (3.0 * sigma).ceil().min(MAX_KERNEL_RADIUS as f32) as isize;
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (-radius..=radius)
        .map(|i| (-((i * i) as f32) / denom).exp())
        .collect();
    let total: f32 = kernel.iter().sum();
    kernel.iter_mut().for_each(|k| *k /= total);
    kernel
}

fn convolve_axis(frame: ArrayView2<f32>, kernel: &[f32], axis: Axis) -> Array2<f32> {
    let (h, w) = frame.dim();
    let len = (if axis == Axis(0) { h } else { w }) as isize;
    let radius = (kernel.len() / 2) as isize;
    Array2::from_shape_fn((h, w), |(y, x)| {
        let center = (if axis == Axis(0) { y } else { x }) as isize;
        kernel
            .iter()
            .enumerate()
            .map(|(k, weight)| {
                let idx = (center + k as isize - radius).clamp(0, len - 1) as usize;
                let value = if axis == Axis(0) {
                    frame[[idx, x]]
                } else {
                    frame[[y, idx]]
                };
                weight * value
            })
            .sum()
    })
}
