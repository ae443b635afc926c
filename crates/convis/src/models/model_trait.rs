use std::fmt;

use ndarray::{ArrayView3, ArrayView5, Axis};

use crate::error::{invalid, ConvisError, Result};
use crate::models::ModelOutput;
use crate::tensor::squeeze_5d;

/// Contract shared by every vision model in the crate.
///
/// Models are stateful: consecutive calls continue the simulation in time
/// until [`VisionModel::reset`] is called.
pub trait VisionModel: fmt::Display {
    /// Process a `(time, height, width)` stimulus in one pass.
    fn forward(&mut self, input: ArrayView3<f32>) -> Result<ModelOutput>;

    /// Process a stimulus in consecutive chunks of `dt` frames.
    ///
    /// The chunk outputs are concatenated along time, so the result has as
    /// many frames as the input and equals what `forward` would return.
    fn run(&mut self, input: ArrayView3<f32>, dt: usize) -> Result<ModelOutput> {
        if dt == 0 {
            return Err(invalid("dt must be at least one frame"));
        }
        let n_frames = input.len_of(Axis(0));
        if n_frames == 0 {
            return Err(ConvisError::EmptyInput);
        }

        let n_chunks = n_frames.div_ceil(dt);
        let mut chunks = Vec::with_capacity(n_chunks);
        for (i, chunk) in input.axis_chunks_iter(Axis(0), dt).enumerate() {
            log::debug!(
                "{}: chunk {}/{} ({} frames)",
                self.name(),
                i + 1,
                n_chunks,
                chunk.len_of(Axis(0))
            );
            chunks.push(self.forward(chunk)?);
        }
        ModelOutput::concat(&chunks)
    }

    /// Accept the extended `(batch, channel, time, height, width)` form.
    fn forward_5d(&mut self, input: ArrayView5<f32>) -> Result<ModelOutput> {
        let input = squeeze_5d(input)?;
        self.forward(input)
    }

    /// Return to the freshly constructed state.
    fn reset(&mut self);

    fn name(&self) -> &str {
        "vision model"
    }
}
