//! Helpers for the `(batch, channel, time, height, width)` layout used by model outputs.
use ndarray::{
    concatenate, s, Array1, Array3, Array5, ArrayD, ArrayView3, ArrayView5, ArrayViewD, Axis,
};

use crate::error::{invalid, ConvisError, Result};

/// Index of the time axis in five-dimensional arrays.
pub const TIME_AXIS: usize = 2;

/// Insert singleton batch and channel axes: `(t, h, w)` becomes `(1, 1, t, h, w)`.
pub fn to_5d(input: Array3<f32>) -> Array5<f32> {
    input.insert_axis(Axis(0)).insert_axis(Axis(0))
}

/// Drop the batch and channel axes of a five-dimensional stimulus.
///
/// Only a single batch with a single channel can be squeezed.
pub fn squeeze_5d(input: ArrayView5<'_, f32>) -> Result<ArrayView3<'_, f32>> {
    let (batch, channel, t, h, w) = input.dim();
    if batch != 1 || channel != 1 {
        return Err(ConvisError::ShapeMismatch(
            format!("(1, 1, {}, {}, {})", t, h, w),
            format!("{:?}", input.shape()),
        ));
    }
    Ok(input.index_axis_move(Axis(0), 0).index_axis_move(Axis(0), 0))
}

/// Keep every `n`-th frame, the equivalent of `x[:, :, ::n, :, :]`.
pub fn every_nth_frame(input: ArrayView5<'_, f32>, n: usize) -> Result<ArrayView5<'_, f32>> {
    if n == 0 {
        return Err(invalid("frame stride must be at least 1"));
    }
    Ok(input.slice_move(s![.., .., ..;n, .., ..]))
}

/// Average over the listed axes; the remaining axes keep their order.
pub fn mean_over_axes(input: ArrayViewD<'_, f32>, axes: &[usize]) -> Result<ArrayD<f32>> {
    let ndim = input.ndim();
    let mut axes = axes.to_vec();
    axes.sort_unstable();
    axes.dedup();
    if let Some(&bad) = axes.iter().find(|&&a| a >= ndim) {
        return Err(ConvisError::ShapeMismatch(
            format!("axis < {}", ndim),
            format!("axis {}", bad),
        ));
    }

    let mut out = input.to_owned();
    // Highest axis first so the remaining indices stay valid.
    for &axis in axes.iter().rev() {
        out = out.mean_axis(Axis(axis)).ok_or(ConvisError::EmptyInput)?;
    }
    Ok(out)
}

/// Mean activity over time, `x.mean((0, 1, 3, 4))` for a 5-d array.
pub fn mean_over_time_axis(input: ArrayView5<'_, f32>) -> Result<Array1<f32>> {
    let reduced = mean_over_axes(input.into_dyn(), &[0, 1, 3, 4])?;
    reduced
        .into_dimensionality()
        .map_err(|e| ConvisError::ShapeMismatch("1-d trace".to_string(), e.to_string()))
}

/// Concatenate five-dimensional chunks along the time axis.
pub fn concat_time(chunks: &[Array5<f32>]) -> Result<Array5<f32>> {
    if chunks.is_empty() {
        return Err(ConvisError::EmptyInput);
    }
    let views: Vec<ArrayView5<f32>> = chunks.iter().map(|c| c.view()).collect();
    concatenate(Axis(TIME_AXIS), &views).map_err(|e| {
        ConvisError::ShapeMismatch(
            "chunks with matching batch, channel and spatial axes".to_string(),
            e.to_string(),
        )
    })
}

/// Check a stimulus before it enters a model.
pub fn validate_stimulus(input: ArrayView3<'_, f32>) -> Result<()> {
    if input.is_empty() {
        return Err(ConvisError::EmptyInput);
    }
    let non_finite = input.iter().filter(|v| !v.is_finite()).count();
    if non_finite > 0 {
        return Err(ConvisError::InvalidInput(non_finite));
    }
    Ok(())
}

/// Pin the frame size of a stateful model on its first call.
///
/// Later calls must use the same `(height, width)` until `pinned` is cleared.
pub fn check_frame_shape(
    pinned: &mut Option<(usize, usize)>,
    input: ArrayView3<'_, f32>,
) -> Result<()> {
    let (_, h, w) = input.dim();
    match *pinned {
        Some(shape) if shape != (h, w) => Err(ConvisError::ShapeMismatch(
            format!("frames of {:?}", shape),
            format!("frames of {:?}", (h, w)),
        )),
        _ => {
            *pinned = Some((h, w));
            Ok(())
        }
    }
}
