use std::ops::Index;

use ndarray::{Array1, Array3, Array5, ArrayView5, Axis};

use crate::error::{ConvisError, Result};
use crate::tensor::{concat_time, mean_over_time_axis, to_5d, TIME_AXIS};

/// Activity of the On (`[0]`) and Off (`[1]`) populations.
///
/// Both arrays are shaped `(1, 1, time, height, width)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOutput {
    on: Array5<f32>,
    off: Array5<f32>,
}

impl ModelOutput {
    pub fn new(on: Array5<f32>, off: Array5<f32>) -> Result<Self> {
        if on.shape() != off.shape() {
            return Err(ConvisError::ShapeMismatch(
                format!("{:?}", on.shape()),
                format!("{:?}", off.shape()),
            ));
        }
        Ok(Self { on, off })
    }

    /// Wrap `(time, height, width)` responses.
    pub fn from_3d(on: Array3<f32>, off: Array3<f32>) -> Result<Self> {
        Self::new(to_5d(on), to_5d(off))
    }

    /// Number of populations, always two.
    pub fn len(&self) -> usize {
        2
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn get(&self, index: usize) -> Option<&Array5<f32>> {
        match index {
            0 => Some(&self.on),
            1 => Some(&self.off),
            _ => None,
        }
    }

    pub fn on(&self) -> ArrayView5<f32> {
        self.on.view()
    }

    pub fn off(&self) -> ArrayView5<f32> {
        self.off.view()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Array5<f32>> {
        [&self.on, &self.off].into_iter()
    }

    pub fn n_frames(&self) -> usize {
        self.on.len_of(Axis(TIME_AXIS))
    }

    /// Mean activity over time of (On, Off).
    pub fn mean_activity(&self) -> Result<(Array1<f32>, Array1<f32>)> {
        Ok((
            mean_over_time_axis(self.on.view())?,
            mean_over_time_axis(self.off.view())?,
        ))
    }

    pub fn into_parts(self) -> (Array5<f32>, Array5<f32>) {
        (self.on, self.off)
    }

    /// Join consecutive outputs along time.
    pub fn concat(chunks: &[ModelOutput]) -> Result<Self> {
        let on: Vec<Array5<f32>> = chunks.iter().map(|c| c.on.clone()).collect();
        let off: Vec<Array5<f32>> = chunks.iter().map(|c| c.off.clone()).collect();
        Self::new(concat_time(&on)?, concat_time(&off)?)
    }
}

impl Index<usize> for ModelOutput {
    type Output = Array5<f32>;

    fn index(&self, index: usize) -> &Self::Output {
        match self.get(index) {
            Some(population) => population,
            None => panic!(
                "population index {} out of range for {} populations",
                index,
                self.len()
            ),
        }
    }
}
