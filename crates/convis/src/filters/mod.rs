//! Spatial and temporal filter primitives the retina layers are assembled from.
//!
//! Spatial filters are stateless and operate frame by frame. Temporal filters
//! are recursive and keep one frame of state per stage, so a stimulus can be
//! fed in consecutive chunks without changing the result.
pub mod gaussian;
pub mod nonlinearity;
pub mod temporal;

pub use gaussian::{GaussianBlur, MAX_KERNEL_RADIUS};
pub use nonlinearity::{rectify, GainControl, GanglionNonlinearity};
pub use temporal::{ExpCascade, Transient};
