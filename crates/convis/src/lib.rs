//! convis: a convolutional vision model of the retina.
//!
//! This crate provides a Virtual Retina style model (`models::Retina`) and a
//! simpler linear-nonlinear model (`models::LnModel`), the spatial and temporal
//! filter primitives they are assembled from, five-dimensional tensor helpers,
//! synthetic stimuli, and plotting/report helpers used by the CLI and examples.
//!
//! Models consume stimuli shaped `(time, height, width)` and produce a pair of
//! `(batch, channel, time, height, width)` arrays for the On and Off populations.
pub mod config;
pub mod error;
pub mod filters;
pub mod io;
pub mod layers;
pub mod models;
pub mod report;
pub mod stimuli;
pub mod tensor;

pub use error::{ConvisError, Result};
pub use models::{LnModel, ModelOutput, Retina, VisionModel};
