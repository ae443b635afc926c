//! Retina processing stages.
//!
//! Every layer consumes and produces `(time, height, width)` blocks and keeps
//! its recursive state between calls.
pub mod bipolar;
pub mod ganglion;
pub mod opl;

pub use bipolar::ContrastGainControl;
pub use ganglion::{GanglionInput, GanglionSpikes, Polarity};
pub use opl::OuterPlexiformLayer;
