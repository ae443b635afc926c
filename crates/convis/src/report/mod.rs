//! Plotting and HTML report helpers used by the CLI and examples.
//!
//! Plots are small functions turning model output into `plotly::Plot`
//! figures; a `Report` collects titled sections of figures and text into a
//! single self-contained HTML page.
pub mod plots;
pub mod report;

pub use plots::{plot_5d_matshow, plot_5d_time, plot_traces};
pub use report::{Report, ReportSection};
