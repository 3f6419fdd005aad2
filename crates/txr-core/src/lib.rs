//! TXR core library.
//!
//! Confidence intervals for diagnostic-test sensitivity (TPR) and
//! specificity (TNR), plus a Monte Carlo toolkit for confusion-matrix
//! metrics:
//! - [`interval`]: exact binomial intervals, single point and swept
//! - [`simulate`]: random confusion matrices
//! - [`metrics`] and [`summary`]: derived diagnostic metrics
//! - [`rank`]: probability that one sample dominates another
//! - [`figure`]: chart-ready model of a sweep
//! - [`controls`]: front-end parameter ranges and corrections

pub mod controls;
pub mod exit_codes;
pub mod figure;
pub mod interval;
pub mod logging;
pub mod metrics;
pub mod rank;
pub mod simulate;
pub mod summary;

pub use controls::{apply_controls, AppliedControls, ControlInput};
pub use figure::{build_figure, plot_confidence_intervals, ConfidenceFigure};
pub use interval::{
    confidence_interval_txr, confidence_interval_txr_sweep, SampleCounts, SweepParams,
    TxrInterval, TxrSweep,
};
pub use metrics::{MetricName, MetricSet};
pub use rank::probability_greater_equal;
pub use simulate::{create_confusion_matrices, ConfusionBatch, SimulationParams};
pub use summary::{summarize, MetricSummary};
