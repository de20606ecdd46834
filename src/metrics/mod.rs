//! Accident anticipation metrics.
//!
//! This module provides tools for scoring per-frame accident risk predictions:
//!
//! - `ThresholdSweep` - precision, recall and time-to-accident at every observed score
//! - `PrecisionRecallCurve` - envelope per recall, trapezoidal Average Precision
//! - `evaluate` - the full evaluation, returning `AccidentMetrics`
//! - `RiskAccumulator` - collect model outputs batch by batch before evaluating
//! - `accident_probability` - two-class softmax over model logits

mod config;
mod sweep;
mod curve;
mod evaluation;
mod accumulator;
mod probability;

pub use config::EvaluationConfig;
pub use sweep::{mask_padding, SweepPoint, ThresholdSweep};
pub use curve::{CurvePoint, PrecisionRecallCurve};
pub use evaluation::{evaluate, labels_from_column, AccidentMetrics};
pub use accumulator::RiskAccumulator;
pub use probability::accident_probability;
