//! # accident-rs - Accident Anticipation Core
//!
//! Graph construction and evaluation metrics for dashcam accident anticipation.
//!
//! A recurrent graph model predicts, frame by frame, how likely it is that an accident
//! is occurring or about to occur. This crate covers the deterministic parts around
//! that model:
//!
//! ## Features
//!
//! - Per-frame interaction graphs over detected objects, with distance-derived edge weights
//! - Average Precision over a threshold sweep of observed risk scores
//! - Time-to-accident statistics (mean and at a recall operating point)
//! - Batch accumulation of model outputs for evaluation
//! - Optional Python bindings (`python` feature) and parallel sweep (`parallel` feature)
//!
//! ## Example
//!
//! ```rust,ignore
//! use accident_rs::{build_graph, evaluate, ClipDetections, EvaluationConfig};
//! use nalgebra::DMatrix;
//!
//! // Graph for a 100-frame clip with 19 boxes per frame
//! let clip = ClipDetections::from_slice(&raw, 100, 19, 6)?;
//! let graph = build_graph(&clip)?;
//! assert_eq!(graph.num_edges(), 171);
//!
//! // AP and time-to-accident over per-frame risk scores
//! let config = EvaluationConfig::default();
//! let metrics = evaluate(&all_pred, &all_labels, None, &config)?;
//! println!("{}", metrics);
//! ```

// Internal modules (ports of numpy helpers)
pub(crate) mod internal;

// Public modules
pub mod detection;
pub mod graph;
pub mod metrics;
pub mod utils;

// Optional modules
#[cfg(feature = "python")]
pub mod python;

// Re-exports for convenience
pub use detection::ClipDetections;
pub use graph::{build_graph, EdgeList, GraphBuilder, GraphKind, SpatioTemporalGraph};
pub use metrics::{
    accident_probability, evaluate, labels_from_column, AccidentMetrics, EvaluationConfig,
    PrecisionRecallCurve, RiskAccumulator,
};

// Error types
pub use crate::error::{Error, Result};

mod error {
    use thiserror::Error;

    /// Errors that can occur in the accident-rs library
    #[derive(Error, Debug)]
    pub enum Error {
        #[error("Invalid configuration: {0}")]
        InvalidConfig(String),

        #[error("Malformed detections: {0}")]
        MalformedDetections(String),

        #[error("Shape mismatch for {what}: expected {expected}, got {got}")]
        ShapeMismatch {
            what: &'static str,
            expected: String,
            got: String,
        },

        #[error("Invalid labels: {0}")]
        InvalidLabels(String),

        #[error("Invalid scores: {0}")]
        InvalidScores(String),

        #[error("Invalid length: {0}")]
        InvalidLength(String),

        #[error("Average precision is undefined: {0}")]
        UndefinedAveragePrecision(String),
    }

    /// Result type for accident-rs operations
    pub type Result<T> = std::result::Result<T, Error>;
}
