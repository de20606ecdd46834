//! Spatio-temporal interaction graphs over detected objects.
//!
//! This module provides:
//! - `EdgeList` - fully connected edge index over the boxes of a frame
//! - `edge_weights` - distance-derived, normalized edge weights for one frame
//! - `GraphBuilder` / `build_graph` - per-frame graphs for a whole clip

mod edges;
mod weights;
mod builder;

pub use edges::{EdgeList, GraphKind};
pub use weights::edge_weights;
pub use builder::{build_graph, GraphBuilder, SpatioTemporalGraph};
