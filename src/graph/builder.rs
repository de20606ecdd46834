//! Spatio-temporal graph construction for a whole clip.

use nalgebra::{DMatrix, DVector};

use super::{edge_weights, EdgeList, GraphKind};
use crate::detection::box_centers;
use crate::{ClipDetections, Result};

/// Per-frame interaction graphs of one clip.
///
/// The edge topology is shared by every frame; only the weights change over time.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatioTemporalGraph {
    /// Edge list shared by all frames.
    pub edges: EdgeList,

    /// Edge weights, `num_frames x num_edges`.
    pub weights: DMatrix<f64>,
}

impl SpatioTemporalGraph {
    /// Number of frames.
    pub fn num_frames(&self) -> usize {
        self.weights.nrows()
    }

    /// Number of edges per frame.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Edge list and weights of frame `t`.
    pub fn frame(&self, t: usize) -> Option<(&EdgeList, DVector<f64>)> {
        if t >= self.num_frames() {
            return None;
        }
        Some((&self.edges, self.weights.row(t).transpose()))
    }

    /// Edge index repeated for every frame: the `(num_frames, 2, num_edges)` layout
    /// graph convolution layers consume.
    pub fn stacked_edge_index(&self) -> Vec<DMatrix<usize>> {
        vec![self.edges.index().clone(); self.num_frames()]
    }
}

/// Builds [`SpatioTemporalGraph`]s, reusing the edge list between clips with the
/// same box count.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    kind: GraphKind,
    cached_edges: Option<EdgeList>,
}

impl GraphBuilder {
    /// Create a builder enumerating edges of the given kind.
    pub fn new(kind: GraphKind) -> Self {
        Self {
            kind,
            cached_edges: None,
        }
    }

    /// Edge enumeration used by this builder.
    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    /// Edge list for `num_boxes` nodes, rebuilt only when the box count changed.
    fn edges_for(&mut self, num_boxes: usize) -> &EdgeList {
        let kind = self.kind;
        let fresh = matches!(
            &self.cached_edges,
            Some(edges) if edges.num_nodes() == num_boxes && edges.kind() == kind
        );
        if !fresh {
            tracing::trace!(num_boxes, ?kind, "rebuilding edge list");
            self.cached_edges = None;
        }

        self.cached_edges
            .get_or_insert_with(|| EdgeList::complete(num_boxes, kind))
    }

    /// Build the graph of every frame of `clip`.
    pub fn build(&mut self, clip: &ClipDetections) -> Result<SpatioTemporalGraph> {
        let edges = self.edges_for(clip.num_boxes()).clone();
        let mut weights = DMatrix::zeros(clip.num_frames(), edges.len());

        for (t, boxes) in clip.frames().enumerate() {
            let centers = box_centers(boxes);
            let w = edge_weights(&centers, &edges)?;

            // A normalized vector over more than one edge can't be all ones
            if edges.len() > 1 && w.iter().all(|&v| v == 1.0) {
                tracing::debug!(frame = t, "edge weights fell back to uniform");
            }

            weights.row_mut(t).copy_from(&w.transpose());
        }

        Ok(SpatioTemporalGraph { edges, weights })
    }
}

/// Build the undirected spatio-temporal graph of a clip.
///
/// # Returns
/// Edge list (`2 x num_boxes*(num_boxes-1)/2`) shared by all frames, and
/// `num_frames x num_edges` edge weights. Clips with fewer than two boxes yield
/// zero edges.
pub fn build_graph(clip: &ClipDetections) -> Result<SpatioTemporalGraph> {
    GraphBuilder::default().build(clip)
}
