//! Spatial edge weights from box center distances.

use nalgebra::{DMatrix, DVector};

use super::EdgeList;
use crate::{Error, Result};

/// Edge weights for one frame.
///
/// Each edge `(i, j)` gets `exp(-d)` where `d` is the squared Euclidean distance
/// between the box centers of `i` and `j`. Weights are then normalized to sum to 1.
/// If they sum to zero (no edges, or every `exp(-d)` underflowed), all weights are 1.
///
/// # Arguments
/// * `centers` - Box centers, `num_nodes x 2`
/// * `edges` - Edge list enumerated over the same node count
pub fn edge_weights(centers: &DMatrix<f64>, edges: &EdgeList) -> Result<DVector<f64>> {
    if centers.nrows() != edges.num_nodes() {
        return Err(Error::MalformedDetections(format!(
            "{} box centers for an edge list over {} nodes",
            centers.nrows(),
            edges.num_nodes()
        )));
    }
    if centers.nrows() > 0 && centers.ncols() != 2 {
        return Err(Error::MalformedDetections(format!(
            "box centers must have 2 columns, got {}",
            centers.ncols()
        )));
    }

    let mut weights = DVector::from_iterator(
        edges.len(),
        edges.iter().map(|(i, j)| {
            let dx = centers[(i, 0)] - centers[(j, 0)];
            let dy = centers[(i, 1)] - centers[(j, 1)];
            (-(dx * dx + dy * dy)).exp()
        }),
    );

    let total = weights.sum();
    if total > 0.0 {
        weights /= total;
    } else {
        weights.fill(1.0);
    }

    Ok(weights)
}
