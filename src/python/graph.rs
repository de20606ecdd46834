//! Python wrapper for spatio-temporal graph construction.

use numpy::ndarray::{Array2, Array3};
use numpy::{IntoPyArray, PyArray2, PyArray3, PyReadonlyArray3};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::{ClipDetections, GraphBuilder, GraphKind};

/// Build the per-frame interaction graph of a clip.
///
/// Args:
///     detections: Array of shape (num_frames, num_boxes, num_attrs) with
///                 [x1, y1, x2, y2, ...] per box.
///     directed: Enumerate ordered pairs instead of unordered ones.
///
/// Returns:
///     (edges, weights): int64 array (num_frames, 2, num_edges) and float64
///     array (num_frames, num_edges).
#[pyfunction]
#[pyo3(signature = (detections, directed=false))]
pub fn build_graph<'py>(
    py: Python<'py>,
    detections: PyReadonlyArray3<'py, f64>,
    directed: bool,
) -> PyResult<(Bound<'py, PyArray3<i64>>, Bound<'py, PyArray2<f64>>)> {
    let arr = detections.as_array();
    let (num_frames, num_boxes, num_attrs) = arr.dim();

    // Logical (row-major) order regardless of the numpy memory layout
    let data: Vec<f64> = arr.iter().cloned().collect();
    let clip = ClipDetections::from_slice(&data, num_frames, num_boxes, num_attrs)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;

    let kind = if directed {
        GraphKind::Directed
    } else {
        GraphKind::Undirected
    };
    let graph = GraphBuilder::new(kind)
        .build(&clip)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;

    let num_edges = graph.num_edges();
    let index = graph.edges.index();
    let edges = Array3::from_shape_fn((num_frames, 2, num_edges), |(_, row, k)| {
        index[(row, k)] as i64
    });
    let weights = Array2::from_shape_fn((num_frames, num_edges), |(t, k)| graph.weights[(t, k)]);

    Ok((edges.into_pyarray_bound(py), weights.into_pyarray_bound(py)))
}
