//! Python bindings for accident-rs using PyO3.
//!
//! The training and inference driver is written in Python; these bindings let it
//! hand numpy arrays straight to the graph builder and the evaluator.

use nalgebra::DMatrix;
use numpy::ndarray::Array1;
use numpy::{IntoPyArray, PyArray1, PyReadonlyArray2};
use pyo3::prelude::*;

mod graph;
mod metrics;

pub use graph::build_graph;
pub use metrics::{accident_probability, evaluation, PyAccidentMetrics};

/// Python module for accident-rs.
///
/// The function is named `_accident_rs` with underscore prefix for mixed Python/Rust projects.
#[pymodule]
fn _accident_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyAccidentMetrics>()?;

    m.add_function(wrap_pyfunction!(graph::build_graph, m)?)?;
    m.add_function(wrap_pyfunction!(metrics::evaluation, m)?)?;
    m.add_function(wrap_pyfunction!(metrics::accident_probability, m)?)?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}

/// Helper to convert a numpy array to DMatrix
pub(crate) fn numpy_to_dmatrix(arr: &PyReadonlyArray2<'_, f64>) -> DMatrix<f64> {
    let arr = arr.as_array();
    let (n_rows, n_cols) = arr.dim();
    DMatrix::from_fn(n_rows, n_cols, |i, j| arr[[i, j]])
}

/// Helper to convert a slice to a 1D numpy array
pub(crate) fn vec_to_numpy1<'py>(py: Python<'py>, data: &[f64]) -> Bound<'py, PyArray1<f64>> {
    Array1::from_vec(data.to_vec()).into_pyarray_bound(py)
}
