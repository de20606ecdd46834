//! Python wrappers for accident metric evaluation.

use numpy::{PyArray1, PyReadonlyArray2, PyReadonlyArrayDyn};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use super::{numpy_to_dmatrix, vec_to_numpy1};
use crate::{AccidentMetrics, EvaluationConfig};

/// Result of an accident anticipation evaluation.
#[pyclass(name = "AccidentMetrics")]
#[derive(Clone)]
pub struct PyAccidentMetrics {
    pub(crate) inner: AccidentMetrics,
}

#[pymethods]
impl PyAccidentMetrics {
    /// Area under the precision-recall curve.
    #[getter]
    fn average_precision(&self) -> f64 {
        self.inner.average_precision
    }

    /// Mean time-to-accident in seconds, or None.
    #[getter]
    fn mean_time_to_accident(&self) -> Option<f64> {
        self.inner.mean_time_to_accident
    }

    /// Time-to-accident in seconds at the recall operating point, or None.
    #[getter]
    fn time_at_recall(&self) -> Option<f64> {
        self.inner.time_at_recall
    }

    /// Recall values of the cleaned curve.
    #[getter]
    fn recall<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        vec_to_numpy1(py, &self.inner.curve.recall())
    }

    /// Precision values of the cleaned curve.
    #[getter]
    fn precision<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        vec_to_numpy1(py, &self.inner.curve.precision())
    }

    /// Time-to-accident fractions of the cleaned curve (NaN where undefined).
    #[getter]
    fn time<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        vec_to_numpy1(py, &self.inner.curve.time())
    }

    fn __repr__(&self) -> String {
        format!(
            "AccidentMetrics(average_precision={:.4}, mean_time_to_accident={:?}, time_at_recall={:?})",
            self.inner.average_precision,
            self.inner.mean_time_to_accident,
            self.inner.time_at_recall
        )
    }

    fn __str__(&self) -> String {
        self.inner.to_string()
    }
}

/// Evaluate per-frame risk scores.
///
/// Args:
///     all_pred: Array of shape (N, total_time).
///     all_labels: Array of shape (N,) or (N, 1) with 0/1 labels.
///     total_time: Number of scored frames per video.
///     length: Optional valid length per video (right-aligned).
///     time_scale: Factor from time fraction to seconds.
///     recall_target: Recall at which time-to-accident is reported.
#[pyfunction]
#[pyo3(signature = (all_pred, all_labels, total_time=90, length=None, time_scale=5.0, recall_target=0.8))]
pub fn evaluation(
    all_pred: PyReadonlyArray2<'_, f64>,
    all_labels: PyReadonlyArrayDyn<'_, f64>,
    total_time: usize,
    length: Option<Vec<usize>>,
    time_scale: f64,
    recall_target: f64,
) -> PyResult<PyAccidentMetrics> {
    let labels_arr = all_labels.as_array();
    let shape = labels_arr.shape();
    let is_column = shape.len() == 1 || (shape.len() == 2 && shape[1] == 1);
    if !is_column {
        return Err(PyValueError::new_err(format!(
            "all_labels must have shape (N,) or (N, 1), got {:?}",
            shape
        )));
    }
    let labels: Vec<f64> = labels_arr.iter().cloned().collect();

    let config = EvaluationConfig::new(total_time)
        .with_time_scale(time_scale)
        .with_recall_target(recall_target);

    let inner = crate::evaluate(
        &numpy_to_dmatrix(&all_pred),
        &labels,
        length.as_deref(),
        &config,
    )
    .map_err(|e| PyValueError::new_err(e.to_string()))?;

    Ok(PyAccidentMetrics { inner })
}

/// Accident-class probability from (N, 2) logits.
#[pyfunction]
pub fn accident_probability<'py>(
    py: Python<'py>,
    logits: PyReadonlyArray2<'py, f64>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let probs = crate::accident_probability(&numpy_to_dmatrix(&logits))
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(vec_to_numpy1(py, probs.as_slice()))
}
