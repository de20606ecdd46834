//! NumPy-like array operations.

use nalgebra::DMatrix;
use crate::{Error, Result};

/// Sorted distinct values, like `np.unique` on a flattened array.
///
/// Ordering follows `f64::total_cmp`, and values that compare equal
/// (including `0.0` and `-0.0`) collapse into one.
pub fn sorted_unique<I: IntoIterator<Item = f64>>(values: I) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.into_iter().collect();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted.dedup_by(|a, b| a == b);
    sorted
}

/// Maximum ignoring NaN, like `np.nanmax`. NaN if every value is NaN or the input is empty.
pub fn nanmax<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold(f64::NAN, |acc, v| if acc.is_nan() || v > acc { v } else { acc })
}

/// Mean ignoring NaN, like `np.nanmean`. NaN if every value is NaN or the input is empty.
pub fn nanmean<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let (sum, count) = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));

    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Index of the value closest to `target`, like `np.argmin(np.abs(values - target))`.
///
/// Ties resolve to the first index. NaN entries never win.
pub fn argmin_abs_diff(values: &[f64], target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        let diff = (v - target).abs();
        if diff.is_nan() {
            continue;
        }
        match best {
            Some((_, d)) if d <= diff => {}
            _ => best = Some((i, diff)),
        }
    }
    best.map(|(i, _)| i)
}

/// Running maximum, like `np.maximum.accumulate`.
pub fn prefix_max(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut current = f64::NEG_INFINITY;
    for &v in values {
        if v > current {
            current = v;
        }
        out.push(current);
    }
    out
}

/// Flatten an `(n, 1)` or `(1, n)` matrix into a vector of `n` values.
pub fn flatten_column(matrix: &DMatrix<f64>) -> Result<Vec<f64>> {
    let (rows, cols) = matrix.shape();

    if cols == 1 || rows == 1 {
        return Ok(matrix.iter().cloned().collect());
    }

    Err(Error::ShapeMismatch {
        what: "labels",
        expected: "(n, 1) or (1, n)".to_string(),
        got: format!("({}, {})", rows, cols),
    })
}
