//! Risk scores from model logits.

use nalgebra::{DMatrix, DVector};

use crate::{Error, Result};

/// Probability of the accident class from two-class logits.
///
/// # Arguments
/// * `logits` - `batch_size x 2` matrix; column 0 is "no accident", column 1 "accident"
///
/// # Returns
/// `exp(l1) / (exp(l0) + exp(l1))` per row
pub fn accident_probability(logits: &DMatrix<f64>) -> Result<DVector<f64>> {
    if logits.ncols() != 2 {
        return Err(Error::ShapeMismatch {
            what: "logits",
            expected: "(n, 2)".to_string(),
            got: format!("({}, {})", logits.nrows(), logits.ncols()),
        });
    }

    Ok(DVector::from_iterator(
        logits.nrows(),
        logits.row_iter().map(|row| {
            let max = row[0].max(row[1]);
            let e0 = (row[0] - max).exp();
            let e1 = (row[1] - max).exp();
            e1 / (e0 + e1)
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_softmax_values() {
        let logits = DMatrix::from_row_slice(3, 2, &[0.0, 0.0, 0.0, 2.0, 3.0, -1.0]);
        let p = accident_probability(&logits).unwrap();

        assert_relative_eq!(p[0], 0.5);
        assert_relative_eq!(p[1], 2.0f64.exp() / (1.0 + 2.0f64.exp()), epsilon = 1e-12);
        assert_relative_eq!(p[2], (-1.0f64).exp() / (3.0f64.exp() + (-1.0f64).exp()), epsilon = 1e-12);
    }

    #[test]
    fn test_large_logits_stay_finite() {
        let logits = DMatrix::from_row_slice(1, 2, &[1000.0, 1001.0]);
        let p = accident_probability(&logits).unwrap();
        assert!(p[0].is_finite());
        assert_relative_eq!(p[0], 1.0 / (1.0 + (-1.0f64).exp()), epsilon = 1e-12);
    }

    #[test]
    fn test_wrong_column_count() {
        assert!(accident_probability(&DMatrix::zeros(2, 3)).is_err());
    }
}
