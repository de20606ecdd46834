//! Accident anticipation evaluation: Average Precision and time-to-accident.

use std::fmt;

use nalgebra::DMatrix;
use serde::Serialize;

use super::{EvaluationConfig, PrecisionRecallCurve, SweepPoint, ThresholdSweep};
use crate::internal::numpy::flatten_column;
use crate::utils::warn_once;
use crate::Result;

/// Accident anticipation metrics.
#[derive(Debug, Clone, Serialize)]
pub struct AccidentMetrics {
    /// Area under the precision-recall curve
    pub average_precision: f64,
    /// Mean time-to-accident over the curve, scaled by `time_scale`
    pub mean_time_to_accident: Option<f64>,
    /// Time-to-accident at the recall closest to `recall_target`, scaled by `time_scale`
    pub time_at_recall: Option<f64>,
    /// Recall operating point used for `time_at_recall`
    pub recall_target: f64,
    /// Cleaned curve (one point per recall)
    pub curve: PrecisionRecallCurve,
    /// Raw per-threshold points
    pub sweep_points: Vec<SweepPoint>,
}

impl fmt::Display for AccidentMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fmt_time = |t: Option<f64>| t.map_or_else(|| "n/a".to_string(), |t| format!("{:.4}", t));

        writeln!(
            f,
            "Average Precision= {:.4}, mean Time to accident= {}",
            self.average_precision,
            fmt_time(self.mean_time_to_accident)
        )?;
        write!(
            f,
            "Recall@{:.0}%, Time to accident= {}",
            self.recall_target * 100.0,
            fmt_time(self.time_at_recall)
        )
    }
}

/// Evaluate per-frame risk scores against video-level labels.
///
/// # Arguments
/// * `all_pred` - Risk scores, one row per video and `config.total_time` columns
/// * `all_labels` - One label per video, 1 if the video contains an accident
/// * `length` - Optional number of valid (right-aligned) frames per video
/// * `config` - Evaluation settings
///
/// # Returns
/// AccidentMetrics, or `Error::UndefinedAveragePrecision` if no threshold yields
/// a defined precision and recall (e.g. there are no positive videos).
pub fn evaluate(
    all_pred: &DMatrix<f64>,
    all_labels: &[f64],
    length: Option<&[usize]>,
    config: &EvaluationConfig,
) -> Result<AccidentMetrics> {
    config.validate()?;

    let sweep = ThresholdSweep::new(all_pred, all_labels, length, config.total_time)?;
    if sweep.num_positive() == 0 {
        warn_once("evaluation labels contain no positive videos; recall is undefined");
    }

    let sweep_points = sweep.run();
    tracing::debug!(
        videos = sweep.num_videos(),
        positives = sweep.num_positive(),
        thresholds = sweep_points.len(),
        masked = length.is_some(),
        "threshold sweep complete"
    );

    let curve = PrecisionRecallCurve::from_sweep(&sweep_points);
    let average_precision = curve.average_precision().map_err(|e| {
        tracing::warn!(error = %e, "no usable precision values");
        e
    })?;

    let mean_time_to_accident = curve.mean_time().map(|t| t * config.time_scale);
    let time_at_recall = curve
        .time_at_recall(config.recall_target)
        .map(|t| t * config.time_scale);

    tracing::info!(
        average_precision,
        mean_time_to_accident = ?mean_time_to_accident,
        time_at_recall = ?time_at_recall,
        recall_target = config.recall_target,
        "accident metrics"
    );

    Ok(AccidentMetrics {
        average_precision,
        mean_time_to_accident,
        time_at_recall,
        recall_target: config.recall_target,
        curve,
        sweep_points,
    })
}

/// Labels from an `(N, 1)` (or `(1, N)`) matrix.
pub fn labels_from_column(labels: &DMatrix<f64>) -> Result<Vec<f64>> {
    flatten_column(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use approx::assert_relative_eq;

    fn scenario() -> (DMatrix<f64>, Vec<f64>) {
        let pred = DMatrix::from_row_slice(2, 4, &[
            0.0, 0.0, 0.6, 0.9,
            0.1, 0.2, 0.1, 0.0,
        ]);
        (pred, vec![1.0, 0.0])
    }

    #[test]
    fn test_scenario_without_length() {
        let (pred, labels) = scenario();
        let metrics = evaluate(&pred, &labels, None, &EvaluationConfig::new(4)).unwrap();

        assert_relative_eq!(metrics.average_precision, 1.0);
        assert_eq!(metrics.sweep_points.len(), 5);
        assert_eq!(metrics.curve.len(), 1);
        // Threshold 0 detects video 0 at frame 0
        assert_relative_eq!(metrics.mean_time_to_accident.unwrap(), 5.0);
        assert_relative_eq!(metrics.time_at_recall.unwrap(), 5.0);
    }

    #[test]
    fn test_perfect_detector() {
        // Positives fire at frame 0, negatives never
        let pred = DMatrix::from_row_slice(4, 3, &[
            1.0, 0.0, 0.0,
            0.0, 0.0, 0.0,
            1.0, 1.0, 1.0,
            0.0, 0.0, 0.0,
        ]);
        let labels = [1.0, 0.0, 1.0, 0.0];
        let config = EvaluationConfig::new(3).with_time_scale(1.0);
        let metrics = evaluate(&pred, &labels, None, &config).unwrap();

        assert_relative_eq!(metrics.average_precision, 1.0);
        assert_relative_eq!(metrics.mean_time_to_accident.unwrap(), 1.0);
    }

    #[test]
    fn test_time_scale_applied() {
        let (pred, labels) = scenario();
        let config = EvaluationConfig::new(4).with_time_scale(2.0);
        let metrics = evaluate(&pred, &labels, Some(&[4, 4][..]), &config).unwrap();

        assert_relative_eq!(metrics.mean_time_to_accident.unwrap(), 1.0);
    }

    #[test]
    fn test_no_positive_videos() {
        let (pred, _) = scenario();
        let err = evaluate(&pred, &[0.0, 0.0], None, &EvaluationConfig::new(4)).unwrap_err();
        assert!(matches!(err, Error::UndefinedAveragePrecision(_)));
    }

    #[test]
    fn test_empty_input() {
        let pred = DMatrix::<f64>::zeros(0, 4);
        let err = evaluate(&pred, &[], None, &EvaluationConfig::new(4)).unwrap_err();
        assert!(matches!(err, Error::UndefinedAveragePrecision(_)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let (pred, labels) = scenario();
        let config = EvaluationConfig::new(4).with_recall_target(-0.1);
        assert!(matches!(
            evaluate(&pred, &labels, None, &config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_display() {
        let (pred, labels) = scenario();
        let metrics = evaluate(&pred, &labels, None, &EvaluationConfig::new(4)).unwrap();
        let text = metrics.to_string();

        assert!(text.contains("Average Precision= 1.0000"));
        assert!(text.contains("Recall@80%, Time to accident= 5.0000"));
    }

    #[test]
    fn test_labels_from_column() {
        let column = DMatrix::from_row_slice(2, 1, &[1.0, 0.0]);
        assert_eq!(labels_from_column(&column).unwrap(), vec![1.0, 0.0]);
    }
}
