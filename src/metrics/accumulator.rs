//! Accumulates per-batch model outputs for a single evaluation.

use nalgebra::DMatrix;

use super::{evaluate, AccidentMetrics, EvaluationConfig};
use crate::{Error, Result};

/// Collects risk scores and labels batch by batch, then evaluates them together.
///
/// Each batch contributes `batch_size` videos. Only the first `total_time` frames
/// of every video are kept, so clips may be longer than the scored window.
#[derive(Debug, Clone)]
pub struct RiskAccumulator {
    config: EvaluationConfig,
    /// Row-major scores, `total_time` per video
    scores: Vec<f64>,
    labels: Vec<f64>,
    lengths: Option<Vec<usize>>,
}

impl RiskAccumulator {
    /// Create an empty accumulator.
    pub fn new(config: EvaluationConfig) -> Self {
        Self {
            config,
            scores: Vec::new(),
            labels: Vec::new(),
            lengths: None,
        }
    }

    /// Evaluation settings.
    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Add a batch.
    ///
    /// # Arguments
    /// * `pred_frames` - Risk scores, `batch_size x num_frames` with `num_frames >= total_time`
    /// * `labels_onehot` - One-hot labels, `batch_size x 2`; column 1 marks accident videos
    pub fn update(&mut self, pred_frames: &DMatrix<f64>, labels_onehot: &DMatrix<f64>) -> Result<()> {
        if self.lengths.is_some() {
            return Err(Error::InvalidLength(
                "batch without lengths added after batches with lengths".to_string(),
            ));
        }
        self.push_batch(pred_frames, labels_onehot, None)
    }

    /// Add a batch together with the number of valid frames of each video.
    pub fn update_with_lengths(
        &mut self,
        pred_frames: &DMatrix<f64>,
        labels_onehot: &DMatrix<f64>,
        lengths: &[usize],
    ) -> Result<()> {
        if self.lengths.is_none() && self.num_videos() > 0 {
            return Err(Error::InvalidLength(
                "batch with lengths added after batches without lengths".to_string(),
            ));
        }
        self.push_batch(pred_frames, labels_onehot, Some(lengths))
    }

    fn push_batch(
        &mut self,
        pred_frames: &DMatrix<f64>,
        labels_onehot: &DMatrix<f64>,
        lengths: Option<&[usize]>,
    ) -> Result<()> {
        let total_time = self.config.total_time;
        let (batch_size, num_frames) = pred_frames.shape();

        if num_frames < total_time {
            return Err(Error::ShapeMismatch {
                what: "pred_frames",
                expected: format!("at least {} frames", total_time),
                got: format!("{} frames", num_frames),
            });
        }

        if labels_onehot.nrows() != batch_size || labels_onehot.ncols() < 2 {
            return Err(Error::ShapeMismatch {
                what: "labels_onehot",
                expected: format!("({}, 2)", batch_size),
                got: format!("({}, {})", labels_onehot.nrows(), labels_onehot.ncols()),
            });
        }

        if let Some(lengths) = lengths {
            if lengths.len() != batch_size {
                return Err(Error::ShapeMismatch {
                    what: "lengths",
                    expected: format!("{} entries", batch_size),
                    got: format!("{} entries", lengths.len()),
                });
            }
            if let Some(&l) = lengths.iter().find(|&&l| l > total_time) {
                return Err(Error::InvalidLength(format!(
                    "length {} exceeds total_time {}",
                    l, total_time
                )));
            }
        }

        let batch_labels: Vec<f64> = labels_onehot.column(1).iter().cloned().collect();
        if let Some(l) = batch_labels.iter().find(|&&l| l != 0.0 && l != 1.0) {
            return Err(Error::InvalidLabels(format!(
                "one-hot label column holds {}, expected 0 or 1",
                l
            )));
        }

        for i in 0..batch_size {
            self.scores
                .extend(pred_frames.row(i).iter().take(total_time).cloned());
        }
        self.labels.extend(batch_labels);
        if let Some(lengths) = lengths.filter(|l| !l.is_empty()) {
            self.lengths
                .get_or_insert_with(Vec::new)
                .extend_from_slice(lengths);
        }

        tracing::trace!(batch_size, videos = self.labels.len(), "accumulated batch");
        Ok(())
    }

    /// Number of videos collected so far.
    pub fn num_videos(&self) -> usize {
        self.labels.len()
    }

    /// Collected scores, `num_videos x total_time`.
    pub fn score_matrix(&self) -> DMatrix<f64> {
        DMatrix::from_row_slice(self.num_videos(), self.config.total_time, &self.scores)
    }

    /// Collected labels.
    pub fn labels(&self) -> &[f64] {
        &self.labels
    }

    /// Collected valid lengths, if batches carried them.
    pub fn lengths(&self) -> Option<&[usize]> {
        self.lengths.as_deref()
    }

    /// Evaluate everything collected so far.
    pub fn evaluate(&self) -> Result<AccidentMetrics> {
        evaluate(&self.score_matrix(), &self.labels, self.lengths(), &self.config)
    }

    /// Drop all collected batches.
    pub fn reset(&mut self) {
        self.scores.clear();
        self.labels.clear();
        self.lengths = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn onehot(labels: &[f64]) -> DMatrix<f64> {
        DMatrix::from_fn(labels.len(), 2, |i, k| if k == 1 { labels[i] } else { 1.0 - labels[i] })
    }

    #[test]
    fn test_accumulate_truncates_frames() {
        let mut acc = RiskAccumulator::new(EvaluationConfig::new(4));
        // 6 frames per clip, only the first 4 are scored
        let batch = DMatrix::from_row_slice(2, 6, &[
            0.0, 0.0, 0.6, 0.9, 0.99, 0.99,
            0.1, 0.2, 0.1, 0.0, 0.99, 0.99,
        ]);
        acc.update(&batch, &onehot(&[1.0, 0.0])).unwrap();

        assert_eq!(acc.num_videos(), 2);
        let scores = acc.score_matrix();
        assert_eq!(scores.shape(), (2, 4));
        assert_relative_eq!(scores[(0, 3)], 0.9);
        assert_relative_eq!(scores[(1, 1)], 0.2);
        assert_eq!(acc.labels(), &[1.0, 0.0]);
    }

    #[test]
    fn test_multiple_batches_match_direct_evaluation() {
        let config = EvaluationConfig::new(3);
        let mut acc = RiskAccumulator::new(config);
        acc.update(
            &DMatrix::from_row_slice(2, 3, &[0.2, 0.7, 0.4, 0.1, 0.3, 0.5]),
            &onehot(&[1.0, 1.0]),
        )
        .unwrap();
        acc.update(&DMatrix::from_row_slice(1, 3, &[0.6, 0.8, 0.0]), &onehot(&[0.0]))
            .unwrap();

        let direct = evaluate(
            &DMatrix::from_row_slice(3, 3, &[0.2, 0.7, 0.4, 0.1, 0.3, 0.5, 0.6, 0.8, 0.0]),
            &[1.0, 1.0, 0.0],
            None,
            &config,
        )
        .unwrap();
        let accumulated = acc.evaluate().unwrap();

        assert_relative_eq!(accumulated.average_precision, direct.average_precision);
        assert_relative_eq!(accumulated.average_precision, 5.0 / 12.0, epsilon = 1e-12);
    }

    #[test]
    fn test_too_few_frames() {
        let mut acc = RiskAccumulator::new(EvaluationConfig::new(90));
        let err = acc
            .update(&DMatrix::zeros(1, 50), &onehot(&[1.0]))
            .unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { what: "pred_frames", .. }));
        assert_eq!(acc.num_videos(), 0);
    }

    #[test]
    fn test_label_shape_mismatch() {
        let mut acc = RiskAccumulator::new(EvaluationConfig::new(2));
        let err = acc
            .update(&DMatrix::zeros(2, 2), &onehot(&[1.0]))
            .unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { what: "labels_onehot", .. }));
    }

    #[test]
    fn test_empty_batch_with_lengths_does_not_lock_mode() {
        let mut acc = RiskAccumulator::new(EvaluationConfig::new(2));
        acc.update_with_lengths(&DMatrix::zeros(0, 2), &DMatrix::zeros(0, 2), &[])
            .unwrap();
        assert_eq!(acc.num_videos(), 0);
        assert_eq!(acc.lengths(), None);

        acc.update(&DMatrix::zeros(1, 2), &onehot(&[1.0])).unwrap();
        assert_eq!(acc.num_videos(), 1);
    }

    #[test]
    fn test_lengths_cannot_be_mixed() {
        let mut acc = RiskAccumulator::new(EvaluationConfig::new(2));
        acc.update_with_lengths(&DMatrix::zeros(1, 2), &onehot(&[1.0]), &[2])
            .unwrap();
        assert!(acc.update(&DMatrix::zeros(1, 2), &onehot(&[0.0])).is_err());
        assert_eq!(acc.lengths(), Some(&[2usize][..]));

        acc.reset();
        acc.update(&DMatrix::zeros(1, 2), &onehot(&[0.0])).unwrap();
        assert!(acc
            .update_with_lengths(&DMatrix::zeros(1, 2), &onehot(&[1.0]), &[1])
            .is_err());
    }
}
