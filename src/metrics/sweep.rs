//! Threshold sweep over observed risk scores.

use nalgebra::DMatrix;
use serde::Serialize;

use crate::internal::numpy::{prefix_max, sorted_unique};
use crate::{Error, Result};

/// Precision, recall and time-to-accident at one threshold.
///
/// Each value is NaN when undefined: precision when no video reaches the
/// threshold, recall when there are no positive videos, time when no positive
/// video reaches the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepPoint {
    pub threshold: f64,
    pub precision: f64,
    pub recall: f64,
    pub time: f64,
}

/// Per-video data the sweep needs, computed once.
#[derive(Debug, Clone)]
struct VideoScores {
    /// Running maximum of the (masked) scores; the first index reaching a
    /// threshold here is the first frame whose score reaches it.
    running_max: Vec<f64>,
    positive: bool,
    length: usize,
}

/// Zero the scores of frames `[0, total_time - length[i])` of every video.
///
/// Valid frames are right-aligned: the last `length[i]` frames of row `i` are kept.
pub fn mask_padding(all_pred: &DMatrix<f64>, length: &[usize]) -> Result<DMatrix<f64>> {
    let (num_videos, total_time) = all_pred.shape();
    validate_lengths(length, num_videos, total_time)?;

    Ok(DMatrix::from_fn(num_videos, total_time, |i, t| {
        if t < total_time - length[i] {
            0.0
        } else {
            all_pred[(i, t)]
        }
    }))
}

fn validate_lengths(length: &[usize], num_videos: usize, total_time: usize) -> Result<()> {
    if length.len() != num_videos {
        return Err(Error::ShapeMismatch {
            what: "length",
            expected: format!("{} entries (one per video)", num_videos),
            got: format!("{} entries", length.len()),
        });
    }

    if let Some((i, l)) = length.iter().enumerate().find(|(_, &l)| l > total_time) {
        return Err(Error::InvalidLength(format!(
            "video {} has length {} but only {} frames are scored",
            i, l, total_time
        )));
    }

    Ok(())
}

/// Sweep of every observed score value as a classification threshold.
///
/// A video is predicted positive at threshold `th` if any frame scores `>= th`;
/// it is a true positive if, in addition, its label is 1. Time-to-accident of a
/// true positive is `t0 / length`, `t0` being the first frame reaching `th`
/// (indexed over the full row, padding included).
#[derive(Debug, Clone)]
pub struct ThresholdSweep {
    videos: Vec<VideoScores>,
    thresholds: Vec<f64>,
    num_positive: usize,
}

impl ThresholdSweep {
    /// Prepare a sweep.
    ///
    /// # Arguments
    /// * `all_pred` - Risk scores, `N x total_time`, finite and non-negative
    /// * `all_labels` - One 0/1 label per video
    /// * `length` - Optional valid length per video; when given, padding frames
    ///   are zeroed and a threshold of exactly 0 is not swept
    /// * `total_time` - Expected number of score columns
    pub fn new(
        all_pred: &DMatrix<f64>,
        all_labels: &[f64],
        length: Option<&[usize]>,
        total_time: usize,
    ) -> Result<Self> {
        let (num_videos, num_frames) = all_pred.shape();

        if num_frames != total_time {
            return Err(Error::ShapeMismatch {
                what: "all_pred",
                expected: format!("{} columns (total_time)", total_time),
                got: format!("{} columns", num_frames),
            });
        }

        if all_labels.len() != num_videos {
            return Err(Error::ShapeMismatch {
                what: "all_labels",
                expected: format!("{} labels (one per video)", num_videos),
                got: format!("{} labels", all_labels.len()),
            });
        }

        if let Some((i, l)) = all_labels
            .iter()
            .enumerate()
            .find(|(_, &l)| l != 0.0 && l != 1.0)
        {
            return Err(Error::InvalidLabels(format!(
                "label of video {} is {}, expected 0 or 1",
                i, l
            )));
        }

        if let Some(v) = all_pred.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(Error::InvalidScores(format!(
                "risk scores must be finite and non-negative, found {}",
                v
            )));
        }

        let scores = match length {
            Some(length) => mask_padding(all_pred, length)?,
            None => all_pred.clone(),
        };

        let videos: Vec<VideoScores> = (0..num_videos)
            .map(|i| {
                let row: Vec<f64> = scores.row(i).iter().cloned().collect();
                VideoScores {
                    running_max: prefix_max(&row),
                    positive: all_labels[i] == 1.0,
                    length: length.map_or(total_time, |l| l[i]),
                }
            })
            .collect();

        let mut thresholds = sorted_unique(scores.iter().cloned());
        if length.is_some() {
            // Zero would flag every masked padding frame
            thresholds.retain(|&th| th != 0.0);
        }

        let num_positive = videos.iter().filter(|v| v.positive).count();

        Ok(Self {
            videos,
            thresholds,
            num_positive,
        })
    }

    /// Candidate thresholds, ascending and distinct.
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Number of videos.
    pub fn num_videos(&self) -> usize {
        self.videos.len()
    }

    /// Number of videos labelled positive.
    pub fn num_positive(&self) -> usize {
        self.num_positive
    }

    /// Precision, recall and time at a single threshold.
    pub fn point_at(&self, threshold: f64) -> SweepPoint {
        let mut tp = 0usize;
        let mut tp_fp = 0usize;
        let mut time_sum = 0.0;

        for video in &self.videos {
            match video.running_max.last() {
                Some(&max) if max >= threshold => {}
                _ => continue,
            }
            tp_fp += 1;

            if video.positive {
                tp += 1;
                let first_hit = video.running_max.partition_point(|&m| m < threshold);
                time_sum += first_hit as f64 / video.length as f64;
            }
        }

        let precision = if tp_fp == 0 {
            f64::NAN
        } else {
            tp as f64 / tp_fp as f64
        };
        let recall = if self.num_positive == 0 {
            f64::NAN
        } else {
            tp as f64 / self.num_positive as f64
        };
        let time = if tp == 0 {
            f64::NAN
        } else {
            1.0 - time_sum / tp as f64
        };

        SweepPoint {
            threshold,
            precision,
            recall,
            time,
        }
    }

    /// Evaluate every candidate threshold, in ascending threshold order.
    pub fn run(&self) -> Vec<SweepPoint> {
        #[cfg(feature = "parallel")]
        let points: Vec<SweepPoint> = {
            use rayon::prelude::*;
            self.thresholds
                .par_iter()
                .map(|&th| self.point_at(th))
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let points: Vec<SweepPoint> = self.thresholds.iter().map(|&th| self.point_at(th)).collect();

        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_video_scores() -> DMatrix<f64> {
        DMatrix::from_row_slice(2, 4, &[
            0.0, 0.0, 0.6, 0.9,
            0.1, 0.2, 0.1, 0.0,
        ])
    }

    #[test]
    fn test_thresholds_are_observed_values() {
        let sweep = ThresholdSweep::new(&two_video_scores(), &[1.0, 0.0], None, 4).unwrap();
        assert_eq!(sweep.thresholds(), &[0.0, 0.1, 0.2, 0.6, 0.9]);
        assert_eq!(sweep.num_positive(), 1);
    }

    #[test]
    fn test_point_at_0_6() {
        let sweep = ThresholdSweep::new(&two_video_scores(), &[1.0, 0.0], None, 4).unwrap();
        let point = sweep.point_at(0.6);

        // Video 0 first reaches 0.6 at frame 2; video 1 never does
        assert_relative_eq!(point.precision, 1.0);
        assert_relative_eq!(point.recall, 1.0);
        assert_relative_eq!(point.time, 0.5);
    }

    #[test]
    fn test_full_sweep_points() {
        let sweep = ThresholdSweep::new(&two_video_scores(), &[1.0, 0.0], None, 4).unwrap();
        let points = sweep.run();

        let precision: Vec<f64> = points.iter().map(|p| p.precision).collect();
        let recall: Vec<f64> = points.iter().map(|p| p.recall).collect();
        let time: Vec<f64> = points.iter().map(|p| p.time).collect();

        assert_eq!(precision, vec![0.5, 0.5, 0.5, 1.0, 1.0]);
        assert_eq!(recall, vec![1.0; 5]);
        assert_eq!(time, vec![1.0, 0.5, 0.5, 0.5, 0.25]);
    }

    #[test]
    fn test_negative_video_never_true_positive() {
        // At threshold 0 the negative video reaches the threshold but only counts
        // as a false positive
        let sweep = ThresholdSweep::new(&two_video_scores(), &[1.0, 0.0], None, 4).unwrap();
        let point = sweep.point_at(0.0);

        assert_relative_eq!(point.precision, 0.5);
        assert_relative_eq!(point.recall, 1.0);
    }

    #[test]
    fn test_undefined_values_are_nan() {
        let scores = DMatrix::from_row_slice(2, 2, &[0.2, 0.3, 0.9, 0.1]);
        let sweep = ThresholdSweep::new(&scores, &[1.0, 0.0], None, 2).unwrap();

        // Only the negative video reaches 0.9
        let point = sweep.point_at(0.9);
        assert_eq!(point.precision, 0.0);
        assert_eq!(point.recall, 0.0);
        assert!(point.time.is_nan());

        // Nobody reaches 2.0
        assert!(sweep.point_at(2.0).precision.is_nan());

        // No positives at all
        let sweep = ThresholdSweep::new(&scores, &[0.0, 0.0], None, 2).unwrap();
        assert!(sweep.point_at(0.2).recall.is_nan());
    }

    #[test]
    fn test_length_masks_padding_and_skips_zero() {
        let length = [2usize, 4];
        let sweep =
            ThresholdSweep::new(&two_video_scores(), &[1.0, 0.0], Some(&length[..]), 4).unwrap();

        // 0.0 is no longer a candidate; video 1 keeps all frames
        assert_eq!(sweep.thresholds(), &[0.1, 0.2, 0.6, 0.9]);

        // Video 0 first reaches 0.6 at frame 2, divided by its length of 2
        let point = sweep.point_at(0.6);
        assert_relative_eq!(point.time, 0.0);
    }

    #[test]
    fn test_mask_padding() {
        let masked = mask_padding(&two_video_scores(), &[1, 3]).unwrap();
        assert_eq!(masked.row(0).iter().cloned().collect::<Vec<_>>(), vec![0.0, 0.0, 0.0, 0.9]);
        assert_eq!(masked.row(1).iter().cloned().collect::<Vec<_>>(), vec![0.0, 0.2, 0.1, 0.0]);
    }

    #[test]
    fn test_input_validation() {
        let scores = two_video_scores();

        let err = ThresholdSweep::new(&scores, &[1.0], None, 4).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { what: "all_labels", .. }));

        let err = ThresholdSweep::new(&scores, &[1.0, 0.0], None, 5).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { what: "all_pred", .. }));

        let err = ThresholdSweep::new(&scores, &[1.0, 2.0], None, 4).unwrap_err();
        assert!(matches!(err, Error::InvalidLabels(_)));

        let err = ThresholdSweep::new(&scores, &[1.0, 0.0], Some(&[4, 5][..]), 4).unwrap_err();
        assert!(matches!(err, Error::InvalidLength(_)));

        let err = ThresholdSweep::new(&scores, &[1.0, 0.0], Some(&[4][..]), 4).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { what: "length", .. }));

        let bad = DMatrix::from_row_slice(1, 2, &[0.5, f64::NAN]);
        let err = ThresholdSweep::new(&bad, &[1.0], None, 2).unwrap_err();
        assert!(matches!(err, Error::InvalidScores(_)));

        let negative = DMatrix::from_row_slice(1, 2, &[0.5, -0.1]);
        let err = ThresholdSweep::new(&negative, &[1.0], None, 2).unwrap_err();
        assert!(matches!(err, Error::InvalidScores(_)));
    }
}
