//! Precision/recall/time curve reduction and integration.

use serde::Serialize;

use super::SweepPoint;
use crate::internal::numpy::{argmin_abs_diff, nanmax, nanmean};
use crate::{Error, Result};

/// One point of the cleaned curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    pub precision: f64,
    pub recall: f64,
    /// Time-to-accident as a fraction of clip length, NaN when undefined.
    pub time: f64,
}

/// Precision-recall curve with one point per distinct recall, sorted by recall.
///
/// Points sharing a recall are merged into their envelope (maximum precision,
/// maximum time). Points without a defined precision or recall are dropped.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PrecisionRecallCurve {
    points: Vec<CurvePoint>,
}

impl PrecisionRecallCurve {
    /// Reduce raw sweep points to the curve.
    pub fn from_sweep(sweep: &[SweepPoint]) -> Self {
        let mut sorted: Vec<&SweepPoint> = sweep.iter().filter(|p| !p.recall.is_nan()).collect();
        // Stable: equal recalls keep threshold order
        sorted.sort_by(|a, b| a.recall.total_cmp(&b.recall));

        let mut points = Vec::new();
        let mut start = 0;
        while start < sorted.len() {
            let recall = sorted[start].recall;
            let end = start
                + sorted[start..]
                    .iter()
                    .take_while(|p| p.recall == recall)
                    .count();
            let group = &sorted[start..end];

            let precision = nanmax(group.iter().map(|p| p.precision));
            let time = nanmax(group.iter().map(|p| p.time));
            if !precision.is_nan() {
                points.push(CurvePoint { precision, recall, time });
            }

            start = end;
        }

        Self { points }
    }

    /// Curve points, ascending recall.
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn recall(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.recall).collect()
    }

    pub fn precision(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.precision).collect()
    }

    pub fn time(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.time).collect()
    }

    /// Area under the curve by trapezoidal integration over recall.
    ///
    /// When the first point has non-zero recall, the segment from recall 0 is
    /// counted as a rectangle at the first precision.
    pub fn average_precision(&self) -> Result<f64> {
        let first = self.points.first().ok_or_else(|| {
            Error::UndefinedAveragePrecision(
                "no threshold produced a defined precision and recall".to_string(),
            )
        })?;

        let mut ap = 0.0;
        if first.recall != 0.0 {
            ap += first.precision * first.recall;
        }
        for pair in self.points.windows(2) {
            ap += (pair[0].precision + pair[1].precision) * (pair[1].recall - pair[0].recall) / 2.0;
        }

        Ok(ap)
    }

    /// Mean time-to-accident fraction over the curve, ignoring undefined times.
    pub fn mean_time(&self) -> Option<f64> {
        let mean = nanmean(self.points.iter().map(|p| p.time));
        (!mean.is_nan()).then_some(mean)
    }

    /// Time-to-accident fraction at the point whose recall is closest to `target`.
    pub fn time_at_recall(&self, target: f64) -> Option<f64> {
        let idx = argmin_abs_diff(&self.recall(), target)?;
        let time = self.points[idx].time;
        (!time.is_nan()).then_some(time)
    }
}
