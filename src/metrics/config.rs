//! Evaluation settings.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Configuration for accident metric evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Number of scored frames per video (columns of the score matrix).
    pub total_time: usize,

    /// Factor turning a time-to-accident fraction into seconds.
    ///
    /// Clips span a fixed duration, so a fraction of the clip maps linearly to
    /// seconds before the accident. 5.0 matches 100-frame clips at 20 fps.
    pub time_scale: f64,

    /// Recall at which the operating-point time-to-accident is reported.
    pub recall_target: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            total_time: 90,
            time_scale: 5.0,
            recall_target: 0.8,
        }
    }
}

impl EvaluationConfig {
    /// Create a configuration for `total_time` scored frames per video.
    pub fn new(total_time: usize) -> Self {
        Self {
            total_time,
            ..Self::default()
        }
    }

    /// Set the fraction-to-seconds factor.
    pub fn with_time_scale(mut self, time_scale: f64) -> Self {
        self.time_scale = time_scale;
        self
    }

    /// Set the recall operating point.
    pub fn with_recall_target(mut self, recall_target: f64) -> Self {
        self.recall_target = recall_target;
        self
    }

    /// Check that every field is usable.
    pub fn validate(&self) -> Result<()> {
        if self.total_time == 0 {
            return Err(Error::InvalidConfig(
                "total_time must be positive".to_string(),
            ));
        }

        if !self.time_scale.is_finite() || self.time_scale < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "time_scale must be a non-negative finite number, got {}",
                self.time_scale
            )));
        }

        if !(0.0..=1.0).contains(&self.recall_target) {
            return Err(Error::InvalidConfig(format!(
                "recall_target must be within [0, 1], got {}",
                self.recall_target
            )));
        }

        Ok(())
    }
}
