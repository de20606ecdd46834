//! Per-clip object detections, the input of the graph builder.

use crate::{Error, Result};
use nalgebra::DMatrix;

/// Number of leading columns that hold box coordinates `[x1, y1, x2, y2]`.
pub const NUM_COORDS: usize = 4;

/// Detected boxes for every frame of a clip.
///
/// Conceptually a `(num_frames, num_boxes, num_attrs)` array, stored as one
/// `num_boxes x num_attrs` matrix per frame. Only the first four attributes
/// (`x1, y1, x2, y2`) are read; the remaining ones (class, score, ...) are kept
/// as they came from the detector.
///
/// The box count is fixed per clip. Padding or truncating to that count is up to
/// whoever produced the detections.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipDetections {
    frames: Vec<DMatrix<f64>>,
    num_boxes: usize,
}

impl ClipDetections {
    /// Create clip detections from per-frame box matrices.
    ///
    /// # Arguments
    /// * `frames` - One matrix per frame, each `num_boxes x num_attrs` with `num_attrs >= 4`
    ///
    /// # Returns
    /// Validated detections, or `Error::MalformedDetections` naming the offending frame
    pub fn new(frames: Vec<DMatrix<f64>>) -> Result<Self> {
        let num_boxes = frames.first().map_or(0, |f| f.nrows());

        for (t, frame) in frames.iter().enumerate() {
            if frame.nrows() != num_boxes {
                return Err(Error::MalformedDetections(format!(
                    "frame {} has {} boxes, expected {} (box count must be fixed per clip)",
                    t,
                    frame.nrows(),
                    num_boxes
                )));
            }
            if num_boxes > 0 && frame.ncols() < NUM_COORDS {
                return Err(Error::MalformedDetections(format!(
                    "frame {} has {} attributes per box, need at least {} coordinates",
                    t,
                    frame.ncols(),
                    NUM_COORDS
                )));
            }
        }

        Ok(Self { frames, num_boxes })
    }

    /// Create clip detections from a flat row-major `(num_frames, num_boxes, num_attrs)` buffer.
    pub fn from_slice(
        data: &[f64],
        num_frames: usize,
        num_boxes: usize,
        num_attrs: usize,
    ) -> Result<Self> {
        if num_attrs < NUM_COORDS {
            return Err(Error::MalformedDetections(format!(
                "{} attributes per box, need at least {} coordinates",
                num_attrs, NUM_COORDS
            )));
        }

        let frame_len = num_boxes * num_attrs;
        if data.len() != num_frames * frame_len {
            return Err(Error::MalformedDetections(format!(
                "buffer length {} doesn't match {}x{}x{}",
                data.len(),
                num_frames,
                num_boxes,
                num_attrs
            )));
        }

        let frames = if frame_len == 0 {
            vec![DMatrix::zeros(num_boxes, num_attrs); num_frames]
        } else {
            data.chunks_exact(frame_len)
                .map(|chunk| DMatrix::from_row_slice(num_boxes, num_attrs, chunk))
                .collect()
        };

        Ok(Self { frames, num_boxes })
    }

    /// Clip of `num_frames` frames with `num_boxes` zeroed boxes each.
    pub fn empty(num_frames: usize, num_boxes: usize) -> Self {
        Self {
            frames: vec![DMatrix::zeros(num_boxes, NUM_COORDS); num_frames],
            num_boxes,
        }
    }

    /// Number of frames in the clip.
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Number of boxes per frame.
    pub fn num_boxes(&self) -> usize {
        self.num_boxes
    }

    /// Box matrix of frame `t`.
    pub fn frame(&self, t: usize) -> Option<&DMatrix<f64>> {
        self.frames.get(t)
    }

    /// Iterate over per-frame box matrices.
    pub fn frames(&self) -> impl Iterator<Item = &DMatrix<f64>> {
        self.frames.iter()
    }

    /// Box centers of frame `t` as a `num_boxes x 2` matrix.
    pub fn centers(&self, t: usize) -> Option<DMatrix<f64>> {
        self.frames.get(t).map(box_centers)
    }
}

/// Centers `((x1 + x2) / 2, (y1 + y2) / 2)` of a `n x (>= 4)` box matrix.
pub fn box_centers(boxes: &DMatrix<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(boxes.nrows(), 2, |i, k| {
        0.5 * (boxes[(i, k)] + boxes[(i, k + 2)])
    })
}
