//! Landmark correspondence extraction and the detector-facing source trait.

use nalgebra::Point3;

use crate::constants::{
    INDEX_BOTTOM, INDEX_CENTER, INDEX_LEFT, INDEX_RIGHT, INDEX_TOP, MIN_LANDMARK_COUNT,
};
use crate::{Error, Result};

/// A detected face as the detector delivers it: an indexed list of
/// normalized 3D landmark points
pub type IndexedLandmarks = Vec<Point3<f64>>;

/// The five named correspondence points tracked per frame.
///
/// `x` and `y` are normalized to the frame dimensions, `z` is a relative
/// depth estimate. The same semantic landmark always maps to the same
/// field, which keeps the reference snapshot and the current points
/// slot-aligned without index bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandmarkSample {
    pub top: Point3<f64>,
    pub bottom: Point3<f64>,
    pub left: Point3<f64>,
    pub right: Point3<f64>,
    pub center: Point3<f64>,
}

impl LandmarkSample {
    /// Extract the tracked points from a detector's indexed landmark list
    ///
    /// # Errors
    ///
    /// Returns `InsufficientLandmarks` if the list is too short to cover
    /// all tracked indices
    pub fn from_indexed(landmarks: &[Point3<f64>]) -> Result<Self> {
        if landmarks.len() < MIN_LANDMARK_COUNT {
            return Err(Error::InsufficientLandmarks {
                required: MIN_LANDMARK_COUNT,
                got: landmarks.len(),
            });
        }
        Ok(Self {
            top: landmarks[INDEX_TOP],
            bottom: landmarks[INDEX_BOTTOM],
            left: landmarks[INDEX_LEFT],
            right: landmarks[INDEX_RIGHT],
            center: landmarks[INDEX_CENTER],
        })
    }

    /// Expand back into an indexed list covering all tracked slots.
    ///
    /// Untracked indices are filled with the origin. Replay inputs and
    /// tests use this to fabricate detector output.
    #[must_use]
    pub fn to_indexed(&self) -> IndexedLandmarks {
        let mut landmarks = vec![Point3::origin(); MIN_LANDMARK_COUNT];
        landmarks[INDEX_TOP] = self.top;
        landmarks[INDEX_BOTTOM] = self.bottom;
        landmarks[INDEX_LEFT] = self.left;
        landmarks[INDEX_RIGHT] = self.right;
        landmarks[INDEX_CENTER] = self.center;
        landmarks
    }

    /// Points in slot order: top, bottom, left, right, center
    #[must_use]
    pub fn as_array(&self) -> [Point3<f64>; 5] {
        [self.top, self.bottom, self.left, self.right, self.center]
    }
}

/// Capability consumed from the external landmark detector.
///
/// `capture` blocks until the next frame has been acquired and processed.
/// Returning `Ok(None)` signals "no detection this tick" and is not an
/// error; `Err(SourceExhausted)` signals the end of the stream. Any other
/// error is a source fault and terminates tracking.
pub trait LandmarkSource: Send {
    /// Acquire the next frame and run landmark extraction on it
    ///
    /// # Errors
    ///
    /// Returns `SourceExhausted` at end of stream, or a source-specific
    /// error on acquisition failure
    fn capture(&mut self) -> Result<Option<IndexedLandmarks>>;
}
