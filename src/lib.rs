//! Real-time 6-DOF head tracking from facial landmarks.
//!
//! This library converts a sparse stream of facial landmark positions
//! (produced by an external detector treated as a black box) into a
//! continuously updated head pose and streams it as 48-byte UDP datagrams
//! understood by opentrack's UDP input.
//!
//! The pipeline per captured frame:
//! 1. A [`landmarks::LandmarkSource`] yields an indexed landmark list for
//!    at most one face
//! 2. Five named correspondence points are extracted and smoothed by
//!    per-axis one-euro filters
//! 3. Rotation is estimated against a neutral reference snapshot via SVD
//!    of the cross-covariance matrix; position from the scaled cheek
//!    midpoint displacement
//! 4. The pose is packed into the fixed binary layout and sent at the
//!    capture rate
//!
//! # Examples
//!
//! ```no_run
//! use head_tracker::replay::ReplaySource;
//! use head_tracker::tracker::{Tracker, TrackerConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = ReplaySource::from_file("session.txt")?;
//! let mut tracker = Tracker::new(TrackerConfig::default());
//!
//! // Blocks until a face is acquired, then streams in the background
//! tracker.start(Box::new(source), "127.0.0.1:4242".parse()?)?;
//!
//! // Re-zero the neutral pose at any time, e.g. from a hotkey handler
//! tracker.center();
//!
//! // Joins the loop; no datagrams are sent after this returns
//! tracker.stop();
//! # Ok(())
//! # }
//! ```

/// Landmark correspondence extraction and the detector source trait
pub mod landmarks;

/// Signal filtering algorithms for smoothing landmark coordinates
pub mod filters;

/// Head pose estimation from tracked points
pub mod head;

/// Fixed binary pose datagram codec
pub mod protocol;

/// File-backed landmark source for replaying recorded sessions
pub mod replay;

/// Tracking loop with start/stop/center lifecycle
pub mod tracker;

/// Error types and result handling
pub mod error;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
