//! Signal filtering for smoothing noisy landmark coordinates.
//!
//! Raw landmark positions from the detector jitter by a few pixels per
//! frame. Each tracked coordinate is smoothed independently by an adaptive
//! one-euro filter before any pose math runs on it.

/// Adaptive one-euro filter for per-channel smoothing
pub mod one_euro;

pub use one_euro::{FilterParams, OneEuroFilter};
