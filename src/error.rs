//! Error types for the head tracking library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// No face was observed within the acquisition window
    #[error("no face detected during acquisition")]
    NoFaceDetected,

    /// The landmark source has no more frames to deliver
    #[error("landmark source exhausted")]
    SourceExhausted,

    /// A filter received a non-increasing timestamp
    #[error("non-increasing filter timestamp: {prev} -> {next}")]
    InvalidTimestamp { prev: f64, next: f64 },

    /// The detector's landmark list does not cover the tracked indices
    #[error("insufficient landmarks: need {required} points to cover the tracked indices, got {got}")]
    InsufficientLandmarks { required: usize, got: usize },

    /// A pose packet had the wrong length
    #[error("malformed pose packet: expected {expected} bytes, got {got}")]
    MalformedPacket { expected: usize, got: usize },

    /// Landmark source failure (camera fault, detector crash, ...)
    #[error("landmark source error: {0}")]
    Source(String),

    /// Invalid input parameters provided
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// File or socket I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
