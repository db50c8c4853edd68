//! Constants used throughout the application

/// Landmark index of the forehead point in the detector's face mesh
pub const INDEX_TOP: usize = 10;

/// Landmark index of the chin point
pub const INDEX_BOTTOM: usize = 152;

/// Landmark index of the left cheek point
pub const INDEX_LEFT: usize = 234;

/// Landmark index of the right cheek point
pub const INDEX_RIGHT: usize = 454;

/// Landmark index of the nose bridge point
pub const INDEX_CENTER: usize = 6;

/// Number of tracked correspondence points
pub const NUM_TRACKED_POINTS: usize = 5;

/// Minimum length of an indexed landmark list covering all tracked indices
pub const MIN_LANDMARK_COUNT: usize = INDEX_RIGHT + 1;

/// Scale from normalized image displacement to output position units
pub const POSITION_FACTOR: f64 = 30.0;

/// Default capture frame rate
pub const DEFAULT_FPS: f64 = 30.0;

/// Default minimum cutoff frequency for the one-euro filter
pub const DEFAULT_MIN_CUTOFF: f64 = 5.0;

/// Default speed coefficient for the one-euro filter
pub const DEFAULT_BETA: f64 = 0.8;

/// Default derivative cutoff frequency for the one-euro filter
pub const DEFAULT_D_CUTOFF: f64 = 0.1;

/// Number of channels in a pose packet
pub const POSE_CHANNELS: usize = 6;

/// Fixed size of an encoded pose packet in bytes
pub const POSE_PACKET_BYTES: usize = POSE_CHANNELS * 8;

/// Default datagram destination host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default datagram destination port
pub const DEFAULT_PORT: u16 = 4242;

/// Default face acquisition timeout in seconds
pub const DEFAULT_ACQUISITION_TIMEOUT_SECS: f64 = 10.0;
