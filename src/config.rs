//! Configuration management for the head tracker

use serde::{Deserialize, Serialize};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::Path;

use crate::constants::{
    DEFAULT_ACQUISITION_TIMEOUT_SECS, DEFAULT_BETA, DEFAULT_D_CUTOFF, DEFAULT_FPS, DEFAULT_HOST,
    DEFAULT_MIN_CUTOFF, DEFAULT_PORT,
};
use crate::filters::FilterParams;
use crate::tracker::TrackerConfig;
use crate::{Error, Result};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Datagram output configuration
    pub output: OutputConfig,

    /// Tracking loop configuration
    pub tracking: TrackingConfig,

    /// Smoothing filter configuration
    pub filter: FilterConfig,
}

/// Datagram destination
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Destination host (IP address or resolvable name)
    pub host: String,

    /// Destination port
    pub port: u16,
}

/// Tracking loop parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Capture frame rate; bounds the emission rate
    pub fps: f64,

    /// Seconds to wait for a face during startup
    pub acquisition_timeout_secs: f64,
}

/// One-euro filter parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Minimum cutoff frequency in Hz
    pub min_cutoff: f64,

    /// Speed coefficient
    pub beta: f64,

    /// Derivative cutoff frequency in Hz
    pub d_cutoff: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: OutputConfig::default(),
            tracking: TrackingConfig::default(),
            filter: FilterConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            acquisition_timeout_secs: DEFAULT_ACQUISITION_TIMEOUT_SECS,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_cutoff: DEFAULT_MIN_CUTOFF,
            beta: DEFAULT_BETA,
            d_cutoff: DEFAULT_D_CUTOFF,
        }
    }
}

impl From<&FilterConfig> for FilterParams {
    fn from(config: &FilterConfig) -> Self {
        Self {
            min_cutoff: config.min_cutoff,
            beta: config.beta,
            d_cutoff: config.d_cutoff,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid YAML, or
    /// fails validation
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            serde_yaml::from_str(&content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that all parameters are usable
    ///
    /// # Errors
    ///
    /// Returns `Config` describing the first offending parameter
    pub fn validate(&self) -> Result<()> {
        if self.output.host.is_empty() {
            return Err(Error::Config("output host must not be empty".to_string()));
        }
        if !self.tracking.fps.is_finite() || self.tracking.fps <= 0.0 {
            return Err(Error::Config(format!(
                "fps must be positive, got {}",
                self.tracking.fps
            )));
        }
        if self.tracking.acquisition_timeout_secs <= 0.0 {
            return Err(Error::Config(format!(
                "acquisition timeout must be positive, got {}",
                self.tracking.acquisition_timeout_secs
            )));
        }
        if self.filter.min_cutoff <= 0.0 {
            return Err(Error::Config(format!(
                "filter min_cutoff must be positive, got {}",
                self.filter.min_cutoff
            )));
        }
        if self.filter.d_cutoff <= 0.0 {
            return Err(Error::Config(format!(
                "filter d_cutoff must be positive, got {}",
                self.filter.d_cutoff
            )));
        }
        if self.filter.beta < 0.0 {
            return Err(Error::Config(format!(
                "filter beta must be non-negative, got {}",
                self.filter.beta
            )));
        }
        Ok(())
    }

    /// Datagram destination resolved from the output host and port
    ///
    /// # Errors
    ///
    /// Returns an error if the host does not resolve to an address
    pub fn destination(&self) -> Result<SocketAddr> {
        (self.output.host.as_str(), self.output.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| Error::Config(format!("cannot resolve host {}", self.output.host)))
    }

    /// Tracker-facing view of this configuration
    #[must_use]
    pub fn tracker(&self) -> TrackerConfig {
        TrackerConfig {
            fps: self.tracking.fps,
            acquisition_timeout_secs: self.tracking.acquisition_timeout_secs,
            filter: FilterParams::from(&self.filter),
        }
    }
}
