use crate::constants::{DEFAULT_BETA, DEFAULT_D_CUTOFF, DEFAULT_MIN_CUTOFF};
use crate::{Error, Result};

/// Tuning parameters for [`OneEuroFilter`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    /// Minimum cutoff frequency in Hz, lower values smooth more at rest
    pub min_cutoff: f64,
    /// Speed coefficient, higher values reduce lag during fast motion
    pub beta: f64,
    /// Cutoff frequency for the derivative estimate in Hz
    pub d_cutoff: f64,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            min_cutoff: DEFAULT_MIN_CUTOFF,
            beta: DEFAULT_BETA,
            d_cutoff: DEFAULT_D_CUTOFF,
        }
    }
}

/// Smoothing coefficient of a first-order low-pass stage for one time step
fn smoothing_factor(t_e: f64, cutoff: f64) -> f64 {
    let r = 2.0 * std::f64::consts::PI * cutoff * t_e;
    r / (r + 1.0)
}

fn exponential_smoothing(a: f64, x: f64, x_prev: f64) -> f64 {
    a * x + (1.0 - a) * x_prev
}

/// Adaptive low-pass (one-euro) filter.
///
/// The cutoff frequency rises with the estimated signal velocity, so the
/// filter smooths aggressively while the head is still and follows closely
/// while it moves. Constructed with a seed sample; the seed passes through
/// unmodified and becomes the first previous value.
#[derive(Debug)]
pub struct OneEuroFilter {
    min_cutoff: f64,
    beta: f64,
    d_cutoff: f64,

    x_prev: f64,
    dx_prev: f64,
    t_prev: f64,
}

impl OneEuroFilter {
    /// Create a filter seeded with an initial timestamp and value,
    /// using the default tuning
    #[must_use]
    pub fn new(t0: f64, x0: f64) -> Self {
        Self::with_params(t0, x0, FilterParams::default())
    }

    /// Create a filter seeded with an initial timestamp and value
    ///
    /// # Panics
    ///
    /// Panics if `min_cutoff` or `d_cutoff` is not positive, or if `beta`
    /// is negative
    #[must_use]
    pub fn with_params(t0: f64, x0: f64, params: FilterParams) -> Self {
        assert!(params.min_cutoff > 0.0, "Minimum cutoff must be positive");
        assert!(params.d_cutoff > 0.0, "Derivative cutoff must be positive");
        assert!(params.beta >= 0.0, "Beta must be non-negative");
        Self {
            min_cutoff: params.min_cutoff,
            beta: params.beta,
            d_cutoff: params.d_cutoff,
            x_prev: x0,
            dx_prev: 0.0,
            t_prev: t0,
        }
    }

    /// Most recent filter output (the seed value until the first update)
    #[must_use]
    pub fn value(&self) -> f64 {
        self.x_prev
    }

    /// Feed one raw sample and return the smoothed value.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTimestamp` if `t` is not strictly greater than the
    /// previous timestamp; filter state is left untouched so the caller can
    /// reuse [`value`](Self::value) and continue.
    pub fn filter(&mut self, t: f64, x: f64) -> Result<f64> {
        let t_e = t - self.t_prev;
        if t_e <= 0.0 {
            return Err(Error::InvalidTimestamp {
                prev: self.t_prev,
                next: t,
            });
        }

        // Filtered derivative of the signal
        let a_d = smoothing_factor(t_e, self.d_cutoff);
        let dx = (x - self.x_prev) / t_e;
        let dx_hat = exponential_smoothing(a_d, dx, self.dx_prev);

        // Cutoff adapts to the estimated velocity
        let cutoff = self.min_cutoff + self.beta * dx_hat.abs();
        let a = smoothing_factor(t_e, cutoff);
        let x_hat = exponential_smoothing(a, x, self.x_prev);

        self.x_prev = x_hat;
        self.dx_prev = dx_hat;
        self.t_prev = t;

        Ok(x_hat)
    }
}
