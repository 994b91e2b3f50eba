//! Configuration for trajectory resampling.
//!
//! [`ResampleConfig`] holds the target sampling rate, the spline end
//! condition and the numerical tolerances used by the engine.
//!
//! # Example
//!
//! ```
//! use se3_upsample::{EndCondition, ResampleConfig};
//!
//! // 400 Hz, the usual pseudo-IMU rate
//! let config = ResampleConfig::default();
//! assert_eq!(config.frequency, 400.0);
//!
//! let camera = ResampleConfig::new(30.0).with_end_condition(EndCondition::NotAKnot);
//! assert!(camera.validate().is_ok());
//! ```

use crate::error::{ResampleError, Result};
use crate::math::spline::EndCondition;

/// Default output rate in Hz.
///
/// Chosen to exceed twice the fastest expected measurement rate, so later
/// correlation against real sensor streams is not limited by the pseudo-IMU.
pub const DEFAULT_FREQUENCY: f64 = 400.0;

/// Default cap on the number of grid points (about 35 hours at 400 Hz).
pub const DEFAULT_MAX_SAMPLES: usize = 50_000_000;

/// Configuration for trajectory resampling.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampleConfig {
    /// Output sampling frequency (Hz). Must be positive and finite.
    pub frequency: f64,

    /// Absolute tolerance, in grid steps, added to
    /// `(t_last - t_first) * frequency` before flooring it.
    ///
    /// With a product of `9.9999999999` the last grid point is at step 10
    /// as long as the shortfall is below this value.
    pub time_epsilon: f64,

    /// Upper bound on the number of grid points.
    pub max_samples: usize,

    /// How the position spline closes its end segments.
    pub end_condition: EndCondition,

    /// Rotation angle (rad) below which the SO(3) log/exp maps switch to
    /// their Taylor expansions.
    pub small_angle: f64,
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self {
            frequency: DEFAULT_FREQUENCY,
            time_epsilon: 1e-9,
            max_samples: DEFAULT_MAX_SAMPLES,
            end_condition: EndCondition::Natural,
            small_angle: 1e-8,
        }
    }
}

impl ResampleConfig {
    /// Create a configuration with the given output frequency and default
    /// tolerances.
    #[must_use]
    pub fn new(frequency: f64) -> Self {
        Self {
            frequency,
            ..Self::default()
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ResampleError::InvalidFrequency`] for a non-positive or
    /// non-finite frequency, and [`ResampleError::InvalidConfig`] for
    /// out-of-range tolerances or a zero sample cap.
    pub fn validate(&self) -> Result<()> {
        if !(self.frequency.is_finite() && self.frequency > 0.0) {
            return Err(ResampleError::InvalidFrequency(self.frequency));
        }
        if !(self.time_epsilon >= 0.0 && self.time_epsilon < 1.0) {
            return Err(ResampleError::invalid_config(
                "time_epsilon must be in [0, 1)",
            ));
        }
        if self.max_samples == 0 {
            return Err(ResampleError::invalid_config("max_samples must be at least 1"));
        }
        if !(self.small_angle > 0.0 && self.small_angle < 1e-2) {
            return Err(ResampleError::invalid_config(
                "small_angle must be in (0, 1e-2)",
            ));
        }
        Ok(())
    }

    /// Set the output frequency.
    #[must_use]
    pub const fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = frequency;
        self
    }

    /// Set the grid end tolerance.
    #[must_use]
    pub const fn with_time_epsilon(mut self, eps: f64) -> Self {
        self.time_epsilon = eps;
        self
    }

    /// Set the grid point cap.
    #[must_use]
    pub const fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples;
        self
    }

    /// Set the spline end condition.
    #[must_use]
    pub const fn with_end_condition(mut self, end_condition: EndCondition) -> Self {
        self.end_condition = end_condition;
        self
    }

    /// Set the small-angle threshold.
    #[must_use]
    pub const fn with_small_angle(mut self, angle: f64) -> Self {
        self.small_angle = angle;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResampleConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.frequency, 400.0);
        assert_eq!(config.max_samples, DEFAULT_MAX_SAMPLES);
        assert_eq!(config.end_condition, EndCondition::Natural);
    }

    #[test]
    fn test_validation() {
        let mut config = ResampleConfig::default();

        config.frequency = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ResampleError::InvalidFrequency(_))
        ));

        config.frequency = -10.0;
        assert!(matches!(
            config.validate(),
            Err(ResampleError::InvalidFrequency(_))
        ));

        config.frequency = f64::NAN;
        assert!(config.validate().is_err());

        config.frequency = 100.0;
        config.time_epsilon = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ResampleError::InvalidConfig(_))
        ));

        config.time_epsilon = 1e-9;
        config.max_samples = 0;
        assert!(matches!(
            config.validate(),
            Err(ResampleError::InvalidConfig(_))
        ));

        config.max_samples = 10;
        config.small_angle = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ResampleConfig::default()
            .with_frequency(200.0)
            .with_time_epsilon(1e-6)
            .with_small_angle(1e-10)
            .with_max_samples(1_000)
            .with_end_condition(EndCondition::NotAKnot);
        assert_eq!(config.frequency, 200.0);
        assert_eq!(config.max_samples, 1_000);
        assert_eq!(config.end_condition, EndCondition::NotAKnot);
        assert_eq!(config.time_epsilon, 1e-6);
        assert_eq!(config.small_angle, 1e-10);
        assert!(config.validate().is_ok());
    }
}
