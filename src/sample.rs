//! Output data structures of the resampling engine.
//!
//! [`KinematicSample`] replaces a positionally packed
//! `[t, ax, ay, az, wx, wy, wz, vx, vy, vz]` row with named fields.
//!
//! # Frames
//!
//! | Field | Frame | Unit |
//! |-------|-------|------|
//! | `acceleration` | world | m/s² |
//! | `angular_rate` | body (sensor) | rad/s |
//! | `velocity` | world | m/s |

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::pose::StampedPose;

/// One pseudo-IMU sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KinematicSample {
    /// Timestamp in seconds.
    pub timestamp: f64,
    /// Second time derivative of position, world frame.
    pub acceleration: Vector3<f64>,
    /// Instantaneous rotation rate, body frame.
    pub angular_rate: Vector3<f64>,
    /// First time derivative of position, world frame.
    pub velocity: Vector3<f64>,
}

impl KinematicSample {
    /// Inertial table row: `[t, wx, wy, wz, ax, ay, az]`.
    #[must_use]
    pub fn to_imu_row(&self) -> [f64; 7] {
        [
            self.timestamp,
            self.angular_rate.x,
            self.angular_rate.y,
            self.angular_rate.z,
            self.acceleration.x,
            self.acceleration.y,
            self.acceleration.z,
        ]
    }
}

/// Uniformly resampled poses and their kinematic samples, index-aligned.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResampledTrajectory {
    /// Interpolated poses on the sample grid.
    pub poses: Vec<StampedPose>,
    /// Kinematic samples; `samples[i].timestamp == poses[i].timestamp`.
    pub samples: Vec<KinematicSample>,
}

impl ResampledTrajectory {
    /// Number of grid points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when no samples were produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterate over `(pose, sample)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&StampedPose, &KinematicSample)> {
        self.poses.iter().zip(self.samples.iter())
    }

    /// Largest angular rate magnitude across the samples (rad/s).
    #[must_use]
    pub fn peak_angular_rate(&self) -> f64 {
        self.samples
            .iter()
            .map(|s| s.angular_rate.norm())
            .fold(0.0, f64::max)
    }

    /// Largest acceleration magnitude across the samples (m/s²).
    #[must_use]
    pub fn peak_acceleration(&self) -> f64 {
        self.samples
            .iter()
            .map(|s| s.acceleration.norm())
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(t: f64) -> KinematicSample {
        KinematicSample {
            timestamp: t,
            acceleration: Vector3::new(1.0, 2.0, 3.0),
            angular_rate: Vector3::new(0.1, 0.2, 0.3),
            velocity: Vector3::new(-1.0, 0.0, 1.0),
        }
    }

    #[test]
    fn test_imu_row_order() {
        assert_eq!(
            sample(4.0).to_imu_row(),
            [4.0, 0.1, 0.2, 0.3, 1.0, 2.0, 3.0]
        );
    }

    #[test]
    fn test_resampled_accessors() {
        let out = ResampledTrajectory {
            poses: vec![StampedPose::identity(0.0), StampedPose::identity(0.5)],
            samples: vec![sample(0.0), sample(0.5)],
        };
        assert_eq!(out.len(), 2);
        assert!(!out.is_empty());
        assert_eq!(out.iter().count(), 2);
        assert!((out.peak_acceleration() - 14.0_f64.sqrt()).abs() < 1e-12);
        assert!((out.peak_angular_rate() - 0.14_f64.sqrt()).abs() < 1e-12);

        assert!(ResampledTrajectory::default().is_empty());
    }
}
