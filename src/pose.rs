//! Timestamped rigid-body poses and the validated [`Trajectory`] built from
//! them.
//!
//! A pose is the transform from the sensor frame to the world frame:
//! `p_world = orientation * p_sensor + position`.

use nalgebra::{Quaternion, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ResampleError, Result};

/// Minimum number of poses needed for interpolation.
pub const MIN_POSES: usize = 2;

/// A sensor-to-world pose at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StampedPose {
    /// Timestamp in seconds.
    pub timestamp: f64,
    /// Rotation from sensor frame to world frame.
    pub orientation: UnitQuaternion<f64>,
    /// Sensor origin expressed in the world frame (m).
    pub position: Vector3<f64>,
}

impl StampedPose {
    /// Create a pose from an already normalized orientation.
    #[must_use]
    pub const fn new(
        timestamp: f64,
        orientation: UnitQuaternion<f64>,
        position: Vector3<f64>,
    ) -> Self {
        Self {
            timestamp,
            orientation,
            position,
        }
    }

    /// Identity pose at `timestamp`.
    #[must_use]
    pub fn identity(timestamp: f64) -> Self {
        Self::new(timestamp, UnitQuaternion::identity(), Vector3::zeros())
    }

    /// Create a pose from raw components, normalizing the quaternion.
    ///
    /// `quaternion_xyzw` is scalar-last, matching the pose-table layout.
    ///
    /// # Errors
    ///
    /// Returns [`ResampleError::NonFiniteInput`] if any component is NaN or
    /// Inf, or if the quaternion has (near) zero norm.
    pub fn from_components(
        timestamp: f64,
        translation: [f64; 3],
        quaternion_xyzw: [f64; 4],
    ) -> Result<Self> {
        if !timestamp.is_finite()
            || translation.iter().any(|c| !c.is_finite())
            || quaternion_xyzw.iter().any(|c| !c.is_finite())
        {
            return Err(ResampleError::non_finite(format!(
                "pose at t={timestamp} has a non-finite component"
            )));
        }

        let [qx, qy, qz, qw] = quaternion_xyzw;
        let orientation = UnitQuaternion::try_new(Quaternion::new(qw, qx, qy, qz), 1e-12)
            .ok_or_else(|| {
                ResampleError::non_finite(format!("pose at t={timestamp} has a zero quaternion"))
            })?;

        Ok(Self::new(timestamp, orientation, Vector3::from(translation)))
    }

    /// Flatten to `[t, tx, ty, tz, qx, qy, qz, qw]`.
    #[must_use]
    pub fn to_row(&self) -> [f64; 8] {
        let q = self.orientation.quaternion();
        [
            self.timestamp,
            self.position.x,
            self.position.y,
            self.position.z,
            q.i,
            q.j,
            q.k,
            q.w,
        ]
    }
}

/// An ordered, validated sequence of poses.
///
/// Guarantees at least [`MIN_POSES`] poses, strictly increasing timestamps
/// and finite positions. Immutable once built.
#[derive(Debug, Clone)]
pub struct Trajectory {
    poses: Vec<StampedPose>,
}

impl Trajectory {
    /// Validate and wrap a pose sequence.
    ///
    /// # Errors
    ///
    /// - [`ResampleError::InsufficientData`] for fewer than two poses
    /// - [`ResampleError::NonMonotonicTimestamps`] when a timestamp does not
    ///   exceed its predecessor (ties included)
    /// - [`ResampleError::NonFiniteInput`] for NaN/Inf timestamps or positions
    pub fn new(poses: Vec<StampedPose>) -> Result<Self> {
        if poses.len() < MIN_POSES {
            return Err(ResampleError::insufficient_data(MIN_POSES, poses.len()));
        }

        for (i, pose) in poses.iter().enumerate() {
            if !pose.timestamp.is_finite() {
                return Err(ResampleError::non_finite(format!(
                    "timestamp at index {i}"
                )));
            }
            if !pose.position.iter().all(|c| c.is_finite()) {
                return Err(ResampleError::non_finite(format!("position at index {i}")));
            }
        }

        if let Some(index) = poses
            .windows(2)
            .position(|w| w[1].timestamp <= w[0].timestamp)
        {
            return Err(ResampleError::NonMonotonicTimestamps { index: index + 1 });
        }

        Ok(Self { poses })
    }

    /// The poses, in time order.
    #[must_use]
    pub fn poses(&self) -> &[StampedPose] {
        &self.poses
    }

    /// Number of poses (at least two).
    #[must_use]
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    /// Always false for a constructed trajectory.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// First timestamp.
    #[must_use]
    pub fn start_time(&self) -> f64 {
        self.poses[0].timestamp
    }

    /// Last timestamp.
    #[must_use]
    pub fn end_time(&self) -> f64 {
        self.poses[self.poses.len() - 1].timestamp
    }

    /// `end_time - start_time`, always positive.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end_time() - self.start_time()
    }

    /// Knot timestamps.
    #[must_use]
    pub fn timestamps(&self) -> Vec<f64> {
        self.poses.iter().map(|p| p.timestamp).collect()
    }

    /// Knot positions.
    #[must_use]
    pub fn positions(&self) -> Vec<Vector3<f64>> {
        self.poses.iter().map(|p| p.position).collect()
    }
}

impl TryFrom<Vec<StampedPose>> for Trajectory {
    type Error = ResampleError;

    fn try_from(poses: Vec<StampedPose>) -> Result<Self> {
        Self::new(poses)
    }
}
