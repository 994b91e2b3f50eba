//! Trajectory interpolation and differentiation engine.
//!
//! This module implements [`resample_trajectory`], which turns a sparse
//! [`Trajectory`] into uniformly spaced poses and pseudo-IMU samples.
//!
//! # Pipeline Overview
//!
//! 1. Validate config, build the sample grid from the trajectory bounds
//! 2. Fit a cubic spline through the knot positions
//! 3. Precompute each segment's body-frame rotation vector (SO(3) log)
//! 4. Sweep the grid with a forward-only segment cursor
//! 5. Slerp orientation, evaluate spline position/velocity/acceleration
//! 6. Assemble poses and samples in time order
//!
//! # Boundary policy
//!
//! Velocity and acceleration are analytic spline derivatives, so every grid
//! point gets a sample and none are dropped at the ends. With the default
//! [`EndCondition::Natural`](crate::EndCondition::Natural) acceleration is
//! zero at the first and last knot;
//! [`EndCondition::NotAKnot`](crate::EndCondition::NotAKnot) extends the
//! neighboring cubic to the ends instead.

use log::debug;
use nalgebra::{UnitQuaternion, Vector3};

use crate::config::ResampleConfig;
use crate::error::Result;
use crate::grid::{SampleGrid, SegmentCursor};
use crate::math::so3::{relative_rotation_vector, slerp};
use crate::math::spline::CubicSpline;
use crate::pose::{StampedPose, Trajectory};
use crate::sample::{KinematicSample, ResampledTrajectory};

/// Resample a trajectory onto a uniform grid and differentiate it.
///
/// This is the main entry point of the crate.
///
/// # Arguments
///
/// * `trajectory` - Validated pose sequence (sensor-to-world)
/// * `config` - Target frequency and numerical tolerances
///
/// # Returns
///
/// A [`ResampledTrajectory`] with `floor(duration * frequency) + 1`
/// index-aligned poses and samples.
///
/// # Errors
///
/// Returns [`ResampleError::InvalidFrequency`](crate::ResampleError::InvalidFrequency)
/// or [`ResampleError::InvalidConfig`](crate::ResampleError::InvalidConfig) if
/// the config does not validate or the grid would exceed
/// `config.max_samples`. Trajectory invariants are enforced by
/// [`Trajectory::new`].
///
/// # Example
///
/// ```
/// use nalgebra::{UnitQuaternion, Vector3};
/// use se3_upsample::{resample_trajectory, ResampleConfig, StampedPose, Trajectory};
///
/// let trajectory = Trajectory::new(vec![
///     StampedPose::new(0.0, UnitQuaternion::identity(), Vector3::zeros()),
///     StampedPose::new(1.0, UnitQuaternion::identity(), Vector3::new(1.0, 0.0, 0.0)),
/// ])?;
///
/// let out = resample_trajectory(&trajectory, &ResampleConfig::new(10.0))?;
/// assert_eq!(out.len(), 11);
/// assert!((out.samples[5].velocity.x - 1.0).abs() < 1e-12);
/// # Ok::<(), se3_upsample::ResampleError>(())
/// ```
pub fn resample_trajectory(
    trajectory: &Trajectory,
    config: &ResampleConfig,
) -> Result<ResampledTrajectory> {
    config.validate()?;

    let poses = trajectory.poses();
    let knots = trajectory.timestamps();
    let small_angle = config.small_angle;

    // =========================================================================
    // 1. SAMPLE GRID
    // =========================================================================
    let grid = SampleGrid::new(trajectory.start_time(), trajectory.end_time(), config)?;

    // =========================================================================
    // 2. TRANSLATION SPLINE
    // =========================================================================
    let spline = CubicSpline::new(&knots, &trajectory.positions(), config.end_condition)?;

    // =========================================================================
    // 3. PER-SEGMENT BODY RATES
    // =========================================================================
    // For q(u) = q_i * exp(u * phi_i) the body-frame rate is phi_i / dt_i
    // everywhere in the segment.
    let body_rates: Vec<Vector3<f64>> = poses
        .windows(2)
        .map(|w| {
            let phi = relative_rotation_vector(&w[0].orientation, &w[1].orientation, small_angle);
            phi / (w[1].timestamp - w[0].timestamp)
        })
        .collect();

    // =========================================================================
    // 4-6. GRID SWEEP
    // =========================================================================
    let mut cursor = SegmentCursor::new();
    let mut out_poses = Vec::with_capacity(grid.len());
    let mut samples = Vec::with_capacity(grid.len());

    for t in grid.times() {
        let seg = cursor.locate(&knots, t);
        let (start, end) = (&poses[seg], &poses[seg + 1]);
        let u = (t - start.timestamp) / (end.timestamp - start.timestamp);

        let orientation = interpolate_orientation(start, end, u, small_angle);
        let kin = spline.evaluate(seg, t);

        out_poses.push(StampedPose::new(t, orientation, kin.position));
        samples.push(KinematicSample {
            timestamp: t,
            acceleration: kin.acceleration,
            angular_rate: body_rates[seg],
            velocity: kin.velocity,
        });
    }

    debug!(
        "resampled {} poses over {:.6}s into {} samples at {} Hz",
        trajectory.len(),
        trajectory.duration(),
        samples.len(),
        config.frequency
    );

    Ok(ResampledTrajectory {
        poses: out_poses,
        samples,
    })
}

/// Slerp inside one segment, returning knot orientations exactly at `u = 0`
/// and `u = 1`.
fn interpolate_orientation(
    start: &StampedPose,
    end: &StampedPose,
    u: f64,
    small_angle: f64,
) -> UnitQuaternion<f64> {
    if u <= 0.0 {
        start.orientation
    } else if u >= 1.0 {
        end.orientation
    } else {
        slerp(&start.orientation, &end.orientation, u, small_angle)
    }
}

/// Stateless resampler bound to a validated configuration.
///
/// Convenient when the same rate is applied to many trajectories.
#[derive(Debug, Clone)]
pub struct Resampler {
    config: ResampleConfig,
}

impl Resampler {
    /// Create a resampler, validating `config` up front.
    ///
    /// # Errors
    ///
    /// Returns the config's validation error.
    pub fn new(config: ResampleConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ResampleConfig {
        &self.config
    }

    /// Resample a validated trajectory.
    ///
    /// # Errors
    ///
    /// See [`resample_trajectory`].
    pub fn resample(&self, trajectory: &Trajectory) -> Result<ResampledTrajectory> {
        resample_trajectory(trajectory, &self.config)
    }

    /// Validate raw poses into a [`Trajectory`] and resample them.
    ///
    /// This is the entry point for loader output: a loader that stopped
    /// early with fewer than two poses surfaces here as
    /// [`ResampleError::InsufficientData`](crate::ResampleError::InsufficientData).
    ///
    /// # Errors
    ///
    /// Any error from [`Trajectory::new`] or [`resample_trajectory`].
    pub fn resample_poses(&self, poses: Vec<StampedPose>) -> Result<ResampledTrajectory> {
        let trajectory = Trajectory::new(poses)?;
        self.resample(&trajectory)
    }
}
