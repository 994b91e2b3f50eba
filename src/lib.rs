//! SE(3) Pose Upsampling
//!
//! Turn sparse ground-truth poses into a dense pseudo-IMU stream.
//!
//! Given timestamped sensor-to-world poses, this library reconstructs the
//! continuous motion and samples it at a fixed rate, producing for every
//! grid point the interpolated pose plus:
//!
//! - **angular rate** in the body (sensor) frame, as a gyroscope reports it
//! - **linear acceleration** and **velocity** in the world frame
//!
//! Position is interpolated with a cubic spline (C², analytic
//! derivatives); orientation with quaternion slerp, whose body-frame rate is
//! the SO(3) log of each segment's relative rotation over its duration.
//!
//! # Quick Start
//!
//! ```
//! use nalgebra::{UnitQuaternion, Vector3};
//! use se3_upsample::{resample_trajectory, ResampleConfig, StampedPose, Trajectory};
//!
//! let poses = vec![
//!     StampedPose::new(0.0, UnitQuaternion::identity(), Vector3::zeros()),
//!     StampedPose::new(0.5, UnitQuaternion::identity(), Vector3::new(0.5, 0.0, 0.0)),
//!     StampedPose::new(1.0, UnitQuaternion::identity(), Vector3::new(1.0, 0.0, 0.0)),
//! ];
//! let trajectory = Trajectory::new(poses)?;
//!
//! let out = resample_trajectory(&trajectory, &ResampleConfig::new(100.0))?;
//! assert_eq!(out.len(), 101);
//! # Ok::<(), se3_upsample::ResampleError>(())
//! ```
//!
//! # Grid and boundary policy
//!
//! | Quantity | Value |
//! |----------|-------|
//! | first grid time | first pose timestamp |
//! | step | `1 / frequency` |
//! | sample count | `floor(duration * frequency) + 1` |
//! | trailing partial step | dropped |
//! | end samples | kept (analytic derivatives) |
//! | end acceleration | zero (`Natural`) or extrapolated cubic (`NotAKnot`) |
//! | grid size cap | `max_samples`, 50 million by default |
//!
//! # File I/O
//!
//! The [`io`] module reads whitespace- or comma-separated pose tables and
//! writes the inertial table consumed by downstream correlation tools.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod io;
pub mod math;
pub mod pose;
pub mod sample;

// Re-exports for convenient access
pub use config::{ResampleConfig, DEFAULT_FREQUENCY, DEFAULT_MAX_SAMPLES};
pub use engine::{resample_trajectory, Resampler};
pub use error::{ResampleError, Result};
pub use grid::{SampleGrid, SegmentCursor};
pub use math::spline::EndCondition;
pub use pose::{StampedPose, Trajectory, MIN_POSES};
pub use sample::{KinematicSample, ResampledTrajectory};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
