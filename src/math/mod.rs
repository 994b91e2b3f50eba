//! Mathematical utilities for trajectory resampling.
//!
//! This module provides:
//! - [`so3`]: rotation log/exp maps and quaternion slerp
//! - [`spline`]: cubic spline through 3D knots with analytic derivatives

pub mod so3;
pub mod spline;

pub use so3::{exp_so3, log_so3, relative_rotation_vector, slerp};
pub use spline::{CubicSpline, EndCondition, SplineSample};
