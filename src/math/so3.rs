//! SO(3) maps on unit quaternions.
//!
//! Rotation vectors (axis times angle) are the tangent-space coordinates
//! used for angular rates. `log_so3` always returns the shortest-path
//! vector, i.e. an angle in `[0, π]`, so a relative rotation never flips
//! the sign of the recovered rate.

use nalgebra::{Quaternion, UnitQuaternion, Vector3};

/// Logarithm map: unit quaternion -> rotation vector.
///
/// The quaternion is first moved to the `w >= 0` hemisphere, which wraps
/// the rotation angle into `(-π, π]`. Below `small_angle` a Taylor series
/// replaces the `θ / sin(θ/2)` factor.
#[must_use]
pub fn log_so3(q: &UnitQuaternion<f64>, small_angle: f64) -> Vector3<f64> {
    let raw = q.quaternion();
    let (w, v) = if raw.w < 0.0 {
        (-raw.w, -raw.imag())
    } else {
        (raw.w, raw.imag())
    };

    let sin_half = v.norm();
    let theta = 2.0 * sin_half.atan2(w);

    if theta < small_angle {
        // theta / sin(theta/2) ~= 2 / w * (1 - |v|^2 / (3 w^2))
        let w_sq = w * w;
        v * (2.0 / w) * (1.0 - sin_half * sin_half / (3.0 * w_sq))
    } else {
        v * (theta / sin_half)
    }
}

/// Exponential map: rotation vector -> unit quaternion.
#[must_use]
pub fn exp_so3(omega: &Vector3<f64>, small_angle: f64) -> UnitQuaternion<f64> {
    let theta = omega.norm();
    let half = 0.5 * theta;

    let (w, scale) = if theta < small_angle {
        // sin(theta/2) / theta ~= 1/2 - theta^2 / 48
        (1.0 - theta * theta / 8.0, 0.5 - theta * theta / 48.0)
    } else {
        (half.cos(), half.sin() / theta)
    };

    UnitQuaternion::new_normalize(Quaternion::new(
        w,
        omega.x * scale,
        omega.y * scale,
        omega.z * scale,
    ))
}

/// Rotation vector taking `from` to `to`, expressed in the `from` frame:
/// `log(from⁻¹ · to)`.
#[must_use]
pub fn relative_rotation_vector(
    from: &UnitQuaternion<f64>,
    to: &UnitQuaternion<f64>,
    small_angle: f64,
) -> Vector3<f64> {
    log_so3(&(from.inverse() * to), small_angle)
}

/// Spherical linear interpolation `q0 · exp(u · log(q0⁻¹ · q1))`.
///
/// Follows the shortest arc and renormalizes the result. Unlike
/// `UnitQuaternion::slerp`, antipodal inputs do not panic.
#[must_use]
pub fn slerp(
    q0: &UnitQuaternion<f64>,
    q1: &UnitQuaternion<f64>,
    u: f64,
    small_angle: f64,
) -> UnitQuaternion<f64> {
    let delta = relative_rotation_vector(q0, q1, small_angle);
    let q = q0 * exp_so3(&(delta * u), small_angle);
    UnitQuaternion::new_normalize(q.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    const SMALL: f64 = 1e-8;

    #[test]
    fn test_log_identity() {
        let rvec = log_so3(&UnitQuaternion::identity(), SMALL);
        assert_relative_eq!(rvec, Vector3::zeros(), epsilon = 1e-15);
    }

    #[test]
    fn test_exp_log_roundtrip() {
        let test_cases = [
            Vector3::new(0.1, 0.2, 0.3),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, -1.0, 0.0),
            Vector3::new(0.5, 0.5, 0.5),
            Vector3::new(3.0, 0.0, 0.0),
            Vector3::new(1e-10, -2e-10, 3e-10),
        ];

        for rvec in test_cases {
            let recovered = log_so3(&exp_so3(&rvec, SMALL), SMALL);
            assert_relative_eq!(recovered, rvec, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_matches_nalgebra() {
        let rvec = Vector3::new(0.3, -0.4, 0.5);
        let ours = exp_so3(&rvec, SMALL);
        let theirs = UnitQuaternion::from_scaled_axis(rvec);
        assert_relative_eq!(ours, theirs, epsilon = 1e-12);
    }

    #[test]
    fn test_log_hemisphere_invariant() {
        // q and -q are the same rotation and must give the same vector
        let q = exp_so3(&Vector3::new(0.2, 0.1, -0.7), SMALL);
        let neg = UnitQuaternion::new_unchecked(-q.into_inner());
        assert_relative_eq!(log_so3(&q, SMALL), log_so3(&neg, SMALL), epsilon = 1e-12);
    }

    #[test]
    fn test_log_wraps_large_angle() {
        // A 3.5 rad turn about +z is a (2π - 3.5) rad turn about -z
        let q = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 3.5);
        let rvec = log_so3(&q, SMALL);
        assert!(rvec.norm() <= PI + 1e-12);
        assert_relative_eq!(rvec.z, -(2.0 * PI - 3.5), epsilon = 1e-12);
    }

    #[test]
    fn test_relative_rotation_is_body_frame() {
        // Start yawed 90 degrees, then roll about the body x axis.
        // Body x is world y, but the relative vector must stay on body x.
        let from = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2);
        let roll = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.25);
        let to = from * roll;

        let rvec = relative_rotation_vector(&from, &to, SMALL);
        assert_relative_eq!(rvec, Vector3::new(0.25, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_slerp_endpoints_and_midpoint() {
        let q0 = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.2);
        let q1 = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 1.0);

        assert_relative_eq!(slerp(&q0, &q1, 0.0, SMALL), q0, epsilon = 1e-12);
        assert_relative_eq!(slerp(&q0, &q1, 1.0, SMALL), q1, epsilon = 1e-12);

        let mid = slerp(&q0, &q1, 0.5, SMALL);
        assert_relative_eq!(mid.angle(), 0.6, epsilon = 1e-12);
        assert_relative_eq!(mid.into_inner().norm(), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_slerp_antipodal_does_not_panic() {
        let q0 = UnitQuaternion::identity();
        let q1 = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), PI);
        let mid = slerp(&q0, &q1, 0.5, SMALL);
        assert_relative_eq!(mid.angle(), FRAC_PI_2, epsilon = 1e-12);
    }
}
