//! Cubic spline through 3D knots.
//!
//! The spline is C² across knots, so both velocity and acceleration are
//! continuous and can be evaluated analytically. How the two end segments
//! are closed is chosen with [`EndCondition`]:
//!
//! | Condition | Ends | Reproduces exactly |
//! |-----------|------|--------------------|
//! | `Natural` | zero second derivative at the first and last knot | lines |
//! | `NotAKnot` | third derivative continuous at the second and second-last knot | cubics |

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ResampleError, Result};

/// Boundary closure of the spline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EndCondition {
    /// Second derivative fixed to zero at both ends, so acceleration ramps
    /// to zero inside the end segments.
    #[default]
    Natural,
    /// The first two and last two segments share one cubic each, so the
    /// end samples follow the motion instead of a fixed acceleration.
    NotAKnot,
}

/// Position and its first two time derivatives at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplineSample {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub acceleration: Vector3<f64>,
}

/// Interpolating cubic spline over non-uniform knot times.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    /// Knot times, strictly increasing.
    knots: Vec<f64>,
    /// Knot values.
    values: Vec<Vector3<f64>>,
    /// Second derivative at each knot.
    second_derivs: Vec<Vector3<f64>>,
}

impl CubicSpline {
    /// Fit the spline to `values` at `knots`.
    ///
    /// Solves the tridiagonal system for the interior second derivatives
    /// with the Thomas algorithm. Two knots give a straight line; three
    /// knots with [`EndCondition::NotAKnot`] give the parabola through them.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two knots are given, the slices differ
    /// in length, or the knot times are not strictly increasing.
    pub fn new(knots: &[f64], values: &[Vector3<f64>], end: EndCondition) -> Result<Self> {
        let n = knots.len();
        if n < 2 {
            return Err(ResampleError::insufficient_data(2, n));
        }
        if values.len() != n {
            return Err(ResampleError::invalid_config(format!(
                "spline has {n} knots but {} values",
                values.len()
            )));
        }
        if let Some(index) = knots.windows(2).position(|w| w[1] <= w[0]) {
            return Err(ResampleError::NonMonotonicTimestamps { index: index + 1 });
        }

        let h: Vec<f64> = knots.windows(2).map(|w| w[1] - w[0]).collect();
        let second_derivs = if n == 2 {
            vec![Vector3::zeros(); 2]
        } else {
            solve_second_derivs(&h, values, end)
        };

        Ok(Self {
            knots: knots.to_vec(),
            values: values.to_vec(),
            second_derivs,
        })
    }

    /// Evaluate segment `segment` (between knots `segment` and
    /// `segment + 1`) at time `t`.
    ///
    /// `t` is expected inside the segment; outside it the cubic is
    /// extrapolated.
    #[must_use]
    pub fn evaluate(&self, segment: usize, t: f64) -> SplineSample {
        debug_assert!(segment + 1 < self.knots.len());

        let (t0, t1) = (self.knots[segment], self.knots[segment + 1]);
        let (p0, p1) = (self.values[segment], self.values[segment + 1]);
        let (m0, m1) = (self.second_derivs[segment], self.second_derivs[segment + 1]);

        let h = t1 - t0;
        // Weights are exactly 1/0 at the knots so knot values are reproduced
        let a = (t1 - t) / h;
        let b = (t - t0) / h;

        let position =
            p0 * a + p1 * b + (m0 * (a * a * a - a) + m1 * (b * b * b - b)) * (h * h / 6.0);
        let velocity =
            (p1 - p0) / h + (m1 * (3.0 * b * b - 1.0) - m0 * (3.0 * a * a - 1.0)) * (h / 6.0);
        let acceleration = m0 * a + m1 * b;

        SplineSample {
            position,
            velocity,
            acceleration,
        }
    }
}

/// Second derivatives at all knots, for at least three knots.
///
/// Row `i` of the interior system is
/// `h[i-1] M[i-1] + 2 (h[i-1] + h[i]) M[i] + h[i] M[i+1] = d[i]`.
fn solve_second_derivs(
    h: &[f64],
    values: &[Vector3<f64>],
    end: EndCondition,
) -> Vec<Vector3<f64>> {
    let n = values.len();
    let m = n - 2;

    let mut sub = vec![0.0; m];
    let mut diag = vec![0.0; m];
    let mut sup = vec![0.0; m];
    let mut rhs = vec![Vector3::zeros(); m];

    for r in 0..m {
        let i = r + 1;
        sub[r] = h[i - 1];
        diag[r] = 2.0 * (h[i - 1] + h[i]);
        sup[r] = h[i];
        rhs[r] = ((values[i + 1] - values[i]) / h[i] - (values[i] - values[i - 1]) / h[i - 1])
            * 6.0;
    }

    match end {
        EndCondition::Natural => {
            let mut second_derivs = vec![Vector3::zeros(); n];
            second_derivs[1..n - 1].copy_from_slice(&solve_tridiagonal(&sub, &diag, &sup, &rhs));
            second_derivs
        }
        EndCondition::NotAKnot if n == 3 => {
            // One parabola: constant second derivative
            vec![rhs[0] / (3.0 * (h[0] + h[1])); 3]
        }
        EndCondition::NotAKnot => {
            // M[0] = ((h0 + h1) M[1] - h0 M[2]) / h1, folded into the first row
            let (h0, h1) = (h[0], h[1]);
            diag[0] += h0 * (h0 + h1) / h1;
            sup[0] -= h0 * h0 / h1;

            // and symmetrically for M[n-1] in the last row
            let (ha, hb) = (h[n - 3], h[n - 2]);
            diag[m - 1] += hb * (ha + hb) / ha;
            sub[m - 1] -= hb * hb / ha;

            let interior = solve_tridiagonal(&sub, &diag, &sup, &rhs);
            let mut second_derivs = Vec::with_capacity(n);
            second_derivs.push(((h0 + h1) * interior[0] - h0 * interior[1]) / h1);
            second_derivs.extend_from_slice(&interior);
            second_derivs.push(((ha + hb) * interior[m - 1] - hb * interior[m - 2]) / ha);
            second_derivs
        }
    }
}

/// Thomas algorithm; `sub[0]` and `sup[last]` are ignored.
fn solve_tridiagonal(
    sub: &[f64],
    diag: &[f64],
    sup: &[f64],
    rhs: &[Vector3<f64>],
) -> Vec<Vector3<f64>> {
    let m = diag.len();
    let mut c_prime = vec![0.0; m];
    let mut d_prime = vec![Vector3::zeros(); m];

    c_prime[0] = sup[0] / diag[0];
    d_prime[0] = rhs[0] / diag[0];
    for i in 1..m {
        let denom = diag[i] - sub[i] * c_prime[i - 1];
        c_prime[i] = sup[i] / denom;
        d_prime[i] = (rhs[i] - d_prime[i - 1] * sub[i]) / denom;
    }

    let mut x = d_prime;
    for i in (0..m - 1).rev() {
        let next = x[i + 1];
        x[i] -= next * c_prime[i];
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn locate(knots: &[f64], t: f64) -> usize {
        knots
            .windows(2)
            .position(|w| t < w[1])
            .unwrap_or(knots.len() - 2)
    }

    #[test]
    fn test_two_knots_is_linear() {
        for end in [EndCondition::Natural, EndCondition::NotAKnot] {
            let spline = CubicSpline::new(
                &[0.0, 2.0],
                &[Vector3::zeros(), Vector3::new(4.0, -2.0, 0.0)],
                end,
            )
            .unwrap();

            let s = spline.evaluate(0, 0.5);
            assert_relative_eq!(s.position, Vector3::new(1.0, -0.5, 0.0), epsilon = 1e-12);
            assert_relative_eq!(s.velocity, Vector3::new(2.0, -1.0, 0.0), epsilon = 1e-12);
            assert_relative_eq!(s.acceleration, Vector3::zeros(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_interpolates_knots() {
        let knots = [0.0, 0.3, 1.1, 1.5, 2.7];
        let values: Vec<Vector3<f64>> = knots
            .iter()
            .map(|&t: &f64| Vector3::new(t.sin(), t * t, 1.0 - t))
            .collect();

        for end in [EndCondition::Natural, EndCondition::NotAKnot] {
            let spline = CubicSpline::new(&knots, &values, end).unwrap();
            for (i, (&t, v)) in knots.iter().zip(values.iter()).enumerate() {
                let seg = i.min(knots.len() - 2);
                let s = spline.evaluate(seg, t);
                assert_relative_eq!(s.position, *v, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_continuity_across_knots() {
        let knots = [0.0, 0.5, 0.9, 2.0];
        let values = [
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.5, -1.0),
            Vector3::new(0.2, 2.0, 0.0),
            Vector3::new(3.0, 1.0, 1.0),
        ];

        for end in [EndCondition::Natural, EndCondition::NotAKnot] {
            let spline = CubicSpline::new(&knots, &values, end).unwrap();
            for i in 1..knots.len() - 1 {
                let left = spline.evaluate(i - 1, knots[i]);
                let right = spline.evaluate(i, knots[i]);
                assert_relative_eq!(left.position, right.position, epsilon = 1e-12);
                assert_relative_eq!(left.velocity, right.velocity, epsilon = 1e-12);
                assert_relative_eq!(left.acceleration, right.acceleration, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_natural_end_conditions() {
        let knots = [0.0, 1.0, 2.0, 3.0];
        let values = [
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(2.0, 0.0, 1.0),
        ];
        let spline = CubicSpline::new(&knots, &values, EndCondition::Natural).unwrap();

        assert_relative_eq!(spline.evaluate(0, 0.0).acceleration, Vector3::zeros());
        assert_relative_eq!(spline.evaluate(2, 3.0).acceleration, Vector3::zeros());
    }

    #[test]
    fn test_not_a_knot_reproduces_cubic() {
        // x = t^3, y = 0.5 t^2, z = 2 - t on uneven knots, ends included
        let knots = [0.0, 0.2, 0.7, 0.8, 1.5, 2.0];
        let curve = |t: f64| Vector3::new(t * t * t, 0.5 * t * t, 2.0 - t);
        let values: Vec<Vector3<f64>> = knots.iter().map(|&t| curve(t)).collect();
        let spline = CubicSpline::new(&knots, &values, EndCondition::NotAKnot).unwrap();

        for t in [0.0, 0.05, 0.45, 0.75, 1.2, 1.9, 2.0] {
            let s = spline.evaluate(locate(&knots, t), t);
            assert_relative_eq!(s.position, curve(t), epsilon = 1e-9);
            assert_relative_eq!(
                s.velocity,
                Vector3::new(3.0 * t * t, t, -1.0),
                epsilon = 1e-9
            );
            assert_relative_eq!(
                s.acceleration,
                Vector3::new(6.0 * t, 1.0, 0.0),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_not_a_knot_three_knots_is_parabola() {
        let knots = [1.0, 1.5, 3.0];
        let values: Vec<Vector3<f64>> = knots
            .iter()
            .map(|&t| Vector3::new(2.0 * t * t, -t * t + t, 4.0))
            .collect();
        let spline = CubicSpline::new(&knots, &values, EndCondition::NotAKnot).unwrap();

        for (seg, t) in [(0, 1.0), (0, 1.2), (1, 2.0), (1, 3.0)] {
            let s = spline.evaluate(seg, t);
            assert_relative_eq!(s.acceleration, Vector3::new(4.0, -2.0, 0.0), epsilon = 1e-9);
            let expected = Vector3::new(4.0 * t, -2.0 * t + 1.0, 0.0);
            assert_relative_eq!(s.velocity, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_reproduces_linear_motion_on_uneven_knots() {
        let knots = [0.0, 0.07, 0.31, 0.32, 0.9];
        let velocity = Vector3::new(1.5, -0.25, 3.0);
        let values: Vec<Vector3<f64>> = knots.iter().map(|&t| velocity * t).collect();
        let spline = CubicSpline::new(&knots, &values, EndCondition::Natural).unwrap();

        for t in [0.01, 0.2, 0.315, 0.5, 0.89] {
            let s = spline.evaluate(locate(&knots, t), t);
            assert_relative_eq!(s.position, velocity * t, epsilon = 1e-12);
            assert_relative_eq!(s.velocity, velocity, epsilon = 1e-10);
            assert_relative_eq!(s.acceleration, Vector3::zeros(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_rejects_bad_knots() {
        let values = [Vector3::zeros(), Vector3::zeros()];
        let end = EndCondition::default();
        assert!(matches!(
            CubicSpline::new(&[0.0], &values[..1], end),
            Err(ResampleError::InsufficientData { .. })
        ));
        assert!(matches!(
            CubicSpline::new(&[1.0, 1.0], &values, end),
            Err(ResampleError::NonMonotonicTimestamps { index: 1 })
        ));
        assert!(CubicSpline::new(&[0.0, 1.0, 2.0], &values, end).is_err());
    }
}
