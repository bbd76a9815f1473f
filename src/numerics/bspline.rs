//! Least-squares B-spline smoothing on a uniform knot grid. Used to
//! smooth pore size distributions before presentation; the smoothed
//! curve is evaluated back at the original abscissae.

use crate::error::{PhysisorbError, Result};
use nalgebra::{DMatrix, DVector};

/// Cox-de Boor basis value of the `i`-th B-spline of degree `k` over the
/// knot vector `t`, evaluated at `x`.
fn basis(t: &[f64], i: usize, k: usize, x: f64) -> f64 {
    if k == 0 {
        // half-open support, closed at the last knot
        if (t[i] <= x && x < t[i + 1]) || (x == t[t.len() - 1] && t[i + 1] == x) {
            return 1.0;
        }
        return 0.0;
    }
    let mut value = 0.0;
    let den1 = t[i + k] - t[i];
    if den1 > 0.0 {
        value += (x - t[i]) / den1 * basis(t, i, k - 1, x);
    }
    let den2 = t[i + k + 1] - t[i + 1];
    if den2 > 0.0 {
        value += (t[i + k + 1] - x) / den2 * basis(t, i + 1, k - 1, x);
    }
    value
}

/// Smooth `y(x)` with a degree-`degree` B-spline fitted by least squares
/// and return the smoothed values at `x`. The number of control points
/// grows with the data so long curves keep their features.
pub fn bspline_smooth(x: &[f64], y: &[f64], degree: usize) -> Result<Vec<f64>> {
    let n = x.len();
    if n != y.len() {
        return Err(PhysisorbError::ParameterInvalid {
            name: "y".into(),
            reason: format!("length mismatch ({n} vs {})", y.len()),
        });
    }
    if degree == 0 || degree > 5 {
        return Err(PhysisorbError::ParameterInvalid {
            name: "degree".into(),
            reason: "spline degree must be between 1 and 5".into(),
        });
    }
    if n <= degree + 1 {
        return Ok(y.to_vec());
    }

    let n_coefs = ((n / 3).max(degree + 1)).min(n - 1);
    let x_min = x.iter().cloned().fold(f64::INFINITY, f64::min);
    let x_max = x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if !(x_max > x_min) {
        return Err(PhysisorbError::calculation(
            "degenerate abscissa for spline smoothing".to_string(),
        ));
    }

    // clamped uniform knot vector
    let n_knots = n_coefs + degree + 1;
    let interior = n_knots - 2 * (degree + 1);
    let mut knots = Vec::with_capacity(n_knots);
    for _ in 0..=degree {
        knots.push(x_min);
    }
    for j in 1..=interior {
        knots.push(x_min + (x_max - x_min) * j as f64 / (interior + 1) as f64);
    }
    for _ in 0..=degree {
        knots.push(x_max);
    }

    let mut design = DMatrix::zeros(n, n_coefs);
    for (r, &xv) in x.iter().enumerate() {
        for c in 0..n_coefs {
            design[(r, c)] = basis(&knots, c, degree, xv);
        }
    }
    let rhs = DVector::from_column_slice(y);
    let svd = design.clone().svd(true, true);
    let coefs = svd
        .solve(&rhs, 1e-12)
        .map_err(|e| PhysisorbError::calculation(format!("spline smoothing: {e}")))?;

    let smoothed = &design * &coefs;
    Ok(smoothed.iter().cloned().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn smooth_preserves_a_smooth_curve() {
        let x: Vec<f64> = (0..40).map(|i| i as f64 * 0.1).collect();
        let y: Vec<f64> = x.iter().map(|v| (v * 0.8).sin()).collect();
        let s = bspline_smooth(&x, &y, 3).unwrap();
        for (a, b) in y.iter().zip(s.iter()) {
            assert_relative_eq!(a, b, epsilon = 5e-2);
        }
    }

    #[test]
    fn short_input_passes_through() {
        let x = [0.0, 1.0, 2.0];
        let y = [1.0, 4.0, 2.0];
        assert_eq!(bspline_smooth(&x, &y, 3).unwrap(), y.to_vec());
    }
}
