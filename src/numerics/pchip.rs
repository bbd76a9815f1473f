//! Monotone cubic interpolation slopes (Fritsch-Carlson). Given strictly
//! increasing abscissae and their ordinates, returns the derivative at
//! every node such that the piecewise cubic Hermite interpolant preserves
//! the monotonicity of the data.

/// Node derivatives for a monotone piecewise cubic Hermite interpolant.
/// `x` must be strictly increasing and have the same length as `y`.
pub fn pchip_slopes(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![0.0];
    }

    // secant slopes
    let mut delta = Vec::with_capacity(n - 1);
    for i in 0..n - 1 {
        delta.push((y[i + 1] - y[i]) / (x[i + 1] - x[i]));
    }
    if n == 2 {
        return vec![delta[0], delta[0]];
    }

    let mut d = vec![0.0; n];
    for i in 1..n - 1 {
        if delta[i - 1] * delta[i] <= 0.0 {
            d[i] = 0.0;
        } else {
            // weighted harmonic mean of the two secants
            let h0 = x[i] - x[i - 1];
            let h1 = x[i + 1] - x[i];
            let w1 = 2.0 * h1 + h0;
            let w2 = h1 + 2.0 * h0;
            d[i] = (w1 + w2) / (w1 / delta[i - 1] + w2 / delta[i]);
        }
    }

    d[0] = edge_slope(x[1] - x[0], x[2] - x[1], delta[0], delta[1]);
    d[n - 1] = edge_slope(
        x[n - 1] - x[n - 2],
        x[n - 2] - x[n - 3],
        delta[n - 2],
        delta[n - 3],
    );
    d
}

fn edge_slope(h0: f64, h1: f64, del0: f64, del1: f64) -> f64 {
    // one-sided three-point estimate, limited for shape preservation
    let d = ((2.0 * h0 + h1) * del0 - h0 * del1) / (h0 + h1);
    if d * del0 <= 0.0 {
        0.0
    } else if del0 * del1 < 0.0 && d.abs() > 3.0 * del0.abs() {
        3.0 * del0
    } else {
        d
    }
}

/// Evaluate the cubic Hermite segment `[x0, x1]` at `x`.
pub fn hermite_eval(x0: f64, x1: f64, y0: f64, y1: f64, d0: f64, d1: f64, x: f64) -> f64 {
    let h = x1 - x0;
    let t = (x - x0) / h;
    let t2 = t * t;
    let t3 = t2 * t;
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;
    h00 * y0 + h10 * h * d0 + h01 * y1 + h11 * h * d1
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn interpolant_hits_nodes() {
        let x = [0.0, 1.0, 2.5, 4.0];
        let y = [0.0, 1.0, 1.5, 3.0];
        let d = pchip_slopes(&x, &y);
        for i in 0..x.len() - 1 {
            let v = hermite_eval(x[i], x[i + 1], y[i], y[i + 1], d[i], d[i + 1], x[i]);
            assert_relative_eq!(v, y[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn monotone_data_stays_monotone() {
        let x = [0.0, 0.1, 0.5, 1.0, 2.0];
        let y = [0.0, 0.5, 0.7, 0.75, 2.0];
        let d = pchip_slopes(&x, &y);
        for i in 0..x.len() - 1 {
            let mut prev = y[i];
            for k in 1..=20 {
                let xv = x[i] + (x[i + 1] - x[i]) * k as f64 / 20.0;
                let v = hermite_eval(x[i], x[i + 1], y[i], y[i + 1], d[i], d[i + 1], xv);
                assert!(v >= prev - 1e-9, "interpolant dipped at {xv}");
                prev = v;
            }
        }
    }
}
