//! Simple quadrature rules used for model spreading pressures.

/// Trapezoidal rule over tabulated points.
pub fn trapz(x: &[f64], y: &[f64]) -> f64 {
    let mut acc = 0.0;
    for i in 1..x.len().min(y.len()) {
        acc += 0.5 * (y[i] + y[i - 1]) * (x[i] - x[i - 1]);
    }
    acc
}

/// Composite Simpson rule for `f` on `[a, b]` with `n` intervals
/// (rounded up to even).
pub fn simpson<F>(f: F, a: f64, b: f64, n: usize) -> f64
where
    F: Fn(f64) -> f64,
{
    let n = if n % 2 == 0 { n.max(2) } else { n + 1 };
    let h = (b - a) / n as f64;
    let mut acc = f(a) + f(b);
    for i in 1..n {
        let coeff = if i % 2 == 1 { 4.0 } else { 2.0 };
        acc += coeff * f(a + i as f64 * h);
    }
    acc * h / 3.0
}
