//! Scalar root finding and bounded minimisation.
//!
//! Both routines require an explicit bracket; callers supply the interval
//! and the tolerance rather than leaving the choice to the solver.

use crate::error::{PhysisorbError, Result};

/// Brent's method for a root of `f` on `[a, b]`. The bracket must
/// straddle the root (`f(a)` and `f(b)` of opposite sign).
pub fn brent_root<F>(f: F, a: f64, b: f64, tol: f64, max_iter: usize) -> Result<f64>
where
    F: Fn(f64) -> f64,
{
    let (mut a, mut b) = (a, b);
    let mut fa = f(a);
    let mut fb = f(b);
    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }
    if fa * fb > 0.0 {
        return Err(PhysisorbError::calculation(format!(
            "root is not bracketed on [{a}, {b}]"
        )));
    }
    if fa.abs() < fb.abs() {
        std::mem::swap(&mut a, &mut b);
        std::mem::swap(&mut fa, &mut fb);
    }
    let mut c = a;
    let mut fc = fa;
    let mut d = b - a;
    let mut mflag = true;

    for _ in 0..max_iter {
        if fb == 0.0 || (b - a).abs() < tol {
            return Ok(b);
        }
        let mut s = if fa != fc && fb != fc {
            // inverse quadratic interpolation
            a * fb * fc / ((fa - fb) * (fa - fc))
                + b * fa * fc / ((fb - fa) * (fb - fc))
                + c * fa * fb / ((fc - fa) * (fc - fb))
        } else {
            b - fb * (b - a) / (fb - fa)
        };

        let lo = (3.0 * a + b) / 4.0;
        let cond = !((lo..=b).contains(&s) || (b..=lo).contains(&s))
            || (mflag && (s - b).abs() >= (b - c).abs() / 2.0)
            || (!mflag && (s - b).abs() >= (c - d).abs() / 2.0)
            || (mflag && (b - c).abs() < tol)
            || (!mflag && (c - d).abs() < tol);
        if cond {
            s = (a + b) / 2.0;
            mflag = true;
        } else {
            mflag = false;
        }

        let fs = f(s);
        d = c;
        c = b;
        fc = fb;
        if fa * fs < 0.0 {
            b = s;
            fb = fs;
        } else {
            a = s;
            fa = fs;
        }
        if fa.abs() < fb.abs() {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut fa, &mut fb);
        }
    }
    Err(PhysisorbError::calculation(format!(
        "root finding did not converge in {max_iter} iterations"
    )))
}

/// Bounded scalar minimisation by golden-section search with parabolic
/// acceleration (Brent). Returns the abscissa of the minimum on `[a, b]`.
pub fn brent_minimize<F>(f: F, a: f64, b: f64, tol: f64, max_iter: usize) -> Result<f64>
where
    F: Fn(f64) -> f64,
{
    if !(a < b) {
        return Err(PhysisorbError::ParameterInvalid {
            name: "bracket".into(),
            reason: format!("invalid interval [{a}, {b}]"),
        });
    }
    const GOLD: f64 = 0.381_966_011_250_105;

    let (mut lo, mut hi) = (a, b);
    let mut x = lo + GOLD * (hi - lo);
    let mut w = x;
    let mut v = x;
    let mut fx = f(x);
    let mut fw = fx;
    let mut fv = fx;
    let mut d: f64 = 0.0;
    let mut e: f64 = 0.0;

    for _ in 0..max_iter {
        let m = 0.5 * (lo + hi);
        let tol1 = tol * x.abs() + 1e-12;
        let tol2 = 2.0 * tol1;
        if (x - m).abs() <= tol2 - 0.5 * (hi - lo) {
            return Ok(x);
        }

        let mut use_golden = true;
        if e.abs() > tol1 {
            // try a parabolic step through x, v, w
            let r = (x - w) * (fx - fv);
            let q_ = (x - v) * (fx - fw);
            let mut p = (x - v) * q_ - (x - w) * r;
            let mut q2 = 2.0 * (q_ - r);
            if q2 > 0.0 {
                p = -p;
            }
            q2 = q2.abs();
            let e_prev = e;
            e = d;
            if p.abs() < (0.5 * q2 * e_prev).abs() && p > q2 * (lo - x) && p < q2 * (hi - x) {
                d = p / q2;
                let u = x + d;
                if (u - lo) < tol2 || (hi - u) < tol2 {
                    d = if m > x { tol1 } else { -tol1 };
                }
                use_golden = false;
            }
        }
        if use_golden {
            e = if x < m { hi - x } else { lo - x };
            d = GOLD * e;
        }

        let u = if d.abs() >= tol1 {
            x + d
        } else if d > 0.0 {
            x + tol1
        } else {
            x - tol1
        };
        let fu = f(u);

        if fu <= fx {
            if u < x {
                hi = x;
            } else {
                lo = x;
            }
            v = w;
            fv = fw;
            w = x;
            fw = fx;
            x = u;
            fx = fu;
        } else {
            if u < x {
                lo = u;
            } else {
                hi = u;
            }
            if fu <= fw || w == x {
                v = w;
                fv = fw;
                w = u;
                fw = fu;
            } else if fu <= fv || v == x || v == w {
                v = u;
                fv = fu;
            }
        }
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn root_of_cubic() {
        let r = brent_root(|x| x * x * x - 2.0, 0.0, 2.0, 1e-12, 100).unwrap();
        assert_relative_eq!(r, 2f64.powf(1.0 / 3.0), epsilon = 1e-9);
    }

    #[test]
    fn unbracketed_root_fails() {
        assert!(brent_root(|x| x * x + 1.0, -1.0, 1.0, 1e-12, 100).is_err());
    }

    #[test]
    fn minimum_of_parabola() {
        let m = brent_minimize(|x| (x - 0.37).powi(2) + 1.0, 0.0, 2.0, 1e-10, 200).unwrap();
        assert_relative_eq!(m, 0.37, epsilon = 1e-6);
    }
}
