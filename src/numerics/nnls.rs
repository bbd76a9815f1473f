//! Non-negative least squares by the active-set method of Lawson and
//! Hanson. Solves `min ||A x - b||` subject to `x >= 0`; used to fit
//! DFT kernel weights, where negative pore populations are meaningless.

use crate::error::{PhysisorbError, Result};
use nalgebra::{DMatrix, DVector};

/// Least-squares solution of the subproblem restricted to the passive
/// column set, zeros elsewhere.
fn solve_passive(a: &DMatrix<f64>, b: &DVector<f64>, passive: &[usize]) -> Result<DVector<f64>> {
    let ap = a.select_columns(passive.iter());
    let svd = ap.svd(true, true);
    let zp = svd
        .solve(b, 1e-12)
        .map_err(|e| PhysisorbError::calculation(format!("NNLS subproblem: {e}")))?;
    let mut z = DVector::zeros(a.ncols());
    for (k, &j) in passive.iter().enumerate() {
        z[j] = zp[k];
    }
    Ok(z)
}

pub fn nnls(a: &DMatrix<f64>, b: &DVector<f64>, max_iter: usize) -> Result<DVector<f64>> {
    if a.nrows() != b.len() {
        return Err(PhysisorbError::ParameterInvalid {
            name: "b".into(),
            reason: format!("expected {} rows, got {}", a.nrows(), b.len()),
        });
    }
    let n = a.ncols();
    let mut x = DVector::zeros(n);
    let mut passive: Vec<usize> = Vec::new();
    let tol = 1e-10 * a.amax().max(1.0);

    for _ in 0..max_iter {
        // gradient of the residual
        let w = a.transpose() * (b - a * &x);
        let candidate = (0..n)
            .filter(|j| !passive.contains(j))
            .max_by(|&i, &j| w[i].partial_cmp(&w[j]).unwrap());
        let j = match candidate {
            Some(j) if w[j] > tol => j,
            _ => return Ok(x), // KKT satisfied
        };
        passive.push(j);

        let mut z = solve_passive(a, b, &passive)?;
        // inner loop: back off until the passive set is feasible
        while passive.iter().any(|&p| z[p] <= 0.0) {
            let mut alpha = f64::INFINITY;
            for &p in &passive {
                if z[p] <= 0.0 {
                    let a_step = x[p] / (x[p] - z[p]);
                    alpha = alpha.min(a_step);
                }
            }
            for i in 0..n {
                x[i] += alpha * (z[i] - x[i]);
            }
            passive.retain(|&p| x[p] > tol);
            if passive.is_empty() {
                z = DVector::zeros(n);
                break;
            }
            z = solve_passive(a, b, &passive)?;
        }
        x = z;
    }
    Err(PhysisorbError::calculation(format!(
        "NNLS did not converge in {max_iter} iterations"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn unconstrained_solution_recovered_when_positive() {
        let a = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        let x_true = DVector::from_vec(vec![2.0, 3.0]);
        let b = &a * &x_true;
        let x = nnls(&a, &b, 100).unwrap();
        assert_relative_eq!(x[0], 2.0, epsilon = 1e-8);
        assert_relative_eq!(x[1], 3.0, epsilon = 1e-8);
    }

    #[test]
    fn negative_component_is_clamped() {
        // the unconstrained least-squares answer has a negative component
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0001]);
        let b = DVector::from_vec(vec![1.0, 0.5]);
        let x = nnls(&a, &b, 100).unwrap();
        assert!(x.iter().all(|&v| v >= 0.0));
    }
}
