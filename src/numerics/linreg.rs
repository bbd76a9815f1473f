//! Ordinary least-squares regression of a straight line, with the
//! correlation coefficient and the standard error of the slope that the
//! characterisation methods report back to the caller.

use crate::error::{PhysisorbError, Result};

#[derive(Debug, Clone, Copy)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation coefficient r.
    pub corr_coef: f64,
    /// Standard error of the slope.
    pub stderr_slope: f64,
}

pub fn linear_fit(x: &[f64], y: &[f64]) -> Result<LinearFit> {
    if x.len() != y.len() {
        return Err(PhysisorbError::ParameterInvalid {
            name: "x, y".into(),
            reason: format!("length mismatch ({} vs {})", x.len(), y.len()),
        });
    }
    let n = x.len();
    if n < 2 {
        return Err(PhysisorbError::calculation(format!(
            "at least 2 points needed for a regression, got {n}"
        )));
    }
    let nf = n as f64;
    let mean_x = x.iter().sum::<f64>() / nf;
    let mean_y = y.iter().sum::<f64>() / nf;

    let mut s_xx = 0.0;
    let mut s_yy = 0.0;
    let mut s_xy = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        s_xx += dx * dx;
        s_yy += dy * dy;
        s_xy += dx * dy;
    }
    if s_xx == 0.0 {
        return Err(PhysisorbError::calculation(
            "regression abscissa is degenerate (all x equal)".to_string(),
        ));
    }

    let slope = s_xy / s_xx;
    let intercept = mean_y - slope * mean_x;
    let corr_coef = if s_yy == 0.0 {
        1.0
    } else {
        s_xy / (s_xx * s_yy).sqrt()
    };
    let stderr_slope = if n > 2 {
        let ss_res = s_yy - slope * s_xy;
        (ss_res.max(0.0) / ((n - 2) as f64) / s_xx).sqrt()
    } else {
        0.0
    };

    Ok(LinearFit {
        slope,
        intercept,
        corr_coef,
        stderr_slope,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn exact_line() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y: Vec<f64> = x.iter().map(|v| 2.5 * v - 1.0).collect();
        let fit = linear_fit(&x, &y).unwrap();
        assert_relative_eq!(fit.slope, 2.5, epsilon = 1e-12);
        assert_relative_eq!(fit.intercept, -1.0, epsilon = 1e-12);
        assert_relative_eq!(fit.corr_coef, 1.0, epsilon = 1e-12);
        assert_relative_eq!(fit.stderr_slope, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn too_few_points() {
        assert!(linear_fit(&[1.0], &[1.0]).is_err());
    }
}
