//! Bounded Levenberg-Marquardt least squares. The generic routine works
//! on any residual closure; `fit_model` wires it to a model's natural
//! axis. The Jacobian is formed by forward differences; trial steps that
//! leave the parameter box are clamped to it.

use crate::error::{PhysisorbError, Result};
use crate::models::model::{Calculates, IsothermModel, ModelEnum};
use log::{debug, info};
use nalgebra::{DMatrix, DVector};

#[derive(Debug, Clone)]
pub struct FitOptions {
    pub max_iterations: usize,
    /// Relative decrease of the sum of squares below which the fit stops.
    pub tolerance: f64,
    pub verbose: bool,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-10,
            verbose: false,
        }
    }
}

fn clamp_to_bounds(params: &mut [f64], bounds: &[(f64, f64)]) {
    for (p, (lo, hi)) in params.iter_mut().zip(bounds) {
        if lo.is_finite() && *p < *lo {
            *p = *lo;
        }
        if hi.is_finite() && *p > *hi {
            *p = *hi;
        }
    }
}

fn finite_residuals<F>(f: &F, params: &[f64]) -> Result<DVector<f64>>
where
    F: Fn(&[f64]) -> Result<Vec<f64>>,
{
    let r = DVector::from_vec(f(params)?);
    if r.iter().any(|v| !v.is_finite()) {
        return Err(PhysisorbError::calculation(
            "non-finite residual during least-squares evaluation".to_string(),
        ));
    }
    Ok(r)
}

fn jacobian<F>(
    f: &F,
    params: &[f64],
    bounds: &[(f64, f64)],
    r0: &DVector<f64>,
) -> Result<DMatrix<f64>>
where
    F: Fn(&[f64]) -> Result<Vec<f64>>,
{
    let m = r0.len();
    let k = params.len();
    let mut jac = DMatrix::zeros(m, k);
    for j in 0..k {
        let h = 1e-7 * params[j].abs().max(1e-7);
        let mut shifted = params.to_vec();
        shifted[j] += h;
        clamp_to_bounds(&mut shifted, bounds);
        let h_eff = shifted[j] - params[j];
        if h_eff == 0.0 {
            continue;
        }
        let r1 = finite_residuals(f, &shifted)?;
        for i in 0..m {
            jac[(i, j)] = (r1[i] - r0[i]) / h_eff;
        }
    }
    Ok(jac)
}

/// Minimise `|f(params)|^2` within the parameter box, starting from
/// `guess`. Returns the converged parameters and the RMSE.
pub fn lm_least_squares<F>(
    f: &F,
    guess: &[f64],
    bounds: &[(f64, f64)],
    options: &FitOptions,
) -> Result<(Vec<f64>, f64)>
where
    F: Fn(&[f64]) -> Result<Vec<f64>>,
{
    let mut params = guess.to_vec();
    clamp_to_bounds(&mut params, bounds);

    let mut r = finite_residuals(f, &params)?;
    let n = r.len();
    if n == 0 {
        return Err(PhysisorbError::calculation(
            "least squares needs at least one residual".to_string(),
        ));
    }
    let mut ssr = r.norm_squared();
    let mut lambda = 1e-3;

    for iteration in 0..options.max_iterations {
        let jac = jacobian(f, &params, bounds, &r)?;
        let jtj = jac.transpose() * &jac;
        let jtr = jac.transpose() * &r;

        let mut stepped = false;
        for _ in 0..20 {
            let mut damped = jtj.clone();
            for d in 0..params.len() {
                damped[(d, d)] += lambda * jtj[(d, d)].max(1e-12);
            }
            let Some(delta) = damped.lu().solve(&(-&jtr)) else {
                lambda *= 10.0;
                continue;
            };
            let mut trial: Vec<f64> =
                params.iter().zip(delta.iter()).map(|(p, d)| p + d).collect();
            clamp_to_bounds(&mut trial, bounds);

            match finite_residuals(f, &trial) {
                Ok(r_trial) => {
                    let ssr_trial = r_trial.norm_squared();
                    if ssr_trial < ssr {
                        let improvement = (ssr - ssr_trial) / ssr.max(1e-300);
                        params = trial;
                        r = r_trial;
                        ssr = ssr_trial;
                        lambda = (lambda * 0.3).max(1e-12);
                        stepped = true;
                        if options.verbose {
                            debug!(
                                "least squares: iteration {iteration}, ssr {ssr:.6e}, lambda {lambda:.1e}"
                            );
                        }
                        if improvement < options.tolerance {
                            return Ok((params, (ssr / n as f64).sqrt()));
                        }
                        break;
                    }
                    lambda *= 10.0;
                }
                Err(_) => {
                    lambda *= 10.0;
                }
            }
        }
        // stalled step search on an already-stationary residual counts as
        // converged
        if !stepped && lambda > 1e10 {
            let rmse = (ssr / n as f64).sqrt();
            if rmse.is_finite() {
                return Ok((params, rmse));
            }
            return Err(PhysisorbError::calculation(
                "least-squares step search stalled with non-finite residual".to_string(),
            ));
        }
    }
    let rmse = (ssr / n as f64).sqrt();
    if rmse.is_finite() {
        Ok((params, rmse))
    } else {
        Err(PhysisorbError::calculation(format!(
            "least squares did not converge within {} iterations",
            options.max_iterations
        )))
    }
}

/// Fit the model to `(pressure, loading)` starting from `guess` (or the
/// model's own initial guess) and leave the converged parameters on the
/// model. The residual axis follows `calculates`: loading-explicit models
/// are compared in loading, pressure-explicit models in pressure.
/// Returns the RMSE of the converged fit.
pub fn fit_model(
    model: &mut ModelEnum,
    pressure: &[f64],
    loading: &[f64],
    guess: Option<Vec<f64>>,
    options: &FitOptions,
) -> Result<f64> {
    let n = pressure.len();
    if n < 2 || loading.len() != n {
        return Err(PhysisorbError::ParameterInvalid {
            name: "data".into(),
            reason: format!(
                "fitting needs matching arrays of at least 2 points, got {} and {}",
                n,
                loading.len()
            ),
        });
    }
    let bounds = model.param_bounds();
    let guess = match guess {
        Some(g) => g,
        None => model.initial_guess(pressure, loading)?,
    };

    let template = model.clone();
    let residuals = move |params: &[f64]| -> Result<Vec<f64>> {
        let mut probe = template.clone();
        probe.set_params(params)?;
        let mut r = Vec::with_capacity(n);
        match probe.calculates() {
            Calculates::Loading => {
                for i in 0..n {
                    r.push(probe.loading(pressure[i])? - loading[i]);
                }
            }
            Calculates::Pressure => {
                for i in 0..n {
                    r.push(probe.pressure(loading[i])? - pressure[i]);
                }
            }
        }
        Ok(r)
    };

    let (params, rmse) =
        lm_least_squares(&residuals, &guess, &bounds, options).map_err(|e| {
            PhysisorbError::FitFailed {
                model: model.name().to_string(),
                guess: guess.clone(),
                message: e.to_string(),
            }
        })?;
    model.set_params(&params)?;
    if options.verbose {
        info!("fit '{}': converged with rmse {rmse:.6e}", model.name());
    }
    Ok(rmse)
}

/// Henry-law slope of the lowest-pressure data point, the seed of most
/// initial guesses.
pub(crate) fn henry_seed(pressure: &[f64], loading: &[f64]) -> Result<f64> {
    pressure
        .iter()
        .zip(loading)
        .filter(|(p, n)| **p > 0.0 && **n > 0.0)
        .min_by(|a, b| a.0.partial_cmp(b.0).unwrap())
        .map(|(p, n)| n / p)
        .ok_or_else(|| {
            PhysisorbError::calculation(
                "initial guess needs at least one positive data point".to_string(),
            )
        })
}

pub(crate) fn saturation_seed(loading: &[f64]) -> Result<f64> {
    let max = loading.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if max > 0.0 {
        Ok(1.1 * max)
    } else {
        Err(PhysisorbError::calculation(
            "initial guess needs a positive maximum loading".to_string(),
        ))
    }
}
