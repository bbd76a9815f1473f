//! Enthalpy of adsorption at zero coverage, extrapolated from a measured
//! (loading, enthalpy) curve either by taking the first point or by
//! fitting a four-term parametric shape.

use crate::error::{PhysisorbError, Result};
use crate::isotherm::descriptor::BranchFilter;
use crate::isotherm::point_isotherm::{LoadingQuery, PointIsotherm};
use crate::models::fit::{FitOptions, lm_least_squares};
use log::warn;
use serde::Serialize;

/// Largest accepted gap between the fitted zero-coverage enthalpy and the
/// first measured point, kJ/mol.
const FALLBACK_GAP: f64 = 50.0;

#[derive(Debug, Clone, Serialize)]
pub struct InitialEnthalpyResult {
    /// Enthalpy at zero coverage, kJ/mol.
    pub initial_enthalpy: f64,
    /// Converged parameters of the four-term model, when the fit was
    /// accepted: `[k_const, k_exp, e, n_loc, k_pa, p_a, k_pr, p_r]`.
    pub params: Option<Vec<f64>>,
    pub loading: Vec<f64>,
    pub enthalpy: Vec<f64>,
    /// Model evaluation at the measured loadings, when fitted.
    pub fitted: Option<Vec<f64>>,
    pub warnings: Vec<String>,
}

fn enthalpy_data(iso: &PointIsotherm, enthalpy_key: &str) -> Result<(Vec<f64>, Vec<f64>)> {
    let loading = iso.loading(&LoadingQuery::branch(BranchFilter::Ads))?;
    let enthalpy = iso.other_data(enthalpy_key, BranchFilter::Ads)?;
    let mut pairs: Vec<(f64, f64)> = loading
        .into_iter()
        .zip(enthalpy)
        .filter(|(n, h)| n.is_finite() && h.is_finite() && *n >= 0.0)
        .collect();
    pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
    if pairs.len() < 4 {
        return Err(PhysisorbError::calculation(format!(
            "initial enthalpy needs at least 4 (loading, enthalpy) points, got {}",
            pairs.len()
        )));
    }
    Ok(pairs.into_iter().unzip())
}

/// `dH(n) = k_const + k_exp / (1 + exp(e (n - n_loc))) + k_pa n^p_a +
/// k_pr n^p_r`.
fn model(params: &[f64], n: f64) -> f64 {
    let [k_const, k_exp, e, n_loc, k_pa, p_a, k_pr, p_r] = params else {
        return f64::NAN;
    };
    k_const + k_exp / (1.0 + (e * (n - n_loc)).exp()) + k_pa * n.powf(*p_a)
        + k_pr * n.powf(*p_r)
}

/// The enthalpy of the first measured adsorption point.
pub fn initial_enthalpy_point(iso: &PointIsotherm, enthalpy_key: &str) -> Result<f64> {
    let (_, enthalpy) = enthalpy_data(iso, enthalpy_key)?;
    Ok(enthalpy[0])
}

/// Fit the four-term shape from several starting guesses and extrapolate
/// to zero coverage. Falls back to the first measured point when the fit
/// disagrees with it by more than 50 kJ/mol.
pub fn initial_enthalpy_fit(
    iso: &PointIsotherm,
    enthalpy_key: &str,
    verbose: bool,
) -> Result<InitialEnthalpyResult> {
    let (loading, enthalpy) = enthalpy_data(iso, enthalpy_key)?;
    let n_max = loading.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let h_min = enthalpy.iter().cloned().fold(f64::INFINITY, f64::min);
    let h_max = enthalpy.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let h_mean = enthalpy.iter().sum::<f64>() / enthalpy.len() as f64;
    let h_std = (enthalpy.iter().map(|h| (h - h_mean).powi(2)).sum::<f64>()
        / enthalpy.len() as f64)
        .sqrt();

    // the constant term may not drop below the liquefaction enthalpy by
    // more than the data scatter
    let const_floor = match iso.adsorbate.enthalpy_liquefaction(iso.temperature_k()) {
        Ok(h_liq) => (h_liq - 2.0 * h_std).max(0.0),
        Err(_) => 0.0,
    };
    let bounds: Vec<(f64, f64)> = vec![
        (const_floor, h_max + 2.0 * h_std),
        (0.0, 2.0 * (h_max - h_min).max(1.0)),
        (0.0, 1000.0),
        (0.0, n_max),
        (-h_max.abs(), h_max.abs()),
        (0.01, 10.0),
        (-h_max.abs(), h_max.abs()),
        (0.01, 10.0),
    ];

    let residuals = |params: &[f64]| -> Result<Vec<f64>> {
        Ok(loading
            .iter()
            .zip(&enthalpy)
            .map(|(n, h)| model(params, *n) - h)
            .collect())
    };

    let range = (h_max - h_min).max(1.0);
    let guesses: Vec<Vec<f64>> = vec![
        vec![h_mean, range, 10.0, n_max / 2.0, 0.0, 1.0, 0.0, 2.0],
        vec![h_min, range, 100.0, n_max / 4.0, 0.0, 0.5, 0.0, 3.0],
        vec![h_mean, 0.0, 1.0, n_max / 2.0, -range / n_max.max(1e-12), 1.0, 0.0, 2.0],
        vec![h_max.max(const_floor), range / 2.0, 50.0, n_max / 2.0, 0.0, 2.0, 0.0, 0.5],
    ];

    let options = FitOptions {
        verbose,
        ..FitOptions::default()
    };
    let mut best: Option<(Vec<f64>, f64)> = None;
    for guess in &guesses {
        match lm_least_squares(&residuals, guess, &bounds, &options) {
            Ok((params, rmse)) => {
                if best.as_ref().is_none_or(|(_, r)| rmse < *r) {
                    best = Some((params, rmse));
                }
            }
            Err(e) => warn!("initial_enthalpy: start guess discarded: {e}"),
        }
    }

    let mut warnings = Vec::new();
    let (initial, params, fitted) = match best {
        Some((params, _)) => {
            let at_zero = model(&params, 0.0);
            if (at_zero - enthalpy[0]).abs() > FALLBACK_GAP {
                warnings.push(format!(
                    "fitted zero-coverage enthalpy {at_zero:.1} kJ/mol disagrees with the \
                     first measured point {:.1} kJ/mol, falling back to the measurement",
                    enthalpy[0]
                ));
                (enthalpy[0], None, None)
            } else {
                let fitted = loading.iter().map(|n| model(&params, *n)).collect();
                (at_zero, Some(params), Some(fitted))
            }
        }
        None => {
            warnings.push("no start guess converged, using the first measured point".to_string());
            (enthalpy[0], None, None)
        }
    };
    for w in &warnings {
        warn!("initial_enthalpy: {w}");
    }

    Ok(InitialEnthalpyResult {
        initial_enthalpy: initial,
        params,
        loading,
        enthalpy,
        fitted,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isotherm::descriptor::IsothermUnits;
    use crate::isotherm::point_isotherm::IsothermData;
    use crate::species::material::Material;
    use crate::species::registry::find_adsorbate;

    fn enthalpy_isotherm(enthalpy: Vec<f64>) -> PointIsotherm {
        let n = enthalpy.len();
        let pressure: Vec<f64> = (1..=n).map(|i| 0.1 * i as f64).collect();
        let loading: Vec<f64> = (1..=n).map(|i| 0.5 * i as f64).collect();
        PointIsotherm::new(
            Material::new("mof"),
            find_adsorbate("carbon dioxide").unwrap(),
            298.0,
            IsothermData::new(pressure, loading).with_column("enthalpy", enthalpy),
            IsothermUnits::default(),
        )
        .unwrap()
    }

    #[test]
    fn point_estimate_takes_lowest_loading() {
        let iso = enthalpy_isotherm(vec![35.0, 32.0, 30.0, 28.0, 27.0, 26.5]);
        approx::assert_relative_eq!(
            initial_enthalpy_point(&iso, "enthalpy").unwrap(),
            35.0
        );
    }

    #[test]
    fn fit_extrapolates_smooth_decay() {
        // smooth decay from ~36 kJ/mol toward a 22 kJ/mol plateau
        let loading: Vec<f64> = (1..=12).map(|i| 0.5 * i as f64).collect();
        let enthalpy: Vec<f64> = loading
            .iter()
            .map(|n| 22.0 + 14.0 / (1.0 + (2.0 * (n - 1.5)).exp()))
            .collect();
        let pressure: Vec<f64> = (1..=12).map(|i| 0.1 * i as f64).collect();
        let iso = PointIsotherm::new(
            Material::new("mof"),
            find_adsorbate("carbon dioxide").unwrap(),
            298.0,
            IsothermData::new(pressure, loading).with_column("enthalpy", enthalpy),
            IsothermUnits::default(),
        )
        .unwrap();
        let result = initial_enthalpy_fit(&iso, "enthalpy", false).unwrap();
        // the true model value at zero coverage is 22 + 14/(1+e^-3) = 35.33
        assert!(
            (result.initial_enthalpy - 35.33).abs() < 3.0,
            "initial enthalpy off: {}",
            result.initial_enthalpy
        );
    }

    #[test]
    fn missing_column_is_an_error() {
        let iso = enthalpy_isotherm(vec![30.0; 6]);
        assert!(initial_enthalpy_point(&iso, "no-such-column").is_err());
    }
}
