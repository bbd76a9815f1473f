//! Vacancy solution theory models. Both correct the Langmuir vacancy
//! picture with an activity coefficient over the coverage `theta = n/n_m`
//! and are pressure-explicit; loading is recovered by root-finding on
//! `theta in (0, 1)`.

use crate::error::{PhysisorbError, Result};
use crate::models::fit::{henry_seed, saturation_seed};
use crate::models::model::{Calculates, IsothermModel};
use crate::numerics::solver::brent_root;

const THETA_CEILING: f64 = 1.0 - 1e-9;

fn vst_loading<F>(pressure: f64, n_m: f64, pressure_pure: F) -> Result<f64>
where
    F: Fn(f64) -> f64,
{
    if pressure <= 0.0 {
        return Ok(0.0);
    }
    let hi = n_m * THETA_CEILING;
    if !(pressure_pure(hi) >= pressure) {
        return Err(PhysisorbError::calculation(format!(
            "loading at pressure {pressure} is beyond the vacancy solution capacity"
        )));
    }
    brent_root(|n| pressure_pure(n) - pressure, 0.0, hi, 1e-12, 200).map_err(|e| {
        PhysisorbError::calculation(format!(
            "vacancy solution loading at pressure {pressure} did not converge: {e}"
        ))
    })
}

/// Flory-Huggins VST,
/// `p = (n_m/K) * (theta/(1-theta)) * exp(a1v^2 * theta / (1 + a1v * theta))`.
#[derive(Debug, Clone)]
pub struct FloryHugginsVst {
    pub n_m: f64,
    pub k: f64,
    pub a1v: f64,
}

impl FloryHugginsVst {
    pub fn new() -> Self {
        Self {
            n_m: f64::NAN,
            k: f64::NAN,
            a1v: f64::NAN,
        }
    }

    fn pressure_pure(&self, loading: f64) -> f64 {
        let theta = loading / self.n_m;
        (self.n_m / self.k) * (theta / (1.0 - theta))
            * (self.a1v * self.a1v * theta / (1.0 + self.a1v * theta)).exp()
    }
}

impl Default for FloryHugginsVst {
    fn default() -> Self {
        Self::new()
    }
}

impl IsothermModel for FloryHugginsVst {
    fn name(&self) -> &'static str {
        "Flory-Huggins-VST"
    }

    fn calculates(&self) -> Calculates {
        Calculates::Pressure
    }

    fn param_names(&self) -> &'static [&'static str] {
        &["n_m", "K", "a1v"]
    }

    fn params(&self) -> Vec<f64> {
        vec![self.n_m, self.k, self.a1v]
    }

    fn set_params(&mut self, params: &[f64]) -> Result<()> {
        let [n_m, k, a1v] = params else {
            return Err(PhysisorbError::ParameterInvalid {
                name: "params".into(),
                reason: format!("Flory-Huggins VST takes 3 parameters, got {}", params.len()),
            });
        };
        self.n_m = *n_m;
        self.k = *k;
        self.a1v = *a1v;
        Ok(())
    }

    fn param_bounds(&self) -> Vec<(f64, f64)> {
        // the exponent denominator 1 + a1v*theta must stay positive
        vec![
            (0.0, f64::INFINITY),
            (0.0, f64::INFINITY),
            (-0.999999, f64::INFINITY),
        ]
    }

    fn initial_guess(&self, pressure: &[f64], loading: &[f64]) -> Result<Vec<f64>> {
        Ok(vec![
            saturation_seed(loading)?,
            henry_seed(pressure, loading)?,
            0.0,
        ])
    }

    fn loading(&self, pressure: f64) -> Result<f64> {
        vst_loading(pressure, self.n_m, |n| self.pressure_pure(n))
    }

    fn pressure(&self, loading: f64) -> Result<f64> {
        Ok(self.pressure_pure(loading))
    }

    fn spreading_pressure(&self, _pressure: f64) -> Result<f64> {
        Err(PhysisorbError::NotImplemented(
            "spreading pressure of the Flory-Huggins VST model".to_string(),
        ))
    }
}

/// Wilson-activity VST after Suwanayuen and Danner. The two Wilson
/// parameters describe the adsorbate-vacancy interaction; at
/// `L1v = Lv1 = 1` the equation collapses to the Langmuir vacancy form.
#[derive(Debug, Clone)]
pub struct WilsonVst {
    pub n_m: f64,
    pub k: f64,
    pub l1v: f64,
    pub lv1: f64,
}

impl WilsonVst {
    pub fn new() -> Self {
        Self {
            n_m: f64::NAN,
            k: f64::NAN,
            l1v: f64::NAN,
            lv1: f64::NAN,
        }
    }

    fn pressure_pure(&self, loading: f64) -> f64 {
        let theta = loading / self.n_m;
        let coef = self.l1v * (1.0 - (1.0 - self.lv1) * theta)
            / (self.l1v + (1.0 - self.l1v) * theta);
        let exponent = -self.lv1 * (1.0 - self.lv1) * theta / (1.0 - (1.0 - self.lv1) * theta)
            - (1.0 - self.l1v) * theta / (self.l1v + (1.0 - self.l1v) * theta);
        (self.n_m / self.k) * (theta / (1.0 - theta)) * coef * exponent.exp()
    }
}

impl Default for WilsonVst {
    fn default() -> Self {
        Self::new()
    }
}

impl IsothermModel for WilsonVst {
    fn name(&self) -> &'static str {
        "Wilson-VST"
    }

    fn calculates(&self) -> Calculates {
        Calculates::Pressure
    }

    fn param_names(&self) -> &'static [&'static str] {
        &["n_m", "K", "L1v", "Lv1"]
    }

    fn params(&self) -> Vec<f64> {
        vec![self.n_m, self.k, self.l1v, self.lv1]
    }

    fn set_params(&mut self, params: &[f64]) -> Result<()> {
        let [n_m, k, l1v, lv1] = params else {
            return Err(PhysisorbError::ParameterInvalid {
                name: "params".into(),
                reason: format!("Wilson VST takes 4 parameters, got {}", params.len()),
            });
        };
        self.n_m = *n_m;
        self.k = *k;
        self.l1v = *l1v;
        self.lv1 = *lv1;
        Ok(())
    }

    fn param_bounds(&self) -> Vec<(f64, f64)> {
        vec![
            (0.0, f64::INFINITY),
            (0.0, f64::INFINITY),
            (1e-6, f64::INFINITY),
            (1e-6, f64::INFINITY),
        ]
    }

    fn initial_guess(&self, pressure: &[f64], loading: &[f64]) -> Result<Vec<f64>> {
        Ok(vec![
            saturation_seed(loading)?,
            henry_seed(pressure, loading)?,
            1.0,
            1.0,
        ])
    }

    fn loading(&self, pressure: f64) -> Result<f64> {
        vst_loading(pressure, self.n_m, |n| self.pressure_pure(n))
    }

    fn pressure(&self, loading: f64) -> Result<f64> {
        Ok(self.pressure_pure(loading))
    }

    fn spreading_pressure(&self, _pressure: f64) -> Result<f64> {
        Err(PhysisorbError::NotImplemented(
            "spreading pressure of the Wilson VST model".to_string(),
        ))
    }
}
