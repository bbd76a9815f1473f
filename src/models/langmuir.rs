//! The Langmuir monolayer equation, `n = n_m * K * p / (1 + K * p)`.

use crate::error::{PhysisorbError, Result};
use crate::models::fit::{henry_seed, saturation_seed};
use crate::models::model::{Calculates, IsothermModel};

#[derive(Debug, Clone)]
pub struct Langmuir {
    pub n_m: f64,
    pub k: f64,
}

impl Langmuir {
    pub fn new() -> Self {
        Self {
            n_m: f64::NAN,
            k: f64::NAN,
        }
    }
}

impl Default for Langmuir {
    fn default() -> Self {
        Self::new()
    }
}

impl IsothermModel for Langmuir {
    fn name(&self) -> &'static str {
        "Langmuir"
    }

    fn calculates(&self) -> Calculates {
        Calculates::Loading
    }

    fn param_names(&self) -> &'static [&'static str] {
        &["n_m", "K"]
    }

    fn params(&self) -> Vec<f64> {
        vec![self.n_m, self.k]
    }

    fn set_params(&mut self, params: &[f64]) -> Result<()> {
        let [n_m, k] = params else {
            return Err(PhysisorbError::ParameterInvalid {
                name: "params".into(),
                reason: format!("Langmuir takes 2 parameters, got {}", params.len()),
            });
        };
        self.n_m = *n_m;
        self.k = *k;
        Ok(())
    }

    fn param_bounds(&self) -> Vec<(f64, f64)> {
        vec![(0.0, f64::INFINITY), (0.0, f64::INFINITY)]
    }

    fn initial_guess(&self, pressure: &[f64], loading: &[f64]) -> Result<Vec<f64>> {
        let n_m = saturation_seed(loading)?;
        let k = henry_seed(pressure, loading)? / n_m;
        Ok(vec![n_m, k])
    }

    fn loading(&self, pressure: f64) -> Result<f64> {
        let kp = self.k * pressure;
        Ok(self.n_m * kp / (1.0 + kp))
    }

    fn pressure(&self, loading: f64) -> Result<f64> {
        if loading >= self.n_m {
            return Err(PhysisorbError::calculation(format!(
                "loading {loading} at or above the monolayer capacity {}",
                self.n_m
            )));
        }
        Ok(loading / (self.k * (self.n_m - loading)))
    }

    fn spreading_pressure(&self, pressure: f64) -> Result<f64> {
        Ok(self.n_m * (1.0 + self.k * pressure).ln())
    }
}
