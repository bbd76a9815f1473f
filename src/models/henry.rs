//! Henry's law, `n = K * p`.

use crate::error::{PhysisorbError, Result};
use crate::models::fit::henry_seed;
use crate::models::model::{Calculates, IsothermModel};

#[derive(Debug, Clone)]
pub struct Henry {
    pub k: f64,
}

impl Henry {
    pub fn new() -> Self {
        Self { k: f64::NAN }
    }
}

impl Default for Henry {
    fn default() -> Self {
        Self::new()
    }
}

impl IsothermModel for Henry {
    fn name(&self) -> &'static str {
        "Henry"
    }

    fn calculates(&self) -> Calculates {
        Calculates::Loading
    }

    fn param_names(&self) -> &'static [&'static str] {
        &["K"]
    }

    fn params(&self) -> Vec<f64> {
        vec![self.k]
    }

    fn set_params(&mut self, params: &[f64]) -> Result<()> {
        let [k] = params else {
            return Err(PhysisorbError::ParameterInvalid {
                name: "params".into(),
                reason: format!("Henry takes 1 parameter, got {}", params.len()),
            });
        };
        self.k = *k;
        Ok(())
    }

    fn param_bounds(&self) -> Vec<(f64, f64)> {
        vec![(0.0, f64::INFINITY)]
    }

    fn initial_guess(&self, pressure: &[f64], loading: &[f64]) -> Result<Vec<f64>> {
        Ok(vec![henry_seed(pressure, loading)?])
    }

    fn loading(&self, pressure: f64) -> Result<f64> {
        Ok(self.k * pressure)
    }

    fn pressure(&self, loading: f64) -> Result<f64> {
        Ok(loading / self.k)
    }

    fn spreading_pressure(&self, pressure: f64) -> Result<f64> {
        Ok(self.k * pressure)
    }
}
