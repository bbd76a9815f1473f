//! The Freundlich power law, `n = K * p^(1/m)`.

use crate::error::{PhysisorbError, Result};
use crate::models::fit::henry_seed;
use crate::models::model::{Calculates, IsothermModel};
use crate::numerics::linreg::linear_fit;

#[derive(Debug, Clone)]
pub struct Freundlich {
    pub k: f64,
    pub m: f64,
}

impl Freundlich {
    pub fn new() -> Self {
        Self {
            k: f64::NAN,
            m: f64::NAN,
        }
    }
}

impl Default for Freundlich {
    fn default() -> Self {
        Self::new()
    }
}

impl IsothermModel for Freundlich {
    fn name(&self) -> &'static str {
        "Freundlich"
    }

    fn calculates(&self) -> Calculates {
        Calculates::Loading
    }

    fn param_names(&self) -> &'static [&'static str] {
        &["K", "m"]
    }

    fn params(&self) -> Vec<f64> {
        vec![self.k, self.m]
    }

    fn set_params(&mut self, params: &[f64]) -> Result<()> {
        let [k, m] = params else {
            return Err(PhysisorbError::ParameterInvalid {
                name: "params".into(),
                reason: format!("Freundlich takes 2 parameters, got {}", params.len()),
            });
        };
        self.k = *k;
        self.m = *m;
        Ok(())
    }

    fn param_bounds(&self) -> Vec<(f64, f64)> {
        vec![(0.0, f64::INFINITY), (0.0, f64::INFINITY)]
    }

    /// Seeded from the log-log regression `ln n = ln K + (1/m) ln p`.
    fn initial_guess(&self, pressure: &[f64], loading: &[f64]) -> Result<Vec<f64>> {
        let mut ln_p = Vec::new();
        let mut ln_n = Vec::new();
        for (p, n) in pressure.iter().zip(loading) {
            if *p > 0.0 && *n > 0.0 {
                ln_p.push(p.ln());
                ln_n.push(n.ln());
            }
        }
        if let Ok(fit) = linear_fit(&ln_p, &ln_n)
            && fit.slope > 0.0
        {
            return Ok(vec![fit.intercept.exp(), 1.0 / fit.slope]);
        }
        Ok(vec![henry_seed(pressure, loading)?, 1.0])
    }

    fn loading(&self, pressure: f64) -> Result<f64> {
        Ok(self.k * pressure.powf(1.0 / self.m))
    }

    fn pressure(&self, loading: f64) -> Result<f64> {
        Ok((loading / self.k).powf(self.m))
    }

    /// `∫ K p^(1/m - 1) dp = m * K * p^(1/m) = m * n(p)`.
    fn spreading_pressure(&self, pressure: f64) -> Result<f64> {
        Ok(self.m * self.loading(pressure)?)
    }
}
