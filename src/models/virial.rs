//! The virial equation, `p = (n/K) * exp(A*n + B*n^2 + C*n^3)`.
//! Pressure-explicit; loading is recovered by root-finding.

use crate::error::{PhysisorbError, Result};
use crate::models::fit::henry_seed;
use crate::models::model::{Calculates, IsothermModel};
use crate::numerics::solver::brent_root;

#[derive(Debug, Clone)]
pub struct Virial {
    pub k: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Virial {
    pub fn new() -> Self {
        Self {
            k: f64::NAN,
            a: f64::NAN,
            b: f64::NAN,
            c: f64::NAN,
        }
    }

    fn pressure_pure(&self, n: f64) -> f64 {
        (n / self.k) * (self.a * n + self.b * n * n + self.c * n * n * n).exp()
    }
}

impl Default for Virial {
    fn default() -> Self {
        Self::new()
    }
}

/// Prepend a synthetic Henry-law point at a tenth of the lowest measured
/// loading. Stabilises the low-coverage coefficients when the dataset
/// starts at high loading; opt-in, the fit itself never injects data.
pub fn with_synthetic_low_loading(
    pressure: &[f64],
    loading: &[f64],
) -> Result<(Vec<f64>, Vec<f64>)> {
    let slope = henry_seed(pressure, loading)?;
    let n_low = loading
        .iter()
        .cloned()
        .filter(|n| *n > 0.0)
        .fold(f64::INFINITY, f64::min)
        / 10.0;
    let mut p_out = Vec::with_capacity(pressure.len() + 1);
    let mut n_out = Vec::with_capacity(loading.len() + 1);
    p_out.push(n_low / slope);
    n_out.push(n_low);
    p_out.extend_from_slice(pressure);
    n_out.extend_from_slice(loading);
    Ok((p_out, n_out))
}

impl IsothermModel for Virial {
    fn name(&self) -> &'static str {
        "Virial"
    }

    fn calculates(&self) -> Calculates {
        Calculates::Pressure
    }

    fn param_names(&self) -> &'static [&'static str] {
        &["K", "A", "B", "C"]
    }

    fn params(&self) -> Vec<f64> {
        vec![self.k, self.a, self.b, self.c]
    }

    fn set_params(&mut self, params: &[f64]) -> Result<()> {
        let [k, a, b, c] = params else {
            return Err(PhysisorbError::ParameterInvalid {
                name: "params".into(),
                reason: format!("Virial takes 4 parameters, got {}", params.len()),
            });
        };
        self.k = *k;
        self.a = *a;
        self.b = *b;
        self.c = *c;
        Ok(())
    }

    fn param_bounds(&self) -> Vec<(f64, f64)> {
        vec![
            (1e-300, f64::INFINITY),
            (f64::NEG_INFINITY, f64::INFINITY),
            (f64::NEG_INFINITY, f64::INFINITY),
            (f64::NEG_INFINITY, f64::INFINITY),
        ]
    }

    fn initial_guess(&self, pressure: &[f64], loading: &[f64]) -> Result<Vec<f64>> {
        Ok(vec![henry_seed(pressure, loading)?, 0.0, 0.0, 0.0])
    }

    fn loading(&self, pressure: f64) -> Result<f64> {
        if pressure <= 0.0 {
            return Ok(0.0);
        }
        // expand the bracket until the virial pressure exceeds the query
        let mut hi = 1.0;
        let mut expansions = 0;
        while self.pressure_pure(hi).is_finite() && self.pressure_pure(hi) < pressure {
            hi *= 2.0;
            expansions += 1;
            if expansions > 200 {
                break;
            }
        }
        if !(self.pressure_pure(hi) >= pressure) {
            return Err(PhysisorbError::calculation(format!(
                "virial loading at pressure {pressure} cannot be bracketed"
            )));
        }
        brent_root(|n| self.pressure_pure(n) - pressure, 0.0, hi, 1e-12, 200).map_err(|e| {
            PhysisorbError::calculation(format!(
                "virial loading at pressure {pressure} did not converge: {e}"
            ))
        })
    }

    fn pressure(&self, loading: f64) -> Result<f64> {
        Ok(self.pressure_pure(loading))
    }

    fn spreading_pressure(&self, _pressure: f64) -> Result<f64> {
        Err(PhysisorbError::NotImplemented(
            "spreading pressure of the virial model".to_string(),
        ))
    }
}
