//! The BET multilayer equation,
//! `n = n_m * C * p / ((1 - N*p) * (1 - N*p + C*p))`.

use crate::error::{PhysisorbError, Result};
use crate::models::fit::{henry_seed, saturation_seed};
use crate::models::model::{Calculates, IsothermModel};

#[derive(Debug, Clone)]
pub struct Bet {
    pub n_m: f64,
    pub c: f64,
    pub n: f64,
}

impl Bet {
    pub fn new() -> Self {
        Self {
            n_m: f64::NAN,
            c: f64::NAN,
            n: f64::NAN,
        }
    }
}

impl Default for Bet {
    fn default() -> Self {
        Self::new()
    }
}

impl IsothermModel for Bet {
    fn name(&self) -> &'static str {
        "BET"
    }

    fn calculates(&self) -> Calculates {
        Calculates::Loading
    }

    fn param_names(&self) -> &'static [&'static str] {
        &["n_m", "C", "N"]
    }

    fn params(&self) -> Vec<f64> {
        vec![self.n_m, self.c, self.n]
    }

    fn set_params(&mut self, params: &[f64]) -> Result<()> {
        let [n_m, c, n] = params else {
            return Err(PhysisorbError::ParameterInvalid {
                name: "params".into(),
                reason: format!("BET takes 3 parameters, got {}", params.len()),
            });
        };
        self.n_m = *n_m;
        self.c = *c;
        self.n = *n;
        Ok(())
    }

    fn param_bounds(&self) -> Vec<(f64, f64)> {
        vec![
            (0.0, f64::INFINITY),
            (0.0, f64::INFINITY),
            (0.0, f64::INFINITY),
        ]
    }

    fn initial_guess(&self, pressure: &[f64], loading: &[f64]) -> Result<Vec<f64>> {
        let n_m = saturation_seed(loading)?;
        let c = henry_seed(pressure, loading)? / n_m;
        Ok(vec![n_m, c, 0.01 * c])
    }

    fn loading(&self, pressure: f64) -> Result<f64> {
        let np = self.n * pressure;
        let cp = self.c * pressure;
        Ok(self.n_m * cp / ((1.0 - np) * (1.0 - np + cp)))
    }

    /// Inversion through the quadratic
    /// `n*(N^2 - N*C)*p^2 + (n*(C - 2N) - n_m*C)*p + n = 0`,
    /// taking the physical root below `1/N`.
    fn pressure(&self, loading: f64) -> Result<f64> {
        let a = loading * (self.n * self.n - self.n * self.c);
        let b = loading * (self.c - 2.0 * self.n) - self.n_m * self.c;
        let c = loading;
        let roots: Vec<f64> = if a.abs() < 1e-300 {
            if b == 0.0 { vec![] } else { vec![-c / b] }
        } else {
            let disc = b * b - 4.0 * a * c;
            if disc < 0.0 {
                vec![]
            } else {
                let s = disc.sqrt();
                vec![(-b + s) / (2.0 * a), (-b - s) / (2.0 * a)]
            }
        };
        let ceiling = if self.n > 0.0 { 1.0 / self.n } else { f64::INFINITY };
        roots
            .into_iter()
            .filter(|p| *p > 0.0 && *p < ceiling)
            .min_by(|x, y| x.partial_cmp(y).unwrap())
            .ok_or_else(|| {
                PhysisorbError::calculation(format!(
                    "no physical pressure for loading {loading} in the BET equation"
                ))
            })
    }

    fn spreading_pressure(&self, pressure: f64) -> Result<f64> {
        let np = self.n * pressure;
        let cp = self.c * pressure;
        if np >= 1.0 {
            return Err(PhysisorbError::calculation(format!(
                "pressure {pressure} at or above the BET condensation limit"
            )));
        }
        Ok(self.n_m * ((1.0 - np + cp) / (1.0 - np)).ln())
    }
}
