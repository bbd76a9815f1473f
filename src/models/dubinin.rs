//! The Dubinin pore-filling family, defined on the relative pressure
//! axis: `n = n_m * exp(-(R*T*ln(p0/p) / eps)^m)` with `m = 2` for
//! Dubinin-Radushkevich and a fitted `m in [1, 3]` for Dubinin-Astakhov.
//! `eps` is the characteristic adsorption energy in J/mol.

use crate::constants::GAS_CONSTANT;
use crate::error::{PhysisorbError, Result};
use crate::models::fit::saturation_seed;
use crate::models::model::{Calculates, IsothermModel};
use crate::numerics::quadrature::simpson;

const FALLBACK_EPS: f64 = 5000.0;

fn check_temperature(temperature: f64) -> Result<f64> {
    if temperature.is_finite() && temperature > 0.0 {
        Ok(temperature)
    } else {
        Err(PhysisorbError::ParameterInvalid {
            name: "temperature".into(),
            reason: format!("Dubinin models need a positive temperature, got {temperature}"),
        })
    }
}

fn dubinin_loading(n_m: f64, eps: f64, exponent: f64, rt: f64, p_rel: f64) -> f64 {
    if p_rel <= 0.0 {
        return 0.0;
    }
    let potential = rt * (1.0 / p_rel).ln().max(0.0);
    n_m * (-(potential / eps).powf(exponent)).exp()
}

fn dubinin_pressure(n_m: f64, eps: f64, exponent: f64, rt: f64, loading: f64) -> Result<f64> {
    if !(loading > 0.0) {
        return Err(PhysisorbError::calculation(format!(
            "Dubinin inversion needs positive loading, got {loading}"
        )));
    }
    if loading > n_m {
        return Err(PhysisorbError::calculation(format!(
            "loading {loading} above the micropore capacity {n_m}"
        )));
    }
    let potential = eps * (n_m / loading).ln().powf(1.0 / exponent);
    Ok((-potential / rt).exp())
}

/// Quadrature of `n(p)/p dp = n(e^u) du` in `u = ln p`; the integrand
/// vanishes super-exponentially towards low pressure.
fn dubinin_spreading(n_m: f64, eps: f64, exponent: f64, rt: f64, p_rel: f64) -> Result<f64> {
    if !(p_rel > 0.0) {
        return Err(PhysisorbError::calculation(format!(
            "spreading pressure needs p > 0, got {p_rel}"
        )));
    }
    let u_hi = p_rel.ln();
    let u_lo = (1e-12f64).ln();
    if u_hi <= u_lo {
        return Ok(0.0);
    }
    Ok(simpson(
        |u| dubinin_loading(n_m, eps, exponent, rt, u.exp()),
        u_lo,
        u_hi,
        400,
    ))
}

/// Characteristic energy seeded from the data point nearest the median
/// pressure.
fn eps_seed(pressure: &[f64], loading: &[f64], n_m: f64, exponent: f64, rt: f64) -> f64 {
    let mut usable: Vec<(f64, f64)> = pressure
        .iter()
        .zip(loading)
        .filter(|(p, n)| **p > 0.0 && **p < 1.0 && **n > 0.0 && **n < n_m)
        .map(|(p, n)| (*p, *n))
        .collect();
    if usable.is_empty() {
        return FALLBACK_EPS;
    }
    usable.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
    let (p, n) = usable[usable.len() / 2];
    let eps = rt * (1.0 / p).ln() / (n_m / n).ln().powf(1.0 / exponent);
    if eps.is_finite() && eps > 0.0 { eps } else { FALLBACK_EPS }
}

#[derive(Debug, Clone)]
pub struct DubininRadushkevich {
    pub n_m: f64,
    pub eps: f64,
    temperature: f64,
}

impl DubininRadushkevich {
    pub fn new(temperature: f64) -> Result<Self> {
        Ok(Self {
            n_m: f64::NAN,
            eps: f64::NAN,
            temperature: check_temperature(temperature)?,
        })
    }

    fn rt(&self) -> f64 {
        GAS_CONSTANT * self.temperature
    }
}

impl IsothermModel for DubininRadushkevich {
    fn name(&self) -> &'static str {
        "Dubinin-Radushkevich"
    }

    fn calculates(&self) -> Calculates {
        Calculates::Loading
    }

    fn param_names(&self) -> &'static [&'static str] {
        &["n_m", "eps"]
    }

    fn params(&self) -> Vec<f64> {
        vec![self.n_m, self.eps]
    }

    fn set_params(&mut self, params: &[f64]) -> Result<()> {
        let [n_m, eps] = params else {
            return Err(PhysisorbError::ParameterInvalid {
                name: "params".into(),
                reason: format!(
                    "Dubinin-Radushkevich takes 2 parameters, got {}",
                    params.len()
                ),
            });
        };
        self.n_m = *n_m;
        self.eps = *eps;
        Ok(())
    }

    fn param_bounds(&self) -> Vec<(f64, f64)> {
        vec![(0.0, f64::INFINITY), (1.0, f64::INFINITY)]
    }

    fn initial_guess(&self, pressure: &[f64], loading: &[f64]) -> Result<Vec<f64>> {
        let n_m = saturation_seed(loading)?;
        Ok(vec![n_m, eps_seed(pressure, loading, n_m, 2.0, self.rt())])
    }

    fn loading(&self, pressure: f64) -> Result<f64> {
        Ok(dubinin_loading(self.n_m, self.eps, 2.0, self.rt(), pressure))
    }

    fn pressure(&self, loading: f64) -> Result<f64> {
        dubinin_pressure(self.n_m, self.eps, 2.0, self.rt(), loading)
    }

    fn spreading_pressure(&self, pressure: f64) -> Result<f64> {
        dubinin_spreading(self.n_m, self.eps, 2.0, self.rt(), pressure)
    }

    fn requires_relative_pressure(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
pub struct DubininAstakhov {
    pub n_m: f64,
    pub eps: f64,
    pub m: f64,
    temperature: f64,
}

impl DubininAstakhov {
    pub fn new(temperature: f64) -> Result<Self> {
        Ok(Self {
            n_m: f64::NAN,
            eps: f64::NAN,
            m: f64::NAN,
            temperature: check_temperature(temperature)?,
        })
    }

    fn rt(&self) -> f64 {
        GAS_CONSTANT * self.temperature
    }
}

impl IsothermModel for DubininAstakhov {
    fn name(&self) -> &'static str {
        "Dubinin-Astakhov"
    }

    fn calculates(&self) -> Calculates {
        Calculates::Loading
    }

    fn param_names(&self) -> &'static [&'static str] {
        &["n_m", "eps", "m"]
    }

    fn params(&self) -> Vec<f64> {
        vec![self.n_m, self.eps, self.m]
    }

    fn set_params(&mut self, params: &[f64]) -> Result<()> {
        let [n_m, eps, m] = params else {
            return Err(PhysisorbError::ParameterInvalid {
                name: "params".into(),
                reason: format!("Dubinin-Astakhov takes 3 parameters, got {}", params.len()),
            });
        };
        self.n_m = *n_m;
        self.eps = *eps;
        self.m = *m;
        Ok(())
    }

    fn param_bounds(&self) -> Vec<(f64, f64)> {
        vec![(0.0, f64::INFINITY), (1.0, f64::INFINITY), (1.0, 3.0)]
    }

    fn initial_guess(&self, pressure: &[f64], loading: &[f64]) -> Result<Vec<f64>> {
        let n_m = saturation_seed(loading)?;
        Ok(vec![
            n_m,
            eps_seed(pressure, loading, n_m, 2.0, self.rt()),
            2.0,
        ])
    }

    fn loading(&self, pressure: f64) -> Result<f64> {
        Ok(dubinin_loading(
            self.n_m, self.eps, self.m, self.rt(), pressure,
        ))
    }

    fn pressure(&self, loading: f64) -> Result<f64> {
        dubinin_pressure(self.n_m, self.eps, self.m, self.rt(), loading)
    }

    fn spreading_pressure(&self, pressure: f64) -> Result<f64> {
        dubinin_spreading(self.n_m, self.eps, self.m, self.rt(), pressure)
    }

    fn requires_relative_pressure(&self) -> bool {
        true
    }
}
