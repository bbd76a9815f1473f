//! The adsorbate descriptor.
//!
//! An adsorbate is identified by a canonical name plus a set of aliases
//! (matched case-insensitively). It carries a scalar property map with a
//! set of recognised keys (see the `prop` constants) and any number of
//! user extensions. Thermodynamic getters first try the pluggable
//! backend, then the property map, and signal a parameter-missing or
//! calculation-failed error when neither works.

use crate::constants::{ATMOSPHERE, GAS_CONSTANT};
use crate::error::{PhysisorbError, Result};
use crate::species::backend::PropertyBackend;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Recognised property map keys.
pub mod prop {
    /// g/mol
    pub const MOLAR_MASS: &str = "molar_mass";
    /// nm2, projected area of one molecule in the monolayer
    pub const CROSS_SECTIONAL_AREA: &str = "cross_sectional_area";
    /// g/cm3
    pub const LIQUID_DENSITY: &str = "liquid_density";
    /// g/cm3
    pub const GAS_DENSITY: &str = "gas_density";
    /// mN/m
    pub const SURFACE_TENSION: &str = "surface_tension";
    /// kJ/mol
    pub const ENTHALPY_LIQUEFACTION: &str = "enthalpy_liquefaction";
    /// Pa, scalar override also used as pseudo-saturation pressure
    /// for supercritical work
    pub const SATURATION_PRESSURE: &str = "saturation_pressure";
    /// K
    pub const T_CRITICAL: &str = "t_critical";
    /// Antoine coefficients, log10(p/bar) = A - B / (T + C)
    pub const ANTOINE_A: &str = "antoine_a";
    pub const ANTOINE_B: &str = "antoine_b";
    pub const ANTOINE_C: &str = "antoine_c";
    /// optional Antoine validity range, K
    pub const ANTOINE_TMIN: &str = "antoine_tmin";
    pub const ANTOINE_TMAX: &str = "antoine_tmax";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adsorbate {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub properties: HashMap<String, f64>,
    #[serde(skip)]
    backend: Option<Arc<dyn PropertyBackend>>,
}

impl Adsorbate {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            aliases: Vec::new(),
            properties: HashMap::new(),
            backend: None,
        }
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_property(mut self, key: &str, value: f64) -> Self {
        self.properties.insert(key.to_string(), value);
        self
    }

    pub fn set_backend(&mut self, backend: Arc<dyn PropertyBackend>) {
        self.backend = Some(backend);
    }

    /// Case-insensitive match against the canonical name or any alias.
    pub fn matches(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.name.to_lowercase() == lower
            || self.aliases.iter().any(|a| a.to_lowercase() == lower)
    }

    pub fn get_property(&self, key: &str) -> Option<f64> {
        self.properties.get(key).copied()
    }

    fn require_property(&self, key: &str) -> Result<f64> {
        self.get_property(key).ok_or_else(|| {
            PhysisorbError::missing(format!("property '{key}' of adsorbate '{}'", self.name))
        })
    }

    /// Molar mass, g/mol.
    pub fn molar_mass(&self) -> Result<f64> {
        if let Some(backend) = &self.backend
            && let Ok(v) = backend.molar_mass(&self.name)
        {
            return Ok(v);
        }
        self.require_property(prop::MOLAR_MASS)
    }

    /// Cross-sectional area of one adsorbed molecule, nm2.
    pub fn cross_sectional_area(&self) -> Result<f64> {
        self.require_property(prop::CROSS_SECTIONAL_AREA)
    }

    /// Saturation pressure at `temperature` (K), Pa.
    ///
    /// Order of resolution: backend, scalar override in the property map,
    /// Antoine coefficients in the property map. Above the critical
    /// temperature only the scalar override (a pseudo-saturation
    /// pressure) is accepted.
    pub fn saturation_pressure(&self, temperature: f64) -> Result<f64> {
        if let Some(backend) = &self.backend
            && let Ok(v) = backend.saturation_pressure(&self.name, temperature)
        {
            return Ok(v);
        }
        if let Some(p) = self.get_property(prop::SATURATION_PRESSURE) {
            return Ok(p);
        }
        if let Some(tc) = self.get_property(prop::T_CRITICAL)
            && temperature > tc
        {
            return Err(PhysisorbError::calculation(format!(
                "adsorbate '{}' is supercritical at {temperature} K (Tc = {tc} K); \
                 supply a pseudo-saturation pressure via the '{}' property",
                self.name,
                prop::SATURATION_PRESSURE
            )));
        }
        match (
            self.get_property(prop::ANTOINE_A),
            self.get_property(prop::ANTOINE_B),
            self.get_property(prop::ANTOINE_C),
        ) {
            (Some(a), Some(b), Some(c)) => {
                if let (Some(tmin), Some(tmax)) = (
                    self.get_property(prop::ANTOINE_TMIN),
                    self.get_property(prop::ANTOINE_TMAX),
                ) && (temperature < tmin || temperature > tmax)
                {
                    warn!(
                        "Antoine correlation of '{}' used outside its range \
                         ({tmin}-{tmax} K) at {temperature} K",
                        self.name
                    );
                }
                let log10_p_bar = a - b / (temperature + c);
                Ok(10f64.powf(log10_p_bar) * 1.0e5)
            }
            _ => Err(PhysisorbError::missing(format!(
                "saturation pressure of adsorbate '{}' at {temperature} K",
                self.name
            ))),
        }
    }

    /// Surface tension at `temperature` (K), mN/m.
    pub fn surface_tension(&self, temperature: f64) -> Result<f64> {
        if let Some(backend) = &self.backend
            && let Ok(v) = backend.surface_tension(&self.name, temperature)
        {
            return Ok(v);
        }
        self.require_property(prop::SURFACE_TENSION)
    }

    /// Liquid density at `temperature` (K), g/cm3.
    pub fn liquid_density(&self, temperature: f64) -> Result<f64> {
        if let Some(backend) = &self.backend
            && let Ok(v) = backend.liquid_density(&self.name, temperature)
        {
            return Ok(v);
        }
        self.require_property(prop::LIQUID_DENSITY)
    }

    /// Liquid molar density at `temperature` (K), mol/cm3.
    pub fn liquid_molar_density(&self, temperature: f64) -> Result<f64> {
        Ok(self.liquid_density(temperature)? / self.molar_mass()?)
    }

    /// Gas density at `temperature` (K), g/cm3. When neither the backend
    /// nor the map can provide one, an ideal-gas estimate at 1 atm is used.
    pub fn gas_density(&self, temperature: f64) -> Result<f64> {
        if let Some(backend) = &self.backend
            && let Ok(v) = backend.gas_density(&self.name, temperature)
        {
            return Ok(v);
        }
        if let Some(v) = self.get_property(prop::GAS_DENSITY) {
            return Ok(v);
        }
        let molar_mass = self.molar_mass()?;
        // mol/m3 at 1 atm, then g/cm3
        Ok(ATMOSPHERE / (GAS_CONSTANT * temperature) * molar_mass / 1.0e6)
    }

    /// Gas molar density at `temperature` (K), mol/cm3.
    pub fn gas_molar_density(&self, temperature: f64) -> Result<f64> {
        Ok(self.gas_density(temperature)? / self.molar_mass()?)
    }

    /// Enthalpy of liquefaction at `temperature` (K), kJ/mol.
    pub fn enthalpy_liquefaction(&self, temperature: f64) -> Result<f64> {
        if let Some(backend) = &self.backend
            && let Ok(v) = backend.enthalpy_liquefaction(&self.name, temperature)
        {
            return Ok(v);
        }
        self.require_property(prop::ENTHALPY_LIQUEFACTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn alias_matching_is_case_insensitive() {
        let ads = Adsorbate::new("nitrogen").with_aliases(&["N2"]);
        assert!(ads.matches("NITROGEN"));
        assert!(ads.matches("n2"));
        assert!(!ads.matches("argon"));
    }

    #[test]
    fn scalar_override_beats_antoine() {
        let ads = Adsorbate::new("test")
            .with_property(prop::SATURATION_PRESSURE, 12345.0)
            .with_property(prop::ANTOINE_A, 3.7)
            .with_property(prop::ANTOINE_B, 264.0)
            .with_property(prop::ANTOINE_C, -6.8);
        assert_relative_eq!(ads.saturation_pressure(77.0).unwrap(), 12345.0);
    }

    #[test]
    fn supercritical_without_override_fails() {
        let ads = Adsorbate::new("methane")
            .with_property(prop::T_CRITICAL, 190.6)
            .with_property(prop::ANTOINE_A, 3.99)
            .with_property(prop::ANTOINE_B, 443.0)
            .with_property(prop::ANTOINE_C, -0.49);
        assert!(ads.saturation_pressure(298.15).is_err());
    }

    #[test]
    fn ideal_gas_density_fallback() {
        let ads = Adsorbate::new("nitrogen").with_property(prop::MOLAR_MASS, 28.0134);
        let rho = ads.gas_density(273.15).unwrap();
        // 1 mol / 22.414 L * 28 g => ~1.25e-3 g/cm3
        assert_relative_eq!(rho, 1.2498e-3, max_relative = 1e-3);
    }

    #[test]
    fn missing_property_reports_parameter_error() {
        let ads = Adsorbate::new("bare");
        assert!(matches!(
            ads.molar_mass(),
            Err(PhysisorbError::ParameterMissing(_))
        ));
    }
}
