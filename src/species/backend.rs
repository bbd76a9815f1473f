//! Pluggable thermodynamic property source for adsorbates.
//!
//! An implementation typically wraps an equation-of-state library or a
//! tabulated fluid database. The core never requires a backend: every
//! adsorbate getter falls back to the scalar property map when the backend
//! is absent or reports failure, so scalar overrides supplied by the user
//! always work.

use crate::error::Result;
use std::fmt;

/// Temperature-dependent property provider for a named adsorbate.
/// Temperatures are in K; returned units are the crate conventions
/// (g/mol, Pa, mN/m, g/cm3, kJ/mol).
pub trait PropertyBackend: Send + Sync + fmt::Debug {
    fn molar_mass(&self, adsorbate: &str) -> Result<f64>;
    fn saturation_pressure(&self, adsorbate: &str, temperature: f64) -> Result<f64>;
    fn surface_tension(&self, adsorbate: &str, temperature: f64) -> Result<f64>;
    fn liquid_density(&self, adsorbate: &str, temperature: f64) -> Result<f64>;
    fn gas_density(&self, adsorbate: &str, temperature: f64) -> Result<f64>;
    fn enthalpy_liquefaction(&self, adsorbate: &str, temperature: f64) -> Result<f64>;
}
