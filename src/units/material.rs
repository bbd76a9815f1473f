//! Material bases and the material-denominator converter.
//!
//! Loadings are stored per one material unit. Changing the material basis
//! or unit rescales the loading by the ratio of the two denominators,
//! pivoting through grams of material: mass <-> molar needs the material
//! molar mass, mass <-> volume needs the material density.

use crate::error::{PhysisorbError, Result};
use crate::species::material::Material;
use crate::units::loading::{AmountDimension, AmountUnit};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialBasis {
    Mass,
    Molar,
    Volume,
}

impl MaterialBasis {
    pub fn accepts_unit(&self, unit: AmountUnit) -> bool {
        match self {
            MaterialBasis::Mass => unit.dimension() == AmountDimension::Mass,
            MaterialBasis::Molar => unit.dimension() == AmountDimension::Molar,
            MaterialBasis::Volume => {
                unit.dimension() == AmountDimension::Volume && unit != AmountUnit::Cm3Stp
            }
        }
    }
}

impl fmt::Display for MaterialBasis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            MaterialBasis::Mass => "mass",
            MaterialBasis::Molar => "molar",
            MaterialBasis::Volume => "volume",
        };
        write!(f, "{s}")
    }
}

impl FromStr for MaterialBasis {
    type Err = PhysisorbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mass" => Ok(MaterialBasis::Mass),
            "molar" => Ok(MaterialBasis::Molar),
            "volume" => Ok(MaterialBasis::Volume),
            other => Err(PhysisorbError::Parsing(format!(
                "unknown material basis '{other}'"
            ))),
        }
    }
}

/// Grams of material contained in one material unit.
fn grams_per_unit(basis: MaterialBasis, unit: AmountUnit, material: &Material) -> Result<f64> {
    if !basis.accepts_unit(unit) {
        return Err(PhysisorbError::ParameterInvalid {
            name: "material_unit".into(),
            reason: format!("unit '{unit}' does not match material basis '{basis}'"),
        });
    }
    match basis {
        MaterialBasis::Mass => Ok(unit.factor()),
        MaterialBasis::Molar => Ok(unit.factor() * material.molar_mass()?),
        MaterialBasis::Volume => Ok(unit.factor() * material.density()?),
    }
}

/// Convert loading values from "per (basis_from, unit_from) of material"
/// to "per (basis_to, unit_to)".
pub fn convert_material(
    values: &[f64],
    basis_from: MaterialBasis,
    unit_from: AmountUnit,
    basis_to: MaterialBasis,
    unit_to: AmountUnit,
    material: &Material,
) -> Result<Vec<f64>> {
    if basis_from == basis_to && unit_from == unit_to {
        return Ok(values.to_vec());
    }
    let g_from = grams_per_unit(basis_from, unit_from, material)?;
    let g_to = grams_per_unit(basis_to, unit_to, material)?;
    let ratio = g_to / g_from;
    Ok(values
        .iter()
        .map(|&v| if v.is_nan() { f64::NAN } else { v * ratio })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn per_gram_to_per_kilogram() {
        let mat = Material::new("silica");
        let out = convert_material(
            &[1.0],
            MaterialBasis::Mass,
            AmountUnit::Gram,
            MaterialBasis::Mass,
            AmountUnit::Kilogram,
            &mat,
        )
        .unwrap();
        assert_relative_eq!(out[0], 1000.0, epsilon = 1e-12);
    }

    #[test]
    fn mass_to_volume_needs_density() {
        let mat = Material::new("silica");
        let err = convert_material(
            &[1.0],
            MaterialBasis::Mass,
            AmountUnit::Gram,
            MaterialBasis::Volume,
            AmountUnit::Cm3,
            &mat,
        );
        assert!(err.is_err());

        let mut mat = Material::new("silica");
        mat.set_property("density", 2.2);
        let out = convert_material(
            &[1.0],
            MaterialBasis::Mass,
            AmountUnit::Gram,
            MaterialBasis::Volume,
            AmountUnit::Cm3,
            &mat,
        )
        .unwrap();
        // per cm3 of a 2.2 g/cm3 material holds 2.2x the per-gram loading
        assert_relative_eq!(out[0], 2.2, epsilon = 1e-12);
    }
}
