//! Loading bases, amount units and the loading converter.
//!
//! The pivot quantity is moles of adsorbate per one material unit.
//! Conversions between the molar / mass / volume bases consult the
//! adsorbate molar mass and its gas or liquid density at the isotherm
//! temperature. Conversions to or from the fraction / percent bases
//! additionally need the material basis and unit of the isotherm.
//!
//! A loading given in "cm3" is treated as gas volume at the isotherm
//! temperature; the dedicated `Cm3Stp` unit is the conventional
//! cm3(STP) measure (273.15 K, 1 atm ideal-gas molar volume).

use crate::constants::STP_MOLAR_VOLUME;
use crate::error::{PhysisorbError, Result};
use crate::species::adsorbate::Adsorbate;
use crate::units::material::MaterialBasis;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadingBasis {
    Molar,
    Mass,
    VolumeGas,
    VolumeLiquid,
    Fraction,
    Percent,
}

impl LoadingBasis {
    /// Fraction and percent loadings carry no unit.
    pub fn is_unitless(&self) -> bool {
        matches!(self, LoadingBasis::Fraction | LoadingBasis::Percent)
    }

    pub fn accepts_unit(&self, unit: AmountUnit) -> bool {
        match self {
            LoadingBasis::Molar => unit.dimension() == AmountDimension::Molar,
            LoadingBasis::Mass => unit.dimension() == AmountDimension::Mass,
            LoadingBasis::VolumeGas | LoadingBasis::VolumeLiquid => {
                unit.dimension() == AmountDimension::Volume
            }
            LoadingBasis::Fraction | LoadingBasis::Percent => false,
        }
    }
}

impl fmt::Display for LoadingBasis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            LoadingBasis::Molar => "molar",
            LoadingBasis::Mass => "mass",
            LoadingBasis::VolumeGas => "volume_gas",
            LoadingBasis::VolumeLiquid => "volume_liquid",
            LoadingBasis::Fraction => "fraction",
            LoadingBasis::Percent => "percent",
        };
        write!(f, "{s}")
    }
}

impl FromStr for LoadingBasis {
    type Err = PhysisorbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "molar" => Ok(LoadingBasis::Molar),
            "mass" => Ok(LoadingBasis::Mass),
            "volume_gas" | "volume" => Ok(LoadingBasis::VolumeGas),
            "volume_liquid" => Ok(LoadingBasis::VolumeLiquid),
            "fraction" => Ok(LoadingBasis::Fraction),
            "percent" | "%" => Ok(LoadingBasis::Percent),
            other => Err(PhysisorbError::Parsing(format!(
                "unknown loading basis '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountDimension {
    Molar,
    Mass,
    Volume,
}

/// Units for amounts of substance, used both for loadings and for the
/// material denominator. Base units of the three dimensions are
/// mol, g and cm3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmountUnit {
    Millimole,
    Mole,
    Kilomole,
    Milligram,
    Gram,
    Kilogram,
    Cm3,
    Millilitre,
    Dm3,
    Litre,
    M3,
    /// Gas volume re-expressed at standard temperature and pressure.
    Cm3Stp,
}

impl AmountUnit {
    pub fn dimension(&self) -> AmountDimension {
        match self {
            AmountUnit::Millimole | AmountUnit::Mole | AmountUnit::Kilomole => {
                AmountDimension::Molar
            }
            AmountUnit::Milligram | AmountUnit::Gram | AmountUnit::Kilogram => {
                AmountDimension::Mass
            }
            _ => AmountDimension::Volume,
        }
    }

    /// Multiplier taking one of this unit to the base unit of its
    /// dimension (mol, g or cm3).
    pub fn factor(&self) -> f64 {
        match self {
            AmountUnit::Millimole => 1.0e-3,
            AmountUnit::Mole => 1.0,
            AmountUnit::Kilomole => 1.0e3,
            AmountUnit::Milligram => 1.0e-3,
            AmountUnit::Gram => 1.0,
            AmountUnit::Kilogram => 1.0e3,
            AmountUnit::Cm3 | AmountUnit::Millilitre | AmountUnit::Cm3Stp => 1.0,
            AmountUnit::Dm3 | AmountUnit::Litre => 1.0e3,
            AmountUnit::M3 => 1.0e6,
        }
    }
}

impl fmt::Display for AmountUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            AmountUnit::Millimole => "mmol",
            AmountUnit::Mole => "mol",
            AmountUnit::Kilomole => "kmol",
            AmountUnit::Milligram => "mg",
            AmountUnit::Gram => "g",
            AmountUnit::Kilogram => "kg",
            AmountUnit::Cm3 => "cm3",
            AmountUnit::Millilitre => "mL",
            AmountUnit::Dm3 => "dm3",
            AmountUnit::Litre => "L",
            AmountUnit::M3 => "m3",
            AmountUnit::Cm3Stp => "cm3(STP)",
        };
        write!(f, "{s}")
    }
}

impl FromStr for AmountUnit {
    type Err = PhysisorbError;

    fn from_str(s: &str) -> Result<Self> {
        let t = s.trim();
        // STP suffix overrides the plain volume reading
        if t.to_uppercase().contains("STP") {
            return Ok(AmountUnit::Cm3Stp);
        }
        match t {
            "mmol" => Ok(AmountUnit::Millimole),
            "mol" => Ok(AmountUnit::Mole),
            "kmol" => Ok(AmountUnit::Kilomole),
            "mg" => Ok(AmountUnit::Milligram),
            "g" => Ok(AmountUnit::Gram),
            "kg" => Ok(AmountUnit::Kilogram),
            "cm3" | "cm³" => Ok(AmountUnit::Cm3),
            "mL" | "ml" => Ok(AmountUnit::Millilitre),
            "dm3" | "dm³" => Ok(AmountUnit::Dm3),
            "L" | "l" => Ok(AmountUnit::Litre),
            "m3" | "m³" => Ok(AmountUnit::M3),
            other => Err(PhysisorbError::Parsing(format!(
                "unknown amount unit '{other}'"
            ))),
        }
    }
}

/// Context needed by loading conversions that touch the fraction or
/// percent bases.
#[derive(Debug, Clone, Copy)]
pub struct MaterialContext {
    pub basis: MaterialBasis,
    pub unit: AmountUnit,
}

impl MaterialContext {
    /// Moles / grams / cm3 of material contained in one material unit,
    /// expressed in the base unit of the material basis dimension.
    fn base_amount(&self) -> f64 {
        self.unit.factor()
    }
}

fn unit_or_missing(unit: Option<AmountUnit>, basis: LoadingBasis) -> Result<AmountUnit> {
    unit.ok_or_else(|| PhysisorbError::missing(format!("loading unit for basis '{basis}'")))
}

/// Moles of adsorbate represented by one loading value.
fn to_mol(
    v: f64,
    basis: LoadingBasis,
    unit: Option<AmountUnit>,
    adsorbate: &Adsorbate,
    temperature_k: f64,
    mat: &MaterialContext,
) -> Result<f64> {
    match basis {
        LoadingBasis::Molar => Ok(v * unit_or_missing(unit, basis)?.factor()),
        LoadingBasis::Mass => {
            Ok(v * unit_or_missing(unit, basis)?.factor() / adsorbate.molar_mass()?)
        }
        LoadingBasis::VolumeGas => {
            let unit = unit_or_missing(unit, basis)?;
            if unit == AmountUnit::Cm3Stp {
                Ok(v / STP_MOLAR_VOLUME)
            } else {
                Ok(v * unit.factor() * adsorbate.gas_molar_density(temperature_k)?)
            }
        }
        LoadingBasis::VolumeLiquid => {
            let unit = unit_or_missing(unit, basis)?;
            Ok(v * unit.factor() * adsorbate.liquid_molar_density(temperature_k)?)
        }
        LoadingBasis::Fraction => fraction_to_mol(v, adsorbate, temperature_k, mat),
        LoadingBasis::Percent => fraction_to_mol(v / 100.0, adsorbate, temperature_k, mat),
    }
}

fn fraction_to_mol(
    v: f64,
    adsorbate: &Adsorbate,
    temperature_k: f64,
    mat: &MaterialContext,
) -> Result<f64> {
    // a fraction shares the dimension of the material basis
    let material_amount = mat.base_amount();
    match mat.basis {
        MaterialBasis::Mass => Ok(v * material_amount / adsorbate.molar_mass()?),
        MaterialBasis::Molar => Ok(v * material_amount),
        MaterialBasis::Volume => {
            Ok(v * material_amount * adsorbate.liquid_molar_density(temperature_k)?)
        }
    }
}

fn from_mol(
    n: f64,
    basis: LoadingBasis,
    unit: Option<AmountUnit>,
    adsorbate: &Adsorbate,
    temperature_k: f64,
    mat: &MaterialContext,
) -> Result<f64> {
    match basis {
        LoadingBasis::Molar => Ok(n / unit_or_missing(unit, basis)?.factor()),
        LoadingBasis::Mass => {
            Ok(n * adsorbate.molar_mass()? / unit_or_missing(unit, basis)?.factor())
        }
        LoadingBasis::VolumeGas => {
            let unit = unit_or_missing(unit, basis)?;
            if unit == AmountUnit::Cm3Stp {
                Ok(n * STP_MOLAR_VOLUME)
            } else {
                Ok(n / adsorbate.gas_molar_density(temperature_k)? / unit.factor())
            }
        }
        LoadingBasis::VolumeLiquid => {
            let unit = unit_or_missing(unit, basis)?;
            Ok(n / adsorbate.liquid_molar_density(temperature_k)? / unit.factor())
        }
        LoadingBasis::Fraction => mol_to_fraction(n, adsorbate, temperature_k, mat),
        LoadingBasis::Percent => Ok(mol_to_fraction(n, adsorbate, temperature_k, mat)? * 100.0),
    }
}

fn mol_to_fraction(
    n: f64,
    adsorbate: &Adsorbate,
    temperature_k: f64,
    mat: &MaterialContext,
) -> Result<f64> {
    let material_amount = mat.base_amount();
    match mat.basis {
        MaterialBasis::Mass => Ok(n * adsorbate.molar_mass()? / material_amount),
        MaterialBasis::Molar => Ok(n / material_amount),
        MaterialBasis::Volume => {
            Ok(n / adsorbate.liquid_molar_density(temperature_k)? / material_amount)
        }
    }
}

/// Convert an array of loading values between bases and units. The
/// material context is only consulted for fraction / percent bases but is
/// always required so that the call site stays uniform.
#[allow(clippy::too_many_arguments)]
pub fn convert_loading(
    values: &[f64],
    basis_from: LoadingBasis,
    unit_from: Option<AmountUnit>,
    basis_to: LoadingBasis,
    unit_to: Option<AmountUnit>,
    adsorbate: &Adsorbate,
    temperature_k: f64,
    mat: &MaterialContext,
) -> Result<Vec<f64>> {
    if basis_from == basis_to && unit_from == unit_to {
        return Ok(values.to_vec());
    }
    values
        .iter()
        .map(|&v| {
            if v.is_nan() {
                return Ok(f64::NAN);
            }
            let n = to_mol(v, basis_from, unit_from, adsorbate, temperature_k, mat)?;
            from_mol(n, basis_to, unit_to, adsorbate, temperature_k, mat)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::registry::find_adsorbate;
    use approx::assert_relative_eq;

    fn ctx() -> MaterialContext {
        MaterialContext {
            basis: MaterialBasis::Mass,
            unit: AmountUnit::Gram,
        }
    }

    #[test]
    fn mmol_to_mass_roundtrip() {
        let ads = find_adsorbate("nitrogen").unwrap();
        let n = vec![0.5, 1.0, 11.5];
        let mg = convert_loading(
            &n,
            LoadingBasis::Molar,
            Some(AmountUnit::Millimole),
            LoadingBasis::Mass,
            Some(AmountUnit::Milligram),
            &ads,
            77.355,
            &ctx(),
        )
        .unwrap();
        // 1 mmol N2 = 28.0134 mg
        assert_relative_eq!(mg[1], 28.0134, max_relative = 1e-6);
        let back = convert_loading(
            &mg,
            LoadingBasis::Mass,
            Some(AmountUnit::Milligram),
            LoadingBasis::Molar,
            Some(AmountUnit::Millimole),
            &ads,
            77.355,
            &ctx(),
        )
        .unwrap();
        for (a, b) in n.iter().zip(back.iter()) {
            assert_relative_eq!(a, b, max_relative = 1e-12);
        }
    }

    #[test]
    fn stp_volume() {
        let ads = find_adsorbate("nitrogen").unwrap();
        let out = convert_loading(
            &[1.0],
            LoadingBasis::Molar,
            Some(AmountUnit::Millimole),
            LoadingBasis::VolumeGas,
            Some(AmountUnit::Cm3Stp),
            &ads,
            77.355,
            &ctx(),
        )
        .unwrap();
        // 1 mmol of ideal gas at STP is 22.414 cm3
        assert_relative_eq!(out[0], 22.41397, max_relative = 1e-5);
    }

    #[test]
    fn fraction_needs_material_basis() {
        let ads = find_adsorbate("nitrogen").unwrap();
        let frac = convert_loading(
            &[1.0],
            LoadingBasis::Molar,
            Some(AmountUnit::Millimole),
            LoadingBasis::Fraction,
            None,
            &ads,
            77.355,
            &ctx(),
        )
        .unwrap();
        // 1 mmol/g of N2 is 0.0280134 g/g
        assert_relative_eq!(frac[0], 0.0280134, max_relative = 1e-6);
    }

    #[test]
    fn stp_string_is_recognised() {
        assert_eq!(
            "cm3(STP)".parse::<AmountUnit>().unwrap(),
            AmountUnit::Cm3Stp
        );
        assert_eq!("cm3".parse::<AmountUnit>().unwrap(), AmountUnit::Cm3);
    }
}
