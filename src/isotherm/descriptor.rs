//! The unit descriptor of an isotherm and the branch enumerations.

use crate::error::{PhysisorbError, Result};
use crate::units::loading::{AmountUnit, LoadingBasis};
use crate::units::material::MaterialBasis;
use crate::units::pressure::{PressureMode, PressureUnit};
use crate::units::temperature::TemperatureUnit;
use serde::{Deserialize, Serialize};

/// Adsorption or desorption side of a measured isotherm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Branch {
    #[serde(rename = "ads")]
    Adsorption,
    #[serde(rename = "des")]
    Desorption,
}

/// Branch restriction of a data query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BranchFilter {
    #[default]
    Ads,
    Des,
    All,
}

impl BranchFilter {
    pub fn accepts(&self, branch: Branch) -> bool {
        match self {
            BranchFilter::Ads => branch == Branch::Adsorption,
            BranchFilter::Des => branch == Branch::Desorption,
            BranchFilter::All => true,
        }
    }
}

/// How the constructor assigns branch labels.
#[derive(Debug, Clone, Default)]
pub enum BranchSpec {
    /// Split at the first pressure point strictly below its predecessor.
    #[default]
    Guess,
    /// Every row belongs to the given branch.
    All(Branch),
    /// Caller-supplied per-row labels.
    Explicit(Vec<Branch>),
}

/// Self-consistent description of the units an isotherm is stored in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsothermUnits {
    pub pressure_mode: PressureMode,
    /// Must be `None` in the relative pressure modes.
    pub pressure_unit: Option<PressureUnit>,
    pub loading_basis: LoadingBasis,
    /// Must be `None` for the fraction / percent bases.
    pub loading_unit: Option<AmountUnit>,
    pub material_basis: MaterialBasis,
    pub material_unit: AmountUnit,
    pub temperature_unit: TemperatureUnit,
}

impl Default for IsothermUnits {
    fn default() -> Self {
        Self {
            pressure_mode: PressureMode::Absolute,
            pressure_unit: Some(PressureUnit::Bar),
            loading_basis: LoadingBasis::Molar,
            loading_unit: Some(AmountUnit::Millimole),
            material_basis: MaterialBasis::Mass,
            material_unit: AmountUnit::Gram,
            temperature_unit: TemperatureUnit::Kelvin,
        }
    }
}

impl IsothermUnits {
    /// A relative-pressure descriptor with the common mmol/g loading.
    pub fn relative() -> Self {
        Self {
            pressure_mode: PressureMode::Relative,
            pressure_unit: None,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        match (self.pressure_mode, self.pressure_unit) {
            (PressureMode::Absolute, None) => {
                return Err(PhysisorbError::missing(
                    "pressure unit for absolute pressure mode",
                ));
            }
            (m, Some(u)) if m.is_relative() => {
                return Err(PhysisorbError::ParameterInvalid {
                    name: "pressure_unit".into(),
                    reason: format!("unit '{u}' given for relative pressure mode"),
                });
            }
            _ => {}
        }
        match (self.loading_basis, self.loading_unit) {
            (b, None) if !b.is_unitless() => {
                return Err(PhysisorbError::missing(format!(
                    "loading unit for basis '{b}'"
                )));
            }
            (b, Some(u)) if b.is_unitless() => {
                return Err(PhysisorbError::ParameterInvalid {
                    name: "loading_unit".into(),
                    reason: format!("unit '{u}' given for unitless basis '{b}'"),
                });
            }
            (b, Some(u)) if !b.accepts_unit(u) => {
                return Err(PhysisorbError::ParameterInvalid {
                    name: "loading_unit".into(),
                    reason: format!("unit '{u}' does not match basis '{b}'"),
                });
            }
            _ => {}
        }
        if !self.material_basis.accepts_unit(self.material_unit) {
            return Err(PhysisorbError::ParameterInvalid {
                name: "material_unit".into(),
                reason: format!(
                    "unit '{}' does not match material basis '{}'",
                    self.material_unit, self.material_basis
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_descriptor_is_valid() {
        assert!(IsothermUnits::default().validate().is_ok());
        assert!(IsothermUnits::relative().validate().is_ok());
    }

    #[test]
    fn relative_mode_rejects_pressure_unit() {
        let units = IsothermUnits {
            pressure_mode: PressureMode::Relative,
            pressure_unit: Some(PressureUnit::Bar),
            ..IsothermUnits::default()
        };
        assert!(units.validate().is_err());
    }

    #[test]
    fn unitless_basis_rejects_loading_unit() {
        let units = IsothermUnits {
            loading_basis: LoadingBasis::Fraction,
            loading_unit: Some(AmountUnit::Millimole),
            ..IsothermUnits::default()
        };
        assert!(units.validate().is_err());

        let units = IsothermUnits {
            loading_basis: LoadingBasis::Fraction,
            loading_unit: None,
            ..IsothermUnits::default()
        };
        assert!(units.validate().is_ok());
    }
}
