//! Pressure modes, pressure units and the pressure converter.
//!
//! Conversions within the absolute mode use a fixed unit ratio table.
//! Conversions to or from the relative modes require the saturation
//! pressure of the adsorbate at the isotherm temperature and fail with a
//! calculation error when the adsorbate is supercritical and no
//! pseudo-saturation pressure override is supplied.

use crate::error::{PhysisorbError, Result};
use crate::species::adsorbate::Adsorbate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PressureMode {
    Absolute,
    Relative,
    RelativePercent,
}

impl PressureMode {
    pub fn is_relative(&self) -> bool {
        !matches!(self, PressureMode::Absolute)
    }
}

impl fmt::Display for PressureMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PressureMode::Absolute => write!(f, "absolute"),
            PressureMode::Relative => write!(f, "relative"),
            PressureMode::RelativePercent => write!(f, "relative%"),
        }
    }
}

impl FromStr for PressureMode {
    type Err = PhysisorbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "absolute" => Ok(PressureMode::Absolute),
            "relative" => Ok(PressureMode::Relative),
            "relative%" | "relative percent" => Ok(PressureMode::RelativePercent),
            other => Err(PhysisorbError::Parsing(format!(
                "unknown pressure mode '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PressureUnit {
    Pascal,
    Kilopascal,
    Megapascal,
    Bar,
    Millibar,
    Atmosphere,
    Torr,
}

impl PressureUnit {
    /// Multiplier taking one of this unit to pascal.
    pub fn to_pascal(&self) -> f64 {
        match self {
            PressureUnit::Pascal => 1.0,
            PressureUnit::Kilopascal => 1.0e3,
            PressureUnit::Megapascal => 1.0e6,
            PressureUnit::Bar => 1.0e5,
            PressureUnit::Millibar => 1.0e2,
            PressureUnit::Atmosphere => 101325.0,
            PressureUnit::Torr => 101325.0 / 760.0,
        }
    }
}

impl fmt::Display for PressureUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            PressureUnit::Pascal => "Pa",
            PressureUnit::Kilopascal => "kPa",
            PressureUnit::Megapascal => "MPa",
            PressureUnit::Bar => "bar",
            PressureUnit::Millibar => "mbar",
            PressureUnit::Atmosphere => "atm",
            PressureUnit::Torr => "torr",
        };
        write!(f, "{s}")
    }
}

impl FromStr for PressureUnit {
    type Err = PhysisorbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "Pa" | "pa" | "pascal" => Ok(PressureUnit::Pascal),
            "kPa" | "kpa" => Ok(PressureUnit::Kilopascal),
            "MPa" | "mpa" => Ok(PressureUnit::Megapascal),
            "bar" => Ok(PressureUnit::Bar),
            "mbar" => Ok(PressureUnit::Millibar),
            "atm" => Ok(PressureUnit::Atmosphere),
            "torr" | "Torr" | "mmHg" => Ok(PressureUnit::Torr),
            other => Err(PhysisorbError::Parsing(format!(
                "unknown pressure unit '{other}'"
            ))),
        }
    }
}

/// Convert an array of pressure values between modes and units.
///
/// `unit_from` / `unit_to` are required for the absolute side of a
/// conversion and must be `None` on the relative side. The adsorbate and
/// temperature (K) are only consulted when crossing between absolute and
/// relative modes.
pub fn convert_pressure(
    values: &[f64],
    mode_from: PressureMode,
    unit_from: Option<PressureUnit>,
    mode_to: PressureMode,
    unit_to: Option<PressureUnit>,
    adsorbate: &Adsorbate,
    temperature_k: f64,
) -> Result<Vec<f64>> {
    if mode_from == mode_to && unit_from == unit_to {
        return Ok(values.to_vec());
    }

    // saturation pressure is only needed when a relative mode is involved
    let needs_psat = mode_from.is_relative() || mode_to.is_relative();
    let p_sat = if needs_psat {
        Some(adsorbate.saturation_pressure(temperature_k)?)
    } else {
        None
    };

    let to_pascal = |v: f64| -> Result<f64> {
        match mode_from {
            PressureMode::Absolute => {
                let unit = unit_from.ok_or_else(|| {
                    PhysisorbError::missing("pressure unit for absolute mode")
                })?;
                Ok(v * unit.to_pascal())
            }
            PressureMode::Relative => Ok(v * p_sat.unwrap()),
            PressureMode::RelativePercent => Ok(v / 100.0 * p_sat.unwrap()),
        }
    };

    let from_pascal = |v: f64| -> Result<f64> {
        match mode_to {
            PressureMode::Absolute => {
                let unit = unit_to.ok_or_else(|| {
                    PhysisorbError::missing("pressure unit for absolute mode")
                })?;
                Ok(v / unit.to_pascal())
            }
            PressureMode::Relative => Ok(v / p_sat.unwrap()),
            PressureMode::RelativePercent => Ok(v / p_sat.unwrap() * 100.0),
        }
    };

    values
        .iter()
        .map(|&v| {
            if v.is_nan() {
                return Ok(f64::NAN);
            }
            from_pascal(to_pascal(v)?)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::registry::find_adsorbate;
    use approx::assert_relative_eq;

    #[test]
    fn absolute_unit_table() {
        let ads = find_adsorbate("nitrogen").unwrap();
        let out = convert_pressure(
            &[1.0],
            PressureMode::Absolute,
            Some(PressureUnit::Bar),
            PressureMode::Absolute,
            Some(PressureUnit::Kilopascal),
            &ads,
            77.355,
        )
        .unwrap();
        assert_relative_eq!(out[0], 100.0, epsilon = 1e-12);
    }

    #[test]
    fn relative_roundtrip() {
        let ads = find_adsorbate("N2").unwrap();
        let rel = vec![0.05, 0.1, 0.5, 0.95];
        let abs = convert_pressure(
            &rel,
            PressureMode::Relative,
            None,
            PressureMode::Absolute,
            Some(PressureUnit::Kilopascal),
            &ads,
            77.355,
        )
        .unwrap();
        let back = convert_pressure(
            &abs,
            PressureMode::Absolute,
            Some(PressureUnit::Kilopascal),
            PressureMode::Relative,
            None,
            &ads,
            77.355,
        )
        .unwrap();
        for (a, b) in rel.iter().zip(back.iter()) {
            assert_relative_eq!(a, b, max_relative = 1e-12);
        }
    }

    #[test]
    fn nan_passes_through() {
        let ads = find_adsorbate("nitrogen").unwrap();
        let out = convert_pressure(
            &[f64::NAN],
            PressureMode::Absolute,
            Some(PressureUnit::Bar),
            PressureMode::Absolute,
            Some(PressureUnit::Pascal),
            &ads,
            77.355,
        )
        .unwrap();
        assert!(out[0].is_nan());
    }

    #[test]
    fn relative_percent() {
        let ads = find_adsorbate("nitrogen").unwrap();
        let out = convert_pressure(
            &[0.5],
            PressureMode::Relative,
            None,
            PressureMode::RelativePercent,
            None,
            &ads,
            77.355,
        )
        .unwrap();
        assert_relative_eq!(out[0], 50.0, epsilon = 1e-12);
    }
}
