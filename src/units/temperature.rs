//! Temperature units. Pure unit algebra, no adsorbate context.

use crate::error::{PhysisorbError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemperatureUnit {
    Kelvin,
    Celsius,
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TemperatureUnit::Kelvin => write!(f, "K"),
            TemperatureUnit::Celsius => write!(f, "°C"),
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = PhysisorbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "K" | "k" | "kelvin" => Ok(TemperatureUnit::Kelvin),
            "C" | "°C" | "c" | "celsius" => Ok(TemperatureUnit::Celsius),
            other => Err(PhysisorbError::Parsing(format!(
                "unknown temperature unit '{other}'"
            ))),
        }
    }
}

pub fn convert_temperature(value: f64, from: TemperatureUnit, to: TemperatureUnit) -> f64 {
    if value.is_nan() || from == to {
        return value;
    }
    match (from, to) {
        (TemperatureUnit::Celsius, TemperatureUnit::Kelvin) => value + 273.15,
        (TemperatureUnit::Kelvin, TemperatureUnit::Celsius) => value - 273.15,
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn celsius_kelvin() {
        assert_relative_eq!(
            convert_temperature(25.0, TemperatureUnit::Celsius, TemperatureUnit::Kelvin),
            298.15
        );
        assert_relative_eq!(
            convert_temperature(77.355, TemperatureUnit::Kelvin, TemperatureUnit::Celsius),
            -195.795,
            epsilon = 1e-9
        );
    }
}
