//! # Unit Algebra Module
//!
//! ## Purpose
//! Conversion of pressure, loading, material amount and temperature between
//! the modes, bases and units recognised by the isotherm data model. Every
//! converter takes `(values, from, to, ...context)` and either returns the
//! converted values or fails with a parameter / calculation error. All
//! conversions preserve sign and finiteness; any NaN in is NaN out.
//!
//! ## Submodules
//! - `pressure`: pressure modes (absolute / relative / relative%) and units
//! - `loading`: loading bases (molar / mass / volume / fraction) and amount units
//! - `material`: material bases (mass / molar / volume)
//! - `temperature`: Kelvin / Celsius

pub mod loading;
pub mod material;
pub mod pressure;
pub mod temperature;

pub use loading::{AmountUnit, LoadingBasis, convert_loading};
pub use material::{MaterialBasis, convert_material};
pub use pressure::{PressureMode, PressureUnit, convert_pressure};
pub use temperature::{TemperatureUnit, convert_temperature};
