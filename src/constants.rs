//! Physical constants shared by the conversion and characterisation modules.
//! All values in SI unless the name says otherwise.

/// Universal gas constant, J/(mol K).
pub const GAS_CONSTANT: f64 = 8.31446;

/// Avogadro constant, 1/mol.
pub const AVOGADRO: f64 = 6.02214076e23;

/// Electron rest mass energy m_e c^2, J. Used by the Kirkwood-Muller
/// dispersion constants of the Horvath-Kawazoe methods.
pub const ELECTRON_REST_ENERGY: f64 = 8.18710565e-14;

/// Molar volume of an ideal gas at STP (273.15 K, 1 atm), cm3/mol.
/// Used for "cm3(STP)" loading units.
pub const STP_MOLAR_VOLUME: f64 = 22413.97;

/// Standard atmosphere, Pa.
pub const ATMOSPHERE: f64 = 101325.0;
