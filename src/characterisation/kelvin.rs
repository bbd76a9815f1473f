//! The Kelvin equation: critical radius of capillary condensation at a
//! relative pressure, plus the pore and meniscus geometry enumerations
//! shared by the PSD methods.

use crate::constants::GAS_CONSTANT;
use crate::error::{PhysisorbError, Result};
use crate::isotherm::descriptor::Branch;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PoreGeometry {
    Slit,
    Cylinder,
    Sphere,
}

impl PoreGeometry {
    /// The dimensionality factor of the geometry (1, 2 or 3).
    pub fn factor(&self) -> f64 {
        match self {
            PoreGeometry::Slit => 1.0,
            PoreGeometry::Cylinder => 2.0,
            PoreGeometry::Sphere => 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MeniscusGeometry {
    /// Condensation and evaporation across a spherical cap.
    Hemispherical,
    /// Condensation on a cylindrical film.
    Cylindrical,
}

impl MeniscusGeometry {
    /// The meniscus that is physical for a pore geometry on a branch:
    /// adsorption fills cylinders through a cylindrical film, everything
    /// else empties or fills across a hemispherical cap.
    pub fn for_branch(geometry: PoreGeometry, branch: Branch) -> Self {
        match (geometry, branch) {
            (PoreGeometry::Cylinder, Branch::Adsorption) => MeniscusGeometry::Cylindrical,
            _ => MeniscusGeometry::Hemispherical,
        }
    }

    fn curvature(&self) -> f64 {
        match self {
            MeniscusGeometry::Hemispherical => 2.0,
            MeniscusGeometry::Cylindrical => 1.0,
        }
    }
}

/// Kelvin radius in nm at the given relative pressure.
///
/// `surface_tension` in mN/m, `liquid_molar_volume` in cm3/mol,
/// `temperature` in K. For nitrogen at 77 K with a hemispherical meniscus
/// this is the familiar `r_k = 0.953 / ln(p0/p)` nm.
pub fn kelvin_radius(
    p_rel: f64,
    meniscus: MeniscusGeometry,
    temperature: f64,
    surface_tension: f64,
    liquid_molar_volume: f64,
) -> Result<f64> {
    if !(p_rel > 0.0 && p_rel < 1.0) {
        return Err(PhysisorbError::calculation(format!(
            "Kelvin radius is defined for 0 < p/p0 < 1, got {p_rel}"
        )));
    }
    let ln_inv = (1.0 / p_rel).ln();
    // mN/m * cm3/mol = 1e-9 J m / mol; 1e9 nm/m cancels it
    Ok(meniscus.curvature() * surface_tension * liquid_molar_volume
        / (GAS_CONSTANT * temperature * ln_inv))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn nitrogen_constant_at_77k() {
        // gamma = 8.85 mN/m, V_m = 28.0134/0.806 cm3/mol
        let v_m = 28.0134 / 0.806;
        let r = kelvin_radius(
            0.5,
            MeniscusGeometry::Hemispherical,
            77.355,
            8.85,
            v_m,
        )
        .unwrap();
        let expected = 2.0 * 8.85 * v_m / (GAS_CONSTANT * 77.355) / 0.5f64.ln().abs();
        assert_relative_eq!(r, expected, max_relative = 1e-12);
        // the classical 0.953/ln(p0/p) value within a few percent
        assert_relative_eq!(r * 0.5f64.ln().abs(), 0.956, max_relative = 0.02);
    }

    #[test]
    fn cylindrical_meniscus_halves_the_radius() {
        let hemi =
            kelvin_radius(0.5, MeniscusGeometry::Hemispherical, 77.355, 8.85, 34.7).unwrap();
        let cyl = kelvin_radius(0.5, MeniscusGeometry::Cylindrical, 77.355, 8.85, 34.7).unwrap();
        assert_relative_eq!(hemi, 2.0 * cyl, max_relative = 1e-12);
    }

    #[test]
    fn meniscus_selection_by_branch() {
        assert_eq!(
            MeniscusGeometry::for_branch(PoreGeometry::Cylinder, Branch::Adsorption),
            MeniscusGeometry::Cylindrical
        );
        assert_eq!(
            MeniscusGeometry::for_branch(PoreGeometry::Cylinder, Branch::Desorption),
            MeniscusGeometry::Hemispherical
        );
    }
}
