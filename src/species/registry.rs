//! Process-wide registries of known adsorbates and materials.
//!
//! Both registries sit behind `OnceLock<Mutex<..>>`: insertion is atomic
//! under concurrent population, lookups clone the entry so the returned
//! descriptor is safe to use concurrently, and analysis paths never
//! mutate the registries. The adsorbate registry is seeded with the
//! common probe gases and their textbook properties.

use crate::error::{PhysisorbError, Result};
use crate::species::adsorbate::{Adsorbate, prop};
use crate::species::material::Material;
use std::sync::{Mutex, OnceLock};

static ADSORBATES: OnceLock<Mutex<Vec<Adsorbate>>> = OnceLock::new();
static MATERIALS: OnceLock<Mutex<Vec<Material>>> = OnceLock::new();

fn default_adsorbates() -> Vec<Adsorbate> {
    vec![
        Adsorbate::new("nitrogen")
            .with_aliases(&["N2"])
            .with_property(prop::MOLAR_MASS, 28.0134)
            .with_property(prop::CROSS_SECTIONAL_AREA, 0.162)
            .with_property(prop::LIQUID_DENSITY, 0.806)
            .with_property(prop::SURFACE_TENSION, 8.85)
            .with_property(prop::T_CRITICAL, 126.2)
            .with_property(prop::ENTHALPY_LIQUEFACTION, 5.58)
            .with_property(prop::ANTOINE_A, 3.7362)
            .with_property(prop::ANTOINE_B, 264.651)
            .with_property(prop::ANTOINE_C, -6.788)
            .with_property(prop::ANTOINE_TMIN, 63.14)
            .with_property(prop::ANTOINE_TMAX, 126.0),
        Adsorbate::new("argon")
            .with_aliases(&["Ar"])
            .with_property(prop::MOLAR_MASS, 39.948)
            .with_property(prop::CROSS_SECTIONAL_AREA, 0.142)
            .with_property(prop::LIQUID_DENSITY, 1.396)
            .with_property(prop::SURFACE_TENSION, 13.2)
            .with_property(prop::T_CRITICAL, 150.9)
            .with_property(prop::ENTHALPY_LIQUEFACTION, 6.43)
            .with_property(prop::ANTOINE_A, 3.29555)
            .with_property(prop::ANTOINE_B, 215.24)
            .with_property(prop::ANTOINE_C, -22.233)
            .with_property(prop::ANTOINE_TMIN, 83.78)
            .with_property(prop::ANTOINE_TMAX, 150.7),
        Adsorbate::new("oxygen")
            .with_aliases(&["O2"])
            .with_property(prop::MOLAR_MASS, 31.9988)
            .with_property(prop::CROSS_SECTIONAL_AREA, 0.141)
            .with_property(prop::LIQUID_DENSITY, 1.141)
            .with_property(prop::T_CRITICAL, 154.6)
            .with_property(prop::ENTHALPY_LIQUEFACTION, 6.82)
            .with_property(prop::ANTOINE_A, 3.9523)
            .with_property(prop::ANTOINE_B, 340.024)
            .with_property(prop::ANTOINE_C, -4.144)
            .with_property(prop::ANTOINE_TMIN, 54.36)
            .with_property(prop::ANTOINE_TMAX, 154.3),
        Adsorbate::new("carbon dioxide")
            .with_aliases(&["CO2"])
            .with_property(prop::MOLAR_MASS, 44.009)
            .with_property(prop::CROSS_SECTIONAL_AREA, 0.210)
            .with_property(prop::LIQUID_DENSITY, 1.032)
            .with_property(prop::T_CRITICAL, 304.1)
            .with_property(prop::ENTHALPY_LIQUEFACTION, 16.5)
            .with_property(prop::ANTOINE_A, 6.81228)
            .with_property(prop::ANTOINE_B, 1301.679)
            .with_property(prop::ANTOINE_C, -3.494)
            .with_property(prop::ANTOINE_TMIN, 154.26)
            .with_property(prop::ANTOINE_TMAX, 195.89),
        Adsorbate::new("krypton")
            .with_aliases(&["Kr"])
            .with_property(prop::MOLAR_MASS, 83.798)
            .with_property(prop::CROSS_SECTIONAL_AREA, 0.210)
            .with_property(prop::LIQUID_DENSITY, 2.413)
            .with_property(prop::T_CRITICAL, 209.5)
            .with_property(prop::ENTHALPY_LIQUEFACTION, 9.08),
        Adsorbate::new("methane")
            .with_aliases(&["CH4"])
            .with_property(prop::MOLAR_MASS, 16.043)
            .with_property(prop::CROSS_SECTIONAL_AREA, 0.172)
            .with_property(prop::LIQUID_DENSITY, 0.422)
            .with_property(prop::T_CRITICAL, 190.6)
            .with_property(prop::ENTHALPY_LIQUEFACTION, 8.17)
            .with_property(prop::ANTOINE_A, 3.9895)
            .with_property(prop::ANTOINE_B, 443.028)
            .with_property(prop::ANTOINE_C, -0.49)
            .with_property(prop::ANTOINE_TMIN, 90.99)
            .with_property(prop::ANTOINE_TMAX, 189.99),
        Adsorbate::new("water")
            .with_aliases(&["H2O"])
            .with_property(prop::MOLAR_MASS, 18.0153)
            .with_property(prop::CROSS_SECTIONAL_AREA, 0.106)
            .with_property(prop::LIQUID_DENSITY, 0.998)
            .with_property(prop::SURFACE_TENSION, 72.7)
            .with_property(prop::T_CRITICAL, 647.1)
            .with_property(prop::ENTHALPY_LIQUEFACTION, 40.7)
            .with_property(prop::ANTOINE_A, 5.40221)
            .with_property(prop::ANTOINE_B, 1838.675)
            .with_property(prop::ANTOINE_C, -31.737)
            .with_property(prop::ANTOINE_TMIN, 273.0)
            .with_property(prop::ANTOINE_TMAX, 303.0),
    ]
}

fn adsorbates() -> &'static Mutex<Vec<Adsorbate>> {
    ADSORBATES.get_or_init(|| Mutex::new(default_adsorbates()))
}

fn materials() -> &'static Mutex<Vec<Material>> {
    MATERIALS.get_or_init(|| Mutex::new(Vec::new()))
}

/// Look up an adsorbate by name or alias (case-insensitive). The entry
/// is cloned, so concurrent analyses never share mutable state.
pub fn find_adsorbate(name: &str) -> Result<Adsorbate> {
    let guard = adsorbates().lock().expect("adsorbate registry poisoned");
    guard
        .iter()
        .find(|a| a.matches(name))
        .cloned()
        .ok_or_else(|| PhysisorbError::missing(format!("adsorbate '{name}' in the registry")))
}

/// Insert an adsorbate, replacing any entry with the same canonical name.
pub fn register_adsorbate(adsorbate: Adsorbate) {
    let mut guard = adsorbates().lock().expect("adsorbate registry poisoned");
    if let Some(existing) = guard.iter_mut().find(|a| a.name == adsorbate.name) {
        *existing = adsorbate;
    } else {
        guard.push(adsorbate);
    }
}

pub fn find_material(name: &str) -> Result<Material> {
    let guard = materials().lock().expect("material registry poisoned");
    guard
        .iter()
        .find(|m| m.name.to_lowercase() == name.to_lowercase())
        .cloned()
        .ok_or_else(|| PhysisorbError::missing(format!("material '{name}' in the registry")))
}

pub fn register_material(material: Material) {
    let mut guard = materials().lock().expect("material registry poisoned");
    if let Some(existing) = guard.iter_mut().find(|m| m.name == material.name) {
        *existing = material;
    } else {
        guard.push(material);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_alias() {
        let n2 = find_adsorbate("N2").unwrap();
        assert_eq!(n2.name, "nitrogen");
        assert!(find_adsorbate("unobtainium").is_err());
    }

    #[test]
    fn register_replaces_by_canonical_name() {
        register_material(Material::new("zeolite-13X").with_property("density", 1.1));
        register_material(Material::new("zeolite-13X").with_property("density", 1.2));
        let m = find_material("zeolite-13x").unwrap();
        assert_eq!(m.get_property("density"), Some(1.2));
    }
}
