//! The material descriptor: a name plus a free-form scalar property map.
//! `density` (g/cm3) is required for material volume-basis conversions,
//! `molar_mass` (g/mol) for molar-basis conversions.

use crate::error::{PhysisorbError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    #[serde(default)]
    pub properties: HashMap<String, f64>,
}

impl Material {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            properties: HashMap::new(),
        }
    }

    pub fn with_property(mut self, key: &str, value: f64) -> Self {
        self.properties.insert(key.to_string(), value);
        self
    }

    pub fn set_property(&mut self, key: &str, value: f64) {
        self.properties.insert(key.to_string(), value);
    }

    pub fn get_property(&self, key: &str) -> Option<f64> {
        self.properties.get(key).copied()
    }

    /// Skeletal density, g/cm3.
    pub fn density(&self) -> Result<f64> {
        self.get_property("density").ok_or_else(|| {
            PhysisorbError::missing(format!("property 'density' of material '{}'", self.name))
        })
    }

    /// Molar mass, g/mol.
    pub fn molar_mass(&self) -> Result<f64> {
        self.get_property("molar_mass").ok_or_else(|| {
            PhysisorbError::missing(format!(
                "property 'molar_mass' of material '{}'",
                self.name
            ))
        })
    }
}
