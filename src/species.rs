//! # Species Module
//!
//! ## Purpose
//! Descriptors for the two physical actors of an isotherm: the adsorbate
//! (the fluid whose uptake is measured) and the material (the porous solid
//! it is measured on). Both carry a free-form scalar property map; the
//! adsorbate additionally exposes thermodynamic functions of temperature
//! that first try a pluggable backend and then fall back to the map.
//!
//! ## Submodules
//! - `adsorbate`: the adsorbate descriptor and its property getters
//! - `material`: the material descriptor
//! - `backend`: the pluggable thermodynamic property source contract
//! - `registry`: process-wide registries of known adsorbates and materials

pub mod adsorbate;
pub mod backend;
pub mod material;
pub mod registry;

pub use adsorbate::Adsorbate;
pub use backend::PropertyBackend;
pub use material::Material;
pub use registry::{find_adsorbate, find_material, register_adsorbate, register_material};
