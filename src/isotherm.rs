//! # Isotherm Module
//!
//! ## Purpose
//! The unified isotherm data model. A `PointIsotherm` is an invariant
//! container for `(material, adsorbate, temperature, points, units)`
//! supporting branch splitting, on-the-fly and in-place unit conversion,
//! interpolation queries and spreading pressure. A `ModelIsotherm` holds a
//! fitted analytical model instead of a point table and answers the same
//! queries.
//!
//! ## Submodules
//! - `descriptor`: the unit descriptor and branch enumerations
//! - `interpolator`: cached 1-D interpolation with a fill policy
//! - `point_isotherm`: the point-table isotherm
//! - `model_isotherm`: the fitted-model isotherm
//! - `identity`: content-addressed fingerprints

pub mod descriptor;
pub mod identity;
pub mod interpolator;
pub mod model_isotherm;
pub mod point_isotherm;
mod point_isotherm_tests;

pub use descriptor::{Branch, BranchFilter, BranchSpec, IsothermUnits};
pub use interpolator::{FillPolicy, InterpolationKind, Interpolator};
pub use model_isotherm::ModelIsotherm;
pub use point_isotherm::{IsothermData, PointIsotherm};
