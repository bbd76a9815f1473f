pub mod characterisation;
pub mod constants;
pub mod error;
pub mod isotherm;
pub mod models;
pub mod numerics;
pub mod species;
pub mod units;
pub mod utils;
