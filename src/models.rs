//! # Analytical Isotherm Models
//!
//! ## Purpose
//! The catalog of analytical isotherm equations and the non-linear
//! least-squares machinery that fits them to measured data. Every model
//! answers `loading(p)`, `pressure(n)` and `spreading_pressure(p)` behind
//! one dispatch enum, so characterisation code never matches on the
//! concrete equation.
//!
//! ## Key Features
//! - `IsothermModel` trait dispatched over `ModelEnum` with
//!   `create_model_by_name` as the string-keyed factory
//! - Levenberg-Marquardt fitting with parameter bounds in `fit`
//! - `guess_model` tries a catalog of models and keeps the best RMSE
//! - closed-form spreading pressure where it exists, quadrature for the
//!   Dubinin family, root-finding for pressure-explicit equations

pub mod bet;
pub mod dubinin;
pub mod fit;
pub mod freundlich;
pub mod henry;
pub mod langmuir;
pub mod model;
pub mod virial;
pub mod vst;

pub use bet::Bet;
pub use dubinin::{DubininAstakhov, DubininRadushkevich};
pub use fit::{FitOptions, fit_model, lm_least_squares};
pub use freundlich::Freundlich;
pub use henry::Henry;
pub use langmuir::Langmuir;
pub use model::{Calculates, IsothermModel, ModelEnum, create_model_by_name, guess_model};
pub use virial::Virial;
pub use vst::{FloryHugginsVst, WilsonVst};
