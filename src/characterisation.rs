//! # Characterisation Module
//!
//! ## Purpose
//! Material characterisation methods computed from measured isotherms:
//! specific surface areas, t-plot and alpha-s micropore analysis, pore
//! size distributions over the meso-, micro- and full range, and
//! adsorption enthalpies.
//!
//! ## Key Features
//! - `area_bet` / `area_langmuir` surface areas with Rouquerol checks
//! - thickness-model registry shared by the t-plot and Kelvin methods
//! - mesopore PSD (generalised DH, BJH, Dollimore-Heal) over the Kelvin
//!   equation
//! - micropore PSD (Horvath-Kawazoe, Rege-Yang, Cheng-Yang corrections)
//! - DFT kernel fitting with non-negative least squares
//! - isosteric enthalpy from isotherms at several temperatures and the
//!   initial-enthalpy extrapolation
//!
//! Every result struct carries the warnings raised during the
//! calculation, mirrored to the log.

pub mod alpha_s;
pub mod area_bet;
pub mod area_langmuir;
pub mod enthalpy_sorption;
pub mod initial_enthalpy;
pub mod kelvin;
pub mod psd_dft;
pub mod psd_mesoporous;
pub mod psd_microporous;
pub mod thickness;
pub mod tplot;

pub use alpha_s::{AlphaSResult, alpha_s};
pub use area_bet::{BetResult, area_bet};
pub use area_langmuir::{LangmuirResult, area_langmuir};
pub use enthalpy_sorption::{IsostericEnthalpyResult, isosteric_enthalpy};
pub use initial_enthalpy::{InitialEnthalpyResult, initial_enthalpy_fit, initial_enthalpy_point};
pub use kelvin::{MeniscusGeometry, PoreGeometry, kelvin_radius};
pub use psd_dft::{DftKernel, DftPsdResult, psd_dft};
pub use psd_mesoporous::{MesoPsdMethod, MesoPsdResult, psd_mesoporous};
pub use psd_microporous::{
    HkAdsorbateParams, HkMaterialParams, MicroPsdMethod, MicroPsdResult, psd_microporous,
};
pub use thickness::{ThicknessFn, get_thickness_model, register_thickness_model};
pub use tplot::{TPlotResult, TPlotSection, t_plot};

use crate::error::Result;
use crate::isotherm::descriptor::BranchFilter;
use crate::isotherm::point_isotherm::{LoadingQuery, PointIsotherm, PressureQuery};
use crate::units::loading::{AmountUnit, LoadingBasis};

/// The working axes of most characterisation methods: relative pressure
/// and loading in mol per the stored material unit, adsorption branch
/// unless asked otherwise, sorted by ascending pressure.
pub(crate) fn relative_molar_data(
    iso: &PointIsotherm,
    branch: BranchFilter,
) -> Result<(Vec<f64>, Vec<f64>)> {
    let pressure = iso.pressure(&PressureQuery::relative(branch))?;
    let loading = iso.loading(&LoadingQuery {
        branch,
        basis: Some(LoadingBasis::Molar),
        unit: Some(AmountUnit::Mole),
        ..Default::default()
    })?;
    let mut pairs: Vec<(f64, f64)> = pressure.into_iter().zip(loading).collect();
    pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
    Ok(pairs.into_iter().unzip())
}
