//! The model capability trait, the dispatch enum over every equation and
//! the "guess" selector.

use crate::error::{PhysisorbError, Result};
use crate::models::bet::Bet;
use crate::models::dubinin::{DubininAstakhov, DubininRadushkevich};
use crate::models::fit::{FitOptions, fit_model};
use crate::models::freundlich::Freundlich;
use crate::models::henry::Henry;
use crate::models::langmuir::Langmuir;
use crate::models::virial::Virial;
use crate::models::vst::{FloryHugginsVst, WilsonVst};
use enum_dispatch::enum_dispatch;
use log::{info, warn};

/// Which axis the model's natural form computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calculates {
    Loading,
    Pressure,
}

#[enum_dispatch]
pub trait IsothermModel {
    fn name(&self) -> &'static str;
    fn calculates(&self) -> Calculates;
    fn param_names(&self) -> &'static [&'static str];
    fn params(&self) -> Vec<f64>;
    fn set_params(&mut self, params: &[f64]) -> Result<()>;
    /// Box constraints per parameter, in `param_names` order. Infinite
    /// bounds mean unconstrained.
    fn param_bounds(&self) -> Vec<(f64, f64)>;
    fn initial_guess(&self, pressure: &[f64], loading: &[f64]) -> Result<Vec<f64>>;
    /// Loading at the given pressure.
    fn loading(&self, pressure: f64) -> Result<f64>;
    /// Pressure at the given loading.
    fn pressure(&self, loading: f64) -> Result<f64>;
    /// Reduced spreading pressure at the given pressure.
    fn spreading_pressure(&self, pressure: f64) -> Result<f64>;
    /// True for models defined on the relative pressure axis only.
    fn requires_relative_pressure(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone)]
#[enum_dispatch(IsothermModel)]
pub enum ModelEnum {
    Henry(Henry),
    Langmuir(Langmuir),
    Bet(Bet),
    Freundlich(Freundlich),
    DubininRadushkevich(DubininRadushkevich),
    DubininAstakhov(DubininAstakhov),
    Virial(Virial),
    FloryHugginsVst(FloryHugginsVst),
    WilsonVst(WilsonVst),
}

/// String-keyed model factory. The temperature is only used by the
/// Dubinin family but is taken uniformly so callers need no special case.
pub fn create_model_by_name(name: &str, temperature: f64) -> Result<ModelEnum> {
    let model = match name.trim().to_lowercase().as_str() {
        "henry" => ModelEnum::Henry(Henry::new()),
        "langmuir" => ModelEnum::Langmuir(Langmuir::new()),
        "bet" => ModelEnum::Bet(Bet::new()),
        "freundlich" => ModelEnum::Freundlich(Freundlich::new()),
        "dr" | "dubinin-radushkevich" => {
            ModelEnum::DubininRadushkevich(DubininRadushkevich::new(temperature)?)
        }
        "da" | "dubinin-astakhov" => {
            ModelEnum::DubininAstakhov(DubininAstakhov::new(temperature)?)
        }
        "virial" => ModelEnum::Virial(Virial::new()),
        "fh-vst" => ModelEnum::FloryHugginsVst(FloryHugginsVst::new()),
        "w-vst" => ModelEnum::WilsonVst(WilsonVst::new()),
        other => {
            return Err(PhysisorbError::UnknownEnum {
                kind: "model",
                value: other.to_string(),
            });
        }
    };
    Ok(model)
}

/// The catalog tried by `guess_model`. The Dubinin models only make sense
/// on a relative pressure axis and join the catalog when the data is
/// relative.
fn guess_catalog(relative_pressure: bool) -> Vec<&'static str> {
    let mut catalog = vec!["henry", "langmuir", "bet", "freundlich"];
    if relative_pressure {
        catalog.push("dr");
        catalog.push("da");
    }
    catalog
}

/// Fit every catalog model to the data and return the one with the
/// smallest RMSE. Models that fail to converge are dropped with a
/// warning; if all fail, signals a calculation error.
pub fn guess_model(
    pressure: &[f64],
    loading: &[f64],
    temperature: f64,
    relative_pressure: bool,
    options: &FitOptions,
) -> Result<(ModelEnum, f64)> {
    let mut best: Option<(ModelEnum, f64)> = None;
    for name in guess_catalog(relative_pressure) {
        let mut model = create_model_by_name(name, temperature)?;
        match fit_model(&mut model, pressure, loading, None, options) {
            Ok(rmse) => {
                info!("model guess: '{name}' converged with rmse {rmse:.6e}");
                if best.as_ref().is_none_or(|(_, r)| rmse < *r) {
                    best = Some((model, rmse));
                }
            }
            Err(err) => {
                warn!("model guess: '{name}' discarded: {err}");
            }
        }
    }
    best.ok_or_else(|| {
        PhysisorbError::calculation("no model in the guess catalog could fit the data".to_string())
    })
}
