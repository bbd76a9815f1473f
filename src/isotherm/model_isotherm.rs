//! An isotherm backed by a fitted analytical model instead of a point
//! table. Answers the same queries as `PointIsotherm` by evaluating the
//! model, in the units the source data was stored in.

use crate::error::{PhysisorbError, Result};
use crate::isotherm::descriptor::{BranchFilter, IsothermUnits};
use crate::isotherm::point_isotherm::{LoadingQuery, PointIsotherm, PressureQuery};
use crate::models::fit::{FitOptions, fit_model};
use crate::models::model::{IsothermModel, ModelEnum, create_model_by_name, guess_model};
use crate::species::adsorbate::Adsorbate;
use crate::species::material::Material;
use log::warn;

#[derive(Debug, Clone)]
pub struct ModelIsotherm {
    pub material: Material,
    pub adsorbate: Adsorbate,
    temperature: f64,
    units: IsothermUnits,
    model: ModelEnum,
    rmse: f64,
    pressure_range: (f64, f64),
    loading_range: (f64, f64),
}

fn range_of(values: &[f64]) -> (f64, f64) {
    let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    (lo, hi)
}

impl ModelIsotherm {
    /// Fit the named model to the adsorption branch of a point isotherm,
    /// in its stored units.
    pub fn from_pointisotherm(
        iso: &PointIsotherm,
        model_name: &str,
        options: &FitOptions,
    ) -> Result<Self> {
        let mut model = create_model_by_name(model_name, iso.temperature_k())?;
        if model.requires_relative_pressure() && !iso.units().pressure_mode.is_relative() {
            return Err(PhysisorbError::ParameterInvalid {
                name: "model".into(),
                reason: format!(
                    "model '{}' is defined on relative pressure but the isotherm is absolute",
                    model.name()
                ),
            });
        }
        let pressure = iso.pressure(&PressureQuery::branch(BranchFilter::Ads))?;
        let loading = iso.loading(&LoadingQuery::branch(BranchFilter::Ads))?;
        let rmse = fit_model(&mut model, &pressure, &loading, None, options)?;
        Ok(Self {
            material: iso.material.clone(),
            adsorbate: iso.adsorbate.clone(),
            temperature: iso.temperature(),
            units: iso.units().clone(),
            model,
            rmse,
            pressure_range: range_of(&pressure),
            loading_range: range_of(&loading),
        })
    }

    /// Fit the whole guess catalog and keep the model with the best RMSE.
    pub fn guess_from_pointisotherm(iso: &PointIsotherm, options: &FitOptions) -> Result<Self> {
        let pressure = iso.pressure(&PressureQuery::branch(BranchFilter::Ads))?;
        let loading = iso.loading(&LoadingQuery::branch(BranchFilter::Ads))?;
        let (model, rmse) = guess_model(
            &pressure,
            &loading,
            iso.temperature_k(),
            iso.units().pressure_mode.is_relative(),
            options,
        )?;
        Ok(Self {
            material: iso.material.clone(),
            adsorbate: iso.adsorbate.clone(),
            temperature: iso.temperature(),
            units: iso.units().clone(),
            model,
            rmse,
            pressure_range: range_of(&pressure),
            loading_range: range_of(&loading),
        })
    }

    pub fn model(&self) -> &ModelEnum {
        &self.model
    }

    pub fn rmse(&self) -> f64 {
        self.rmse
    }

    pub fn units(&self) -> &IsothermUnits {
        &self.units
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Pressure span of the data the model was fitted on.
    pub fn pressure_range(&self) -> (f64, f64) {
        self.pressure_range
    }

    pub fn loading_range(&self) -> (f64, f64) {
        self.loading_range
    }

    fn warn_outside(&self, value: f64, (lo, hi): (f64, f64), axis: &str) {
        if value < lo || value > hi {
            warn!(
                "model '{}' queried at {axis} {value} outside the fitted range [{lo}, {hi}]",
                self.model.name()
            );
        }
    }

    pub fn loading_at(&self, pressure: f64) -> Result<f64> {
        self.warn_outside(pressure, self.pressure_range, "pressure");
        self.model.loading(pressure)
    }

    pub fn pressure_at(&self, loading: f64) -> Result<f64> {
        self.warn_outside(loading, self.loading_range, "loading");
        self.model.pressure(loading)
    }

    pub fn spreading_pressure_at(&self, pressure: f64) -> Result<f64> {
        self.warn_outside(pressure, self.pressure_range, "pressure");
        self.model.spreading_pressure(pressure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isotherm::point_isotherm::IsothermData;
    use crate::species::registry::find_adsorbate;
    use approx::assert_relative_eq;

    fn langmuir_iso() -> PointIsotherm {
        let pressure = vec![0.01, 0.02, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0];
        let loading: Vec<f64> = pressure
            .iter()
            .map(|p| 5.0 * 10.0 * p / (1.0 + 10.0 * p))
            .collect();
        PointIsotherm::new(
            Material::new("takeda"),
            find_adsorbate("nitrogen").unwrap(),
            298.0,
            IsothermData::new(pressure, loading),
            IsothermUnits::default(),
        )
        .unwrap()
    }

    #[test]
    fn fit_from_point_isotherm_reproduces_data() {
        let iso = langmuir_iso();
        let model = ModelIsotherm::from_pointisotherm(&iso, "langmuir", &FitOptions::default())
            .unwrap();
        assert!(model.rmse() < 1e-6);
        assert_relative_eq!(
            model.loading_at(0.1).unwrap(),
            5.0 * 1.0 / 2.0,
            max_relative = 1e-4
        );
        let n = model.loading_at(0.3).unwrap();
        assert_relative_eq!(model.pressure_at(n).unwrap(), 0.3, max_relative = 1e-6);
    }

    #[test]
    fn guess_constructor_finds_a_model() {
        let iso = langmuir_iso();
        let model = ModelIsotherm::guess_from_pointisotherm(&iso, &FitOptions::default()).unwrap();
        assert!(model.rmse() < 1e-4);
        assert_eq!(model.units(), iso.units());
    }

    #[test]
    fn relative_only_models_reject_absolute_isotherms() {
        let iso = langmuir_iso();
        assert!(ModelIsotherm::from_pointisotherm(&iso, "dr", &FitOptions::default()).is_err());
    }
}
