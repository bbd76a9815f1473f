//! Isosteric enthalpy of adsorption by the Clausius-Clapeyron route:
//! several isotherms of the same pair at different temperatures,
//! `ln p` regressed against `1/T` at constant loading.

use crate::constants::GAS_CONSTANT;
use crate::error::{PhysisorbError, Result};
use crate::isotherm::descriptor::BranchFilter;
use crate::isotherm::interpolator::{FillPolicy, InterpolationKind, Interpolator};
use crate::isotherm::point_isotherm::{LoadingQuery, PointIsotherm, PressureQuery};
use crate::numerics::linreg::linear_fit;
use crate::units::loading::{AmountUnit, LoadingBasis};
use crate::units::material::MaterialBasis;
use crate::units::pressure::{PressureMode, PressureUnit};
use log::warn;
use serde::Serialize;

const DEFAULT_POINTS: usize = 50;

#[derive(Debug, Clone, Serialize)]
pub struct IsostericEnthalpyResult {
    /// Loading axis, mol/g.
    pub loading: Vec<f64>,
    /// Isosteric enthalpy, kJ/mol, positive for exothermic adsorption.
    pub enthalpy: Vec<f64>,
    /// Correlation of the ln p vs 1/T regression per loading point.
    pub corr_coef: Vec<f64>,
    /// Standard error of the enthalpy, kJ/mol.
    pub stderr: Vec<f64>,
    pub warnings: Vec<String>,
}

/// Per-isotherm data on a common axis: pressure in Pa against loading in
/// mol/g, adsorption branch.
fn common_axes(iso: &PointIsotherm) -> Result<(Vec<f64>, Vec<f64>)> {
    let pressure = iso.pressure(&PressureQuery {
        branch: BranchFilter::Ads,
        mode: Some(PressureMode::Absolute),
        unit: Some(PressureUnit::Pascal),
        ..Default::default()
    })?;
    let loading = iso.loading(&LoadingQuery {
        branch: BranchFilter::Ads,
        basis: Some(LoadingBasis::Molar),
        unit: Some(AmountUnit::Mole),
        material_basis: Some(MaterialBasis::Mass),
        material_unit: Some(AmountUnit::Gram),
        ..Default::default()
    })?;
    Ok((pressure, loading))
}

/// Isosteric enthalpy from at least two isotherms of the same
/// material/adsorbate pair at distinct temperatures. `loading_points`
/// overrides the automatic loading axis.
pub fn isosteric_enthalpy(
    isotherms: &[&PointIsotherm],
    loading_points: Option<&[f64]>,
) -> Result<IsostericEnthalpyResult> {
    if isotherms.len() < 2 {
        return Err(PhysisorbError::ParameterInvalid {
            name: "isotherms".into(),
            reason: format!("need at least 2 isotherms, got {}", isotherms.len()),
        });
    }
    let first = isotherms[0];
    for iso in &isotherms[1..] {
        if !first.adsorbate.matches(&iso.adsorbate.name) {
            return Err(PhysisorbError::ParameterInvalid {
                name: "isotherms".into(),
                reason: format!(
                    "mixed adsorbates '{}' and '{}'",
                    first.adsorbate.name, iso.adsorbate.name
                ),
            });
        }
        if first.material.name != iso.material.name {
            return Err(PhysisorbError::ParameterInvalid {
                name: "isotherms".into(),
                reason: format!(
                    "mixed materials '{}' and '{}'",
                    first.material.name, iso.material.name
                ),
            });
        }
    }
    let temperatures: Vec<f64> = isotherms.iter().map(|iso| iso.temperature_k()).collect();
    for (i, t1) in temperatures.iter().enumerate() {
        if temperatures[i + 1..].iter().any(|t2| (t1 - t2).abs() < 1e-9) {
            return Err(PhysisorbError::ParameterInvalid {
                name: "isotherms".into(),
                reason: format!("duplicate temperature {t1} K"),
            });
        }
    }

    // pressure as a function of loading on each isotherm
    let mut interpolators = Vec::with_capacity(isotherms.len());
    let mut min_loadings = Vec::new();
    let mut max_loadings = Vec::new();
    for iso in isotherms {
        let (pressure, loading) = common_axes(iso)?;
        min_loadings.push(loading.iter().cloned().fold(f64::INFINITY, f64::min));
        max_loadings.push(loading.iter().cloned().fold(f64::NEG_INFINITY, f64::max));
        interpolators.push(Interpolator::new(
            &loading,
            &pressure,
            InterpolationKind::Linear,
            FillPolicy::Error,
        )?);
    }

    let axis: Vec<f64> = match loading_points {
        Some(points) => points.to_vec(),
        None => {
            let lo = 1.01 * min_loadings.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let hi = 0.99 * max_loadings.iter().cloned().fold(f64::INFINITY, f64::min);
            if !(hi > lo) {
                return Err(PhysisorbError::calculation(format!(
                    "the isotherms share no loading range ([{lo}, {hi}])"
                )));
            }
            (0..DEFAULT_POINTS)
                .map(|i| lo + (hi - lo) * i as f64 / (DEFAULT_POINTS - 1) as f64)
                .collect()
        }
    };

    let inv_t: Vec<f64> = temperatures.iter().map(|t| 1.0 / t).collect();
    let mut enthalpy = Vec::with_capacity(axis.len());
    let mut corr_coef = Vec::with_capacity(axis.len());
    let mut stderr = Vec::with_capacity(axis.len());
    let mut warnings = Vec::new();
    for &n in &axis {
        let ln_p: Vec<f64> = interpolators
            .iter()
            .map(|interp| interp.eval(n).map(f64::ln))
            .collect::<Result<_>>()?;
        let fit = linear_fit(&inv_t, &ln_p)?;
        enthalpy.push(-GAS_CONSTANT * fit.slope / 1000.0);
        corr_coef.push(fit.corr_coef);
        stderr.push(GAS_CONSTANT * fit.stderr_slope / 1000.0);
        if fit.corr_coef.abs() < 0.99 {
            warnings.push(format!(
                "poor Clausius-Clapeyron correlation {:.4} at loading {n:.4e}",
                fit.corr_coef
            ));
        }
    }
    for w in &warnings {
        warn!("isosteric_enthalpy: {w}");
    }

    Ok(IsostericEnthalpyResult {
        loading: axis,
        enthalpy,
        corr_coef,
        stderr,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isotherm::descriptor::IsothermUnits;
    use crate::isotherm::point_isotherm::IsothermData;
    use crate::species::material::Material;
    use crate::species::registry::find_adsorbate;

    /// Langmuir isotherms with a van 't Hoff affinity generate an exactly
    /// constant isosteric enthalpy.
    fn vant_hoff_isotherm(temperature: f64, dh_kj: f64) -> PointIsotherm {
        let k0 = 1e-7;
        let k = k0 * (dh_kj * 1000.0 / (GAS_CONSTANT * temperature)).exp();
        let pressure: Vec<f64> = (1..=60).map(|i| 0.05 * i as f64).collect();
        let loading: Vec<f64> = pressure
            .iter()
            .map(|p| 5.0 * k * p / (1.0 + k * p))
            .collect();
        PointIsotherm::new(
            Material::new("mof"),
            find_adsorbate("carbon dioxide").unwrap(),
            temperature,
            IsothermData::new(pressure, loading),
            IsothermUnits::default(),
        )
        .unwrap()
    }

    #[test]
    fn recovers_vant_hoff_enthalpy() {
        let dh = 25.0;
        let isos = [
            vant_hoff_isotherm(273.15, dh),
            vant_hoff_isotherm(298.15, dh),
            vant_hoff_isotherm(323.15, dh),
        ];
        let refs: Vec<&PointIsotherm> = isos.iter().collect();
        let result = isosteric_enthalpy(&refs, None).unwrap();
        for (h, r) in result.enthalpy.iter().zip(&result.corr_coef) {
            approx::assert_relative_eq!(*h, dh, max_relative = 0.02);
            assert!(r.abs() > 0.99);
        }
        for s in &result.stderr {
            assert!(*s < 2.0, "stderr too large: {s}");
        }
    }

    #[test]
    fn rejects_mixed_pairs_and_single_input() {
        let a = vant_hoff_isotherm(273.15, 25.0);
        assert!(isosteric_enthalpy(&[&a], None).is_err());
        let mut b = vant_hoff_isotherm(298.15, 25.0);
        b.material = Material::new("other");
        assert!(isosteric_enthalpy(&[&a, &b], None).is_err());
    }

    #[test]
    fn rejects_duplicate_temperatures() {
        let a = vant_hoff_isotherm(273.15, 25.0);
        let b = vant_hoff_isotherm(273.15, 25.0);
        assert!(isosteric_enthalpy(&[&a, &b], None).is_err());
    }
}
