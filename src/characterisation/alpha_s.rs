//! alpha-s analysis: the t-plot skeleton with the thickness axis replaced
//! by the reduced loading of a non-porous reference isotherm.

use crate::characterisation::tplot::TPlotSection;
use crate::error::{PhysisorbError, Result};
use crate::isotherm::descriptor::BranchFilter;
use crate::isotherm::interpolator::{FillPolicy, InterpolationKind, Interpolator};
use crate::isotherm::point_isotherm::PointIsotherm;
use crate::numerics::linear_region::find_linear_sections;
use crate::numerics::linreg::linear_fit;
use log::warn;
use serde::Serialize;

/// Relative pressure at which the reference loading is reduced to 1.
pub const DEFAULT_REDUCING_PRESSURE: f64 = 0.4;

#[derive(Debug, Clone, Serialize)]
pub struct AlphaSResult {
    /// Reduced reference loading of each point of the adsorption branch.
    pub alpha_curve: Vec<f64>,
    pub results: Vec<TPlotSection>,
    pub warnings: Vec<String>,
}

/// alpha-s plot of `iso` against a non-porous `reference` isotherm of the
/// same adsorbate. `reference_area` is the known specific surface area of
/// the reference material in m2 per its material unit.
pub fn alpha_s(
    iso: &PointIsotherm,
    reference: &PointIsotherm,
    reference_area: f64,
    reducing_pressure: f64,
    limits: Option<(f64, f64)>,
    verbose: bool,
) -> Result<AlphaSResult> {
    if !iso.adsorbate.matches(&reference.adsorbate.name) {
        return Err(PhysisorbError::ParameterInvalid {
            name: "reference".into(),
            reason: format!(
                "reference adsorbate '{}' differs from '{}'",
                reference.adsorbate.name, iso.adsorbate.name
            ),
        });
    }
    if !(reducing_pressure > 0.0 && reducing_pressure < 1.0) {
        return Err(PhysisorbError::ParameterInvalid {
            name: "reducing_pressure".into(),
            reason: format!("must be a relative pressure in (0, 1), got {reducing_pressure}"),
        });
    }

    let (pressure, loading) = super::relative_molar_data(iso, BranchFilter::Ads)?;
    let (ref_pressure, ref_loading) = super::relative_molar_data(reference, BranchFilter::Ads)?;
    let molar_mass = iso.adsorbate.molar_mass()?;
    let liquid_density = iso.adsorbate.liquid_density(iso.temperature_k())?;

    let ref_interp = Interpolator::new(
        &ref_pressure,
        &ref_loading,
        InterpolationKind::Linear,
        FillPolicy::Extrapolate,
    )?;
    let n_ref_reducing = ref_interp.eval(reducing_pressure)?;
    if !(n_ref_reducing > 0.0) {
        return Err(PhysisorbError::calculation(format!(
            "reference loading at p/p0 = {reducing_pressure} is not positive"
        )));
    }
    let alpha: Vec<f64> = pressure
        .iter()
        .map(|p| ref_interp.eval(*p).map(|n| n / n_ref_reducing))
        .collect::<Result<_>>()?;

    let sections: Vec<Vec<usize>> = match limits {
        Some((lo, hi)) => {
            vec![
                (0..alpha.len())
                    .filter(|&i| alpha[i] >= lo && alpha[i] <= hi)
                    .collect(),
            ]
        }
        None => find_linear_sections(&alpha, &loading),
    };

    let mut results = Vec::new();
    let mut warnings = Vec::new();
    for section in &sections {
        if section.len() < 3 {
            continue;
        }
        let a_sel: Vec<f64> = section.iter().map(|&i| alpha[i]).collect();
        let n_sel: Vec<f64> = section.iter().map(|&i| loading[i]).collect();
        let fit = linear_fit(&a_sel, &n_sel)?;

        let a_max = a_sel.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let n_max = n_sel.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        if fit.slope * a_max / n_max >= 3.0 {
            continue;
        }
        results.push(TPlotSection {
            section: section.clone(),
            slope: fit.slope,
            intercept: fit.intercept,
            corr_coef: fit.corr_coef,
            adsorbed_volume: fit.intercept * molar_mass / liquid_density,
            area: reference_area / n_ref_reducing * fit.slope,
        });
    }
    if results.is_empty() {
        warnings.push("no physically plausible linear section found".to_string());
    }
    for w in &warnings {
        warn!("alpha_s: {w}");
    }
    if verbose {
        for r in &results {
            log::info!(
                "alpha_s section {:?}: area {:.2} m2, volume {:.4e} cm3",
                (r.section[0], r.section[r.section.len() - 1]),
                r.area,
                r.adsorbed_volume
            );
        }
    }

    Ok(AlphaSResult {
        alpha_curve: alpha,
        results,
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
    use crate::units::pressure::PressureMode;
    use approx::assert_relative_eq;

    fn relative_units() -> IsothermUnits {
        IsothermUnits {
            pressure_mode: PressureMode::Relative,
            pressure_unit: None,
            ..IsothermUnits::default()
        }
    }

    #[test]
    fn scaled_sample_reports_scaled_area() {
        // reference: linear uptake; sample: exactly 2x the reference
        let pressure: Vec<f64> = (1..=9).map(|i| 0.1 * i as f64).collect();
        let ref_loading: Vec<f64> = pressure.iter().map(|p| 2.0 * p).collect();
        let sample_loading: Vec<f64> = pressure.iter().map(|p| 4.0 * p).collect();
        let nitrogen = find_adsorbate("nitrogen").unwrap();
        let reference = PointIsotherm::new(
            Material::new("nonporous silica"),
            nitrogen.clone(),
            77.355,
            IsothermData::new(pressure.clone(), ref_loading),
            relative_units(),
        )
        .unwrap();
        let sample = PointIsotherm::new(
            Material::new("silica"),
            nitrogen,
            77.355,
            IsothermData::new(pressure, sample_loading),
            relative_units(),
        )
        .unwrap();

        let result = alpha_s(&sample, &reference, 100.0, 0.4, None, false).unwrap();
        assert_eq!(result.results.len(), 1);
        // n_sample = 2 * n_ref = 2 * n_ref(0.4) * alpha, so the area is
        // double the reference area
        assert_relative_eq!(result.results[0].area, 200.0, max_relative = 1e-9);
        assert_relative_eq!(result.results[0].intercept, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn mismatched_adsorbate_is_rejected() {
        let pressure = vec![0.1, 0.2, 0.3, 0.4];
        let loading = vec![1.0, 2.0, 3.0, 4.0];
        let a = PointIsotherm::new(
            Material::new("m"),
            find_adsorbate("nitrogen").unwrap(),
            77.355,
            IsothermData::new(pressure.clone(), loading.clone()),
            relative_units(),
        )
        .unwrap();
        let b = PointIsotherm::new(
            Material::new("m"),
            find_adsorbate("argon").unwrap(),
            87.0,
            IsothermData::new(pressure, loading),
            relative_units(),
        )
        .unwrap();
        assert!(alpha_s(&a, &b, 100.0, 0.4, None, false).is_err());
    }
}
