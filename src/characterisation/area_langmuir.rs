//! Langmuir specific surface area from the linearised `p/n` plot.

use crate::constants::AVOGADRO;
use crate::error::{PhysisorbError, Result};
use crate::isotherm::descriptor::BranchFilter;
use crate::isotherm::point_isotherm::PointIsotherm;
use crate::numerics::linreg::linear_fit;
use log::warn;
use prettytable::{Table, row};
use serde::Serialize;

const DEFAULT_LIMITS: (f64, f64) = (0.05, 0.9);

#[derive(Debug, Clone, Serialize)]
pub struct LangmuirResult {
    /// Specific surface area in m2 per stored material unit.
    pub area: f64,
    pub k_const: f64,
    /// Monolayer loading from the regression, mol per material unit.
    pub n_monolayer: f64,
    pub slope: f64,
    pub intercept: f64,
    pub corr_coef: f64,
    pub limits: (usize, usize),
    pub warnings: Vec<String>,
}

/// Langmuir area on the adsorption branch: regression of `p/n` against
/// `p`, monolayer loading from the slope.
pub fn area_langmuir(
    iso: &PointIsotherm,
    p_limits: Option<(f64, f64)>,
    verbose: bool,
) -> Result<LangmuirResult> {
    let (pressure, loading) = super::relative_molar_data(iso, BranchFilter::Ads)?;
    let cross_section = iso.adsorbate.cross_sectional_area()?;

    let limits = p_limits.unwrap_or(DEFAULT_LIMITS);
    let selected: Vec<usize> = (0..pressure.len())
        .filter(|&i| pressure[i] >= limits.0 && pressure[i] <= limits.1)
        .collect();
    if selected.len() < 3 {
        return Err(PhysisorbError::calculation(format!(
            "Langmuir region within p/p0 [{}, {}] has {} usable points, need at least 3",
            limits.0,
            limits.1,
            selected.len()
        )));
    }

    let p_sel: Vec<f64> = selected.iter().map(|&i| pressure[i]).collect();
    let t_sel: Vec<f64> = selected.iter().map(|&i| pressure[i] / loading[i]).collect();
    let fit = linear_fit(&p_sel, &t_sel)?;

    let n_monolayer = 1.0 / fit.slope;
    let k_const = fit.slope / fit.intercept;
    let area = n_monolayer * cross_section * 1e-18 * AVOGADRO;

    let mut warnings = Vec::new();
    if n_monolayer < 0.0 {
        warnings.push(format!(
            "negative monolayer loading ({n_monolayer:.3e}), region is not Langmuir-like"
        ));
    }
    if fit.corr_coef * fit.corr_coef < 0.99 {
        warnings.push(format!(
            "Langmuir regression is poor (r^2 = {:.4})",
            fit.corr_coef * fit.corr_coef
        ));
    }
    for w in &warnings {
        warn!("area_langmuir: {w}");
    }

    let result = LangmuirResult {
        area,
        k_const,
        n_monolayer,
        slope: fit.slope,
        intercept: fit.intercept,
        corr_coef: fit.corr_coef,
        limits: (selected[0], selected[selected.len() - 1]),
        warnings,
    };
    if verbose {
        let mut table = Table::new();
        table.add_row(row!["Langmuir area, m2", format!("{:.4e}", result.area)]);
        table.add_row(row!["K constant", format!("{:.4e}", result.k_const)]);
        table.add_row(row![
            "Monolayer loading, mol",
            format!("{:.4e}", result.n_monolayer)
        ]);
        table.add_row(row!["Correlation", format!("{:.5}", result.corr_coef)]);
        table.printstd();
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isotherm::descriptor::IsothermUnits;
    use crate::isotherm::point_isotherm::IsothermData;
    use crate::species::material::Material;
    use crate::species::registry::find_adsorbate;
    use approx::assert_relative_eq;

    #[test]
    fn recovers_monolayer_from_exact_langmuir_data() {
        // n = n_m K p / (1 + K p) with n_m = 0.01 mol/g, K = 50
        let pressure: Vec<f64> = (1..=18).map(|i| 0.05 * i as f64).collect();
        let loading: Vec<f64> = pressure
            .iter()
            .map(|p| 0.01 * 50.0 * p / (1.0 + 50.0 * p) * 1000.0)
            .collect();
        let iso = PointIsotherm::new(
            Material::new("zeolite"),
            find_adsorbate("nitrogen").unwrap(),
            77.355,
            IsothermData::new(pressure, loading),
            IsothermUnits {
                pressure_mode: crate::units::pressure::PressureMode::Relative,
                pressure_unit: None,
                ..IsothermUnits::default()
            },
        )
        .unwrap();
        let result = area_langmuir(&iso, None, false).unwrap();
        assert_relative_eq!(result.n_monolayer, 0.01, max_relative = 1e-6);
        // 0.01 mol/g * 0.162e-18 m2 * N_A ~ 975 m2/g
        assert_relative_eq!(result.area, 975.6, max_relative = 1e-2);
        assert!(result.corr_coef > 0.9999);
    }
}
