//! BET specific surface area with the Rouquerol consistency criteria.

use crate::constants::AVOGADRO;
use crate::error::{PhysisorbError, Result};
use crate::isotherm::descriptor::BranchFilter;
use crate::isotherm::interpolator::{FillPolicy, InterpolationKind, Interpolator};
use crate::isotherm::point_isotherm::PointIsotherm;
use crate::numerics::linreg::linear_fit;
use log::warn;
use prettytable::{Table, row};
use serde::Serialize;

const DEFAULT_LIMITS: (f64, f64) = (0.05, 0.30);

#[derive(Debug, Clone, Serialize)]
pub struct BetResult {
    /// Specific surface area in m2 per stored material unit.
    pub area: f64,
    pub c_const: f64,
    /// Monolayer loading from the regression, mol per material unit.
    pub n_monolayer: f64,
    /// Relative pressure of statistical monolayer formation.
    pub p_monolayer: f64,
    /// Measured loading interpolated at `p_monolayer`.
    pub n_monolayer_real: f64,
    pub slope: f64,
    pub intercept: f64,
    pub corr_coef: f64,
    /// First and last point index of the selected region.
    pub limits: (usize, usize),
    /// Relative pressures of the full branch.
    pub pressure: Vec<f64>,
    /// BET transform `p / (n (1-p))` of the full branch.
    pub bet_curve: Vec<f64>,
    /// Rouquerol transform `n (1-p)` of the full branch.
    pub rouquerol_curve: Vec<f64>,
    pub warnings: Vec<String>,
}

/// Select the region for the BET regression: points inside the pressure
/// limits, restricted to the contiguous prefix on which the Rouquerol
/// transform is non-decreasing.
fn select_region(pressure: &[f64], rouquerol: &[f64], limits: (f64, f64)) -> Vec<usize> {
    let candidates: Vec<usize> = (0..pressure.len())
        .filter(|&i| pressure[i] >= limits.0 && pressure[i] <= limits.1)
        .collect();
    let mut selected = Vec::with_capacity(candidates.len());
    for &i in &candidates {
        if let Some(&prev) = selected.last()
            && rouquerol[i] < rouquerol[prev]
        {
            break;
        }
        selected.push(i);
    }
    selected
}

/// BET area on the adsorption branch. `p_limits` overrides the default
/// relative pressure window of `[0.05, 0.30]`.
pub fn area_bet(
    iso: &PointIsotherm,
    p_limits: Option<(f64, f64)>,
    verbose: bool,
) -> Result<BetResult> {
    let (pressure, loading) = super::relative_molar_data(iso, BranchFilter::Ads)?;
    let cross_section = iso.adsorbate.cross_sectional_area()?;

    let rouquerol: Vec<f64> = pressure
        .iter()
        .zip(&loading)
        .map(|(p, n)| n * (1.0 - p))
        .collect();
    let bet_curve: Vec<f64> = pressure
        .iter()
        .zip(&rouquerol)
        .map(|(p, r)| p / r)
        .collect();

    let limits = p_limits.unwrap_or(DEFAULT_LIMITS);
    let selected = select_region(&pressure, &rouquerol, limits);
    if selected.len() < 3 {
        return Err(PhysisorbError::calculation(format!(
            "BET region within p/p0 [{}, {}] has {} usable points, need at least 3",
            limits.0,
            limits.1,
            selected.len()
        )));
    }

    let p_sel: Vec<f64> = selected.iter().map(|&i| pressure[i]).collect();
    let b_sel: Vec<f64> = selected.iter().map(|&i| bet_curve[i]).collect();
    let fit = linear_fit(&p_sel, &b_sel)?;

    let c_const = fit.slope / fit.intercept + 1.0;
    let n_monolayer = 1.0 / (fit.slope + fit.intercept);
    let p_monolayer = 1.0 / (c_const.sqrt() + 1.0);
    let n_monolayer_real = Interpolator::new(
        &pressure,
        &loading,
        InterpolationKind::Linear,
        FillPolicy::Extrapolate,
    )?
    .eval(p_monolayer)?;
    let area = n_monolayer * cross_section * 1e-18 * AVOGADRO;

    let mut warnings = Vec::new();
    if c_const < 0.0 {
        warnings.push(format!("BET constant is negative ({c_const:.3})"));
    }
    if fit.corr_coef * fit.corr_coef < 0.99 {
        warnings.push(format!(
            "BET regression is poor (r^2 = {:.4})",
            fit.corr_coef * fit.corr_coef
        ));
    }
    if p_monolayer < p_sel[0] || p_monolayer > p_sel[p_sel.len() - 1] {
        warnings.push(format!(
            "monolayer point p/p0 = {p_monolayer:.4} lies outside the selected region"
        ));
    }
    for w in &warnings {
        warn!("area_bet: {w}");
    }

    let result = BetResult {
        area,
        c_const,
        n_monolayer,
        p_monolayer,
        n_monolayer_real,
        slope: fit.slope,
        intercept: fit.intercept,
        corr_coef: fit.corr_coef,
        limits: (selected[0], selected[selected.len() - 1]),
        pressure,
        bet_curve,
        rouquerol_curve: rouquerol,
        warnings,
    };
    if verbose {
        print_result(&result);
    }
    Ok(result)
}

fn print_result(result: &BetResult) {
    let mut table = Table::new();
    table.add_row(row!["BET area, m2", format!("{:.4e}", result.area)]);
    table.add_row(row!["C constant", format!("{:.2}", result.c_const)]);
    table.add_row(row![
        "Monolayer loading, mol",
        format!("{:.4e}", result.n_monolayer)
    ]);
    table.add_row(row![
        "Monolayer pressure, p/p0",
        format!("{:.4}", result.p_monolayer)
    ]);
    table.add_row(row!["Correlation", format!("{:.5}", result.corr_coef)]);
    table.printstd();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rouquerol_prefix_cuts_decreasing_transform() {
        let pressure = vec![0.05, 0.1, 0.15, 0.2, 0.25];
        // transform rises then falls at the 4th point
        let rouquerol = vec![1.0, 1.2, 1.3, 1.1, 1.4];
        let selected = select_region(&pressure, &rouquerol, (0.0, 1.0));
        assert_eq!(selected, vec![0, 1, 2]);
    }

    #[test]
    fn region_respects_pressure_limits() {
        let pressure = vec![0.01, 0.05, 0.1, 0.2, 0.4];
        let rouquerol = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let selected = select_region(&pressure, &rouquerol, (0.05, 0.30));
        assert_eq!(selected, vec![1, 2, 3]);
    }
}
