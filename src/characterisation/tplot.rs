//! t-plot analysis: loading against statistical layer thickness, with
//! external area and micropore volume from the linear sections.

use crate::characterisation::thickness::ThicknessFn;
use crate::error::{PhysisorbError, Result};
use crate::isotherm::descriptor::BranchFilter;
use crate::isotherm::point_isotherm::PointIsotherm;
use crate::numerics::linear_region::find_linear_sections;
use crate::numerics::linreg::linear_fit;
use log::warn;
use prettytable::{Table, row};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TPlotSection {
    /// Point indices of the section on the thickness curve.
    pub section: Vec<usize>,
    pub slope: f64,
    pub intercept: f64,
    pub corr_coef: f64,
    /// Micropore volume from the intercept, cm3 per material unit.
    pub adsorbed_volume: f64,
    /// External area from the slope, m2 per material unit.
    pub area: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TPlotResult {
    /// Thickness of each point of the adsorption branch, nm.
    pub thickness_curve: Vec<f64>,
    pub results: Vec<TPlotSection>,
    pub warnings: Vec<String>,
}

/// Fit one section of the t-plot and convert slope and intercept into
/// area and adsorbed volume through the liquid adsorbate.
fn analyse_section(
    section: &[usize],
    thickness: &[f64],
    loading: &[f64],
    molar_mass: f64,
    liquid_density: f64,
) -> Result<Option<TPlotSection>> {
    if section.len() < 3 {
        return Ok(None);
    }
    let t_sel: Vec<f64> = section.iter().map(|&i| thickness[i]).collect();
    let n_sel: Vec<f64> = section.iter().map(|&i| loading[i]).collect();
    let fit = linear_fit(&t_sel, &n_sel)?;

    let t_max = t_sel.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let n_max = n_sel.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if fit.slope * t_max / n_max >= 3.0 {
        return Ok(None);
    }

    Ok(Some(TPlotSection {
        section: section.to_vec(),
        slope: fit.slope,
        intercept: fit.intercept,
        corr_coef: fit.corr_coef,
        adsorbed_volume: fit.intercept * molar_mass / liquid_density,
        area: fit.slope * molar_mass / liquid_density * 1000.0,
    }))
}

/// t-plot on the adsorption branch. `limits` restricts the analysis to
/// points whose thickness falls inside the interval; without limits the
/// linear sections of the curve are detected automatically.
pub fn t_plot(
    iso: &PointIsotherm,
    thickness_model: &ThicknessFn,
    limits: Option<(f64, f64)>,
    verbose: bool,
) -> Result<TPlotResult> {
    let (pressure, loading) = super::relative_molar_data(iso, BranchFilter::Ads)?;
    let molar_mass = iso.adsorbate.molar_mass()?;
    let liquid_density = iso.adsorbate.liquid_density(iso.temperature_k())?;

    let mut thickness = Vec::with_capacity(pressure.len());
    let mut usable = Vec::with_capacity(pressure.len());
    for (i, p) in pressure.iter().enumerate() {
        match thickness_model(*p) {
            Ok(t) => {
                thickness.push(t);
                usable.push(i);
            }
            Err(_) => thickness.push(f64::NAN),
        }
    }
    if usable.len() < 3 {
        return Err(PhysisorbError::calculation(format!(
            "t-plot needs at least 3 points with a defined thickness, got {}",
            usable.len()
        )));
    }

    let sections: Vec<Vec<usize>> = match limits {
        Some((lo, hi)) => {
            vec![
                usable
                    .iter()
                    .cloned()
                    .filter(|&i| thickness[i] >= lo && thickness[i] <= hi)
                    .collect(),
            ]
        }
        None => {
            let t_use: Vec<f64> = usable.iter().map(|&i| thickness[i]).collect();
            let n_use: Vec<f64> = usable.iter().map(|&i| loading[i]).collect();
            find_linear_sections(&t_use, &n_use)
                .into_iter()
                .map(|s| s.into_iter().map(|j| usable[j]).collect())
                .collect()
        }
    };

    let mut results = Vec::new();
    let mut warnings = Vec::new();
    for section in &sections {
        if let Some(r) = analyse_section(section, &thickness, &loading, molar_mass, liquid_density)?
        {
            results.push(r);
        }
    }
    if results.is_empty() {
        warnings.push("no physically plausible linear section found".to_string());
    }
    for w in &warnings {
        warn!("t_plot: {w}");
    }

    if verbose {
        let mut table = Table::new();
        table.add_row(row![
            "Section", "Slope", "Intercept", "Volume, cm3", "Area, m2"
        ]);
        for r in &results {
            table.add_row(row![
                format!("{}..{}", r.section[0], r.section[r.section.len() - 1]),
                format!("{:.4e}", r.slope),
                format!("{:.4e}", r.intercept),
                format!("{:.4e}", r.adsorbed_volume),
                format!("{:.2}", r.area)
            ]);
        }
        table.printstd();
    }

    Ok(TPlotResult {
        thickness_curve: thickness,
        results,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implausible_slope_is_rejected() {
        let thickness = vec![0.1, 0.2, 0.3, 0.4];
        // slope 100, max n 10: 100 * 0.4 / 10 = 4 >= 3
        let loading = vec![-20.0, -10.0, 0.0, 10.0];
        let section = vec![0, 1, 2, 3];
        let result = analyse_section(&section, &thickness, &loading, 28.0, 0.8).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn section_conversion_uses_liquid_adsorbate() {
        let thickness = vec![0.1, 0.2, 0.3, 0.4];
        // n = 0.002 * t + 0.001, slope * t_max / n_max well below 3
        let loading: Vec<f64> = thickness.iter().map(|t| 0.002 * t + 0.001).collect();
        let section = vec![0, 1, 2, 3];
        let result = analyse_section(&section, &thickness, &loading, 28.0134, 0.806)
            .unwrap()
            .unwrap();
        approx::assert_relative_eq!(
            result.adsorbed_volume,
            0.001 * 28.0134 / 0.806,
            max_relative = 1e-9
        );
        approx::assert_relative_eq!(
            result.area,
            0.002 * 28.0134 / 0.806 * 1000.0,
            max_relative = 1e-9
        );
    }
}
