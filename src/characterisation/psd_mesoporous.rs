//! Mesopore size distributions from capillary condensation. All three
//! methods walk the branch in order of decreasing pressure and partition
//! the volume change of each step into film thinning on already-open
//! pores and capillary evaporation from pores opening at this step.

use crate::characterisation::kelvin::{MeniscusGeometry, PoreGeometry, kelvin_radius};
use crate::characterisation::thickness::ThicknessFn;
use crate::error::{PhysisorbError, Result};
use crate::isotherm::descriptor::{Branch, BranchFilter};
use crate::isotherm::point_isotherm::PointIsotherm;
use log::warn;
use serde::Serialize;
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MesoPsdMethod {
    /// Generalised Dollimore-Heal correction for slit, cylinder and
    /// sphere geometry.
    GeneralisedDh,
    /// Barrett-Joyner-Halenda, cylindrical pores.
    Bjh,
    /// Dollimore-Heal with the pore-length term, cylindrical pores.
    DollimoreHeal,
}

#[derive(Debug, Clone, Serialize)]
pub struct MesoPsdResult {
    /// Average pore widths per step, nm, ascending.
    pub widths: Vec<f64>,
    /// Differential distribution dV/dw, cm3 per material unit per nm.
    pub distribution: Vec<f64>,
    /// Cumulative pore volume, cm3 per material unit, ascending widths.
    pub cumulative_volume: Vec<f64>,
    pub warnings: Vec<String>,
}

struct Step {
    d_volume: f64,
    d_thickness: f64,
    avg_thickness: f64,
    avg_k_radius: f64,
    width: f64,
    d_width: f64,
}

/// Generalised DH step: the film correction uses the open pore area and
/// the core-to-pore scaling `(w / (w - 2t))^l`.
fn generalised_dh_volume(step: &Step, sum_area: f64, geometry: PoreGeometry) -> (f64, f64) {
    let l = geometry.factor();
    let core = 2.0 * step.avg_k_radius;
    let ratio = (step.width / core).powf(l);
    let volume = (step.d_volume - step.d_thickness * sum_area) * ratio;
    let area = 2.0 * l * volume / step.width;
    (volume, area)
}

/// Classic BJH step for cylinders, radius-based.
fn bjh_volume(step: &Step, sum_area: f64) -> (f64, f64) {
    let pore_radius = step.avg_k_radius + step.avg_thickness;
    let ratio = (pore_radius / (step.avg_k_radius + step.d_thickness / 2.0)).powi(2);
    let volume = ratio * (step.d_volume - step.d_thickness * sum_area);
    let area = 2.0 * volume / pore_radius * (pore_radius - step.avg_thickness) / pore_radius;
    (volume, area)
}

/// Dollimore-Heal step: BJH plus the pore-length term.
fn dollimore_heal_volume(step: &Step, sum_area: f64, sum_length: f64) -> (f64, f64, f64) {
    let pore_radius = step.avg_k_radius + step.avg_thickness;
    let ratio = (pore_radius / (step.avg_k_radius + step.d_thickness / 2.0)).powi(2);
    let volume = ratio
        * (step.d_volume - step.d_thickness * sum_area
            + 2.0 * PI * step.d_thickness * step.avg_thickness * step.avg_thickness * sum_length);
    let area = 2.0 * volume / pore_radius;
    let length = area / (2.0 * PI * pore_radius);
    (volume, area, length)
}

/// Mesopore PSD. The branch defaults to desorption, the physical branch
/// of capillary evaporation; the meniscus geometry defaults to the one
/// physical for the geometry and branch.
pub fn psd_mesoporous(
    iso: &PointIsotherm,
    method: MesoPsdMethod,
    geometry: PoreGeometry,
    branch: Branch,
    thickness_model: &ThicknessFn,
    meniscus: Option<MeniscusGeometry>,
) -> Result<MesoPsdResult> {
    if method != MesoPsdMethod::GeneralisedDh && geometry != PoreGeometry::Cylinder {
        return Err(PhysisorbError::ParameterInvalid {
            name: "geometry".into(),
            reason: "BJH and Dollimore-Heal are defined for cylindrical pores only".into(),
        });
    }
    let filter = match branch {
        Branch::Adsorption => BranchFilter::Ads,
        Branch::Desorption => BranchFilter::Des,
    };
    let (pressure, loading) = super::relative_molar_data(iso, filter)?;

    let temperature = iso.temperature_k();
    let molar_mass = iso.adsorbate.molar_mass()?;
    let liquid_density = iso.adsorbate.liquid_density(temperature)?;
    let surface_tension = iso.adsorbate.surface_tension(temperature)?;
    let molar_volume = molar_mass / liquid_density;
    let meniscus = meniscus.unwrap_or_else(|| MeniscusGeometry::for_branch(geometry, branch));

    // walk from high to low pressure; keep points strictly inside (0, 1)
    let mut points: Vec<(f64, f64)> = pressure
        .iter()
        .zip(&loading)
        .filter(|(p, _)| **p > 0.0 && **p < 1.0)
        .map(|(p, n)| (*p, n * molar_mass / liquid_density))
        .collect();
    points.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap());
    if points.len() < 3 {
        return Err(PhysisorbError::calculation(format!(
            "mesopore PSD needs at least 3 points in (0, 1) relative pressure, got {}",
            points.len()
        )));
    }

    let thickness: Vec<f64> = points
        .iter()
        .map(|(p, _)| thickness_model(*p))
        .collect::<Result<_>>()?;
    let k_radius: Vec<f64> = points
        .iter()
        .map(|(p, _)| kelvin_radius(*p, meniscus, temperature, surface_tension, molar_volume))
        .collect::<Result<_>>()?;

    let mut warnings = Vec::new();
    let mut widths = Vec::new();
    let mut distribution = Vec::new();
    let mut step_volumes = Vec::new();
    let mut sum_area = 0.0;
    let mut sum_length = 0.0;

    for i in 0..points.len() - 1 {
        let step = Step {
            d_volume: points[i].1 - points[i + 1].1,
            d_thickness: thickness[i] - thickness[i + 1],
            avg_thickness: (thickness[i] + thickness[i + 1]) / 2.0,
            avg_k_radius: (k_radius[i] + k_radius[i + 1]) / 2.0,
            width: (k_radius[i] + thickness[i] + k_radius[i + 1] + thickness[i + 1]),
            d_width: 2.0 * (k_radius[i] + thickness[i] - k_radius[i + 1] - thickness[i + 1]),
        };
        if step.d_width <= 0.0 {
            continue;
        }
        let (volume, area) = match method {
            MesoPsdMethod::GeneralisedDh => generalised_dh_volume(&step, sum_area, geometry),
            MesoPsdMethod::Bjh => bjh_volume(&step, sum_area),
            MesoPsdMethod::DollimoreHeal => {
                let (v, a, l) = dollimore_heal_volume(&step, sum_area, sum_length);
                sum_length += l;
                (v, a)
            }
        };
        let volume = if volume < 0.0 {
            warnings.push(format!(
                "negative pore volume at width {:.2} nm clamped to zero",
                step.width
            ));
            0.0
        } else {
            volume
        };
        sum_area += area;

        widths.push(step.width);
        distribution.push(volume / step.d_width);
        step_volumes.push(volume);
    }
    for w in &warnings {
        warn!("psd_mesoporous: {w}");
    }

    // report ascending in pore width
    widths.reverse();
    distribution.reverse();
    step_volumes.reverse();
    let mut cumulative = 0.0;
    let cumulative_volume = step_volumes
        .iter()
        .map(|v| {
            cumulative += v;
            cumulative
        })
        .collect();

    Ok(MesoPsdResult {
        widths,
        distribution,
        cumulative_volume,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step() -> Step {
        Step {
            d_volume: 0.05,
            d_thickness: 0.02,
            avg_thickness: 0.5,
            avg_k_radius: 1.5,
            width: 4.0,
            d_width: 0.4,
        }
    }

    #[test]
    fn generalised_dh_matches_bjh_scaling_for_cylinders() {
        // with no open pores yet (sum_area = 0) the cylinder correction is
        // (w / 2 r_k)^2 = ((r_k + t) / r_k)^2, the BJH ratio at dt -> 0
        let s = step();
        let (v_dh, _) = generalised_dh_volume(&s, 0.0, PoreGeometry::Cylinder);
        let ratio = (s.width / (2.0 * s.avg_k_radius)).powi(2);
        approx::assert_relative_eq!(v_dh, s.d_volume * ratio, max_relative = 1e-12);
    }

    #[test]
    fn film_correction_reduces_pore_volume() {
        let s = step();
        let (with_area, _) = generalised_dh_volume(&s, 0.5, PoreGeometry::Cylinder);
        let (without_area, _) = generalised_dh_volume(&s, 0.0, PoreGeometry::Cylinder);
        assert!(with_area < without_area);
    }

    #[test]
    fn geometry_factor_orders_corrections() {
        let s = step();
        let (v_slit, _) = generalised_dh_volume(&s, 0.0, PoreGeometry::Slit);
        let (v_cyl, _) = generalised_dh_volume(&s, 0.0, PoreGeometry::Cylinder);
        let (v_sph, _) = generalised_dh_volume(&s, 0.0, PoreGeometry::Sphere);
        assert!(v_slit < v_cyl && v_cyl < v_sph);
    }
}
