//! Micropore size distributions of the Horvath-Kawazoe family. For every
//! measured pressure the pore size `L` solving `RT ln p = Phi(L)` is
//! found by bounded minimisation of the squared mismatch, where `Phi` is
//! the geometry-specific average interaction potential.

use crate::characterisation::kelvin::PoreGeometry;
use crate::constants::{AVOGADRO, ELECTRON_REST_ENERGY, GAS_CONSTANT};
use crate::error::{PhysisorbError, Result};
use crate::isotherm::descriptor::BranchFilter;
use crate::isotherm::point_isotherm::PointIsotherm;
use crate::numerics::quadrature::simpson;
use crate::numerics::solver::brent_minimize;
use log::warn;
use serde::Serialize;
use std::f64::consts::PI;
use std::sync::OnceLock;

/// Largest pore size considered by the solver, nm.
const L_MAX: f64 = 50.0;
/// Cached series terms of the Saito-Foley cylinder potential.
const SF_MAX_TERMS: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MicroPsdMethod {
    HorvathKawazoe,
    /// Horvath-Kawazoe with the Cheng-Yang low-pressure correction.
    HorvathKawazoeChengYang,
    /// Layer-averaged potential after Rege and Yang.
    RegeYang,
    RegeYangChengYang,
}

impl MicroPsdMethod {
    fn cheng_yang(&self) -> bool {
        matches!(
            self,
            MicroPsdMethod::HorvathKawazoeChengYang | MicroPsdMethod::RegeYangChengYang
        )
    }

    fn layered(&self) -> bool {
        matches!(
            self,
            MicroPsdMethod::RegeYang | MicroPsdMethod::RegeYangChengYang
        )
    }
}

/// Dispersion parameters of the adsorbate molecule. Lengths in nm,
/// polarizability and susceptibility in nm3, surface density in
/// molecules per m2.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HkAdsorbateParams {
    pub molecular_diameter: f64,
    pub polarizability: f64,
    pub magnetic_susceptibility: f64,
    pub surface_density: f64,
}

impl HkAdsorbateParams {
    /// Nitrogen at 77 K, the classical Horvath-Kawazoe parameter set.
    pub fn nitrogen() -> Self {
        Self {
            molecular_diameter: 0.300,
            polarizability: 1.76e-3,
            magnetic_susceptibility: 3.6e-8,
            surface_density: 6.71e18,
        }
    }

    /// Carbon dioxide at 273 K.
    pub fn carbon_dioxide() -> Self {
        Self {
            molecular_diameter: 0.323,
            polarizability: 2.91e-3,
            magnetic_susceptibility: 3.4e-8,
            surface_density: 7.697e18,
        }
    }
}

/// Dispersion parameters of the adsorbent surface.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HkMaterialParams {
    pub molecular_diameter: f64,
    pub polarizability: f64,
    pub magnetic_susceptibility: f64,
    pub surface_density: f64,
}

impl HkMaterialParams {
    /// Graphitic carbon, the classical Horvath-Kawazoe parameter set.
    pub fn carbon_black() -> Self {
        Self {
            molecular_diameter: 0.34,
            polarizability: 1.02e-3,
            magnetic_susceptibility: 1.35e-7,
            surface_density: 3.845e19,
        }
    }

    /// Oxide ion surface of aluminophosphates and zeolites.
    pub fn oxide_ion() -> Self {
        Self {
            molecular_diameter: 0.276,
            polarizability: 2.5e-3,
            magnetic_susceptibility: 1.3e-8,
            surface_density: 1.315e19,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MicroPsdResult {
    /// Effective pore widths, nm, ascending.
    pub widths: Vec<f64>,
    /// Differential distribution dV/dw, cm3 per material unit per nm.
    pub distribution: Vec<f64>,
    /// Cumulative pore volume, cm3 per material unit.
    pub cumulative_volume: Vec<f64>,
    pub warnings: Vec<String>,
}

/// Pairwise dispersion constants and derived lengths shared by every
/// geometry. The Kirkwood-Muller constants are in J nm6, surface
/// densities converted to nm-2.
struct HkSystem {
    /// Material-adsorbate dispersion constant.
    a_cross: f64,
    /// Adsorbate-adsorbate dispersion constant.
    a_self: f64,
    /// Material surface density, nm-2.
    n_mat: f64,
    /// Adsorbate monolayer density, nm-2.
    n_ads: f64,
    /// Effective pair diameter `(d_mat + d_ads) / 2`, nm.
    d_eff: f64,
    d_mat: f64,
    d_ads: f64,
}

impl HkSystem {
    fn new(mat: &HkMaterialParams, ads: &HkAdsorbateParams) -> Self {
        let a_cross = 6.0 * ELECTRON_REST_ENERGY * mat.polarizability * ads.polarizability
            / (mat.polarizability / mat.magnetic_susceptibility
                + ads.polarizability / ads.magnetic_susceptibility);
        let a_self =
            1.5 * ELECTRON_REST_ENERGY * ads.polarizability * ads.magnetic_susceptibility;
        Self {
            a_cross,
            a_self,
            n_mat: mat.surface_density * 1e-18,
            n_ads: ads.surface_density * 1e-18,
            d_eff: (mat.molecular_diameter + ads.molecular_diameter) / 2.0,
            d_mat: mat.molecular_diameter,
            d_ads: ads.molecular_diameter,
        }
    }

    /// `n_mat A_cross + n_ads A_self`, the aggregated wall constant.
    fn wall_constant(&self) -> f64 {
        self.n_mat * self.a_cross + self.n_ads * self.a_self
    }

    /// Zero-energy distance of the 10-4 wall potential.
    fn sigma(&self) -> f64 {
        (2.0f64 / 5.0).powf(1.0 / 6.0) * self.d_eff
    }

    /// Depth of the single 10-4 wall potential at its minimum, J per
    /// molecule, for the solid-fluid pair.
    fn epsilon_wall(&self) -> f64 {
        let sigma = self.sigma();
        -(3.0 / 10.0) * self.n_mat * self.a_cross / sigma.powi(4)
    }

    /// Depth of the adsorbate-adsorbate layer potential, J per molecule.
    fn epsilon_fluid(&self) -> f64 {
        let sigma = (2.0f64 / 5.0).powf(1.0 / 6.0) * self.d_ads;
        -(3.0 / 10.0) * self.n_ads * self.a_self / sigma.powi(4)
    }

    /// Slit potential, J/mol, for a slit of width `l` between the nuclei
    /// of the two walls.
    fn slit_potential(&self, l: f64) -> f64 {
        let sigma = self.sigma();
        let d0 = self.d_eff;
        if l <= 2.0 * d0 {
            return f64::INFINITY;
        }
        let prefactor = AVOGADRO * self.wall_constant() / (sigma.powi(4) * (l - 2.0 * d0));
        let bracket = sigma.powi(4) / (3.0 * (l - d0).powi(3))
            - sigma.powi(10) / (9.0 * (l - d0).powi(9))
            - sigma.powi(4) / (3.0 * d0.powi(3))
            + sigma.powi(10) / (9.0 * d0.powi(9));
        prefactor * bracket
    }

    /// Saito-Foley cylinder potential, J/mol, for a cylinder of diameter
    /// `l` between wall nuclei.
    fn cylinder_potential(&self, l: f64) -> f64 {
        let r = l / 2.0;
        let d0 = self.d_eff;
        if r <= d0 {
            return f64::INFINITY;
        }
        let x = d0 / r;
        let one_minus = 1.0 - x;
        let terms = sf_terms();
        let n_terms = ((25.0 * l).ceil() as usize).clamp(100, SF_MAX_TERMS);
        let mut series = 0.0;
        for (k, (a_k, b_k)) in terms.iter().take(n_terms).enumerate() {
            let weight = one_minus.powi(2 * k as i32) / (k as f64 + 1.0);
            series += weight * ((21.0 / 32.0) * a_k * x.powi(10) - b_k * x.powi(4));
            if weight.abs() < 1e-18 {
                break;
            }
        }
        0.75 * PI * AVOGADRO * self.wall_constant() / d0.powi(4) * series
    }

    /// Spherical cavity potential, J/mol: the 12-6 pair potential
    /// integrated over the shell and averaged over the accessible volume.
    fn sphere_potential(&self, l: f64) -> f64 {
        let a = l / 2.0;
        let d0 = self.d_eff;
        if a <= d0 {
            return f64::INFINITY;
        }
        // per-area attraction and the repulsion pinning the minimum at d0
        let c_attr = self.wall_constant();
        let c_rep = c_attr * d0.powi(6) / 2.0;
        let shell = |r: f64| -> f64 {
            let r = r.max(1e-9);
            2.0 * PI * a
                * (c_rep / (10.0 * r) * ((a - r).powi(-10) - (a + r).powi(-10))
                    - c_attr / (4.0 * r) * ((a - r).powi(-4) - (a + r).powi(-4)))
        };
        let r_max = a - d0;
        // volume-weighted average over the accessible sphere
        let numerator = simpson(|r| shell(r) * r * r, 0.0, r_max, 200);
        let denominator = r_max.powi(3) / 3.0;
        AVOGADRO * numerator / denominator
    }

    /// Number of adsorbed layers fitting the pore, Rege-Yang counting.
    fn layer_count(&self, geometry: PoreGeometry, l: f64) -> usize {
        let count = match geometry {
            PoreGeometry::Slit => (l - self.d_mat) / self.d_ads,
            PoreGeometry::Cylinder | PoreGeometry::Sphere => {
                ((l - self.d_mat) / self.d_ads - 1.0) / 2.0 + 1.0
            }
        };
        (count.floor() as isize).max(1) as usize
    }

    /// Rege-Yang layer-averaged potential, J/mol. The wall layer sees the
    /// solid, interior layers see neighbouring adsorbate; populations
    /// follow the layer circumference or shell area.
    fn layered_potential(&self, geometry: PoreGeometry, l: f64) -> f64 {
        let d0 = self.d_eff;
        let eps_wall = self.epsilon_wall();
        let eps_fluid = self.epsilon_fluid();
        match geometry {
            PoreGeometry::Slit => {
                if l <= 2.0 * d0 {
                    return f64::INFINITY;
                }
                let m = self.layer_count(geometry, l);
                let avg = if m <= 1 {
                    2.0 * eps_wall
                } else {
                    (2.0 * eps_wall + (m as f64 - 2.0).max(0.0) * eps_fluid) / m as f64
                };
                AVOGADRO * avg
            }
            PoreGeometry::Cylinder | PoreGeometry::Sphere => {
                let radius = l / 2.0;
                if radius <= d0 {
                    return f64::INFINITY;
                }
                let m = self.layer_count(geometry, l);
                let mut weight_sum = 0.0;
                let mut energy_sum = 0.0;
                for k in 0..m {
                    let r_k = (radius - d0 - k as f64 * self.d_ads).max(0.0);
                    let weight = match geometry {
                        PoreGeometry::Cylinder => r_k.max(self.d_ads / 2.0),
                        _ => (r_k * r_k).max(self.d_ads * self.d_ads / 4.0),
                    };
                    let eps = if k == 0 { eps_wall } else { eps_fluid };
                    weight_sum += weight;
                    energy_sum += weight * eps;
                }
                AVOGADRO * energy_sum / weight_sum
            }
        }
    }

    fn potential(&self, geometry: PoreGeometry, layered: bool, l: f64) -> f64 {
        if layered {
            self.layered_potential(geometry, l)
        } else {
            match geometry {
                PoreGeometry::Slit => self.slit_potential(l),
                PoreGeometry::Cylinder => self.cylinder_potential(l),
                PoreGeometry::Sphere => self.sphere_potential(l),
            }
        }
    }
}

/// `a_k, b_k` recursion of the Saito-Foley series, cached once.
fn sf_terms() -> &'static Vec<(f64, f64)> {
    static TERMS: OnceLock<Vec<(f64, f64)>> = OnceLock::new();
    TERMS.get_or_init(|| {
        let mut terms = Vec::with_capacity(SF_MAX_TERMS);
        let mut a = 1.0;
        let mut b = 1.0;
        terms.push((a, b));
        for k in 1..SF_MAX_TERMS {
            let kf = k as f64;
            a *= ((-4.5 - kf) / kf).powi(2);
            b *= ((-1.5 - kf) / kf).powi(2);
            terms.push((a, b));
        }
        terms
    })
}

/// Micropore PSD on the adsorption branch. Adsorbate parameters default
/// to the classical nitrogen set.
pub fn psd_microporous(
    iso: &PointIsotherm,
    method: MicroPsdMethod,
    geometry: PoreGeometry,
    material_params: &HkMaterialParams,
    adsorbate_params: Option<HkAdsorbateParams>,
) -> Result<MicroPsdResult> {
    let (pressure, loading) = super::relative_molar_data(iso, BranchFilter::Ads)?;
    let temperature = iso.temperature_k();
    let molar_mass = iso.adsorbate.molar_mass()?;
    let liquid_density = iso.adsorbate.liquid_density(temperature)?;
    let ads = adsorbate_params.unwrap_or_else(HkAdsorbateParams::nitrogen);
    let system = HkSystem::new(material_params, &ads);
    let rt = GAS_CONSTANT * temperature;

    let points: Vec<(f64, f64)> = pressure
        .iter()
        .zip(&loading)
        .filter(|(p, n)| **p > 0.0 && **p < 1.0 && **n > 0.0)
        .map(|(p, n)| (*p, *n))
        .collect();
    if points.len() < 3 {
        return Err(PhysisorbError::calculation(format!(
            "micropore PSD needs at least 3 points in (0, 1) relative pressure, got {}",
            points.len()
        )));
    }
    let n_max = points.iter().map(|(_, n)| *n).fold(f64::NEG_INFINITY, f64::max) * 1.01;
    let l_stop = 10.0 / geometry.factor();

    let mut warnings = Vec::new();
    let mut widths = Vec::new();
    let mut volumes = Vec::new();
    for (p, n) in &points {
        let mut target = rt * p.ln();
        if method.cheng_yang() {
            let theta = n / n_max;
            target -= rt * (1.0 + (1.0 - theta).ln() / theta);
        }
        let lo = 2.0 * system.d_eff + 1e-4;
        let objective = |l: f64| {
            let phi = system.potential(geometry, method.layered(), l);
            if phi.is_finite() { (phi - target).powi(2) } else { f64::INFINITY }
        };
        let l_solved = match brent_minimize(objective, lo, L_MAX, 1e-10, 200) {
            Ok(l) => l,
            Err(e) => {
                warnings.push(format!(
                    "pore size at p/p0 = {p:.4} could not be solved: {e}"
                ));
                continue;
            }
        };
        widths.push(l_solved - system.d_mat);
        volumes.push(n * molar_mass / liquid_density);
        if l_solved > l_stop {
            break;
        }
    }
    for w in &warnings {
        warn!("psd_microporous: {w}");
    }
    if widths.len() < 2 {
        return Err(PhysisorbError::calculation(
            "micropore PSD solved fewer than 2 pore sizes".to_string(),
        ));
    }

    // dV/dw by finite differences along the solved widths
    let mut distribution = Vec::with_capacity(widths.len() - 1);
    let mut avg_widths = Vec::with_capacity(widths.len() - 1);
    let mut cumulative_volume = Vec::with_capacity(widths.len() - 1);
    for i in 0..widths.len() - 1 {
        let dw = widths[i + 1] - widths[i];
        if dw <= 0.0 {
            continue;
        }
        avg_widths.push((widths[i + 1] + widths[i]) / 2.0);
        distribution.push((volumes[i + 1] - volumes[i]) / dw);
        cumulative_volume.push(volumes[i + 1]);
    }

    Ok(MicroPsdResult {
        widths: avg_widths,
        distribution,
        cumulative_volume,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system() -> HkSystem {
        HkSystem::new(
            &HkMaterialParams::carbon_black(),
            &HkAdsorbateParams::nitrogen(),
        )
    }

    #[test]
    fn slit_potential_is_attractive_and_decays() {
        let s = system();
        // narrow pores bind more strongly than wide ones
        let narrow = s.slit_potential(0.8);
        let wide = s.slit_potential(3.0);
        assert!(narrow < 0.0, "narrow slit potential not attractive: {narrow}");
        assert!(wide < 0.0 && wide > narrow);
        // below physical closure the potential diverges
        assert!(!s.slit_potential(2.0 * s.d_eff).is_finite());
    }

    #[test]
    fn classical_carbon_slit_magnitude() {
        // HK 1983 report potentials of a few kJ/mol for N2 in carbon
        // micropores
        let s = system();
        let phi = s.slit_potential(0.8);
        assert!(
            phi > -20_000.0 && phi < -1_000.0,
            "slit potential out of the expected kJ/mol range: {phi}"
        );
    }

    #[test]
    fn cylinder_series_converges() {
        let s = system();
        let phi = s.cylinder_potential(1.0);
        assert!(phi.is_finite() && phi < 0.0);
        // wider cylinders are shallower
        assert!(s.cylinder_potential(3.0) > phi);
    }

    #[test]
    fn sphere_potential_is_deepest() {
        // at equal size more wall surrounds the molecule in a sphere
        let s = system();
        let slit = s.slit_potential(1.2);
        let sphere = s.sphere_potential(1.2);
        assert!(sphere < slit);
    }

    #[test]
    fn layer_counts_follow_geometry() {
        let s = system();
        // slit: (l - d_mat) / d_ads
        assert_eq!(s.layer_count(PoreGeometry::Slit, 1.0), 2);
        assert_eq!(s.layer_count(PoreGeometry::Cylinder, 1.0), 1);
        // counts never drop below one layer
        assert_eq!(s.layer_count(PoreGeometry::Slit, 0.3), 1);
    }

    #[test]
    fn sf_recursion_matches_direct_evaluation() {
        let terms = sf_terms();
        // a_1 = (-5.5)^2, b_1 = (-2.5)^2
        approx::assert_relative_eq!(terms[1].0, 30.25, max_relative = 1e-12);
        approx::assert_relative_eq!(terms[1].1, 6.25, max_relative = 1e-12);
    }
}
