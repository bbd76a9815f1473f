//! The point isotherm: an invariant container for a measured adsorption
//! isotherm. Construction validates metadata, unit descriptor and point
//! table; accessors convert on the fly without touching storage; the
//! `convert_*` family mutates storage in place and drops the interpolator
//! cache.

use crate::error::{PhysisorbError, Result};
use crate::isotherm::descriptor::{Branch, BranchFilter, BranchSpec, IsothermUnits};
use crate::isotherm::identity::sha256_json;
use crate::isotherm::interpolator::{FillPolicy, InterpolationKind, Interpolator};
use crate::species::adsorbate::Adsorbate;
use crate::species::material::Material;
use crate::units::loading::{AmountUnit, LoadingBasis, MaterialContext, convert_loading};
use crate::units::material::{MaterialBasis, convert_material};
use crate::units::pressure::{PressureMode, PressureUnit, convert_pressure};
use crate::units::temperature::{TemperatureUnit, convert_temperature};
use serde_json::json;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// Raw point table handed over by a parser.
#[derive(Debug, Clone, Default)]
pub struct IsothermData {
    pub pressure: Vec<f64>,
    pub loading: Vec<f64>,
    pub branch: BranchSpec,
    pub other: HashMap<String, Vec<f64>>,
}

impl IsothermData {
    pub fn new(pressure: Vec<f64>, loading: Vec<f64>) -> Self {
        Self {
            pressure,
            loading,
            branch: BranchSpec::Guess,
            other: HashMap::new(),
        }
    }

    pub fn with_branch(mut self, branch: BranchSpec) -> Self {
        self.branch = branch;
        self
    }

    pub fn with_column(mut self, key: &str, values: Vec<f64>) -> Self {
        self.other.insert(key.to_string(), values);
        self
    }
}

/// Options of a pressure query. `None` fields keep the stored value.
#[derive(Debug, Clone, Copy, Default)]
pub struct PressureQuery {
    pub branch: BranchFilter,
    pub mode: Option<PressureMode>,
    pub unit: Option<PressureUnit>,
    /// Filter rows to this closed interval, in the requested units.
    pub limits: Option<(f64, f64)>,
}

impl PressureQuery {
    pub fn branch(branch: BranchFilter) -> Self {
        Self {
            branch,
            ..Self::default()
        }
    }

    pub fn relative(branch: BranchFilter) -> Self {
        Self {
            branch,
            mode: Some(PressureMode::Relative),
            ..Self::default()
        }
    }
}

/// Options of a loading query. `None` fields keep the stored value.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadingQuery {
    pub branch: BranchFilter,
    pub basis: Option<LoadingBasis>,
    pub unit: Option<AmountUnit>,
    pub material_basis: Option<MaterialBasis>,
    pub material_unit: Option<AmountUnit>,
    /// Filter rows to this closed interval, in the requested units.
    pub limits: Option<(f64, f64)>,
}

impl LoadingQuery {
    pub fn branch(branch: BranchFilter) -> Self {
        Self {
            branch,
            ..Self::default()
        }
    }

    /// mol per stored material unit, the working form of most
    /// characterisation methods.
    pub fn molar(branch: BranchFilter) -> Self {
        Self {
            branch,
            basis: Some(LoadingBasis::Molar),
            unit: Some(AmountUnit::Mole),
            ..Self::default()
        }
    }
}

/// Options of an interpolation query.
#[derive(Debug, Clone, Copy)]
pub struct InterpQuery {
    pub branch: Branch,
    pub kind: InterpolationKind,
    pub fill: FillPolicy,
}

impl Default for InterpQuery {
    fn default() -> Self {
        Self {
            branch: Branch::Adsorption,
            kind: InterpolationKind::Linear,
            fill: FillPolicy::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Direction {
    LoadingFromPressure,
    PressureFromLoading,
}

type CacheKey = (Direction, Branch, InterpolationKind, u8, u64);

#[derive(Debug)]
pub struct PointIsotherm {
    pub material: Material,
    pub adsorbate: Adsorbate,
    temperature: f64,
    units: IsothermUnits,
    pressure: Vec<f64>,
    loading: Vec<f64>,
    branch: Vec<Branch>,
    other: BTreeMap<String, Vec<f64>>,
    cache: RefCell<HashMap<CacheKey, Rc<Interpolator>>>,
}

impl Clone for PointIsotherm {
    fn clone(&self) -> Self {
        Self {
            material: self.material.clone(),
            adsorbate: self.adsorbate.clone(),
            temperature: self.temperature,
            units: self.units.clone(),
            pressure: self.pressure.clone(),
            loading: self.loading.clone(),
            branch: self.branch.clone(),
            other: self.other.clone(),
            cache: RefCell::new(HashMap::new()),
        }
    }
}

/// Branch labels per the splitting rule: the desorption branch starts at
/// the first pressure point strictly below its predecessor; equal
/// pressures inherit the previous label.
fn split_branches(pressure: &[f64]) -> Vec<Branch> {
    let mut labels = Vec::with_capacity(pressure.len());
    let mut current = Branch::Adsorption;
    labels.push(current);
    for i in 1..pressure.len() {
        if pressure[i] < pressure[i - 1] {
            current = Branch::Desorption;
        }
        labels.push(current);
    }
    labels
}

impl PointIsotherm {
    pub fn new(
        material: Material,
        adsorbate: Adsorbate,
        temperature: f64,
        data: IsothermData,
        units: IsothermUnits,
    ) -> Result<Self> {
        if material.name.trim().is_empty() {
            return Err(PhysisorbError::missing("material"));
        }
        if adsorbate.name.trim().is_empty() {
            return Err(PhysisorbError::missing("adsorbate"));
        }
        if !temperature.is_finite() {
            return Err(PhysisorbError::missing("temperature"));
        }
        units.validate()?;

        let n = data.pressure.len();
        if n == 0 {
            return Err(PhysisorbError::ParameterInvalid {
                name: "data".into(),
                reason: "empty point table".into(),
            });
        }
        if data.loading.len() != n {
            return Err(PhysisorbError::ParameterInvalid {
                name: "loading".into(),
                reason: format!("expected {n} rows, got {}", data.loading.len()),
            });
        }
        if data.pressure.iter().any(|v| !v.is_finite())
            || data.loading.iter().any(|v| !v.is_finite())
        {
            return Err(PhysisorbError::ParameterInvalid {
                name: "data".into(),
                reason: "pressure and loading must be finite".into(),
            });
        }
        for (key, col) in &data.other {
            if col.len() != n {
                return Err(PhysisorbError::ParameterInvalid {
                    name: key.clone(),
                    reason: format!("expected {n} rows, got {}", col.len()),
                });
            }
        }

        let branch = match data.branch {
            BranchSpec::Guess => split_branches(&data.pressure),
            BranchSpec::All(b) => vec![b; n],
            BranchSpec::Explicit(labels) => {
                if labels.len() != n {
                    return Err(PhysisorbError::ParameterInvalid {
                        name: "branch".into(),
                        reason: format!("expected {n} labels, got {}", labels.len()),
                    });
                }
                labels
            }
        };

        Ok(Self {
            material,
            adsorbate,
            temperature,
            units,
            pressure: data.pressure,
            loading: data.loading,
            branch,
            other: data.other.into_iter().collect(),
            cache: RefCell::new(HashMap::new()),
        })
    }

    pub fn len(&self) -> usize {
        self.pressure.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pressure.is_empty()
    }

    pub fn units(&self) -> &IsothermUnits {
        &self.units
    }

    /// Stored temperature in the stored unit.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn temperature_k(&self) -> f64 {
        convert_temperature(
            self.temperature,
            self.units.temperature_unit,
            TemperatureUnit::Kelvin,
        )
    }

    pub fn branch_labels(&self) -> &[Branch] {
        &self.branch
    }

    pub fn has_branch(&self, branch: Branch) -> bool {
        self.branch.iter().any(|&b| b == branch)
    }

    fn row_indices(&self, filter: BranchFilter) -> Vec<usize> {
        (0..self.len())
            .filter(|&i| filter.accepts(self.branch[i]))
            .collect()
    }

    /// Pressure column after on-the-fly conversion. Storage is untouched.
    pub fn pressure(&self, q: &PressureQuery) -> Result<Vec<f64>> {
        let rows = self.row_indices(q.branch);
        let raw: Vec<f64> = rows.iter().map(|&i| self.pressure[i]).collect();
        let mode_to = q.mode.unwrap_or(self.units.pressure_mode);
        let unit_to = if mode_to.is_relative() {
            None
        } else if mode_to == self.units.pressure_mode && q.unit.is_none() {
            self.units.pressure_unit
        } else {
            q.unit
        };
        let mut out = convert_pressure(
            &raw,
            self.units.pressure_mode,
            self.units.pressure_unit,
            mode_to,
            unit_to,
            &self.adsorbate,
            self.temperature_k(),
        )?;
        if let Some((lo, hi)) = q.limits {
            out.retain(|&v| v >= lo && v <= hi);
        }
        Ok(out)
    }

    /// Loading column after on-the-fly conversion. Storage is untouched.
    pub fn loading(&self, q: &LoadingQuery) -> Result<Vec<f64>> {
        let rows = self.row_indices(q.branch);
        let raw: Vec<f64> = rows.iter().map(|&i| self.loading[i]).collect();

        // rescale the material denominator first so that fraction bases
        // are formed against the requested material context
        let mat_basis = q.material_basis.unwrap_or(self.units.material_basis);
        let mat_unit = q.material_unit.unwrap_or(self.units.material_unit);
        let rescaled = convert_material(
            &raw,
            self.units.material_basis,
            self.units.material_unit,
            mat_basis,
            mat_unit,
            &self.material,
        )?;

        let basis_to = q.basis.unwrap_or(self.units.loading_basis);
        let unit_to = if basis_to.is_unitless() {
            None
        } else if basis_to == self.units.loading_basis && q.unit.is_none() {
            self.units.loading_unit
        } else {
            q.unit
        };
        let ctx = MaterialContext {
            basis: mat_basis,
            unit: mat_unit,
        };
        let mut out = convert_loading(
            &rescaled,
            self.units.loading_basis,
            self.units.loading_unit,
            basis_to,
            unit_to,
            &self.adsorbate,
            self.temperature_k(),
            &ctx,
        )?;
        if let Some((lo, hi)) = q.limits {
            out.retain(|&v| v >= lo && v <= hi);
        }
        Ok(out)
    }

    /// An auxiliary column restricted to a branch. May contain NaN.
    pub fn other_data(&self, key: &str, branch: BranchFilter) -> Result<Vec<f64>> {
        let col = self.other.get(key).ok_or_else(|| {
            PhysisorbError::missing(format!("isotherm column '{key}'"))
        })?;
        Ok(self
            .row_indices(branch)
            .iter()
            .map(|&i| col[i])
            .collect())
    }

    pub fn other_keys(&self) -> Vec<&str> {
        self.other.keys().map(|k| k.as_str()).collect()
    }

    fn interpolator(&self, direction: Direction, q: &InterpQuery) -> Result<Rc<Interpolator>> {
        let (fk, fv) = q.fill.cache_key();
        let key = (direction, q.branch, q.kind, fk, fv);
        if let Some(found) = self.cache.borrow().get(&key) {
            return Ok(found.clone());
        }
        let filter = match q.branch {
            Branch::Adsorption => BranchFilter::Ads,
            Branch::Desorption => BranchFilter::Des,
        };
        let rows = self.row_indices(filter);
        let p: Vec<f64> = rows.iter().map(|&i| self.pressure[i]).collect();
        let n: Vec<f64> = rows.iter().map(|&i| self.loading[i]).collect();
        let interp = match direction {
            Direction::LoadingFromPressure => Interpolator::new(&p, &n, q.kind, q.fill)?,
            Direction::PressureFromLoading => Interpolator::new(&n, &p, q.kind, q.fill)?,
        };
        let rc = Rc::new(interp);
        self.cache.borrow_mut().insert(key, rc.clone());
        Ok(rc)
    }

    /// Loading at the given pressure, both in stored units.
    pub fn loading_at(&self, pressure: f64, q: &InterpQuery) -> Result<f64> {
        self.interpolator(Direction::LoadingFromPressure, q)?.eval(pressure)
    }

    /// Pressure at the given loading, both in stored units.
    pub fn pressure_at(&self, loading: f64, q: &InterpQuery) -> Result<f64> {
        self.interpolator(Direction::PressureFromLoading, q)?.eval(loading)
    }

    /// Reduced spreading pressure at `pressure` (stored units) by direct
    /// quadrature of n(p)/p over the stored points of the branch.
    ///
    /// Below the first data point a Henry-law segment contributes
    /// `n_0 * p / p_0` (the full segment equals `n_0`); each interior
    /// segment contributes `slope * dp + intercept * ln(p2/p1)` with the
    /// coefficients of linear interpolation; past the last point the fill
    /// policy of the query decides.
    pub fn spreading_pressure_at(&self, pressure: f64, q: &InterpQuery) -> Result<f64> {
        if !(pressure > 0.0) {
            return Err(PhysisorbError::ParameterInvalid {
                name: "pressure".into(),
                reason: format!("spreading pressure needs p > 0, got {pressure}"),
            });
        }
        let filter = match q.branch {
            Branch::Adsorption => BranchFilter::Ads,
            Branch::Desorption => BranchFilter::Des,
        };
        let rows = self.row_indices(filter);
        let mut pts: Vec<(f64, f64)> = rows
            .iter()
            .map(|&i| (self.pressure[i], self.loading[i]))
            .filter(|(p, _)| *p > 0.0)
            .collect();
        pts.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        if pts.len() < 2 {
            return Err(PhysisorbError::calculation(
                "spreading pressure needs at least 2 positive-pressure points".to_string(),
            ));
        }

        let (p0, n0) = pts[0];
        if pressure <= p0 {
            return Ok(n0 * pressure / p0);
        }
        let mut total = n0;
        for w in pts.windows(2) {
            let (p1, n1) = w[0];
            let (p2, n2) = w[1];
            if p2 <= p1 {
                continue;
            }
            let slope = (n2 - n1) / (p2 - p1);
            let intercept = n1 - slope * p1;
            if pressure >= p2 {
                total += slope * (p2 - p1) + intercept * (p2 / p1).ln();
            } else {
                total += slope * (pressure - p1) + intercept * (pressure / p1).ln();
                return Ok(total);
            }
        }
        // past the last measured point
        let (p_last, n_last) = *pts.last().unwrap();
        match q.fill {
            FillPolicy::Extrapolate => {
                let (p1, n1) = pts[pts.len() - 2];
                let slope = (n_last - n1) / (p_last - p1);
                let intercept = n_last - slope * p_last;
                total += slope * (pressure - p_last) + intercept * (pressure / p_last).ln();
                Ok(total)
            }
            FillPolicy::Value(v) => {
                total += v * (pressure / p_last).ln();
                Ok(total)
            }
            FillPolicy::Error => Err(PhysisorbError::calculation(format!(
                "pressure {pressure} beyond the last measured point {p_last} \
                 and extrapolation is disabled"
            ))),
        }
    }

    fn invalidate_cache(&mut self) {
        self.cache.borrow_mut().clear();
    }

    /// In-place pressure conversion: stored values, descriptor and caches
    /// are all updated.
    pub fn convert_pressure(
        &mut self,
        mode_to: PressureMode,
        unit_to: Option<PressureUnit>,
    ) -> Result<()> {
        let new_units = IsothermUnits {
            pressure_mode: mode_to,
            pressure_unit: unit_to,
            ..self.units.clone()
        };
        new_units.validate()?;
        self.pressure = convert_pressure(
            &self.pressure,
            self.units.pressure_mode,
            self.units.pressure_unit,
            mode_to,
            unit_to,
            &self.adsorbate,
            self.temperature_k(),
        )?;
        self.units = new_units;
        self.invalidate_cache();
        Ok(())
    }

    /// In-place loading conversion.
    pub fn convert_loading(
        &mut self,
        basis_to: LoadingBasis,
        unit_to: Option<AmountUnit>,
    ) -> Result<()> {
        let new_units = IsothermUnits {
            loading_basis: basis_to,
            loading_unit: unit_to,
            ..self.units.clone()
        };
        new_units.validate()?;
        let ctx = MaterialContext {
            basis: self.units.material_basis,
            unit: self.units.material_unit,
        };
        self.loading = convert_loading(
            &self.loading,
            self.units.loading_basis,
            self.units.loading_unit,
            basis_to,
            unit_to,
            &self.adsorbate,
            self.temperature_k(),
            &ctx,
        )?;
        self.units = new_units;
        self.invalidate_cache();
        Ok(())
    }

    /// In-place material-denominator conversion.
    pub fn convert_material(
        &mut self,
        basis_to: MaterialBasis,
        unit_to: AmountUnit,
    ) -> Result<()> {
        let new_units = IsothermUnits {
            material_basis: basis_to,
            material_unit: unit_to,
            ..self.units.clone()
        };
        new_units.validate()?;
        self.loading = convert_material(
            &self.loading,
            self.units.material_basis,
            self.units.material_unit,
            basis_to,
            unit_to,
            &self.material,
        )?;
        self.units = new_units;
        self.invalidate_cache();
        Ok(())
    }

    /// In-place temperature unit conversion.
    pub fn convert_temperature(&mut self, unit_to: TemperatureUnit) {
        self.temperature =
            convert_temperature(self.temperature, self.units.temperature_unit, unit_to);
        self.units.temperature_unit = unit_to;
        self.invalidate_cache();
    }

    /// Content-addressed identity over the full canonical serialisation,
    /// metadata and points included.
    pub fn fingerprint(&self) -> String {
        let mat_props: BTreeMap<&String, &f64> = self.material.properties.iter().collect();
        let ads_props: BTreeMap<&String, &f64> = self.adsorbate.properties.iter().collect();
        let value = json!({
            "material": { "name": self.material.name, "properties": mat_props },
            "adsorbate": { "name": self.adsorbate.name, "properties": ads_props },
            "temperature": self.temperature,
            "units": self.units,
            "pressure": self.pressure,
            "loading": self.loading,
            "branch": self.branch,
            "other": self.other,
        });
        sha256_json(&value)
    }
}

impl PartialEq for PointIsotherm {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint() == other.fingerprint()
    }
}
