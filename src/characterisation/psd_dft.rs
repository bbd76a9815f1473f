//! Pore size distribution by fitting a DFT kernel: the measured isotherm
//! is decomposed into a non-negative combination of theoretical
//! single-pore isotherms read from a CSV kernel file.

use crate::error::{PhysisorbError, Result};
use crate::isotherm::descriptor::BranchFilter;
use crate::isotherm::interpolator::{FillPolicy, InterpolationKind, Interpolator};
use crate::isotherm::point_isotherm::PointIsotherm;
use crate::numerics::bspline::bspline_smooth;
use crate::numerics::nnls::nnls;
use log::info;
use nalgebra::{DMatrix, DVector};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

/// A DFT kernel: per pore size, the theoretical loading as a function of
/// relative pressure. Columns are interpolated at query pressures.
#[derive(Debug)]
pub struct DftKernel {
    widths: Vec<f64>,
    columns: Vec<Interpolator>,
}

static KERNEL_CACHE: OnceLock<Mutex<HashMap<PathBuf, Arc<DftKernel>>>> = OnceLock::new();

impl DftKernel {
    /// Parse a kernel CSV: first column is pressure, each further column
    /// is headed by its pore width in nm.
    pub fn from_csv(path: &Path) -> Result<Arc<Self>> {
        let cache = KERNEL_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
        if let Some(found) = cache.lock().unwrap().get(path) {
            return Ok(found.clone());
        }

        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| PhysisorbError::Parsing(format!("cannot open kernel file: {e}")))?;
        let headers = reader
            .headers()
            .map_err(|e| PhysisorbError::Parsing(format!("kernel file has no header: {e}")))?
            .clone();
        let widths: Vec<f64> = headers
            .iter()
            .skip(1)
            .map(|h| {
                h.trim().parse::<f64>().map_err(|_| {
                    PhysisorbError::Parsing(format!("kernel column header '{h}' is not a width"))
                })
            })
            .collect::<Result<_>>()?;
        if widths.len() < 2 {
            return Err(PhysisorbError::Parsing(
                "kernel file needs at least 2 pore size columns".to_string(),
            ));
        }

        let mut pressures = Vec::new();
        let mut table: Vec<Vec<f64>> = vec![Vec::new(); widths.len()];
        for record in reader.records() {
            let record = record
                .map_err(|e| PhysisorbError::Parsing(format!("bad kernel row: {e}")))?;
            if record.len() != widths.len() + 1 {
                return Err(PhysisorbError::Parsing(format!(
                    "kernel row has {} fields, expected {}",
                    record.len(),
                    widths.len() + 1
                )));
            }
            let mut fields = record.iter().map(|f| {
                f.trim().parse::<f64>().map_err(|_| {
                    PhysisorbError::Parsing(format!("kernel value '{f}' is not a number"))
                })
            });
            pressures.push(fields.next().unwrap()?);
            for column in table.iter_mut() {
                column.push(fields.next().unwrap()?);
            }
        }

        let columns: Vec<Interpolator> = table
            .iter()
            .map(|column| {
                Interpolator::new(&pressures, column, InterpolationKind::Linear, FillPolicy::Error)
            })
            .collect::<Result<_>>()?;

        let kernel = Arc::new(Self { widths, columns });
        cache
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), kernel.clone());
        Ok(kernel)
    }

    pub fn widths(&self) -> &[f64] {
        &self.widths
    }

    /// The kernel matrix at the given pressures: one row per pressure,
    /// one column per pore size. Fails when the kernel does not cover a
    /// pressure.
    fn matrix_at(&self, pressures: &[f64]) -> Result<DMatrix<f64>> {
        let mut matrix = DMatrix::zeros(pressures.len(), self.columns.len());
        for (i, p) in pressures.iter().enumerate() {
            for (j, column) in self.columns.iter().enumerate() {
                matrix[(i, j)] = column.eval(*p).map_err(|e| {
                    PhysisorbError::calculation(format!(
                        "kernel does not cover measured pressure {p}: {e}"
                    ))
                })?;
            }
        }
        Ok(matrix)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DftPsdResult {
    /// Kernel pore widths, nm.
    pub widths: Vec<f64>,
    /// Differential distribution dV/dw per kernel bin.
    pub distribution: Vec<f64>,
    /// Cumulative pore volume over ascending widths.
    pub cumulative_volume: Vec<f64>,
    /// Kernel reconstruction of the measured loading, for residual
    /// inspection.
    pub reconstructed_loading: Vec<f64>,
    pub warnings: Vec<String>,
}

/// Fit a DFT kernel to the adsorption branch. `smoothing` is the degree
/// of an optional b-spline applied to the distribution.
pub fn psd_dft(
    iso: &PointIsotherm,
    kernel_path: &Path,
    smoothing: Option<usize>,
) -> Result<DftPsdResult> {
    let kernel = DftKernel::from_csv(kernel_path)?;
    let (pressure, loading) = super::relative_molar_data(iso, BranchFilter::Ads)?;

    let matrix = kernel.matrix_at(&pressure)?;
    let observed = DVector::from_vec(loading);
    let weights = nnls(&matrix, &observed, 3 * kernel.widths().len())?;
    let reconstructed = &matrix * &weights;
    let residual = (&reconstructed - &observed).norm();
    info!(
        "psd_dft: kernel '{}' fitted with residual {residual:.4e}",
        kernel_path.display()
    );

    // bin widths from midpoints between kernel sizes
    let widths = kernel.widths().to_vec();
    let k = widths.len();
    let mut bin = Vec::with_capacity(k);
    for j in 0..k {
        let lo = if j == 0 { widths[0] } else { (widths[j - 1] + widths[j]) / 2.0 };
        let hi = if j == k - 1 {
            widths[k - 1]
        } else {
            (widths[j] + widths[j + 1]) / 2.0
        };
        bin.push((hi - lo).max(f64::MIN_POSITIVE));
    }
    let mut distribution: Vec<f64> = (0..k).map(|j| weights[j] / bin[j]).collect();

    let mut warnings = Vec::new();
    if let Some(degree) = smoothing {
        match bspline_smooth(&widths, &distribution, degree) {
            Ok(smooth) => distribution = smooth,
            Err(e) => warnings.push(format!("distribution smoothing skipped: {e}")),
        }
    }

    let mut cumulative = 0.0;
    let cumulative_volume = (0..k)
        .map(|j| {
            cumulative += weights[j];
            cumulative
        })
        .collect();

    Ok(DftPsdResult {
        widths,
        distribution,
        cumulative_volume,
        reconstructed_loading: reconstructed.iter().cloned().collect(),
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
    use std::io::Write;

    /// Two-pore synthetic kernel: Langmuir uptake with size-dependent
    /// affinity.
    fn kernel_loading(width: f64, p: f64) -> f64 {
        let k = 100.0 / width;
        k * p / (1.0 + k * p)
    }

    fn write_kernel(dir: &std::path::Path) -> PathBuf {
        let path = dir.join("kernel.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "pressure,1.0,2.0").unwrap();
        for i in 1..=40 {
            let p = 0.02 * i as f64;
            writeln!(
                file,
                "{p},{},{}",
                kernel_loading(1.0, p),
                kernel_loading(2.0, p)
            )
            .unwrap();
        }
        path
    }

    #[test]
    fn recovers_known_pore_mixture() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_kernel(dir.path());

        // sample = 0.3 * pore(1nm) + 0.7 * pore(2nm), loading in mol
        let pressure: Vec<f64> = (2..=35).map(|i| 0.02 * i as f64).collect();
        let loading: Vec<f64> = pressure
            .iter()
            .map(|p| (0.3 * kernel_loading(1.0, *p) + 0.7 * kernel_loading(2.0, *p)) * 1000.0)
            .collect();
        let iso = PointIsotherm::new(
            Material::new("carbon"),
            find_adsorbate("nitrogen").unwrap(),
            77.355,
            IsothermData::new(pressure, loading),
            IsothermUnits {
                pressure_mode: PressureMode::Relative,
                pressure_unit: None,
                ..IsothermUnits::default()
            },
        )
        .unwrap();

        let result = psd_dft(&iso, &path, None).unwrap();
        assert_eq!(result.widths, vec![1.0, 2.0]);
        assert_relative_eq!(
            result.cumulative_volume[1],
            1.0,
            max_relative = 1e-6
        );
        // distribution weights recover the mixture
        let w1 = result.distribution[0] * (result.widths[1] - result.widths[0]) / 2.0;
        assert_relative_eq!(w1, 0.3, max_relative = 1e-6);
    }

    #[test]
    fn uncovered_pressure_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_kernel(dir.path());
        let pressure = vec![0.001, 0.9, 0.95];
        let loading = vec![0.1, 1.0, 1.1];
        let iso = PointIsotherm::new(
            Material::new("carbon"),
            find_adsorbate("nitrogen").unwrap(),
            77.355,
            IsothermData::new(pressure, loading),
            IsothermUnits {
                pressure_mode: PressureMode::Relative,
                pressure_unit: None,
                ..IsothermUnits::default()
            },
        )
        .unwrap();
        assert!(psd_dft(&iso, &path, None).is_err());
    }
}
