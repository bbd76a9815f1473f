//! Statistical adsorbed-layer thickness models, `t(p/p0)` in nm, kept in
//! a name-keyed registry. Reference isotherms can be digitised into the
//! registry after normalisation by their monolayer uptake.

use crate::error::{PhysisorbError, Result};
use crate::isotherm::interpolator::{FillPolicy, InterpolationKind, Interpolator};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

pub type ThicknessFn = Arc<dyn Fn(f64) -> Result<f64> + Send + Sync>;

/// Monolayer thickness of nitrogen at 77 K, nm.
const MONOLAYER_THICKNESS: f64 = 0.354;

static THICKNESS_MODELS: OnceLock<Mutex<HashMap<String, ThicknessFn>>> = OnceLock::new();

fn check_relative(p_rel: f64) -> Result<f64> {
    if p_rel > 0.0 && p_rel < 1.0 {
        Ok(p_rel)
    } else {
        Err(PhysisorbError::calculation(format!(
            "thickness models are defined for 0 < p/p0 < 1, got {p_rel}"
        )))
    }
}

fn halsey(p_rel: f64) -> Result<f64> {
    let p = check_relative(p_rel)?;
    Ok(MONOLAYER_THICKNESS * (-5.0 / p.ln()).powf(1.0 / 3.0))
}

fn harkins_jura(p_rel: f64) -> Result<f64> {
    let p = check_relative(p_rel)?;
    let denominator = 0.034 - p.log10();
    if denominator <= 0.0 {
        return Err(PhysisorbError::calculation(format!(
            "Harkins-Jura thickness is undefined at p/p0 = {p}"
        )));
    }
    Ok((0.1399 / denominator).sqrt())
}

fn registry() -> &'static Mutex<HashMap<String, ThicknessFn>> {
    THICKNESS_MODELS.get_or_init(|| {
        let mut map: HashMap<String, ThicknessFn> = HashMap::new();
        map.insert("halsey".to_string(), Arc::new(halsey));
        map.insert("harkins-jura".to_string(), Arc::new(harkins_jura));
        map.insert("zero".to_string(), Arc::new(|_| Ok(0.0)));
        Mutex::new(map)
    })
}

pub fn get_thickness_model(name: &str) -> Result<ThicknessFn> {
    registry()
        .lock()
        .unwrap()
        .get(&name.trim().to_lowercase())
        .cloned()
        .ok_or_else(|| PhysisorbError::UnknownEnum {
            kind: "thickness model",
            value: name.to_string(),
        })
}

/// Register a thickness model under a name, replacing any previous entry.
pub fn register_thickness_model(name: &str, model: ThicknessFn) {
    registry()
        .lock()
        .unwrap()
        .insert(name.trim().to_lowercase(), model);
}

/// Build a thickness model from a digitised reference isotherm: the
/// loading is normalised by the monolayer uptake, scaled to nm and
/// splined. Queries outside the digitised range fail instead of
/// clamping.
pub fn thickness_from_reference(
    pressure: &[f64],
    loading: &[f64],
    n_monolayer: f64,
) -> Result<ThicknessFn> {
    if !(n_monolayer > 0.0) {
        return Err(PhysisorbError::ParameterInvalid {
            name: "n_monolayer".into(),
            reason: format!("monolayer uptake must be positive, got {n_monolayer}"),
        });
    }
    let thickness: Vec<f64> = loading
        .iter()
        .map(|n| n / n_monolayer * MONOLAYER_THICKNESS)
        .collect();
    let spline = Interpolator::new(
        pressure,
        &thickness,
        InterpolationKind::Cubic,
        FillPolicy::Error,
    )?;
    Ok(Arc::new(move |p| spline.eval(p)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn halsey_at_half_saturation() {
        let t = get_thickness_model("halsey").unwrap();
        // t = 0.354 * (5 / ln 2)^(1/3)
        assert_relative_eq!(
            t(0.5).unwrap(),
            0.354 * (5.0 / 0.5f64.ln().abs()).powf(1.0 / 3.0),
            max_relative = 1e-12
        );
        assert!(t(0.0).is_err());
        assert!(t(1.0).is_err());
    }

    #[test]
    fn harkins_jura_is_increasing() {
        let t = get_thickness_model("harkins-jura").unwrap();
        assert!(t(0.5).unwrap() > t(0.1).unwrap());
    }

    #[test]
    fn unknown_model_is_an_error() {
        assert!(get_thickness_model("no-such-model").is_err());
    }

    #[test]
    fn reference_isotherm_thickness_is_splined() {
        let pressure = vec![0.1, 0.2, 0.4, 0.6, 0.8];
        let loading = vec![1.0, 1.2, 1.5, 1.9, 2.5];
        let t = thickness_from_reference(&pressure, &loading, 1.0).unwrap();
        // at a node: n / n_m * 0.354
        assert_relative_eq!(t(0.4).unwrap(), 1.5 * 0.354, max_relative = 1e-12);
        // no extrapolation past the digitised range
        assert!(t(0.9).is_err());
    }
}
