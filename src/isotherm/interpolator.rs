//! 1-D interpolation over one isotherm branch with an explicit policy
//! for queries outside the data range. Identity of a cached interpolator
//! is `(branch, kind, fill)`; the cache lives on the isotherm and is
//! dropped on any conversion that changes stored values.

use crate::error::{PhysisorbError, Result};
use crate::numerics::pchip::{hermite_eval, pchip_slopes};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterpolationKind {
    Linear,
    Cubic,
}

/// What to do for a query outside the data range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FillPolicy {
    /// Fail with a calculation error.
    Error,
    /// Return the given constant.
    Value(f64),
    /// Extend the boundary segments linearly.
    Extrapolate,
}

impl FillPolicy {
    /// Hashable identity for the interpolator cache.
    pub fn cache_key(&self) -> (u8, u64) {
        match self {
            FillPolicy::Error => (0, 0),
            FillPolicy::Value(v) => (1, v.to_bits()),
            FillPolicy::Extrapolate => (2, 0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Interpolator {
    x: Vec<f64>,
    y: Vec<f64>,
    slopes: Option<Vec<f64>>,
    kind: InterpolationKind,
    fill: FillPolicy,
}

impl Interpolator {
    /// Build from unordered data. Points are sorted by x; duplicate
    /// abscissae are collapsed to their mean ordinate.
    pub fn new(x: &[f64], y: &[f64], kind: InterpolationKind, fill: FillPolicy) -> Result<Self> {
        if x.len() != y.len() {
            return Err(PhysisorbError::ParameterInvalid {
                name: "y".into(),
                reason: format!("length mismatch ({} vs {})", x.len(), y.len()),
            });
        }
        let mut pairs: Vec<(f64, f64)> = x.iter().cloned().zip(y.iter().cloned()).collect();
        pairs.retain(|(a, b)| a.is_finite() && b.is_finite());
        pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

        let mut xs: Vec<f64> = Vec::with_capacity(pairs.len());
        let mut ys: Vec<f64> = Vec::with_capacity(pairs.len());
        let mut i = 0;
        while i < pairs.len() {
            let mut j = i + 1;
            let mut acc = pairs[i].1;
            while j < pairs.len() && pairs[j].0 == pairs[i].0 {
                acc += pairs[j].1;
                j += 1;
            }
            xs.push(pairs[i].0);
            ys.push(acc / (j - i) as f64);
            i = j;
        }
        if xs.len() < 2 {
            return Err(PhysisorbError::calculation(format!(
                "interpolation needs at least 2 distinct points, got {}",
                xs.len()
            )));
        }
        let slopes = match kind {
            InterpolationKind::Linear => None,
            InterpolationKind::Cubic => Some(pchip_slopes(&xs, &ys)),
        };
        Ok(Self {
            x: xs,
            y: ys,
            slopes,
            kind,
            fill,
        })
    }

    pub fn x_range(&self) -> (f64, f64) {
        (self.x[0], *self.x.last().unwrap())
    }

    pub fn eval(&self, q: f64) -> Result<f64> {
        if q.is_nan() {
            return Ok(f64::NAN);
        }
        let n = self.x.len();
        if q < self.x[0] || q > self.x[n - 1] {
            return match self.fill {
                FillPolicy::Error => Err(PhysisorbError::calculation(format!(
                    "query {q} outside interpolation range [{}, {}]",
                    self.x[0],
                    self.x[n - 1]
                ))),
                FillPolicy::Value(v) => Ok(v),
                FillPolicy::Extrapolate => {
                    let (i0, i1) = if q < self.x[0] { (0, 1) } else { (n - 2, n - 1) };
                    let slope = (self.y[i1] - self.y[i0]) / (self.x[i1] - self.x[i0]);
                    Ok(self.y[i0] + slope * (q - self.x[i0]))
                }
            };
        }

        let seg = match self.x.binary_search_by(|v| v.partial_cmp(&q).unwrap()) {
            Ok(i) => return Ok(self.y[i]),
            Err(i) => i - 1,
        };
        match self.kind {
            InterpolationKind::Linear => {
                let t = (q - self.x[seg]) / (self.x[seg + 1] - self.x[seg]);
                Ok(self.y[seg] + t * (self.y[seg + 1] - self.y[seg]))
            }
            InterpolationKind::Cubic => {
                let d = self.slopes.as_ref().unwrap();
                Ok(hermite_eval(
                    self.x[seg],
                    self.x[seg + 1],
                    self.y[seg],
                    self.y[seg + 1],
                    d[seg],
                    d[seg + 1],
                    q,
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn linear_between_nodes() {
        let it = Interpolator::new(
            &[0.0, 1.0, 2.0],
            &[0.0, 2.0, 4.0],
            InterpolationKind::Linear,
            FillPolicy::Error,
        )
        .unwrap();
        assert_relative_eq!(it.eval(0.5).unwrap(), 1.0);
        assert!(it.eval(3.0).is_err());
    }

    #[test]
    fn fill_policies() {
        let it = Interpolator::new(
            &[0.0, 1.0],
            &[0.0, 1.0],
            InterpolationKind::Linear,
            FillPolicy::Value(-1.0),
        )
        .unwrap();
        assert_relative_eq!(it.eval(2.0).unwrap(), -1.0);

        let it = Interpolator::new(
            &[0.0, 1.0],
            &[0.0, 1.0],
            InterpolationKind::Linear,
            FillPolicy::Extrapolate,
        )
        .unwrap();
        assert_relative_eq!(it.eval(2.0).unwrap(), 2.0);
    }

    #[test]
    fn descending_input_is_sorted() {
        let it = Interpolator::new(
            &[2.0, 1.0, 0.0],
            &[4.0, 2.0, 0.0],
            InterpolationKind::Linear,
            FillPolicy::Error,
        )
        .unwrap();
        assert_relative_eq!(it.eval(1.5).unwrap(), 3.0);
    }
}
