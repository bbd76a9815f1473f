//! Detection of linear regions in a transformed curve.
//!
//! A point is "linear" when the absolute second difference of y falls
//! below a tolerance that scales with the curve magnitude and the number
//! of points. Consecutive linear points are grouped; groups shorter than
//! three points are discarded.

pub fn find_linear_sections(x: &[f64], y: &[f64]) -> Vec<Vec<usize>> {
    let n = y.len();
    if n < 3 || x.len() != n {
        return Vec::new();
    }

    let y_max = y.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
    if y_max == 0.0 {
        return vec![(0..n).collect()];
    }
    let tol = 1.0e-5 * y_max * (n as f64);

    // second differences on a possibly non-uniform grid
    let mut is_linear = vec![false; n];
    for i in 1..n - 1 {
        let h0 = x[i] - x[i - 1];
        let h1 = x[i + 1] - x[i];
        if h0 == 0.0 || h1 == 0.0 {
            continue;
        }
        let d2 = (y[i + 1] - y[i]) / h1 - (y[i] - y[i - 1]) / h0;
        if d2.abs() < tol {
            is_linear[i] = true;
        }
    }
    // the end points belong to whichever group their neighbour joins
    is_linear[0] = is_linear[1];
    is_linear[n - 1] = is_linear[n - 2];

    let mut sections: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    for (i, &lin) in is_linear.iter().enumerate() {
        if lin {
            current.push(i);
        } else if !current.is_empty() {
            if current.len() >= 3 {
                sections.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
        }
    }
    if current.len() >= 3 {
        sections.push(current);
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_line_is_one_section() {
        let x: Vec<f64> = (0..20).map(|i| i as f64 * 0.1).collect();
        let y: Vec<f64> = x.iter().map(|v| 3.0 * v + 1.0).collect();
        let sections = find_linear_sections(&x, &y);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].len(), 20);
    }

    #[test]
    fn kink_splits_sections() {
        let x: Vec<f64> = (0..21).map(|i| i as f64 * 0.1).collect();
        let y: Vec<f64> = x
            .iter()
            .map(|&v| if v < 1.0 { v } else { 1.0 + 5.0 * (v - 1.0) })
            .collect();
        let sections = find_linear_sections(&x, &y);
        assert!(sections.len() >= 2, "expected the kink to split the curve");
    }

    #[test]
    fn curved_data_yields_nothing() {
        let x: Vec<f64> = (0..20).map(|i| 0.1 + i as f64 * 0.1).collect();
        let y: Vec<f64> = x.iter().map(|v| v * v * 10.0).collect();
        let sections = find_linear_sections(&x, &y);
        assert!(sections.iter().all(|s| s.len() < x.len()));
    }
}
