//! Ordinary least squares polynomial fitting.

use log::warn;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::stats::descriptive::sample_std;

const SINGULAR_EPSILON: f64 = 1e-12;

/// A fitted polynomial trend
///
/// The fit is computed on a centred and scaled abscissa
/// `t = (x - shift) / scale` to keep the normal equations well conditioned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendModel {
    degree: usize,
    shift: f64,
    scale: f64,
    /// Coefficients in the scaled abscissa, ascending powers
    scaled: Vec<f64>,
    /// Sample standard deviation of the residuals
    residual_std: f64,
}

impl TrendModel {
    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn residual_std(&self) -> f64 {
        self.residual_std
    }

    /// Evaluates the polynomial at `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        let t = (x - self.shift) / self.scale;
        self.scaled.iter().rev().fold(0.0, |acc, c| acc * t + c)
    }

    /// Coefficients in the original abscissa, ascending powers
    /// (`c[0] + c[1] x + c[2] x^2`).
    pub fn coefficients(&self) -> Vec<f64> {
        let mut out = vec![0.0; self.scaled.len()];
        for (k, a) in self.scaled.iter().enumerate() {
            // a * ((x - m) / s)^k expanded binomially
            let factor = a / self.scale.powi(k as i32);
            for (j, slot) in out.iter_mut().enumerate().take(k + 1) {
                *slot += factor * binomial(k, j) as f64 * (-self.shift).powi((k - j) as i32);
            }
        }
        out
    }
}

fn binomial(n: usize, k: usize) -> u64 {
    (0..k).fold(1u64, |acc, i| acc * (n - i) as u64 / (i + 1) as u64)
}

/// Fits a polynomial of `degree` to the points by least squares.
///
/// When the normal equations are singular (too few distinct abscissae) the
/// degree is lowered until a fit exists.
pub(crate) fn fit(xs: &[f64], ys: &[f64], degree: usize) -> Result<TrendModel> {
    if xs.len() != ys.len() {
        return Err(Error::Data(format!(
            "abscissa length ({}) and value length ({}) differ",
            xs.len(),
            ys.len()
        )));
    }
    if xs.is_empty() {
        return Err(Error::InvalidInput("cannot fit a trend to zero points".into()));
    }

    let n = xs.len() as f64;
    let shift = xs.iter().sum::<f64>() / n;
    let spread = xs.iter().map(|x| (x - shift).abs()).fold(0.0, f64::max);
    let scale = if spread > 0.0 { spread } else { 1.0 };
    let ts: Vec<f64> = xs.iter().map(|x| (x - shift) / scale).collect();

    let mut degree = degree;
    let scaled = loop {
        match solve_normal_equations(&ts, ys, degree) {
            Some(c) => break c,
            None if degree > 0 => {
                warn!("trend fit of degree {} is singular, lowering degree", degree);
                degree -= 1;
            }
            None => {
                return Err(Error::Data("cannot fit a constant trend".into()));
            }
        }
    };

    let mut model = TrendModel {
        degree,
        shift,
        scale,
        scaled,
        residual_std: 0.0,
    };
    let residuals: Vec<f64> = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| y - model.evaluate(*x))
        .collect();
    let mean = residuals.iter().sum::<f64>() / n;
    model.residual_std = sample_std(&residuals, mean).unwrap_or(0.0);
    Ok(model)
}

/// Solves (X^T X) b = X^T y for a Vandermonde X by Gauss-Jordan elimination
/// with partial pivoting. Returns None for a singular system.
fn solve_normal_equations(ts: &[f64], ys: &[f64], degree: usize) -> Option<Vec<f64>> {
    let m = degree + 1;

    // power sums: sums[k] = Σ t^k for k in 0..=2*degree
    let mut sums = vec![0.0; 2 * degree + 1];
    let mut rhs = vec![0.0; m];
    for (t, y) in ts.iter().zip(ys) {
        let mut p = 1.0;
        for (k, s) in sums.iter_mut().enumerate() {
            *s += p;
            if k < m {
                rhs[k] += p * y;
            }
            p *= t;
        }
    }

    // augmented matrix [A | b]
    let mut aug: Vec<Vec<f64>> = (0..m)
        .map(|i| {
            let mut row: Vec<f64> = (0..m).map(|j| sums[i + j]).collect();
            row.push(rhs[i]);
            row
        })
        .collect();

    for i in 0..m {
        let mut max_row = i;
        let mut max_val = aug[i][i].abs();
        for j in i + 1..m {
            if aug[j][i].abs() > max_val {
                max_row = j;
                max_val = aug[j][i].abs();
            }
        }
        if max_val < SINGULAR_EPSILON {
            return None;
        }
        aug.swap(i, max_row);

        let pivot = aug[i][i];
        for v in aug[i].iter_mut() {
            *v /= pivot;
        }
        for j in 0..m {
            if j != i {
                let factor = aug[j][i];
                if factor != 0.0 {
                    for k in 0..=m {
                        aug[j][k] -= factor * aug[i][k];
                    }
                }
            }
        }
    }

    Some(aug.into_iter().map(|row| row[m]).collect())
}
