//! Shapiro-Wilk normality test
//!
//! Royston's approximation (AS R94): polynomial coefficients for the
//! weights and a normalizing transform of `ln(1 - W)` for the p-value.
//! Valid for 3 <= n <= 5000.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use super::StatsError;

const MIN_SAMPLES: usize = 3;
const MAX_SAMPLES: usize = 5000;

const C1: [f64; 6] = [0.0, 0.221_157, -0.147_981, -2.071_19, 4.434_685, -2.706_056];
const C2: [f64; 6] = [0.0, 0.042_981, -0.293_762, -1.752_461, 5.682_633, -3.582_633];
const C3: [f64; 4] = [0.544, -0.399_78, 0.025_054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.778_57, 0.062_767, -0.002_032_2];
const C5: [f64; 4] = [-1.5861, -0.310_82, -0.083_751, 0.003_891_5];
const C6: [f64; 3] = [-0.4803, -0.082_676, 0.003_030_2];
const GAMMA: [f64; 2] = [-2.273, 0.459];

/// `asin(sqrt(3/4))`, the smallest attainable statistic for n = 3.
const N3_W_FLOOR_ASIN: f64 = std::f64::consts::FRAC_PI_3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapiroWilk {
    pub w: f64,
    pub p_value: f64,
}

impl ShapiroWilk {
    pub fn is_normal(&self, alpha: f64) -> bool {
        self.p_value > alpha
    }
}

/// `c[0] + c[1]·x + c[2]·x² + ...`
fn poly(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc.mul_add(x, *c))
}

fn standard_normal() -> Result<Normal, StatsError> {
    Normal::new(0.0, 1.0).map_err(|e| StatsError::Distribution(e.to_string()))
}

/// Weights for the lower half of the order statistics, extremes first.
#[allow(clippy::cast_precision_loss)]
fn weights(n: usize, normal: &Normal) -> Vec<f64> {
    let half = n / 2;
    if n == 3 {
        return vec![std::f64::consts::FRAC_1_SQRT_2];
    }

    let an = n as f64;
    let m: Vec<f64> = (1..=half)
        .map(|i| normal.inverse_cdf((i as f64 - 0.375) / (an + 0.25)))
        .collect();
    let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / an.sqrt();

    let a1 = poly(&C1, rsn) - m[0] / ssumm2;
    let mut a = Vec::with_capacity(half);
    a.push(a1);

    let (first_scaled, fac) = if n > 5 {
        let a2 = -m[1] / ssumm2 + poly(&C2, rsn);
        a.push(a2);
        let fac = ((summ2 - 2.0 * m[0].powi(2) - 2.0 * m[1].powi(2))
            / (1.0 - 2.0 * a1.powi(2) - 2.0 * a2.powi(2)))
        .sqrt();
        (2, fac)
    } else {
        let fac = ((summ2 - 2.0 * m[0].powi(2)) / (1.0 - 2.0 * a1.powi(2))).sqrt();
        (1, fac)
    };
    a.extend(m[first_scaled..].iter().map(|mi| -mi / fac));
    a
}

/// Run the test on one sample. Order of `data` does not matter.
#[allow(clippy::cast_precision_loss)]
pub fn shapiro_wilk(data: &[f64]) -> Result<ShapiroWilk, StatsError> {
    let n = data.len();
    if !(MIN_SAMPLES..=MAX_SAMPLES).contains(&n) {
        return Err(StatsError::SampleSize {
            test: "Shapiro-Wilk",
            got: n,
            min: MIN_SAMPLES,
            max: Some(MAX_SAMPLES),
        });
    }
    if data.iter().any(|v| !v.is_finite()) {
        return Err(StatsError::NonFinite);
    }

    let mut x = data.to_vec();
    x.sort_by(f64::total_cmp);
    if x[n - 1] - x[0] <= f64::EPSILON * x[0].abs().max(1.0) {
        return Err(StatsError::ZeroVariance);
    }

    let normal = standard_normal()?;
    let a = weights(n, &normal);

    let mean = x.iter().sum::<f64>() / n as f64;
    let ssq: f64 = x.iter().map(|v| (v - mean).powi(2)).sum();
    let numerator: f64 = a
        .iter()
        .enumerate()
        .map(|(i, ai)| ai * (x[n - 1 - i] - x[i]))
        .sum();
    let w = (numerator.powi(2) / ssq).min(1.0);

    let p_value = if n == 3 {
        let p = 6.0 / std::f64::consts::PI * (w.sqrt().asin() - N3_W_FLOOR_ASIN);
        p.clamp(0.0, 1.0)
    } else {
        let an = n as f64;
        let y = (1.0 - w).ln();
        let (y, mean_y, sd_y) = if n <= 11 {
            let gamma = poly(&GAMMA, an);
            if y >= gamma {
                return Ok(ShapiroWilk { w, p_value: 0.0 });
            }
            (-(gamma - y).ln(), poly(&C3, an), poly(&C4, an).exp())
        } else {
            let ln_n = an.ln();
            (y, poly(&C5, ln_n), poly(&C6, ln_n).exp())
        };
        1.0 - normal.cdf((y - mean_y) / sd_y)
    };

    Ok(ShapiroWilk { w, p_value })
}
