use std::f64::consts::{PI, SQRT_2};

/// Normal distribution restricted to `[lower, upper]` and renormalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TruncatedNormal {
    mean: f64,
    sigma: f64,
    lower: f64,
    upper: f64,
    mass: f64,
}

impl TruncatedNormal {
    /// Returns `None` when `sigma` is not positive, the bounds are empty, or
    /// the interval carries no probability mass at `f64` precision.
    pub fn new(mean: f64, sigma: f64, lower: f64, upper: f64) -> Option<Self> {
        if !(sigma > 0.0 && lower < upper && mean.is_finite() && sigma.is_finite()) {
            return None;
        }
        let mass = std_normal_cdf((upper - mean) / sigma) - std_normal_cdf((lower - mean) / sigma);
        if mass <= f64::EPSILON {
            return None;
        }
        Some(Self {
            mean,
            sigma,
            lower,
            upper,
            mass,
        })
    }

    pub fn pdf(&self, x: f64) -> f64 {
        if x < self.lower || x > self.upper {
            return 0.0;
        }
        let z = (x - self.mean) / self.sigma;
        (-0.5 * z * z).exp() / ((2.0 * PI).sqrt() * self.sigma * self.mass)
    }
}

/// Standard normal cumulative distribution.
pub fn std_normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / SQRT_2))
}

/// Abramowitz and Stegun 7.1.26, absolute error below 1.5e-7.
pub fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - (((((A5 * t + A4) * t) + A3) * t + A2) * t + A1) * t * (-x * x).exp();
    sign * y
}
