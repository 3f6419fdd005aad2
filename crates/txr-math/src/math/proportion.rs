//! Exact (Clopper-Pearson) confidence intervals for a binomial proportion.
//!
//! For k successes out of n trials at significance α:
//! - lower = Beta⁻¹(α/2; k, n−k+1), or 0 when k = 0
//! - upper = Beta⁻¹(1−α/2; k+1, n−k), or 1 when k = n
//!
//! With no trials at all (n = 0) nothing is known about the proportion and
//! the interval is the whole unit range.

use serde::{Deserialize, Serialize};

use super::beta::beta_inv_cdf;

/// A two-sided confidence interval for a proportion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProportionInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ProportionInterval {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Interval width (upper - lower).
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Whether `p` lies inside the closed interval.
    pub fn contains(&self, p: f64) -> bool {
        self.lower <= p && p <= self.upper
    }
}

impl From<ProportionInterval> for (f64, f64) {
    fn from(ci: ProportionInterval) -> Self {
        (ci.lower, ci.upper)
    }
}

/// Clopper-Pearson interval for `successes` out of `trials` at level `alpha`.
///
/// Returns a NaN interval when `alpha` is outside (0, 1) or when
/// `successes > trials`.
pub fn clopper_pearson(successes: u64, trials: u64, alpha: f64) -> ProportionInterval {
    if alpha.is_nan() || alpha <= 0.0 || alpha >= 1.0 || successes > trials {
        return ProportionInterval::new(f64::NAN, f64::NAN);
    }
    if trials == 0 {
        return ProportionInterval::new(0.0, 1.0);
    }

    let k = successes as f64;
    let n = trials as f64;
    let tail = alpha / 2.0;

    let lower = if successes == 0 {
        0.0
    } else {
        beta_inv_cdf(tail, k, n - k + 1.0)
    };
    let upper = if successes == trials {
        1.0
    } else {
        beta_inv_cdf(1.0 - tail, k + 1.0, n - k)
    };

    ProportionInterval::new(lower, upper)
}
