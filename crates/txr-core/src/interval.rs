//! Exact binomial confidence intervals for TPR and TNR.
//!
//! A rate `r` measured on `n` samples is treated as `k = round(n·r)`
//! successes out of `n` trials, and the Clopper-Pearson interval of `k/n`
//! is reported. The swept variant repeats this over a linearly spaced range
//! of total sample sizes, deriving the class split from prevalence.

use serde::{Deserialize, Serialize};
use txr_common::{Error, Result};
use txr_math::{clopper_pearson, ProportionInterval};

/// Check that a rate lies in `[0, 1]`.
pub fn check_rate(name: &str, value: f64) -> Result<f64> {
    if value.is_nan() || !(0.0..=1.0).contains(&value) {
        return Err(Error::OutOfRange {
            name: name.to_string(),
            value,
            min: 0.0,
            max: 1.0,
        });
    }
    Ok(value)
}

fn check_alpha(alpha: f64) -> Result<f64> {
    if alpha.is_nan() || alpha <= 0.0 || alpha >= 1.0 {
        return Err(Error::OutOfRange {
            name: "alpha".to_string(),
            value: alpha,
            min: 0.0,
            max: 1.0,
        });
    }
    Ok(alpha)
}

/// How the positive/negative class sizes are given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SampleCounts {
    /// Class sizes given directly.
    Explicit { n_pos: u64, n_neg: u64 },
    /// Class sizes derived from prevalence and total.
    Prevalence { prevalence: f64, n_total: u64 },
}

impl SampleCounts {
    /// Pick a parameterization from optional inputs.
    ///
    /// A complete `(n_pos, n_neg)` pair wins. Otherwise both `prevalence`
    /// and `n_total` must be present.
    pub fn resolve(
        n_pos: Option<u64>,
        n_neg: Option<u64>,
        prevalence: Option<f64>,
        n_total: Option<u64>,
    ) -> Result<Self> {
        if let (Some(n_pos), Some(n_neg)) = (n_pos, n_neg) {
            return Ok(SampleCounts::Explicit { n_pos, n_neg });
        }
        match (prevalence, n_total) {
            (Some(prevalence), Some(n_total)) => Ok(SampleCounts::Prevalence {
                prevalence,
                n_total,
            }),
            _ => Err(Error::invalid_argument(
                "provide either both n_pos and n_neg, or both prevalence and n_total",
            )),
        }
    }

    /// Resolve to `(n_pos, n_neg)`.
    ///
    /// With prevalence, `n_pos = floor(prevalence·n_total)` and the
    /// remainder is negative.
    pub fn split(&self) -> Result<(u64, u64)> {
        match *self {
            SampleCounts::Explicit { n_pos, n_neg } => Ok((n_pos, n_neg)),
            SampleCounts::Prevalence {
                prevalence,
                n_total,
            } => {
                check_rate("prevalence", prevalence)?;
                let n_pos = ((prevalence * n_total as f64).floor() as u64).min(n_total);
                Ok((n_pos, n_total - n_pos))
            }
        }
    }
}

/// Number of successes observed at `rate` out of `n`.
///
/// Halves round to even.
pub fn observed_successes(rate: f64, n: u64) -> u64 {
    ((n as f64 * rate).round_ties_even() as u64).min(n)
}

/// Point estimate for TPR and TNR.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TxrInterval {
    pub tpr: ProportionInterval,
    pub tnr: ProportionInterval,
    pub n_pos: u64,
    pub n_neg: u64,
}

/// Clopper-Pearson intervals for TPR (on the positives) and TNR (on the
/// negatives) at significance `alpha`.
pub fn confidence_interval_txr(
    tpr: f64,
    tnr: f64,
    counts: SampleCounts,
    alpha: f64,
) -> Result<TxrInterval> {
    check_rate("tpr", tpr)?;
    check_rate("tnr", tnr)?;
    check_alpha(alpha)?;
    let (n_pos, n_neg) = counts.split()?;

    let interval = TxrInterval {
        tpr: exact_interval("tpr", observed_successes(tpr, n_pos), n_pos, alpha)?,
        tnr: exact_interval("tnr", observed_successes(tnr, n_neg), n_neg, alpha)?,
        n_pos,
        n_neg,
    };
    tracing::trace!(n_pos, n_neg, alpha, "computed txr interval");
    Ok(interval)
}

/// Clopper-Pearson bounds, rejecting anything non-finite.
fn exact_interval(name: &str, successes: u64, trials: u64, alpha: f64) -> Result<ProportionInterval> {
    let interval = clopper_pearson(successes, trials, alpha);
    if !interval.lower.is_finite() || !interval.upper.is_finite() {
        return Err(Error::Numerical(format!(
            "{name} interval for {successes}/{trials} at alpha={alpha} is not finite"
        )));
    }
    Ok(interval)
}

/// Inputs of a sample-size sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepParams {
    pub tpr: f64,
    pub tnr: f64,
    pub prevalence: f64,
    pub ntot_min: u64,
    pub ntot_max: u64,
    pub alpha: f64,
    pub num_points: usize,
}

impl SweepParams {
    /// Confidence level in percent, `(1 - alpha)·100`.
    pub fn confidence_level(&self) -> f64 {
        (1.0 - self.alpha) * 100.0
    }
}

impl From<&txr_config::SweepDefaults> for SweepParams {
    fn from(d: &txr_config::SweepDefaults) -> Self {
        Self {
            tpr: d.tpr,
            tnr: d.tnr,
            prevalence: d.prevalence,
            ntot_min: d.ntot_min,
            ntot_max: d.ntot_max,
            alpha: d.alpha,
            num_points: d.num_points,
        }
    }
}

/// `num_points` evenly spaced sizes from `min` to `max`, rounded to the
/// nearest integer. Both endpoints are exact.
pub fn linspace_sizes(min: u64, max: u64, num_points: usize) -> Result<Vec<u64>> {
    if num_points < 2 {
        return Err(Error::invalid_argument(format!(
            "num_points must be at least 2, got {num_points}"
        )));
    }
    if min > max {
        return Err(Error::invalid_argument(format!(
            "ntot_min ({min}) must not exceed ntot_max ({max})"
        )));
    }

    let last = num_points - 1;
    let span = (max - min) as f64;
    let sizes = (0..num_points)
        .map(|i| {
            if i == last {
                max
            } else {
                min + (span * i as f64 / last as f64).round() as u64
            }
        })
        .collect();
    Ok(sizes)
}

/// Intervals over a range of total sample sizes.
///
/// All vectors are index-aligned with `n_total`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxrSweep {
    pub n_total: Vec<u64>,
    pub n_pos: Vec<u64>,
    pub n_neg: Vec<u64>,
    pub tpr_lower: Vec<f64>,
    pub tpr_upper: Vec<f64>,
    pub tnr_lower: Vec<f64>,
    pub tnr_upper: Vec<f64>,
}

impl TxrSweep {
    pub fn len(&self) -> usize {
        self.n_total.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_total.is_empty()
    }

    pub fn tpr_width(&self) -> Vec<f64> {
        widths(&self.tpr_lower, &self.tpr_upper)
    }

    pub fn tnr_width(&self) -> Vec<f64> {
        widths(&self.tnr_lower, &self.tnr_upper)
    }

    /// Interval pair at one sweep index.
    pub fn point(&self, i: usize) -> Option<TxrInterval> {
        Some(TxrInterval {
            tpr: ProportionInterval::new(*self.tpr_lower.get(i)?, *self.tpr_upper.get(i)?),
            tnr: ProportionInterval::new(*self.tnr_lower.get(i)?, *self.tnr_upper.get(i)?),
            n_pos: *self.n_pos.get(i)?,
            n_neg: *self.n_neg.get(i)?,
        })
    }
}

fn widths(lower: &[f64], upper: &[f64]) -> Vec<f64> {
    lower.iter().zip(upper).map(|(lo, hi)| hi - lo).collect()
}

/// Evaluate [`confidence_interval_txr`] at every size of the sweep.
pub fn confidence_interval_txr_sweep(params: &SweepParams) -> Result<TxrSweep> {
    check_rate("prevalence", params.prevalence)?;
    let sizes = linspace_sizes(params.ntot_min, params.ntot_max, params.num_points)?;

    let mut sweep = TxrSweep {
        n_total: Vec::with_capacity(sizes.len()),
        n_pos: Vec::with_capacity(sizes.len()),
        n_neg: Vec::with_capacity(sizes.len()),
        tpr_lower: Vec::with_capacity(sizes.len()),
        tpr_upper: Vec::with_capacity(sizes.len()),
        tnr_lower: Vec::with_capacity(sizes.len()),
        tnr_upper: Vec::with_capacity(sizes.len()),
    };

    for n_total in sizes {
        let counts = SampleCounts::Prevalence {
            prevalence: params.prevalence,
            n_total,
        };
        let point = confidence_interval_txr(params.tpr, params.tnr, counts, params.alpha)?;
        sweep.n_total.push(n_total);
        sweep.n_pos.push(point.n_pos);
        sweep.n_neg.push(point.n_neg);
        sweep.tpr_lower.push(point.tpr.lower);
        sweep.tpr_upper.push(point.tpr.upper);
        sweep.tnr_lower.push(point.tnr.lower);
        sweep.tnr_upper.push(point.tnr.upper);
    }

    tracing::debug!(
        points = sweep.len(),
        ntot_min = params.ntot_min,
        ntot_max = params.ntot_max,
        prevalence = params.prevalence,
        "computed confidence interval sweep"
    );
    Ok(sweep)
}
