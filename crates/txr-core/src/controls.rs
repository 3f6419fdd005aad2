//! Front-end parameter controls.
//!
//! Each control has a range and default ([`ParamRange`]). Out-of-range input
//! is rejected. An inverted sample-size range is corrected instead, and the
//! correction is reported as a warning.

use serde::Serialize;
use txr_common::Result;
use txr_config::{ParamRange, SweepDefaults};

use crate::interval::SweepParams;

/// Gap applied when `ntot_max` has to be raised above `ntot_min`.
pub const NTOT_CORRECTION: u64 = 100;

pub const NTOT_ADJUSTED_WARNING: &str =
    "Maximum sample size must be greater than minimum. Adjusted automatically.";

/// Raw control values as entered by the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlInput {
    pub tpr: f64,
    pub tnr: f64,
    pub prevalence: f64,
    pub ntot_min: u64,
    pub ntot_max: u64,
    pub alpha: f64,
}

impl From<&SweepDefaults> for ControlInput {
    fn from(d: &SweepDefaults) -> Self {
        Self {
            tpr: d.tpr,
            tnr: d.tnr,
            prevalence: d.prevalence,
            ntot_min: d.ntot_min,
            ntot_max: d.ntot_max,
            alpha: d.alpha,
        }
    }
}

/// Validated sweep parameters plus any user-visible notices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedControls {
    pub params: SweepParams,
    pub confidence_level: f64,
    pub warnings: Vec<String>,
}

/// Check every control against its range and build sweep parameters.
pub fn apply_controls(input: ControlInput, num_points: usize) -> Result<AppliedControls> {
    ParamRange::TPR.check(input.tpr)?;
    ParamRange::TNR.check(input.tnr)?;
    ParamRange::PREVALENCE.check(input.prevalence)?;
    ParamRange::NTOT_MIN.check(input.ntot_min as f64)?;
    ParamRange::NTOT_MAX.check(input.ntot_max as f64)?;
    ParamRange::ALPHA.check(input.alpha)?;

    let mut warnings = Vec::new();
    let mut ntot_max = input.ntot_max;
    if ntot_max <= input.ntot_min {
        ntot_max = input.ntot_min + NTOT_CORRECTION;
        tracing::warn!(
            ntot_min = input.ntot_min,
            requested = input.ntot_max,
            adjusted = ntot_max,
            "ntot_max adjusted"
        );
        warnings.push(NTOT_ADJUSTED_WARNING.to_string());
    }

    let params = SweepParams {
        tpr: input.tpr,
        tnr: input.tnr,
        prevalence: input.prevalence,
        ntot_min: input.ntot_min,
        ntot_max,
        alpha: input.alpha,
        num_points,
    };
    Ok(AppliedControls {
        confidence_level: params.confidence_level(),
        params,
        warnings,
    })
}
