//! Semantic validation of loaded settings.

use thiserror::Error;

use crate::settings::{ParamRange, Settings};

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),
}

/// Validate every default against its front-end range.
pub fn validate_settings(settings: &Settings) -> ValidationResult<()> {
    let sweep = &settings.sweep;

    check_range("sweep.tpr", &ParamRange::TPR, sweep.tpr)?;
    check_range("sweep.tnr", &ParamRange::TNR, sweep.tnr)?;
    check_range("sweep.prevalence", &ParamRange::PREVALENCE, sweep.prevalence)?;
    check_range("sweep.ntot_min", &ParamRange::NTOT_MIN, sweep.ntot_min as f64)?;
    check_range("sweep.ntot_max", &ParamRange::NTOT_MAX, sweep.ntot_max as f64)?;
    check_range("sweep.alpha", &ParamRange::ALPHA, sweep.alpha)?;

    if sweep.num_points < 2 {
        return Err(ValidationError::InvalidValue {
            field: "sweep.num_points".to_string(),
            message: format!("Must be at least 2, got {}", sweep.num_points),
        });
    }

    if sweep.ntot_max <= sweep.ntot_min {
        return Err(ValidationError::SemanticError(format!(
            "sweep.ntot_max ({}) must be greater than sweep.ntot_min ({})",
            sweep.ntot_max, sweep.ntot_min
        )));
    }

    if settings.simulation.trials == 0 {
        return Err(ValidationError::InvalidValue {
            field: "simulation.trials".to_string(),
            message: "Must be positive".to_string(),
        });
    }

    Ok(())
}

fn check_range(field: &str, range: &ParamRange, value: f64) -> ValidationResult<()> {
    if value.is_nan() || !range.contains(value) {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be in [{}, {}], got {}", range.min, range.max, value),
        });
    }
    Ok(())
}
