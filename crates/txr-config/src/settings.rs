//! Typed settings for config.toml.
//!
//! ```toml
//! [sweep]
//! tpr = 0.8
//! tnr = 0.8
//! prevalence = 0.5
//! ntot_min = 100
//! ntot_max = 1000
//! alpha = 0.05
//! num_points = 10
//!
//! [simulation]
//! trials = 10000
//! layout = "01"
//! seed = 42
//! ```
//!
//! Every field is optional; missing fields fall back to the built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use txr_common::MatrixLayout;

use crate::resolve::{resolve_config, ConfigSource};
use crate::validate::{validate_settings, ValidationError};

/// Range, default and step of one front-end control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamRange {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

impl ParamRange {
    pub const TPR: ParamRange = ParamRange {
        name: "tpr",
        min: 0.0,
        max: 1.0,
        default: 0.8,
        step: 0.01,
    };
    pub const TNR: ParamRange = ParamRange {
        name: "tnr",
        min: 0.0,
        max: 1.0,
        default: 0.8,
        step: 0.01,
    };
    pub const PREVALENCE: ParamRange = ParamRange {
        name: "prevalence",
        min: 0.01,
        max: 0.99,
        default: 0.5,
        step: 0.01,
    };
    pub const NTOT_MIN: ParamRange = ParamRange {
        name: "ntot_min",
        min: 10.0,
        max: 1000.0,
        default: 100.0,
        step: 10.0,
    };
    pub const NTOT_MAX: ParamRange = ParamRange {
        name: "ntot_max",
        min: 100.0,
        max: 10000.0,
        default: 1000.0,
        step: 100.0,
    };
    pub const ALPHA: ParamRange = ParamRange {
        name: "alpha",
        min: 0.01,
        max: 0.2,
        default: 0.05,
        step: 0.01,
    };

    /// All front-end controls, in display order.
    pub const ALL: [ParamRange; 6] = [
        Self::TPR,
        Self::TNR,
        Self::PREVALENCE,
        Self::NTOT_MIN,
        Self::NTOT_MAX,
        Self::ALPHA,
    ];

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Check `value` against this range.
    pub fn check(&self, value: f64) -> Result<f64, txr_common::Error> {
        if value.is_nan() || !self.contains(value) {
            return Err(txr_common::Error::OutOfRange {
                name: self.name.to_string(),
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(value)
    }
}

/// Defaults for the sample-size sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepDefaults {
    pub tpr: f64,
    pub tnr: f64,
    pub prevalence: f64,
    pub ntot_min: u64,
    pub ntot_max: u64,
    pub alpha: f64,
    pub num_points: usize,
}

impl Default for SweepDefaults {
    fn default() -> Self {
        Self {
            tpr: ParamRange::TPR.default,
            tnr: ParamRange::TNR.default,
            prevalence: ParamRange::PREVALENCE.default,
            ntot_min: ParamRange::NTOT_MIN.default as u64,
            ntot_max: ParamRange::NTOT_MAX.default as u64,
            alpha: ParamRange::ALPHA.default,
            num_points: 10,
        }
    }
}

/// Defaults for Monte Carlo simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationDefaults {
    /// Number of Monte Carlo trials.
    pub trials: usize,
    /// Grid layout used when building matrices.
    pub layout: MatrixLayout,
    /// Fixed seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SimulationDefaults {
    fn default() -> Self {
        Self {
            trials: 10_000,
            layout: MatrixLayout::TnFirst,
            seed: None,
        }
    }
}

/// Complete settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sweep: SweepDefaults,
    pub simulation: SimulationDefaults,
}

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid TOML in config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Semantic validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<ConfigError> for txr_common::Error {
    fn from(err: ConfigError) -> Self {
        txr_common::Error::Config(err.to_string())
    }
}

/// Settings together with where they came from.
#[derive(Debug, Clone)]
pub struct LoadedSettings {
    pub settings: Settings,
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Parse and validate settings from TOML text.
pub fn parse_settings(text: &str, path: &Path) -> Result<Settings, ConfigError> {
    let settings: Settings = toml::from_str(text).map_err(|source| ConfigError::ParseError {
        path: path.to_path_buf(),
        source,
    })?;
    validate_settings(&settings)?;
    Ok(settings)
}

/// Resolve, read, parse and validate the settings file.
///
/// An explicit `cli_path` that does not exist is an error; otherwise a
/// missing file means built-in defaults.
pub fn load_settings(cli_path: Option<&Path>) -> Result<LoadedSettings, ConfigError> {
    if let Some(path) = cli_path {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
    }

    let resolved = resolve_config(cli_path);
    let Some(path) = resolved.path else {
        tracing::debug!(source = %resolved.source, "using built-in defaults");
        return Ok(LoadedSettings {
            settings: Settings::default(),
            path: None,
            source: resolved.source,
        });
    };

    let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::IoError {
        path: path.clone(),
        source,
    })?;
    let settings = parse_settings(&text, &path)?;
    tracing::debug!(path = %path.display(), source = %resolved.source, "loaded settings");

    Ok(LoadedSettings {
        settings,
        path: Some(path),
        source: resolved.source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_front_end_contract() {
        let s = Settings::default();
        assert_eq!(s.sweep.tpr, 0.8);
        assert_eq!(s.sweep.tnr, 0.8);
        assert_eq!(s.sweep.prevalence, 0.5);
        assert_eq!(s.sweep.ntot_min, 100);
        assert_eq!(s.sweep.ntot_max, 1000);
        assert_eq!(s.sweep.alpha, 0.05);
        assert_eq!(s.sweep.num_points, 10);
        assert_eq!(s.simulation.trials, 10_000);
        assert_eq!(s.simulation.layout, MatrixLayout::TnFirst);
        assert_eq!(s.simulation.seed, None);
    }

    #[test]
    fn param_range_check() {
        assert!(ParamRange::ALPHA.check(0.05).is_ok());
        assert!(ParamRange::ALPHA.check(0.5).is_err());
        assert!(ParamRange::PREVALENCE.check(f64::NAN).is_err());
        assert!(ParamRange::TPR.check(0.0).is_ok());
        assert!(ParamRange::TPR.check(1.0).is_ok());
    }

    #[test]
    fn parse_partial_file_keeps_defaults() {
        let text = "[sweep]\ntpr = 0.9\n\n[simulation]\nlayout = \"10\"\nseed = 7\n";
        let s = parse_settings(text, Path::new("config.toml")).unwrap();
        assert_eq!(s.sweep.tpr, 0.9);
        assert_eq!(s.sweep.tnr, 0.8);
        assert_eq!(s.simulation.layout, MatrixLayout::TpFirst);
        assert_eq!(s.simulation.seed, Some(7));
        assert_eq!(s.simulation.trials, 10_000);
    }

    #[test]
    fn parse_rejects_bad_layout_token() {
        let text = "[simulation]\nlayout = \"11\"\n";
        let err = parse_settings(text, Path::new("config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn parse_rejects_out_of_range_default() {
        let text = "[sweep]\nalpha = 0.5\n";
        let err = parse_settings(text, Path::new("config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sweep]\nprevalence = 0.2\nnum_points = 25").unwrap();

        let loaded = load_settings(Some(file.path())).unwrap();
        assert_eq!(loaded.source, ConfigSource::CliArgument);
        assert_eq!(loaded.settings.sweep.prevalence, 0.2);
        assert_eq!(loaded.settings.sweep.num_points, 25);
    }

    #[test]
    fn load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = load_settings(Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn config_error_converts_to_common_error() {
        let err: txr_common::Error = ConfigError::NotFound {
            path: PathBuf::from("/x"),
        }
        .into();
        assert_eq!(err.code(), 40);
    }
}
