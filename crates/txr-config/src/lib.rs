//! TXR configuration loading and validation.
//!
//! This crate provides:
//! - The front-end parameter ranges and their defaults
//! - Typed settings loaded from `config.toml`
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation of loaded defaults

pub mod resolve;
pub mod settings;
pub mod validate;

pub use resolve::{resolve_config, ConfigSource, ResolvedPath};
pub use settings::{
    load_settings, parse_settings, ConfigError, LoadedSettings, ParamRange, Settings,
    SimulationDefaults, SweepDefaults,
};
pub use validate::{validate_settings, ValidationError, ValidationResult};
