//! TXR common types and errors.
//!
//! This crate provides foundational types shared across txr crates:
//! - Confusion matrix layouts and cell counts
//! - Common error types
//! - Output format specifications

pub mod error;
pub mod layout;
pub mod output;

pub use error::{format_error_human, Error, ErrorCategory, Result, StructuredError};
pub use layout::{ConfusionCounts, Grid, MatrixLayout};
pub use output::OutputFormat;
