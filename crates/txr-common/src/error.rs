//! Error types for TXR.
//!
//! Every failure the statistical layer can report carries:
//! - a stable error code for machine parsing
//! - a category for grouping
//! - a recoverability hint
//! - a remediation suggestion for humans
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Invalid Matrix Layout
//!   Reason: invalid confusion matrix layout '11': accepted tokens are '01' or '10'
//!   Fix: Use '01' for [[TN,FP],[FN,TP]] or '10' for [[TP,FN],[FP,TN]].
//! ```
//!
//! # Agent-Facing Output
//!
//! ```json
//! {
//!   "code": 10,
//!   "category": "input",
//!   "message": "invalid confusion matrix layout '11': accepted tokens are '01' or '10'",
//!   "recoverable": true,
//!   "context": { "token": "11" }
//! }
//! ```
//!
//! Non-finite metric values are not errors; they propagate as ordinary
//! floating point output.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for TXR operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Caller-supplied arguments (layout token, parameter combination, ranges).
    Input,
    /// Numerical failures inside a computation.
    Numeric,
    /// Configuration file errors.
    Config,
    /// Output serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Numeric => write!(f, "numeric"),
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for TXR.
#[derive(Error, Debug)]
pub enum Error {
    // Input errors (10-19)
    #[error("invalid confusion matrix layout '{token}': accepted tokens are '01' or '10'")]
    InvalidLayout { token: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{name} must not be empty")]
    EmptySequence { name: String },

    #[error("{name}={value} is outside the allowed range [{min}, {max}]")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    // Numeric errors (30-39)
    #[error("numerical failure: {0}")]
    Numerical(String),

    // Config errors (40-49)
    #[error("configuration error: {0}")]
    Config(String),

    // I/O errors (60-69)
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for [`Error::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Input errors
    /// - 30-39: Numeric errors
    /// - 40-49: Configuration errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::InvalidLayout { .. } => 10,
            Error::InvalidArgument(_) => 11,
            Error::EmptySequence { .. } => 12,
            Error::OutOfRange { .. } => 13,
            Error::Numerical(_) => 30,
            Error::Config(_) => 40,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidLayout { .. }
            | Error::InvalidArgument(_)
            | Error::EmptySequence { .. }
            | Error::OutOfRange { .. } => ErrorCategory::Input,
            Error::Numerical(_) => ErrorCategory::Numeric,
            Error::Config(_) => ErrorCategory::Config,
            Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Whether the caller can fix the problem by changing its inputs.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::InvalidLayout { .. }
            | Error::InvalidArgument(_)
            | Error::EmptySequence { .. }
            | Error::OutOfRange { .. }
            | Error::Config(_) => true,
            Error::Numerical(_) => false,
            Error::Json(_) => true,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::InvalidLayout { .. } => {
                "Use '01' for [[TN,FP],[FN,TP]] or '10' for [[TP,FN],[FP,TN]]."
            }
            Error::InvalidArgument(_) => {
                "Correct the value named above; run 'txr <command> --help' for accepted inputs."
            }
            Error::EmptySequence { .. } => "Provide at least one value in each sequence.",
            Error::OutOfRange { .. } => "Adjust the value to lie within the documented range.",
            Error::Numerical(_) => {
                "Internal numerical issue. Retry with different parameters and report if it persists."
            }
            Error::Config(_) => {
                "Check config.toml syntax, or run 'txr config show' to see the resolved defaults."
            }
            Error::Json(_) => "Output could not be serialized. Report this as a bug.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::InvalidLayout { .. } => "Invalid Matrix Layout",
            Error::InvalidArgument(_) => "Invalid Argument",
            Error::EmptySequence { .. } => "Empty Sequence",
            Error::OutOfRange { .. } => "Value Out Of Range",
            Error::Numerical(_) => "Numerical Failure",
            Error::Config(_) => "Configuration Error",
            Error::Json(_) => "JSON Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Additional structured context (e.g., offending token or value).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::InvalidLayout { token } => {
                context.insert("token".to_string(), serde_json::json!(token));
            }
            Error::EmptySequence { name } => {
                context.insert("name".to_string(), serde_json::json!(name));
            }
            Error::OutOfRange {
                name,
                value,
                min,
                max,
            } => {
                context.insert("name".to_string(), serde_json::json!(name));
                context.insert("value".to_string(), serde_json::json!(value));
                context.insert("min".to_string(), serde_json::json!(min));
                context.insert("max".to_string(), serde_json::json!(max));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            context,
        }
    }
}

impl StructuredError {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }

    /// Serialize to pretty JSON string.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json())
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(Error::InvalidLayout { token: "x".into() }.code(), 10);
        assert_eq!(Error::invalid_argument("missing").code(), 11);
        assert_eq!(Error::EmptySequence { name: "v1".into() }.code(), 12);
        assert_eq!(Error::Config("bad".into()).code(), 40);
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            Error::InvalidLayout { token: "x".into() }.category(),
            ErrorCategory::Input
        );
        assert_eq!(Error::Numerical("nan".into()).category(), ErrorCategory::Numeric);
        assert_eq!(Error::Config("bad".into()).category(), ErrorCategory::Config);
    }

    #[test]
    fn test_error_recoverable() {
        assert!(Error::invalid_argument("missing").is_recoverable());
        assert!(!Error::Numerical("nan".into()).is_recoverable());
    }

    #[test]
    fn test_layout_message_names_token() {
        let err = Error::InvalidLayout { token: "11".into() };
        assert!(err.to_string().contains("'11'"));
        assert!(err.to_string().contains("'01' or '10'"));
    }

    #[test]
    fn test_structured_error_from_error() {
        let err = Error::OutOfRange {
            name: "alpha".into(),
            value: 0.5,
            min: 0.01,
            max: 0.2,
        };
        let structured = StructuredError::from(&err);

        assert_eq!(structured.code, 13);
        assert_eq!(structured.category, ErrorCategory::Input);
        assert!(structured.recoverable);
        assert_eq!(structured.context.get("name"), Some(&serde_json::json!("alpha")));
        assert_eq!(structured.context.get("max"), Some(&serde_json::json!(0.2)));
    }

    #[test]
    fn test_structured_error_json() {
        let err = Error::InvalidLayout { token: "11".into() };
        let json = StructuredError::from(&err).to_json();

        assert!(json.contains(r#""code":10"#));
        assert!(json.contains(r#""category":"input""#));
        assert!(json.contains(r#""token":"11""#));
    }

    #[test]
    fn test_format_error_human() {
        let err = Error::EmptySequence { name: "v2".into() };
        let formatted = format_error_human(&err, false);

        assert!(formatted.contains("Empty Sequence"));
        assert!(formatted.contains("v2 must not be empty"));
        assert!(formatted.contains("Fix:"));
    }

    #[test]
    fn test_invalid_argument_hint_is_generic() {
        for err in [
            Error::invalid_argument("num_points must be at least 2, got 1"),
            Error::invalid_argument("unknown metric 'auc'"),
        ] {
            let formatted = format_error_human(&err, false);
            assert!(formatted.contains("--help"), "{}", formatted);
            assert!(!formatted.contains("--n-pos"), "{}", formatted);
        }
    }

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Input.to_string(), "input");
        assert_eq!(ErrorCategory::Io.to_string(), "io");
    }
}
