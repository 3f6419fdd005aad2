//! Exit codes for the `txr` CLI.
//!
//! Exit code ranges:
//! - 0: Success
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors

use txr_common::{Error, ErrorCategory};

/// Process exit codes. Stable contract for scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Command completed.
    Clean = 0,

    /// Invalid arguments or parameter values.
    ArgsError = 10,

    /// Configuration file missing, malformed or invalid.
    ConfigError = 11,

    /// Numerical failure inside a computation.
    InternalError = 20,

    /// I/O or serialization failure.
    IoError = 21,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }

    /// Codes 10-19.
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    /// Codes 20 and above.
    pub fn is_internal_error(self) -> bool {
        (self as i32) >= 20
    }

    /// Error code name for JSON output.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }

    /// Exit code for a library error.
    pub fn from_error(err: &Error) -> Self {
        match err.category() {
            ErrorCategory::Input => ExitCode::ArgsError,
            ErrorCategory::Config => ExitCode::ConfigError,
            ErrorCategory::Numeric => ExitCode::InternalError,
            ErrorCategory::Io => ExitCode::IoError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Clean.as_i32(), 0);
        assert_eq!(ExitCode::ArgsError.as_i32(), 10);
        assert_eq!(ExitCode::ConfigError.as_i32(), 11);
        assert_eq!(ExitCode::InternalError.as_i32(), 20);
        assert_eq!(ExitCode::IoError.as_i32(), 21);
    }

    #[test]
    fn test_exit_code_ranges() {
        assert!(ExitCode::Clean.is_success());
        assert!(ExitCode::ArgsError.is_user_error());
        assert!(ExitCode::ConfigError.is_user_error());
        assert!(!ExitCode::InternalError.is_user_error());
        assert!(ExitCode::IoError.is_internal_error());
    }

    #[test]
    fn test_from_error() {
        assert_eq!(
            ExitCode::from_error(&Error::InvalidLayout { token: "2".into() }),
            ExitCode::ArgsError
        );
        assert_eq!(
            ExitCode::from_error(&Error::EmptySequence { name: "v1".into() }),
            ExitCode::ArgsError
        );
        assert_eq!(
            ExitCode::from_error(&Error::Config("bad".into())),
            ExitCode::ConfigError
        );
        assert_eq!(
            ExitCode::from_error(&Error::Numerical("nan".into())),
            ExitCode::InternalError
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ExitCode::ArgsError.to_string(), "ERR_ARGS (10)");
    }
}
