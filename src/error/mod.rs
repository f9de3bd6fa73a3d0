//! Error types for costlens.
//!
//! Uses `thiserror` for structured error types that map to exit codes.
//!
//! ## Error Taxonomy
//!
//! Errors are categorized into four categories:
//! - **Configuration**: missing credentials, unreadable or invalid config values
//! - **Network**: transport failures and timeouts talking to the backend
//! - **Api**: the backend answered, but with a non-200 status or an
//!   unsuccessful/malformed envelope
//! - **Internal**: I/O, serialization, and unclassified failures
//!
//! Each error has a stable error code (e.g., `CL-C001`) for programmatic handling.

use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// High-level error categories for classification and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Configuration issues (missing keys, parse errors, invalid values).
    Configuration,
    /// Network issues (connection failures, timeouts).
    Network,
    /// Backend rejected the request or answered with an unusable body.
    Api,
    /// Internal errors (I/O, serialization, unclassified).
    Internal,
}

impl ErrorCategory {
    /// Returns a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Configuration => "Configuration error",
            Self::Network => "Network error",
            Self::Api => "API error",
            Self::Internal => "Internal error",
        }
    }

    /// Returns a short code prefix for this category.
    #[must_use]
    pub const fn code_prefix(&self) -> &'static str {
        match self {
            Self::Configuration => "C",
            Self::Network => "N",
            Self::Api => "A",
            Self::Internal => "X",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

// =============================================================================
// Exit Codes
// =============================================================================

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// Unexpected failure
    GeneralError = 1,
    /// Missing or invalid configuration
    ConfigError = 2,
    /// Backend rejected the request or returned an unusable body
    ApiError = 3,
    /// Timeout
    Timeout = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as Self
    }
}

/// Main error type for costlens operations.
#[derive(Error, Debug)]
pub enum CostlensError {
    // ==========================================================================
    // Configuration errors
    // ==========================================================================
    /// A required configuration value is not set.
    #[error("{key} is not configured")]
    ConfigMissing { key: String },

    /// Error parsing the configuration file.
    #[error("config parse error at {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// Invalid value for a configuration key.
    #[error("invalid value '{value}' for '{key}': {message}")]
    ConfigInvalid {
        key: String,
        value: String,
        message: String,
    },

    /// Configuration key that the store does not know.
    #[error("unknown config key '{0}'")]
    UnknownConfigKey(String),

    /// Generic configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    // ==========================================================================
    // Network errors
    // ==========================================================================
    /// Request timed out.
    #[error("request timeout after {0} seconds")]
    Timeout(u64),

    /// No response was received.
    #[error("network error: {0}")]
    Network(String),

    // ==========================================================================
    // Api errors
    // ==========================================================================
    /// Backend answered with a status other than 200 or `success: false`.
    #[error("{}", api_error_text(*status, message))]
    Api {
        status: Option<u16>,
        message: String,
    },

    /// Backend answered 200 but the body is not a usable envelope.
    #[error("failed to parse response: {0}")]
    ParseResponse(String),

    // ==========================================================================
    // Internal errors
    // ==========================================================================
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for other errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn api_error_text(status: Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("API error (HTTP {code}): {message}"),
        None => format!("API error: {message}"),
    }
}

impl CostlensError {
    /// Map error to process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            Self::ConfigMissing { .. }
            | Self::ConfigParse { .. }
            | Self::ConfigInvalid { .. }
            | Self::UnknownConfigKey(_)
            | Self::Config(_) => ExitCode::ConfigError,

            Self::Api { .. } | Self::ParseResponse(_) => ExitCode::ApiError,

            Self::Timeout(_) => ExitCode::Timeout,

            Self::Network(_) | Self::Io(_) | Self::Json(_) | Self::Other(_) => {
                ExitCode::GeneralError
            }
        }
    }

    /// Returns the error category for classification and routing.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigMissing { .. }
            | Self::ConfigParse { .. }
            | Self::ConfigInvalid { .. }
            | Self::UnknownConfigKey(_)
            | Self::Config(_) => ErrorCategory::Configuration,

            Self::Timeout(_) | Self::Network(_) => ErrorCategory::Network,

            Self::Api { .. } | Self::ParseResponse(_) => ErrorCategory::Api,

            Self::Io(_) | Self::Json(_) | Self::Other(_) => ErrorCategory::Internal,
        }
    }

    /// Returns a stable error code for programmatic handling.
    ///
    /// Format: `CL-{category}{number}`.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigMissing { .. } => "CL-C001",
            Self::ConfigParse { .. } => "CL-C002",
            Self::ConfigInvalid { .. } => "CL-C003",
            Self::UnknownConfigKey(_) => "CL-C004",
            Self::Config(_) => "CL-C099",

            Self::Timeout(_) => "CL-N001",
            Self::Network(_) => "CL-N099",

            Self::Api { .. } => "CL-A001",
            Self::ParseResponse(_) => "CL-A002",

            Self::Io(_) => "CL-X001",
            Self::Json(_) => "CL-X002",
            Self::Other(_) => "CL-X099",
        }
    }

    /// Returns whether this error only affects the current chat turn.
    ///
    /// Turn-level errors are reported and the session keeps prompting.
    #[must_use]
    pub const fn is_turn_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::Network(_) | Self::Api { .. } | Self::ParseResponse(_)
        )
    }

    /// Returns a one-line actionable hint, if there is one.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::ConfigMissing { key } => Some(format!(
                "Run `costlens config set {key} <VALUE>` or set COSTLENS_{}",
                key.to_uppercase()
            )),
            Self::ConfigParse { path, .. } => {
                Some(format!("Fix or remove the config file at {path}"))
            }
            Self::ConfigInvalid { key, .. } => {
                Some(format!("Run `costlens config unset {key}` to restore the default"))
            }
            Self::UnknownConfigKey(_) => Some(
                "Valid keys: api_key, base_url, model, temperature, max_tokens".to_string(),
            ),
            Self::Timeout(seconds) => Some(format!(
                "The backend did not answer within {seconds}s; try again"
            )),
            Self::Network(_) => {
                Some("Check your connection and `costlens config get base_url`".to_string())
            }
            Self::Api {
                status: Some(401 | 403),
                ..
            } => Some("Check your API key with `costlens config show`".to_string()),
            Self::Config(_)
            | Self::Api { .. }
            | Self::ParseResponse(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Other(_) => None,
        }
    }
}

/// Result type alias for costlens operations.
pub type Result<T> = std::result::Result<T, CostlensError>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_category_description() {
        assert_eq!(
            ErrorCategory::Configuration.description(),
            "Configuration error"
        );
        assert_eq!(ErrorCategory::Network.description(), "Network error");
        assert_eq!(ErrorCategory::Api.description(), "API error");
        assert_eq!(ErrorCategory::Internal.description(), "Internal error");
    }

    #[test]
    fn configuration_errors_are_fatal_with_config_exit_code() {
        let err = CostlensError::ConfigMissing {
            key: "api_key".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.exit_code(), ExitCode::ConfigError);
        assert!(!err.is_turn_recoverable());
        assert_eq!(i32::from(err.exit_code()), 2);
    }

    #[test]
    fn turn_errors_are_recoverable() {
        assert!(CostlensError::Timeout(30).is_turn_recoverable());
        assert!(CostlensError::Network("refused".to_string()).is_turn_recoverable());
        assert!(
            CostlensError::Api {
                status: Some(500),
                message: "boom".to_string()
            }
            .is_turn_recoverable()
        );
        assert!(CostlensError::ParseResponse("eof".to_string()).is_turn_recoverable());
    }

    #[test]
    fn exit_codes_are_correct() {
        assert_eq!(CostlensError::Timeout(30).exit_code(), ExitCode::Timeout);
        assert_eq!(
            CostlensError::Network("x".to_string()).exit_code(),
            ExitCode::GeneralError
        );
        assert_eq!(
            CostlensError::ParseResponse("x".to_string()).exit_code(),
            ExitCode::ApiError
        );
        assert_eq!(
            CostlensError::UnknownConfigKey("x".to_string()).exit_code(),
            ExitCode::ConfigError
        );
    }

    #[test]
    fn error_codes_follow_format() {
        let errors = [
            CostlensError::ConfigMissing {
                key: "base_url".to_string(),
            },
            CostlensError::Timeout(30),
            CostlensError::Api {
                status: None,
                message: "nope".to_string(),
            },
            CostlensError::Io(std::io::Error::other("disk")),
        ];
        for err in &errors {
            let code = err.error_code();
            assert!(code.starts_with("CL-"), "bad code {code}");
            assert_eq!(&code[3..4], err.category().code_prefix());
        }
    }

    #[test]
    fn api_error_display_includes_status() {
        let err = CostlensError::Api {
            status: Some(500),
            message: "Internal failure".to_string(),
        };
        assert_eq!(err.to_string(), "API error (HTTP 500): Internal failure");

        let err = CostlensError::Api {
            status: None,
            message: "quota exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "API error: quota exceeded");
    }

    #[test]
    fn missing_key_hint_names_command_and_env_var() {
        let err = CostlensError::ConfigMissing {
            key: "api_key".to_string(),
        };
        let hint = err.hint().unwrap();
        assert!(hint.contains("costlens config set api_key"));
        assert!(hint.contains("COSTLENS_API_KEY"));
    }

    #[test]
    fn unauthorized_api_error_points_at_key() {
        let err = CostlensError::Api {
            status: Some(401),
            message: "bad key".to_string(),
        };
        assert!(err.hint().unwrap().contains("API key"));
        let err = CostlensError::Api {
            status: Some(500),
            message: "boom".to_string(),
        };
        assert!(err.hint().is_none());
    }
}
