// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (reports keep copies)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("unknown {option} value: {value}")]
    UnknownVariant { option: &'static str, value: String },

    #[error("invalid value for {option}: {reason}")]
    InvalidOption { option: &'static str, reason: String },

    #[error("invalid application name '{name}': {reason}")]
    InvalidAppName { name: String, reason: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    // ========================================================================
    // Pipeline Definition Errors
    // ========================================================================
    #[error("step '{name}' is registered more than once in pipeline '{pipeline}'")]
    DuplicateStep { pipeline: String, name: String },

    #[error("pipeline '{0}' has no steps")]
    EmptyPipeline(String),

    #[error("invalid run state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    // ========================================================================
    // Environment Errors
    // ========================================================================
    #[error("required environment variable {name} is not set")]
    MissingEnvironmentVariable { name: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnknownVariant { option, value } => vec![
                format!("'{}' is not a known {}", value, option),
                "Run with --help to see accepted values".into(),
            ],
            Self::InvalidOption { option, reason } => vec![
                format!("Check the value passed for {}", option),
                format!("Details: {}", reason),
            ],
            Self::InvalidAppName { .. } => vec![
                "Use letters, digits, hyphens and underscores".into(),
                "Start with a letter".into(),
                "Examples: my-app, my_app, shop2".into(),
            ],
            Self::MissingEnvironmentVariable { name } => vec![
                format!("Set {} in the environment or in .env", name),
                "See .env.example for the full list of variables".into(),
            ],
            Self::DuplicateStep { .. } | Self::EmptyPipeline(_) | Self::InvalidTransition { .. } => {
                vec!["This is a bug in the step catalog, please report it".into()]
            }
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownVariant { .. }
            | Self::InvalidOption { .. }
            | Self::InvalidAppName { .. }
            | Self::AbsolutePathNotAllowed { .. } => ErrorCategory::Validation,
            Self::MissingEnvironmentVariable { .. } => ErrorCategory::Environment,
            _ => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Environment,
    Internal,
}
