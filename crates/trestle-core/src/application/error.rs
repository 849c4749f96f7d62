//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// A required external tool is missing. Raised before any step runs.
    #[error("Precondition failed: {tool} not found ({reason})")]
    PreconditionFailed { tool: String, reason: String },

    /// A command sub-action exited non-zero or could not be started.
    #[error("Step '{step}' failed: `{command}` {reason}")]
    StepFailed {
        step: String,
        command: String,
        exit_code: Option<i32>,
        reason: String,
    },

    /// No template with this id in the configured store.
    #[error("Template not found: {id}")]
    TemplateNotFound { id: String },

    /// Template rendering failed.
    #[error("Template rendering failed: {reason}")]
    RenderingFailed { reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Store access failed (lock poisoned, etc.).
    #[error("Template store error")]
    StoreLockError,

    /// Port/Adapter not configured.
    #[error("Required adapter not configured: {name}")]
    AdapterNotConfigured { name: &'static str },

    /// Validation failed (application-level, not domain).
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Project already exists at target location.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::PreconditionFailed { tool, reason } => vec![
                format!("Install {} and make sure it is on PATH", tool),
                reason.clone(),
            ],
            Self::StepFailed { step, command, .. } => vec![
                format!("Run `{}` by hand inside the project to see its output", command),
                format!("The project is left as it was when '{}' failed", step),
                "Fix the cause, remove the directory and run trestle new again".into(),
            ],
            Self::TemplateNotFound { id } => vec![
                format!("No template named '{}'", id),
                "Try: trestle list templates".into(),
                "Check $TRESTLE_TEMPLATES_DIR or templates.local_path".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::StoreLockError => vec![
                "The template store is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::AdapterNotConfigured { name } => vec![
                format!("Required component not configured: {}", name),
                "This is likely a configuration error".into(),
            ],
            Self::ProjectExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Use --skip-base to apply the pipeline onto an existing skeleton".into(),
                "Choose a different project path".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::PreconditionFailed { .. } => ErrorCategory::Precondition,
            Self::StepFailed { .. } => ErrorCategory::Execution,
            Self::TemplateNotFound { .. } => ErrorCategory::NotFound,
            Self::FilesystemError { .. } | Self::StoreLockError => ErrorCategory::Internal,
            Self::AdapterNotConfigured { .. } => ErrorCategory::Configuration,
            Self::ValidationFailed(_) | Self::ProjectExists { .. } => ErrorCategory::Validation,
            Self::RenderingFailed { .. } => ErrorCategory::Internal,
        }
    }
}
