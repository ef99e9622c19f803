//! Error types for the insitu engine
//!
//! Each error type has a corresponding error code for programmatic handling.

use thiserror::Error;

/// Result type alias for insitu operations
pub type Result<T> = std::result::Result<T, InsituError>;

/// Main error type for all insitu operations
#[derive(Debug, Error)]
pub enum InsituError {
    /// Actor role or ownership does not permit the action
    #[error("Not authorized: {0}")]
    Forbidden(String),

    /// Current status is not a legal source for the requested target
    #[error("Illegal transition: {0}")]
    InvalidTransition(String),

    /// Referenced record or assignee is missing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input failed validation before anything was written
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A collaborator (store, identity, object storage) call failed
    #[error("Upstream failure: {0}")]
    Upstream(String),

    /// No .insitu directory above the working directory
    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(String),

    /// Invalid JSON format
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// IO error wrapper
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error with context
    #[error("{context}: {message}")]
    Wrapped { context: String, message: String },
}

impl InsituError {
    /// Get the error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            InsituError::Forbidden(_) => "FORBIDDEN",
            InsituError::InvalidTransition(_) => "INVALID_TRANSITION",
            InsituError::NotFound(_) => "NOT_FOUND",
            InsituError::Validation(_) => "VALIDATION_ERROR",
            InsituError::Upstream(_) => "UPSTREAM_FAILURE",
            InsituError::WorkspaceNotFound(_) => "WORKSPACE_NOT_FOUND",
            InsituError::InvalidJson(_) => "INVALID_JSON",
            InsituError::ConfigError(_) => "CONFIG_ERROR",
            InsituError::Io(_) => "IO_ERROR",
            InsituError::Wrapped { .. } => "WRAPPED_ERROR",
        }
    }

    /// Wrap an error with additional context
    pub fn wrap<E: std::fmt::Display>(error: E, context: impl Into<String>) -> Self {
        InsituError::Wrapped {
            context: context.into(),
            message: error.to_string(),
        }
    }

    /// Convert a collaborator error into an upstream failure
    pub fn upstream<E: std::fmt::Display>(error: E) -> Self {
        InsituError::Upstream(error.to_string())
    }
}

impl From<serde_json::Error> for InsituError {
    fn from(e: serde_json::Error) -> Self {
        InsituError::InvalidJson(e.to_string())
    }
}

/// Convert an error to an appropriate exit code
pub fn to_exit_code(error: &InsituError) -> i32 {
    match error {
        InsituError::Forbidden(_) => 3,
        InsituError::InvalidTransition(_) => 4,
        InsituError::NotFound(_) => 5,
        InsituError::Validation(_) => 6,
        _ => 1,
    }
}
