//! Unified application error types for AccessHub.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. The authorization-specific kinds
//! (`UnknownCapability`, `MissingResourceToken`, `AccessDenied`,
//! `AlreadyGranted`, `NothingToRevoke`) form the closed outcome set the
//! boundary layer maps onto caller-visible responses.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested entity was not found.
    NotFound,
    /// The module or action name does not resolve to a known permission.
    UnknownCapability,
    /// A resource-scoped check was requested without a resource token.
    MissingResourceToken,
    /// All resolution steps completed but no applicable grant was found.
    AccessDenied,
    /// Every permission in an assign request was already granted.
    AlreadyGranted,
    /// A deassign request matched no existing grant rows.
    NothingToRevoke,
    /// Input validation failed.
    Validation,
    /// A conflict occurred (duplicate entry, concurrent modification).
    Conflict,
    /// A database error occurred.
    Database,
    /// A cache error occurred.
    Cache,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::UnknownCapability => write!(f, "UNKNOWN_CAPABILITY"),
            Self::MissingResourceToken => write!(f, "MISSING_RESOURCE_TOKEN"),
            Self::AccessDenied => write!(f, "ACCESS_DENIED"),
            Self::AlreadyGranted => write!(f, "ALREADY_GRANTED"),
            Self::NothingToRevoke => write!(f, "NOTHING_TO_REVOKE"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Database => write!(f, "DATABASE"),
            Self::Cache => write!(f, "CACHE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout AccessHub.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. This provides a single error type for
/// the entire application boundary.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an unknown-capability error.
    pub fn unknown_capability(module: &str, action: &str) -> Self {
        Self::new(
            ErrorKind::UnknownCapability,
            format!("no permission registered for {module}:{action}"),
        )
    }

    /// Create a missing-resource-token error.
    pub fn missing_resource_token(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingResourceToken, message)
    }

    /// Create an access-denied error.
    pub fn access_denied(module: &str, action: &str) -> Self {
        Self::new(
            ErrorKind::AccessDenied,
            format!("access denied for {module}:{action}"),
        )
    }

    /// Create an already-granted error.
    pub fn already_granted(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AlreadyGranted, message)
    }

    /// Create a nothing-to-revoke error.
    pub fn nothing_to_revoke(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NothingToRevoke, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a cache error.
    pub fn cache(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cache, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::with_source(ErrorKind::Database, format!("Database error: {err}"), err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_denied_message() {
        let err = AppError::access_denied("article", "update");
        assert_eq!(err.kind, ErrorKind::AccessDenied);
        assert_eq!(err.to_string(), "ACCESS_DENIED: access denied for article:update");
    }

    #[test]
    fn test_unknown_capability_message() {
        let err = AppError::unknown_capability("document", "frobnicate");
        assert_eq!(err.kind, ErrorKind::UnknownCapability);
        assert!(err.message.contains("document:frobnicate"));
    }
}
