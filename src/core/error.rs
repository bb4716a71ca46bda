//! Error type system for the book catalog
//!
//! This module provides:
//! - A single error enum shared by the database and service layers
//! - Stable error type names for serialized error envelopes
//! - Atomic-scope failure mapping for create/delete workflows
//! - Error context support

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Main error type for the catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    // System-level errors
    #[error("System initialization failed: {0}")]
    InitializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Storage errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    PoolError(String),

    // Domain errors
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Duplicate title: {0}")]
    DuplicateTitle(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Transaction rolled back: {0}")]
    AtomicityFailure(String),

    // I/O errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CatalogError {
    /// Get the error type name for serialized responses
    pub fn error_type(&self) -> &'static str {
        match self {
            CatalogError::InitializationError(_) => "InitializationError",
            CatalogError::ConfigError(_) => "ConfigError",
            CatalogError::DatabaseError(_) => "DatabaseError",
            CatalogError::PoolError(_) => "PoolError",
            CatalogError::ValidationError(_) => "ValidationError",
            CatalogError::DuplicateTitle(_) => "DuplicateTitleError",
            CatalogError::NotFound(_) => "NotFoundError",
            CatalogError::AtomicityFailure(_) => "AtomicityFailure",
            CatalogError::IoError(_) => "IoError",
            CatalogError::SerializationError(_) => "SerializationError",
        }
    }

    /// Check if this error is transient at the storage level
    pub fn is_retryable(&self) -> bool {
        match self {
            CatalogError::PoolError(_) => true,
            CatalogError::DatabaseError(rusqlite::Error::SqliteFailure(err, _)) => matches!(
                err.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }

    /// Whether this error describes the caller's input rather than a storage fault
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            CatalogError::ValidationError(_)
                | CatalogError::DuplicateTitle(_)
                | CatalogError::NotFound(_)
        )
    }

    /// Convert a failure raised inside an atomic scope.
    ///
    /// Domain errors keep their kind; anything else becomes an
    /// `AtomicityFailure` naming the operation that was rolled back.
    pub fn into_atomicity_failure(self, operation: &str) -> Self {
        match self {
            err if err.is_domain_error() => err,
            CatalogError::AtomicityFailure(msg) => CatalogError::AtomicityFailure(msg),
            err => CatalogError::AtomicityFailure(format!("{}: {}", operation, err)),
        }
    }
}

/// Returns true if the rusqlite error is a UNIQUE constraint violation.
///
/// Primary-key collisions are reported separately by SQLite and do not match.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        }
        _ => false,
    }
}

/// Error envelope printed by the command-line front end
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error type identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Additional details, e.g. `{"retryable": true}` for transient storage faults
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Unique trace ID for this error
    pub trace_id: String,
}

impl ErrorResponse {
    /// Create a new error response with a generated trace ID
    pub fn new(error: String, message: String) -> Self {
        Self {
            error,
            message,
            details: None,
            trace_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an error response from a CatalogError
    pub fn from_error(error: &CatalogError) -> Self {
        let mut response = Self::new(error.error_type().to_string(), error.to_string());
        if error.is_retryable() {
            response.details = Some(serde_json::json!({ "retryable": true }));
        }
        response
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}{} (trace_id: {})",
            self.error,
            self.message,
            self.details.as_ref().map_or("", |_| " with details"),
            self.trace_id
        )
    }
}

/// Result type alias for operations that can fail with CatalogError
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Context extension trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context to an error using a closure
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let context_str = context.into();
            CatalogError::InitializationError(format!("{}: {}", context_str, e))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let context_str = f();
            CatalogError::InitializationError(format!("{}: {}", context_str, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_types() {
        assert_eq!(
            CatalogError::ValidationError("title".into()).error_type(),
            "ValidationError"
        );
        assert_eq!(
            CatalogError::DuplicateTitle("Dune".into()).error_type(),
            "DuplicateTitleError"
        );
        assert_eq!(CatalogError::NotFound("book".into()).error_type(), "NotFoundError");
        assert_eq!(
            CatalogError::AtomicityFailure("delete".into()).error_type(),
            "AtomicityFailure"
        );
    }

    #[test]
    fn test_error_retryable() {
        assert!(CatalogError::PoolError("timeout".into()).is_retryable());
        assert!(!CatalogError::ValidationError("test".into()).is_retryable());
        assert!(!CatalogError::DatabaseError(rusqlite::Error::InvalidQuery).is_retryable());
    }

    #[test]
    fn test_atomicity_mapping_keeps_domain_errors() {
        let err = CatalogError::DuplicateTitle("Dune".into()).into_atomicity_failure("create book");
        assert!(matches!(err, CatalogError::DuplicateTitle(_)));

        let err = CatalogError::NotFound("book 1".into()).into_atomicity_failure("delete book");
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[test]
    fn test_atomicity_mapping_wraps_storage_errors() {
        let err = CatalogError::DatabaseError(rusqlite::Error::InvalidQuery)
            .into_atomicity_failure("create book");
        match err {
            CatalogError::AtomicityFailure(msg) => assert!(msg.starts_with("create book")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_error_response_creation() {
        let error = CatalogError::NotFound("book abc".into());
        let response = ErrorResponse::from_error(&error);

        assert_eq!(response.error, "NotFoundError");
        assert!(response.message.contains("book abc"));
        assert!(!response.trace_id.is_empty());
        assert!(response.details.is_none());
    }

    #[test]
    fn test_error_response_marks_retryable() {
        let response = ErrorResponse::from_error(&CatalogError::PoolError("timed out".into()));

        assert_eq!(response.error, "PoolError");
        assert_eq!(response.details, Some(serde_json::json!({ "retryable": true })));
        assert!(response.to_string().contains("with details"));
    }

    #[test]
    fn test_unique_violation_excludes_primary_key() {
        let failure = |extended_code| {
            rusqlite::Error::SqliteFailure(rusqlite::ffi::Error::new(extended_code), None)
        };

        assert!(is_unique_violation(&failure(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE)));
        assert!(!is_unique_violation(&failure(rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)));
        assert!(!is_unique_violation(&rusqlite::Error::InvalidQuery));
    }

    #[test]
    fn test_error_context() {
        let result: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"));

        let contexted = result.context("Failed to create data directory");

        let err = contexted.unwrap_err();
        assert!(err.to_string().contains("Failed to create data directory"));
        assert!(err.to_string().contains("file not found"));
    }
}
