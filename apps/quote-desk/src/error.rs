//! # Application Error Type
//!
//! Unified error type for session operations and CLI commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Mabric Quote                           │
//! │                                                                         │
//! │  quote-desk submit --client-name ""                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Session / command handler                                       │  │
//! │  │  Result<T, AppError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Validation? ──── ValidationError::Required ──────┐             │  │
//! │  │         │                                          │             │  │
//! │  │         ▼                                          ▼             │  │
//! │  │  Storage? ─────── DbError::QueryFailed(...) ──── AppError ─────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stderr: [VALIDATION_ERROR] client_name is required   (exit code 1)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Internal failures are logged with their detail and shown to the user as a
//! generic message.

use serde::Serialize;

use crate::config::ConfigError;
use quote_core::{CoreError, ValidationError};
use quote_db::DbError;
use quote_export::ExportError;

/// Error returned from session operations and commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Quotation not found: QT-20250101-000123"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Quotation or profile not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// No user signed in
    NotSignedIn,

    /// Wrong email or password
    AuthFailed,

    /// Record belongs to another user
    Forbidden,

    /// Quotation number or email already taken
    Conflict,

    /// Storage operation failed
    StorageError,

    /// Document rendering failed
    ExportError,

    /// Configuration could not be loaded or saved
    ConfigError,

    /// Internal error
    Internal,
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Creates a new error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        AppError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }

    /// Creates a not-signed-in error.
    pub fn not_signed_in() -> Self {
        AppError::new(ErrorCode::NotSignedIn, "Sign in first")
    }
}

/// Converts storage and auth errors.
impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => AppError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => AppError::new(
                ErrorCode::Conflict,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::AccessDenied { quotation_number } => AppError::new(
                ErrorCode::Forbidden,
                format!("Quotation {} belongs to another user", quotation_number),
            ),
            DbError::InvalidCredentials => {
                AppError::new(ErrorCode::AuthFailed, "Invalid email or password")
            }
            DbError::Validation(e) => AppError::from(e),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Storage connection failed: {}", e);
                AppError::new(ErrorCode::StorageError, "Storage is not reachable")
            }
            DbError::MigrationFailed(_) => {
                AppError::new(ErrorCode::StorageError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                AppError::new(ErrorCode::StorageError, "Database operation failed")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                AppError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::Serialization(e) => {
                tracing::error!("Stored items could not be decoded: {}", e);
                AppError::new(ErrorCode::StorageError, "Stored quotation is unreadable")
            }
            DbError::PoolExhausted => {
                AppError::new(ErrorCode::StorageError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                AppError::new(ErrorCode::StorageError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::QuotationNotFound(id) => AppError::not_found("Quotation", &id),
            CoreError::NotSignedIn => AppError::not_signed_in(),
            CoreError::OwnerMismatch { quotation_number } => AppError::new(
                ErrorCode::Forbidden,
                format!("Quotation {} belongs to another user", quotation_number),
            ),
            CoreError::Validation(e) => AppError::from(e),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        tracing::error!("Export failed: {}", err);
        AppError::new(ErrorCode::ExportError, err.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::NotSignedIn => "NOT_SIGNED_IN",
            ErrorCode::AuthFailed => "AUTH_FAILED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::ExportError => "EXPORT_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_error_mapping() {
        let err: AppError = DbError::InvalidCredentials.into();
        assert_eq!(err.code, ErrorCode::AuthFailed);

        let err: AppError = DbError::duplicate("quotation_number", "QT-1").into();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert!(err.message.contains("QT-1"));

        let err: AppError = DbError::QueryFailed("disk I/O error".to_string()).into();
        assert_eq!(err.code, ErrorCode::StorageError);
        assert!(!err.message.contains("disk"));
    }

    #[test]
    fn test_validation_mapping() {
        let err: AppError = CoreError::from(ValidationError::required("client_name")).into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.to_string(), "[VALIDATION_ERROR] client_name is required");
    }

    #[test]
    fn test_serializes_code_and_message() {
        let json = serde_json::to_value(AppError::not_found("Quotation", "QT-1")).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Quotation not found: QT-1");
    }
}
