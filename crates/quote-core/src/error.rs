//! # Error Types
//!
//! Domain-specific error types for quote-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  quote-core errors (this file)                                         │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  quote-db errors      └── DbError      - Storage / auth failures       │
//! │  quote-export errors  └── ExportError  - Rendering failures            │
//! │  quote-desk errors    └── AppError     - What the user sees            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → AppError → User         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Arithmetic never produces an error: bad numeric input is coerced to zero
//! (see [`crate::numeric`]). Only boundary checks live here.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Quotation cannot be found in the locally held list.
    #[error("Quotation not found: {0}")]
    QuotationNotFound(String),

    /// An operation needs an authenticated user but the session is closed.
    #[error("Not signed in")]
    NotSignedIn,

    /// The record being edited belongs to someone else.
    ///
    /// ## When This Occurs
    /// - A record loaded from one session is submitted through another
    #[error("Quotation {quotation_number} is owned by another user")]
    OwnerMismatch { quotation_number: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// They are raised at the boundary, before any state is mutated.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., invalid UUID, malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
