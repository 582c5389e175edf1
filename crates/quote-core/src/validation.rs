//! # Validation Module
//!
//! Input validation utilities for Mabric Quote.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Numeric fields                                               │
//! │  └── Never rejected; coerced to 0 (see numeric.rs)                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Session boundary (Rust)                                      │
//! │  ├── Client name required before submit                                │
//! │  ├── Sign-up: full name, email, password length                        │
//! │  └── THIS MODULE                                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── UNIQUE quotation_number / email                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation runs before any state changes; a failure leaves the session
//! exactly as it was.

use crate::error::ValidationError;
use crate::types::QuotationRecord;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

const MAX_NAME_LEN: usize = 200;
const MAX_EMAIL_LEN: usize = 254;

// =============================================================================
// String Validators
// =============================================================================

/// Validates the client name on a quotation.
///
/// ## Example
/// ```rust
/// use quote_core::validation::validate_client_name;
///
/// assert!(validate_client_name("Mrs. Rao").is_ok());
/// assert!(validate_client_name("   ").is_err());
/// ```
pub fn validate_client_name(name: &str) -> ValidationResult<()> {
    validate_name("client name", name)
}

/// Validates the full name given at sign-up.
pub fn validate_full_name(name: &str) -> ValidationResult<()> {
    validate_name("full name", name)
}

fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required(field));
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a sign-in email.
///
/// ## Rules
/// - Must not be empty
/// - Must contain `@` with text on both sides
/// - At most 254 characters
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::required("email"));
    }

    if email.len() > MAX_EMAIL_LEN {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LEN,
        });
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@example.com".to_string(),
        }),
    }
}

/// Validates an optional email (client contact). Blank is fine.
pub fn validate_optional_email(email: Option<&str>) -> ValidationResult<()> {
    match email {
        Some(e) if !e.trim().is_empty() => validate_email(e),
        _ => Ok(()),
    }
}

/// Validates a sign-up password.
///
/// ## Example
/// ```rust
/// use quote_core::validation::validate_password;
///
/// assert!(validate_password("secret").is_ok());
/// assert!(validate_password("12345").is_err());
/// ```
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::required("password"));
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates a quotation number: `QT-` + 8 digits + `-` + 6 digits.
///
/// ## Example
/// ```rust
/// use quote_core::validation::validate_quotation_number;
///
/// assert!(validate_quotation_number("QT-20250101-000123").is_ok());
/// assert!(validate_quotation_number("QT-2025-1").is_err());
/// ```
pub fn validate_quotation_number(number: &str) -> ValidationResult<()> {
    if number.trim().is_empty() {
        return Err(ValidationError::required("quotation number"));
    }

    let valid = number
        .strip_prefix("QT-")
        .and_then(|rest| rest.split_once('-'))
        .is_some_and(|(date, suffix)| {
            date.len() == 8
                && suffix.len() == 6
                && date.bytes().all(|b| b.is_ascii_digit())
                && suffix.bytes().all(|b| b.is_ascii_digit())
        });

    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidFormat {
            field: "quotation number".to_string(),
            reason: "expected QT-YYYYMMDD-NNNNNN".to_string(),
        })
    }
}

/// Validates a UUID string.
///
/// ## Format
/// - 36 characters with hyphens: xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required("id"));
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Checks a finalized record before it is handed to storage.
pub fn validate_record(record: &QuotationRecord) -> ValidationResult<()> {
    validate_client_name(&record.client_name)?;
    validate_optional_email(record.client_email.as_deref())?;
    validate_quotation_number(&record.quotation_number)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_client_name() {
        assert!(validate_client_name("Ravi Kumar").is_ok());
        assert!(validate_client_name("").is_err());
        assert!(validate_client_name("   ").is_err());
        assert!(validate_client_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("owner@mabric.in").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@mabric.in").is_err());
        assert!(validate_email("owner@").is_err());
    }

    #[test]
    fn test_validate_optional_email() {
        assert!(validate_optional_email(None).is_ok());
        assert!(validate_optional_email(Some("  ")).is_ok());
        assert!(validate_optional_email(Some("bad")).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("123456").is_ok());
        assert!(validate_password("").is_err());
        assert!(matches!(
            validate_password("12345"),
            Err(ValidationError::TooShort { min: 6, .. })
        ));
    }

    #[test]
    fn test_validate_quotation_number() {
        assert!(validate_quotation_number("QT-20250101-000123").is_ok());
        assert!(validate_quotation_number("").is_err());
        assert!(validate_quotation_number("QT-20250101-12345").is_err());
        assert!(validate_quotation_number("QT-2025010A-123456").is_err());
        assert!(validate_quotation_number("PREVIEW-1700000000").is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }
}
