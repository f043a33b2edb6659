//! # Error Types
//!
//! Domain-specific error types for billsplit-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  billsplit-core errors (this file)                                      │
//! │  ├── CoreError        - Draft editing / lookup failures                 │
//! │  └── ValidationError  - Input validation failures (Pix, EMV, items)     │
//! │                                                                         │
//! │  billsplit-store errors (separate crate)                                │
//! │  └── StoreError       - History load/save failures                      │
//! │                                                                         │
//! │  CLI errors (in app)                                                    │
//! │  └── CliError         - What the user sees, plus exit code              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CliError → stderr                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What is NOT an error
//! An unbalanced split is reported as a [`crate::split::Discrepancy`], never
//! raised. Zero subtotals and unclaimed items are normal zero-contribution
//! cases.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Item id does not exist in the draft.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Participant id does not exist in the draft.
    #[error("Participant not found: {0}")]
    ParticipantNotFound(String),

    /// An operation needs the local user but none is marked `is_current_user`.
    #[error("Bill has no current user")]
    NoCurrentUser,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are the hard failures of the payload encoder (missing Pix key,
/// EMV length ceiling) plus the few checks the draft performs on new items.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (non-ASCII key, malformed EMV id, unparseable amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ItemNotFound("item-7".to_string());
        assert_eq!(err.to_string(), "Item not found: item-7");
        assert_eq!(
            CoreError::NoCurrentUser.to_string(),
            "Bill has no current user"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "pix key".to_string(),
        };
        assert_eq!(err.to_string(), "pix key is required");

        let err = ValidationError::TooLong {
            field: "EMV field 59".to_string(),
            max: 99,
        };
        assert_eq!(
            err.to_string(),
            "EMV field 59 must be at most 99 characters"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "pix key".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
