//! # Validation Module
//!
//! Input validation and normalization utilities for billsplit.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (web UI / CLI)                                         │
//! │  ├── Parses free text into numbers (parse_amount_input)                 │
//! │  └── Immediate user feedback                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Split engine                                                  │
//! │  └── NO rejection: clamps quantity, treats zero subtotal as no tax      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Pix encoder (THIS MODULE's hard checks)                       │
//! │  ├── Pix key must be present and ASCII                                  │
//! │  └── EMV values must fit the 2-digit length field                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::{MAX_EMV_VALUE_LEN, MAX_ITEM_QUANTITY};

// =============================================================================
// String Validators
// =============================================================================

/// Validates a Pix key and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be ASCII (CPF, phone, e-mail, or random EVP keys all are)
///
/// ## Example
/// ```rust
/// use billsplit_core::validation::validate_pix_key;
///
/// assert_eq!(validate_pix_key("  11999999999 ").unwrap(), "11999999999");
/// assert!(validate_pix_key("   ").is_err());
/// ```
pub fn validate_pix_key(key: &str) -> ValidationResult<&str> {
    let key = key.trim();

    if key.is_empty() {
        return Err(ValidationError::Required {
            field: "pix key".to_string(),
        });
    }

    if !key.is_ascii() {
        return Err(ValidationError::InvalidFormat {
            field: "pix key".to_string(),
            reason: "must contain only ASCII characters".to_string(),
        });
    }

    Ok(key)
}

/// Validates an EMV field identifier: exactly two ASCII digits.
pub fn validate_emv_id(id: &str) -> ValidationResult<()> {
    if id.len() != 2 || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "EMV field id".to_string(),
            reason: format!("'{}' is not two digits", id),
        });
    }
    Ok(())
}

/// Validates an EMV field value against the 2-digit length ceiling.
pub fn validate_emv_value(id: &str, value: &str) -> ValidationResult<()> {
    if value.chars().count() > MAX_EMV_VALUE_LEN {
        return Err(ValidationError::TooLong {
            field: format!("EMV field {}", id),
            max: MAX_EMV_VALUE_LEN,
        });
    }
    Ok(())
}

/// Validates a display name (participant, establishment) and returns it trimmed.
pub fn validate_name<'a>(field: &str, name: &'a str) -> ValidationResult<&'a str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(name)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an item quantity.
///
/// ## Rules
/// - At least 1
/// - At most [`MAX_ITEM_QUANTITY`]
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 || qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: i64::from(MAX_ITEM_QUANTITY),
        });
    }
    Ok(())
}

/// Parses a user-typed amount.
///
/// Accepts `12.50`, `12,50`, `R$ 12,50` and `1.234,56`. Returns `None` for
/// anything that is not a number; callers treat that as zero.
///
/// ## Example
/// ```rust
/// use billsplit_core::validation::parse_amount_input;
/// use billsplit_core::Money;
///
/// assert_eq!(parse_amount_input("R$ 1.234,56"), Some(Money::from_cents(123456)));
/// assert_eq!(parse_amount_input("12.5"), Some(Money::from_cents(1250)));
/// assert_eq!(parse_amount_input("abc"), None);
/// ```
pub fn parse_amount_input(input: &str) -> Option<Money> {
    let cleaned: String = input
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    // With a comma present it is the decimal separator and dots group thousands.
    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned
    };

    normalized.parse::<Money>().ok()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_pix_key() {
        assert_eq!(
            validate_pix_key("chave@example.com").unwrap(),
            "chave@example.com"
        );
        assert_eq!(
            validate_pix_key("").unwrap_err(),
            ValidationError::Required {
                field: "pix key".to_string()
            }
        );
        assert!(matches!(
            validate_pix_key("chavé"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_emv_id() {
        assert!(validate_emv_id("00").is_ok());
        assert!(validate_emv_id("63").is_ok());
        assert!(validate_emv_id("6").is_err());
        assert!(validate_emv_id("ab").is_err());
        assert!(validate_emv_id("123").is_err());
    }

    #[test]
    fn test_validate_emv_value() {
        assert!(validate_emv_value("59", &"A".repeat(99)).is_ok());
        assert!(validate_emv_value("59", &"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("participant name", "  Ana ").unwrap(), "Ana");
        assert!(validate_name("participant name", "   ").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_parse_amount_input() {
        assert_eq!(parse_amount_input("12,50"), Some(Money::from_cents(1250)));
        assert_eq!(parse_amount_input(" 7 "), Some(Money::from_cents(700)));
        assert_eq!(parse_amount_input("-3,10"), Some(Money::from_cents(-310)));
        assert_eq!(parse_amount_input(""), None);
        assert_eq!(parse_amount_input("R$"), None);
        assert_eq!(parse_amount_input("doze"), None);
    }
}
