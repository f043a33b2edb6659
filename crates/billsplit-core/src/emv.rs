//! # EMV Field Encoder
//!
//! Tag-length-value fields of the EMV Merchant-Presented QR Code grammar.
//!
//! ```text
//!   "59"  "10"  "Joao Silva"
//!    │     │        │
//!    id   len     value      →  "5910Joao Silva"
//! ```
//!
//! The length is always two decimal digits, so a value can carry at most 99
//! characters. Longer values are rejected: writing a 3-digit length would
//! shift every following field and the payload would no longer parse.

use crate::error::ValidationResult;
use crate::validation::{validate_emv_id, validate_emv_value};

/// Formats one TLV field.
///
/// ## Example
/// ```rust
/// use billsplit_core::emv::format_field;
///
/// assert_eq!(format_field("59", "Joao Silva").unwrap(), "5910Joao Silva");
/// assert!(format_field("59", &"x".repeat(100)).is_err());
/// ```
pub fn format_field(id: &str, value: &str) -> ValidationResult<String> {
    validate_emv_id(id)?;
    validate_emv_value(id, value)?;
    Ok(format!("{}{:02}{}", id, value.chars().count(), value))
}

/// Accumulates TLV fields in order.
///
/// Used for both the top-level payload and nested templates (merchant
/// account information `26`, additional data `62`).
#[derive(Debug, Default, Clone)]
pub struct FieldWriter {
    buf: String,
}

impl FieldWriter {
    pub fn new() -> Self {
        FieldWriter::default()
    }

    /// Appends one field.
    pub fn field(mut self, id: &str, value: &str) -> ValidationResult<Self> {
        self.buf.push_str(&format_field(id, value)?);
        Ok(self)
    }

    /// Appends raw text (used for the `6304` CRC prefix).
    pub fn raw(mut self, text: &str) -> Self {
        self.buf.push_str(text);
        self
    }

    pub fn finish(self) -> String {
        self.buf
    }
}
