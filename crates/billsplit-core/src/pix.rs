//! # Pix Static Payload Builder
//!
//! Builds the "copia e cola" text of a static Pix QR code (BR Code), the
//! Banco Central subset of the EMV Merchant-Presented QR grammar.
//!
//! ## Payload Layout (order is part of the wire contract)
//! ```text
//! ┌──────┬──────────────────────────────────────────────────────────────────┐
//! │ ID   │ Value                                                            │
//! ├──────┼──────────────────────────────────────────────────────────────────┤
//! │ 00   │ "01"                     payload format indicator                │
//! │ 26   │ ┌ 00 "br.gov.bcb.pix"    merchant account information            │
//! │      │ └ 01 <key>                                                       │
//! │ 52   │ "0000"                   merchant category code                  │
//! │ 53   │ "986"                    currency (ISO 4217 BRL)                 │
//! │ 54   │ "28.75"                  transaction amount                      │
//! │ 58   │ "BR"                     country                                 │
//! │ 59   │ <name, ≤25, ASCII>       merchant name                           │
//! │ 60   │ <city, ≤15, ASCII>       merchant city                           │
//! │ 62   │ └ 05 <label>             additional data / reference label       │
//! │ 63   │ <CRC16 of everything up to and including "6304">                 │
//! └──────┴──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use billsplit_core::pix::build_pix_payload;
//! use billsplit_core::Money;
//!
//! let amount = Money::from_cents(2875);
//! let payload = build_pix_payload("11999999999", "Joao Silva", "Sao Paulo", amount).unwrap();
//! assert!(payload.as_str().starts_with("000201"));
//! assert!(payload.verify());
//! ```

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::checksum::crc16_hex;
use crate::emv::FieldWriter;
use crate::error::ValidationResult;
use crate::money::Money;
use crate::text::{strip_diacritics, truncate_chars};
use crate::validation::validate_pix_key;

/// Globally unique identifier of the Pix arrangement (field 26/00).
pub const PIX_GUI: &str = "br.gov.bcb.pix";

/// Reference label used when the caller has no transaction id.
pub const DEFAULT_REFERENCE_LABEL: &str = "***";

/// Merchant name limit (field 59).
pub const MAX_PAYEE_NAME_LEN: usize = 25;

/// Merchant city limit (field 60).
pub const MAX_CITY_LEN: usize = 15;

const CRC_PREFIX: &str = "6304";
const CRC_LEN: usize = 4;

// =============================================================================
// Payload
// =============================================================================

/// A complete, checksummed Pix payload. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PixPayload(String);

impl PixPayload {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// The trailing four CRC digits.
    pub fn checksum(&self) -> &str {
        &self.0[self.0.len() - CRC_LEN..]
    }

    /// Recomputes the CRC over the body and compares it to the trailer.
    pub fn verify(&self) -> bool {
        verify_payload(&self.0)
    }
}

impl fmt::Display for PixPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PixPayload {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Checks any payload text the way a scanning app would: the body must end
/// in `6304` and be followed by its own CRC.
pub fn verify_payload(payload: &str) -> bool {
    if !payload.is_ascii() || payload.len() < CRC_PREFIX.len() + CRC_LEN {
        return false;
    }
    let (body, crc) = payload.split_at(payload.len() - CRC_LEN);
    body.ends_with(CRC_PREFIX) && crc16_hex(body.as_bytes()) == crc
}

// =============================================================================
// Request
// =============================================================================

/// Inputs of a static Pix charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixRequest {
    pub key: String,
    pub payee_name: String,
    pub city: String,
    pub amount: Money,
    pub reference_label: String,
}

impl PixRequest {
    pub fn new(
        key: impl Into<String>,
        payee_name: impl Into<String>,
        city: impl Into<String>,
        amount: Money,
    ) -> Self {
        PixRequest {
            key: key.into(),
            payee_name: payee_name.into(),
            city: city.into(),
            amount,
            reference_label: DEFAULT_REFERENCE_LABEL.to_string(),
        }
    }

    /// Sets the field 62/05 reference label (transaction id).
    pub fn with_reference_label(mut self, label: impl Into<String>) -> Self {
        self.reference_label = label.into();
        self
    }

    /// Encodes the payload.
    ///
    /// ## Errors
    /// - [`crate::ValidationError::Required`] when the key is blank
    /// - [`crate::ValidationError::InvalidFormat`] when the key is not ASCII
    /// - [`crate::ValidationError::TooLong`] when any field value (key inside
    ///   the merchant account template, reference label) exceeds 99 characters
    pub fn build(&self) -> ValidationResult<PixPayload> {
        let key = validate_pix_key(&self.key)?;
        let name = sanitize_text(&self.payee_name, MAX_PAYEE_NAME_LEN);
        let city = sanitize_text(&self.city, MAX_CITY_LEN);
        let amount = self.amount.to_fixed2();

        let merchant_account = FieldWriter::new()
            .field("00", PIX_GUI)?
            .field("01", key)?
            .finish();
        let additional_data = FieldWriter::new()
            .field("05", &self.reference_label)?
            .finish();

        let body = FieldWriter::new()
            .field("00", "01")?
            .field("26", &merchant_account)?
            .field("52", "0000")?
            .field("53", "986")?
            .field("54", &amount)?
            .field("58", "BR")?
            .field("59", &name)?
            .field("60", &city)?
            .field("62", &additional_data)?
            .raw(CRC_PREFIX)
            .finish();

        let crc = crc16_hex(body.as_bytes());
        debug!(amount = %amount, payee = %name, city = %city, crc = %crc, "Built Pix payload");

        Ok(PixPayload(body + &crc))
    }
}

/// Builds a payload with the default reference label.
pub fn build_pix_payload(
    key: &str,
    payee_name: &str,
    city: &str,
    amount: Money,
) -> ValidationResult<PixPayload> {
    PixRequest::new(key, payee_name, city, amount).build()
}

/// Truncate, strip diacritics, drop what is still non-ASCII, trim.
///
/// The ASCII filter keeps field lengths equal to byte lengths, which is what
/// the CRC and the scanners count.
fn sanitize_text(input: &str, max_chars: usize) -> String {
    let stripped = strip_diacritics(truncate_chars(input, max_chars));
    let ascii: String = stripped.chars().filter(char::is_ascii).collect();
    ascii.trim().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn build(key: &str, name: &str, city: &str, amount: &str) -> ValidationResult<PixPayload> {
        build_pix_payload(key, name, city, money(amount))
    }

    #[test]
    fn test_known_payload_is_byte_exact() {
        let payload = build("11999999999", "Joao Silva", "Sao Paulo", "28.75").unwrap();
        assert_eq!(
            payload.as_str(),
            "00020126330014br.gov.bcb.pix0111119999999995204000053039865405\
             28.755802BR5910Joao Silva6009Sao Paulo62070503***630473F7"
        );
        assert_eq!(payload.checksum(), "73F7");
    }

    #[test]
    fn test_deterministic_and_self_checking() {
        let a = build("11999999999", "Joao Silva", "Sao Paulo", "28.75").unwrap();
        let b = build("11999999999", "Joao Silva", "Sao Paulo", "28.75").unwrap();
        assert_eq!(a, b);

        let text = a.as_str();
        let (body, crc) = text.split_at(text.len() - 4);
        assert_eq!(crc16_hex(body.as_bytes()), crc);
        assert!(a.verify());
    }

    #[test]
    fn test_diacritics_are_stripped() {
        let payload = build("11999999999", "João Ação", "São Paulo", "10").unwrap();
        assert_eq!(
            payload.as_str(),
            "00020126330014br.gov.bcb.pix0111119999999995204000053039865405\
             10.005802BR5909Joao Acao6009Sao Paulo62070503***63042515"
        );
        assert!(payload.as_str().is_ascii());
        assert!(payload.as_str().contains("5909Joao Acao"));
    }

    #[test]
    fn test_truncation_and_reference_label() {
        let payload = PixRequest::new(
            "chave@example.com",
            "Maria Aparecida dos Santos Oliveira",
            "Brasília",
            money("0.5"),
        )
        .with_reference_label("RACHA01")
        .build()
        .unwrap();

        assert_eq!(
            payload.as_str(),
            "00020126390014br.gov.bcb.pix0117chave@example.com520400005303986\
             54040.505802BR5925Maria Aparecida dos Santo6008Brasilia\
             62110507RACHA016304BA38"
        );
    }

    #[test]
    fn test_key_is_trimmed() {
        let trimmed = build("11999999999", "A", "B", "1").unwrap();
        let padded = build("  11999999999\n", "A", "B", "1").unwrap();
        assert_eq!(trimmed, padded);
    }

    #[test]
    fn test_blank_key_is_refused() {
        let err = build("   ", "Joao", "Sao Paulo", "1").unwrap_err();
        assert_eq!(
            err,
            ValidationError::Required {
                field: "pix key".to_string()
            }
        );
    }

    #[test]
    fn test_oversized_key_is_refused() {
        // 18 chars of GUI field + "01" + len + 78-char key = 100 > 99
        let key = "k".repeat(78);
        let err = build(&key, "Joao", "Sao Paulo", "1").unwrap_err();
        assert!(matches!(
            err,
            ValidationError::TooLong { ref field, max: 99 } if field == "EMV field 26"
        ));

        let key = "k".repeat(77);
        assert!(build(&key, "Joao", "Sao Paulo", "1").is_ok());
    }

    #[test]
    fn test_amount_is_rounded_to_cents() {
        let payload = build("k", "A", "B", "33.3333333").unwrap();
        assert!(payload.as_str().contains("540533.33"));
    }

    #[test]
    fn test_non_latin_characters_are_dropped() {
        assert_eq!(sanitize_text("Zoë 東京", 25), "Zoe");
        assert_eq!(sanitize_text("  Ana  ", 25), "Ana");
    }

    #[test]
    fn test_verify_payload_rejects_tampering() {
        let payload = build("11999999999", "Joao", "Rio", "5").unwrap();
        let tampered = payload.as_str().replace("5.00", "9.00");
        assert!(!verify_payload(&tampered));
        assert!(!verify_payload("6304"));
        assert!(!verify_payload(""));
    }
}
