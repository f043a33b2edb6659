//! # CRC-16/CCITT-FALSE
//!
//! The checksum that closes every Pix payload (EMV tag `63`).
//!
//! ## Parameters
//! ```text
//! ┌────────────┬──────────┐
//! │ width      │ 16       │
//! │ poly       │ 0x1021   │
//! │ init       │ 0xFFFF   │
//! │ refin/out  │ false    │
//! │ xorout     │ 0x0000   │
//! │ check      │ 0x29B1   │  ← crc16(b"123456789")
//! └────────────┴──────────┘
//! ```
//!
//! Bank apps recompute this over the scanned text and reject the QR code on a
//! mismatch, so the output must be bit-exact.

const POLYNOMIAL: u16 = 0x1021;
const INITIAL: u16 = 0xFFFF;

/// Computes CRC-16/CCITT-FALSE over `data`.
///
/// ## Example
/// ```rust
/// use billsplit_core::checksum::crc16;
///
/// assert_eq!(crc16(b"123456789"), 0x29B1);
/// ```
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc = INITIAL;
    for &byte in data {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ POLYNOMIAL
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// CRC as four uppercase, zero-padded hex digits (`"0A3F"`).
pub fn crc16_hex(data: &[u8]) -> String {
    format!("{:04X}", crc16(data))
}
