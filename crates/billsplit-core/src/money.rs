//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Splitting forces division (R$ 10.00 shared by 3 people), so integer    │
//! │  cents would lose a cent on every shared item:                          │
//! │    1000 cents / 3 = 333 cents (×3 = 999 cents)                          │
//! │                                                                         │
//! │  OUR SOLUTION: 96-bit exact decimal (rust_decimal)                      │
//! │    10 / 3 = 3.3333333333333333333333333333                              │
//! │    Drift is ~1e-28 per share, far below the 0.05 discrepancy tolerance  │
//! │    Rounding to cents happens ONLY when formatting for display or Pix    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use billsplit_core::money::Money;
//!
//! let price = Money::from_cents(4500);        // R$ 45.00
//! let share = price.split_evenly(3).unwrap(); // R$ 15.00
//! assert_eq!(share, Money::from_cents(1500));
//! assert_eq!(share.to_fixed2(), "15.00");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in Brazilian reais, held as an exact decimal.
///
/// ## Design Decisions
/// - **Signed**: manual adjustment lines may be negative
/// - **Single field tuple struct**: zero-cost wrapper over `Decimal`
/// - **Serde**: serialized as a decimal string; deserializes from a string
///   or a JSON number (bills saved by the web app store plain numbers)
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Item.price ──► unit price / shared split ──► PersonTotal.amount        │
/// │                                                                         │
/// │  Bill.tax_amount + Bill.tip_amount ──► proportional distribution        │
/// │                                                                         │
/// │  Bill.total_amount ──► Discrepancy.remainder ──► Pix field 54           │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Wraps an exact decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use billsplit_core::money::Money;
    ///
    /// let price = Money::from_cents(1250);
    /// assert_eq!(price.to_fixed2(), "12.50");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// Returns zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Returns the underlying decimal.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is strictly positive.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is strictly negative.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a unit count.
    #[inline]
    pub fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// Divides the amount into `parts` equal shares.
    ///
    /// Returns `None` for zero parts instead of panicking.
    pub fn split_evenly(&self, parts: u64) -> Option<Self> {
        if parts == 0 {
            return None;
        }
        Some(Money(self.0 / Decimal::from(parts)))
    }

    /// Returns `self / whole` as a plain ratio, or `None` when `whole` is zero.
    pub fn ratio_of(&self, whole: Money) -> Option<Decimal> {
        if whole.is_zero() {
            return None;
        }
        Some(self.0 / whole.0)
    }

    /// Applies an integer percentage (`10` = 10 %).
    ///
    /// ## Example
    /// ```rust
    /// use billsplit_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(7650);
    /// assert_eq!(subtotal.percentage(10).to_fixed2(), "7.65");
    /// ```
    pub fn percentage(&self, percent: u32) -> Self {
        Money(self.0 * Decimal::from(percent) / Decimal::ONE_HUNDRED)
    }

    /// Rounds to cents, half away from zero.
    pub fn round_to_cents(&self) -> Self {
        let mut rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if rounded.is_zero() {
            rounded.set_sign_positive(true);
        }
        rounded.rescale(2);
        Money(rounded)
    }

    /// Formats with exactly two decimal places and a `.` separator.
    ///
    /// This is the Pix transaction-amount format (`"12.50"`).
    pub fn to_fixed2(&self) -> String {
        self.round_to_cents().0.to_string()
    }

    /// True when `|self - other| <= tolerance`.
    pub fn is_within(&self, other: Money, tolerance: Money) -> bool {
        (*self - other).abs() <= tolerance
    }
}

// =============================================================================
// Parsing
// =============================================================================

impl FromStr for Money {
    type Err = ValidationError;

    /// Parses a plain decimal (`"12.50"`, `"-3"`).
    ///
    /// Free-form user input such as `"R$ 12,50"` goes through
    /// [`crate::validation::parse_amount_input`] instead.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map(Money)
            .map_err(|_| ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: format!("'{}' is not a decimal number", s.trim()),
            })
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the value as reais rounded to cents (`R$ 12.50`).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.round_to_cents();
        if rounded.is_negative() {
            write!(f, "-R$ {}", rounded.abs().0)
        } else {
            write!(f, "R$ {}", rounded.0)
        }
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Scaling by a ratio (tax/tip distribution).
impl Mul<Decimal> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, ratio: Decimal) -> Self {
        Money(self.0 * ratio)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
