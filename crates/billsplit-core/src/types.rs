//! # Domain Types
//!
//! Core domain types used throughout billsplit.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │      Bill       │   │      Item       │   │  Participant    │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  id             │──►│  id             │   │  id             │        │
//! │  │  items[]        │   │  price (line)   │   │  name           │        │
//! │  │  participants[] │   │  quantity       │   │  avatar_ref     │        │
//! │  │  tax / tip      │   │  assignments ───┼──►│  is_current_user│        │
//! │  │  status         │   └─────────────────┘   └─────────────────┘        │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │   BillStatus    │   │   TipOption     │   │  PersonTotal    │        │
//! │  │  Paid           │   │  Fixed(0|10|15) │   │  (engine output)│        │
//! │  │  Pending        │   │  Custom(amount) │   │                 │        │
//! │  │  Overdue        │   └─────────────────┘   └─────────────────┘        │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Names
//! Fields serialize in camelCase. Bills written by the web app used shorter
//! names (`name`, `total`, `tax`, `tip`, `share`, `image`, `avatar`); those
//! are accepted as aliases so old history files keep loading.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

/// Participant ids are plain strings (`"me"`, `"p-<uuid>"`).
pub type ParticipantId = String;

// =============================================================================
// Item
// =============================================================================

/// A receipt line: total price for `quantity` units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Item {
    pub id: String,

    pub name: String,

    /// TOTAL price for the line, not the unit price.
    pub price: Money,

    /// Units on the line. `1` means the item is shared.
    pub quantity: u32,

    /// Units consumed per participant. Zero counts are never stored.
    #[serde(default)]
    pub assignments: BTreeMap<ParticipantId, u32>,
}

impl Item {
    /// Creates an unassigned item.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        quantity: u32,
    ) -> Self {
        Item {
            id: id.into(),
            name: name.into(),
            price,
            quantity,
            assignments: BTreeMap::new(),
        }
    }

    /// Builder-style assignment, mostly for tests and fixtures.
    pub fn assigned(mut self, participant_id: impl Into<String>, units: u32) -> Self {
        if units > 0 {
            self.assignments.insert(participant_id.into(), units);
        }
        self
    }

    /// Quantity clamped to at least one unit.
    #[inline]
    pub fn effective_quantity(&self) -> u32 {
        self.quantity.max(1)
    }

    /// Whether the line is split evenly among its consumers.
    #[inline]
    pub fn is_shared(&self) -> bool {
        self.effective_quantity() == 1
    }

    /// Units recorded for one participant (0 when absent).
    #[inline]
    pub fn units_for(&self, participant_id: &str) -> u32 {
        self.assignments.get(participant_id).copied().unwrap_or(0)
    }

    /// Sum of all recorded units, widened so imported counts cannot overflow.
    pub fn total_assigned(&self) -> u64 {
        self.assignments
            .values()
            .map(|&units| u64::from(units))
            .sum()
    }

    /// Price of a single unit.
    pub fn unit_price(&self) -> Money {
        self.price
            .split_evenly(u64::from(self.effective_quantity()))
            .unwrap_or(self.price)
    }
}

// =============================================================================
// Participant
// =============================================================================

/// A person the bill is divided among.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Participant {
    pub id: ParticipantId,

    pub name: String,

    /// Opaque avatar reference (a URL today).
    #[serde(alias = "avatar", default)]
    pub avatar_ref: String,

    /// The local user. At most one per bill.
    #[serde(default)]
    pub is_current_user: bool,
}

impl Participant {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Participant {
            id: id.into(),
            name: name.into(),
            avatar_ref: String::new(),
            is_current_user: false,
        }
    }

    /// Marks this participant as the local user.
    pub fn as_current_user(mut self) -> Self {
        self.is_current_user = true;
        self
    }

    /// First word of the name, as shown in compact lists.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("")
    }
}

// =============================================================================
// Bill Status
// =============================================================================

/// Settlement status of a saved bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum BillStatus {
    Paid,
    #[default]
    Pending,
    Overdue,
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillStatus::Paid => write!(f, "paid"),
            BillStatus::Pending => write!(f, "pending"),
            BillStatus::Overdue => write!(f, "overdue"),
        }
    }
}

impl FromStr for BillStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "paid" => Ok(BillStatus::Paid),
            "pending" => Ok(BillStatus::Pending),
            "overdue" => Ok(BillStatus::Overdue),
            other => Err(ValidationError::InvalidFormat {
                field: "status".to_string(),
                reason: format!("'{}' is not one of paid, pending, overdue", other),
            }),
        }
    }
}

// =============================================================================
// Bill
// =============================================================================

/// A saved receipt split. Unit of persistence; the engine only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Bill {
    pub id: String,

    #[serde(alias = "name")]
    pub establishment_name: String,

    /// Free-form date as entered (`DD/MM/YYYY` for new bills).
    pub date: String,

    #[serde(default)]
    pub items: Vec<Item>,

    #[serde(default)]
    pub participants: Vec<Participant>,

    #[serde(alias = "tax", default)]
    pub tax_amount: Money,

    #[serde(alias = "tip", default)]
    pub tip_amount: Money,

    /// Σ item prices + tax + tip, as computed when the bill was saved.
    #[serde(alias = "total", default)]
    pub total_amount: Money,

    #[serde(default)]
    pub status: BillStatus,

    #[serde(alias = "share", default)]
    pub current_user_share: Money,

    /// Opaque receipt image handle (base64 data URL in the web app).
    #[serde(alias = "image", default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub receipt_image_ref: Option<String>,
}

impl Bill {
    /// Σ item prices.
    pub fn subtotal(&self) -> Money {
        crate::split::subtotal(&self.items)
    }

    /// Subtotal + tax + tip, recomputed from the items.
    pub fn computed_total(&self) -> Money {
        self.subtotal() + self.tax_amount + self.tip_amount
    }

    /// The participant flagged as the local user, if any.
    pub fn current_user(&self) -> Option<&Participant> {
        self.participants.iter().find(|p| p.is_current_user)
    }
}

// =============================================================================
// Tip Option
// =============================================================================

/// The preset tip percentages offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum TipPercent {
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "15")]
    Fifteen,
}

impl TipPercent {
    pub fn value(&self) -> u32 {
        match self {
            TipPercent::Zero => 0,
            TipPercent::Ten => 10,
            TipPercent::Fifteen => 15,
        }
    }
}

impl TryFrom<u32> for TipPercent {
    type Error = ValidationError;

    fn try_from(percent: u32) -> Result<Self, Self::Error> {
        match percent {
            0 => Ok(TipPercent::Zero),
            10 => Ok(TipPercent::Ten),
            15 => Ok(TipPercent::Fifteen),
            _ => Err(ValidationError::InvalidFormat {
                field: "tip percent".to_string(),
                reason: "must be 0, 10 or 15".to_string(),
            }),
        }
    }
}

/// How the tip is chosen. Resolved to an amount before splitting.
///
/// ```json
/// { "kind": "fixed", "percent": "10" }
/// { "kind": "custom", "amount": "12.00" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "lowercase")]
#[ts(export)]
pub enum TipOption {
    Fixed { percent: TipPercent },
    Custom { amount: Money },
}

impl Default for TipOption {
    fn default() -> Self {
        TipOption::Fixed {
            percent: TipPercent::Ten,
        }
    }
}

impl TipOption {
    /// Resolves the tip against the item subtotal.
    ///
    /// ## Example
    /// ```rust
    /// use billsplit_core::{Money, TipOption, TipPercent};
    ///
    /// let tip = TipOption::Fixed { percent: TipPercent::Ten };
    /// assert_eq!(tip.resolve(Money::from_cents(7650)), Money::from_cents(765));
    /// ```
    pub fn resolve(&self, subtotal: Money) -> Money {
        match self {
            TipOption::Fixed { percent } => subtotal.percentage(percent.value()),
            TipOption::Custom { amount } => *amount,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
