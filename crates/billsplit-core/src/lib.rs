//! # billsplit-core: Receipt Splitting and Pix Payloads
//!
//! Pure logic for dividing a restaurant bill among the people at the table
//! and for charging them through a static Pix QR code. No I/O happens here.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        billsplit Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                    billsplit CLI (apps/cli)                     │    │
//! │  │      split ──► pix ──► history list / show / import / status    │    │
//! │  └───────────────┬─────────────────────────────────┬───────────────┘    │
//! │                  │                                 │                    │
//! │  ┌───────────────▼─────────────────────────┐       │                    │
//! │  │        ★ billsplit-core (THIS CRATE) ★  │       │                    │
//! │  │                                         │       │                    │
//! │  │   ┌────────┐ ┌────────┐ ┌────────────┐  │       │                    │
//! │  │   │ split  │ │ draft  │ │ pix        │  │       │                    │
//! │  │   │ engine │ │ editor │ │  ├ emv     │  │       │                    │
//! │  │   └────────┘ └────────┘ │  └ checksum│  │       │                    │
//! │  │   ┌────────┐ ┌────────┐ └────────────┘  │       │                    │
//! │  │   │ money  │ │ avatar │                 │       │                    │
//! │  │   └────────┘ └────────┘                 │       │                    │
//! │  │   NO I/O • NO STORAGE • NO NETWORK      │       │                    │
//! │  └─────────────────────────────────────────┘       │                    │
//! │                                                    │                    │
//! │  ┌─────────────────────────────────────────────────▼───────────────┐    │
//! │  │               billsplit-store (history of saved bills)          │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Bill, Item, Participant, tip options
//! - [`money`] - Exact decimal money
//! - [`split`] - Per-person shares, discrepancy, ranking
//! - [`draft`] - Editing a bill before it is saved
//! - [`pix`] - Static Pix payload (built on [`emv`] and [`checksum`])
//! - [`avatar`] - Avatar style from a first name
//! - [`validation`] - Input checks and amount parsing
//! - [`error`] - Error types
//!
//! ## Example Usage
//!
//! ```rust
//! use billsplit_core::{split_items, Item, Money, Participant};
//!
//! let people = vec![
//!     Participant::new("me", "Eu").as_current_user(),
//!     Participant::new("p-1", "Ana"),
//! ];
//! let items = vec![
//!     Item::new("1", "Pizza", Money::from_cents(4500), 1).assigned("me", 1).assigned("p-1", 1),
//!     Item::new("2", "Cerveja", Money::from_cents(3000), 3).assigned("me", 2).assigned("p-1", 1),
//! ];
//!
//! let outcome = split_items(&items, &people, Money::zero(), Money::from_cents(750));
//! assert_eq!(outcome.totals[0].participant_id, "me");
//! assert_eq!(outcome.totals[0].amount.to_fixed2(), "46.75");
//! assert!(!outcome.discrepancy.has_discrepancy);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod avatar;
pub mod checksum;
pub mod draft;
pub mod emv;
pub mod error;
pub mod money;
pub mod pix;
pub mod split;
pub mod text;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use draft::BillDraft;
pub use error::{CoreError, CoreResult, ValidationError, ValidationResult};
pub use money::Money;
pub use pix::{build_pix_payload, verify_payload, PixPayload, PixRequest};
pub use split::{
    compute_shares, detect_discrepancy, rank_totals, split_bill, split_items, Discrepancy,
    DiscrepancyKind, PersonTotal, SplitOutcome, DISCREPANCY_TOLERANCE,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Longest value an EMV field can carry (its length is two digits).
pub const MAX_EMV_VALUE_LEN: usize = 99;

/// Maximum units on a single receipt line.
///
/// Catches typos such as `1000` for `10` when a line is added by hand.
pub const MAX_ITEM_QUANTITY: u32 = 999;
