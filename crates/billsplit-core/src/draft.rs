//! # Bill Draft
//!
//! The bill being reviewed: items read off the receipt, the people at the
//! table and who had what. A draft becomes a [`Bill`] when it is finished.
//!
//! ## Editing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Draft Operations                                 │
//! │                                                                         │
//! │  User Action              Draft Method                 State Change     │
//! │  ───────────              ────────────                 ────────────     │
//! │                                                                         │
//! │  Add person ────────────► add_participant() ─────────► participants +1  │
//! │  Remove person ─────────► remove_participant() ──────► assignments too  │
//! │  Tap "+" / "-" ─────────► update_assignment() ───────► units on item    │
//! │  "Tudo meu" ────────────► assign_all_to_current_user()                  │
//! │  Fix subtotal ──────────► reconcile_subtotal() ──────► adjustment item  │
//! │  Save ──────────────────► finish() ──────────────────► Bill             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Zero counts are never stored in an item's assignments
//! - A quantity-1 item holds at most one unit per participant
//! - Stepping up never pushes a multi-unit item past its quantity

use chrono::Local;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::avatar::avatar_ref;
use crate::error::{CoreError, CoreResult, ValidationResult};
use crate::money::Money;
use crate::pix::{PixPayload, PixRequest};
use crate::split::{compute_shares, split_items, subtotal, SplitOutcome};
use crate::types::{Bill, BillStatus, Item, Participant, TipOption};
use crate::validation::{validate_name, validate_quantity};

/// Establishment name until the user types one.
pub const DEFAULT_ESTABLISHMENT_NAME: &str = "Novo Estabelecimento";

/// Id of the local user in a fresh draft.
pub const CURRENT_USER_ID: &str = "me";

/// Display name of the local user in a fresh draft.
pub const CURRENT_USER_NAME: &str = "Eu";

/// Name of the line added by [`BillDraft::reconcile_subtotal`].
pub const ADJUSTMENT_ITEM_NAME: &str = "Ajuste / Correção";

/// Differences up to one cent are not worth an adjustment line.
const RECONCILE_TOLERANCE: Money = Money::new(Decimal::from_parts(1, 0, 0, false, 2));

/// A bill under review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillDraft {
    /// Set when editing a saved bill, so saving replaces it.
    pub existing_id: Option<String>,

    pub establishment_name: String,

    /// `DD/MM/YYYY`.
    pub date: String,

    pub items: Vec<Item>,

    pub participants: Vec<Participant>,

    pub tax_amount: Money,

    pub tip: TipOption,

    pub receipt_image_ref: Option<String>,
}

impl BillDraft {
    /// Creates an empty draft dated today with only the local user.
    pub fn new() -> Self {
        let mut me = Participant::new(CURRENT_USER_ID, CURRENT_USER_NAME).as_current_user();
        me.avatar_ref = avatar_ref(CURRENT_USER_NAME);

        BillDraft {
            existing_id: None,
            establishment_name: DEFAULT_ESTABLISHMENT_NAME.to_string(),
            date: Local::now().format("%d/%m/%Y").to_string(),
            items: Vec::new(),
            participants: vec![me],
            tax_amount: Money::zero(),
            tip: TipOption::default(),
            receipt_image_ref: None,
        }
    }

    /// Creates a draft holding items read off a receipt.
    pub fn with_items(items: Vec<Item>) -> Self {
        BillDraft {
            items,
            ..BillDraft::new()
        }
    }

    /// Reopens a saved bill for editing.
    ///
    /// Only the resolved tip amount is stored on a bill, so it comes back
    /// as a custom tip.
    pub fn from_bill(bill: &Bill) -> Self {
        BillDraft {
            existing_id: Some(bill.id.clone()),
            establishment_name: bill.establishment_name.clone(),
            date: bill.date.clone(),
            items: bill.items.clone(),
            participants: bill.participants.clone(),
            tax_amount: bill.tax_amount,
            tip: TipOption::Custom {
                amount: bill.tip_amount,
            },
            receipt_image_ref: bill.receipt_image_ref.clone(),
        }
    }

    // =========================================================================
    // Participants
    // =========================================================================

    /// Adds a person by name. Blank names are ignored.
    pub fn add_participant(&mut self, name: &str) -> Option<&Participant> {
        let name = validate_name("participant name", name).ok()?;

        let mut participant = Participant::new(format!("p-{}", Uuid::new_v4()), name);
        participant.avatar_ref = avatar_ref(name);

        self.participants.push(participant);
        self.participants.last()
    }

    /// Removes a person and every unit they had claimed.
    pub fn remove_participant(&mut self, participant_id: &str) -> CoreResult<Participant> {
        let idx = self
            .participants
            .iter()
            .position(|p| p.id == participant_id)
            .ok_or_else(|| CoreError::ParticipantNotFound(participant_id.to_string()))?;

        for item in &mut self.items {
            item.assignments.remove(participant_id);
        }

        Ok(self.participants.remove(idx))
    }

    fn current_user(&self) -> Option<&Participant> {
        self.participants.iter().find(|p| p.is_current_user)
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Adds an unassigned line. `price` is the line total.
    pub fn add_item(&mut self, name: &str, price: Money, quantity: u32) -> CoreResult<&Item> {
        let name = validate_name("item name", name)?;
        validate_quantity(quantity)?;

        let idx = self.items.len();
        self.items
            .push(Item::new(Uuid::new_v4().to_string(), name, price, quantity));
        Ok(&self.items[idx])
    }

    pub fn delete_item(&mut self, item_id: &str) -> CoreResult<Item> {
        let idx = self
            .items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| CoreError::ItemNotFound(item_id.to_string()))?;
        Ok(self.items.remove(idx))
    }

    /// Steps a participant's units on an item by `change` and returns the new
    /// count.
    ///
    /// ## Rules
    /// - The count never goes below zero
    /// - Stepping up a quantity-1 item toggles it on or off
    /// - Stepping up a multi-unit item past its quantity resets the count to
    ///   zero (the stepper wraps around)
    /// - A zero count removes the participant from the item
    pub fn update_assignment(
        &mut self,
        item_id: &str,
        participant_id: &str,
        change: i32,
    ) -> CoreResult<u32> {
        if !self.participants.iter().any(|p| p.id == participant_id) {
            return Err(CoreError::ParticipantNotFound(participant_id.to_string()));
        }
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| CoreError::ItemNotFound(item_id.to_string()))?;

        let current = item.units_for(participant_id);
        let stepped = (i64::from(current) + i64::from(change)).max(0);
        let mut units = u32::try_from(stepped).unwrap_or(u32::MAX);

        if change > 0 {
            if item.is_shared() {
                units = if current > 0 { 0 } else { 1 };
            } else {
                let others = item.total_assigned() - u64::from(current);
                if others + u64::from(units) > u64::from(item.effective_quantity()) {
                    units = 0;
                }
            }
        }

        if units == 0 {
            item.assignments.remove(participant_id);
        } else {
            item.assignments.insert(participant_id.to_string(), units);
        }

        Ok(units)
    }

    /// Gives the local user one unit of every item they have not claimed yet.
    ///
    /// Returns how many items changed.
    pub fn assign_all_to_current_user(&mut self) -> CoreResult<usize> {
        let me = self
            .current_user()
            .map(|p| p.id.clone())
            .ok_or(CoreError::NoCurrentUser)?;

        let mut changed = 0;
        for item in &mut self.items {
            if item.units_for(&me) == 0 {
                item.assignments.insert(me.clone(), 1);
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// Matches the item subtotal to the one printed on the receipt.
    ///
    /// When they differ by more than a cent an unassigned adjustment line
    /// for the difference is appended (negative when the receipt is lower)
    /// and returned.
    pub fn reconcile_subtotal(&mut self, observed: Money) -> Option<&Item> {
        let difference = observed - self.subtotal();
        if difference.abs() <= RECONCILE_TOLERANCE {
            return None;
        }

        debug!(difference = %difference, "Adding subtotal adjustment");
        self.items.push(Item::new(
            format!("adjustment-{}", Uuid::new_v4()),
            ADJUSTMENT_ITEM_NAME,
            difference,
            1,
        ));
        self.items.last()
    }

    // =========================================================================
    // Totals
    // =========================================================================

    pub fn subtotal(&self) -> Money {
        subtotal(&self.items)
    }

    /// The tip resolved against the current subtotal.
    pub fn tip_amount(&self) -> Money {
        self.tip.resolve(self.subtotal())
    }

    pub fn total(&self) -> Money {
        self.subtotal() + self.tax_amount + self.tip_amount()
    }

    pub fn split(&self) -> SplitOutcome {
        split_items(
            &self.items,
            &self.participants,
            self.tax_amount,
            self.tip_amount(),
        )
    }

    /// What the local user owes (zero without a local user).
    pub fn current_user_share(&self) -> Money {
        compute_shares(
            &self.items,
            &self.participants,
            self.tax_amount,
            self.tip_amount(),
        )
        .into_iter()
        .find(|t| t.is_current_user)
        .map(|t| t.amount)
        .unwrap_or_default()
    }

    /// Pix charge for the whole bill, to be paid to the local user.
    ///
    /// The payee name falls back to the local user's name, then to
    /// `fallback_name`.
    pub fn pix_request(
        &self,
        key: &str,
        payee_name: Option<&str>,
        city: &str,
        fallback_name: &str,
    ) -> PixRequest {
        let name = payee_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .or_else(|| self.current_user().map(|p| p.name.as_str()))
            .unwrap_or(fallback_name);

        PixRequest::new(key, name, city, self.total())
    }

    /// [`BillDraft::pix_request`] encoded with the default reference label.
    pub fn pix_payload(
        &self,
        key: &str,
        payee_name: Option<&str>,
        city: &str,
        fallback_name: &str,
    ) -> ValidationResult<PixPayload> {
        self.pix_request(key, payee_name, city, fallback_name)
            .build()
    }

    /// Materializes the bill. Editing keeps the original id.
    pub fn finish(&self, status: BillStatus) -> Bill {
        let id = self
            .existing_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Bill {
            id,
            establishment_name: self.establishment_name.clone(),
            date: self.date.clone(),
            items: self.items.clone(),
            participants: self.participants.clone(),
            tax_amount: self.tax_amount,
            tip_amount: self.tip_amount(),
            total_amount: self.total(),
            status,
            current_user_share: self.current_user_share(),
            receipt_image_ref: self.receipt_image_ref.clone(),
        }
    }
}

impl Default for BillDraft {
    fn default() -> Self {
        Self::new()
    }
}
