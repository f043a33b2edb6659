//! # Bill-Splitting Engine
//!
//! Turns item assignments into a per-person amount, with tax and tip spread
//! in proportion to what each person consumed.
//!
//! ## Per-Participant Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  for each item the participant has units on:                            │
//! │                                                                         │
//! │    quantity == 1 ──► price / Σ counts            (shared: pizza)        │
//! │    quantity  > 1 ──► price / quantity × units    (per unit: 4 beers)    │
//! │                                                                         │
//! │  ratio  = item share / Σ item prices                                    │
//! │  amount = item share + tax × ratio + tip × ratio                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is rounded here. Amounts stay exact decimals until they are shown
//! or written into a Pix payload.
//!
//! ## Discrepancy
//! The bill total minus the sum of all shares. Unclaimed items leave a
//! positive remainder, over-claimed multi-unit lines a negative one. It is
//! reported, never raised as an error.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Bill, Item, Participant, ParticipantId};

/// Remainders up to this size (R$ 0.05) count as balanced.
pub const DISCREPANCY_TOLERANCE: Money = Money::new(Decimal::from_parts(5, 0, 0, false, 2));

// =============================================================================
// Output Types
// =============================================================================

/// What one participant owes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PersonTotal {
    pub participant_id: ParticipantId,
    pub name: String,
    pub avatar_ref: String,
    pub is_current_user: bool,
    pub amount: Money,
}

/// Direction of an unbalanced split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscrepancyKind {
    Balanced,
    /// Money left on the table: something nobody claimed.
    UnderAssigned,
    /// Shares add up to more than the bill.
    OverAssigned,
}

/// Bill total minus the sum of the shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Discrepancy {
    pub remainder: Money,
    pub has_discrepancy: bool,
}

impl Discrepancy {
    pub fn kind(&self) -> DiscrepancyKind {
        if !self.has_discrepancy {
            DiscrepancyKind::Balanced
        } else if self.remainder.is_positive() {
            DiscrepancyKind::UnderAssigned
        } else {
            DiscrepancyKind::OverAssigned
        }
    }
}

/// Everything the summary screen shows for a bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SplitOutcome {
    /// Ranked, highest amount first.
    pub totals: Vec<PersonTotal>,
    pub discrepancy: Discrepancy,
    pub subtotal: Money,
    pub total: Money,
}

impl SplitOutcome {
    /// The local user's row, if there is one.
    pub fn current_user(&self) -> Option<&PersonTotal> {
        self.totals.iter().find(|t| t.is_current_user)
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Σ item prices.
pub fn subtotal(items: &[Item]) -> Money {
    items.iter().map(|item| item.price).sum()
}

/// Item cost attributable to one participant, before tax and tip.
fn item_share(item: &Item, participant_id: &str) -> Money {
    let units = item.units_for(participant_id);
    if units == 0 {
        return Money::zero();
    }

    if item.is_shared() {
        // Divided by the summed counts, so each consumer pays one unit's worth.
        item.price
            .split_evenly(item.total_assigned())
            .unwrap_or_else(Money::zero)
    } else {
        item.unit_price().multiply_quantity(units)
    }
}

/// Computes what each participant owes, in participant order.
///
/// `tax` and `tip` are resolved amounts. When the subtotal is zero there is
/// no ratio to distribute them by, so they are left out of every share and
/// show up in the discrepancy instead.
///
/// ## Example
/// ```rust
/// use billsplit_core::{compute_shares, Item, Money, Participant};
///
/// let people = vec![Participant::new("a", "Ana"), Participant::new("b", "Bia")];
/// let items = vec![Item::new("1", "Pizza", Money::from_cents(4000), 1)
///     .assigned("a", 1)
///     .assigned("b", 1)];
///
/// let totals = compute_shares(&items, &people, Money::zero(), Money::from_cents(400));
/// assert_eq!(totals[0].amount, Money::from_cents(2200));
/// assert_eq!(totals[1].amount, Money::from_cents(2200));
/// ```
pub fn compute_shares(
    items: &[Item],
    participants: &[Participant],
    tax: Money,
    tip: Money,
) -> Vec<PersonTotal> {
    let subtotal = subtotal(items);

    participants
        .iter()
        .map(|participant| {
            let consumed: Money = items
                .iter()
                .map(|item| item_share(item, &participant.id))
                .sum();

            let amount = match consumed.ratio_of(subtotal) {
                Some(ratio) => consumed + tax * ratio + tip * ratio,
                None => consumed,
            };

            PersonTotal {
                participant_id: participant.id.clone(),
                name: participant.name.clone(),
                avatar_ref: participant.avatar_ref.clone(),
                is_current_user: participant.is_current_user,
                amount,
            }
        })
        .collect()
}

/// Compares the bill total with the sum of the shares.
pub fn detect_discrepancy(total: Money, totals: &[PersonTotal]) -> Discrepancy {
    let assigned: Money = totals.iter().map(|t| t.amount).sum();
    let remainder = total - assigned;
    Discrepancy {
        remainder,
        has_discrepancy: remainder.abs() > DISCREPANCY_TOLERANCE,
    }
}

/// Sorts by amount, highest first. Ties keep their original order.
pub fn rank_totals(totals: &mut [PersonTotal]) {
    totals.sort_by(|a, b| b.amount.cmp(&a.amount));
}

/// Runs the whole pipeline: shares, discrepancy against the recomputed
/// total, ranking.
pub fn split_items(
    items: &[Item],
    participants: &[Participant],
    tax: Money,
    tip: Money,
) -> SplitOutcome {
    let mut totals = compute_shares(items, participants, tax, tip);
    let subtotal = subtotal(items);
    let total = subtotal + tax + tip;
    let discrepancy = detect_discrepancy(total, &totals);

    if discrepancy.has_discrepancy {
        debug!(
            remainder = %discrepancy.remainder,
            total = %total,
            "Split does not add up to the bill total"
        );
    }

    rank_totals(&mut totals);

    SplitOutcome {
        totals,
        discrepancy,
        subtotal,
        total,
    }
}

/// [`split_items`] over a saved bill.
///
/// The total is recomputed from the items, tax and tip rather than taken
/// from `bill.total_amount`, which may be stale for imported bills.
pub fn split_bill(bill: &Bill) -> SplitOutcome {
    split_items(
        &bill.items,
        &bill.participants,
        bill.tax_amount,
        bill.tip_amount,
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BillStatus;

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn people(ids: &[&str]) -> Vec<Participant> {
        ids.iter()
            .map(|id| Participant::new(*id, id.to_uppercase()))
            .collect()
    }

    fn amount_of(totals: &[PersonTotal], id: &str) -> Money {
        totals
            .iter()
            .find(|t| t.participant_id == id)
            .map(|t| t.amount)
            .unwrap()
    }

    fn bill(items: Vec<Item>, participants: Vec<Participant>, tax: Money, tip: Money) -> Bill {
        Bill {
            id: "b1".to_string(),
            establishment_name: "Bar do Zé".to_string(),
            date: "10/03/2024".to_string(),
            items,
            participants,
            tax_amount: tax,
            tip_amount: tip,
            total_amount: Money::zero(),
            status: BillStatus::Pending,
            current_user_share: Money::zero(),
            receipt_image_ref: None,
        }
    }

    #[test]
    fn test_shared_item_splits_equally() {
        let items = vec![Item::new("1", "Pizza", money("45"), 1)
            .assigned("a", 1)
            .assigned("b", 1)
            .assigned("c", 1)];
        let totals = compute_shares(
            &items,
            &people(&["a", "b", "c"]),
            Money::zero(),
            Money::zero(),
        );

        for t in &totals {
            assert_eq!(t.amount, money("15"));
        }
    }

    #[test]
    fn test_shared_item_divides_by_summed_counts() {
        let items = vec![Item::new("1", "Pizza", money("30"), 1)
            .assigned("a", 2)
            .assigned("b", 1)];
        let outcome = split_items(&items, &people(&["a", "b"]), Money::zero(), Money::zero());

        assert_eq!(amount_of(&outcome.totals, "a"), money("10"));
        assert_eq!(amount_of(&outcome.totals, "b"), money("10"));
        assert_eq!(outcome.discrepancy.remainder, money("10"));
        assert_eq!(outcome.discrepancy.kind(), DiscrepancyKind::UnderAssigned);
    }

    #[test]
    fn test_multi_unit_item_is_proportional() {
        let items = vec![Item::new("1", "Cerveja", money("40"), 4)
            .assigned("a", 2)
            .assigned("b", 1)];
        let totals = compute_shares(
            &items,
            &people(&["a", "b", "c"]),
            Money::zero(),
            Money::zero(),
        );

        assert_eq!(amount_of(&totals, "a"), money("20"));
        assert_eq!(amount_of(&totals, "b"), money("10"));
        assert_eq!(amount_of(&totals, "c"), Money::zero());
    }

    #[test]
    fn test_tax_and_tip_follow_consumption() {
        let items = vec![
            Item::new("1", "Prato", money("25"), 1).assigned("a", 1),
            Item::new("2", "Vinho", money("75"), 1).assigned("b", 1),
        ];
        let totals = compute_shares(&items, &people(&["a", "b"]), money("10"), money("5"));

        assert_eq!(amount_of(&totals, "a"), money("28.75"));
        assert_eq!(amount_of(&totals, "b"), money("86.25"));
    }

    #[test]
    fn test_full_assignment_conserves_total() {
        let items = vec![
            Item::new("1", "Pizza", money("45"), 1)
                .assigned("a", 1)
                .assigned("b", 1)
                .assigned("c", 1),
            Item::new("2", "Refri", money("10"), 1)
                .assigned("a", 1)
                .assigned("c", 1),
            Item::new("3", "Cerveja", money("33.30"), 3)
                .assigned("a", 1)
                .assigned("b", 2),
            Item::new("4", "Sobremesa", money("17.99"), 1).assigned("b", 1),
        ];
        let b = bill(
            items,
            people(&["a", "b", "c"]),
            money("7.77"),
            money("10.63"),
        );

        let outcome = split_bill(&b);
        let assigned: Money = outcome.totals.iter().map(|t| t.amount).sum();

        assert!(assigned.is_within(outcome.total, money("0.01")));
        assert!(!outcome.discrepancy.has_discrepancy);
        assert_eq!(outcome.discrepancy.kind(), DiscrepancyKind::Balanced);
    }

    #[test]
    fn test_unclaimed_item_leaves_positive_remainder() {
        let items = vec![
            Item::new("1", "Prato", money("30"), 1).assigned("a", 1),
            Item::new("2", "Sobremesa", money("20"), 1),
        ];
        let b = bill(items, people(&["a", "b"]), Money::zero(), Money::zero());

        let outcome = split_bill(&b);
        let remainder = outcome.discrepancy.remainder;
        assert!(remainder.is_within(money("20"), money("0.01")));
        assert!(outcome.discrepancy.has_discrepancy);
        assert_eq!(outcome.discrepancy.kind(), DiscrepancyKind::UnderAssigned);
    }

    #[test]
    fn test_over_claimed_units_leave_negative_remainder() {
        let items = vec![Item::new("1", "Cerveja", money("40"), 4)
            .assigned("a", 3)
            .assigned("b", 3)];
        let b = bill(items, people(&["a", "b"]), Money::zero(), Money::zero());

        let outcome = split_bill(&b);
        assert_eq!(outcome.discrepancy.remainder, money("-20"));
        assert_eq!(outcome.discrepancy.kind(), DiscrepancyKind::OverAssigned);
    }

    #[test]
    fn test_zero_subtotal_keeps_tax_out_of_shares() {
        let b = bill(vec![], people(&["a", "b"]), money("10"), money("2"));

        let outcome = split_bill(&b);
        assert!(outcome.totals.iter().all(|t| t.amount.is_zero()));
        assert_eq!(outcome.total, money("12"));
        assert_eq!(outcome.discrepancy.remainder, money("12"));
        assert!(outcome.discrepancy.has_discrepancy);
    }

    #[test]
    fn test_remainder_within_tolerance_is_balanced() {
        let totals = vec![PersonTotal {
            participant_id: "a".to_string(),
            name: "A".to_string(),
            avatar_ref: String::new(),
            is_current_user: false,
            amount: money("9.95"),
        }];
        assert!(!detect_discrepancy(money("10"), &totals).has_discrepancy);
        assert!(detect_discrepancy(money("10.01"), &totals).has_discrepancy);
    }

    #[test]
    fn test_zero_quantity_counts_as_shared() {
        let items = vec![Item::new("1", "Couvert", money("12"), 0)
            .assigned("a", 1)
            .assigned("b", 1)];
        let totals = compute_shares(&items, &people(&["a", "b"]), Money::zero(), Money::zero());
        assert_eq!(amount_of(&totals, "a"), money("6"));
    }

    #[test]
    fn test_output_keeps_participant_order_and_ranking_is_stable() {
        let items = vec![
            Item::new("1", "Prato", money("10"), 1).assigned("b", 1),
            Item::new("2", "Prato", money("30"), 1).assigned("c", 1),
            Item::new("3", "Prato", money("10"), 1).assigned("d", 1),
        ];
        let mut totals = compute_shares(
            &items,
            &people(&["a", "b", "c", "d"]),
            Money::zero(),
            Money::zero(),
        );

        let order: Vec<_> = totals.iter().map(|t| t.participant_id.as_str()).collect();
        assert_eq!(order, ["a", "b", "c", "d"]);

        rank_totals(&mut totals);
        let ranked: Vec<_> = totals.iter().map(|t| t.participant_id.as_str()).collect();
        assert_eq!(ranked, ["c", "b", "d", "a"]);
    }

    #[test]
    fn test_split_outcome_finds_current_user() {
        let participants = vec![
            Participant::new("me", "Eu").as_current_user(),
            Participant::new("p", "Paulo"),
        ];
        let items = vec![Item::new("1", "Prato", money("20"), 1).assigned("me", 1)];
        let outcome = split_bill(&bill(items, participants, Money::zero(), Money::zero()));

        let me = outcome.current_user().unwrap();
        assert_eq!(me.participant_id, "me");
        assert_eq!(me.amount, money("20"));
    }
}
