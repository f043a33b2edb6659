//! # Bill History Repository
//!
//! Saved bills, newest first, behind any [`BillStore`].
//!
//! ## Query Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stored bills                                                           │
//! │       │                                                                 │
//! │       ▼  search    establishment name contains term (case-insensitive)  │
//! │       ▼  status    paid | pending | overdue (optional)                  │
//! │       ▼  sort      by parsed bill date, desc (default) or asc           │
//! │       │            unparseable dates count as the oldest                │
//! │       ▼  page      1-based, `page_size` per page, clamped to last page  │
//! │       │                                                                 │
//! │  HistoryPage { bills, page, total_pages, total_matches }                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every write is a full load → modify → save cycle through the store.

use std::cmp::Reverse;

use billsplit_core::{Bill, BillStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::date::parse_bill_date;
use crate::error::{StoreError, StoreResult};
use crate::store::BillStore;

/// Bills per history page.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Longest run of page links shown without gaps.
const MAX_PAGE_LINKS: usize = 5;

// =============================================================================
// Query Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Most recent first.
    #[default]
    Desc,
    Asc,
}

/// Search, filter and paging options for [`BillHistory::query`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryQuery {
    pub search: Option<String>,
    pub status: Option<BillStatus>,
    pub order: SortOrder,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        HistoryQuery {
            search: None,
            status: None,
            order: SortOrder::Desc,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl HistoryQuery {
    fn matches(&self, bill: &Bill) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => bill
                .establishment_name
                .to_lowercase()
                .contains(&term.to_lowercase()),
            _ => true,
        };
        let matches_status = self.status.map_or(true, |s| bill.status == s);
        matches_search && matches_status
    }
}

/// One entry of a pager: a page number or an elided run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageLink {
    Page(usize),
    Gap,
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPage {
    pub bills: Vec<Bill>,
    /// The page actually returned, after clamping.
    pub page: usize,
    /// Zero when nothing matched.
    pub total_pages: usize,
    pub total_matches: usize,
}

impl HistoryPage {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Compact pager around the current page.
    ///
    /// ```text
    /// 7 pages, on 1:  1 2 3 … 7
    /// 7 pages, on 4:  1 … 4 … 7
    /// 7 pages, on 6:  1 … 5 6 7
    /// ```
    pub fn page_links(&self) -> Vec<PageLink> {
        let total = self.total_pages;
        if total <= MAX_PAGE_LINKS {
            return (1..=total).map(PageLink::Page).collect();
        }

        let current = self.page;
        if current <= 3 {
            vec![
                PageLink::Page(1),
                PageLink::Page(2),
                PageLink::Page(3),
                PageLink::Gap,
                PageLink::Page(total),
            ]
        } else if current >= total - 2 {
            vec![
                PageLink::Page(1),
                PageLink::Gap,
                PageLink::Page(total - 2),
                PageLink::Page(total - 1),
                PageLink::Page(total),
            ]
        } else {
            vec![
                PageLink::Page(1),
                PageLink::Gap,
                PageLink::Page(current),
                PageLink::Gap,
                PageLink::Page(total),
            ]
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for saved bills.
///
/// ## Usage
/// ```rust
/// use billsplit_core::{BillDraft, BillStatus};
/// use billsplit_store::{BillHistory, HistoryQuery, MemoryStore};
///
/// let history = BillHistory::new(MemoryStore::new());
/// let bill = BillDraft::new().finish(BillStatus::Pending);
/// history.upsert(bill.clone()).unwrap();
///
/// history.update_status(&bill.id, BillStatus::Paid).unwrap();
/// let page = history.query(&HistoryQuery::default()).unwrap();
/// assert_eq!(page.bills[0].status, BillStatus::Paid);
/// ```
#[derive(Debug, Clone)]
pub struct BillHistory<S> {
    store: S,
}

impl<S: BillStore> BillHistory<S> {
    pub fn new(store: S) -> Self {
        BillHistory { store }
    }

    /// Every saved bill, most recently saved first.
    pub fn list(&self) -> StoreResult<Vec<Bill>> {
        self.store.load()
    }

    pub fn get(&self, id: &str) -> StoreResult<Bill> {
        self.store
            .load()?
            .into_iter()
            .find(|b| b.id == id)
            .ok_or_else(|| StoreError::not_found("Bill", id))
    }

    /// Saves a bill at the top of the history, replacing any bill with the
    /// same id.
    pub fn upsert(&self, bill: Bill) -> StoreResult<()> {
        let mut bills = self.store.load()?;
        let before = bills.len();
        bills.retain(|b| b.id != bill.id);

        if bills.len() < before {
            debug!(bill_id = %bill.id, "Replacing saved bill");
        } else {
            info!(bill_id = %bill.id, name = %bill.establishment_name, "Saving new bill");
        }

        bills.insert(0, bill);
        self.store.save(&bills)
    }

    /// Changes a bill's status in place. Returns the updated bill.
    pub fn update_status(&self, id: &str, status: BillStatus) -> StoreResult<Bill> {
        let mut bills = self.store.load()?;
        let bill = bills
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| StoreError::not_found("Bill", id))?;

        bill.status = status;
        let updated = bill.clone();
        self.store.save(&bills)?;

        info!(bill_id = %id, status = %status, "Bill status changed");
        Ok(updated)
    }

    /// Removes a bill. Returns the removed bill.
    pub fn delete(&self, id: &str) -> StoreResult<Bill> {
        let mut bills = self.store.load()?;
        let idx = bills
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| StoreError::not_found("Bill", id))?;

        let removed = bills.remove(idx);
        self.store.save(&bills)?;

        info!(bill_id = %id, "Bill deleted");
        Ok(removed)
    }

    /// Searches, filters, sorts and pages the history.
    pub fn query(&self, query: &HistoryQuery) -> StoreResult<HistoryPage> {
        let mut matches: Vec<(Option<NaiveDate>, Bill)> = self
            .store
            .load()?
            .into_iter()
            .filter(|b| query.matches(b))
            .map(|b| (parse_bill_date(&b.date), b))
            .collect();

        // `None < Some(_)`, so undated bills land last in descending order
        // and first in ascending order. Both sorts are stable.
        match query.order {
            SortOrder::Desc => matches.sort_by_key(|(date, _)| Reverse(*date)),
            SortOrder::Asc => matches.sort_by_key(|(date, _)| *date),
        }

        let page_size = query.page_size.max(1);
        let total_matches = matches.len();
        let total_pages = total_matches.div_ceil(page_size);
        let page = query.page.clamp(1, total_pages.max(1));

        let bills = matches
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .map(|(_, bill)| bill)
            .collect();

        debug!(total_matches, page, total_pages, "History query");

        Ok(HistoryPage {
            bills,
            page,
            total_pages,
            total_matches,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use billsplit_core::Money;

    fn bill(id: &str, name: &str, date: &str, status: BillStatus) -> Bill {
        Bill {
            id: id.to_string(),
            establishment_name: name.to_string(),
            date: date.to_string(),
            items: vec![],
            participants: vec![],
            tax_amount: Money::zero(),
            tip_amount: Money::zero(),
            total_amount: Money::from_cents(1000),
            status,
            current_user_share: Money::zero(),
            receipt_image_ref: None,
        }
    }

    /// Stored order (newest save first) deliberately differs from date order.
    fn seeded() -> BillHistory<MemoryStore> {
        BillHistory::new(MemoryStore::with_bills(vec![
            bill("1", "Pizzaria Napoli", "28 Out, 2023", BillStatus::Paid),
            bill("2", "Bar do Zé", "25 Out, 2023", BillStatus::Pending),
            bill(
                "3",
                "Supermercado Central",
                "22 Out, 2023",
                BillStatus::Overdue,
            ),
            bill("4", "Padaria Pão Quente", "03/01/2024", BillStatus::Pending),
            bill("5", "Boteco do Zé", "sem data", BillStatus::Pending),
            bill("6", "Churrascaria Gaúcha", "15/11/2023", BillStatus::Paid),
            bill("7", "Bar Central", "01/12/2023", BillStatus::Pending),
        ]))
    }

    fn ids(page: &HistoryPage) -> Vec<&str> {
        page.bills.iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn test_default_query_sorts_newest_first() {
        let page = seeded().query(&HistoryQuery::default()).unwrap();
        assert_eq!(ids(&page), ["4", "7", "6", "1", "2"]);
        assert_eq!(page.total_matches, 7);
        assert_eq!(page.total_pages, 2);
        assert!(page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn test_second_page_and_undated_last() {
        let query = HistoryQuery {
            page: 2,
            ..Default::default()
        };
        let page = seeded().query(&query).unwrap();
        assert_eq!(ids(&page), ["3", "5"]);
        assert!(!page.has_next());
    }

    #[test]
    fn test_ascending_order() {
        let query = HistoryQuery {
            order: SortOrder::Asc,
            page_size: 10,
            ..Default::default()
        };
        let page = seeded().query(&query).unwrap();
        assert_eq!(ids(&page), ["5", "3", "2", "1", "6", "7", "4"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let query = HistoryQuery {
            search: Some("  bar ".to_string()),
            ..Default::default()
        };
        let page = seeded().query(&query).unwrap();
        assert_eq!(ids(&page), ["7", "2"]);

        let query = HistoryQuery {
            search: Some("DO ZÉ".to_string()),
            ..Default::default()
        };
        assert_eq!(seeded().query(&query).unwrap().total_matches, 2);
    }

    #[test]
    fn test_status_filter() {
        let query = HistoryQuery {
            status: Some(BillStatus::Paid),
            ..Default::default()
        };
        let page = seeded().query(&query).unwrap();
        assert_eq!(ids(&page), ["6", "1"]);
    }

    #[test]
    fn test_page_past_end_is_clamped() {
        let query = HistoryQuery {
            page: 99,
            ..Default::default()
        };
        let page = seeded().query(&query).unwrap();
        assert_eq!(page.page, 2);

        let query = HistoryQuery {
            page: 0,
            ..Default::default()
        };
        assert_eq!(seeded().query(&query).unwrap().page, 1);
    }

    #[test]
    fn test_empty_result() {
        let query = HistoryQuery {
            search: Some("nada".to_string()),
            page: 3,
            ..Default::default()
        };
        let page = seeded().query(&query).unwrap();
        assert!(page.bills.is_empty());
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 0);
        assert!(page.page_links().is_empty());
    }

    #[test]
    fn test_upsert_puts_bill_first_and_replaces() {
        let history = seeded();
        history
            .upsert(bill("8", "Novo", "02/02/2024", BillStatus::Pending))
            .unwrap();
        assert_eq!(history.list().unwrap()[0].id, "8");
        assert_eq!(history.list().unwrap().len(), 8);

        history
            .upsert(bill("3", "Mercado Renomeado", "22/10/2023", BillStatus::Paid))
            .unwrap();
        let bills = history.list().unwrap();
        assert_eq!(bills.len(), 8);
        assert_eq!(bills[0].id, "3");
        assert_eq!(bills[0].establishment_name, "Mercado Renomeado");
    }

    #[test]
    fn test_get_update_status_and_delete() {
        let history = seeded();
        assert_eq!(history.get("2").unwrap().establishment_name, "Bar do Zé");

        let updated = history.update_status("2", BillStatus::Paid).unwrap();
        assert_eq!(updated.status, BillStatus::Paid);
        assert_eq!(history.get("2").unwrap().status, BillStatus::Paid);

        let removed = history.delete("2").unwrap();
        assert_eq!(removed.id, "2");
        assert!(history.get("2").unwrap_err().is_not_found());
        assert!(history.delete("2").unwrap_err().is_not_found());
        assert!(history
            .update_status("missing", BillStatus::Paid)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_page_links() {
        let page = |page, total_pages| HistoryPage {
            bills: vec![],
            page,
            total_pages,
            total_matches: total_pages * 5,
        };
        use PageLink::{Gap, Page};

        assert_eq!(
            page(2, 4).page_links(),
            [Page(1), Page(2), Page(3), Page(4)]
        );
        assert_eq!(
            page(1, 7).page_links(),
            [Page(1), Page(2), Page(3), Gap, Page(7)]
        );
        assert_eq!(
            page(4, 7).page_links(),
            [Page(1), Gap, Page(4), Gap, Page(7)]
        );
        assert_eq!(
            page(6, 7).page_links(),
            [Page(1), Gap, Page(5), Page(6), Page(7)]
        );
    }
}
