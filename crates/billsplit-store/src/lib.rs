//! # billsplit-store: Bill History Storage
//!
//! Keeps saved bills and answers the history screen's questions: search by
//! establishment, filter by status, sort by date, page through results.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        billsplit Data Flow                              │
//! │                                                                         │
//! │  CLI command (history list --search bar)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                  billsplit-store (THIS CRATE)                   │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐    │    │
//! │  │   │  BillHistory  │───►│   BillStore   │    │    date      │    │    │
//! │  │   │ (repository)  │    │ JsonFileStore │    │ DD/MM/YYYY   │    │    │
//! │  │   │ query, upsert │    │ MemoryStore   │    │ DD Mmm, YYYY │    │    │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘    │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │  history.json                                                   │    │
//! │  │  ~/.local/share/billsplit/history.json (per-platform data dir)  │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - `BillStore` trait and the in-memory backend
//! - [`file`] - JSON file backend
//! - [`repository`] - History repository
//! - [`date`] - Bill date parsing
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use billsplit_store::{BillHistory, HistoryQuery, JsonFileStore};
//!
//! let history = BillHistory::new(JsonFileStore::new("history.json"));
//! let page = history.query(&HistoryQuery::default())?;
//! for bill in &page.bills {
//!     println!("{} {}", bill.date, bill.establishment_name);
//! }
//! # Ok::<(), billsplit_store::StoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod date;
pub mod error;
pub mod file;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use date::parse_bill_date;
pub use error::{StoreError, StoreResult};
pub use file::JsonFileStore;
pub use store::{BillStore, MemoryStore};

// Repository re-exports for convenience
pub use repository::history::{
    BillHistory, HistoryPage, HistoryQuery, PageLink, SortOrder, DEFAULT_PAGE_SIZE,
};
