//! # Repository Module
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CLI command                                                            │
//! │       │                                                                 │
//! │       │  history.query(&HistoryQuery { search: "bar", .. })             │
//! │       ▼                                                                 │
//! │  BillHistory<S>                                                         │
//! │  ├── list / get                                                         │
//! │  ├── upsert / update_status / delete                                    │
//! │  └── query                                                              │
//! │       │                                                                 │
//! │       │  load() / save(&[Bill])                                         │
//! │       ▼                                                                 │
//! │  S: BillStore (JsonFileStore, MemoryStore)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`BillHistory`](history::BillHistory) - Saved bills with search and paging

pub mod history;
