//! # Storage Backends
//!
//! The history repository talks to a [`BillStore`]: something that can hand
//! back the whole list of bills and take a new one.
//!
//! ```text
//! ┌───────────────┐        ┌───────────────────────────────────────────┐
//! │  BillHistory  │──────► │  BillStore                                │
//! │  (repository) │        │  ├── JsonFileStore  history.json on disk  │
//! └───────────────┘        │  └── MemoryStore    Mutex<Vec<Bill>>      │
//!                          └───────────────────────────────────────────┘
//! ```
//!
//! Order is significant: the first bill is the most recently saved one.

use std::sync::Mutex;

use billsplit_core::Bill;

use crate::error::{StoreError, StoreResult};

/// Whole-list storage of saved bills.
pub trait BillStore {
    /// Returns every saved bill, newest first. A store that has never been
    /// written returns an empty list.
    fn load(&self) -> StoreResult<Vec<Bill>>;

    /// Replaces the stored list.
    fn save(&self, bills: &[Bill]) -> StoreResult<()>;
}

impl<S: BillStore + ?Sized> BillStore for &S {
    fn load(&self) -> StoreResult<Vec<Bill>> {
        (**self).load()
    }

    fn save(&self, bills: &[Bill]) -> StoreResult<()> {
        (**self).save(bills)
    }
}

/// Keeps bills in memory. Used by tests and when embedding the history in
/// another process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    bills: Mutex<Vec<Bill>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Starts with an existing list.
    pub fn with_bills(bills: Vec<Bill>) -> Self {
        MemoryStore {
            bills: Mutex::new(bills),
        }
    }
}

impl BillStore for MemoryStore {
    fn load(&self) -> StoreResult<Vec<Bill>> {
        let bills = self.bills.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(bills.clone())
    }

    fn save(&self, bills: &[Bill]) -> StoreResult<()> {
        let mut stored = self.bills.lock().map_err(|_| StoreError::LockPoisoned)?;
        *stored = bills.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use billsplit_core::BillDraft;

    #[test]
    fn test_memory_store_starts_empty() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_memory_store_replaces_list() {
        let store = MemoryStore::new();
        let first = BillDraft::new().finish(Default::default());
        let second = BillDraft::new().finish(Default::default());

        store.save(&[first.clone(), second.clone()]).unwrap();
        assert_eq!(store.load().unwrap(), vec![first, second.clone()]);

        store.save(&[second.clone()]).unwrap();
        assert_eq!(store.load().unwrap(), vec![second]);
    }

    #[test]
    fn test_store_by_reference() {
        let store = MemoryStore::new();
        let by_ref: &MemoryStore = &store;
        let bill = BillDraft::new().finish(Default::default());
        by_ref.save(&[bill]).unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }
}
