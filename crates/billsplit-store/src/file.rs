//! # JSON File Backend
//!
//! Stores the history as one pretty-printed JSON array, the same shape the
//! web app kept under its `bill_history` key, so exported histories load
//! unchanged.
//!
//! ## Save Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. create parent directory (first save)                                │
//! │  2. write  history.json.tmp                                             │
//! │  3. rename history.json.tmp → history.json   (atomic on one filesystem) │
//! │                                                                         │
//! │  A crash between 2 and 3 leaves the previous history intact.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use billsplit_core::Bill;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::store::BillStore;

/// History kept in a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Points at `path`. Nothing is touched until the first load or save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "history.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl BillStore for JsonFileStore {
    fn load(&self) -> StoreResult<Vec<Bill>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No history file yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let bills: Vec<Bill> = serde_json::from_str(&text).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), count = bills.len(), "Loaded history");
        Ok(bills)
    }

    fn save(&self, bills: &[Bill]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                info!(dir = %parent.display(), "Creating history directory");
                fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
        }

        let json = serde_json::to_string_pretty(bills)?;
        let temp = self.temp_path();

        fs::write(&temp, json).map_err(|e| StoreError::io(&temp, e))?;
        fs::rename(&temp, &self.path).map_err(|e| StoreError::io(&self.path, e))?;

        debug!(path = %self.path.display(), count = bills.len(), "Saved history");
        Ok(())
    }
}
