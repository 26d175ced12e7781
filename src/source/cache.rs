//! Per-session fetch cache.
//!
//! Normalized records are cached by the exact `(start, end)` fetch range so
//! repeated queries over the same range never hit the source again. The cache
//! is append-only for the lifetime of a session; there is no invalidation.

use chrono::NaiveDate;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::ShiftRecord;

/// Read-through cache of normalized shift records keyed by fetch range.
#[derive(Debug, Default)]
pub struct FetchCache {
    entries: RwLock<HashMap<(NaiveDate, NaiveDate), Arc<Vec<ShiftRecord>>>>,
}

impl FetchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, start: NaiveDate, end: NaiveDate) -> Option<Arc<Vec<ShiftRecord>>> {
        self.entries.read().get(&(start, end)).cloned()
    }

    /// Store records for a range and return the shared handle.
    pub fn insert(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        records: Vec<ShiftRecord>,
    ) -> Arc<Vec<ShiftRecord>> {
        let records = Arc::new(records);
        self.entries
            .write()
            .insert((start, end), Arc::clone(&records));
        records
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
