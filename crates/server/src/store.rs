//! Report storage shared across requests.

use std::collections::HashMap;
use std::sync::RwLock;

use aiscout_core::Report;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// A report and when it was stored.
#[derive(Debug, Clone)]
pub struct StoredAnalysis {
    pub id: Uuid,
    pub stored_at: OffsetDateTime,
    pub report: Report,
}

/// Keeps finished reports so they can be fetched again by id.
pub trait ResultStore: Send + Sync {
    /// Stores `report` under a fresh id and returns the id.
    fn put(&self, report: Report) -> Uuid;

    fn get(&self, id: &Uuid) -> Option<StoredAnalysis>;

    /// Drops every entry stored more than `max_age` ago. Returns how many were dropped.
    fn evict_older_than(&self, max_age: Duration) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-process store. Entries are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<Uuid, StoredAnalysis>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert_at(&self, report: Report, stored_at: OffsetDateTime) -> Uuid {
        let id = Uuid::new_v4();
        let entry = StoredAnalysis { id, stored_at, report };
        match self.entries.write() {
            Ok(mut entries) => {
                entries.insert(id, entry);
            }
            Err(poisoned) => {
                poisoned.into_inner().insert(id, entry);
            }
        }
        id
    }
}

impl ResultStore for MemoryStore {
    fn put(&self, report: Report) -> Uuid {
        self.insert_at(report, OffsetDateTime::now_utc())
    }

    fn get(&self, id: &Uuid) -> Option<StoredAnalysis> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(id).cloned()
    }

    fn evict_older_than(&self, max_age: Duration) -> usize {
        let cutoff = OffsetDateTime::now_utc() - max_age;
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|_, entry| entry.stored_at >= cutoff);
        before - entries.len()
    }

    fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}
