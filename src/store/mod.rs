//! Local cache of the last successfully fetched feed.
//!
//! The cache has replace-all semantics: a write swaps the whole set, a read
//! returns the whole set.  Reads never fail outwardly; a broken cache looks
//! like an empty one.

mod sqlite;
mod writer;

use std::sync::Mutex;

pub use sqlite::SqliteStore;
pub use writer::CacheWriter;

use crate::source::FeedRecord;

/// Errors from the storage backend.  Logged, never shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

/// A durable replace-all record cache, usable from any thread.
pub trait LocalStore: Send + Sync {
    /// Atomically replace the persisted set with `records`.
    fn replace_all(&self, records: &[FeedRecord]) -> Result<(), StorageError>;

    /// Return a snapshot of the persisted set, in insertion order.
    ///
    /// Errors are logged and reported as an empty set.
    fn read_all(&self) -> Vec<FeedRecord>;
}

/// In-process store used by `--no-cache` runs and tests.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<FeedRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_records(records: Vec<FeedRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

impl LocalStore for MemoryStore {
    fn replace_all(&self, records: &[FeedRecord]) -> Result<(), StorageError> {
        let mut guard = self.records.lock().map_err(|_| StorageError::Poisoned)?;
        *guard = records.to_vec();
        Ok(())
    }

    fn read_all(&self) -> Vec<FeedRecord> {
        match self.records.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => {
                tracing::error!("memory store lock poisoned; treating cache as empty");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> FeedRecord {
        FeedRecord {
            id: id.into(),
            kind_tag: "text".into(),
            data: None,
            date: None,
        }
    }

    #[test]
    fn memory_store_starts_empty() {
        assert!(MemoryStore::new().read_all().is_empty());
    }

    #[test]
    fn memory_store_replaces_whole_set() {
        let store = MemoryStore::with_records(vec![record("old")]);
        store.replace_all(&[record("a"), record("b")]).unwrap();

        let ids: Vec<_> = store.read_all().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["a", "b"]);
    }
}
