//! Background cache writes.
//!
//! Runs on a dedicated thread so that persisting a freshly fetched feed never
//! blocks the UI thread.  Writes are applied in the order they were queued.
//!
//! ## For contributors
//!
//! The writer is deliberately dumb: it replaces the cache with whatever it is
//! handed, logs failures, and never retries.  The next successful sync will
//! try again anyway.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use super::LocalStore;
use crate::source::FeedRecord;

/// Handle to the cache writer thread.
///
/// Dropping the handle closes the queue and waits for pending writes to
/// land, so a clean shutdown never loses the last fetched feed.
pub struct CacheWriter {
    tx: Option<mpsc::Sender<Vec<FeedRecord>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl CacheWriter {
    /// Spawn the writer thread for `store`.
    pub fn spawn(store: Arc<dyn LocalStore>) -> Self {
        let (tx, rx) = mpsc::channel::<Vec<FeedRecord>>();

        let handle = thread::Builder::new()
            .name("cache-writer".into())
            .spawn(move || {
                // Ends when every sender is gone.
                for records in rx {
                    if let Err(e) = store.replace_all(&records) {
                        tracing::error!(error = %e, count = records.len(), "cache write failed");
                    }
                }
            });

        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!(error = %e, "could not start cache writer; feed will not be cached");
                None
            }
        };

        Self {
            tx: Some(tx),
            handle,
        }
    }

    /// Queue a replace-all.  Returns immediately.
    pub fn persist(&self, records: Vec<FeedRecord>) {
        if self.handle.is_none() {
            return;
        }
        if let Some(tx) = &self.tx {
            if tx.send(records).is_err() {
                tracing::warn!("cache writer has stopped; dropping write");
            }
        }
    }
}

impl Drop for CacheWriter {
    fn drop(&mut self) {
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn record(id: &str) -> FeedRecord {
        FeedRecord {
            id: id.into(),
            kind_tag: "text".into(),
            data: None,
            date: None,
        }
    }

    #[test]
    fn drop_flushes_pending_writes_in_order() {
        let store = Arc::new(MemoryStore::new());
        let writer = CacheWriter::spawn(store.clone());

        writer.persist(vec![record("first")]);
        writer.persist(vec![record("second"), record("third")]);
        drop(writer);

        let ids: Vec<_> = store.read_all().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["second", "third"]);
    }

    #[test]
    fn dropping_idle_writer_does_not_touch_store() {
        let store = Arc::new(MemoryStore::with_records(vec![record("keep")]));
        drop(CacheWriter::spawn(store.clone()));
        assert_eq!(store.read_all().len(), 1);
    }
}
