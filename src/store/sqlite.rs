//! SQLite-backed cache.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};

use super::{LocalStore, StorageError};
use crate::source::FeedRecord;

fn init_db(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode=WAL;
        CREATE TABLE IF NOT EXISTS feeds (
            seq  INTEGER PRIMARY KEY AUTOINCREMENT,
            id   TEXT NOT NULL,
            type TEXT NOT NULL,
            data TEXT,
            date TEXT
        );
        "#,
    )?;
    Ok(())
}

/// Persists the feed in a single SQLite table.
///
/// `seq` is storage-internal and only used to keep reads in insertion order;
/// duplicate record ids are fine.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the cache at `path`.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        init_db(&conn)?;
        tracing::debug!(path = %path.display(), "opened feed cache");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn try_read_all(&self) -> Result<Vec<FeedRecord>, StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        let mut stmt = conn.prepare("SELECT id, type, data, date FROM feeds ORDER BY seq")?;
        let rows = stmt.query_map([], |row| {
            Ok(FeedRecord {
                id: row.get(0)?,
                kind_tag: row.get(1)?,
                data: row.get(2)?,
                date: row.get(3)?,
            })
        })?;
        let records = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

impl LocalStore for SqliteStore {
    fn replace_all(&self, records: &[FeedRecord]) -> Result<(), StorageError> {
        let mut conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM feeds", [])?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO feeds (id, type, data, date) VALUES (?1, ?2, ?3, ?4)")?;
            for record in records {
                stmt.execute(params![record.id, record.kind_tag, record.data, record.date])?;
            }
        }
        tx.commit()?;
        tracing::debug!(count = records.len(), "feed cache replaced");
        Ok(())
    }

    fn read_all(&self) -> Vec<FeedRecord> {
        match self.try_read_all() {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(error = %e, "feed cache read failed; treating as empty");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn record(id: &str, tag: &str, data: Option<&str>, date: Option<&str>) -> FeedRecord {
        FeedRecord {
            id: id.into(),
            kind_tag: tag.into(),
            data: data.map(String::from),
            date: date.map(String::from),
        }
    }

    #[test]
    fn fresh_store_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("feeds.sqlite3")).unwrap();
        assert!(store.read_all().is_empty());
    }

    #[test]
    fn replace_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("feeds.sqlite3")).unwrap();
        let records = vec![
            record("1", "text", Some("  hi  "), Some("")),
            record("2", "image", Some("http://x/y.png"), Some("2020-01-01")),
            record("2", "other", None, None),
        ];

        store.replace_all(&records).unwrap();

        assert_eq!(store.read_all(), records);
    }

    #[test]
    fn replace_discards_previous_set() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("feeds.sqlite3")).unwrap();

        store.replace_all(&[record("old", "text", None, None)]).unwrap();
        store.replace_all(&[record("new", "image", None, None)]).unwrap();

        let ids: Vec<_> = store.read_all().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["new"]);
    }

    #[test]
    fn contents_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/cache/feeds.sqlite3");
        {
            let store = SqliteStore::open(&path).unwrap();
            store.replace_all(&[record("keep", "text", Some("x"), None)]).unwrap();
        }
        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.read_all().len(), 1);
    }

    #[test]
    fn concurrent_reads_never_see_partial_set() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(SqliteStore::open(&dir.path().join("feeds.sqlite3")).unwrap());
        let batch_a: Vec<_> = (0..50).map(|i| record(&format!("a{i}"), "text", None, None)).collect();
        let batch_b: Vec<_> = (0..80).map(|i| record(&format!("b{i}"), "image", None, None)).collect();
        store.replace_all(&batch_a).unwrap();

        let writer = {
            let store = Arc::clone(&store);
            let (a, b) = (batch_a.clone(), batch_b.clone());
            std::thread::spawn(move || {
                for i in 0..20 {
                    let batch = if i % 2 == 0 { &b } else { &a };
                    store.replace_all(batch).unwrap();
                }
            })
        };

        for _ in 0..50 {
            let len = store.read_all().len();
            assert!(len == 50 || len == 80, "observed torn read of {len} rows");
        }
        writer.join().unwrap();
    }
}
