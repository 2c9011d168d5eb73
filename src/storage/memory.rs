//! In-memory ordered store
//!
//! Reference implementation of the transaction traits over a `BTreeMap`.
//!
//! - Read transactions share the map behind a read lock
//! - A write transaction holds the write lock for its whole life
//! - Writes are buffered and applied only on `commit`
//! - Dropping a write transaction without committing discards its writes
//!
//! Opening any transaction on a thread that already holds the store's write
//! transaction fails with `StoreError::Unavailable` instead of blocking.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard, TryLockError};
use std::thread::{self, ThreadId};

use serde_json::Value as JsonValue;

use super::errors::{StoreError, StoreResult};
use super::traits::{ReadTransaction, WriteTransaction};

type KeySpace = BTreeMap<String, JsonValue>;

fn scan_prefix(data: &KeySpace, prefix: &str) -> Vec<(String, JsonValue)> {
    data.range(prefix.to_string()..)
        .take_while(|(k, _)| k.starts_with(prefix))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Shared in-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<KeySpace>>,
    /// Thread holding the write transaction, if any
    writer: Arc<Mutex<Option<ThreadId>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a read-only transaction
    pub fn begin_read(&self) -> StoreResult<MemoryReadTransaction<'_>> {
        let data = match self.data.try_read() {
            Ok(data) => data,
            Err(TryLockError::WouldBlock) => {
                self.check_not_writer()?;
                self.data
                    .read()
                    .map_err(|e| StoreError::Unavailable(e.to_string()))?
            }
            Err(TryLockError::Poisoned(e)) => return Err(StoreError::Unavailable(e.to_string())),
        };
        Ok(MemoryReadTransaction { data })
    }

    /// Opens a read-write transaction
    pub fn begin_write(&self) -> StoreResult<MemoryWriteTransaction<'_>> {
        let data = match self.data.try_write() {
            Ok(data) => data,
            Err(TryLockError::WouldBlock) => {
                self.check_not_writer()?;
                self.data
                    .write()
                    .map_err(|e| StoreError::Unavailable(e.to_string()))?
            }
            Err(TryLockError::Poisoned(e)) => return Err(StoreError::Unavailable(e.to_string())),
        };
        *self.lock_writer()? = Some(thread::current().id());
        Ok(MemoryWriteTransaction {
            data,
            writer: &self.writer,
            pending: BTreeMap::new(),
        })
    }

    fn lock_writer(&self) -> StoreResult<MutexGuard<'_, Option<ThreadId>>> {
        self.writer
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    /// Waiting on the lock this thread holds would never return
    fn check_not_writer(&self) -> StoreResult<()> {
        if *self.lock_writer()? == Some(thread::current().id()) {
            return Err(StoreError::Unavailable(
                "write transaction already open on this thread".into(),
            ));
        }
        Ok(())
    }

    /// Number of committed entries
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.begin_read()?.data.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

/// Read-only view of a `MemoryStore`
pub struct MemoryReadTransaction<'a> {
    data: RwLockReadGuard<'a, KeySpace>,
}

impl ReadTransaction for MemoryReadTransaction<'_> {
    fn scan(&self, prefix: &str) -> StoreResult<Vec<(String, JsonValue)>> {
        Ok(scan_prefix(&self.data, prefix))
    }

    fn get(&self, key: &str) -> StoreResult<Option<JsonValue>> {
        Ok(self.data.get(key).cloned())
    }
}

/// Buffered read-write transaction on a `MemoryStore`
pub struct MemoryWriteTransaction<'a> {
    data: RwLockWriteGuard<'a, KeySpace>,
    writer: &'a Mutex<Option<ThreadId>>,
    /// Some(value) = set, None = delete
    pending: BTreeMap<String, Option<JsonValue>>,
}

impl MemoryWriteTransaction<'_> {
    /// Applies every buffered write
    pub fn commit(mut self) {
        let pending = std::mem::take(&mut self.pending);
        for (key, op) in pending {
            match op {
                Some(value) => {
                    self.data.insert(key, value);
                }
                None => {
                    self.data.remove(&key);
                }
            }
        }
    }

    /// Discards every buffered write
    pub fn rollback(self) {}
}

impl Drop for MemoryWriteTransaction<'_> {
    fn drop(&mut self) {
        // Cleared before the write guard is released
        if let Ok(mut writer) = self.writer.lock() {
            *writer = None;
        }
    }
}

impl ReadTransaction for MemoryWriteTransaction<'_> {
    fn scan(&self, prefix: &str) -> StoreResult<Vec<(String, JsonValue)>> {
        let mut merged: BTreeMap<String, JsonValue> =
            scan_prefix(&self.data, prefix).into_iter().collect();

        let overlay = self
            .pending
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix));
        for (key, op) in overlay {
            match op {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        Ok(merged.into_iter().collect())
    }

    fn get(&self, key: &str) -> StoreResult<Option<JsonValue>> {
        match self.pending.get(key) {
            Some(op) => Ok(op.clone()),
            None => Ok(self.data.get(key).cloned()),
        }
    }
}

impl WriteTransaction for MemoryWriteTransaction<'_> {
    fn set(&mut self, key: &str, value: JsonValue) -> StoreResult<()> {
        self.pending.insert(key.to_string(), Some(value));
        Ok(())
    }

    fn delete(&mut self, key: &str) -> StoreResult<bool> {
        let existed = self.get(key)?.is_some();
        self.pending.insert(key.to_string(), None);
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prefix_scan_ordered() {
        let store = MemoryStore::new();
        let mut tx = store.begin_write().unwrap();
        tx.set("users/2", json!({"id": "2"})).unwrap();
        tx.set("users/1", json!({"id": "1"})).unwrap();
        tx.set("usersx/1", json!({"id": "x"})).unwrap();
        tx.set("posts/1", json!({"id": "p"})).unwrap();
        tx.commit();

        let tx = store.begin_read().unwrap();
        let keys: Vec<String> = tx.scan("users/").unwrap().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["users/1", "users/2"]);
    }

    #[test]
    fn test_uncommitted_writes_discarded() {
        let store = MemoryStore::new();
        {
            let mut tx = store.begin_write().unwrap();
            tx.set("users/1", json!({})).unwrap();
            tx.rollback();
        }
        {
            let mut tx = store.begin_write().unwrap();
            tx.set("users/2", json!({})).unwrap();
        }
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_write_transaction_reads_own_writes() {
        let store = MemoryStore::new();
        let mut tx = store.begin_write().unwrap();
        tx.set("users/1", json!({"id": "1"})).unwrap();
        tx.commit();

        let mut tx = store.begin_write().unwrap();
        tx.set("users/2", json!({"id": "2"})).unwrap();
        assert!(tx.delete("users/1").unwrap());
        assert!(!tx.delete("users/9").unwrap());

        let scanned = tx.scan("users/").unwrap();
        assert_eq!(scanned, vec![("users/2".to_string(), json!({"id": "2"}))]);
        assert_eq!(tx.get("users/1").unwrap(), None);
        tx.commit();

        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_nested_transaction_fails_instead_of_blocking() {
        let store = MemoryStore::new();
        let tx = store.begin_write().unwrap();

        assert!(matches!(store.begin_read(), Err(StoreError::Unavailable(_))));
        assert!(matches!(store.begin_write(), Err(StoreError::Unavailable(_))));
        assert!(store.len().is_err());

        tx.commit();
        assert!(store.begin_read().is_ok());
        assert!(store.begin_write().is_ok());
    }

    #[test]
    fn test_reader_on_other_thread_waits_for_commit() {
        let store = MemoryStore::new();
        let mut tx = store.begin_write().unwrap();

        let reader = {
            let store = store.clone();
            std::thread::spawn(move || {
                let tx = store.begin_read().unwrap();
                let rows = tx.scan("users/").unwrap();
                rows.len()
            })
        };

        tx.set("users/1", json!({"id": "1"})).unwrap();
        tx.commit();
        assert_eq!(reader.join().unwrap(), 1);
    }
}
