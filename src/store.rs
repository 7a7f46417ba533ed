use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::time::Duration;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::time::timeout;

use crate::error::{KvError, Result};

/// Default bound on lock acquisition
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_millis(1000);

/// In-memory key-value store
///
/// All entries live behind one reader-writer lock. Every operation performs
/// its check and its mutation under a single guard, so concurrent calls on
/// the same key resolve to some serial order. Waiting for the lock is
/// bounded by `lock_timeout`; an operation that gives up, or whose future is
/// dropped while waiting, leaves the map untouched.
pub struct Store {
    data: RwLock<HashMap<String, String>>,
    lock_timeout: Duration,
}

impl Store {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::with_lock_timeout(DEFAULT_LOCK_TIMEOUT)
    }

    pub fn with_lock_timeout(lock_timeout: Duration) -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
            lock_timeout,
        }
    }

    async fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, String>>> {
        timeout(self.lock_timeout, self.data.read())
            .await
            .map_err(|_| KvError::LockTimeout(self.lock_timeout))
    }

    async fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, String>>> {
        timeout(self.lock_timeout, self.data.write())
            .await
            .map_err(|_| KvError::LockTimeout(self.lock_timeout))
    }

    /// Get the value for a key
    pub async fn get(&self, key: &str) -> Result<String> {
        let data = self.read().await?;
        data.get(key)
            .cloned()
            .ok_or_else(|| KvError::NotFound(key.to_string()))
    }

    /// Insert a new entry, failing if the key is already present
    pub async fn insert(&self, key: String, value: String) -> Result<()> {
        let mut data = self.write().await?;
        match data.entry(key) {
            Entry::Occupied(entry) => Err(KvError::Conflict(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(value);
                Ok(())
            }
        }
    }

    /// Replace the value of an existing key, returning the previous value
    pub async fn update(&self, key: &str, value: String) -> Result<String> {
        let mut data = self.write().await?;
        match data.get_mut(key) {
            Some(current) => Ok(std::mem::replace(current, value)),
            None => Err(KvError::NotFound(key.to_string())),
        }
    }

    /// Remove a key, returning the value it held
    pub async fn delete(&self, key: &str) -> Result<String> {
        let mut data = self.write().await?;
        data.remove(key)
            .ok_or_else(|| KvError::NotFound(key.to_string()))
    }

    /// Number of entries
    pub async fn len(&self) -> Result<usize> {
        Ok(self.read().await?.len())
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl Store {
    /// Hold a read guard until `release` fires; signals `ready` once held.
    pub(crate) async fn hold_read_for_test(
        &self,
        ready: tokio::sync::oneshot::Sender<()>,
        release: tokio::sync::oneshot::Receiver<()>,
    ) {
        let _guard = self.data.read().await;
        let _ = ready.send(());
        let _ = release.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = Store::new();
        store.insert("Hello".to_string(), "World".to_string()).await.unwrap();
        assert_eq!(store.get("Hello").await.unwrap(), "World");
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let store = Store::new();
        assert_eq!(
            store.get("nonexistent").await,
            Err(KvError::NotFound("nonexistent".to_string()))
        );
    }

    #[tokio::test]
    async fn test_insert_existing_key_conflicts() {
        let store = Store::new();
        store.insert("k".to_string(), "v1".to_string()).await.unwrap();

        let result = store.insert("k".to_string(), "v2".to_string()).await;
        assert_eq!(result, Err(KvError::Conflict("k".to_string())));
        assert_eq!(store.get("k").await.unwrap(), "v1");
    }

    #[tokio::test]
    async fn test_update_returns_previous_value() {
        let store = Store::new();
        store.insert("Hello".to_string(), "World".to_string()).await.unwrap();

        let previous = store.update("Hello", "Censys".to_string()).await.unwrap();
        assert_eq!(previous, "World");
        assert_eq!(store.get("Hello").await.unwrap(), "Censys");
    }

    #[tokio::test]
    async fn test_update_absent_key_does_not_insert() {
        let store = Store::new();
        let result = store.update("ghost", "v".to_string()).await;
        assert_eq!(result, Err(KvError::NotFound("ghost".to_string())));
        assert!(store.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_then_get() {
        let store = Store::new();
        store.insert("k".to_string(), "v".to_string()).await.unwrap();

        assert_eq!(store.delete("k").await.unwrap(), "v");
        assert_eq!(store.get("k").await, Err(KvError::NotFound("k".to_string())));
        assert_eq!(store.delete("k").await, Err(KvError::NotFound("k".to_string())));
    }

    #[tokio::test]
    async fn test_read_times_out_while_write_locked() {
        let store = Store::with_lock_timeout(Duration::from_millis(20));
        store.insert("k".to_string(), "v".to_string()).await.unwrap();

        let _guard = store.data.write().await;
        assert_eq!(
            store.get("k").await,
            Err(KvError::LockTimeout(Duration::from_millis(20)))
        );
    }

    #[tokio::test]
    async fn test_write_times_out_without_mutating() {
        let store = Store::with_lock_timeout(Duration::from_millis(20));

        {
            let _guard = store.data.read().await;
            let result = store.insert("k".to_string(), "v".to_string()).await;
            assert_eq!(result, Err(KvError::LockTimeout(Duration::from_millis(20))));
        }

        assert_eq!(store.get("k").await, Err(KvError::NotFound("k".to_string())));
    }

    #[tokio::test]
    async fn test_cancelled_insert_never_lands() {
        let store = Arc::new(Store::with_lock_timeout(Duration::from_secs(10)));
        let guard = store.data.write().await;

        let pending = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.insert("k".to_string(), "v".to_string()).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        pending.abort();
        assert!(pending.await.unwrap_err().is_cancelled());

        drop(guard);
        assert!(store.is_empty().await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_same_key_one_winner() {
        let store = Arc::new(Store::new());
        let mut handles = Vec::new();
        for i in 0..32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.insert("shared".to_string(), format!("v{}", i)).await
            }));
        }

        let mut winners = Vec::new();
        for (i, handle) in handles.into_iter().enumerate() {
            match handle.await.unwrap() {
                Ok(()) => winners.push(format!("v{}", i)),
                Err(e) => assert_eq!(e, KvError::Conflict("shared".to_string())),
            }
        }

        assert_eq!(winners.len(), 1);
        assert_eq!(store.get("shared").await.unwrap(), winners[0]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_distinct_keys() {
        let store = Arc::new(Store::new());
        let mut handles = Vec::new();
        for i in 0..100 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.insert(format!("key{}", i), format!("value{}", i)).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.len().await.unwrap(), 100);
        for i in 0..100 {
            assert_eq!(store.get(&format!("key{}", i)).await.unwrap(), format!("value{}", i));
        }
    }
}
