//! # State Stores
//!
//! Explicit state containers for the catalog, open comandas and completed
//! sales.
//!
//! ## Mutation Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  store.add(x)                                                           │
//! │     │                                                                   │
//! │     ├── 1. validate (CoreError on failure, nothing changes)             │
//! │     ├── 2. build the next collection, swap it in                        │
//! │     └── 3. persist the whole collection as JSON under the store key     │
//! │              ├── ok   → last_error = None                               │
//! │              └── fail → warn!, last_error = Some(msg), state kept       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Writes are last-write-wins; there is one till per storage.

pub mod catalog;
pub mod orders;
pub mod sales;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::storage::{load_json, save_json, Storage};

/// Loads a collection, treating a missing key as `None` and a failed read as
/// an empty collection plus an error message.
async fn load_collection<T: DeserializeOwned>(
    storage: &dyn Storage,
    key: &'static str,
) -> (Option<Vec<T>>, Option<String>) {
    match load_json::<Vec<T>>(storage, key).await {
        Ok(items) => {
            debug!(key, found = items.is_some(), adapter = storage.name(), "Loaded collection");
            (items, None)
        }
        Err(e) => {
            warn!(key, error = %e, "Failed to load collection, starting empty");
            (Some(Vec::new()), Some(e.to_string()))
        }
    }
}

/// Writes a collection. Failures are logged and returned as the new
/// `last_error` value.
async fn persist_collection<T: Serialize + Sync>(
    storage: &dyn Storage,
    key: &'static str,
    items: &[T],
) -> Option<String> {
    match save_json(storage, key, items).await {
        Ok(()) => {
            debug!(key, count = items.len(), "Persisted collection");
            None
        }
        Err(e) => {
            warn!(key, error = %e, "Failed to persist collection");
            Some(e.to_string())
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use crate::error::{StorageError, StorageResult};
    use crate::memory::MemoryStorage;
    use crate::storage::Storage;

    /// Memory storage whose writes can be switched to fail.
    #[derive(Default)]
    pub struct FlakyStorage {
        inner: MemoryStorage,
        failing: AtomicBool,
    }

    impl FlakyStorage {
        pub fn fail_writes(&self, fail: bool) {
            self.failing.store(fail, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl Storage for FlakyStorage {
        async fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(StorageError::QueryFailed("disk full".to_string()));
            }
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> StorageResult<()> {
            self.inner.remove(key).await
        }

        async fn clear(&self) -> StorageResult<()> {
            self.inner.clear().await
        }

        fn name(&self) -> &'static str {
            "flaky"
        }
    }
}
