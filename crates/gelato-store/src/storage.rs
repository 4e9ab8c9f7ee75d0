//! # Storage Adapter Trait
//!
//! The key-value slot every store persists through. Values are JSON text.
//!
//! ```text
//! ┌──────────────┐   set(key, json)   ┌──────────────────────────────┐
//! │ CatalogStore │ ─────────────────► │  dyn Storage                 │
//! │ OrderStore   │                    │  ├── MemoryStorage (tests)   │
//! │ SalesStore   │ ◄───────────────── │  └── SqliteStorage (durable) │
//! └──────────────┘   get(key) → json  └──────────────────────────────┘
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{StorageError, StorageResult};

/// Persisted catalog.
pub const PRODUCTS_KEY: &str = "gelato:products";
/// Open comandas.
pub const ORDERS_KEY: &str = "gelato:orders";
/// Completed sales history.
pub const SALES_KEY: &str = "gelato:completed_sales";
/// Operator login flag.
pub const AUTH_KEY: &str = "gelato:auth";

/// An injected key-value persistence mechanism.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Returns the value under `key`, or `None` when nothing is stored.
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing what was there.
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Deletes `key`. Missing keys are not an error.
    async fn remove(&self, key: &str) -> StorageResult<()>;

    /// Deletes every key.
    async fn clear(&self) -> StorageResult<()>;

    /// Adapter name for logs.
    fn name(&self) -> &'static str;
}

/// Shared handle the stores hold.
pub type SharedStorage = Arc<dyn Storage>;

/// Reads and decodes a JSON document.
pub async fn load_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> StorageResult<Option<T>> {
    match storage.get(key).await? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::serialization(key, e)),
        None => Ok(None),
    }
}

/// Encodes and writes a JSON document.
pub async fn save_json<T: Serialize + ?Sized + Sync>(storage: &dyn Storage, key: &str, value: &T) -> StorageResult<()> {
    let raw = serde_json::to_string(value).map_err(|e| StorageError::serialization(key, e))?;
    storage.set(key, &raw).await
}
