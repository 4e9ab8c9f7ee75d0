//! # Commands Module
//!
//! Async command functions the front end calls. Each takes the shared
//! [`AppState`](crate::state::AppState) plus plain data and returns a
//! serializable DTO or an [`ApiError`](crate::error::ApiError).
//!
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── session.rs  ◄─── Login, logout, teardown
//! ├── catalog.rs  ◄─── Product search and maintenance
//! ├── comanda.rs  ◄─── Open orders and their items
//! ├── checkout.rs ◄─── Payment, change, receipt
//! └── report.rs   ◄─── Sales history and reports
//! ```
//!
//! Everything except the session commands requires a logged-in operator.

pub mod catalog;
pub mod checkout;
pub mod comanda;
pub mod report;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use gelato_store::{MemoryStorage, SharedStorage, Storage, StorageError, StorageResult};

    use crate::state::{AppState, PdvConfig, ReceiptPrinter};

    /// Memory storage whose writes can be switched to fail.
    #[derive(Default)]
    pub struct UnwritableStorage {
        inner: MemoryStorage,
        failing: AtomicBool,
    }

    impl UnwritableStorage {
        pub fn fail_writes(&self, fail: bool) {
            self.failing.store(fail, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl Storage for UnwritableStorage {
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
            "unwritable"
        }
    }

    /// Config with no artificial delays.
    pub fn instant_config() -> PdvConfig {
        let mut config = PdvConfig::default();
        config.session.login_delay_ms = 0;
        config.session.checkout_delay_ms = 0;
        config.storage.in_memory = true;
        config
    }

    /// Fresh in-memory state with the default catalog, logged in.
    pub async fn logged_in_state(printer: Option<Arc<dyn ReceiptPrinter>>) -> AppState {
        let storage: SharedStorage = Arc::new(MemoryStorage::new());
        let state = AppState::new(instant_config(), storage, printer).await;
        state.session.login("operador").await.unwrap();
        state
    }
}
