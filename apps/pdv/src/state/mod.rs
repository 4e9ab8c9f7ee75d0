//! # State Module
//!
//! Application state shared by every command.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  AppState                                                              │
//! │  ├── config     PdvConfig                 read-only after startup      │
//! │  ├── storage    Arc<dyn Storage>          Sqlite or Memory adapter     │
//! │  ├── catalog    RwLock<CatalogStore>      ┐                            │
//! │  ├── orders     RwLock<OrderStore>        ├ one writer at a time       │
//! │  ├── sales      RwLock<SalesStore>        ┘                            │
//! │  ├── session    SessionState              login flag + teardown        │
//! │  └── printer    Option<Arc<dyn ReceiptPrinter>>                        │
//! │                                                                         │
//! │  LOCK ORDER: catalog → orders → sales. Never hold a lock across the   │
//! │  checkout delay.                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod delay;
pub mod printer;
pub mod session;

use std::sync::Arc;

use gelato_store::{CatalogStore, MemoryStorage, OrderStore, SalesStore, SharedStorage, SqliteStorage, StorageConfig};
use tokio::sync::RwLock;
use tracing::{info, warn};

pub use config::PdvConfig;
pub use delay::{CancelHandle, CancellableDelay, DelayOutcome};
pub use printer::{FileReceiptPrinter, ReceiptPrinter};
pub use session::SessionState;

use crate::error::ApiResult;

pub struct AppState {
    pub config: PdvConfig,
    pub storage: SharedStorage,
    pub catalog: RwLock<CatalogStore>,
    pub orders: RwLock<OrderStore>,
    pub sales: RwLock<SalesStore>,
    pub session: SessionState,
    pub printer: Option<Arc<dyn ReceiptPrinter>>,
    sqlite: Option<Arc<SqliteStorage>>,
}

impl AppState {
    /// Loads every store from `storage`.
    pub async fn new(config: PdvConfig, storage: SharedStorage, printer: Option<Arc<dyn ReceiptPrinter>>) -> Self {
        let catalog = CatalogStore::load(storage.clone()).await;
        let orders = OrderStore::load(storage.clone()).await;
        let sales = SalesStore::load(storage.clone()).await;
        let session = SessionState::restore(
            storage.clone(),
            config.login_delay(),
            config.session.operator_password_hash.clone(),
        )
        .await;

        for error in [catalog.last_error(), orders.last_error(), sales.last_error()]
            .into_iter()
            .flatten()
        {
            warn!(error, "Store loaded with errors");
        }

        info!(
            storage = storage.name(),
            products = catalog.products().len(),
            open_orders = orders.list().len(),
            sales = sales.list().len(),
            "State initialized"
        );

        AppState {
            config,
            storage,
            catalog: RwLock::new(catalog),
            orders: RwLock::new(orders),
            sales: RwLock::new(sales),
            session,
            printer,
            sqlite: None,
        }
    }

    /// Opens the configured storage and printer, then loads the stores.
    pub async fn bootstrap(config: PdvConfig) -> ApiResult<Self> {
        let printer = config
            .receipt_dir()
            .map(|dir| Arc::new(FileReceiptPrinter::new(dir)) as Arc<dyn ReceiptPrinter>);

        if config.storage.in_memory {
            info!("Using in-memory storage, nothing will be kept");
            let storage: SharedStorage = Arc::new(MemoryStorage::new());
            return Ok(Self::new(config, storage, printer).await);
        }

        let db_path = config.database_path();
        info!(?db_path, "Opening database");
        let sqlite = Arc::new(SqliteStorage::open(StorageConfig::new(db_path)).await?);

        let mut state = Self::new(config, sqlite.clone(), printer).await;
        state.sqlite = Some(sqlite);
        Ok(state)
    }

    /// Cancels pending delays and closes the database.
    pub async fn shutdown(&self) {
        self.session.teardown();
        if let Some(sqlite) = &self.sqlite {
            sqlite.close().await;
        }
        info!("State shut down");
    }

    /// Why the latest in-memory changes are not on disk, or `None` when
    /// every store saved its last write.
    pub async fn storage_error(&self) -> Option<String> {
        let catalog = self.catalog.read().await;
        let orders = self.orders.read().await;
        let sales = self.sales.read().await;
        join_store_errors([catalog.last_error(), orders.last_error(), sales.last_error()])
    }

    pub async fn health_check(&self) -> bool {
        match &self.sqlite {
            Some(sqlite) => sqlite.health_check().await,
            None => true,
        }
    }
}

/// Joins the stores' `last_error`s into one message.
pub(crate) fn join_store_errors<'a>(errors: impl IntoIterator<Item = Option<&'a str>>) -> Option<String> {
    let joined: Vec<&str> = errors.into_iter().flatten().collect();
    if joined.is_empty() {
        None
    } else {
        Some(joined.join("; "))
    }
}
