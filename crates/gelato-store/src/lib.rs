//! # gelato-store: Persistence Layer for Gelato PDV
//!
//! Explicit state stores over an injected key-value storage adapter.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Gelato PDV Data Flow                             │
//! │                                                                         │
//! │  App command (finalize_order)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   gelato-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Stores     │    │   Storage     │    │  Migrations  │  │   │
//! │  │   │ CatalogStore  │───►│  dyn Storage  │    │  (embedded)  │  │   │
//! │  │   │ OrderStore    │    │  Memory       │    │ 001_kv_store │  │   │
//! │  │   │ SalesStore    │    │  Sqlite       │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  SQLite file in the platform data dir (gelato.db)               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use gelato_store::{CatalogStore, SqliteStorage, StorageConfig};
//!
//! let storage = Arc::new(SqliteStorage::open(StorageConfig::new("gelato.db")).await?);
//! let catalog = CatalogStore::load(storage.clone()).await;
//! let acai = catalog.search("açaí");
//! ```

pub mod error;
pub mod memory;
pub mod migrations;
pub mod sqlite;
pub mod storage;
pub mod stores;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStorage;
pub use sqlite::{SqliteStorage, StorageConfig};
pub use storage::{SharedStorage, Storage, AUTH_KEY, ORDERS_KEY, PRODUCTS_KEY, SALES_KEY};
pub use stores::catalog::CatalogStore;
pub use stores::orders::OrderStore;
pub use stores::sales::SalesStore;
