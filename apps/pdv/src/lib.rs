//! # gelato-pdv: Ice-Cream Shop Point of Sale
//!
//! Application layer: configuration, session, stores behind locks and the
//! command functions the front end calls.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Application Startup                               │
//! │                                                                         │
//! │  1. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter                                │
//! │     • Default: info,gelato=debug,sqlx=warn, RUST_LOG overrides          │
//! │                                                                         │
//! │  2. Load Configuration ───────────────────────────────────────────────► │
//! │     • defaults → config.toml → GELATO_* env, then validated             │
//! │                                                                         │
//! │  3. Open Storage ─────────────────────────────────────────────────────► │
//! │     • SQLite (WAL, embedded migrations) or in-memory                    │
//! │                                                                         │
//! │  4. Load Stores & Session ────────────────────────────────────────────► │
//! │     • first run installs the default catalog                            │
//! │     • login flag restored from storage                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

pub use error::{ApiError, ApiResult, ErrorCode};
pub use state::{AppState, PdvConfig};

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=gelato_store=trace` - Trace storage only
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,gelato=debug,sqlx=warn"));

    // A second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Loads configuration and opens the application state.
pub async fn start(config_path: Option<PathBuf>) -> ApiResult<AppState> {
    let config = PdvConfig::load(config_path)?;
    info!(store = %config.store.name, "Starting Gelato PDV");
    AppState::bootstrap(config).await
}
