//! # Database Migrations
//!
//! Schema migrations embedded at compile time.
//!
//! ```text
//! SqliteStorage::open
//!       │
//!       ▼
//! run_migrations(&pool) ──► pending files from migrations/sqlite/ applied
//!       │                    in filename order, recorded in _sqlx_migrations
//!       ▼
//! Stores load their collections
//! ```
//!
//! ## Adding New Migrations
//!
//! 1. Create `migrations/sqlite/NNN_description.sql` with the next number
//! 2. Use `IF NOT EXISTS` where possible
//! 3. Never edit a migration that has shipped

use sqlx::SqlitePool;
use tracing::info;

use crate::error::StorageResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending migrations. Safe to call repeatedly.
pub async fn run_migrations(pool: &SqlitePool) -> StorageResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}
