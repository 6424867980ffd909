//! # Database Migrations
//!
//! Schema migration management using sqlx's embedded migrator.
//!
//! Migration files live in `migrations/sqlite/` at the workspace root and
//! are compiled into the binary, so a deployed terminal never needs the
//! SQL files on disk.

use sqlx::migrate::Migrator;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::StoreResult;

/// Embedded migrations, applied in filename order.
static MIGRATOR: Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending migrations. Already-applied migrations are skipped, so
/// calling this on every startup is safe.
pub async fn run_migrations(pool: &SqlitePool) -> StoreResult<()> {
    debug!(
        migrations = MIGRATOR.iter().count(),
        "Applying embedded migrations"
    );
    MIGRATOR.run(pool).await?;
    info!("Schema is up to date");
    Ok(())
}
