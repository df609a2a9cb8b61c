/// SQLite pool construction for the admin database
///
/// Single database file under the configured data directory. WAL journal,
/// NORMAL synchronous, and foreign keys on; writers queue on the busy timeout.

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqliteSynchronous};
use std::path::Path;
use std::time::Duration;

/// Open (or create) the admin database and return its connection pool
pub async fn connect_pool(data_dir: &str) -> Result<SqlitePool> {
    std::fs::create_dir_all(data_dir)
        .map_err(|e| anyhow::anyhow!("Failed to create data directory '{}': {}", data_dir, e))?;
    let db_path = Path::new(data_dir).join("showfolio.db");

    tracing::info!("🗄️ Opening admin database: {}", db_path.display());

    let options = SqliteConnectOptions::new()
        .filename(&db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(30));
    let pool = SqlitePool::connect_with(options).await?;

    Ok(pool)
}
