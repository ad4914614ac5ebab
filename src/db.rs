//! Database module - SQLite connection and migrations

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

/// How long a writer waits on a locked database before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Create database connection pool
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect_with(options)
        .await
}

/// Run database migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // SQLite prepares one statement at a time
    for statement in SCHEMA_SQL.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!("Database schema applied successfully");
    Ok(())
}

/// Database schema SQL
const SCHEMA_SQL: &str = r#"
-- Scan decisions (append-only)
CREATE TABLE IF NOT EXISTS scans (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    is_phishing INTEGER NOT NULL,
    confidence REAL NOT NULL,
    timestamp INTEGER NOT NULL DEFAULT (CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER))
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_scans_timestamp ON scans(timestamp, id);
CREATE INDEX IF NOT EXISTS idx_scans_phishing ON scans(is_phishing)
"#;

/// Fresh in-memory database with the schema applied
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    // A single connection keeps every query on the same in-memory database
    let pool = create_pool("sqlite::memory:", 1).await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = test_pool().await;
        run_migrations(&pool).await.unwrap();

        let row = sqlx::query("SELECT COUNT(*) AS n FROM sqlite_master WHERE type = 'table' AND name = 'scans'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(row.get::<i64, _>("n"), 1);
    }

    #[tokio::test]
    async fn test_timestamp_defaults_to_now() {
        let pool = test_pool().await;
        let before = chrono::Utc::now().timestamp_millis();

        sqlx::query("INSERT INTO scans (url, is_phishing, confidence) VALUES ('https://a.test', 0, 0.1)")
            .execute(&pool)
            .await
            .unwrap();

        let row = sqlx::query("SELECT timestamp FROM scans")
            .fetch_one(&pool)
            .await
            .unwrap();
        let stored: i64 = row.get("timestamp");
        // julianday has millisecond resolution at best
        assert!((stored - before).abs() < 5_000);
    }
}
