//! Scan record model and the decision log behind it

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Row, SqlitePool};

/// One persisted scan decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub id: i64,
    pub url: String,
    pub is_phishing: bool,
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
}

/// A scan decision that has not been assigned an id yet
#[derive(Debug, Clone)]
pub struct NewScanRecord {
    pub url: String,
    pub is_phishing: bool,
    pub confidence: f64,
    /// `None` lets the store stamp the creation instant
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, FromRow)]
struct ScanRow {
    id: i64,
    url: String,
    is_phishing: bool,
    confidence: f64,
    timestamp: i64,
}

impl From<ScanRow> for ScanRecord {
    fn from(row: ScanRow) -> Self {
        Self {
            id: row.id,
            url: row.url,
            is_phishing: row.is_phishing,
            confidence: row.confidence,
            timestamp: DateTime::from_timestamp_millis(row.timestamp).unwrap_or_default(),
        }
    }
}

/// Aggregate counters over the decision log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScanStats {
    pub total_scans: i64,
    pub phishing_detected: i64,
    pub safe_scans: i64,
}

impl ScanStats {
    fn from_counts(total: i64, phishing: i64) -> Self {
        Self {
            total_scans: total,
            phishing_detected: phishing,
            safe_scans: total - phishing,
        }
    }
}

/// Counters for one UTC calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub total_scans: i64,
    pub phishing_detected: i64,
    pub safe_scans: i64,
}

/// Append-only store of scan decisions.
///
/// Ids come from `AUTOINCREMENT`, so they are strictly increasing and never
/// reused even after rows are removed by hand. Every method is a single SQL
/// statement, which gives each read a consistent snapshot.
#[derive(Debug, Clone)]
pub struct DecisionLog {
    pool: SqlitePool,
}

impl DecisionLog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Append a record, returning the id assigned by the store
    pub async fn append(&self, record: &NewScanRecord) -> Result<i64, sqlx::Error> {
        let result = match record.timestamp {
            Some(ts) => {
                sqlx::query(
                    "INSERT INTO scans (url, is_phishing, confidence, timestamp) VALUES (?, ?, ?, ?)"
                )
                .bind(&record.url)
                .bind(record.is_phishing)
                .bind(record.confidence)
                .bind(ts.timestamp_millis())
                .execute(&self.pool)
                .await?
            }
            None => {
                sqlx::query("INSERT INTO scans (url, is_phishing, confidence) VALUES (?, ?, ?)")
                    .bind(&record.url)
                    .bind(record.is_phishing)
                    .bind(record.confidence)
                    .execute(&self.pool)
                    .await?
            }
        };

        Ok(result.last_insert_rowid())
    }

    pub async fn count_all(&self) -> Result<i64, sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM scans")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("total"))
    }

    pub async fn count_phishing(&self) -> Result<i64, sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) AS phishing FROM scans WHERE is_phishing = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("phishing"))
    }

    /// Totals computed in one statement so the two counts always agree
    pub async fn stats(&self) -> Result<ScanStats, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total,
                COALESCE(SUM(is_phishing), 0) AS phishing
            FROM scans
            "#
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(ScanStats::from_counts(row.get("total"), row.get("phishing")))
    }

    /// Totals restricted to scans at or after `cutoff`
    pub async fn stats_since(&self, cutoff: DateTime<Utc>) -> Result<ScanStats, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total,
                COALESCE(SUM(is_phishing), 0) AS phishing
            FROM scans
            WHERE timestamp >= ?
            "#
        )
        .bind(cutoff.timestamp_millis())
        .fetch_one(&self.pool)
        .await?;

        Ok(ScanStats::from_counts(row.get("total"), row.get("phishing")))
    }

    /// Per-day counters for the last `days` days (today included), oldest
    /// first. Days without scans are reported with zero counts.
    pub async fn daily(&self, days: u32, now: DateTime<Utc>) -> Result<Vec<DailyStats>, sqlx::Error> {
        let days = days.max(1);
        let today = now.date_naive();
        let first_day = today - Duration::days(i64::from(days) - 1);
        let cutoff = first_day
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis())
            .unwrap_or_default();

        let rows = sqlx::query(
            r#"
            SELECT
                date(timestamp / 1000, 'unixepoch') AS day,
                COUNT(*) AS total,
                COALESCE(SUM(is_phishing), 0) AS phishing
            FROM scans
            WHERE timestamp >= ?
            GROUP BY day
            "#
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        let counted: Vec<(String, i64, i64)> = rows
            .into_iter()
            .map(|r| (r.get("day"), r.get("total"), r.get("phishing")))
            .collect();

        Ok(first_day
            .iter_days()
            .take(days as usize)
            .map(|date| {
                let key = date.format("%Y-%m-%d").to_string();
                let (total, phishing) = counted
                    .iter()
                    .find(|(day, _, _)| *day == key)
                    .map(|(_, t, p)| (*t, *p))
                    .unwrap_or((0, 0));
                DailyStats {
                    date,
                    total_scans: total,
                    phishing_detected: phishing,
                    safe_scans: total - phishing,
                }
            })
            .collect())
    }

    /// Most recent records first; equal timestamps fall back to id order
    pub async fn recent(&self, limit: i64) -> Result<Vec<ScanRecord>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ScanRow>(
            r#"
            SELECT id, url, is_phishing, confidence, timestamp
            FROM scans
            ORDER BY timestamp DESC, id DESC
            LIMIT ?
            "#
        )
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ScanRecord::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use chrono::TimeZone;

    fn record(url: &str, is_phishing: bool, timestamp: Option<DateTime<Utc>>) -> NewScanRecord {
        NewScanRecord {
            url: url.to_string(),
            is_phishing,
            confidence: if is_phishing { 0.9 } else { 0.1 },
            timestamp,
        }
    }

    #[tokio::test]
    async fn test_append_assigns_increasing_ids() {
        let log = DecisionLog::new(test_pool().await);

        let first = log.append(&record("https://a.test", false, None)).await.unwrap();
        let second = log.append(&record("https://b.test", true, None)).await.unwrap();

        assert!(second > first);
        assert_eq!(log.count_all().await.unwrap(), 2);
        assert_eq!(log.count_phishing().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let log = DecisionLog::new(test_pool().await);

        let first = log.append(&record("https://a.test", false, None)).await.unwrap();
        sqlx::query("DELETE FROM scans").execute(log.pool()).await.unwrap();
        let second = log.append(&record("https://b.test", false, None)).await.unwrap();

        assert!(second > first);
    }

    #[tokio::test]
    async fn test_stats_safe_is_total_minus_phishing() {
        let log = DecisionLog::new(test_pool().await);
        assert_eq!(log.stats().await.unwrap(), ScanStats::default());

        for i in 0..5 {
            log.append(&record(&format!("https://{i}.test"), i % 2 == 0, None)).await.unwrap();
        }

        let stats = log.stats().await.unwrap();
        assert_eq!(stats.total_scans, 5);
        assert_eq!(stats.phishing_detected, 3);
        assert_eq!(stats.safe_scans, 2);
        assert_eq!(stats.phishing_detected + stats.safe_scans, log.count_all().await.unwrap());
    }

    #[tokio::test]
    async fn test_recent_orders_by_timestamp_then_id() {
        let log = DecisionLog::new(test_pool().await);
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        let old = log.append(&record("https://old.test", false, Some(early))).await.unwrap();
        let tie_a = log.append(&record("https://tie-a.test", false, Some(late))).await.unwrap();
        let tie_b = log.append(&record("https://tie-b.test", true, Some(late))).await.unwrap();

        let recent = log.recent(10).await.unwrap();
        let ids: Vec<i64> = recent.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![tie_b, tie_a, old]);
        assert_eq!(recent[0].timestamp, late);
        assert_eq!(recent[2].url, "https://old.test");

        assert_eq!(log.recent(1).await.unwrap().len(), 1);
        assert!(log.recent(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stats_since_excludes_older_scans() {
        let log = DecisionLog::new(test_pool().await);
        let now = Utc::now();

        log.append(&record("https://old.test", true, Some(now - Duration::days(40)))).await.unwrap();
        log.append(&record("https://new.test", true, Some(now))).await.unwrap();
        log.append(&record("https://new2.test", false, Some(now))).await.unwrap();

        let stats = log.stats_since(now - Duration::days(30)).await.unwrap();
        assert_eq!(stats.total_scans, 2);
        assert_eq!(stats.phishing_detected, 1);
        assert_eq!(stats.safe_scans, 1);
    }

    #[tokio::test]
    async fn test_daily_fills_empty_days() {
        let log = DecisionLog::new(test_pool().await);
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();

        log.append(&record("https://a.test", true, Some(now))).await.unwrap();
        log.append(&record("https://b.test", false, Some(now - Duration::days(2)))).await.unwrap();
        log.append(&record("https://c.test", true, Some(now - Duration::days(30)))).await.unwrap();

        let days = log.daily(3, now).await.unwrap();
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 3, 8).unwrap());
        assert_eq!((days[0].total_scans, days[0].safe_scans), (1, 1));
        assert_eq!(days[1].total_scans, 0);
        assert_eq!((days[2].total_scans, days[2].phishing_detected), (1, 1));
    }

    #[tokio::test]
    async fn test_append_fails_on_closed_pool() {
        let log = DecisionLog::new(test_pool().await);
        log.pool().close().await;

        assert!(log.append(&record("https://a.test", false, None)).await.is_err());
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("scans.db").display());

        {
            let pool = crate::db::create_pool(&url, 2).await.unwrap();
            crate::db::run_migrations(&pool).await.unwrap();
            DecisionLog::new(pool.clone())
                .append(&record("https://durable.test", true, None))
                .await
                .unwrap();
            pool.close().await;
        }

        let pool = crate::db::create_pool(&url, 2).await.unwrap();
        let log = DecisionLog::new(pool);
        let recent = log.recent(5).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].url, "https://durable.test");
        assert!(recent[0].is_phishing);
    }
}
