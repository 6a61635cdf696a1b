//! `SQLite` implementation of [`HistorySink`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use thermohub_app::ports::HistorySink;
use thermohub_domain::error::ThermohubError;
use thermohub_domain::history::HistoryEntry;
use thermohub_domain::id::AccessoryId;

use crate::error::StorageError;

struct Wrapper(HistoryEntry);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(HistoryEntry {
            time: row.try_get("time")?,
            temperature: row.try_get("temperature")?,
            humidity: row.try_get("humidity")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO history (accessory_id, time, temperature, humidity)
    VALUES (?, ?, ?, ?)
";

const SELECT_RECENT: &str = r"
    SELECT time, temperature, humidity FROM history
    WHERE accessory_id = ?
    ORDER BY time DESC, id DESC
    LIMIT ?
";

/// `SQLite`-backed history log.
pub struct SqliteHistorySink {
    pool: SqlitePool,
}

impl SqliteHistorySink {
    /// Create a new sink using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl HistorySink for SqliteHistorySink {
    fn append(
        &self,
        accessory_id: AccessoryId,
        entry: HistoryEntry,
    ) -> impl Future<Output = Result<(), ThermohubError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(accessory_id.to_string())
                .bind(entry.time)
                .bind(entry.temperature)
                .bind(entry.humidity)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;
            Ok(())
        }
    }

    fn recent(
        &self,
        accessory_id: AccessoryId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<HistoryEntry>, ThermohubError>> + Send {
        let pool = self.pool.clone();
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_RECENT)
                .bind(accessory_id.to_string())
                .bind(limit)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;
            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }
}
