//! SQLite document store
//!
//! Documents are kept as JSON text next to the few columns the queries
//! filter and order on. Metadata rows are keyed by (type, id) so the type
//! acts as the partition key.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use super::{assign_id, MeetingStore, MetadataStore, StoreError, StoreResult};
use crate::models::{Meeting, MetadataItem, MEETING_TYPE};

const MAX_CONNECTIONS: u32 = 5;

const SCHEMA: [&str; 4] = [
    "CREATE TABLE IF NOT EXISTS metadata_items (
        id TEXT NOT NULL,
        type TEXT NOT NULL,
        value TEXT NOT NULL,
        is_active INTEGER NOT NULL,
        sort_order INTEGER NOT NULL,
        document TEXT NOT NULL,
        PRIMARY KEY (type, id)
    )",
    "DROP INDEX IF EXISTS idx_metadata_type_value",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_metadata_active_value
        ON metadata_items (type, value) WHERE is_active = 1",
    "CREATE TABLE IF NOT EXISTS meetings (
        id TEXT PRIMARY KEY NOT NULL,
        start_time TEXT NOT NULL,
        document TEXT NOT NULL
    )",
];

// == SQLite Store ==
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connects to `database_url`, creating the file and schema if missing.
    ///
    /// An in-memory URL gets a single connection since every SQLite
    /// connection to `:memory:` opens its own database.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let max_connections = if database_url.contains(":memory:") {
            1
        } else {
            MAX_CONNECTIONS
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        info!(url = %database_url, "sqlite document store ready");
        Ok(store)
    }

    async fn migrate(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

fn decode<T: serde::de::DeserializeOwned>(row: &sqlx::sqlite::SqliteRow) -> StoreResult<T> {
    let document: String = row.try_get("document")?;
    Ok(serde_json::from_str(&document)?)
}

/// Maps unique-constraint violations to [`StoreError::Conflict`] on `key`.
fn map_write_error(err: sqlx::Error, key: &str) -> StoreError {
    let unique = err
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false);
    if unique {
        StoreError::Conflict(key.to_string())
    } else {
        StoreError::Sqlx(err)
    }
}

impl MetadataStore for SqliteStore {
    async fn query_by_type(&self, metadata_type: &str) -> StoreResult<Vec<MetadataItem>> {
        let rows = sqlx::query(
            "SELECT document FROM metadata_items
             WHERE type = ? AND is_active = 1
             ORDER BY sort_order, value",
        )
        .bind(metadata_type)
        .fetch_all(&self.pool)
        .await?;

        debug!(metadata_type, count = rows.len(), "metadata query");
        rows.iter().map(decode).collect()
    }

    async fn query_by_type_and_value(
        &self,
        metadata_type: &str,
        value: &str,
    ) -> StoreResult<Option<MetadataItem>> {
        let row = sqlx::query(
            "SELECT document FROM metadata_items
             WHERE type = ? AND value = ? AND is_active = 1
             LIMIT 1",
        )
        .bind(metadata_type)
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(decode).transpose()
    }

    async fn exists_valid(&self, metadata_type: &str, value: &str) -> StoreResult<bool> {
        let row = sqlx::query(
            "SELECT COUNT(1) AS matches FROM metadata_items
             WHERE type = ? AND value = ? AND is_active = 1",
        )
        .bind(metadata_type)
        .bind(value)
        .fetch_one(&self.pool)
        .await?;

        let matches: i64 = row.try_get("matches")?;
        Ok(matches > 0)
    }

    async fn create(&self, mut item: MetadataItem) -> StoreResult<MetadataItem> {
        item.id = assign_id(&item.id);

        let document = serde_json::to_string(&item)?;
        sqlx::query(
            "INSERT INTO metadata_items (id, type, value, is_active, sort_order, document)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&item.id)
        .bind(&item.metadata_type)
        .bind(&item.value)
        .bind(item.is_active)
        .bind(item.sort_order)
        .bind(document)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            map_write_error(err, &format!("{}/{}", item.metadata_type, item.value))
        })?;

        debug!(id = %item.id, metadata_type = %item.metadata_type, "metadata document created");
        Ok(item)
    }

    async fn update(&self, item: MetadataItem) -> StoreResult<bool> {
        let document = serde_json::to_string(&item)?;
        let result = sqlx::query(
            "UPDATE metadata_items
             SET value = ?, is_active = ?, sort_order = ?, document = ?
             WHERE id = ? AND type = ?",
        )
        .bind(&item.value)
        .bind(item.is_active)
        .bind(item.sort_order)
        .bind(document)
        .bind(&item.id)
        .bind(&item.metadata_type)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            map_write_error(err, &format!("{}/{}", item.metadata_type, item.value))
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str, metadata_type: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM metadata_items WHERE id = ? AND type = ?")
            .bind(id)
            .bind(metadata_type)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl MeetingStore for SqliteStore {
    async fn list_meetings(&self) -> StoreResult<Vec<Meeting>> {
        let rows = sqlx::query("SELECT document FROM meetings ORDER BY start_time, id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(decode).collect()
    }

    async fn get_meeting(&self, id: &str) -> StoreResult<Option<Meeting>> {
        let row = sqlx::query("SELECT document FROM meetings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(decode).transpose()
    }

    async fn create_meeting(&self, mut meeting: Meeting) -> StoreResult<Meeting> {
        meeting.id = assign_id(&meeting.id);
        meeting.meeting_type = MEETING_TYPE.to_string();

        let document = serde_json::to_string(&meeting)?;
        sqlx::query("INSERT INTO meetings (id, start_time, document) VALUES (?, ?, ?)")
            .bind(&meeting.id)
            .bind(meeting.start_time.to_rfc3339())
            .bind(document)
            .execute(&self.pool)
            .await
            .map_err(|err| map_write_error(err, &meeting.id))?;

        Ok(meeting)
    }

    async fn update_meeting(&self, meeting: Meeting) -> StoreResult<Option<Meeting>> {
        let document = serde_json::to_string(&meeting)?;
        let result = sqlx::query("UPDATE meetings SET start_time = ?, document = ? WHERE id = ?")
            .bind(meeting.start_time.to_rfc3339())
            .bind(document)
            .bind(&meeting.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(meeting))
    }
}
