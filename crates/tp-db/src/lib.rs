//! Storage layer for the trip planner.
//!
//! Persists plan snapshots using `rusqlite`. Every save appends a new row, so
//! the table doubles as a short history of the plan; only the newest
//! [`HISTORY_LIMIT`] rows are kept.
//!
//! # Thread Safety
//!
//! [`Database`] wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! The CLI opens one connection per invocation and is the only writer.
//!
//! # Schema
//!
//! `saved_at` is TEXT in RFC 3339 format with millisecond precision (e.g.
//! `2025-05-01T12:00:00.000Z`), so lexicographic order matches chronological
//! order. `document` holds the full plan document as JSON; its own `version`
//! field governs compatibility, not this schema.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;
use tp_core::{PlanDocument, PlanError, SnapshotStore};

/// Number of snapshots kept after each save.
pub const HISTORY_LIMIT: usize = 20;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A document could not be serialized for storage.
    #[error("failed to encode plan document: {0}")]
    Encode(#[from] serde_json::Error),
    /// A stored document no longer parses.
    #[error("snapshot {snapshot_id} is unreadable")]
    InvalidDocument {
        snapshot_id: i64,
        #[source]
        source: PlanError,
    },
    /// Failed to parse a stored timestamp.
    #[error("invalid timestamp for snapshot {snapshot_id}: {timestamp}")]
    TimestampParse {
        snapshot_id: i64,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

/// Summary of one stored snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRecord {
    pub id: i64,
    pub saved_at: DateTime<Utc>,
    pub trip_name: Option<String>,
    pub entries: usize,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The schema is initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database, destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the schema. Idempotent.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS snapshots (
                id INTEGER PRIMARY KEY,
                saved_at TEXT NOT NULL,
                trip_name TEXT,
                document TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_snapshots_saved_at ON snapshots(saved_at);
            ",
        )?;
        Ok(())
    }

    /// Stored snapshots, newest first.
    pub fn history(&self) -> Result<Vec<SnapshotRecord>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, saved_at, trip_name, json_array_length(document, '$.entries')
            FROM snapshots
            ORDER BY id DESC
            ",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<i64>>(3)?,
            ))
        })?;
        let mut records = Vec::new();
        for row in rows {
            let (id, saved_at, trip_name, entries) = row?;
            records.push(SnapshotRecord {
                id,
                saved_at: parse_timestamp(&saved_at, id)?,
                trip_name,
                entries: entries.and_then(|n| usize::try_from(n).ok()).unwrap_or(0),
            });
        }
        Ok(records)
    }

    /// Number of stored snapshots.
    pub fn snapshot_count(&self) -> Result<usize, DbError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM snapshots", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

impl SnapshotStore for Database {
    type Error = DbError;

    /// Appends `doc` and prunes history beyond [`HISTORY_LIMIT`], atomically.
    fn save(&mut self, doc: &PlanDocument) -> Result<(), DbError> {
        let document = serde_json::to_string(doc)?;
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO snapshots (saved_at, trip_name, document) VALUES (?, ?, ?)",
            params![format_timestamp(doc.exported_at), doc.trip_name, document],
        )?;
        let id = tx.last_insert_rowid();
        let pruned = tx.execute(
            "
            DELETE FROM snapshots
            WHERE id NOT IN (SELECT id FROM snapshots ORDER BY id DESC LIMIT ?)
            ",
            params![i64::try_from(HISTORY_LIMIT).unwrap_or(i64::MAX)],
        )?;
        tx.commit()?;
        tracing::debug!(
            snapshot_id = id,
            entries = doc.entries.len(),
            pruned,
            "saved snapshot"
        );
        Ok(())
    }

    fn load(&self) -> Result<Option<PlanDocument>, DbError> {
        let latest = self
            .conn
            .query_row(
                "SELECT id, document FROM snapshots ORDER BY id DESC LIMIT 1",
                [],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        let Some((snapshot_id, document)) = latest else {
            return Ok(None);
        };
        let doc = PlanDocument::parse(&document)
            .map_err(|source| DbError::InvalidDocument {
                snapshot_id,
                source,
            })?;
        tracing::debug!(snapshot_id, entries = doc.entries.len(), "loaded snapshot");
        Ok(Some(doc))
    }
}

fn parse_timestamp(timestamp: &str, snapshot_id: i64) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            snapshot_id,
            timestamp: timestamp.to_string(),
            source,
        })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
