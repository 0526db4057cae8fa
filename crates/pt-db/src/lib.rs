//! Storage layer for the time tracker.
//!
//! Provides persistence for time entries, categories and tags using `rusqlite`.
//! All reads and writes go through [`Queries`], which is obtained either from the
//! [`Database`] directly (autocommit) or from a [`Transaction`] so that several
//! operations apply atomically.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` instance can be moved between threads but cannot be shared
//! across threads without external synchronization. Concurrent writers should
//! open their own `Database` on the same file; write transactions begin
//! `IMMEDIATE`, so SQLite serializes them and later writers wait on the busy
//! timeout instead of failing.
//!
//! # Schema
//!
//! ## Timestamp Format
//!
//! Timestamps are stored as TEXT in RFC 3339 UTC with nanosecond precision
//! (e.g., `2024-01-15T10:30:00.000000000Z`). The fixed width means:
//! - Lexicographic ordering matches chronological ordering, so range filters run in SQL
//! - Every instant read from CSV or the clock round-trips exactly
//!
//! ## Relations
//!
//! - `time_entries.category_id` references `categories(id)` with `ON DELETE SET NULL`
//! - `time_entry_tags` links entries and tags, cascading on either side
//!
//! Foreign keys are enabled on every connection.

mod queries;

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, Row, TransactionBehavior};
use serde::Serialize;
use thiserror::Error;

pub use queries::Queries;

/// How long a connection waits for another writer before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// A write transaction.
///
/// Dropping the transaction without calling [`Transaction::commit`] rolls it back,
/// so every early return or `?` inside a multi-step operation leaves the store untouched.
pub struct Transaction<'conn> {
    tx: rusqlite::Transaction<'conn>,
}

/// A stored time entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeEntry {
    pub id: i64,
    pub description: String,
    pub start_time: DateTime<Utc>,
    /// `None` while the entry is running.
    pub end_time: Option<DateTime<Utc>>,
    pub category_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl TimeEntry {
    /// Whether the entry has no end time yet.
    pub const fn is_running(&self) -> bool {
        self.end_time.is_none()
    }

    /// Elapsed time of a closed entry.
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.end_time.map(|end| end - self.start_time)
    }
}

/// A time entry joined with its category's display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryWithCategory {
    #[serde(flatten)]
    pub entry: TimeEntry,
    pub category_name: Option<String>,
    pub category_color: Option<String>,
}

/// A category entries can be filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// Display color as a hex string (e.g. `#ff0000`).
    pub color: String,
    pub created_at: DateTime<Utc>,
}

/// A hashtag derived from entry descriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// The mutable fields of a time entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFields {
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub category_id: Option<i64>,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.busy_timeout(BUSY_TIMEOUT)?;
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                color TEXT NOT NULL DEFAULT '#cccccc',
                created_at TEXT NOT NULL
            );

            -- Time entries: end_time is NULL while the entry is running
            CREATE TABLE IF NOT EXISTS time_entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                description TEXT NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT,
                category_id INTEGER,
                created_at TEXT NOT NULL,
                FOREIGN KEY (category_id) REFERENCES categories(id) ON DELETE SET NULL
            );

            CREATE INDEX IF NOT EXISTS idx_time_entries_start ON time_entries(start_time);
            CREATE INDEX IF NOT EXISTS idx_time_entries_end ON time_entries(end_time);
            CREATE INDEX IF NOT EXISTS idx_time_entries_category ON time_entries(category_id);

            CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS time_entry_tags (
                time_entry_id INTEGER NOT NULL,
                tag_id INTEGER NOT NULL,
                PRIMARY KEY (time_entry_id, tag_id),
                FOREIGN KEY (time_entry_id) REFERENCES time_entries(id) ON DELETE CASCADE,
                FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_time_entry_tags_tag ON time_entry_tags(tag_id);
            ",
        )?;
        Ok(())
    }

    /// Returns a query handle in autocommit mode.
    pub fn queries(&self) -> Queries<'_> {
        Queries::new(&self.conn)
    }

    /// Begins a write transaction.
    ///
    /// The transaction takes SQLite's write lock immediately, so check-then-act
    /// sequences inside it cannot interleave with another connection's writes.
    pub fn transaction(&mut self) -> Result<Transaction<'_>, DbError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        Ok(Transaction { tx })
    }
}

impl Transaction<'_> {
    /// Returns a query handle bound to this transaction.
    pub fn queries(&self) -> Queries<'_> {
        Queries::new(&self.tx)
    }

    /// Commits every write issued through this transaction.
    pub fn commit(self) -> Result<(), DbError> {
        self.tx.commit()?;
        Ok(())
    }
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_timestamp(&raw, idx)
}

fn optional_timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|raw| parse_timestamp(&raw, idx)).transpose()
}

fn parse_timestamp(raw: &str, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)))
}
