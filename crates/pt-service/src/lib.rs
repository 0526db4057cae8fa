//! Time tracking engine.
//!
//! [`Tracker`] owns one [`Database`] connection and exposes the operations the
//! front end calls:
//! - Lifecycle: start/stop timers, edit and delete entries, keep tags in sync
//! - Categories: create, rename, recolor and delete
//! - Reports: totals and per-category breakdowns over a date range
//! - CSV: export every entry, import with upsert by id, preview changes
//!
//! Every mutating operation runs inside one write transaction, so a failure
//! leaves the store as it was. Concurrent callers each open their own
//! `Tracker` on the same database file.

mod lifecycle;
mod reconcile;
mod report;

use std::path::Path;

use pt_core::CsvError;
use pt_db::{Database, DbError};
use thiserror::Error;

pub use lifecycle::{DEFAULT_CATEGORY_COLOR, EMPTY_DESCRIPTION};
pub use reconcile::{FieldChanges, ImportSummary, PreviewEntry, PreviewStatus};
pub use report::{CategoryBreakdown, Report, ReportFilter, UNCATEGORIZED_COLOR, UNCATEGORIZED_NAME};

/// Service errors.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The targeted entry or category does not exist.
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },
    /// The operation needs a running entry and there is none.
    #[error("no active time entry")]
    NoActiveEntry,
    /// An import row could not be parsed.
    #[error("row {line}: {source}")]
    InvalidRow { line: u64, source: CsvError },
    /// Malformed CSV document.
    #[error(transparent)]
    Csv(#[from] CsvError),
    /// Storage failure; the operation was rolled back.
    #[error(transparent)]
    Db(#[from] DbError),
}

/// The time tracking engine.
pub struct Tracker {
    db: Database,
}

impl Tracker {
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Opens the database at `path` and wraps it.
    pub fn open(path: &Path) -> Result<Self, ServiceError> {
        Ok(Self::new(Database::open(path)?))
    }

    /// Opens a tracker over a fresh in-memory database.
    pub fn open_in_memory() -> Result<Self, ServiceError> {
        Ok(Self::new(Database::open_in_memory()?))
    }
}
