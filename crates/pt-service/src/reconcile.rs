//! CSV export, import and import preview.

use std::io;

use chrono::{DateTime, Utc};
use pt_core::records::{self, CsvRecord};
use pt_db::{EntryFields, Queries};
use serde::Serialize;
use tracing::{debug, info};

use crate::lifecycle::{DEFAULT_CATEGORY_COLOR, sync_tags};
use crate::{ServiceError, Tracker};

/// Counts of what an import changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Rows stored under a fresh id.
    pub inserted: usize,
    /// Rows written under the id they carried.
    pub upserted: usize,
    pub categories_created: usize,
}

/// How a previewed row relates to the stored entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PreviewStatus {
    New,
    Updated,
}

/// Which fields of an existing entry a row would change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FieldChanges {
    pub description: bool,
    pub start_time: bool,
    pub end_time: bool,
    pub category: bool,
}

impl FieldChanges {
    pub const fn any(&self) -> bool {
        self.description || self.start_time || self.end_time || self.category
    }
}

/// One row of an import preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewEntry {
    pub line: u64,
    pub id: Option<i64>,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub status: PreviewStatus,
    /// All false for new rows.
    pub changes: FieldChanges,
}

impl Tracker {
    /// Writes every entry, running or closed, as CSV. Returns the row count.
    pub fn export_csv<W: io::Write>(&self, writer: W) -> Result<usize, ServiceError> {
        let rows: Vec<CsvRecord> = self
            .db
            .queries()
            .list_all_entries()?
            .into_iter()
            .map(|row| CsvRecord {
                id: Some(row.entry.id),
                description: row.entry.description,
                start_time: row.entry.start_time,
                end_time: row.entry.end_time,
                category: row.category_name,
            })
            .collect();

        records::write_records(writer, &rows)?;
        debug!(rows = rows.len(), "exported entries");
        Ok(rows.len())
    }

    /// Imports CSV rows in one transaction.
    pub fn import_csv<R: io::Read>(&mut self, reader: R) -> Result<ImportSummary, ServiceError> {
        self.import_csv_at(reader, Utc::now())
    }

    /// Like [`import_csv`](Self::import_csv), using `now` as the clock.
    ///
    /// Every row is parsed before anything is written; a row with a bad time
    /// fails the whole import. Rows with an id overwrite (or create) that entry.
    /// A row without an end time closes any other running entry.
    pub fn import_csv_at<R: io::Read>(
        &mut self,
        reader: R,
        now: DateTime<Utc>,
    ) -> Result<ImportSummary, ServiceError> {
        let mut parsed = Vec::new();
        for row in records::read_rows(reader)? {
            if row.is_blank() {
                continue;
            }
            let record = row.to_record().map_err(|source| ServiceError::InvalidRow {
                line: row.line,
                source,
            })?;
            parsed.push(record);
        }

        let tx = self.db.transaction()?;
        let q = tx.queries();
        let mut summary = ImportSummary::default();

        for record in &parsed {
            let category_id = match record.category.as_deref() {
                Some(name) => Some(resolve_category(q, name, now, &mut summary)?),
                None => None,
            };
            let fields = EntryFields {
                description: record.description.clone(),
                start_time: record.start_time,
                end_time: record.end_time,
                category_id,
            };

            if fields.end_time.is_none() {
                q.close_active_entries(now, record.id)?;
            }
            let entry = match record.id {
                Some(id) => {
                    summary.upserted += 1;
                    q.upsert_entry(id, &fields, now)?
                }
                None => {
                    summary.inserted += 1;
                    q.create_entry(&fields, now)?
                }
            };
            sync_tags(q, entry.id, &entry.description, now)?;
        }

        tx.commit()?;
        info!(
            inserted = summary.inserted,
            upserted = summary.upserted,
            categories_created = summary.categories_created,
            "imported csv"
        );
        Ok(summary)
    }

    /// Classifies rows against stored entries without writing anything.
    ///
    /// Rows whose id matches an identical entry are left out. Rows with an
    /// unparseable start time are skipped; an unparseable end time counts as empty.
    pub fn preview_csv<R: io::Read>(&self, reader: R) -> Result<Vec<PreviewEntry>, ServiceError> {
        let q = self.db.queries();
        let mut preview = Vec::new();

        for row in records::read_rows(reader)? {
            if row.is_blank() {
                continue;
            }
            let Ok(start_time) = row.start() else {
                debug!(line = row.line, "skipping row with invalid start time");
                continue;
            };
            let end_time = row.end().ok().flatten();
            let category = row.category().map(str::to_string);

            let existing = match row.id {
                Some(id) => q.get_entry(id)?,
                None => None,
            };
            let (status, changes) = match existing {
                Some(existing) => {
                    let changes = FieldChanges {
                        description: existing.entry.description != row.description,
                        start_time: existing.entry.start_time != start_time,
                        end_time: existing.entry.end_time != end_time,
                        category: existing.category_name != category,
                    };
                    if !changes.any() {
                        continue;
                    }
                    (PreviewStatus::Updated, changes)
                }
                None => (PreviewStatus::New, FieldChanges::default()),
            };

            preview.push(PreviewEntry {
                line: row.line,
                id: row.id,
                description: row.description,
                start_time,
                end_time,
                category,
                status,
                changes,
            });
        }
        Ok(preview)
    }
}

fn resolve_category(
    q: Queries<'_>,
    name: &str,
    now: DateTime<Utc>,
    summary: &mut ImportSummary,
) -> Result<i64, ServiceError> {
    if let Some(category) = q.get_category_by_name(name)? {
        return Ok(category.id);
    }
    let category = q.create_category(name, DEFAULT_CATEGORY_COLOR, now)?;
    summary.categories_created += 1;
    debug!(id = category.id, name, "created category during import");
    Ok(category.id)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use chrono::TimeZone;

    use super::*;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, hour, minute, 0).unwrap()
    }

    fn export(tracker: &Tracker) -> String {
        let mut out = Vec::new();
        tracker.export_csv(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn export_writes_all_entries_with_category_names() {
        let mut tracker = Tracker::open_in_memory().unwrap();
        let work = tracker.create_category("Work", "#ff0000").unwrap();
        tracker.start_at("Deep work, #focus", Some(work.id), at(9, 0)).unwrap();
        tracker.start_at("Lunch", None, at(12, 0)).unwrap();

        assert_eq!(
            export(&tracker),
            "id,description,start_time,end_time,category\n\
             1,\"Deep work, #focus\",2024-01-15T09:00:00Z,2024-01-15T12:00:00Z,Work\n\
             2,Lunch,2024-01-15T12:00:00Z,,\n"
        );
    }

    #[test]
    fn import_creates_entries_categories_and_tags() {
        let mut tracker = Tracker::open_in_memory().unwrap();
        let input = "description,start_time,end_time,category\n\
                     Review #code,2024-01-15 09:00:00,2024-01-15 10:00:00,Work\n\
                     Plan #code #ops,2024-01-15T11:00:00Z,2024-01-15T11:30:00Z,Work\n\
                     ,,,\n\
                     Walk,2024-01-15,2024-01-15 00:45,\n";

        let summary = tracker.import_csv_at(Cursor::new(input), at(18, 0)).unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                inserted: 3,
                upserted: 0,
                categories_created: 1,
            }
        );

        let categories = tracker.list_categories().unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].color, DEFAULT_CATEGORY_COLOR);

        let tags: Vec<String> = tracker
            .list_tags()
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(tags, vec!["code", "ops"]);
        assert_eq!(tracker.list_time_entries().unwrap().len(), 3);
    }

    #[test]
    fn import_with_ids_upserts() {
        let mut tracker = Tracker::open_in_memory().unwrap();
        tracker.start_at("original", None, at(9, 0)).unwrap();
        tracker.stop_at(at(10, 0)).unwrap();

        let input = "id,description,start_time,end_time,category\n\
                     1,edited #fix,2024-01-15T09:00:00Z,2024-01-15T10:15:00Z,\n\
                     7,restored,2024-01-15T13:00:00Z,2024-01-15T14:00:00Z,\n";
        let summary = tracker.import_csv_at(Cursor::new(input), at(18, 0)).unwrap();
        assert_eq!(summary.upserted, 2);
        assert_eq!(summary.inserted, 0);

        let edited = tracker.get_time_entry(1).unwrap();
        assert_eq!(edited.entry.description, "edited #fix");
        assert_eq!(edited.entry.end_time, Some(at(10, 15)));
        assert_eq!(tracker.list_entry_tags(1).unwrap()[0].name, "fix");

        let restored = tracker.get_time_entry(7).unwrap();
        assert_eq!(restored.entry.start_time, at(13, 0));
    }

    #[test]
    fn import_of_open_row_closes_other_active_entry() {
        let mut tracker = Tracker::open_in_memory().unwrap();
        let running = tracker.start_at("running", None, at(9, 0)).unwrap();

        let input = "description,start_time\nimported,2024-01-15T10:00:00Z\n";
        tracker.import_csv_at(Cursor::new(input), at(11, 0)).unwrap();

        let previous = tracker.get_time_entry(running.entry.id).unwrap();
        assert_eq!(previous.entry.end_time, Some(at(11, 0)));
        let active = tracker.get_active_time_entry().unwrap().unwrap();
        assert_eq!(active.entry.description, "imported");
    }

    #[test]
    fn reimporting_running_entry_keeps_it_running() {
        let mut tracker = Tracker::open_in_memory().unwrap();
        let running = tracker.start_at("running", None, at(9, 0)).unwrap();
        let csv = export(&tracker);

        tracker.import_csv_at(Cursor::new(csv), at(11, 0)).unwrap();
        let active = tracker.get_active_time_entry().unwrap().unwrap();
        assert_eq!(active.entry.id, running.entry.id);
    }

    #[test]
    fn invalid_time_rolls_back_whole_import() {
        let mut tracker = Tracker::open_in_memory().unwrap();
        let input = "description,start_time,end_time,category\n\
                     good,2024-01-15T09:00:00Z,2024-01-15T10:00:00Z,Work\n\
                     bad,2024-01-15T11:00:00Z,whenever,Work\n";

        let err = tracker
            .import_csv_at(Cursor::new(input), at(18, 0))
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidRow { line: 3, .. }));
        assert_eq!(
            err.to_string(),
            "row 3: invalid end_time 'whenever': unsupported time format"
        );
        assert!(tracker.list_time_entries().unwrap().is_empty());
        assert!(tracker.list_categories().unwrap().is_empty());
    }

    #[test]
    fn import_rejects_header_without_required_columns() {
        let mut tracker = Tracker::open_in_memory().unwrap();
        let err = tracker
            .import_csv_at(Cursor::new("id,description\n1,oops\n"), at(18, 0))
            .unwrap_err();
        assert_eq!(err.to_string(), "missing required column: start_time");
    }

    #[test]
    fn export_then_import_round_trips() {
        let mut source = Tracker::open_in_memory().unwrap();
        let work = source.create_category("Work", "#ff0000").unwrap();
        source.start_at("Design #arch", Some(work.id), at(9, 0)).unwrap();
        source.start_at("Review #arch #pr", None, at(10, 30)).unwrap();
        source.stop_at(at(11, 15)).unwrap();
        let csv = export(&source);

        let mut target = Tracker::open_in_memory().unwrap();
        target.import_csv_at(Cursor::new(csv.as_bytes()), at(18, 0)).unwrap();

        assert_eq!(export(&target), csv);
        let source_tags: Vec<String> =
            source.list_tags().unwrap().into_iter().map(|t| t.name).collect();
        let target_tags: Vec<String> =
            target.list_tags().unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(source_tags, target_tags);

        assert!(target.preview_csv(Cursor::new(csv)).unwrap().is_empty());
    }

    #[test]
    fn preview_flags_changed_fields() {
        let mut tracker = Tracker::open_in_memory().unwrap();
        let work = tracker.create_category("Work", "#ff0000").unwrap();
        tracker.start_at("Original", Some(work.id), at(9, 0)).unwrap();
        tracker.stop_at(at(10, 0)).unwrap();

        let input = "id,description,start_time,end_time,category\n\
                     1,Original,2024-01-15T09:00:00Z,2024-01-15T10:30:00Z,Personal\n\
                     ,Fresh,2024-01-15T12:00:00Z,,\n\
                     99,Unknown id,2024-01-15T13:00:00Z,,\n\
                     ,Broken,not a time,,\n\
                     ,Bad end,2024-01-15T14:00:00Z,later,\n";
        let preview = tracker.preview_csv(Cursor::new(input)).unwrap();

        assert_eq!(preview.len(), 4);
        assert_eq!(preview[0].status, PreviewStatus::Updated);
        assert_eq!(
            preview[0].changes,
            FieldChanges {
                description: false,
                start_time: false,
                end_time: true,
                category: true,
            }
        );
        assert_eq!(preview[1].status, PreviewStatus::New);
        assert_eq!(preview[2].status, PreviewStatus::New);
        assert_eq!(preview[2].id, Some(99));
        assert_eq!(preview[3].description, "Bad end");
        assert_eq!(preview[3].end_time, None);

        assert_eq!(tracker.list_time_entries().unwrap().len(), 1);
        assert_eq!(tracker.list_categories().unwrap().len(), 1);
    }
}
