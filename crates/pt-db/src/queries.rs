//! CRUD statements over the fixed row shapes.

use chrono::{DateTime, Utc};
use pt_core::CategoryFilter;
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::{
    Category, DbError, EntryFields, EntryWithCategory, Tag, TimeEntry, format_timestamp,
    optional_timestamp_column, timestamp_column,
};

const SELECT_ENTRY: &str = "
    SELECT e.id, e.description, e.start_time, e.end_time, e.category_id, e.created_at
    FROM time_entries e
";

const SELECT_ENTRY_WITH_CATEGORY: &str = "
    SELECT e.id, e.description, e.start_time, e.end_time, e.category_id, e.created_at,
           c.name, c.color
    FROM time_entries e
    LEFT JOIN categories c ON c.id = e.category_id
";

const RETURNING_ENTRY: &str =
    "RETURNING id, description, start_time, end_time, category_id, created_at";

/// Statements against an open connection or transaction.
///
/// Obtained from [`Database::queries`](crate::Database::queries) or
/// [`Transaction::queries`](crate::Transaction::queries).
#[derive(Clone, Copy)]
pub struct Queries<'conn> {
    conn: &'conn Connection,
}

impl<'conn> Queries<'conn> {
    pub(crate) const fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    // ========== Time Entries ==========

    /// Inserts a new entry with a fresh id.
    pub fn create_entry(
        &self,
        fields: &EntryFields,
        created_at: DateTime<Utc>,
    ) -> Result<TimeEntry, DbError> {
        let entry = self.conn.query_row(
            &format!(
                "
                INSERT INTO time_entries (description, start_time, end_time, category_id, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                {RETURNING_ENTRY}
                "
            ),
            params![
                fields.description,
                format_timestamp(fields.start_time),
                fields.end_time.map(format_timestamp),
                fields.category_id,
                format_timestamp(created_at),
            ],
            entry_from_row,
        )?;
        Ok(entry)
    }

    /// Fetches an entry with its category display fields.
    pub fn get_entry(&self, id: i64) -> Result<Option<EntryWithCategory>, DbError> {
        let entry = self
            .conn
            .query_row(
                &format!("{SELECT_ENTRY_WITH_CATEGORY} WHERE e.id = ?1"),
                [id],
                entry_with_category_from_row,
            )
            .optional()?;
        Ok(entry)
    }

    /// Returns the most recently started entry without an end time.
    pub fn get_active_entry(&self) -> Result<Option<TimeEntry>, DbError> {
        let entry = self
            .conn
            .query_row(
                &format!(
                    "{SELECT_ENTRY} WHERE e.end_time IS NULL ORDER BY e.start_time DESC, e.id DESC LIMIT 1"
                ),
                [],
                entry_from_row,
            )
            .optional()?;
        Ok(entry)
    }

    /// Lists closed entries, most recent first.
    pub fn list_entries(&self) -> Result<Vec<EntryWithCategory>, DbError> {
        self.query_entries_with_category(
            &format!(
                "{SELECT_ENTRY_WITH_CATEGORY} WHERE e.end_time IS NOT NULL ORDER BY e.start_time DESC, e.id DESC"
            ),
            [],
        )
    }

    /// Lists every entry, running or closed, ordered by id.
    pub fn list_all_entries(&self) -> Result<Vec<EntryWithCategory>, DbError> {
        self.query_entries_with_category(
            &format!("{SELECT_ENTRY_WITH_CATEGORY} ORDER BY e.id ASC"),
            [],
        )
    }

    /// Lists entries that started within `[start, end]` and pass `category`.
    pub fn list_report_entries(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        category: CategoryFilter,
    ) -> Result<Vec<EntryWithCategory>, DbError> {
        self.query_entries_with_category(
            &format!(
                "
                {SELECT_ENTRY_WITH_CATEGORY}
                WHERE e.start_time >= ?1 AND e.start_time <= ?2
                  AND (?3 = 0
                       OR (?3 = -1 AND e.category_id IS NULL)
                       OR e.category_id = ?3)
                ORDER BY e.start_time DESC, e.id DESC
                "
            ),
            params![
                format_timestamp(start),
                format_timestamp(end),
                category.as_raw()
            ],
        )
    }

    /// Overwrites every mutable field. Returns `None` if the id does not exist.
    pub fn update_entry(
        &self,
        id: i64,
        fields: &EntryFields,
    ) -> Result<Option<TimeEntry>, DbError> {
        let entry = self
            .conn
            .query_row(
                &format!(
                    "
                    UPDATE time_entries
                    SET description = ?1, start_time = ?2, end_time = ?3, category_id = ?4
                    WHERE id = ?5
                    {RETURNING_ENTRY}
                    "
                ),
                params![
                    fields.description,
                    format_timestamp(fields.start_time),
                    fields.end_time.map(format_timestamp),
                    fields.category_id,
                    id,
                ],
                entry_from_row,
            )
            .optional()?;
        Ok(entry)
    }

    /// Sets the end time of one entry.
    pub fn set_entry_end(&self, id: i64, end: DateTime<Utc>) -> Result<usize, DbError> {
        let updated = self.conn.execute(
            "UPDATE time_entries SET end_time = ?1 WHERE id = ?2",
            params![format_timestamp(end), id],
        )?;
        Ok(updated)
    }

    /// Ends every running entry except `keep`.
    pub fn close_active_entries(
        &self,
        end: DateTime<Utc>,
        keep: Option<i64>,
    ) -> Result<usize, DbError> {
        let updated = self.conn.execute(
            "
            UPDATE time_entries
            SET end_time = ?1
            WHERE end_time IS NULL AND (?2 IS NULL OR id <> ?2)
            ",
            params![format_timestamp(end), keep],
        )?;
        Ok(updated)
    }

    /// Writes an entry under an explicit id, replacing the row if it exists.
    ///
    /// `created_at` only applies when the row is inserted.
    pub fn upsert_entry(
        &self,
        id: i64,
        fields: &EntryFields,
        created_at: DateTime<Utc>,
    ) -> Result<TimeEntry, DbError> {
        let entry = self.conn.query_row(
            &format!(
                "
                INSERT INTO time_entries (id, description, start_time, end_time, category_id, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ON CONFLICT(id) DO UPDATE SET
                    description = excluded.description,
                    start_time = excluded.start_time,
                    end_time = excluded.end_time,
                    category_id = excluded.category_id
                {RETURNING_ENTRY}
                "
            ),
            params![
                id,
                fields.description,
                format_timestamp(fields.start_time),
                fields.end_time.map(format_timestamp),
                fields.category_id,
                format_timestamp(created_at),
            ],
            entry_from_row,
        )?;
        Ok(entry)
    }

    /// Deletes an entry; its tag links cascade. Returns the number of rows removed.
    pub fn delete_entry(&self, id: i64) -> Result<usize, DbError> {
        let deleted = self
            .conn
            .execute("DELETE FROM time_entries WHERE id = ?1", [id])?;
        Ok(deleted)
    }

    fn query_entries_with_category<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<Vec<EntryWithCategory>, DbError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, entry_with_category_from_row)?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    // ========== Categories ==========

    pub fn create_category(
        &self,
        name: &str,
        color: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Category, DbError> {
        let category = self.conn.query_row(
            "
            INSERT INTO categories (name, color, created_at)
            VALUES (?1, ?2, ?3)
            RETURNING id, name, color, created_at
            ",
            params![name, color, format_timestamp(created_at)],
            category_from_row,
        )?;
        Ok(category)
    }

    pub fn get_category(&self, id: i64) -> Result<Option<Category>, DbError> {
        let category = self
            .conn
            .query_row(
                "SELECT id, name, color, created_at FROM categories WHERE id = ?1",
                [id],
                category_from_row,
            )
            .optional()?;
        Ok(category)
    }

    /// Looks up a category by its exact name.
    pub fn get_category_by_name(&self, name: &str) -> Result<Option<Category>, DbError> {
        let category = self
            .conn
            .query_row(
                "SELECT id, name, color, created_at FROM categories WHERE name = ?1",
                [name],
                category_from_row,
            )
            .optional()?;
        Ok(category)
    }

    /// Lists categories ordered by name.
    pub fn list_categories(&self) -> Result<Vec<Category>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, color, created_at FROM categories ORDER BY name ASC, id ASC",
        )?;
        let rows = stmt.query_map([], category_from_row)?;
        let mut categories = Vec::new();
        for row in rows {
            categories.push(row?);
        }
        Ok(categories)
    }

    /// Renames and recolors a category. Returns `None` if the id does not exist.
    pub fn update_category(
        &self,
        id: i64,
        name: &str,
        color: &str,
    ) -> Result<Option<Category>, DbError> {
        let category = self
            .conn
            .query_row(
                "
                UPDATE categories SET name = ?1, color = ?2
                WHERE id = ?3
                RETURNING id, name, color, created_at
                ",
                params![name, color, id],
                category_from_row,
            )
            .optional()?;
        Ok(category)
    }

    /// Deletes a category; referencing entries keep existing with no category.
    pub fn delete_category(&self, id: i64) -> Result<usize, DbError> {
        let deleted = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1", [id])?;
        Ok(deleted)
    }

    // ========== Tags ==========

    pub fn create_tag(&self, name: &str, created_at: DateTime<Utc>) -> Result<Tag, DbError> {
        let tag = self.conn.query_row(
            "
            INSERT INTO tags (name, created_at)
            VALUES (?1, ?2)
            RETURNING id, name, created_at
            ",
            params![name, format_timestamp(created_at)],
            tag_from_row,
        )?;
        Ok(tag)
    }

    pub fn get_tag(&self, id: i64) -> Result<Option<Tag>, DbError> {
        let tag = self
            .conn
            .query_row(
                "SELECT id, name, created_at FROM tags WHERE id = ?1",
                [id],
                tag_from_row,
            )
            .optional()?;
        Ok(tag)
    }

    pub fn get_tag_by_name(&self, name: &str) -> Result<Option<Tag>, DbError> {
        let tag = self
            .conn
            .query_row(
                "SELECT id, name, created_at FROM tags WHERE name = ?1",
                [name],
                tag_from_row,
            )
            .optional()?;
        Ok(tag)
    }

    /// Lists tags ordered by name.
    pub fn list_tags(&self) -> Result<Vec<Tag>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM tags ORDER BY name ASC")?;
        let rows = stmt.query_map([], tag_from_row)?;
        let mut tags = Vec::new();
        for row in rows {
            tags.push(row?);
        }
        Ok(tags)
    }

    pub fn delete_tag(&self, id: i64) -> Result<usize, DbError> {
        let deleted = self.conn.execute("DELETE FROM tags WHERE id = ?1", [id])?;
        Ok(deleted)
    }

    /// Deletes every tag no entry links to. Returns the number of tags removed.
    pub fn delete_orphaned_tags(&self) -> Result<usize, DbError> {
        let deleted = self.conn.execute(
            "
            DELETE FROM tags
            WHERE NOT EXISTS (
                SELECT 1 FROM time_entry_tags l WHERE l.tag_id = tags.id
            )
            ",
            [],
        )?;
        Ok(deleted)
    }

    // ========== Entry/Tag Links ==========

    /// Links a tag to an entry, ignoring duplicates.
    pub fn create_entry_tag(&self, entry_id: i64, tag_id: i64) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT OR IGNORE INTO time_entry_tags (time_entry_id, tag_id) VALUES (?1, ?2)",
            params![entry_id, tag_id],
        )?;
        Ok(())
    }

    /// Lists the tags linked to an entry, ordered by name.
    pub fn list_tags_for_entry(&self, entry_id: i64) -> Result<Vec<Tag>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT t.id, t.name, t.created_at
            FROM tags t
            JOIN time_entry_tags l ON l.tag_id = t.id
            WHERE l.time_entry_id = ?1
            ORDER BY t.name ASC
            ",
        )?;
        let rows = stmt.query_map([entry_id], tag_from_row)?;
        let mut tags = Vec::new();
        for row in rows {
            tags.push(row?);
        }
        Ok(tags)
    }

    /// Removes every tag link of an entry.
    pub fn delete_entry_tags(&self, entry_id: i64) -> Result<usize, DbError> {
        let deleted = self.conn.execute(
            "DELETE FROM time_entry_tags WHERE time_entry_id = ?1",
            [entry_id],
        )?;
        Ok(deleted)
    }
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<TimeEntry> {
    Ok(TimeEntry {
        id: row.get(0)?,
        description: row.get(1)?,
        start_time: timestamp_column(row, 2)?,
        end_time: optional_timestamp_column(row, 3)?,
        category_id: row.get(4)?,
        created_at: timestamp_column(row, 5)?,
    })
}

fn entry_with_category_from_row(row: &Row<'_>) -> rusqlite::Result<EntryWithCategory> {
    Ok(EntryWithCategory {
        entry: entry_from_row(row)?,
        category_name: row.get(6)?,
        category_color: row.get(7)?,
    })
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
        created_at: timestamp_column(row, 3)?,
    })
}

fn tag_from_row(row: &Row<'_>) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: timestamp_column(row, 2)?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use crate::Database;

    use super::*;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, hour, minute, 0).unwrap()
    }

    fn fields(description: &str, start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> EntryFields {
        EntryFields {
            description: description.to_string(),
            start_time: start,
            end_time: end,
            category_id: None,
        }
    }

    #[test]
    fn create_and_get_entry_with_category() {
        let db = Database::open_in_memory().unwrap();
        let q = db.queries();
        let work = q.create_category("Work", "#ff0000", at(8, 0)).unwrap();

        let mut new = fields("Write docs", at(9, 0), Some(at(10, 0)));
        new.category_id = Some(work.id);
        let entry = q.create_entry(&new, at(9, 0)).unwrap();

        let stored = q.get_entry(entry.id).unwrap().expect("entry exists");
        assert_eq!(stored.entry, entry);
        assert_eq!(stored.category_name.as_deref(), Some("Work"));
        assert_eq!(stored.category_color.as_deref(), Some("#ff0000"));
        assert_eq!(stored.entry.duration(), Some(Duration::hours(1)));
        assert!(q.get_entry(entry.id + 100).unwrap().is_none());
    }

    #[test]
    fn active_entry_is_latest_running() {
        let db = Database::open_in_memory().unwrap();
        let q = db.queries();
        assert!(q.get_active_entry().unwrap().is_none());

        q.create_entry(&fields("closed", at(8, 0), Some(at(9, 0))), at(8, 0))
            .unwrap();
        let running = q.create_entry(&fields("running", at(9, 30), None), at(9, 30)).unwrap();

        let active = q.get_active_entry().unwrap().expect("active entry");
        assert_eq!(active.id, running.id);
        assert!(active.is_running());

        assert_eq!(q.set_entry_end(running.id, at(10, 0)).unwrap(), 1);
        assert!(q.get_active_entry().unwrap().is_none());
    }

    #[test]
    fn close_active_entries_keeps_requested_id() {
        let db = Database::open_in_memory().unwrap();
        let q = db.queries();
        let first = q.create_entry(&fields("a", at(8, 0), None), at(8, 0)).unwrap();
        let second = q.create_entry(&fields("b", at(9, 0), None), at(9, 0)).unwrap();

        assert_eq!(q.close_active_entries(at(10, 0), Some(second.id)).unwrap(), 1);
        let first = q.get_entry(first.id).unwrap().unwrap();
        assert_eq!(first.entry.end_time, Some(at(10, 0)));
        assert!(q.get_entry(second.id).unwrap().unwrap().entry.is_running());

        assert_eq!(q.close_active_entries(at(11, 0), None).unwrap(), 1);
        assert!(q.get_active_entry().unwrap().is_none());
    }

    #[test]
    fn list_entries_excludes_running_and_orders_newest_first() {
        let db = Database::open_in_memory().unwrap();
        let q = db.queries();
        let early = q.create_entry(&fields("early", at(8, 0), Some(at(9, 0))), at(8, 0)).unwrap();
        let late = q.create_entry(&fields("late", at(10, 0), Some(at(11, 0))), at(10, 0)).unwrap();
        let running = q.create_entry(&fields("running", at(12, 0), None), at(12, 0)).unwrap();

        let closed: Vec<i64> = q.list_entries().unwrap().iter().map(|e| e.entry.id).collect();
        assert_eq!(closed, vec![late.id, early.id]);

        let all: Vec<i64> = q.list_all_entries().unwrap().iter().map(|e| e.entry.id).collect();
        assert_eq!(all, vec![early.id, late.id, running.id]);
    }

    #[test]
    fn report_query_applies_range_and_category_filter() {
        let db = Database::open_in_memory().unwrap();
        let q = db.queries();
        let work = q.create_category("Work", "#ff0000", at(0, 0)).unwrap();

        let mut categorized = fields("work", at(9, 0), Some(at(10, 0)));
        categorized.category_id = Some(work.id);
        let categorized = q.create_entry(&categorized, at(9, 0)).unwrap();
        let loose = q.create_entry(&fields("loose", at(11, 0), Some(at(12, 0))), at(11, 0)).unwrap();
        let yesterday = at(9, 0) - Duration::days(1);
        q.create_entry(&fields("old", yesterday, Some(yesterday + Duration::hours(1))), yesterday)
            .unwrap();

        let day_start = at(0, 0);
        let day_end = at(23, 59) + Duration::seconds(59);
        let ids = |filter| -> Vec<i64> {
            q.list_report_entries(day_start, day_end, filter)
                .unwrap()
                .iter()
                .map(|e| e.entry.id)
                .collect()
        };

        assert_eq!(ids(CategoryFilter::All), vec![loose.id, categorized.id]);
        assert_eq!(ids(CategoryFilter::Uncategorized), vec![loose.id]);
        assert_eq!(ids(CategoryFilter::Category(work.id)), vec![categorized.id]);
        assert!(ids(CategoryFilter::Category(work.id + 1)).is_empty());
    }

    #[test]
    fn report_range_is_inclusive() {
        let db = Database::open_in_memory().unwrap();
        let q = db.queries();
        let entry = q.create_entry(&fields("edge", at(9, 0), Some(at(10, 0))), at(9, 0)).unwrap();

        let rows = q
            .list_report_entries(at(9, 0), at(9, 0), CategoryFilter::All)
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].entry.id, entry.id);
    }

    #[test]
    fn update_entry_overwrites_fields() {
        let db = Database::open_in_memory().unwrap();
        let q = db.queries();
        let entry = q.create_entry(&fields("draft", at(9, 0), None), at(9, 0)).unwrap();

        let updated = q
            .update_entry(entry.id, &fields("final", at(8, 0), Some(at(9, 30))))
            .unwrap()
            .expect("entry exists");
        assert_eq!(updated.description, "final");
        assert_eq!(updated.start_time, at(8, 0));
        assert_eq!(updated.end_time, Some(at(9, 30)));
        assert_eq!(updated.created_at, entry.created_at);

        assert!(q.update_entry(999, &fields("ghost", at(8, 0), None)).unwrap().is_none());
    }

    #[test]
    fn upsert_inserts_then_updates_by_id() {
        let db = Database::open_in_memory().unwrap();
        let q = db.queries();

        let inserted = q
            .upsert_entry(42, &fields("imported", at(9, 0), Some(at(10, 0))), at(12, 0))
            .unwrap();
        assert_eq!(inserted.id, 42);
        assert_eq!(inserted.created_at, at(12, 0));

        let updated = q
            .upsert_entry(42, &fields("reimported", at(9, 15), None), at(13, 0))
            .unwrap();
        assert_eq!(updated.id, 42);
        assert_eq!(updated.description, "reimported");
        assert_eq!(updated.end_time, None);
        assert_eq!(updated.created_at, at(12, 0));
        assert_eq!(q.list_all_entries().unwrap().len(), 1);

        let next = q.create_entry(&fields("next", at(14, 0), None), at(14, 0)).unwrap();
        assert!(next.id > 42);
    }

    #[test]
    fn deleting_category_nullifies_entries() {
        let db = Database::open_in_memory().unwrap();
        let q = db.queries();
        let work = q.create_category("Work", "#ff0000", at(0, 0)).unwrap();
        let mut new = fields("work", at(9, 0), Some(at(10, 0)));
        new.category_id = Some(work.id);
        let entry = q.create_entry(&new, at(9, 0)).unwrap();

        assert_eq!(q.delete_category(work.id).unwrap(), 1);
        let stored = q.get_entry(entry.id).unwrap().expect("entry survives");
        assert_eq!(stored.entry.category_id, None);
        assert_eq!(stored.category_name, None);
    }

    #[test]
    fn category_crud() {
        let db = Database::open_in_memory().unwrap();
        let q = db.queries();
        let created = q.create_category("Work", "#ff0000", at(0, 0)).unwrap();
        assert_eq!(q.get_category(created.id).unwrap(), Some(created.clone()));
        assert_eq!(q.get_category_by_name("Work").unwrap(), Some(created.clone()));
        assert!(q.get_category_by_name("work").unwrap().is_none());

        let renamed = q
            .update_category(created.id, "Personal", "#00ff00")
            .unwrap()
            .expect("category exists");
        assert_eq!(renamed.name, "Personal");
        assert_eq!(renamed.color, "#00ff00");
        assert!(q.update_category(999, "Ghost", "#000000").unwrap().is_none());

        assert!(q.create_category("Personal", "#123456", at(1, 0)).is_err());
        assert_eq!(q.delete_category(created.id).unwrap(), 1);
        assert!(q.list_categories().unwrap().is_empty());
    }

    #[test]
    fn tag_links_cascade_and_orphans_are_removed() {
        let db = Database::open_in_memory().unwrap();
        let q = db.queries();
        let entry = q.create_entry(&fields("#a #b", at(9, 0), None), at(9, 0)).unwrap();
        let a = q.create_tag("a", at(9, 0)).unwrap();
        let b = q.create_tag("b", at(9, 0)).unwrap();
        q.create_entry_tag(entry.id, a.id).unwrap();
        q.create_entry_tag(entry.id, a.id).unwrap();
        q.create_entry_tag(entry.id, b.id).unwrap();

        let linked: Vec<String> = q
            .list_tags_for_entry(entry.id)
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(linked, vec!["a", "b"]);
        assert_eq!(q.get_tag_by_name("a").unwrap(), Some(a.clone()));
        assert_eq!(q.get_tag(b.id).unwrap(), Some(b.clone()));

        assert_eq!(q.delete_entry(entry.id).unwrap(), 1);
        assert!(q.list_tags_for_entry(entry.id).unwrap().is_empty());
        assert_eq!(q.delete_orphaned_tags().unwrap(), 2);
        assert!(q.list_tags().unwrap().is_empty());
    }

    #[test]
    fn delete_tag_removes_links() {
        let db = Database::open_in_memory().unwrap();
        let q = db.queries();
        let entry = q.create_entry(&fields("#x", at(9, 0), None), at(9, 0)).unwrap();
        let x = q.create_tag("x", at(9, 0)).unwrap();
        q.create_entry_tag(entry.id, x.id).unwrap();

        assert_eq!(q.delete_tag(x.id).unwrap(), 1);
        assert!(q.list_tags_for_entry(entry.id).unwrap().is_empty());
        assert_eq!(q.delete_entry_tags(entry.id).unwrap(), 0);
    }
}
