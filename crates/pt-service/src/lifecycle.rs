//! Entry lifecycle and category management.

use chrono::{DateTime, Utc};
use pt_core::extract_tags;
use pt_db::{Category, DbError, EntryFields, EntryWithCategory, Queries, Tag, TimeEntry};
use tracing::{debug, info, warn};

use crate::{ServiceError, Tracker};

/// Color given to categories created without one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#cccccc";

/// Description stored when a timer is started without one.
pub const EMPTY_DESCRIPTION: &str = "No description";

impl Tracker {
    // ========== Timer ==========

    /// Starts a new running entry, closing the active one first.
    pub fn start(
        &mut self,
        description: &str,
        category_id: Option<i64>,
    ) -> Result<EntryWithCategory, ServiceError> {
        self.start_at(description, category_id, Utc::now())
    }

    /// Like [`start`](Self::start), using `now` as the clock.
    pub fn start_at(
        &mut self,
        description: &str,
        category_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<EntryWithCategory, ServiceError> {
        let tx = self.db.transaction()?;
        let q = tx.queries();

        let closed = q.close_active_entries(now, None)?;
        if closed > 0 {
            debug!(closed, "closed active entry before start");
        }
        ensure_category(q, category_id)?;

        let fields = EntryFields {
            description: timer_description(description),
            start_time: now,
            end_time: None,
            category_id,
        };
        let entry = q.create_entry(&fields, now)?;
        sync_tags(q, entry.id, &entry.description, now)?;
        let entry = fetch_entry(q, entry.id)?;

        tx.commit()?;
        info!(id = entry.entry.id, "started time entry");
        Ok(entry)
    }

    /// Stops the active entry. Returns `None` when nothing was running.
    pub fn stop(&mut self) -> Result<Option<TimeEntry>, ServiceError> {
        self.stop_at(Utc::now())
    }

    /// Like [`stop`](Self::stop), using `now` as the clock.
    pub fn stop_at(&mut self, now: DateTime<Utc>) -> Result<Option<TimeEntry>, ServiceError> {
        let tx = self.db.transaction()?;
        let q = tx.queries();

        let Some(active) = q.get_active_entry()? else {
            debug!("no active entry to stop");
            return Ok(None);
        };
        q.set_entry_end(active.id, now)?;

        tx.commit()?;
        info!(id = active.id, "stopped time entry");
        Ok(Some(TimeEntry {
            end_time: Some(now),
            ..active
        }))
    }

    // ========== Entries ==========

    /// Overwrites every mutable field of an entry and resyncs its tags.
    ///
    /// The interval is stored as given; callers check that it is well ordered.
    pub fn update_time_entry(
        &mut self,
        id: i64,
        fields: &EntryFields,
    ) -> Result<EntryWithCategory, ServiceError> {
        self.update_time_entry_at(id, fields, Utc::now())
    }

    /// Like [`update_time_entry`](Self::update_time_entry), using `now` as the clock.
    pub fn update_time_entry_at(
        &mut self,
        id: i64,
        fields: &EntryFields,
        now: DateTime<Utc>,
    ) -> Result<EntryWithCategory, ServiceError> {
        let tx = self.db.transaction()?;
        let q = tx.queries();

        ensure_category(q, fields.category_id)?;
        if q.update_entry(id, fields)?.is_none() {
            return Err(ServiceError::NotFound {
                kind: "time entry",
                id,
            });
        }
        sync_tags(q, id, &fields.description, now)?;
        let entry = fetch_entry(q, id)?;

        tx.commit()?;
        info!(id, "updated time entry");
        Ok(entry)
    }

    /// Rewrites the description and category of the running entry.
    pub fn update_active_entry(
        &mut self,
        description: &str,
        category_id: Option<i64>,
    ) -> Result<EntryWithCategory, ServiceError> {
        self.update_active_entry_at(description, category_id, Utc::now())
    }

    /// Like [`update_active_entry`](Self::update_active_entry), using `now` as the clock.
    pub fn update_active_entry_at(
        &mut self,
        description: &str,
        category_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<EntryWithCategory, ServiceError> {
        let tx = self.db.transaction()?;
        let q = tx.queries();

        let active = q.get_active_entry()?.ok_or(ServiceError::NoActiveEntry)?;
        ensure_category(q, category_id)?;
        let fields = EntryFields {
            description: timer_description(description),
            start_time: active.start_time,
            end_time: active.end_time,
            category_id,
        };
        q.update_entry(active.id, &fields)?;
        sync_tags(q, active.id, &fields.description, now)?;
        let entry = fetch_entry(q, active.id)?;

        tx.commit()?;
        info!(id = active.id, "updated active entry");
        Ok(entry)
    }

    /// Deletes an entry; a missing id is not an error.
    ///
    /// Tags left without entries are cleaned up afterwards on a best-effort basis.
    pub fn delete_time_entry(&mut self, id: i64) -> Result<(), ServiceError> {
        let tx = self.db.transaction()?;
        let deleted = tx.queries().delete_entry(id)?;
        tx.commit()?;
        info!(id, deleted, "deleted time entry");

        match self.db.queries().delete_orphaned_tags() {
            Ok(removed) => debug!(removed, "removed orphaned tags"),
            Err(err) => warn!(%err, "failed to remove orphaned tags"),
        }
        Ok(())
    }

    pub fn get_time_entry(&self, id: i64) -> Result<EntryWithCategory, ServiceError> {
        fetch_entry(self.db.queries(), id)
    }

    /// Returns the running entry, if any.
    pub fn get_active_time_entry(&self) -> Result<Option<EntryWithCategory>, ServiceError> {
        let q = self.db.queries();
        match q.get_active_entry()? {
            Some(active) => Ok(q.get_entry(active.id)?),
            None => Ok(None),
        }
    }

    /// Lists closed entries, most recent first.
    pub fn list_time_entries(&self) -> Result<Vec<EntryWithCategory>, ServiceError> {
        Ok(self.db.queries().list_entries()?)
    }

    pub fn list_tags(&self) -> Result<Vec<Tag>, ServiceError> {
        Ok(self.db.queries().list_tags()?)
    }

    /// Tags linked to one entry, ordered by name.
    pub fn list_entry_tags(&self, entry_id: i64) -> Result<Vec<Tag>, ServiceError> {
        Ok(self.db.queries().list_tags_for_entry(entry_id)?)
    }

    // ========== Categories ==========

    pub fn create_category(&mut self, name: &str, color: &str) -> Result<Category, ServiceError> {
        let category = self
            .db
            .queries()
            .create_category(name, color, Utc::now())?;
        info!(id = category.id, name, "created category");
        Ok(category)
    }

    pub fn get_category(&self, id: i64) -> Result<Category, ServiceError> {
        self.db
            .queries()
            .get_category(id)?
            .ok_or(ServiceError::NotFound {
                kind: "category",
                id,
            })
    }

    /// Lists categories ordered by name.
    pub fn list_categories(&self) -> Result<Vec<Category>, ServiceError> {
        Ok(self.db.queries().list_categories()?)
    }

    pub fn update_category(
        &mut self,
        id: i64,
        name: &str,
        color: &str,
    ) -> Result<Category, ServiceError> {
        let category = self
            .db
            .queries()
            .update_category(id, name, color)?
            .ok_or(ServiceError::NotFound {
                kind: "category",
                id,
            })?;
        info!(id, name, "updated category");
        Ok(category)
    }

    /// Deletes a category. Entries filed under it become uncategorized.
    pub fn delete_category(&mut self, id: i64) -> Result<(), ServiceError> {
        let deleted = self.db.queries().delete_category(id)?;
        info!(id, deleted, "deleted category");
        Ok(())
    }
}

fn timer_description(description: &str) -> String {
    if description.trim().is_empty() {
        EMPTY_DESCRIPTION.to_string()
    } else {
        description.to_string()
    }
}

/// Fails with `NotFound` when `category_id` names no category.
fn ensure_category(q: Queries<'_>, category_id: Option<i64>) -> Result<(), ServiceError> {
    match category_id {
        Some(id) if q.get_category(id)?.is_none() => Err(ServiceError::NotFound {
            kind: "category",
            id,
        }),
        _ => Ok(()),
    }
}

fn fetch_entry(q: Queries<'_>, id: i64) -> Result<EntryWithCategory, ServiceError> {
    q.get_entry(id)?.ok_or(ServiceError::NotFound {
        kind: "time entry",
        id,
    })
}

/// Replaces the tag links of an entry with the tags in `description`.
///
/// Tags that no longer link to any entry are deleted.
pub(crate) fn sync_tags(
    q: Queries<'_>,
    entry_id: i64,
    description: &str,
    now: DateTime<Utc>,
) -> Result<(), DbError> {
    q.delete_entry_tags(entry_id)?;

    let names = extract_tags(description);
    for name in &names {
        let tag = match q.get_tag_by_name(name)? {
            Some(tag) => tag,
            None => q.create_tag(name, now)?,
        };
        q.create_entry_tag(entry_id, tag.id)?;
    }

    let removed = q.delete_orphaned_tags()?;
    debug!(entry_id, tags = names.len(), removed, "synced tags");
    Ok(())
}
