//! Time reports over a date range.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, TimeZone, Utc};
use pt_core::{CategoryFilter, Period, calculate_period};
use pt_db::EntryWithCategory;
use serde::Serialize;
use tracing::debug;

use crate::{ServiceError, Tracker};

/// Name of the bucket holding entries without a category.
pub const UNCATEGORIZED_NAME: &str = "No Category";

/// Display color of the uncategorized bucket.
pub const UNCATEGORIZED_COLOR: &str = "#888888";

/// Which entries a report covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportFilter {
    /// Inclusive lower bound on entry start times.
    pub start_date: DateTime<Utc>,
    /// Inclusive upper bound on entry start times.
    pub end_date: DateTime<Utc>,
    pub category: CategoryFilter,
    /// Entries must carry every one of these tags.
    pub tag_ids: Vec<i64>,
}

impl ReportFilter {
    /// Covers `period` around `now`, across all categories and tags.
    pub fn for_period<Tz: TimeZone>(period: Period, now: &DateTime<Tz>) -> Self {
        let (start, end) = calculate_period(period, now);
        Self {
            start_date: start.with_timezone(&Utc),
            end_date: end.with_timezone(&Utc),
            category: CategoryFilter::All,
            tag_ids: Vec::new(),
        }
    }
}

/// Time spent in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    /// Category id, or `-1` for the uncategorized bucket.
    pub category_id: i64,
    pub category_name: String,
    pub color: String,
    pub total_seconds: i64,
    /// Share of the report total, from 0 to 100.
    pub percentage: f64,
}

/// A computed report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Matching closed entries, most recent first.
    pub entries: Vec<EntryWithCategory>,
    pub total_seconds: i64,
    /// Buckets ordered by time spent, largest first.
    pub breakdown: Vec<CategoryBreakdown>,
    pub filter: ReportFilter,
}

impl Tracker {
    /// Aggregates closed entries matching `filter`.
    ///
    /// Running entries are left out. When tag ids are given, an entry must
    /// carry all of them.
    pub fn get_report(&self, filter: &ReportFilter) -> Result<Report, ServiceError> {
        let q = self.db.queries();
        let candidates =
            q.list_report_entries(filter.start_date, filter.end_date, filter.category)?;

        let mut entries = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if candidate.entry.is_running() {
                continue;
            }
            if !filter.tag_ids.is_empty() {
                let linked: HashSet<i64> = q
                    .list_tags_for_entry(candidate.entry.id)?
                    .into_iter()
                    .map(|tag| tag.id)
                    .collect();
                if !filter.tag_ids.iter().all(|id| linked.contains(id)) {
                    continue;
                }
            }
            entries.push(candidate);
        }

        let total_seconds = entries.iter().map(entry_seconds).sum();
        let breakdown = breakdown(&entries, total_seconds);
        debug!(
            entries = entries.len(),
            total_seconds,
            buckets = breakdown.len(),
            "computed report"
        );

        Ok(Report {
            entries,
            total_seconds,
            breakdown,
            filter: filter.clone(),
        })
    }
}

fn entry_seconds(entry: &EntryWithCategory) -> i64 {
    entry
        .entry
        .duration()
        .map_or(0, |duration| duration.num_seconds())
}

fn breakdown(entries: &[EntryWithCategory], total_seconds: i64) -> Vec<CategoryBreakdown> {
    let mut buckets: HashMap<i64, CategoryBreakdown> = HashMap::new();
    let mut uncategorized_seconds = 0;

    for entry in entries {
        let seconds = entry_seconds(entry);
        let Some(category_id) = entry.entry.category_id else {
            uncategorized_seconds += seconds;
            continue;
        };
        buckets
            .entry(category_id)
            .or_insert_with(|| CategoryBreakdown {
                category_id,
                category_name: entry.category_name.clone().unwrap_or_default(),
                color: entry.category_color.clone().unwrap_or_default(),
                total_seconds: 0,
                percentage: 0.0,
            })
            .total_seconds += seconds;
    }

    let mut breakdown: Vec<CategoryBreakdown> = buckets.into_values().collect();
    if uncategorized_seconds > 0 {
        breakdown.push(CategoryBreakdown {
            category_id: CategoryFilter::UNCATEGORIZED_ID,
            category_name: UNCATEGORIZED_NAME.to_string(),
            color: UNCATEGORIZED_COLOR.to_string(),
            total_seconds: uncategorized_seconds,
            percentage: 0.0,
        });
    }

    for bucket in &mut breakdown {
        bucket.percentage = percentage(bucket.total_seconds, total_seconds);
    }
    breakdown.sort_by(|a, b| {
        b.total_seconds
            .cmp(&a.total_seconds)
            .then_with(|| a.category_name.cmp(&b.category_name))
    });
    breakdown
}

#[allow(clippy::cast_precision_loss)]
fn percentage(part: i64, total: i64) -> f64 {
    if total > 0 {
        part as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}
