//! List command for showing closed time entries.

use std::fmt::Display;
use std::io::Write;

use anyhow::Result;
use chrono::{Local, TimeZone};
use clap::Args;

use pt_db::EntryWithCategory;
use pt_service::Tracker;

use super::util::{format_duration, format_time};

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run<W: Write>(writer: &mut W, tracker: &Tracker, args: &ListArgs) -> Result<()> {
    let entries = tracker.list_time_entries()?;
    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&entries)?)?;
        return Ok(());
    }
    write_table(writer, &entries, &Local)
}

/// Writes entries as an aligned table, times shown in `tz`.
pub fn write_table<W, Tz>(writer: &mut W, entries: &[EntryWithCategory], tz: &Tz) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if entries.is_empty() {
        writeln!(writer, "No time entries.")?;
        return Ok(());
    }

    writeln!(
        writer,
        "{:<4}  {:<16}  {:<16}  {:>8}  {:<12}  DESCRIPTION",
        "ID", "START", "END", "DURATION", "CATEGORY"
    )?;
    for row in entries {
        let entry = &row.entry;
        let end = entry
            .end_time
            .map_or_else(|| "running".to_string(), |end| format_time(end, tz));
        let duration = entry
            .duration()
            .map_or_else(|| "-".to_string(), |d| format_duration(d.num_seconds()));
        writeln!(
            writer,
            "{:<4}  {:<16}  {:<16}  {:>8}  {:<12}  {}",
            entry.id,
            format_time(entry.start_time, tz),
            end,
            duration,
            row.category_name.as_deref().unwrap_or("-"),
            entry.description
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{DateTime, Utc};
    use insta::assert_snapshot;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, hour, minute, 0).unwrap()
    }

    fn seeded() -> Tracker {
        let mut tracker = Tracker::open_in_memory().unwrap();
        let work = tracker.create_category("Work", "#ff0000").unwrap();
        tracker.start_at("Standup #team", Some(work.id), at(9, 0)).unwrap();
        tracker.start_at("Lunch", None, at(12, 0)).unwrap();
        tracker.stop_at(at(12, 45)).unwrap();
        tracker.start_at("Still going", None, at(13, 0)).unwrap();
        tracker
    }

    #[test]
    fn table_lists_closed_entries_newest_first() {
        let tracker = seeded();
        let entries = tracker.list_time_entries().unwrap();

        let mut output = Vec::new();
        write_table(&mut output, &entries, &Utc).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output.trim_end(), @r"
        ID    START             END               DURATION  CATEGORY      DESCRIPTION
        2     2025-01-15 12:00  2025-01-15 12:45       45m  -             Lunch
        1     2025-01-15 09:00  2025-01-15 12:00     3h 0m  Work          Standup #team
        ");
    }

    #[test]
    fn json_output_includes_category_fields() {
        let tracker = seeded();
        let mut output = Vec::new();
        run(&mut output, &tracker, &ListArgs { json: true }).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["category_name"], "Work");
        assert_eq!(rows[1]["start_time"], "2025-01-15T09:00:00Z");
        assert!(rows[0]["category_name"].is_null());
    }

    #[test]
    fn empty_list_says_so() {
        let mut output = Vec::new();
        write_table(&mut output, &[], &Utc).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "No time entries.\n");
    }
}
