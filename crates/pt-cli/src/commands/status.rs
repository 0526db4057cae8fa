//! Status command for showing the running timer and today's total.

use std::fmt::Display;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Local, TimeZone, Utc};

use pt_core::Period;
use pt_service::{ReportFilter, Tracker};

use super::util::{format_duration, format_time};
use crate::Config;

pub fn run<W: Write>(writer: &mut W, tracker: &Tracker, config: &Config) -> Result<()> {
    render(writer, tracker, &config.database_path, Utc::now(), &Local)
}

fn render<W, Tz>(
    writer: &mut W,
    tracker: &Tracker,
    database_path: &Path,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    writeln!(writer, "Time tracker status")?;
    writeln!(writer, "Database: {}", database_path.display())?;

    match tracker.get_active_time_entry()? {
        Some(active) => {
            write!(writer, "Running:  #{} {}", active.entry.id, active.entry.description)?;
            if let Some(category) = &active.category_name {
                write!(writer, " [{category}]")?;
            }
            writeln!(writer)?;
            let elapsed = (now - active.entry.start_time).num_seconds();
            writeln!(
                writer,
                "Since:    {} ({})",
                format_time(active.entry.start_time, tz),
                format_duration(elapsed)
            )?;
        }
        None => writeln!(writer, "No active timer.")?,
    }

    let today = ReportFilter::for_period(Period::Today, &now.with_timezone(tz));
    let report = tracker.get_report(&today)?;
    writeln!(
        writer,
        "Today:    {} in {} entries",
        format_duration(report.total_seconds),
        report.entries.len()
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, hour, minute, 0).unwrap()
    }

    #[test]
    fn status_shows_running_entry_and_today_total() {
        let mut tracker = Tracker::open_in_memory().unwrap();
        let work = tracker.create_category("Work", "#ff0000").unwrap();
        tracker.start_at("Planning", None, at(8, 0)).unwrap();
        tracker.start_at("Coding #rust", Some(work.id), at(9, 15)).unwrap();

        let mut output = Vec::new();
        render(&mut output, &tracker, Path::new("/data/pt.db"), at(10, 0), &Utc).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output.trim_end(), @r"
        Time tracker status
        Database: /data/pt.db
        Running:  #2 Coding #rust [Work]
        Since:    2025-01-15 09:15 (45m)
        Today:    1h 15m in 1 entries
        ");
    }

    #[test]
    fn status_without_timer() {
        let tracker = Tracker::open_in_memory().unwrap();
        let mut output = Vec::new();
        render(&mut output, &tracker, Path::new("/data/pt.db"), at(10, 0), &Utc).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("No active timer."));
        assert!(output.contains("Today:    0m in 0 entries"));
    }
}
