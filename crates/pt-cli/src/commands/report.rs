//! Report command for summarizing tracked time.
//!
//! This module implements `pt report` with a period keyword, optional category
//! and tag filters, and output formats (human-readable, JSON).

use std::fmt::Display;
use std::io::Write;

use anyhow::{Result, bail};
use chrono::{DateTime, Local, TimeZone, Utc};
use clap::Args;
use serde::Serialize;

use pt_core::{CategoryFilter, Period};
use pt_service::{Report, ReportFilter, Tracker};

use super::util::{format_duration, progress_bar};
use crate::Config;

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Period to cover: today, week, month, year or all.
    #[arg(long)]
    pub period: Option<String>,
    /// Category ID, or "none" for entries without a category.
    #[arg(long)]
    pub category: Option<String>,
    /// Only entries carrying this tag; repeat to require several.
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run<W: Write>(
    writer: &mut W,
    tracker: &Tracker,
    args: &ReportArgs,
    config: &Config,
) -> Result<()> {
    let period = Period::from(args.period.as_deref().unwrap_or(&config.default_period));
    let now = Local::now();

    let mut filter = ReportFilter::for_period(period, &now);
    if let Some(category) = &args.category {
        filter.category = parse_category_filter(category)?;
    }
    filter.tag_ids = resolve_tag_ids(tracker, &args.tags)?;

    let report = tracker.get_report(&filter)?;
    let timezone = iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string());

    if args.json {
        let json = JsonReport {
            generated_at: now.with_timezone(&Utc),
            timezone,
            period,
            report: &report,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&json)?)?;
    } else {
        write_report(writer, &report, period, &Local, &timezone)?;
    }
    Ok(())
}

/// Parses `none`, `all` or a category id.
fn parse_category_filter(value: &str) -> Result<CategoryFilter> {
    match value.trim().to_ascii_lowercase().as_str() {
        "none" => Ok(CategoryFilter::Uncategorized),
        "all" => Ok(CategoryFilter::All),
        other => match other.parse::<i64>() {
            Ok(id) => Ok(CategoryFilter::from_raw(id)),
            Err(_) => bail!("invalid category filter: {value} (use an ID, 'none' or 'all')"),
        },
    }
}

/// Maps tag names (with or without `#`) to tag ids.
fn resolve_tag_ids(tracker: &Tracker, names: &[String]) -> Result<Vec<i64>> {
    if names.is_empty() {
        return Ok(Vec::new());
    }
    let known = tracker.list_tags()?;
    names
        .iter()
        .map(|name| {
            let wanted = name.trim().trim_start_matches('#').to_ascii_lowercase();
            match known.iter().find(|tag| tag.name == wanted) {
                Some(tag) => Ok(tag.id),
                None => bail!("tag not found: {wanted}"),
            }
        })
        .collect()
}

// ========== Human Output ==========

fn period_heading<Tz>(report: &Report, period: Period, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let start = report.filter.start_date.with_timezone(tz).date_naive();
    let end = report.filter.end_date.with_timezone(tz).date_naive();
    match period {
        Period::All => "all time".to_string(),
        Period::Today => format!("{}", start.format("%A, %b %-d, %Y")),
        _ => format!(
            "{} to {}",
            start.format("%b %-d, %Y"),
            end.format("%b %-d, %Y")
        ),
    }
}

/// Writes the human-readable report.
pub fn write_report<W, Tz>(
    writer: &mut W,
    report: &Report,
    period: Period,
    tz: &Tz,
    timezone: &str,
) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    writeln!(
        writer,
        "TIME REPORT: {} ({timezone})",
        period_heading(report, period, tz)
    )?;

    if report.entries.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "No time recorded for this period.")?;
        writeln!(writer)?;
        writeln!(writer, "Hint: Run 'pt start <description>' to begin tracking.")?;
        return Ok(());
    }

    writeln!(writer)?;
    writeln!(writer, "BY CATEGORY")?;
    writeln!(writer, "───────────")?;
    let max_bucket = report
        .breakdown
        .iter()
        .map(|bucket| bucket.total_seconds)
        .max()
        .unwrap_or(0);
    for bucket in &report.breakdown {
        writeln!(
            writer,
            "{:<20} {:>7}  {}  {:>5.1}%",
            bucket.category_name,
            format_duration(bucket.total_seconds),
            progress_bar(bucket.total_seconds, max_bucket),
            bucket.percentage
        )?;
    }

    writeln!(writer)?;
    writeln!(writer, "SUMMARY")?;
    writeln!(writer, "───────")?;
    writeln!(
        writer,
        "Total tracked:  {}",
        format_duration(report.total_seconds)
    )?;
    writeln!(writer, "Entries:        {}", report.entries.len())?;
    Ok(())
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub timezone: String,
    pub period: Period,
    #[serde(flatten)]
    pub report: &'a Report,
}
