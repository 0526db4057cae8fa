//! Import command for loading entries from CSV.

use std::fmt::Display;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, TimeZone};
use clap::Args;

use pt_service::{PreviewEntry, PreviewStatus, Tracker};

use super::util::format_time;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// CSV file with an `id,description,start_time,end_time,category` header.
    pub file: PathBuf,
    /// Show what would change without writing anything.
    #[arg(long)]
    pub preview: bool,
}

pub fn run<W: Write>(writer: &mut W, tracker: &mut Tracker, args: &ImportArgs) -> Result<()> {
    let file = File::open(&args.file)
        .with_context(|| format!("failed to open {}", args.file.display()))?;
    let reader = BufReader::new(file);

    if args.preview {
        let preview = tracker.preview_csv(reader)?;
        return write_preview(writer, &preview, &Local);
    }

    let summary = tracker
        .import_csv(reader)
        .with_context(|| format!("failed to import {}", args.file.display()))?;
    writeln!(
        writer,
        "Imported {} new and {} updated entries ({} categories created).",
        summary.inserted, summary.upserted, summary.categories_created
    )?;
    Ok(())
}

fn write_preview<W, Tz>(writer: &mut W, preview: &[PreviewEntry], tz: &Tz) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if preview.is_empty() {
        writeln!(writer, "Nothing to import.")?;
        return Ok(());
    }

    for row in preview {
        let status = match row.status {
            PreviewStatus::New => "new",
            PreviewStatus::Updated => "updated",
        };
        let id = row.id.map_or_else(|| "-".to_string(), |id| id.to_string());
        write!(
            writer,
            "{status:<8} {id:<4}  {}  {}",
            format_time(row.start_time, tz),
            row.description
        )?;

        let changes = &row.changes;
        let changed: Vec<&str> = [
            (changes.description, "description"),
            (changes.start_time, "start_time"),
            (changes.end_time, "end_time"),
            (changes.category, "category"),
        ]
        .into_iter()
        .filter_map(|(flag, name)| flag.then_some(name))
        .collect();
        if !changed.is_empty() {
            write!(writer, " (changes: {})", changed.join(", "))?;
        }
        writeln!(writer)?;
    }

    let new = preview
        .iter()
        .filter(|row| row.status == PreviewStatus::New)
        .count();
    writeln!(writer)?;
    writeln!(
        writer,
        "{new} new, {} updated. Run without --preview to apply.",
        preview.len() - new
    )?;
    Ok(())
}
