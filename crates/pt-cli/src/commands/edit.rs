//! Edit command for changing an entry.

use std::io::Write;

use anyhow::{Result, bail};
use clap::Args;

use pt_db::EntryFields;
use pt_service::{ServiceError, Tracker};

use super::util::parse_datetime;

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Entry ID. Defaults to the running entry.
    pub id: Option<i64>,
    /// New description; `#hashtags` are re-read.
    #[arg(long)]
    pub description: Option<String>,
    /// New start time.
    #[arg(long)]
    pub start: Option<String>,
    /// New end time.
    #[arg(long, conflicts_with = "clear_end")]
    pub end: Option<String>,
    /// Mark the entry as running again.
    #[arg(long)]
    pub clear_end: bool,
    /// Category ID to file the entry under.
    #[arg(long, conflicts_with = "no_category")]
    pub category: Option<i64>,
    /// Remove the entry's category.
    #[arg(long)]
    pub no_category: bool,
}

impl EditArgs {
    const fn changes_interval(&self) -> bool {
        self.start.is_some() || self.end.is_some() || self.clear_end
    }
}

pub fn run<W: Write>(writer: &mut W, tracker: &mut Tracker, args: &EditArgs) -> Result<()> {
    let current = match args.id {
        Some(id) => tracker.get_time_entry(id)?,
        None => tracker
            .get_active_time_entry()?
            .ok_or(ServiceError::NoActiveEntry)?,
    };

    let description = args
        .description
        .clone()
        .unwrap_or_else(|| current.entry.description.clone());
    let category_id = if args.no_category {
        None
    } else {
        args.category.or(current.entry.category_id)
    };

    let updated = if args.id.is_none() && !args.changes_interval() {
        tracker.update_active_entry(&description, category_id)?
    } else {
        let start_time = match &args.start {
            Some(start) => parse_datetime(start)?,
            None => current.entry.start_time,
        };
        let end_time = match &args.end {
            Some(end) => Some(parse_datetime(end)?),
            None if args.clear_end => None,
            None => current.entry.end_time,
        };
        if end_time.is_some_and(|end| end <= start_time) {
            bail!("end time must be after start time");
        }

        let fields = EntryFields {
            description,
            start_time,
            end_time,
            category_id,
        };
        tracker.update_time_entry(current.entry.id, &fields)?
    };

    writeln!(
        writer,
        "Updated #{}: {}",
        updated.entry.id, updated.entry.description
    )?;
    Ok(())
}
