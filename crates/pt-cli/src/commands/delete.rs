//! Delete command for removing an entry.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use pt_service::Tracker;

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Entry ID to delete.
    pub id: i64,
}

pub fn run<W: Write>(writer: &mut W, tracker: &mut Tracker, args: &DeleteArgs) -> Result<()> {
    tracker.delete_time_entry(args.id)?;
    writeln!(writer, "Deleted #{}", args.id)?;
    Ok(())
}
