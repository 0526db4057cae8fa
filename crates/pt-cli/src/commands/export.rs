//! Export command for writing every entry as CSV.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use pt_service::Tracker;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// File to write. Defaults to stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run<W: Write>(writer: &mut W, tracker: &Tracker, args: &ExportArgs) -> Result<()> {
    let Some(path) = &args.output else {
        tracker.export_csv(writer)?;
        return Ok(());
    };

    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let count = tracker.export_csv(BufWriter::new(file))?;
    writeln!(writer, "Exported {count} entries to {}", path.display())?;
    Ok(())
}
