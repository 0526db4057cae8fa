//! Tags command for listing known tags.

use std::io::Write;

use anyhow::Result;

use pt_service::Tracker;

pub fn run<W: Write>(writer: &mut W, tracker: &Tracker) -> Result<()> {
    let tags = tracker.list_tags()?;
    if tags.is_empty() {
        writeln!(writer, "No tags yet. Add #hashtags to entry descriptions.")?;
        return Ok(());
    }
    for tag in tags {
        writeln!(writer, "#{}", tag.name)?;
    }
    Ok(())
}
