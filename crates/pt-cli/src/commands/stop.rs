//! Stop command for ending the running timer.

use std::io::Write;

use anyhow::Result;

use pt_service::Tracker;

use super::util::format_duration;

pub fn run<W: Write>(writer: &mut W, tracker: &mut Tracker) -> Result<()> {
    match tracker.stop()? {
        Some(entry) => {
            let seconds = entry.duration().map_or(0, |d| d.num_seconds());
            writeln!(
                writer,
                "Stopped #{}: {} ({})",
                entry.id,
                entry.description,
                format_duration(seconds)
            )?;
        }
        None => writeln!(writer, "No active timer.")?,
    }
    Ok(())
}
