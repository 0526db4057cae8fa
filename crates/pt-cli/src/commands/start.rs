//! Start command for beginning a new timer.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use pt_service::Tracker;

#[derive(Debug, Args)]
pub struct StartArgs {
    /// What you are working on; `#hashtags` become tags.
    pub description: Vec<String>,
    /// Category ID to file the entry under.
    #[arg(long)]
    pub category: Option<i64>,
}

pub fn run<W: Write>(writer: &mut W, tracker: &mut Tracker, args: &StartArgs) -> Result<()> {
    let description = args.description.join(" ");
    let entry = tracker.start(&description, args.category)?;

    write!(writer, "Started #{}: {}", entry.entry.id, entry.entry.description)?;
    if let Some(category) = &entry.category_name {
        write!(writer, " [{category}]")?;
    }
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    #[test]
    fn start_reports_new_entry() {
        let mut tracker = Tracker::open_in_memory().unwrap();
        let work = tracker.create_category("Work", "#ff0000").unwrap();

        let mut output = Vec::new();
        let args = StartArgs {
            description: vec!["Write".to_string(), "docs".to_string(), "#docs".to_string()],
            category: Some(work.id),
        };
        run(&mut output, &mut tracker, &args).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output.trim_end(), @"Started #1: Write docs #docs [Work]");
        let tags = tracker.list_tags().unwrap();
        assert_eq!(tags[0].name, "docs");
    }

    #[test]
    fn start_without_description_uses_placeholder() {
        let mut tracker = Tracker::open_in_memory().unwrap();
        let mut output = Vec::new();
        let args = StartArgs {
            description: Vec::new(),
            category: None,
        };
        run(&mut output, &mut tracker, &args).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Started #1: No description\n"
        );
    }
}
