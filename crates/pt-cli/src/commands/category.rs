//! Category commands.

use std::io::Write;

use anyhow::Result;
use clap::Subcommand;

use pt_service::{DEFAULT_CATEGORY_COLOR, Tracker};

/// Category subcommands.
#[derive(Debug, Subcommand)]
pub enum CategoryAction {
    /// List categories.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Create a category.
    Add {
        name: String,
        /// Display color as a hex string.
        #[arg(long, default_value = DEFAULT_CATEGORY_COLOR)]
        color: String,
    },
    /// Rename or recolor a category.
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a category. Its entries become uncategorized.
    Delete { id: i64 },
}

pub fn run<W: Write>(writer: &mut W, tracker: &mut Tracker, action: &CategoryAction) -> Result<()> {
    match action {
        CategoryAction::List { json } => {
            let categories = tracker.list_categories()?;
            if *json {
                writeln!(writer, "{}", serde_json::to_string_pretty(&categories)?)?;
            } else if categories.is_empty() {
                writeln!(writer, "No categories.")?;
            } else {
                for category in categories {
                    writeln!(writer, "{:<4}  {}  {}", category.id, category.color, category.name)?;
                }
            }
        }
        CategoryAction::Add { name, color } => {
            let category = tracker.create_category(name, color)?;
            writeln!(writer, "Created category #{}: {}", category.id, category.name)?;
        }
        CategoryAction::Edit { id, name, color } => {
            let current = tracker.get_category(*id)?;
            let name = name.as_deref().unwrap_or(&current.name);
            let color = color.as_deref().unwrap_or(&current.color);
            let category = tracker.update_category(*id, name, color)?;
            writeln!(writer, "Updated category #{}: {}", category.id, category.name)?;
        }
        CategoryAction::Delete { id } => {
            tracker.delete_category(*id)?;
            writeln!(writer, "Deleted category #{id}")?;
        }
    }
    Ok(())
}
