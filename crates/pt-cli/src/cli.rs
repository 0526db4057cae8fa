//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::category::CategoryAction;
use crate::commands::delete::DeleteArgs;
use crate::commands::edit::EditArgs;
use crate::commands::export::ExportArgs;
use crate::commands::import::ImportArgs;
use crate::commands::list::ListArgs;
use crate::commands::report::ReportArgs;
use crate::commands::start::StartArgs;

/// Precious time tracker.
///
/// Start and stop timers, tag entries with #hashtags, file them under
/// categories and review where the time went.
#[derive(Debug, Parser)]
#[command(name = "pt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start a timer, stopping the running one.
    Start(StartArgs),

    /// Stop the running timer.
    Stop,

    /// Show the running timer and today's total.
    Status,

    /// List finished entries, most recent first.
    List(ListArgs),

    /// Change an entry (the running one if no ID is given).
    Edit(EditArgs),

    /// Delete an entry.
    Delete(DeleteArgs),

    /// Manage categories.
    #[command(subcommand)]
    Category(CategoryAction),

    /// List tags.
    Tags,

    /// Summarize tracked time.
    Report(ReportArgs),

    /// Export every entry as CSV.
    Export(ExportArgs),

    /// Import entries from CSV.
    Import(ImportArgs),
}
