use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pt_cli::commands::{
    category, delete, edit, export, import, list, report, start, status, stop, tags,
};
use pt_cli::{Cli, Commands, Config};
use pt_service::Tracker;

/// Load config and open the tracker, ensuring the database directory exists.
fn open_tracker(config_path: Option<&Path>) -> Result<(Tracker, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let tracker = Tracker::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))?;
    Ok((tracker, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let (mut tracker, config) = open_tracker(cli.config.as_deref())?;
    let mut out = io::stdout().lock();

    match command {
        Commands::Start(args) => start::run(&mut out, &mut tracker, args)?,
        Commands::Stop => stop::run(&mut out, &mut tracker)?,
        Commands::Status => status::run(&mut out, &tracker, &config)?,
        Commands::List(args) => list::run(&mut out, &tracker, args)?,
        Commands::Edit(args) => edit::run(&mut out, &mut tracker, args)?,
        Commands::Delete(args) => delete::run(&mut out, &mut tracker, args)?,
        Commands::Category(action) => category::run(&mut out, &mut tracker, action)?,
        Commands::Tags => tags::run(&mut out, &tracker)?,
        Commands::Report(args) => report::run(&mut out, &tracker, args, &config)?,
        Commands::Export(args) => export::run(&mut out, &tracker, args)?,
        Commands::Import(args) => import::run(&mut out, &mut tracker, args)?,
    }

    Ok(())
}
