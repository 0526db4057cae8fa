//! CLI subcommand implementations.

pub mod category;
pub mod delete;
pub mod edit;
pub mod export;
pub mod import;
pub mod list;
pub mod report;
pub mod start;
pub mod status;
pub mod stop;
pub mod tags;
pub mod util;
