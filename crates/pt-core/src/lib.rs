//! Core domain logic for the time tracker.
//!
//! This crate contains the pure building blocks shared by storage and services:
//! - Tags: extracting `#hashtags` from entry descriptions
//! - Periods: resolving `today`/`week`/`month`/`year`/`all` into inclusive ranges
//! - Filters: the category filter used by reports
//! - CSV: the fixed import/export schema and flexible timestamp parsing

pub mod filter;
pub mod period;
pub mod records;
pub mod tags;

pub use filter::CategoryFilter;
pub use period::{Period, calculate_period};
pub use records::{CsvColumn, CsvError, CsvRecord, CsvRow, CsvSchema, parse_flexible_time};
pub use tags::extract_tags;
