//! CSV import/export format.
//!
//! The file format is a header line followed by one row per time entry:
//!
//! ```text
//! id,description,start_time,end_time,category
//! 12,Write report #docs,2024-01-15T09:00:00Z,2024-01-15T10:30:00Z,Work
//! ```
//!
//! Exports always write the five columns in this order. Imports locate columns
//! by name (case-insensitive), so reordered headers are accepted; `description`
//! and `start_time` must be present.

use std::io;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use thiserror::Error;

/// Header written by exports.
pub const HEADER: [&str; 5] = ["id", "description", "start_time", "end_time", "category"];

/// Naive layouts accepted after RFC 3339, tried in order.
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];
const NAIVE_DATE_FORMAT: &str = "%Y-%m-%d";

/// CSV format errors.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Malformed CSV input.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    /// Failed to write CSV output.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    /// The header lacks a column every row needs.
    #[error("missing required column: {column}")]
    MissingColumn { column: &'static str },
    /// A timestamp matched none of the accepted formats.
    #[error("invalid {column} '{value}': unsupported time format")]
    InvalidTime { column: &'static str, value: String },
}

/// Columns of the CSV format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CsvColumn {
    Id,
    Description,
    StartTime,
    EndTime,
    Category,
}

impl CsvColumn {
    pub const ALL: [Self; 5] = [
        Self::Id,
        Self::Description,
        Self::StartTime,
        Self::EndTime,
        Self::Category,
    ];

    /// Header name of the column.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Description => "description",
            Self::StartTime => "start_time",
            Self::EndTime => "end_time",
            Self::Category => "category",
        }
    }

    const fn is_required(self) -> bool {
        matches!(self, Self::Description | Self::StartTime)
    }
}

/// Column positions resolved from a header, once per file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvSchema {
    positions: [Option<usize>; 5],
}

impl CsvSchema {
    /// Resolves column positions from a header record.
    ///
    /// Header names are trimmed and matched case-insensitively; unknown columns
    /// are ignored. When a name repeats, the last occurrence wins.
    pub fn from_header<'a, I>(header: I) -> Result<Self, CsvError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut schema = Self::default();
        for (idx, name) in header.into_iter().enumerate() {
            let name = name.trim().to_ascii_lowercase();
            if let Some(column) = CsvColumn::ALL.iter().find(|c| c.name() == name) {
                schema.positions[*column as usize] = Some(idx);
            }
        }
        for column in CsvColumn::ALL {
            if column.is_required() && schema.position(column).is_none() {
                return Err(CsvError::MissingColumn {
                    column: column.name(),
                });
            }
        }
        Ok(schema)
    }

    /// Index of `column` in each record, if the header has it.
    pub fn position(&self, column: CsvColumn) -> Option<usize> {
        self.positions[column as usize]
    }

    /// Trimmed value of `column`, or an empty string when absent.
    fn value<'r>(&self, record: &'r StringRecord, column: CsvColumn) -> &'r str {
        self.position(column)
            .and_then(|idx| record.get(idx))
            .map_or("", str::trim)
    }

    fn row(&self, record: &StringRecord, line: u64) -> CsvRow {
        let id = self
            .value(record, CsvColumn::Id)
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0);
        CsvRow {
            line,
            id,
            description: self.value(record, CsvColumn::Description).to_string(),
            start_time: self.value(record, CsvColumn::StartTime).to_string(),
            end_time: self.value(record, CsvColumn::EndTime).to_string(),
            category: self.value(record, CsvColumn::Category).to_string(),
        }
    }
}

/// A data row as read from the file, with times still unparsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    /// 1-based line number in the source file.
    pub line: u64,
    /// Positive id, when the row targets an existing entry.
    pub id: Option<i64>,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
    pub category: String,
}

impl CsvRow {
    /// Rows with neither description nor start time carry nothing to import.
    pub fn is_blank(&self) -> bool {
        self.description.is_empty() && self.start_time.is_empty()
    }

    /// Parses the start time.
    pub fn start(&self) -> Result<DateTime<Utc>, CsvError> {
        parse_column(&self.start_time, CsvColumn::StartTime)
    }

    /// Parses the end time; an empty value means the entry is running.
    pub fn end(&self) -> Result<Option<DateTime<Utc>>, CsvError> {
        if self.end_time.is_empty() {
            return Ok(None);
        }
        parse_column(&self.end_time, CsvColumn::EndTime).map(Some)
    }

    /// Category name, or `None` when the column is empty.
    pub fn category(&self) -> Option<&str> {
        Some(self.category.as_str()).filter(|name| !name.is_empty())
    }

    /// Strictly parses the row into a record.
    pub fn to_record(&self) -> Result<CsvRecord, CsvError> {
        Ok(CsvRecord {
            id: self.id,
            description: self.description.clone(),
            start_time: self.start()?,
            end_time: self.end()?,
            category: self.category().map(str::to_string),
        })
    }
}

/// A fully typed CSV row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRecord {
    pub id: Option<i64>,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub category: Option<String>,
}

impl CsvRecord {
    fn fields(&self) -> [String; 5] {
        [
            self.id.map(|id| id.to_string()).unwrap_or_default(),
            self.description.clone(),
            format_time(self.start_time),
            self.end_time.map(format_time).unwrap_or_default(),
            self.category.clone().unwrap_or_default(),
        ]
    }
}

/// Reads every data row of a CSV document.
///
/// Empty input yields no rows. Blank rows are returned too; callers decide
/// whether to skip them with [`CsvRow::is_blank`].
pub fn read_rows<R: io::Read>(reader: R) -> Result<Vec<CsvRow>, CsvError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let header = reader.headers()?.clone();
    if header.iter().all(str::is_empty) {
        return Ok(Vec::new());
    }
    let schema = CsvSchema::from_header(header.iter())?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);
        rows.push(schema.row(&record, line));
    }
    tracing::debug!(rows = rows.len(), "read csv rows");
    Ok(rows)
}

/// Writes the header followed by one row per record.
pub fn write_records<'a, W, I>(writer: W, records: I) -> Result<(), CsvError>
where
    W: io::Write,
    I: IntoIterator<Item = &'a CsvRecord>,
{
    let mut writer = WriterBuilder::new().from_writer(writer);
    writer.write_record(HEADER)?;
    for record in records {
        writer.write_record(record.fields())?;
    }
    writer.flush()?;
    Ok(())
}

/// Formats an instant the way exports write it.
///
/// RFC 3339 in UTC; fractional seconds appear only when non-zero, so the value
/// parses back to the same instant.
pub fn format_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parses a timestamp in any of the accepted import formats.
///
/// RFC 3339 with an offset is tried first. Naive date-times and bare dates are
/// interpreted as UTC, then as local time.
pub fn parse_flexible_time(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, NAIVE_DATE_FORMAT)
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })?;

    Utc.from_local_datetime(&naive).single().or_else(|| {
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
    })
}

fn parse_column(value: &str, column: CsvColumn) -> Result<DateTime<Utc>, CsvError> {
    parse_flexible_time(value).ok_or_else(|| CsvError::InvalidTime {
        column: column.name(),
        value: value.to_string(),
    })
}
