//! Table reading and cell coercion.
//!
//! Reads the `;`-delimited table below the detected header row and turns the
//! date and precipitation cells into typed values. Unparseable cells become
//! `None`; they never fail the file.

use crate::constants::FIELD_SEPARATOR;
use crate::error::Result;
use crate::header::parse_decimal_comma;
use crate::models::RawReading;
use crate::schema::ResolvedSchema;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;
use tracing::debug;

/// Date layouts tried by the generic parser, date-only first
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

const DATE_TIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M",
];

/// Which date parsing strategy produced the column's values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DateStrategy {
    /// ISO-like date or date-time, per cell
    Generic,
    /// Explicit `DD/MM/YYYY`
    DayMonthYear,
    /// First whitespace token of a composite `date time` cell
    LeadingToken,
}

type DateParser = fn(&str) -> Option<NaiveDate>;

const DATE_STRATEGIES: [(DateStrategy, DateParser); 3] = [
    (DateStrategy::Generic, parse_generic_date),
    (DateStrategy::DayMonthYear, parse_day_month_year),
    (DateStrategy::LeadingToken, parse_leading_token),
];

/// Header and body of a station data table
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub records: Vec<StringRecord>,
}

/// Read the table whose header is line `skip_rows` of `text`.
///
/// Column names are trimmed. Rows may be shorter or longer than the header.
pub fn read_table(text: &str, skip_rows: usize) -> Result<RawTable> {
    let body = text.lines().skip(skip_rows).collect::<Vec<_>>().join("\n");

    let mut reader = ReaderBuilder::new()
        .delimiter(FIELD_SEPARATOR)
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let columns = reader
        .headers()?
        .iter()
        .map(|name| name.trim().to_string())
        .collect();

    let records = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(RawTable { columns, records })
}

/// Coerce the resolved date and precipitation cells of every row
pub fn readings_from_table(table: &RawTable, schema: &ResolvedSchema) -> Vec<RawReading> {
    let date_cells: Vec<&str> = table
        .records
        .iter()
        .map(|record| record.get(schema.date_index).unwrap_or(""))
        .collect();

    let (dates, strategy) = coerce_dates(&date_cells);
    debug!(
        "Parsed {} of {} dates from column '{}' using {:?}",
        dates.iter().filter(|d| d.is_some()).count(),
        dates.len(),
        schema.date_column,
        strategy
    );

    table
        .records
        .iter()
        .zip(dates)
        .map(|(record, date)| {
            let precip_mm = record
                .get(schema.precipitation_index)
                .and_then(parse_precipitation);
            RawReading::new(date, precip_mm)
        })
        .collect()
}

/// Parse a date column, trying each strategy until one yields a value.
///
/// Returns all `None` and no strategy when nothing parses.
pub fn coerce_dates(cells: &[&str]) -> (Vec<Option<NaiveDate>>, Option<DateStrategy>) {
    for (strategy, parser) in DATE_STRATEGIES.iter() {
        let parsed: Vec<Option<NaiveDate>> = cells.iter().map(|&cell| parser(cell)).collect();
        if parsed.iter().any(Option::is_some) {
            return (parsed, Some(*strategy));
        }
    }
    (vec![None; cells.len()], None)
}

/// ISO-like date or date-time (`YYYY-MM-DD`, `YYYY/MM/DD`, optional time, RFC 3339)
pub fn parse_generic_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(cell, format).ok())
        .or_else(|| {
            DATE_TIME_FORMATS.iter().find_map(|format| {
                NaiveDateTime::parse_from_str(cell, format)
                    .ok()
                    .map(|dt| dt.date())
            })
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(cell)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// `DD/MM/YYYY`
pub fn parse_day_month_year(cell: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(cell.trim(), "%d/%m/%Y").ok()
}

/// Date part of a `date time` cell such as `01/01/2025 00:00`
pub fn parse_leading_token(cell: &str) -> Option<NaiveDate> {
    let token = cell.split_whitespace().next()?;
    parse_generic_date(token).or_else(|| parse_day_month_year(token))
}

/// Precipitation in mm; negative values are sentinels and rejected
pub fn parse_precipitation(cell: &str) -> Option<f64> {
    parse_decimal_comma(cell).filter(|value| *value >= 0.0)
}
