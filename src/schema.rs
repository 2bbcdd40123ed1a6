//! Header row detection and column resolution.
//!
//! Station exports do not agree on where the table starts or how the
//! precipitation column is spelled. The header row is found by scanning for a
//! precipitation token, and columns are resolved through an ordered chain of
//! matchers that either name a column or pass.

use crate::constants::{
    DATE_COLUMN_TOKEN, HEADER_ROW_TOKENS, PRECIPITATION_COLUMN_TOKEN,
    PRECIPITATION_COLUMN_VARIANTS,
};
use crate::error::{PrecipError, Result};
use crate::text::normalize_for_match;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Where the data table begins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeaderLocation {
    /// Lines preceding the table header
    pub skip_rows: usize,
    /// `false` when the fallback skip count was used instead of a detected line
    pub detected: bool,
}

/// Which matcher identified the precipitation column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnMatch {
    Exact,
    Substring,
}

/// The two logical columns the pipeline needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSchema {
    pub date_index: usize,
    pub date_column: String,
    pub precipitation_index: usize,
    pub precipitation_column: String,
    pub precipitation_match: ColumnMatch,
}

/// A column matcher: returns the index of the column it recognises, if any
type ColumnMatcher = fn(&[String]) -> Option<usize>;

/// Precipitation matchers in priority order. Exact spellings always win over a
/// substring hit, whatever the column order.
const PRECIPITATION_MATCHERS: [(ColumnMatch, ColumnMatcher); 2] = [
    (ColumnMatch::Exact, match_known_variant),
    (ColumnMatch::Substring, match_precip_substring),
];

/// Find the table header line.
///
/// The first line whose uppercased text contains `PRECIPITAÇÃO` or
/// `PRECIPITACAO` is the header; its index is the skip count. Without such a
/// line the `fallback` count is returned with `detected == false`. The fallback
/// is a guess at the usual layout and callers should treat the resulting table
/// with suspicion.
pub fn locate_header_row(lines: &[&str], fallback: usize) -> HeaderLocation {
    let found = lines.iter().position(|line| {
        let upper = line.to_uppercase();
        HEADER_ROW_TOKENS.iter().any(|token| upper.contains(token))
    });

    match found {
        Some(skip_rows) => HeaderLocation {
            skip_rows,
            detected: true,
        },
        None => HeaderLocation {
            skip_rows: fallback,
            detected: false,
        },
    }
}

/// First column whose uppercased name contains `DATA`, else the first column
pub fn resolve_date_column(columns: &[String]) -> Option<usize> {
    columns
        .iter()
        .position(|name| name.to_uppercase().contains(DATE_COLUMN_TOKEN))
        .or(if columns.is_empty() { None } else { Some(0) })
}

/// Run the precipitation matcher chain
pub fn resolve_precipitation_column(columns: &[String]) -> Option<(usize, ColumnMatch)> {
    PRECIPITATION_MATCHERS
        .iter()
        .find_map(|(kind, matcher)| matcher(columns).map(|index| (index, *kind)))
}

/// Resolve both columns of a table header or explain why not
pub fn resolve_schema(file_path: &Path, columns: &[String]) -> Result<ResolvedSchema> {
    let (precipitation_index, precipitation_match) = resolve_precipitation_column(columns)
        .ok_or_else(|| PrecipError::NoPrecipitationColumn {
            path: file_path.to_path_buf(),
            columns: columns.to_vec(),
        })?;

    // A precipitation hit implies at least one column, so the date fallback holds
    let date_index = resolve_date_column(columns).unwrap_or(0);

    let schema = ResolvedSchema {
        date_index,
        date_column: columns[date_index].clone(),
        precipitation_index,
        precipitation_column: columns[precipitation_index].clone(),
        precipitation_match,
    };

    debug!(
        "Resolved columns for {}: date='{}' precipitation='{}' ({:?})",
        file_path.display(),
        schema.date_column,
        schema.precipitation_column,
        schema.precipitation_match
    );

    Ok(schema)
}

fn match_known_variant(columns: &[String]) -> Option<usize> {
    PRECIPITATION_COLUMN_VARIANTS
        .iter()
        .find_map(|variant| columns.iter().position(|name| name == variant))
}

fn match_precip_substring(columns: &[String]) -> Option<usize> {
    columns
        .iter()
        .position(|name| normalize_for_match(name).contains(PRECIPITATION_COLUMN_TOKEN))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_locate_header_row_accented() {
        let lines = vec![
            "REGIAO:;SE",
            "UF:;MG",
            "ESTACAO:;X",
            "CODIGO (WMO):;A521",
            "LATITUDE:;-19,8",
            "LONGITUDE:;-43,9",
            "ALTITUDE:;853",
            "DATA DE FUNDACAO:;2006-09-21",
            "Data;Hora UTC;PRECIPITAÇÃO TOTAL, HORÁRIO (mm)",
            "2025/01/01;0000 UTC;0",
        ];
        assert_eq!(
            locate_header_row(&lines, 8),
            HeaderLocation {
                skip_rows: 8,
                detected: true
            }
        );
    }

    #[test]
    fn test_locate_header_row_any_case_and_unaccented() {
        let lines = vec!["meta", "meta", "data;precipitacao total (mm)", "row"];
        let location = locate_header_row(&lines, 8);
        assert_eq!(location.skip_rows, 2);
        assert!(location.detected);

        let lines = vec!["meta", "Data;Precipitação (mm)", "row"];
        assert_eq!(locate_header_row(&lines, 8).skip_rows, 1);
    }

    #[test]
    fn test_locate_header_row_fallback() {
        let lines = vec!["a", "b", "Data;Chuva"];
        let location = locate_header_row(&lines, 8);
        assert_eq!(location.skip_rows, 8);
        assert!(!location.detected);
    }

    #[test]
    fn test_resolve_date_column() {
        assert_eq!(
            resolve_date_column(&columns(&["Hora UTC", "Data", "PRECIP."])),
            Some(1)
        );
        assert_eq!(
            resolve_date_column(&columns(&["DATA (YYYY-MM-DD)", "Hora"])),
            Some(0)
        );
        assert_eq!(resolve_date_column(&columns(&["Dia", "Chuva"])), Some(0));
        assert_eq!(resolve_date_column(&[]), None);
    }

    #[test]
    fn test_exact_variant_beats_earlier_substring_column() {
        let cols = columns(&[
            "Data",
            "PRECIPITACAO ACUMULADA (mm)",
            "PRECIPITAÇÃO TOTAL, HORÁRIO (mm)",
        ]);
        assert_eq!(
            resolve_precipitation_column(&cols),
            Some((2, ColumnMatch::Exact))
        );
    }

    #[test]
    fn test_variant_priority_follows_variant_order() {
        // Both are known variants; the first listed variant wins
        let cols = columns(&["Data", "PRECIP.", "PRECIPITAÇÃO TOTAL, HORARIO (mm)"]);
        assert_eq!(
            resolve_precipitation_column(&cols),
            Some((2, ColumnMatch::Exact))
        );
    }

    #[test]
    fn test_substring_fallback_is_accent_insensitive() {
        let cols = columns(&["Data", "Hora", "Precipitação horária acumulada (mm)"]);
        assert_eq!(
            resolve_precipitation_column(&cols),
            Some((2, ColumnMatch::Substring))
        );
    }

    #[test]
    fn test_resolve_schema_missing_precipitation() {
        let cols = columns(&["Data", "Hora UTC", "TEMPERATURA (°C)"]);
        let err = resolve_schema(Path::new("inmet_x.csv"), &cols).unwrap_err();
        match err {
            PrecipError::NoPrecipitationColumn { columns, .. } => {
                assert_eq!(columns, cols);
            }
            other => panic!("Expected NoPrecipitationColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_schema() {
        let cols = columns(&["Data", "Hora UTC", "PRECIPITAÇÃO TOTAL, HORÁRIO (mm)", ""]);
        let schema = resolve_schema(Path::new("inmet_x.csv"), &cols).unwrap();
        assert_eq!(schema.date_index, 0);
        assert_eq!(schema.date_column, "Data");
        assert_eq!(schema.precipitation_index, 2);
        assert_eq!(schema.precipitation_match, ColumnMatch::Exact);
    }
}
