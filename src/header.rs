//! Station header parsing and metadata extraction.
//!
//! INMET exports are single-byte Western encoded and open with a fixed
//! metadata block of `LABEL:;value` records. Station name, latitude and
//! longitude sit at fixed line offsets; coordinates use a decimal comma.

use crate::constants::{FIELD_SEPARATOR, LATITUDE_LINE, LONGITUDE_LINE, STATION_NAME_LINE};
use crate::error::{PrecipError, Result};
use crate::models::StationMetadata;
use encoding_rs::WINDOWS_1252;
use std::path::Path;
use tracing::{debug, warn};

/// Read a station file and decode it from Latin-1.
///
/// windows-1252 agrees with Latin-1 on every printable byte, so accented
/// header names such as `PRECIPITAÇÃO` come through intact.
pub fn read_latin1(file_path: &Path) -> Result<String> {
    let bytes = std::fs::read(file_path)?;
    let (text, had_errors) = WINDOWS_1252.decode_without_bom_handling(&bytes);
    if had_errors {
        warn!(
            "Replaced undecodable bytes while reading {}",
            file_path.display()
        );
    }
    Ok(text.into_owned())
}

/// Extract station name and coordinates from the header block
pub fn parse_station_header(file_path: &Path, lines: &[&str]) -> Result<StationMetadata> {
    let station_name = header_value(file_path, lines, STATION_NAME_LINE, "station name")?;
    if station_name.is_empty() {
        return Err(malformed(file_path, "empty station name on line 2"));
    }

    let latitude = coordinate(file_path, lines, LATITUDE_LINE, "latitude")?;
    let longitude = coordinate(file_path, lines, LONGITUDE_LINE, "longitude")?;

    debug!(
        "Parsed header for {}: station={}, lat={}, lon={}",
        file_path.display(),
        station_name,
        latitude,
        longitude
    );

    Ok(StationMetadata {
        station_name: station_name.to_string(),
        latitude,
        longitude,
    })
}

/// Parse a number written with a decimal comma, e.g. `"-19,123"`
pub fn parse_decimal_comma(value: &str) -> Option<f64> {
    let normalized = value.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Second `;`-separated field of a fixed header line, trimmed
fn header_value<'a>(
    file_path: &Path,
    lines: &[&'a str],
    line_index: usize,
    label: &str,
) -> Result<&'a str> {
    let line: &'a str = lines.get(line_index).copied().ok_or_else(|| {
        malformed(
            file_path,
            format!("missing {} line {}", label, line_index),
        )
    })?;

    line.split(FIELD_SEPARATOR as char)
        .nth(1)
        .map(str::trim)
        .ok_or_else(|| {
            malformed(
                file_path,
                format!(
                    "{} line {} has no value field: '{}'",
                    label,
                    line_index,
                    line.trim()
                ),
            )
        })
}

fn coordinate(file_path: &Path, lines: &[&str], line_index: usize, label: &str) -> Result<f64> {
    let raw = header_value(file_path, lines, line_index, label)?;
    parse_decimal_comma(raw)
        .ok_or_else(|| malformed(file_path, format!("invalid {} value '{}'", label, raw)))
}

fn malformed(file_path: &Path, reason: impl Into<String>) -> PrecipError {
    PrecipError::MalformedHeader {
        path: file_path.to_path_buf(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "REGIAO:;SE\n\
        UF:;MG\n\
        ESTACAO:;BELO HORIZONTE (PAMPULHA)\n\
        CODIGO (WMO):;A521\n\
        LATITUDE:;-19,88388888\n\
        LONGITUDE:;-43,96972221\n\
        ALTITUDE:;853,26\n\
        DATA DE FUNDACAO:;2006-09-21\n";

    #[test]
    fn test_parse_decimal_comma() {
        assert_eq!(parse_decimal_comma("-19,123"), Some(-19.123));
        assert_eq!(parse_decimal_comma(" 853,26 "), Some(853.26));
        assert_eq!(parse_decimal_comma("-43.5"), Some(-43.5));
        assert_eq!(parse_decimal_comma(""), None);
        assert_eq!(parse_decimal_comma("n/a"), None);
    }

    #[test]
    fn test_parse_station_header() {
        let lines: Vec<&str> = HEADER.lines().collect();
        let metadata = parse_station_header(Path::new("inmet_a521.csv"), &lines).unwrap();

        assert_eq!(metadata.station_name, "BELO HORIZONTE (PAMPULHA)");
        assert_eq!(metadata.latitude, -19.88388888);
        assert_eq!(metadata.longitude, -43.96972221);
    }

    #[test]
    fn test_missing_line_is_malformed() {
        let lines = vec!["REGIAO:;SE", "UF:;MG", "ESTACAO:;X", "CODIGO:;A1"];
        let err = parse_station_header(Path::new("short.csv"), &lines).unwrap_err();
        match err {
            PrecipError::MalformedHeader { path, reason } => {
                assert_eq!(path, Path::new("short.csv"));
                assert!(reason.contains("latitude"));
            }
            other => panic!("Expected MalformedHeader, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_value_field_is_malformed() {
        let lines = vec!["A", "B", "ESTACAO: no separator", "D", "LAT:;1,0", "LON:;2,0"];
        let err = parse_station_header(Path::new("f.csv"), &lines).unwrap_err();
        assert!(matches!(err, PrecipError::MalformedHeader { .. }));
    }

    #[test]
    fn test_unparseable_coordinate_is_malformed() {
        let lines = vec!["A", "B", "ESTACAO:;X", "D", "LATITUDE:;abc", "LONGITUDE:;2,0"];
        let err = parse_station_header(Path::new("f.csv"), &lines).unwrap_err();
        match err {
            PrecipError::MalformedHeader { reason, .. } => assert!(reason.contains("abc")),
            other => panic!("Expected MalformedHeader, got {other:?}"),
        }
    }

    #[test]
    fn test_read_latin1_decodes_accents() {
        let mut temp_file = NamedTempFile::new().unwrap();
        // "ESTAÇÃO" in Latin-1
        temp_file
            .write_all(&[b'E', b'S', b'T', b'A', 0xC7, 0xC3, b'O'])
            .unwrap();

        let text = read_latin1(temp_file.path()).unwrap();
        assert_eq!(text, "ESTAÇÃO");
    }
}
