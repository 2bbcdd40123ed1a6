//! Integration tests for the processor module
//!
//! Tests the complete pipeline against small INMET-style station files
//! written in Latin-1.

pub mod multi_station;

use encoding_rs::WINDOWS_1252;
use std::fs;
use std::path::{Path, PathBuf};

/// Metadata block of an INMET export, eight lines
pub fn station_header(name: &str, latitude: &str, longitude: &str) -> String {
    format!(
        "REGIAO:;SE\n\
         UF:;MG\n\
         ESTACAO:;{name}\n\
         CODIGO (WMO):;A521\n\
         LATITUDE:;{latitude}\n\
         LONGITUDE:;{longitude}\n\
         ALTITUDE:;853,26\n\
         DATA DE FUNDACAO:;2006-09-21\n"
    )
}

/// Table header used by recent INMET exports
pub const TABLE_HEADER: &str =
    "Data;Hora UTC;PRECIPITAÇÃO TOTAL, HORÁRIO (mm);PRESSAO ATMOSFERICA AO NIVEL DA ESTACAO, HORARIA (mB);\n";

/// Hourly rows `(date, mm)` rendered with decimal commas
pub fn table_rows(rows: &[(&str, &str)]) -> String {
    rows.iter()
        .enumerate()
        .map(|(hour, (date, mm))| format!("{date};{:02}00 UTC;{mm};915,2;\n", hour % 24))
        .collect()
}

/// Write `content` to `dir/file_name` encoded as Latin-1
pub fn write_latin1(dir: &Path, file_name: &str, content: &str) -> PathBuf {
    let (bytes, _, unmappable) = WINDOWS_1252.encode(content);
    assert!(!unmappable, "test content must be Latin-1 encodable");
    let path = dir.join(file_name);
    fs::write(&path, bytes.as_ref()).unwrap();
    path
}

/// A complete station file
pub fn station_file(name: &str, latitude: &str, longitude: &str, rows: &[(&str, &str)]) -> String {
    format!(
        "{}{}{}",
        station_header(name, latitude, longitude),
        TABLE_HEADER,
        table_rows(rows)
    )
}
