//! Fixed layout facts of the INMET station export format and pipeline defaults.

/// Line index of the `ESTACAO:;<name>` record
pub const STATION_NAME_LINE: usize = 2;

/// Line index of the `LATITUDE:;<value>` record
pub const LATITUDE_LINE: usize = 4;

/// Line index of the `LONGITUDE:;<value>` record
pub const LONGITUDE_LINE: usize = 5;

/// Field separator of both the metadata block and the data table
pub const FIELD_SEPARATOR: u8 = b';';

/// Tokens identifying the data header line (compared against uppercased text)
pub const HEADER_ROW_TOKENS: [&str; 2] = ["PRECIPITAÇÃO", "PRECIPITACAO"];

/// Skip count used when no header token is found. Matches the usual layout of
/// an eight-line metadata block, nothing more.
pub const DEFAULT_SKIP_ROWS: usize = 8;

/// Substring marking the date column (uppercased)
pub const DATE_COLUMN_TOKEN: &str = "DATA";

/// Substring marking a precipitation column after accent normalization
pub const PRECIPITATION_COLUMN_TOKEN: &str = "PRECIP";

/// Known precipitation header spellings, in priority order
pub const PRECIPITATION_COLUMN_VARIANTS: [&str; 9] = [
    "PRECIPITAÇÃO TOTAL, HORÁRIO (mm)",
    "PRECIPITAÇÃO TOTAL, HORARIO (mm)",
    "PRECIPITAÇÃO TOTAL HORÁRIO (mm)",
    "PRECIPITAÇÃO TOTAL HORARIO (mm)",
    "PRECIPITACAO TOTAL, HORARIO (mm)",
    "PRECIPITACAO TOTAL HORARIO (mm)",
    "PRECIPITAÇÃO",
    "PRECIPITACAO",
    "PRECIP.",
];

pub const DEFAULT_FILE_PATTERN: &str = "inmet_*.csv";

pub const DEFAULT_TARGET_YEAR: i32 = 2025;

/// January
pub const DEFAULT_TARGET_MONTH: u32 = 1;

pub const DEFAULT_TOP_N: usize = 10;

/// Unprojected WGS84 degrees
pub const DEFAULT_CRS: &str = "EPSG:4326";
