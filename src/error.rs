//! Error handling for station file processing.
//!
//! Per-file conditions (malformed header, unresolvable schema, missing
//! target-month data) are recovered by the batch loop; `EmptyBatch` and the
//! setup errors end the run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrecipError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Could not read directory entry: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("Input directory not found: {path}")]
    DatasetNotFound { path: PathBuf },

    #[error("Malformed station header in file: {path} - {reason}")]
    MalformedHeader { path: PathBuf, reason: String },

    #[error("No precipitation column in file: {path} (available columns: {columns:?})")]
    NoPrecipitationColumn { path: PathBuf, columns: Vec<String> },

    #[error("No data for month {month:02} in any year in file: {path}")]
    NoTargetMonthData { path: PathBuf, month: u32 },

    #[error("No station produced a record ({files_seen} files examined); nothing written")]
    EmptyBatch { files_seen: usize },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl PrecipError {
    /// Whether this error only invalidates the file it came from.
    pub fn is_file_level(&self) -> bool {
        matches!(
            self,
            PrecipError::Io(_)
                | PrecipError::Csv(_)
                | PrecipError::MalformedHeader { .. }
                | PrecipError::NoPrecipitationColumn { .. }
                | PrecipError::NoTargetMonthData { .. }
        )
    }

    /// Short label used when tallying skipped files
    pub fn kind(&self) -> &'static str {
        match self {
            PrecipError::Io(_) => "io",
            PrecipError::Csv(_) => "csv",
            PrecipError::Polars(_) => "polars",
            PrecipError::Json(_) => "json",
            PrecipError::Pattern(_) | PrecipError::Glob(_) => "pattern",
            PrecipError::DatasetNotFound { .. } => "dataset_not_found",
            PrecipError::MalformedHeader { .. } => "malformed_header",
            PrecipError::NoPrecipitationColumn { .. } => "no_precipitation_column",
            PrecipError::NoTargetMonthData { .. } => "no_target_month_data",
            PrecipError::EmptyBatch { .. } => "empty_batch",
            PrecipError::Configuration { .. } => "configuration",
        }
    }
}

pub type Result<T> = std::result::Result<T, PrecipError>;
