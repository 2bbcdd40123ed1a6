//! Pipeline configuration and validation.
//!
//! Holds the target period, input file pattern, header-detection fallback and
//! output settings. Defaults reproduce the January 2025 isohyet run.

use crate::aggregate::TargetPeriod;
use crate::constants::{
    DEFAULT_CRS, DEFAULT_FILE_PATTERN, DEFAULT_SKIP_ROWS, DEFAULT_TARGET_MONTH,
    DEFAULT_TARGET_YEAR, DEFAULT_TOP_N,
};
use crate::error::{PrecipError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for a batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Month to total and the year preferred for it
    pub target: TargetPeriod,

    /// Glob pattern, relative to the input directory, selecting station files
    pub file_pattern: String,

    /// Skip count used when no precipitation header line is found
    pub fallback_skip_rows: usize,

    /// Number of stations listed in the ranking
    pub top_n: usize,

    /// Coordinate reference system written with the output
    pub crs: String,

    /// Resolve headers and columns only, write nothing
    pub inspect_only: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target: TargetPeriod::new(DEFAULT_TARGET_YEAR, DEFAULT_TARGET_MONTH),
            file_pattern: DEFAULT_FILE_PATTERN.to_string(),
            fallback_skip_rows: DEFAULT_SKIP_ROWS,
            top_n: DEFAULT_TOP_N,
            crs: DEFAULT_CRS.to_string(),
            inspect_only: false,
        }
    }
}

impl PipelineConfig {
    /// Set the target month and preferred year
    pub fn with_target(mut self, year: i32, month: u32) -> Self {
        self.target = TargetPeriod::new(year, month);
        self
    }

    pub fn with_file_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.file_pattern = pattern.into();
        self
    }

    pub fn with_fallback_skip_rows(mut self, skip_rows: usize) -> Self {
        self.fallback_skip_rows = skip_rows;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Enable inspect-only mode
    pub fn with_inspect_only(mut self) -> Self {
        self.inspect_only = true;
        self
    }

    /// Reject settings the pipeline cannot honour
    pub fn validate(&self) -> Result<()> {
        if !(1..=12).contains(&self.target.month) {
            return Err(PrecipError::Configuration {
                message: format!(
                    "target month must be between 1 and 12, got {}",
                    self.target.month
                ),
            });
        }
        if self.file_pattern.trim().is_empty() {
            return Err(PrecipError::Configuration {
                message: "file pattern must not be empty".to_string(),
            });
        }
        if self.top_n == 0 {
            return Err(PrecipError::Configuration {
                message: "ranking size must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
