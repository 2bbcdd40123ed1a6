//! File discovery for station exports
//!
//! Lists the files of the input directory matching the configured glob
//! pattern, in sorted order so runs are reproducible.

use crate::error::{PrecipError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File discovery component for a directory of station files
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    input_dir: PathBuf,
    pattern: String,
}

impl FileDiscovery {
    /// Create a new file discovery instance
    pub fn new(input_dir: PathBuf, pattern: impl Into<String>) -> Self {
        Self {
            input_dir,
            pattern: pattern.into(),
        }
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    /// Discover station files directly inside the input directory
    pub fn discover_station_files(&self) -> Result<Vec<PathBuf>> {
        if !self.input_dir.is_dir() {
            return Err(PrecipError::DatasetNotFound {
                path: self.input_dir.clone(),
            });
        }

        // Escape the directory so characters like '[' in it are not glob syntax
        let escaped_dir = glob::Pattern::escape(&self.input_dir.to_string_lossy());
        let full_pattern = format!("{}/{}", escaped_dir, self.pattern);
        debug!("Searching for station files with pattern: {}", full_pattern);

        // INMET publishes `INMET_*.CSV`; match either case
        let options = glob::MatchOptions {
            case_sensitive: false,
            ..Default::default()
        };

        let mut files = Vec::new();
        for entry in glob::glob_with(&full_pattern, options)? {
            let path = entry?;
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        debug!("Found {} station files", files.len());
        Ok(files)
    }
}
