//! Batch processing engine.
//!
//! Runs every discovered station file through header parsing, schema
//! resolution, value coercion and monthly aggregation. Each file is its own
//! failure boundary: a file that cannot produce a record is logged and skipped,
//! and only an empty batch ends the run without output.

pub mod discovery;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::{
    discovery::FileDiscovery,
    writer::{DatasetWriter, GeoJsonWriter},
};

use crate::aggregate::{aggregate, month_coverage};
use crate::coerce::{read_table, readings_from_table};
use crate::config::PipelineConfig;
use crate::dataset::DatasetBuilder;
use crate::error::{PrecipError, Result};
use crate::header::{parse_station_header, read_latin1};
use crate::models::{ProcessingStats, SkippedFile, StationRecord, YearSelection};
use crate::schema::{HeaderLocation, ResolvedSchema, locate_header_row, resolve_schema};

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Header and column resolution of one file, as reported by inspect mode
#[derive(Debug, Clone)]
pub struct FileInspection {
    pub path: PathBuf,
    pub header: HeaderLocation,
    pub columns: Vec<String>,
    pub schema: Option<ResolvedSchema>,
    pub data_rows: usize,
}

/// Main processor for a directory of station files
#[derive(Debug)]
pub struct BatchProcessor {
    output_path: PathBuf,
    config: PipelineConfig,
    file_discovery: FileDiscovery,
    writer: Box<dyn DatasetWriter>,
}

impl BatchProcessor {
    /// Create a new batch processor writing GeoJSON to `output_path`
    pub fn new(input_dir: PathBuf, output_path: PathBuf) -> Self {
        let config = PipelineConfig::default();
        Self {
            file_discovery: FileDiscovery::new(input_dir, config.file_pattern.clone()),
            output_path,
            config,
            writer: Box::new(GeoJsonWriter),
        }
    }

    /// Configure the processor
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.file_discovery = FileDiscovery::new(
            self.file_discovery.input_dir().to_path_buf(),
            config.file_pattern.clone(),
        );
        self.config = config;
        self
    }

    /// Replace the output writer
    pub fn with_writer(mut self, writer: Box<dyn DatasetWriter>) -> Self {
        self.writer = writer;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Main processing entry point
    pub fn process(&self) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        self.config.validate()?;

        println!("{}", "Starting precipitation aggregation".bright_green().bold());
        println!(
            "  {} {}",
            "Input:".bright_cyan(),
            self.file_discovery.input_dir().display()
        );
        println!(
            "  {} {:02}/{} (falling back to the latest year with that month)",
            "Target:".bright_cyan(),
            self.config.target.month,
            self.config.target.year
        );

        let files = self.file_discovery.discover_station_files()?;
        println!(
            "  {} {} station files",
            "Found".bright_green(),
            files.len().to_string().bright_white().bold()
        );
        info!("Found {} station files", files.len());

        let mut stats = ProcessingStats {
            files_discovered: files.len(),
            output_path: self.output_path.clone(),
            ..Default::default()
        };

        let mut builder = DatasetBuilder::new();
        let progress = progress_bar(files.len());

        for path in &files {
            if let Some(file_name) = path.file_name() {
                progress.set_message(format!("{}", file_name.to_string_lossy()));
            }

            match process_file(path, &self.config) {
                Ok(record) => {
                    stats.files_processed += 1;
                    builder.push(record);
                }
                Err(error) if error.is_file_level() => {
                    warn!("Skipping {}: {}", path.display(), error);
                    stats.files_failed += 1;
                    stats.skipped.push(SkippedFile {
                        path: path.clone(),
                        kind: error.kind(),
                        reason: error.to_string(),
                    });
                }
                Err(error) => {
                    progress.abandon();
                    return Err(error);
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        let dataset = builder.finalize(self.config.top_n, files.len())?;

        self.writer
            .write(&dataset, &self.config.crs, &self.output_path)?;
        stats.records_written = dataset.records.len();
        stats.processing_time_ms = start_time.elapsed().as_millis();

        info!(
            "Wrote {} station records to {}",
            stats.records_written,
            self.output_path.display()
        );
        stats.summary = dataset.summary;
        report_summary(&stats, self.config.target.month);

        Ok(stats)
    }

    /// Resolve header row and columns of every file without aggregating
    pub fn inspect(&self) -> Result<Vec<FileInspection>> {
        let files = self.file_discovery.discover_station_files()?;
        let mut inspections = Vec::with_capacity(files.len());

        for path in &files {
            match inspect_file(path, &self.config) {
                Ok(inspection) => inspections.push(inspection),
                Err(error) if error.is_file_level() => {
                    warn!("Could not inspect {}: {}", path.display(), error);
                }
                Err(error) => return Err(error),
            }
        }

        Ok(inspections)
    }
}

/// Run one station file through the full pipeline
pub fn process_file(path: &Path, config: &PipelineConfig) -> Result<StationRecord> {
    debug!("Processing {}", path.display());

    let text = read_latin1(path)?;
    let lines: Vec<&str> = text.lines().collect();

    let metadata = parse_station_header(path, &lines)?;
    let header = locate_header_row(&lines, config.fallback_skip_rows);
    if header.detected {
        debug!("Found header at line {} of {}", header.skip_rows, path.display());
    } else {
        warn!(
            "No precipitation header line in {}, assuming {} metadata lines",
            path.display(),
            header.skip_rows
        );
    }

    let table = read_table(&text, header.skip_rows)?;
    debug!("Columns of {}: {:?}", path.display(), table.columns);

    let schema = resolve_schema(path, &table.columns)?;
    let readings = readings_from_table(&table, &schema);

    for ((year, month), count) in month_coverage(&readings) {
        debug!("  {}-{:02}: {} rows", year, month, count);
    }

    let totals =
        aggregate(&readings, config.target).ok_or_else(|| PrecipError::NoTargetMonthData {
            path: path.to_path_buf(),
            month: config.target.month,
        })?;

    if totals.selection == YearSelection::MostRecentFallback {
        warn!(
            "{}: no data for {:02}/{}, using {}",
            metadata.station_name,
            config.target.month,
            config.target.year,
            totals.target_year
        );
    }

    let share = if totals.period_total > 0.0 {
        totals.target_month_total / totals.period_total * 100.0
    } else {
        0.0
    };
    debug!(
        "{}: {:.1} mm in {:02}/{} ({} rows), {:.1} mm over the period ({:.1}%)",
        metadata.station_name,
        totals.target_month_total,
        config.target.month,
        totals.target_year,
        totals.target_rows,
        totals.period_total,
        share
    );

    Ok(StationRecord::new(metadata, &totals))
}

/// Header detection and column resolution for one file
pub fn inspect_file(path: &Path, config: &PipelineConfig) -> Result<FileInspection> {
    let text = read_latin1(path)?;
    let lines: Vec<&str> = text.lines().collect();

    let header = locate_header_row(&lines, config.fallback_skip_rows);
    let table = read_table(&text, header.skip_rows)?;
    let schema = resolve_schema(path, &table.columns).ok();

    Ok(FileInspection {
        path: path.to_path_buf(),
        header,
        data_rows: table.records.len(),
        columns: table.columns,
        schema,
    })
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

fn report_summary(stats: &ProcessingStats, month: u32) {
    let summary = &stats.summary;
    println!("\n{}", "Processing Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Stations processed:".bright_cyan(),
        stats.files_processed.to_string().bright_white()
    );
    if stats.files_failed > 0 {
        println!(
            "  {} {}",
            "Files skipped:".bright_red(),
            stats.files_failed.to_string().bright_red().bold()
        );
    }

    println!("\n{}", "Summary by year".bright_yellow());
    for year in &summary.by_year {
        println!(
            "  {:02}/{} ({} stations): mean {:.1} mm, min {:.1} mm, max {:.1} mm",
            month, year.year, year.count, year.mean, year.min, year.max
        );
    }

    println!(
        "\n{}",
        format!("Top {} stations", summary.ranking.len()).bright_yellow()
    );
    for station in &summary.ranking {
        println!(
            "  {} ({}): {:.1} mm",
            station.station_name.bright_white(),
            station.target_year,
            station.target_month_total
        );
    }

    println!(
        "\n  {} {}",
        "Output:".bright_cyan(),
        stats.output_path.display()
    );
}
