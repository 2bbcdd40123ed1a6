//! Core data structures for station processing.
//!
//! Defines station metadata, per-row readings, the immutable output record
//! with its point geometry, and processing statistics.

use crate::dataset::DatasetSummary;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Metadata extracted from the fixed header block of a station file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationMetadata {
    pub station_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// One row of the data table after coercion
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawReading {
    pub date: Option<NaiveDate>,
    pub precip_mm: Option<f64>,
}

impl RawReading {
    pub fn new(date: Option<NaiveDate>, precip_mm: Option<f64>) -> Self {
        Self { date, precip_mm }
    }
}

/// Point geometry, longitude first
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub longitude: f64,
    pub latitude: f64,
}

impl Point {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Coordinates in `[x, y]` order
    pub fn coordinates(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

/// How the target year was chosen for a station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YearSelection {
    /// The configured target year had data for the target month
    Exact,
    /// The most recent year holding the target month was used instead
    MostRecentFallback,
}

/// Totals produced by the monthly aggregator for one station
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyTotals {
    pub target_year: i32,
    pub target_month_total: f64,
    pub period_total: f64,
    pub selection: YearSelection,
    /// Rows dated in the selected year/month
    pub target_rows: usize,
    /// Rows with a valid precipitation value
    pub valid_rows: usize,
}

/// Output unit: one station with its aggregated precipitation.
///
/// Built once per successfully processed file. Fields are private so the
/// geometry can never drift from the coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationRecord {
    station_name: String,
    latitude: f64,
    longitude: f64,
    geometry: Point,
    target_month_total: f64,
    target_year: i32,
    period_total: f64,
}

impl StationRecord {
    pub fn new(metadata: StationMetadata, totals: &MonthlyTotals) -> Self {
        Self {
            geometry: Point::new(metadata.longitude, metadata.latitude),
            station_name: metadata.station_name,
            latitude: metadata.latitude,
            longitude: metadata.longitude,
            target_month_total: totals.target_month_total,
            target_year: totals.target_year,
            period_total: totals.period_total,
        }
    }

    pub fn station_name(&self) -> &str {
        &self.station_name
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn geometry(&self) -> Point {
        self.geometry
    }

    pub fn target_month_total(&self) -> f64 {
        self.target_month_total
    }

    pub fn target_year(&self) -> i32 {
        self.target_year
    }

    pub fn period_total(&self) -> f64 {
        self.period_total
    }
}

/// A file that did not yield a record
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub kind: &'static str,
    pub reason: String,
}

/// Processing statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub files_discovered: usize,
    pub files_processed: usize,
    pub files_failed: usize,
    pub records_written: usize,
    pub skipped: Vec<SkippedFile>,
    pub output_path: PathBuf,
    pub processing_time_ms: u128,
    /// Per-year statistics and ranking of the written dataset
    pub summary: DatasetSummary,
}
