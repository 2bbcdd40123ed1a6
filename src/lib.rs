//! INMET Precipitation Aggregator
//!
//! Turns a directory of INMET hourly station exports (Latin-1, `;`-separated,
//! decimal comma) into one point per station carrying the precipitation total
//! of a target month and of the whole record, ready for isohyet mapping.
//!
//! This library provides tools for:
//! - Reading station name and coordinates from the fixed metadata block
//! - Finding the data table and its date/precipitation columns despite
//!   inconsistent header spelling and accents
//! - Coercing dates in several layouts and decimal-comma values
//! - Selecting the target month with a most-recent-year fallback
//! - Summarizing the batch and writing a GeoJSON point dataset

pub mod aggregate;
pub mod cli;
pub mod coerce;
pub mod config;
pub mod constants;
pub mod dataset;
pub mod error;
pub mod header;
pub mod models;
pub mod processor;
pub mod schema;
pub mod text;

// Re-export commonly used types
pub use aggregate::TargetPeriod;
pub use config::PipelineConfig;
pub use dataset::{DatasetBuilder, StationDataset};
pub use error::{PrecipError, Result};
pub use models::{Point, ProcessingStats, RawReading, StationMetadata, StationRecord};
pub use processor::BatchProcessor;
