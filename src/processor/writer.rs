//! Geometry output for the finalized station dataset
//!
//! The batch processor hands the dataset to a [`DatasetWriter`]; the shipped
//! implementation writes a GeoJSON `FeatureCollection` of points.

use crate::dataset::StationDataset;
use crate::error::Result;
use crate::models::StationRecord;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Persists a finalized dataset in some geometry format
pub trait DatasetWriter: std::fmt::Debug {
    /// Write `dataset` to `path`, tagged with the `crs` identifier
    fn write(&self, dataset: &StationDataset, crs: &str, path: &Path) -> Result<()>;
}

/// GeoJSON `FeatureCollection` writer
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoJsonWriter;

#[derive(Serialize)]
struct FeatureCollection<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    crs: NamedCrs<'a>,
    features: Vec<Feature<'a>>,
}

#[derive(Serialize)]
struct NamedCrs<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    properties: CrsName<'a>,
}

#[derive(Serialize)]
struct CrsName<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct Feature<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    geometry: PointGeometry,
    properties: StationProperties<'a>,
}

#[derive(Serialize)]
struct PointGeometry {
    #[serde(rename = "type")]
    kind: &'static str,
    coordinates: [f64; 2],
}

#[derive(Serialize)]
struct StationProperties<'a> {
    station: &'a str,
    lat: f64,
    lon: f64,
    precip_month: f64,
    year: i32,
    precip_period: f64,
}

impl<'a> From<&'a StationRecord> for Feature<'a> {
    fn from(record: &'a StationRecord) -> Self {
        Feature {
            kind: "Feature",
            geometry: PointGeometry {
                kind: "Point",
                coordinates: record.geometry().coordinates(),
            },
            properties: StationProperties {
                station: record.station_name(),
                lat: record.latitude(),
                lon: record.longitude(),
                precip_month: record.target_month_total(),
                year: record.target_year(),
                precip_period: record.period_total(),
            },
        }
    }
}

impl DatasetWriter for GeoJsonWriter {
    fn write(&self, dataset: &StationDataset, crs: &str, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let collection = FeatureCollection {
            kind: "FeatureCollection",
            crs: NamedCrs {
                kind: "name",
                properties: CrsName { name: crs },
            },
            features: dataset.records.iter().map(Feature::from).collect(),
        };

        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &collection)?;
        writer.flush()?;

        debug!(
            "Wrote {} features to {}",
            collection.features.len(),
            path.display()
        );
        Ok(())
    }
}
