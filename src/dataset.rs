//! Collection of station records and run summary.
//!
//! The builder is owned by the batch loop and only appended to. Finalizing
//! turns it into the output dataset with per-year statistics and a ranking of
//! the wettest stations, computed through a polars frame.

use crate::error::{PrecipError, Result};
use crate::models::StationRecord;
use polars::prelude::*;
use serde::Serialize;
use tracing::debug;

/// count/mean/min/max of the target-month total for one target year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSummary {
    pub year: i32,
    pub count: u64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Entry of the top-N ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedStation {
    pub station_name: String,
    pub target_year: i32,
    pub target_month_total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub by_year: Vec<YearSummary>,
    pub ranking: Vec<RankedStation>,
}

/// Finalized output: every record in processing order plus the summary
#[derive(Debug, Clone)]
pub struct StationDataset {
    pub records: Vec<StationRecord>,
    pub summary: DatasetSummary,
}

/// Append-only accumulator for station records
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    records: Vec<StationRecord>,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: StationRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[StationRecord] {
        &self.records
    }

    /// Build the dataset, or `EmptyBatch` when no station survived.
    ///
    /// `files_seen` only feeds the error message.
    pub fn finalize(self, top_n: usize, files_seen: usize) -> Result<StationDataset> {
        if self.records.is_empty() {
            return Err(PrecipError::EmptyBatch { files_seen });
        }

        let frame = records_frame(&self.records)?;
        let by_year = summarize_by_year(&frame)?;
        let ranking = rank_stations(&frame, &self.records, top_n)?;

        debug!(
            "Finalized dataset with {} records across {} target years",
            self.records.len(),
            by_year.len()
        );

        Ok(StationDataset {
            records: self.records,
            summary: DatasetSummary { by_year, ranking },
        })
    }
}

/// One row per record; `order` keeps the processing position for tie-breaks
fn records_frame(records: &[StationRecord]) -> Result<DataFrame> {
    let order: Vec<u32> = (0..records.len() as u32).collect();
    let years: Vec<i32> = records.iter().map(StationRecord::target_year).collect();
    let totals: Vec<f64> = records
        .iter()
        .map(StationRecord::target_month_total)
        .collect();

    let frame = df!(
        "order" => order,
        "target_year" => years,
        "target_month_total" => totals,
    )?;
    Ok(frame)
}

fn summarize_by_year(frame: &DataFrame) -> Result<Vec<YearSummary>> {
    let grouped = frame
        .clone()
        .lazy()
        .group_by([col("target_year")])
        .agg([
            len().cast(DataType::UInt64).alias("count"),
            col("target_month_total").mean().alias("mean"),
            col("target_month_total").min().alias("min"),
            col("target_month_total").max().alias("max"),
        ])
        .sort_by_exprs([col("target_year")], SortMultipleOptions::default())
        .collect()?;

    let years = grouped.column("target_year")?.i32()?;
    let counts = grouped.column("count")?.u64()?;
    let means = grouped.column("mean")?.f64()?;
    let mins = grouped.column("min")?.f64()?;
    let maxs = grouped.column("max")?.f64()?;

    let summaries = (0..grouped.height())
        .filter_map(|i| {
            Some(YearSummary {
                year: years.get(i)?,
                count: counts.get(i)?,
                mean: means.get(i)?,
                min: mins.get(i)?,
                max: maxs.get(i)?,
            })
        })
        .collect();

    Ok(summaries)
}

/// Top `top_n` records by target-month total, descending, stable on ties
fn rank_stations(
    frame: &DataFrame,
    records: &[StationRecord],
    top_n: usize,
) -> Result<Vec<RankedStation>> {
    let ranked = frame
        .clone()
        .lazy()
        .sort_by_exprs(
            [col("target_month_total"), col("order")],
            SortMultipleOptions::default()
                .with_order_descending_multi([true, false])
                .with_maintain_order(true),
        )
        .limit(top_n as IdxSize)
        .collect()?;

    let positions = ranked.column("order")?.u32()?;

    Ok(positions
        .into_iter()
        .flatten()
        .filter_map(|position| records.get(position as usize))
        .map(|record| RankedStation {
            station_name: record.station_name().to_string(),
            target_year: record.target_year(),
            target_month_total: record.target_month_total(),
        })
        .collect())
}
