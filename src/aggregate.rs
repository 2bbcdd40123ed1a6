//! Target-month selection and precipitation totals.

use crate::models::{MonthlyTotals, RawReading, YearSelection};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Calendar month whose total is the primary output, with its preferred year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetPeriod {
    pub year: i32,
    /// 1 = January
    pub month: u32,
}

impl TargetPeriod {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

/// Select the target year and sum precipitation.
///
/// Rows of the configured year and month are used when present. Otherwise the
/// most recent year holding the target month is used. `None` when no dated row
/// falls in the target month at all.
///
/// Selection looks at dated rows only; sums skip rows without a valid
/// precipitation value. The period total covers every valid value, dated or not.
pub fn aggregate(readings: &[RawReading], target: TargetPeriod) -> Option<MonthlyTotals> {
    let in_target_month = |reading: &&RawReading| {
        reading
            .date
            .is_some_and(|date| date.month() == target.month)
    };

    let (target_year, selection) = if readings
        .iter()
        .filter(in_target_month)
        .any(|r| r.date.is_some_and(|d| d.year() == target.year))
    {
        (target.year, YearSelection::Exact)
    } else {
        let latest = readings
            .iter()
            .filter(in_target_month)
            .filter_map(|r| r.date.map(|d| d.year()))
            .max()?;
        (latest, YearSelection::MostRecentFallback)
    };

    let selected: Vec<&RawReading> = readings
        .iter()
        .filter(in_target_month)
        .filter(|r| r.date.is_some_and(|d| d.year() == target_year))
        .collect();

    let target_month_total: f64 = selected.iter().filter_map(|r| r.precip_mm).sum();
    let period_total: f64 = readings.iter().filter_map(|r| r.precip_mm).sum();
    let valid_rows = readings.iter().filter(|r| r.precip_mm.is_some()).count();

    Some(MonthlyTotals {
        target_year,
        target_month_total,
        period_total,
        selection,
        target_rows: selected.len(),
        valid_rows,
    })
}

/// Row count per (year, month) among dated rows
pub fn month_coverage(readings: &[RawReading]) -> BTreeMap<(i32, u32), usize> {
    let mut coverage = BTreeMap::new();
    for date in readings.iter().filter_map(|r| r.date) {
        *coverage.entry((date.year(), date.month())).or_insert(0) += 1;
    }
    coverage
}
