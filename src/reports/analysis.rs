//! Runs every report over one filtered dataset.

use serde::Serialize;
use tracing::info;

use crate::dataset::TripDataset;
use crate::error::{MissingColumnWarning, Result};
use crate::filter::FilterSpec;
use crate::reports::station::station_stats;
use crate::reports::time::time_stats;
use crate::reports::trip_duration::trip_duration_stats;
use crate::reports::types::{DurationStats, StationStats, TimeStats, UserStats};
use crate::reports::user::user_stats;

/// Everything computed for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub city: String,
    pub month: String,
    pub day: String,
    pub rows: usize,
    pub time: TimeStats,
    pub station: StationStats,
    pub duration: Option<DurationStats>,
    pub user: UserStats,
}

impl AnalysisReport {
    /// All skipped sub-reports, in report order.
    pub fn warnings(&self) -> Vec<MissingColumnWarning> {
        let mut warnings = Vec::new();
        if self.duration.is_none() {
            warnings.push(MissingColumnWarning::TripDuration);
        }
        warnings.extend(self.user.warnings.iter().copied());
        warnings
    }
}

/// Computes the time, station, duration, and user reports.
///
/// Returns `Ok(None)` for an empty dataset: there is nothing to report and
/// the caller should ask for different filters.
#[tracing::instrument(skip_all, fields(spec = %spec, rows = dataset.len()))]
pub fn analyze(
    spec: &FilterSpec,
    dataset: &mut TripDataset,
    current_year: i32,
) -> Result<Option<AnalysisReport>> {
    if dataset.is_empty() {
        info!("No rows left after filtering, skipping statistics");
        return Ok(None);
    }

    let time = time_stats(dataset)?;
    let station = station_stats(dataset)?;
    let duration = trip_duration_stats(dataset);
    let user = user_stats(dataset, current_year)?;

    Ok(Some(AnalysisReport {
        city: spec.city.to_string(),
        month: spec.month.to_string(),
        day: spec.day.to_string(),
        rows: dataset.len(),
        time,
        station,
        duration,
        user,
    }))
}
