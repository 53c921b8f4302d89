use tracing::warn;

use crate::dataset::TripDataset;
use crate::duration::ensure_duration;
use crate::reports::types::DurationStats;

/// Total and mean trip duration in seconds.
///
/// Back-fills missing durations first. Returns `None` for an empty dataset or
/// when durations cannot be resolved; the caller reports a warning and
/// carries on.
#[tracing::instrument(skip_all, fields(rows = dataset.len()))]
pub fn trip_duration_stats(dataset: &mut TripDataset) -> Option<DurationStats> {
    if dataset.is_empty() || !ensure_duration(dataset) {
        warn!("Trip duration unavailable, skipping duration statistics");
        return None;
    }

    let durations: Vec<f64> = dataset
        .records()
        .iter()
        .filter_map(|record| record.trip_duration)
        .collect();
    let total_seconds: f64 = durations.iter().sum();

    Some(DurationStats {
        total_seconds,
        mean_seconds: total_seconds / durations.len() as f64,
    })
}
