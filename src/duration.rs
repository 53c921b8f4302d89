//! Trip duration resolution.
//!
//! Durations are seconds as `f64` throughout. Cities that do not publish a
//! `Trip Duration` column get one inferred from the two timestamps.

use tracing::{debug, warn};

use crate::dataset::{Capability, TripDataset, TripRecord};

fn elapsed_seconds(record: &TripRecord) -> f64 {
    (record.end_time - record.start_time).num_milliseconds() as f64 / 1000.0
}

/// Makes sure every record carries a trip duration.
///
/// Records already holding a duration are left untouched; the rest receive
/// `end - start`, even when the naive local timestamps put the end first.
/// Both timestamps are guaranteed by normalization, so inference always
/// succeeds. Calling it again is a no-op.
pub fn ensure_duration(dataset: &mut TripDataset) -> bool {
    let missing = dataset
        .records()
        .iter()
        .filter(|record| record.trip_duration.is_none())
        .count();

    if dataset.has(Capability::TripDuration) && missing == 0 {
        return true;
    }

    let mut negative = 0;
    for record in dataset.records_mut() {
        if record.trip_duration.is_none() {
            let seconds = elapsed_seconds(record);
            if seconds < 0.0 {
                negative += 1;
            }
            record.trip_duration = Some(seconds);
        }
    }
    dataset.mark_available(Capability::TripDuration);
    debug!(inferred = missing, "Trip durations inferred from timestamps");

    if negative > 0 {
        warn!(negative, "Some trips end before they start, kept with a negative duration");
    }

    true
}
