use crate::dataset::{Column, TripDataset};
use crate::error::{BikeshareError, Result};
use crate::frequency::most_frequent;
use crate::reports::types::{HourRange, TimeStats};

/// Most common month, day of week, and start hour, each tallied on its own.
#[tracing::instrument(skip_all, fields(rows = dataset.len()))]
pub fn time_stats(dataset: &TripDataset) -> Result<TimeStats> {
    let month = most_frequent(dataset, Column::Month)?;
    let day = most_frequent(dataset, Column::Day)?;
    let hour = most_frequent(dataset, Column::Hour)?;

    let start = hour
        .value
        .as_int()
        .and_then(|h| u32::try_from(h).ok())
        .filter(|h| *h < 24)
        .ok_or_else(|| BikeshareError::UnexpectedValue {
            column: Column::Hour,
            value: hour.value.to_string(),
        })?;

    Ok(TimeStats {
        month,
        day,
        hour_range: HourRange::starting_at(start),
        hour,
    })
}
