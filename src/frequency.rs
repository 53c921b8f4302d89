//! Value counts and the most-frequent-value primitive used by every report.

use std::collections::HashMap;

use serde::Serialize;

use crate::dataset::{Column, TripDataset, Value};
use crate::error::{BikeshareError, Result};

/// The most frequent value of a column and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyResult {
    pub value: Value,
    pub count: usize,
}

/// Tallies every non-missing value of `column`, most frequent first.
///
/// Values with equal counts keep the order in which they first appear in
/// the dataset, so results are reproducible.
///
/// # Errors
///
/// Returns [`BikeshareError::MissingColumn`] if the dataset does not carry
/// the column at all.
pub fn value_counts(dataset: &TripDataset, column: Column) -> Result<Vec<(Value, usize)>> {
    if let Some(capability) = column.capability() {
        if !dataset.has(capability) {
            return Err(BikeshareError::MissingColumn(column));
        }
    }

    // value -> (count, first position)
    let mut tally: HashMap<Value, (usize, usize)> = HashMap::new();
    for (position, record) in dataset.records().iter().enumerate() {
        if let Some(value) = column.value_of(record) {
            tally.entry(value).or_insert((0, position)).0 += 1;
        }
    }

    let mut counts: Vec<(Value, usize, usize)> = tally
        .into_iter()
        .map(|(value, (count, first))| (value, count, first))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    Ok(counts
        .into_iter()
        .map(|(value, count, _)| (value, count))
        .collect())
}

/// Returns the mode of `column` together with its count.
///
/// # Errors
///
/// Returns [`BikeshareError::EmptyInput`] when the dataset has no records or
/// the column holds no values, and [`BikeshareError::MissingColumn`] when the
/// column is absent for the dataset.
pub fn most_frequent(dataset: &TripDataset, column: Column) -> Result<FrequencyResult> {
    if dataset.is_empty() {
        return Err(BikeshareError::EmptyInput(column));
    }

    value_counts(dataset, column)?
        .into_iter()
        .next()
        .map(|(value, count)| FrequencyResult { value, count })
        .ok_or(BikeshareError::EmptyInput(column))
}
