use tracing::warn;

use crate::dataset::{Capability, Column, TripDataset, Value};
use crate::error::{MissingColumnWarning, Result};
use crate::frequency::{most_frequent, value_counts};
use crate::reports::types::{BirthYearStats, CategoryCount, UserStats};

fn distribution(dataset: &TripDataset, column: Column) -> Result<Vec<CategoryCount>> {
    Ok(value_counts(dataset, column)?
        .into_iter()
        .map(|(value, count)| CategoryCount {
            category: value.to_string(),
            count,
        })
        .collect())
}

fn birth_year_stats(dataset: &TripDataset, current_year: i32) -> Result<Option<BirthYearStats>> {
    let years = dataset.records().iter().filter_map(|record| record.birth_year);
    let (Some(earliest), Some(most_recent)) = (years.clone().min(), years.max()) else {
        return Ok(None);
    };

    let most_common = most_frequent(dataset, Column::BirthYear)?;

    Ok(Some(BirthYearStats {
        earliest,
        oldest_age: current_year - earliest,
        most_recent,
        youngest_age: current_year - most_recent,
        most_common,
    }))
}

/// User type and gender distributions plus birth-year extremes and mode.
///
/// Ages are measured against `current_year`.
#[tracing::instrument(skip(dataset), fields(rows = dataset.len()))]
pub fn user_stats(dataset: &TripDataset, current_year: i32) -> Result<UserStats> {
    let mut warnings = Vec::new();

    let user_types = if dataset.has(Capability::UserType) {
        Some(distribution(dataset, Column::UserType)?)
    } else {
        warnings.push(MissingColumnWarning::UserType);
        None
    };

    let genders = if dataset.has(Capability::Gender) {
        Some(distribution(dataset, Column::Gender)?)
    } else {
        warnings.push(MissingColumnWarning::Gender);
        None
    };

    let birth_years = if dataset.has(Capability::BirthYear) {
        birth_year_stats(dataset, current_year)?
    } else {
        None
    };
    if birth_years.is_none() {
        warnings.push(MissingColumnWarning::BirthYear);
    }

    for warning in &warnings {
        warn!(%warning, "Skipping user sub-report");
    }

    Ok(UserStats {
        user_types,
        genders,
        birth_years,
        warnings,
    })
}

/// Modal birth year as a plain integer, for summaries.
pub fn modal_birth_year(stats: &UserStats) -> Option<i64> {
    stats
        .birth_years
        .as_ref()
        .and_then(|years| match years.most_common.value {
            Value::Int(year) => Some(year),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::{dataset, raw_trip};
    use crate::dataset::{RawTrip, Schema};

    fn rider(user_type: &str, gender: Option<&str>, birth_year: Option<f64>) -> RawTrip {
        let mut raw = raw_trip("2017-01-01 09:00:00", "2017-01-01 09:10:00", "A", "B");
        raw.user_type = Some(user_type.to_string());
        raw.gender = gender.map(str::to_string);
        raw.birth_year = birth_year;
        raw
    }

    #[test]
    fn test_full_user_stats() {
        let ds = dataset(
            Schema::full(),
            vec![
                rider("Subscriber", Some("Male"), Some(1985.0)),
                rider("Subscriber", Some("Female"), Some(1992.0)),
                rider("Customer", None, None),
                rider("Subscriber", Some("Male"), Some(1992.0)),
                rider("Customer", Some("Female"), Some(1949.0)),
            ],
        );
        let stats = user_stats(&ds, 2020).unwrap();

        assert!(stats.warnings.is_empty());
        assert_eq!(
            stats.user_types.unwrap(),
            vec![
                CategoryCount {
                    category: "Subscriber".to_string(),
                    count: 3
                },
                CategoryCount {
                    category: "Customer".to_string(),
                    count: 2
                },
            ]
        );
        assert_eq!(stats.genders.unwrap().iter().map(|g| g.count).sum::<usize>(), 4);

        let years = stats.birth_years.unwrap();
        assert_eq!(years.earliest, 1949);
        assert_eq!(years.oldest_age, 71);
        assert_eq!(years.most_recent, 1992);
        assert_eq!(years.youngest_age, 28);
        assert_eq!(years.most_common.value, Value::Int(1992));
        assert_eq!(years.most_common.count, 2);
    }

    #[test]
    fn test_missing_gender_and_birth_year_warn() {
        let schema = Schema {
            trip_duration: true,
            user_type: true,
            gender: false,
            birth_year: false,
        };
        let ds = dataset(
            schema,
            vec![
                rider("Subscriber", Some("Male"), Some(1985.0)),
                rider("Customer", None, None),
            ],
        );
        let stats = user_stats(&ds, 2020).unwrap();

        assert_eq!(stats.user_types.as_ref().unwrap().len(), 2);
        assert!(stats.genders.is_none());
        assert!(stats.birth_years.is_none());
        assert_eq!(
            stats.warnings,
            vec![MissingColumnWarning::Gender, MissingColumnWarning::BirthYear]
        );
        assert_eq!(modal_birth_year(&stats), None);
    }

    #[test]
    fn test_birth_years_reported_without_gender() {
        let schema = Schema {
            trip_duration: true,
            user_type: true,
            gender: false,
            birth_year: true,
        };
        let ds = dataset(
            schema,
            vec![
                rider("Subscriber", Some("Male"), Some(1988.0)),
                rider("Customer", None, Some(1961.0)),
                rider("Subscriber", None, Some(1988.0)),
                rider("Subscriber", None, Some(2001.0)),
            ],
        );
        let stats = user_stats(&ds, 2020).unwrap();

        assert_eq!(stats.warnings, vec![MissingColumnWarning::Gender]);
        assert!(stats.genders.is_none());
        assert_eq!(stats.user_types.as_ref().unwrap()[0].count, 3);

        let years = stats.birth_years.as_ref().unwrap();
        assert_eq!(years.earliest, 1961);
        assert_eq!(years.oldest_age, 59);
        assert_eq!(years.most_recent, 2001);
        assert_eq!(years.youngest_age, 19);
        assert_eq!(years.most_common.value, Value::Int(1988));
        assert_eq!(years.most_common.count, 2);
        assert_eq!(modal_birth_year(&stats), Some(1988));
    }
}
