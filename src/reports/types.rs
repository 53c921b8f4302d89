//! Result types produced by the reports.

use serde::Serialize;

use crate::error::MissingColumnWarning;
use crate::frequency::FrequencyResult;

/// One-hour window `[start, end)` on a 24-hour clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourRange {
    pub start: u32,
    pub end: u32,
}

impl HourRange {
    pub fn starting_at(hour: u32) -> Self {
        HourRange {
            start: hour % 24,
            end: (hour + 1) % 24,
        }
    }
}

/// Most frequent times of travel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStats {
    pub month: FrequencyResult,
    pub day: FrequencyResult,
    pub hour: FrequencyResult,
    pub hour_range: HourRange,
}

/// Most popular trip, split back into its two stations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopularRoute {
    pub from: String,
    pub to: String,
    pub count: usize,
}

/// Most popular stations and trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationStats {
    pub start_station: FrequencyResult,
    pub end_station: FrequencyResult,
    pub route: PopularRoute,
}

/// Total and mean trip duration, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DurationStats {
    pub total_seconds: f64,
    pub mean_seconds: f64,
}

impl DurationStats {
    pub fn total_hours(&self) -> f64 {
        (self.total_seconds / 3600.0).floor()
    }

    pub fn mean_minutes(&self) -> f64 {
        (self.mean_seconds / 60.0).floor()
    }
}

/// Number of trips for one category value, e.g. "Subscriber".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Oldest, youngest, and most common birth year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub oldest_age: i32,
    pub most_recent: i32,
    pub youngest_age: i32,
    pub most_common: FrequencyResult,
}

/// User demographics; absent columns leave their section empty and add a warning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub user_types: Option<Vec<CategoryCount>>,
    pub genders: Option<Vec<CategoryCount>>,
    pub birth_years: Option<BirthYearStats>,
    pub warnings: Vec<MissingColumnWarning>,
}
