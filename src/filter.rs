//! City selection, month/day filters, and the row filter.

use std::fmt;
use std::str::FromStr;

use chrono::{Month, Weekday};
use tracing::info;

use crate::dataset::{MONTHS, TripDataset, WEEKDAYS, month_name, weekday_name};
use crate::error::{BikeshareError, Result};

pub const CITY_OPTIONS: [&str; 3] = ["chicago", "new york city", "washington"];

pub const MONTH_OPTIONS: [&str; 13] = [
    "all",
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

pub const DAY_OPTIONS: [&str; 8] = [
    "all",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    pub fn name(&self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }

    /// File holding this city's trips inside the data directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for City {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        City::ALL
            .into_iter()
            .find(|city| city.name() == wanted)
            .ok_or(BikeshareError::InvalidOption {
                kind: "city",
                value: s.to_string(),
            })
    }
}

/// Either every value, or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T: PartialEq> Selection<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

/// Looks a lower-cased choice up in an "all"-first option list.
fn parse_selection<T: Copy>(
    kind: &'static str,
    options: &[&str],
    values: &[T],
    input: &str,
) -> Result<Selection<T>> {
    let wanted = input.trim().to_lowercase();
    match options.iter().position(|option| *option == wanted) {
        Some(0) => Ok(Selection::All),
        Some(index) => Ok(Selection::Only(values[index - 1])),
        None => Err(BikeshareError::InvalidOption {
            kind,
            value: input.to_string(),
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthFilter(pub Selection<Month>);

impl FromStr for MonthFilter {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self> {
        parse_selection("month", &MONTH_OPTIONS, &MONTHS, s).map(MonthFilter)
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Selection::All => f.write_str("all"),
            Selection::Only(month) => f.write_str(month_name(month)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayFilter(pub Selection<Weekday>);

impl FromStr for DayFilter {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self> {
        parse_selection("day", &DAY_OPTIONS, &WEEKDAYS, s).map(DayFilter)
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Selection::All => f.write_str("all"),
            Selection::Only(day) => f.write_str(weekday_name(day)),
        }
    }
}

/// The scope of one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    pub city: City,
    pub month: MonthFilter,
    pub day: DayFilter,
}

impl FilterSpec {
    pub fn new(city: City, month: MonthFilter, day: DayFilter) -> Self {
        FilterSpec { city, month, day }
    }

    /// Parses the three user choices, case-insensitively.
    pub fn parse(city: &str, month: &str, day: &str) -> Result<Self> {
        Ok(FilterSpec {
            city: city.parse()?,
            month: month.parse()?,
            day: day.parse()?,
        })
    }

    pub fn is_unfiltered(&self) -> bool {
        self.month.0.is_all() && self.day.0.is_all()
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "city: {}, month: {}, day: {}",
            self.city, self.month, self.day
        )
    }
}

/// Keeps the records whose derived month and day match `spec`.
///
/// The input is left untouched. An empty result is a valid outcome.
pub fn filter(dataset: &TripDataset, spec: &FilterSpec) -> TripDataset {
    let size_before = dataset.len();

    let filtered = if spec.is_unfiltered() {
        dataset.clone()
    } else {
        let records = dataset
            .records()
            .iter()
            .filter(|record| {
                let derived = record.derived();
                spec.month.0.matches(&derived.month) && spec.day.0.matches(&derived.day)
            })
            .cloned()
            .collect();
        dataset.with_records(records)
    };

    info!(
        size_before,
        size_after = filtered.len(),
        month = %spec.month,
        day = %spec.day,
        "Filter applied"
    );

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Schema;
    use crate::dataset::tests::{dataset, raw_trip};

    fn ten_rows() -> TripDataset {
        // 2017-01-02 is a Monday.
        let starts = [
            "2017-01-02 08:00:00",
            "2017-01-03 09:00:00",
            "2017-01-04 10:00:00",
            "2017-02-06 11:00:00",
            "2017-02-07 12:00:00",
            "2017-03-06 13:00:00",
            "2017-03-07 14:00:00",
            "2017-04-03 15:00:00",
            "2017-05-01 16:00:00",
            "2017-06-05 17:00:00",
        ];
        dataset(
            Schema::default(),
            starts
                .iter()
                .map(|start| raw_trip(start, start, "A", "B"))
                .collect(),
        )
    }

    #[test]
    fn test_all_all_is_identity() {
        let ds = ten_rows();
        let spec = FilterSpec::parse("chicago", "all", "all").unwrap();
        assert_eq!(filter(&ds, &spec), ds);
    }

    #[test]
    fn test_month_filter_is_case_insensitive() {
        let ds = ten_rows();
        let spec = FilterSpec::parse("Chicago", "january", "all").unwrap();
        let out = filter(&ds, &spec);
        assert_eq!(out.len(), 3);
        assert!(out.records().iter().all(|r| r.month_name() == "January"));

        let upper = FilterSpec::parse("chicago", "JANUARY", "all").unwrap();
        assert_eq!(filter(&ds, &upper), out);
    }

    #[test]
    fn test_month_and_day_combine() {
        let ds = ten_rows();
        let spec = FilterSpec::parse("chicago", "march", "monday").unwrap();
        let out = filter(&ds, &spec);
        assert_eq!(out.len(), 1);
        assert_eq!(out.records()[0].day_name(), "Monday");
    }

    #[test]
    fn test_no_match_yields_empty_dataset() {
        let ds = ten_rows();
        let spec = FilterSpec::parse("chicago", "all", "sunday").unwrap();
        let out = filter(&ds, &spec);
        assert!(out.is_empty());
        assert_eq!(ds.len(), 10);
    }

    #[test]
    fn test_rejects_unknown_options() {
        assert!("dicember".parse::<MonthFilter>().is_err());
        assert!("someday".parse::<DayFilter>().is_err());
        assert!("boston".parse::<City>().is_err());
    }

    #[test]
    fn test_city_names_and_files() {
        let city: City = "New York City".parse().unwrap();
        assert_eq!(city, City::NewYorkCity);
        assert_eq!(city.file_name(), "new_york_city.csv");
        assert_eq!(City::ALL.len(), CITY_OPTIONS.len());
    }

    #[test]
    fn test_filter_display() {
        let spec = FilterSpec::parse("washington", "june", "friday").unwrap();
        assert_eq!(
            spec.to_string(),
            "city: washington, month: June, day: Friday"
        );
    }
}
