//! Trip records, dataset schema, and the schema normalizer.
//!
//! Raw CSV rows ([`RawTrip`]) are turned into [`TripRecord`]s by [`normalize`],
//! which parses both timestamps and attaches the derived month, day, and hour
//! fields. A [`TripDataset`] carries the records of one city together with the
//! [`Schema`] of optional columns resolved when the source was read.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Month, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{BikeshareError, Result};
use crate::filter::City;

/// Accepted textual forms of `Start Time` / `End Time`, tried in order.
pub const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

pub const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Full English month name, e.g. "January".
pub fn month_name(month: Month) -> &'static str {
    month.name()
}

/// Full English day name, e.g. "Monday".
pub fn weekday_name(day: Weekday) -> &'static str {
    WEEKDAY_NAMES[day.num_days_from_monday() as usize]
}

/// A row exactly as it appears in a city's CSV file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTrip {
    #[serde(rename = "Start Time", default)]
    pub start_time: Option<String>,
    #[serde(rename = "End Time", default)]
    pub end_time: Option<String>,
    #[serde(rename = "Trip Duration", default)]
    pub trip_duration: Option<f64>,
    #[serde(rename = "Start Station")]
    pub start_station: String,
    #[serde(rename = "End Station")]
    pub end_station: String,
    #[serde(rename = "User Type", default)]
    pub user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    pub gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    pub birth_year: Option<f64>,
}

/// Fields computed once from the start timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedFields {
    pub month: Month,
    pub day: Weekday,
    pub hour: u32,
}

impl DerivedFields {
    pub fn from_start(start: &NaiveDateTime) -> Self {
        DerivedFields {
            month: MONTHS[start.month0() as usize],
            day: start.weekday(),
            hour: start.hour(),
        }
    }
}

/// One bike rental.
///
/// `trip_duration` is always expressed in seconds, whether it came from the
/// source or was inferred by [`crate::duration::ensure_duration`].
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub start_station: String,
    pub end_station: String,
    pub trip_duration: Option<f64>,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
    derived: DerivedFields,
}

impl TripRecord {
    pub fn derived(&self) -> DerivedFields {
        self.derived
    }

    pub fn month_name(&self) -> &'static str {
        month_name(self.derived.month)
    }

    pub fn day_name(&self) -> &'static str {
        weekday_name(self.derived.day)
    }

    pub fn hour(&self) -> u32 {
        self.derived.hour
    }
}

/// Optional, dataset-wide columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    TripDuration,
    UserType,
    Gender,
    BirthYear,
}

/// Which optional columns a city's source provides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Schema {
    pub trip_duration: bool,
    pub user_type: bool,
    pub gender: bool,
    pub birth_year: bool,
}

impl Schema {
    /// Every optional column present.
    pub fn full() -> Self {
        Schema {
            trip_duration: true,
            user_type: true,
            gender: true,
            birth_year: true,
        }
    }

    /// Resolves capabilities from a CSV header row.
    pub fn from_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> Self {
        let mut schema = Schema::default();
        for header in headers {
            match header.trim() {
                "Trip Duration" => schema.trip_duration = true,
                "User Type" => schema.user_type = true,
                "Gender" => schema.gender = true,
                "Birth Year" => schema.birth_year = true,
                _ => {}
            }
        }
        schema
    }

    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::TripDuration => self.trip_duration,
            Capability::UserType => self.user_type,
            Capability::Gender => self.gender,
            Capability::BirthYear => self.birth_year,
        }
    }
}

/// A column that can be tallied by the frequency analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Month,
    Day,
    Hour,
    StartStation,
    EndStation,
    /// Synthetic column pairing start and end station of each trip.
    Route,
    UserType,
    Gender,
    BirthYear,
}

impl Column {
    pub fn name(&self) -> &'static str {
        match self {
            Column::Month => "month",
            Column::Day => "day",
            Column::Hour => "hour",
            Column::StartStation => "Start Station",
            Column::EndStation => "End Station",
            Column::Route => "Start to End",
            Column::UserType => "User Type",
            Column::Gender => "Gender",
            Column::BirthYear => "Birth Year",
        }
    }

    /// The optional capability this column depends on, if any.
    pub fn capability(&self) -> Option<Capability> {
        match self {
            Column::UserType => Some(Capability::UserType),
            Column::Gender => Some(Capability::Gender),
            Column::BirthYear => Some(Capability::BirthYear),
            _ => None,
        }
    }

    /// Extracts this column from a record; `None` for an empty cell.
    pub fn value_of(&self, record: &TripRecord) -> Option<Value> {
        match self {
            Column::Month => Some(Value::Text(record.month_name().to_string())),
            Column::Day => Some(Value::Text(record.day_name().to_string())),
            Column::Hour => Some(Value::Int(i64::from(record.hour()))),
            Column::StartStation => Some(Value::Text(record.start_station.clone())),
            Column::EndStation => Some(Value::Text(record.end_station.clone())),
            Column::Route => Some(Value::Pair(
                record.start_station.clone(),
                record.end_station.clone(),
            )),
            Column::UserType => record.user_type.clone().map(Value::Text),
            Column::Gender => record.gender.clone().map(Value::Text),
            Column::BirthYear => record.birth_year.map(|year| Value::Int(i64::from(year))),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self> {
        let column = match s.trim() {
            "month" => Column::Month,
            "day" => Column::Day,
            "hour" => Column::Hour,
            "Start Station" => Column::StartStation,
            "End Station" => Column::EndStation,
            "Start to End" => Column::Route,
            "User Type" => Column::UserType,
            "Gender" => Column::Gender,
            "Birth Year" => Column::BirthYear,
            other => return Err(BikeshareError::UnknownColumn(other.to_string())),
        };
        Ok(column)
    }
}

/// A single cell value as seen by the frequency analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Int(i64),
    Pair(String, String),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_pair(&self) -> Option<(&str, &str)> {
        match self {
            Value::Pair(from, to) => Some((from, to)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Int(v) => write!(f, "{v}"),
            Value::Pair(from, to) => write!(f, "{from} > {to}"),
        }
    }
}

/// All trips of one city, normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct TripDataset {
    city: City,
    schema: Schema,
    records: Vec<TripRecord>,
}

impl TripDataset {
    pub fn new(city: City, schema: Schema, records: Vec<TripRecord>) -> Self {
        TripDataset {
            city,
            schema,
            records,
        }
    }

    pub fn city(&self) -> City {
        self.city
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.schema.has(capability)
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Same city and schema, different rows.
    pub(crate) fn with_records(&self, records: Vec<TripRecord>) -> Self {
        TripDataset {
            city: self.city,
            schema: self.schema,
            records,
        }
    }

    pub(crate) fn records_mut(&mut self) -> &mut [TripRecord] {
        &mut self.records
    }

    pub(crate) fn mark_available(&mut self, capability: Capability) {
        match capability {
            Capability::TripDuration => self.schema.trip_duration = true,
            Capability::UserType => self.schema.user_type = true,
            Capability::Gender => self.schema.gender = true,
            Capability::BirthYear => self.schema.birth_year = true,
        }
    }
}

/// Parses a timestamp in any of the [`TIMESTAMP_FORMATS`].
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

fn required_timestamp(row: usize, field: &'static str, text: Option<&str>) -> Result<NaiveDateTime> {
    let text = text.unwrap_or_default();
    parse_timestamp(text).ok_or_else(|| BikeshareError::Parse {
        row,
        field,
        value: text.to_string(),
    })
}

/// A calendar year stored as a float, e.g. `1992.0`; anything else is dropped.
fn whole_year(year: f64) -> Option<i32> {
    if year.fract() != 0.0 || year < f64::from(i32::MIN) || year > f64::from(i32::MAX) {
        return None;
    }
    Some(year as i32)
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Parses both timestamps of every row and attaches the derived fields.
///
/// Columns the schema marks absent are dropped even if a row carries a
/// value for them, so presence stays dataset-wide.
///
/// # Errors
///
/// Returns [`BikeshareError::Parse`] for the first row whose `Start Time` or
/// `End Time` is missing or unparsable; no partial dataset is produced.
pub fn normalize(city: City, schema: Schema, raw: Vec<RawTrip>) -> Result<TripDataset> {
    let mut records = Vec::with_capacity(raw.len());

    for (index, trip) in raw.into_iter().enumerate() {
        let row = index + 1;
        let start_time = required_timestamp(row, "Start Time", trip.start_time.as_deref())?;
        let end_time = required_timestamp(row, "End Time", trip.end_time.as_deref())?;

        records.push(TripRecord {
            derived: DerivedFields::from_start(&start_time),
            start_time,
            end_time,
            start_station: trip.start_station,
            end_station: trip.end_station,
            trip_duration: trip.trip_duration.filter(|_| schema.trip_duration),
            user_type: non_empty(trip.user_type).filter(|_| schema.user_type),
            gender: non_empty(trip.gender).filter(|_| schema.gender),
            birth_year: trip
                .birth_year
                .filter(|_| schema.birth_year)
                .and_then(whole_year),
        });
    }

    Ok(TripDataset::new(city, schema, records))
}
