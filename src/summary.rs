use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::filter::FilterSpec;
use crate::reports::analysis::AnalysisReport;
use crate::reports::user::modal_birth_year;

/// One flat row per analysis run, suitable for appending to a CSV file.
#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    pub timestamp: DateTime<Utc>,
    pub city: String,
    pub month: String,
    pub day: String,
    pub rows_before: usize,
    pub rows_after: usize,

    // time
    pub top_month: Option<String>,
    pub top_day: Option<String>,
    pub top_hour: Option<u32>,

    // stations
    pub top_start_station: Option<String>,
    pub top_end_station: Option<String>,
    pub top_route_from: Option<String>,
    pub top_route_to: Option<String>,
    pub top_route_count: Option<usize>,

    // duration
    pub total_duration_seconds: Option<f64>,
    pub mean_duration_seconds: Option<f64>,

    // users
    pub user_type_count: Option<usize>,
    pub earliest_birth_year: Option<i32>,
    pub most_recent_birth_year: Option<i32>,
    pub common_birth_year: Option<i64>,
}

impl RunSummary {
    /// Summary of a run that produced reports.
    pub fn from_report(report: &AnalysisReport, rows_before: usize) -> Self {
        let birth_years = report.user.birth_years.as_ref();

        RunSummary {
            timestamp: Utc::now(),
            city: report.city.clone(),
            month: report.month.clone(),
            day: report.day.clone(),
            rows_before,
            rows_after: report.rows,
            top_month: Some(report.time.month.value.to_string()),
            top_day: Some(report.time.day.value.to_string()),
            top_hour: Some(report.time.hour_range.start),
            top_start_station: Some(report.station.start_station.value.to_string()),
            top_end_station: Some(report.station.end_station.value.to_string()),
            top_route_from: Some(report.station.route.from.clone()),
            top_route_to: Some(report.station.route.to.clone()),
            top_route_count: Some(report.station.route.count),
            total_duration_seconds: report.duration.map(|d| d.total_seconds),
            mean_duration_seconds: report.duration.map(|d| d.mean_seconds),
            user_type_count: report.user.user_types.as_ref().map(Vec::len),
            earliest_birth_year: birth_years.map(|b| b.earliest),
            most_recent_birth_year: birth_years.map(|b| b.most_recent),
            common_birth_year: modal_birth_year(&report.user),
        }
    }

    /// Summary of a run whose filters matched no rows.
    pub fn no_data(spec: &FilterSpec, rows_before: usize) -> Self {
        RunSummary {
            timestamp: Utc::now(),
            city: spec.city.to_string(),
            month: spec.month.to_string(),
            day: spec.day.to_string(),
            rows_before,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Schema;
    use crate::dataset::tests::{dataset, raw_trip};
    use crate::reports::analysis::analyze;

    #[test]
    fn test_no_data_summary() {
        let spec = FilterSpec::parse("chicago", "june", "all").unwrap();
        let summary = RunSummary::no_data(&spec, 12);
        assert_eq!(summary.city, "chicago");
        assert_eq!(summary.month, "June");
        assert_eq!(summary.rows_before, 12);
        assert_eq!(summary.rows_after, 0);
        assert!(summary.top_month.is_none());
    }

    #[test]
    fn test_from_report() {
        let mut ds = dataset(
            Schema::default(),
            vec![
                raw_trip("2017-01-02 09:00:00", "2017-01-02 09:10:00", "A", "B"),
                raw_trip("2017-01-02 09:30:00", "2017-01-02 09:35:00", "A", "B"),
            ],
        );
        let spec = FilterSpec::parse("washington", "all", "all").unwrap();
        let report = analyze(&spec, &mut ds, 2020).unwrap().unwrap();
        let summary = RunSummary::from_report(&report, 5);

        assert_eq!(summary.rows_before, 5);
        assert_eq!(summary.rows_after, 2);
        assert_eq!(summary.top_month.as_deref(), Some("January"));
        assert_eq!(summary.top_hour, Some(9));
        assert_eq!(summary.top_route_count, Some(2));
        assert_eq!(summary.total_duration_seconds, Some(900.0));
        assert_eq!(summary.user_type_count, None);
        assert_eq!(summary.common_birth_year, None);
    }
}
