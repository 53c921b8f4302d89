//! Output formatting and persistence for analysis results.
//!
//! Supports plain-text rendering of each report, JSON serialization, and
//! CSV append of run summaries.

use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::path::Path;

use anyhow::Result;
use csv::WriterBuilder;
use tracing::debug;

use crate::dataset::TripRecord;
use crate::reports::analysis::AnalysisReport;
use crate::reports::types::{CategoryCount, DurationStats, StationStats, TimeStats, UserStats};
use crate::summary::RunSummary;

const RULE_WIDTH: usize = 40;

fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

pub fn render_time(stats: &TimeStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Most Frequent Times of Travel");
    let _ = writeln!(
        out,
        "{} travels have been started in {}",
        stats.month.count, stats.month.value
    );
    let _ = writeln!(
        out,
        "{} travels have been started on {}",
        stats.day.count, stats.day.value
    );
    let _ = writeln!(
        out,
        "{} travels have been started between {}:00 and {}:00",
        stats.hour.count, stats.hour_range.start, stats.hour_range.end
    );
    out
}

pub fn render_station(stats: &StationStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Most Popular Stations and Trip");
    let _ = writeln!(
        out,
        "The most commonly used start station is {}, used {} times",
        stats.start_station.value, stats.start_station.count
    );
    let _ = writeln!(
        out,
        "The most commonly used end station is {}, used {} times",
        stats.end_station.value, stats.end_station.count
    );
    let _ = writeln!(
        out,
        "People have moved from {} to {}, {} times",
        stats.route.from, stats.route.to, stats.route.count
    );
    out
}

/// `None` renders the trip-duration warning.
pub fn render_duration(stats: Option<&DurationStats>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Trip Duration");
    match stats {
        Some(stats) => {
            let _ = writeln!(
                out,
                "The total amount of time spent traveling is {:.0} seconds (c.{} hours)",
                stats.total_seconds,
                stats.total_hours()
            );
            let _ = writeln!(
                out,
                "The mean amount of time spent traveling is {:.1} seconds (c.{} minutes)",
                stats.mean_seconds,
                stats.mean_minutes()
            );
        }
        None => {
            let _ = writeln!(out, "{}", crate::error::MissingColumnWarning::TripDuration);
        }
    }
    out
}

fn render_categories(out: &mut String, categories: &[CategoryCount]) {
    for entry in categories {
        let _ = writeln!(out, " - {}: {}", entry.category, entry.count);
    }
}

pub fn render_user(stats: &UserStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "User Stats");

    if let Some(user_types) = &stats.user_types {
        let _ = writeln!(out, "Users are divided into {} categories:", user_types.len());
        render_categories(&mut out, user_types);
    }

    if let Some(genders) = &stats.genders {
        let _ = writeln!(out, "Users identify as:");
        render_categories(&mut out, genders);
    }

    if let Some(years) = &stats.birth_years {
        let _ = writeln!(
            out,
            "The oldest user is {} and was born in {} (earliest year of birth)",
            years.oldest_age, years.earliest
        );
        let _ = writeln!(
            out,
            "The youngest user is {} and was born in {} (most recent year of birth)",
            years.youngest_age, years.most_recent
        );
        let _ = writeln!(
            out,
            "{} users were born in {}, the most common year of birth",
            years.most_common.count, years.most_common.value
        );
    }

    for warning in &stats.warnings {
        let _ = writeln!(out, "{warning}");
    }
    out
}

/// All four reports separated by horizontal rules.
pub fn render_report(report: &AnalysisReport) -> String {
    [
        render_time(&report.time),
        render_station(&report.station),
        render_duration(report.duration.as_ref()),
        render_user(&report.user),
    ]
    .iter()
    .map(|section| format!("\n{section}{}\n", rule()))
    .collect()
}

fn optional<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(T::to_string).unwrap_or_default()
}

/// Sample rows as a left-aligned table.
pub fn render_rows(rows: &[&TripRecord]) -> String {
    let header = [
        "Start Time",
        "End Time",
        "Trip Duration",
        "Start Station",
        "End Station",
        "User Type",
        "Gender",
        "Birth Year",
    ];
    let cells: Vec<[String; 8]> = rows
        .iter()
        .map(|r| {
            [
                r.start_time.to_string(),
                r.end_time.to_string(),
                optional(&r.trip_duration),
                r.start_station.clone(),
                r.end_station.clone(),
                optional(&r.user_type),
                optional(&r.gender),
                optional(&r.birth_year),
            ]
        })
        .collect();

    let mut widths = header.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let line = |out: &mut String, row: &[&str]| {
        let joined: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        let _ = writeln!(out, "{}", joined.join("  ").trim_end());
    };

    line(&mut out, &header);
    for row in &cells {
        let row: Vec<&str> = row.iter().map(String::as_str).collect();
        line(&mut out, &row);
    }
    out
}

/// Serializes a report as pretty-printed JSON.
pub fn to_json(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Appends a [`RunSummary`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &Path, summary: &RunSummary) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    writer.serialize(summary)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Schema;
    use crate::dataset::tests::{dataset, raw_trip};
    use crate::filter::FilterSpec;
    use crate::reports::analysis::analyze;
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    fn sample_report() -> AnalysisReport {
        let mut ds = dataset(
            Schema::default(),
            vec![
                raw_trip("2017-01-02 23:00:00", "2017-01-02 23:10:00", "A", "B"),
                raw_trip("2017-01-02 23:30:00", "2017-01-02 23:35:00", "A", "C"),
            ],
        );
        let spec = FilterSpec::parse("washington", "all", "all").unwrap();
        analyze(&spec, &mut ds, 2020).unwrap().unwrap()
    }

    #[test]
    fn test_render_report_sections() {
        let text = render_report(&sample_report());
        assert!(text.contains("2 travels have been started in January"));
        assert!(text.contains("between 23:00 and 0:00"));
        assert!(text.contains("People have moved from A to B, 1 times"));
        assert!(text.contains("900 seconds"));
        assert!(text.contains("WARNING - No information available for the user's gender"));
        assert_eq!(text.matches(&rule()).count(), 4);
    }

    #[test]
    fn test_render_missing_duration() {
        let text = render_duration(None);
        assert!(text.contains("WARNING - Statistics about trip duration"));
    }

    #[test]
    fn test_render_rows_aligns_columns() {
        let ds = dataset(
            Schema::default(),
            vec![
                raw_trip("2017-01-02 23:00:00", "2017-01-02 23:10:00", "Short", "B"),
                raw_trip("2017-01-02 23:30:00", "2017-01-02 23:35:00", "A much longer name", "C"),
            ],
        );
        let rows: Vec<&TripRecord> = ds.records().iter().collect();
        let text = render_rows(&rows);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Start Time"));
        let col = lines[0].find("End Station").unwrap();
        assert_eq!(lines[1].find('B'), Some(col));
        assert_eq!(lines[2].find('C'), Some(col));
    }

    #[test]
    fn test_to_json() {
        let json = to_json(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["rows"], 2);
        assert_eq!(value["time"]["month"]["value"], "January");
        assert_eq!(value["station"]["route"]["to"], "B");
        assert!(value["user"]["genders"].is_null());
    }

    #[test]
    fn test_append_record_writes_header_once() {
        let path = temp_path("bikeshare_explorer_test_header.csv");
        let _ = fs::remove_file(&path);

        let summary = RunSummary::from_report(&sample_report(), 2);
        append_record(&path, &summary).unwrap();
        append_record(&path, &summary).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content.lines().filter(|l| l.starts_with("timestamp")).count();
        assert_eq!(header_count, 1);
        assert_eq!(content.lines().count(), 3);

        fs::remove_file(&path).unwrap();
    }
}
