//! CLI entry point for the bikeshare explorer.
//!
//! Provides an interactive exploration session plus one-shot subcommands for
//! printing the reports of a filter selection or a sample of its rows.

use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bikeshare_explorer::{
    filter::{City, DayFilter, FilterSpec, MonthFilter, filter},
    output::{append_record, render_report, render_rows, to_json},
    reports::analysis::analyze,
    sample::{SampleOutcome, SampleRequest, sample},
    session::{Session, SessionOptions},
    source::{CsvDirectorySource, TripSource},
    summary::RunSummary,
};
use chrono::Datelike;
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare")]
#[command(about = "Explore US bikeshare trip data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DataArgs {
    /// Directory containing chicago.csv, new_york_city.csv and washington.csv
    #[arg(short, long, env = "BIKESHARE_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,

    /// Optional: CSV file to append one summary row per analysis run to
    #[arg(long)]
    export: Option<PathBuf>,
}

#[derive(Args)]
struct FilterArgs {
    /// City to analyze: chicago, "new york city" or washington
    #[arg(short, long)]
    city: City,

    /// Month name, or "all"
    #[arg(short, long, default_value = "all")]
    month: MonthFilter,

    /// Day of week name, or "all"
    #[arg(long, default_value = "all")]
    day: DayFilter,
}

impl FilterArgs {
    fn spec(&self) -> FilterSpec {
        FilterSpec::new(self.city, self.month, self.day)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Interactively pick filters, read the reports and browse sample rows
    Explore {
        #[command(flatten)]
        data: DataArgs,
    },
    /// Print the time, station, duration and user reports for one filter
    Report {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Print the reports as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print sample rows for one filter
    Sample {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Number of rows, or "random" for 1 to 20 random rows
        #[arg(short, long, default_value = "10")]
        rows: SampleRequest,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeshare.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let current_year = chrono::Local::now().year();

    match cli.command {
        Commands::Explore { data } => {
            let source = CsvDirectorySource::new(&data.data_dir);
            info!(data_dir = %source.data_dir().display(), "Starting interactive session");

            let stdin = std::io::stdin();
            let options = SessionOptions {
                export: data.export,
                current_year,
            };
            Session::new(
                &source,
                stdin.lock(),
                std::io::stdout(),
                rand::rng(),
                options,
            )
            .run()?;
        }
        Commands::Report {
            data,
            filters,
            json,
        } => {
            report(&data, &filters.spec(), json, current_year)?;
        }
        Commands::Sample {
            data,
            filters,
            rows,
        } => {
            let spec = filters.spec();
            let dataset = CsvDirectorySource::new(&data.data_dir)
                .load(spec.city)
                .with_context(|| format!("failed to load trip data for {}", spec.city))?;
            let filtered = filter(&dataset, &spec);

            let mut stdout = std::io::stdout().lock();
            match sample(&filtered, rows, &mut rand::rng()) {
                SampleOutcome::Rows(rows) => write!(stdout, "{}", render_rows(&rows))?,
                SampleOutcome::Message(message) => writeln!(stdout, "{message}")?,
                SampleOutcome::Quit => {}
            }
        }
    }

    Ok(())
}

/// Loads, filters, and reports on one city, optionally exporting a summary row.
#[tracing::instrument(skip(data, spec), fields(spec = %spec))]
fn report(data: &DataArgs, spec: &FilterSpec, json: bool, current_year: i32) -> Result<()> {
    let dataset = CsvDirectorySource::new(&data.data_dir)
        .load(spec.city)
        .with_context(|| format!("failed to load trip data for {}", spec.city))?;
    let rows_before = dataset.len();
    let mut filtered = filter(&dataset, spec);

    let mut stdout = std::io::stdout().lock();
    let summary = match analyze(spec, &mut filtered, current_year)? {
        Some(report) => {
            if json {
                writeln!(stdout, "{}", to_json(&report)?)?;
            } else {
                write!(stdout, "{}", render_report(&report))?;
            }
            RunSummary::from_report(&report, rows_before)
        }
        None => {
            writeln!(
                stdout,
                "No data left after filter application, please try again changing your filter"
            )?;
            RunSummary::no_data(spec, rows_before)
        }
    };

    if let Some(path) = &data.export {
        if let Err(e) = append_record(path, &summary) {
            error!(path = %path.display(), error = %e, "Failed to export run summary");
        }
    }

    Ok(())
}
