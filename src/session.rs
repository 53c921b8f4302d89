//! Interactive exploration loop.
//!
//! A [`Session`] moves through [`State`]s driven by validated user choices:
//! filters are selected, the reports are printed, samples are shown on
//! request, and the user decides whether to start over. Each restart reloads
//! the city's data from the source.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use rand::Rng;
use tracing::{error, info};

use crate::dataset::TripDataset;
use crate::filter::{CITY_OPTIONS, City, DAY_OPTIONS, DayFilter, FilterSpec, MONTH_OPTIONS, MonthFilter, filter};
use crate::output::{append_record, render_report, render_rows};
use crate::reports::analysis::analyze;
use crate::sample::{SAMPLE_OPTIONS, SampleOutcome, SampleRequest, sample};
use crate::source::TripSource;
use crate::summary::RunSummary;

const YES_NO: [&str; 2] = ["yes", "no"];

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// CSV file receiving one summary row per run.
    pub export: Option<PathBuf>,
    /// Reference year for user ages.
    pub current_year: i32,
}

#[derive(Debug)]
pub enum State {
    SelectingFilters,
    Reporting(FilterSpec),
    Sampling(TripDataset),
    Done,
}

pub struct Session<'a, S, R, W, G> {
    source: &'a S,
    input: R,
    output: W,
    rng: G,
    options: SessionOptions,
}

/// Parses a yes/no answer.
fn yes(answer: &str) -> crate::error::Result<bool> {
    match answer {
        "yes" => Ok(true),
        "no" => Ok(false),
        other => Err(crate::error::BikeshareError::InvalidOption {
            kind: "answer",
            value: other.to_string(),
        }),
    }
}

impl<'a, S, R, W, G> Session<'a, S, R, W, G>
where
    S: TripSource,
    R: BufRead,
    W: Write,
    G: Rng,
{
    pub fn new(source: &'a S, input: R, output: W, rng: G, options: SessionOptions) -> Self {
        Session {
            source,
            input,
            output,
            rng,
            options,
        }
    }

    /// Runs until the user declines to restart or input ends.
    pub fn run(mut self) -> Result<()> {
        writeln!(self.output, "Hello! Let's explore some US bikeshare data!")?;

        let mut state = State::SelectingFilters;
        loop {
            state = match state {
                State::SelectingFilters => self.select_filters()?,
                State::Reporting(spec) => self.report(spec)?,
                State::Sampling(dataset) => self.sampling(dataset)?,
                State::Done => break,
            };
        }

        info!("Session finished");
        Ok(())
    }

    /// Prompts until a valid choice is entered; `None` once input is exhausted.
    fn ask<T, F>(&mut self, prompt: &str, options: &[&str], parse: F) -> Result<Option<T>>
    where
        F: Fn(&str) -> crate::error::Result<T>,
    {
        writeln!(self.output, "{prompt} {options:?}")?;
        loop {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            let choice = line.trim().to_lowercase();
            match parse(&choice) {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(
                    self.output,
                    "Option {choice:?} is not available. Available options are {options:?} - try again!"
                )?,
            }
        }
    }

    fn select_filters(&mut self) -> Result<State> {
        let Some(city) = self.ask(
            "Specify the name of the city, one of",
            &CITY_OPTIONS,
            City::from_str,
        )?
        else {
            return Ok(State::Done);
        };
        let Some(month) = self.ask(
            "Specify the month, or \"all\" to consider all of them, one of",
            &MONTH_OPTIONS,
            MonthFilter::from_str,
        )?
        else {
            return Ok(State::Done);
        };
        let Some(day) = self.ask(
            "Specify the day of week, or \"all\" to consider all of them, one of",
            &DAY_OPTIONS,
            DayFilter::from_str,
        )?
        else {
            return Ok(State::Done);
        };

        let spec = FilterSpec::new(city, month, day);
        writeln!(self.output, "{}", "-".repeat(40))?;
        writeln!(
            self.output,
            "The following filter is being applied:\n -city: {}\n -month: {}\n -day: {}",
            spec.city, spec.month, spec.day
        )?;
        Ok(State::Reporting(spec))
    }

    fn export(&self, summary: &RunSummary) {
        if let Some(path) = &self.options.export {
            if let Err(e) = append_record(path, summary) {
                error!(path = %path.display(), error = %e, "Failed to export run summary");
            }
        }
    }

    fn report(&mut self, spec: FilterSpec) -> Result<State> {
        let dataset = self
            .source
            .load(spec.city)
            .with_context(|| format!("failed to load trip data for {}", spec.city))?;
        let rows_before = dataset.len();
        let mut filtered = filter(&dataset, &spec);
        drop(dataset);

        writeln!(self.output, "{rows_before} rows BEFORE filter application")?;
        writeln!(self.output, "{} rows AFTER filter application", filtered.len())?;

        let Some(report) = analyze(&spec, &mut filtered, self.options.current_year)? else {
            writeln!(
                self.output,
                "No data left after filter application, please try again changing your filter"
            )?;
            self.export(&RunSummary::no_data(&spec, rows_before));
            return Ok(State::SelectingFilters);
        };

        write!(self.output, "{}", render_report(&report))?;
        self.export(&RunSummary::from_report(&report, rows_before));

        match self.ask(
            "Would you like to see a sample of the trips? Enter",
            &YES_NO,
            yes,
        )? {
            Some(true) => Ok(State::Sampling(filtered)),
            Some(false) => self.restart(),
            None => Ok(State::Done),
        }
    }

    fn sampling(&mut self, dataset: TripDataset) -> Result<State> {
        loop {
            let Some(request) = self.ask(
                "How many rows do you want to see? Use \"random\" for a random sample or \"quit\" if you have seen enough, e.g.",
                &SAMPLE_OPTIONS,
                SampleRequest::from_str,
            )?
            else {
                return Ok(State::Done);
            };

            match sample(&dataset, request, &mut self.rng) {
                SampleOutcome::Rows(rows) => write!(self.output, "{}", render_rows(&rows))?,
                SampleOutcome::Message(message) => writeln!(self.output, "{message}")?,
                SampleOutcome::Quit => return self.restart(),
            }
        }
    }

    fn restart(&mut self) -> Result<State> {
        match self.ask("Would you like to restart? Enter", &YES_NO, yes)? {
            Some(true) => Ok(State::SelectingFilters),
            _ => Ok(State::Done),
        }
    }
}
