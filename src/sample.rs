//! Row sampling for display.

use std::str::FromStr;

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::dataset::{TripDataset, TripRecord};
use crate::error::BikeshareError;

/// Choices suggested to the user; any positive count is accepted as well.
pub const SAMPLE_OPTIONS: [&str; 6] = ["random", "10", "30", "42", "50", "quit"];

/// Row count that answers with [`EASTER_EGG`] instead of data.
pub const EASTER_EGG_ROWS: &str = "42";

pub const EASTER_EGG: &str =
    "Sorry but 42 is supposed to be The Answer, not a question, don't panic and try again :)";

/// Upper bound of a random sample size.
pub const MAX_RANDOM_ROWS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleRequest {
    /// The first N rows in dataset order.
    Rows(usize),
    /// Between 1 and [`MAX_RANDOM_ROWS`] rows, drawn without replacement.
    Random,
    EasterEgg,
    Quit,
}

impl FromStr for SampleRequest {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let choice = s.trim().to_lowercase();
        match choice.as_str() {
            "random" => Ok(SampleRequest::Random),
            "quit" => Ok(SampleRequest::Quit),
            EASTER_EGG_ROWS => Ok(SampleRequest::EasterEgg),
            other => match other.parse::<usize>() {
                Ok(n) if n > 0 => Ok(SampleRequest::Rows(n)),
                _ => Err(BikeshareError::InvalidOption {
                    kind: "row count",
                    value: s.to_string(),
                }),
            },
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum SampleOutcome<'a> {
    Rows(Vec<&'a TripRecord>),
    Message(&'static str),
    Quit,
}

/// Picks the rows to show for `request`.
///
/// Asking for more rows than exist returns every row.
pub fn sample<'a, R: Rng>(
    dataset: &'a TripDataset,
    request: SampleRequest,
    rng: &mut R,
) -> SampleOutcome<'a> {
    let records = dataset.records();
    match request {
        SampleRequest::Rows(n) => SampleOutcome::Rows(records.iter().take(n).collect()),
        SampleRequest::Random => {
            let wanted = rng.random_range(1..=MAX_RANDOM_ROWS);
            SampleOutcome::Rows(records.choose_multiple(rng, wanted).collect())
        }
        SampleRequest::EasterEgg => SampleOutcome::Message(EASTER_EGG),
        SampleRequest::Quit => SampleOutcome::Quit,
    }
}
