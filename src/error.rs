//! Error and warning types shared by the analysis pipeline.

use std::fmt;

use crate::dataset::Column;

#[derive(Debug, thiserror::Error)]
pub enum BikeshareError {
    #[error("row {row}: cannot parse {field} from {value:?}")]
    Parse {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("cannot compute the most frequent {0}: no values to count")]
    EmptyInput(Column),

    #[error("column {0} is not present in this dataset")]
    MissingColumn(Column),

    #[error("column {column} produced an unexpected value {value:?}")]
    UnexpectedValue { column: Column, value: String },

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("{kind} {value:?} is not one of the available options")]
    InvalidOption { kind: &'static str, value: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BikeshareError>;

/// A sub-report that was skipped because its column is absent for the city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum MissingColumnWarning {
    TripDuration,
    UserType,
    Gender,
    BirthYear,
}

impl fmt::Display for MissingColumnWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            MissingColumnWarning::TripDuration => {
                "Statistics about trip duration cannot be calculated because Trip Duration data are missing and cannot be inferred from the other columns"
            }
            MissingColumnWarning::UserType => "No information available for the user type",
            MissingColumnWarning::Gender => "No information available for the user's gender",
            MissingColumnWarning::BirthYear => {
                "No information available for the user's age and year of birth"
            }
        };
        write!(f, "WARNING - {message}")
    }
}
