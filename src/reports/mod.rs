//! The four statistic reports.
//!
//! Each report reads a filtered [`crate::dataset::TripDataset`] and returns
//! plain values built on [`crate::frequency::most_frequent`]. Callers must
//! not hand them an empty dataset; [`analysis::analyze`] checks this once
//! for the whole run.

pub mod analysis;
pub mod station;
pub mod time;
pub mod trip_duration;
pub mod types;
pub mod user;
