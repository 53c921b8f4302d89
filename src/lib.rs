pub mod dataset;
pub mod duration;
pub mod error;
pub mod filter;
pub mod frequency;
pub mod output;
pub mod reports;
pub mod sample;
pub mod session;
pub mod source;
pub mod summary;
