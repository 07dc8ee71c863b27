//! Parsing of values typed by the operator.

use std::io;

use chrono::NaiveDate;
use thiserror::Error;

use stockroom_core::DomainError;

/// Why an interactive operation was abandoned.
#[derive(Debug, Error)]
pub enum InputError {
    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error("not a whole number: {0:?}")]
    NotANumber(String),

    #[error("not a date (expected YYYY-MM-DD): {0:?}")]
    NotADate(String),

    #[error("end of input")]
    EndOfInput,

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub fn parse_whole_number(raw: &str) -> Result<i64, InputError> {
    raw.trim()
        .parse()
        .map_err(|_| InputError::NotANumber(raw.to_string()))
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, InputError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| InputError::NotADate(raw.to_string()))
}
