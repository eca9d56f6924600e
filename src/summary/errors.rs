// reservoir-core/src/summary/errors.rs

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("File IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("First column must be TIME, found {0:?}")]
    MissingTimeColumn(String),
    #[error("No vector columns found after the TIME column")]
    NoVectorColumns,
    #[error("Invalid time value {1:?} on row {0}")]
    InvalidTime(usize, String),
    #[error("Time steps are not increasing at row {0}")]
    NonMonotonicTime(usize),
    #[error("Invalid value {2:?} on row {0}, column {1}")]
    InvalidValue(usize, usize, String),
    #[error("Vector {0} has {1} values but the reader has {2} time steps")]
    LengthMismatch(String, usize, usize),
    #[error("No registered format could open {0}")]
    NoMatchingFormat(PathBuf),
}

#[derive(Error, Debug)]
pub enum AggregatorBuilderError {
    #[error("Unitialized field on TimeSeriesAggregatorBuilder: {0}")]
    UninitializedFieldError(String),
}
