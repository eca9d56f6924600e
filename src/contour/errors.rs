// reservoir-core/src/contour/errors.rs

use super::projection::ContourMapSettingsBuilderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContourMapError {
    #[error("Uninitialized field on ContourMapProjectionBuilder: {0}")]
    UninitializedFieldError(String),
    #[error("Cannot project a grid without cells")]
    EmptyGrid,
    #[error("Sample spacing must be a positive finite number, got {0}")]
    InvalidSampleSpacing(f64),
    #[error("{0} has {1} values but the grid has {2} cells")]
    LengthMismatch(String, usize, usize),
    #[error("Column aggregation {0:?} needs porosity, net-to-gross, dz and saturation values")]
    MissingColumnInputs(super::aggregation::ResultAggregation),
    #[error(transparent)]
    SettingsBuilderError(#[from] ContourMapSettingsBuilderError),
    #[error("Unreachable: Could not compute the range of the aggregated values")]
    MinMaxError(#[from] ndarray_stats::errors::MinMaxError),
}
