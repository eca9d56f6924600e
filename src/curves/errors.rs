// reservoir-core/src/curves/errors.rs

use super::parameters::LayeredModelParametersBuilderError;
use super::property::CurveProperty;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CurveError {
    #[error("No calculator handles curve property {0}")]
    NoCalculator(CurveProperty),
    #[error("Curve property {0} at time step {1} depends on itself")]
    CyclicDependency(CurveProperty, usize),
    #[error("No {0} data available for time step {1}")]
    MissingInput(CurveProperty, usize),
    #[error("No default value configured for missing {0} values")]
    MissingDefaultValue(CurveProperty),
    #[error("Invalid input data for {0}: {1}")]
    InvalidInputData(CurveProperty, String),
    #[error("{0} has {1} samples, expected {2}")]
    LengthMismatch(CurveProperty, usize, usize),
    #[error(transparent)]
    ParametersBuilderError(#[from] LayeredModelParametersBuilderError),
}
