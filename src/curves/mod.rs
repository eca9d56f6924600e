// reservoir-core/src/curves/mod.rs

mod calculator;
mod calculators;
mod errors;
mod layers;
mod missing;
mod parameters;
mod property;
mod well_log;

pub use calculator::{CurveKey, CurvePropertyCalculator, CurveResolver, LayeredCurveCalculator};
pub use calculators::{
    apply_missing_value_strategies, ElasticPropertyCalculator, LayerCalculator,
    PressureCalculator, StressCalculator, WellLogCalculator,
};
pub use errors::CurveError;
pub use layers::{
    average_by_layer, calculate_layers, stress_with_gradients, temperatures, top_of_layer_values,
    LayerBoundary, StressInputs, StressProfile, PRESSURE_DIFFERENCE_OFFSET,
};
pub use missing::{
    has_missing_values, interpolate_missing_values, is_missing, replace_missing_values,
    replace_missing_values_with, resample, MissingValueStrategy, MISSING_VALUE,
};
pub use parameters::{
    default_net_to_gross_scaled, ElasticPropertyTable, FaciesElasticProperties,
    LayeredModelParameters, LayeredModelParametersBuilder, LayeredModelParametersBuilderError,
};
pub use property::{CurveData, CurveProperty};
pub use well_log::{MemoryWellLogSource, WellLogSource};
