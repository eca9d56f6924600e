// reservoir-core/src/contour/mod.rs

mod aggregation;
mod errors;
mod geometry;
mod projection;

pub use aggregation::{
    aggregate, ResultAggregation, WeightedGeometricMeanCalculator,
    WeightedHarmonicMeanCalculator, WeightedMeanCalculator,
};
pub use errors::ContourMapError;
pub use geometry::{
    hex_volume, overlap_volume, vertical_ray_length, BoundingBox, CellSearchIndex, HexCorners,
    HexGeometry, Vec3,
};
pub use projection::{
    CellWeights, ColumnInputs, ContourMapProjection, ContourMapProjectionBuilder,
    ContourMapSettings, ContourMapSettingsBuilder, ContourMapSettingsBuilderError,
};
