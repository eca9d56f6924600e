// reservoir-core/src/visibility/mod.rs

mod engine;
mod errors;
mod filters;
mod grid;
mod results;

pub use engine::{
    CellCorrespondence, CellOverride, GeometryState, GeometryType, VisibilityContext,
    VisibilityEngine, VisibilityKey,
};
pub use errors::VisibilityError;
pub use filters::{CellFilterState, CellRange, CellRangeFilter, FilterMode, PropertyFilter};
pub use grid::{ElementGrid, HexGridPart, HEX_FACE_NODE_COUNT, HEX_NODE_COUNT};
pub use results::{MemoryResults, ResultAddress, ResultPosition, ResultValueProvider};
