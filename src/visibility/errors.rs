// reservoir-core/src/visibility/errors.rs

use super::engine::VisibilityKey;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisibilityError {
    #[error("Visibility for {0:?} is already being regenerated")]
    RegenerationInProgress(VisibilityKey),
    #[error("Property filtered visibility needs a frame index >= 0, got {0}")]
    MissingFrameIndex(i32),
    #[error("Overridden cell visibility requested without a cell override")]
    MissingCellOverride,
    #[error("Cell correspondence covers {1} elements but the grid parts have {0}")]
    OverrideMappingMismatch(usize, usize),
    #[error("Part index {0} out of range, grid has {1} parts")]
    PartIndexOutOfRange(usize, usize),
}
