//! Error types for the sandpile solver.

use std::collections::TryReserveError;

use thiserror::Error;

/// Result type for sandpile operations.
pub type Result<T> = std::result::Result<T, SandpileError>;

/// Precondition violations reported to the caller.
///
/// Non-convergence is not an error; see [`crate::automaton::Outcome`].
#[derive(Error, Debug)]
pub enum SandpileError {
    /// Grid too small to have any interior cell.
    #[error("grid dimension {dim} is too small (minimum is {min})")]
    DimensionTooSmall { dim: usize, min: usize },

    /// Grid too large for its cell count to fit in `usize`.
    #[error("grid dimension {dim} is too large")]
    DimensionTooLarge { dim: usize },

    /// Cell buffer could not be allocated.
    #[error("failed to allocate grid cells: {0}")]
    Allocation(#[from] TryReserveError),

    /// Cell buffer length does not match the grid dimension.
    #[error("expected {expected} cells, got {actual}")]
    CellCount { expected: usize, actual: usize },

    /// Cell coordinate outside the grid.
    #[error("cell ({y}, {x}) is outside a {dim}x{dim} grid")]
    OutOfBounds { y: usize, x: usize, dim: usize },

    /// Tile size unusable with this grid.
    #[error("tile {width}x{height} is not compatible with a {dim}x{dim} grid")]
    InvalidTile {
        width: usize,
        height: usize,
        dim: usize,
    },

    /// A strategy was handed a grid of a different size than it was built for.
    #[error("strategy built for a {expected}x{expected} grid, got {actual}x{actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Unknown initial configuration name.
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),

    /// Worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl SandpileError {
    /// Create an out-of-bounds error.
    pub fn out_of_bounds(y: usize, x: usize, dim: usize) -> Self {
        Self::OutOfBounds { y, x, dim }
    }

    /// Create an invalid tile error.
    pub fn invalid_tile(width: usize, height: usize, dim: usize) -> Self {
        Self::InvalidTile { width, height, dim }
    }
}
