//! Error types for pattern extraction and generation.

use crate::wave::CellRef;
use thiserror::Error;

/// Errors reported to callers of `generate`.
///
/// Contradictions never appear here: they are recovered by restarting and,
/// ultimately, by the constraint-free fallback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// No non-empty pattern could be extracted from any sample grid.
    #[error("no non-empty patterns could be extracted from the sample grids")]
    EmptySample,

    /// Requested output size or pattern size is unusable.
    #[error(
        "invalid grid bounds: {width}x{height} output with pattern size {pattern_size} \
         (pattern size must be {min}..={max})",
        min = crate::MIN_PATTERN_SIZE,
        max = crate::MAX_PATTERN_SIZE
    )]
    InvalidGridBounds {
        width: usize,
        height: usize,
        pattern_size: usize,
    },

    /// A sample grid's cell count does not match its dimensions.
    #[error("sample grid {index} has {actual} cells, expected {expected}")]
    MalformedSample {
        index: usize,
        expected: usize,
        actual: usize,
    },

    /// No floor tile was configured and no pattern carries a nonzero base layer.
    #[error("no floor tile configured and no pattern has a nonzero base layer")]
    NoFloorTile,

    #[error("internal error: {0}")]
    Internal(String),
}

/// A cell ran out of options. Recovered internally, never surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("contradiction at {cell}")]
pub struct Contradiction {
    pub cell: CellRef,
}

/// Every restart failed; generation continues with the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no consistent solution after {attempts} attempts")]
pub struct MaxRetriesExceeded {
    pub attempts: usize,
}
