//! Generation settings.
//!
//! `GenerationConfig` is plain serde data so hosts can keep it in job files;
//! every field has a default, so a partial JSON object is enough.

use crate::adjacency::AdjacencyMode;
use crate::collapse::EntropyHeuristic;
use crate::error::GenerationError;
use crate::pattern::Symmetry;
use crate::{MAX_PATTERN_SIZE, MIN_PATTERN_SIZE};
use serde::{Deserialize, Serialize};

/// What to do when propagation has to relax a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContradictionPolicy {
    /// Treat it as a contradiction and restart from a fresh wave.
    #[default]
    Restart,
    /// Keep going with the relaxed cell; adjacency may be violated there.
    Relax,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Side length N of extracted patterns.
    pub pattern_size: usize,
    /// Wave width; the output grid is `width + pattern_size - 1` wide.
    pub width: usize,
    /// Wave height; the output grid is `height + pattern_size - 1` tall.
    pub height: usize,
    /// Floor id for base-layer holes. 0 picks the library's dominant floor.
    pub fallback_tile_id: u32,
    /// Toroidal adjacency: the output tiles seamlessly with period
    /// `width` × `height`. With `pattern_size > 2` this forces
    /// `AdjacencyMode::Overlap`.
    pub wrap: bool,
    pub symmetry: Symmetry,
    /// Ignored in favour of `Overlap` when wrapping patterns larger than 2.
    pub adjacency: AdjacencyMode,
    pub entropy: EntropyHeuristic,
    pub contradiction: ContradictionPolicy,
    /// Attempts allowed per wave cell before falling back.
    pub retry_factor: usize,
    /// Overrides `retry_factor × width × height` when set.
    pub max_retries: Option<usize>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            pattern_size: 3,
            width: 16,
            height: 16,
            fallback_tile_id: 0,
            wrap: false,
            symmetry: Symmetry::Identity,
            adjacency: AdjacencyMode::Border,
            entropy: EntropyHeuristic::OptionCount,
            contradiction: ContradictionPolicy::Restart,
            retry_factor: 10,
            max_retries: None,
        }
    }
}

impl GenerationConfig {
    pub fn new(pattern_size: usize, width: usize, height: usize) -> Self {
        Self {
            pattern_size,
            width,
            height,
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reject zero-sized outputs, unsupported pattern sizes, and outputs
    /// whose cell count does not fit in a `usize`.
    pub fn validate(&self) -> Result<(), GenerationError> {
        let invalid = GenerationError::InvalidGridBounds {
            width: self.width,
            height: self.height,
            pattern_size: self.pattern_size,
        };
        if self.width == 0
            || self.height == 0
            || !(MIN_PATTERN_SIZE..=MAX_PATTERN_SIZE).contains(&self.pattern_size)
        {
            return Err(invalid);
        }

        let extra = self.pattern_size - 1;
        let output_cells = self
            .width
            .checked_add(extra)
            .zip(self.height.checked_add(extra))
            .and_then(|(w, h)| w.checked_mul(h));
        if output_cells.is_none() {
            return Err(invalid);
        }
        Ok(())
    }

    /// Adjacency mode the rules are built with.
    ///
    /// Border matching only pins one shared edge, so a wrapped output with
    /// `pattern_size > 2` would not repeat across the seam. Those runs use
    /// full overlap agreement instead.
    pub fn effective_adjacency(&self) -> AdjacencyMode {
        if self.wrap && self.pattern_size > 2 {
            AdjacencyMode::Overlap
        } else {
            self.adjacency
        }
    }

    /// Number of collapse attempts before the fallback takes over.
    pub fn max_retries(&self) -> usize {
        self.max_retries.unwrap_or_else(|| {
            self.retry_factor
                .saturating_mul(self.width)
                .saturating_mul(self.height)
        })
    }

    /// Dimensions of the exported grid.
    pub fn output_size(&self) -> (usize, usize) {
        (
            self.width + self.pattern_size - 1,
            self.height + self.pattern_size - 1,
        )
    }
}
