//! Layered tiles and flat grids.
//!
//! A `Tile` is the raw content of one map cell: `LAYER_COUNT` integer layers,
//! layer 0 being the base/floor layer. A value of 0 in any layer is the empty
//! sentinel. `Grid` is a row-major rectangle of tiles and is the only type that
//! crosses the boundary to a host's map storage.

use crate::error::GenerationError;
use serde::{Deserialize, Serialize};

/// Number of layers carried by every tile.
pub const LAYER_COUNT: usize = 4;

/// Index of the base/floor layer.
pub const BASE_LAYER: usize = 0;

/// Layer value meaning "nothing here".
pub const EMPTY: u32 = 0;

/// One grid cell's raw content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tile(pub [u32; LAYER_COUNT]);

impl Tile {
    /// The all-empty tile.
    pub const EMPTY: Tile = Tile([EMPTY; LAYER_COUNT]);

    /// A tile with only the base layer set.
    pub fn floor(id: u32) -> Self {
        let mut layers = [EMPTY; LAYER_COUNT];
        layers[BASE_LAYER] = id;
        Tile(layers)
    }

    #[inline]
    pub fn layer(&self, layer: usize) -> u32 {
        self.0[layer]
    }

    #[inline]
    pub fn base(&self) -> u32 {
        self.0[BASE_LAYER]
    }

    /// True when every layer holds the empty sentinel.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&v| v == EMPTY)
    }
}

impl From<[u32; LAYER_COUNT]> for Tile {
    fn from(layers: [u32; LAYER_COUNT]) -> Self {
        Tile(layers)
    }
}

/// A row-major rectangle of tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Tile>,
}

impl Grid {
    /// Build a grid, checking that the cell count matches the dimensions.
    pub fn new(width: usize, height: usize, cells: Vec<Tile>) -> Result<Self, GenerationError> {
        let grid = Self {
            width,
            height,
            cells,
        };
        grid.validate(0)?;
        Ok(grid)
    }

    /// A grid with every cell set to `tile`.
    pub fn filled(width: usize, height: usize, tile: Tile) -> Self {
        Self {
            width,
            height,
            cells: vec![tile; width * height],
        }
    }

    /// Build a single-layer grid from base-layer ids.
    ///
    /// Handy for tests and for hosts whose maps only carry a floor layer.
    pub fn from_base_ids(
        width: usize,
        height: usize,
        ids: &[u32],
    ) -> Result<Self, GenerationError> {
        Self::new(width, height, ids.iter().map(|&id| Tile::floor(id)).collect())
    }

    /// Check the cell count. `index` identifies the grid in error reports.
    ///
    /// Dimensions whose product overflows report `usize::MAX` as expected;
    /// no vector can be that long.
    pub(crate) fn validate(&self, index: usize) -> Result<(), GenerationError> {
        let expected = self.width.saturating_mul(self.height);
        if self.cells.len() != expected {
            return Err(GenerationError::MalformedSample {
                index,
                expected,
                actual: self.cells.len(),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&Tile> {
        if x < self.width && y < self.height {
            self.cells.get(self.index(x, y))
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut Tile> {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.cells.get_mut(i)
        } else {
            None
        }
    }

    /// Set a tile. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, tile: Tile) {
        if let Some(cell) = self.get_mut(x, y) {
            *cell = tile;
        }
    }

    /// Base-layer ids in row-major order.
    pub fn base_layer_ids(&self) -> Vec<u32> {
        self.cells.iter().map(Tile::base).collect()
    }

    /// Number of cells whose base layer is empty.
    pub fn count_base_gaps(&self) -> usize {
        self.cells.iter().filter(|t| t.base() == EMPTY).count()
    }
}
