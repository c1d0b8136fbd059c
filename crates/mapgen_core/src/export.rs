//! Stitching collapsed patterns into the flat output grid.
//!
//! Wave cell (x, y) owns the N×N block of output tiles whose top-left corner
//! is (x, y), so neighbouring blocks overlap by N-1 tiles and the output is
//! `(width + N - 1) × (height + N - 1)`.

use crate::error::GenerationError;
use crate::library::PatternLibrary;
use crate::tile::{Grid, Tile, BASE_LAYER, EMPTY, LAYER_COUNT};
use crate::wave::WaveGrid;

pub struct Exporter;

impl Exporter {
    /// Output size for a wave of `width × height` with `pattern_size` patterns.
    pub fn output_size(width: usize, height: usize, pattern_size: usize) -> (usize, usize) {
        (width + pattern_size - 1, height + pattern_size - 1)
    }

    /// Stamp every collapsed cell's pattern and fill base-layer holes.
    ///
    /// Uncollapsed cells stamp nothing; their area is covered by the floor
    /// pass. `fallback_tile_id` of 0 means "pick the library's dominant
    /// floor tile".
    pub fn export(
        wave: &WaveGrid,
        library: &PatternLibrary,
        fallback_tile_id: u32,
    ) -> Result<Grid, GenerationError> {
        if library.is_empty() {
            return Err(GenerationError::Internal(
                "cannot export with an empty pattern library".to_string(),
            ));
        }

        let n = library.pattern_size();
        let (width, height) = Self::output_size(wave.width(), wave.height(), n);
        let mut output = Grid::filled(width, height, Tile::EMPTY);

        for (at, cell) in wave.iter() {
            let Some(id) = cell.pattern() else {
                continue;
            };
            let pattern = library.pattern(id);
            for dy in 0..n {
                for dx in 0..n {
                    let i = output.index(at.x + dx, at.y + dy);
                    stamp(&mut output.cells[i], pattern.get(dx, dy));
                }
            }
        }

        if output.count_base_gaps() > 0 {
            let floor = Self::floor_tile_id(library, fallback_tile_id)?;
            for tile in output.cells.iter_mut() {
                if tile.0[BASE_LAYER] == EMPTY {
                    tile.0[BASE_LAYER] = floor;
                }
            }
        }

        Ok(output)
    }

    /// Default floor id: the configured one if nonzero, else the most frequent
    /// nonzero base id in the library.
    pub fn floor_tile_id(
        library: &PatternLibrary,
        fallback_tile_id: u32,
    ) -> Result<u32, GenerationError> {
        if fallback_tile_id != EMPTY {
            return Ok(fallback_tile_id);
        }
        library
            .dominant_floor_id()
            .ok_or(GenerationError::NoFloorTile)
    }
}

/// Overlay `src` onto `dst`.
///
/// Upper layers only fill empty slots. The base layer takes any nonzero value.
fn stamp(dst: &mut Tile, src: &Tile) {
    for layer in 0..LAYER_COUNT {
        let value = src.0[layer];
        if value == EMPTY {
            continue;
        }
        if layer == BASE_LAYER || dst.0[layer] == EMPTY {
            dst.0[layer] = value;
        }
    }
}
