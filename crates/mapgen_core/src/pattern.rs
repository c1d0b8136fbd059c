//! N×N tile patterns and their square symmetries.

use crate::tile::{Grid, Tile};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a pattern inside its owning `PatternLibrary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternId(pub u32);

impl PatternId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) fn from_index(i: usize) -> Self {
        PatternId(i as u32)
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An immutable N×N block of tiles, row-major.
///
/// Equality and hashing are structural, so a `HashMap<Pattern, _>` dedups
/// patterns by content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    size: usize,
    tiles: Box<[Tile]>,
}

impl Pattern {
    /// Build a pattern from `size * size` tiles.
    ///
    /// Returns `None` when the tile count doesn't match.
    pub fn new(size: usize, tiles: Vec<Tile>) -> Option<Self> {
        if size == 0 || tiles.len() != size * size {
            return None;
        }
        Some(Self {
            size,
            tiles: tiles.into_boxed_slice(),
        })
    }

    /// Copy the window with top-left corner (x, y) out of `grid`.
    ///
    /// The caller guarantees the window fits.
    pub(crate) fn window(grid: &Grid, x: usize, y: usize, size: usize) -> Self {
        let mut tiles = Vec::with_capacity(size * size);
        for dy in 0..size {
            let row = grid.index(x, y + dy);
            tiles.extend_from_slice(&grid.cells[row..row + size]);
        }
        Self {
            size,
            tiles: tiles.into_boxed_slice(),
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &Tile {
        &self.tiles[x + y * self.size]
    }

    /// True when every tile of the pattern is empty.
    pub fn is_empty(&self) -> bool {
        self.tiles.iter().all(Tile::is_empty)
    }

    pub fn row(&self, y: usize) -> impl Iterator<Item = &Tile> + '_ {
        self.tiles[y * self.size..(y + 1) * self.size].iter()
    }

    pub fn column(&self, x: usize) -> impl Iterator<Item = &Tile> + '_ {
        (0..self.size).map(move |y| self.get(x, y))
    }

    /// Rotate 90 degrees.
    pub fn rotated(&self) -> Self {
        let n = self.size;
        let mut tiles = Vec::with_capacity(n * n);
        for y in 0..n {
            for x in 0..n {
                tiles.push(*self.get(n - 1 - y, x));
            }
        }
        Self {
            size: n,
            tiles: tiles.into_boxed_slice(),
        }
    }

    /// Mirror horizontally.
    pub fn reflected(&self) -> Self {
        let n = self.size;
        let mut tiles = Vec::with_capacity(n * n);
        for y in 0..n {
            for x in 0..n {
                tiles.push(*self.get(n - 1 - x, y));
            }
        }
        Self {
            size: n,
            tiles: tiles.into_boxed_slice(),
        }
    }

    /// All 8 square symmetries in group order: e, b, a, ba, a², ba², a³, ba³
    /// (a = rotation, b = reflection).
    pub fn square_symmetries(&self) -> [Pattern; 8] {
        let e = self.clone();
        let b = e.reflected();
        let a = e.rotated();
        let ba = a.reflected();
        let a2 = a.rotated();
        let ba2 = a2.reflected();
        let a3 = a2.rotated();
        let ba3 = a3.reflected();
        [e, b, a, ba, a2, ba2, a3, ba3]
    }
}

/// Which square symmetries of each sample window are added to the library.
///
/// Index order of the mask follows `Pattern::square_symmetries`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symmetry {
    /// Windows exactly as they appear in the samples.
    #[default]
    Identity,
    /// Identity + horizontal mirror
    ReflectX,
    /// Identity + vertical mirror
    ReflectY,
    /// Both mirrors and the 180° rotation
    ReflectXY,
    /// The four rotations, no mirrors
    Rotate,
    All,
}

impl Symmetry {
    pub fn mask(self) -> [bool; 8] {
        match self {
            Symmetry::Identity => [true, false, false, false, false, false, false, false],
            Symmetry::ReflectX => [true, true, false, false, false, false, false, false],
            Symmetry::ReflectY => [true, false, false, false, false, true, false, false],
            Symmetry::ReflectXY => [true, true, false, false, true, true, false, false],
            Symmetry::Rotate => [true, false, true, false, true, false, true, false],
            Symmetry::All => [true; 8],
        }
    }

    /// The variants of `pattern` selected by this symmetry, identity first.
    pub fn variants(self, pattern: &Pattern) -> Vec<Pattern> {
        if self == Symmetry::Identity {
            return vec![pattern.clone()];
        }
        let mask = self.mask();
        pattern
            .square_symmetries()
            .into_iter()
            .zip(mask)
            .filter_map(|(p, keep)| keep.then_some(p))
            .collect()
    }
}
