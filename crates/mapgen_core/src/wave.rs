//! Working state of the output while it is being collapsed.
//!
//! The `WaveGrid` holds one `Cell` per wave position. A cell starts in full
//! superposition (every pattern possible), loses options as constraints
//! propagate, and ends collapsed to exactly one pattern.

use crate::adjacency::Direction;
use crate::pattern::PatternId;
use std::fmt;

/// Coordinates of a wave cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub x: usize,
    pub y: usize,
}

impl CellRef {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Generation-time state of one position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Set once a pattern has been committed.
    pub collapsed: bool,
    /// Still-possible patterns, sorted ascending.
    pub options: Vec<PatternId>,
}

impl Cell {
    /// A cell with every pattern of a `pattern_count`-sized library open.
    pub fn open(pattern_count: usize) -> Self {
        Self {
            collapsed: false,
            options: (0..pattern_count).map(PatternId::from_index).collect(),
        }
    }

    /// Entropy in the option-count sense.
    #[inline]
    pub fn entropy(&self) -> usize {
        self.options.len()
    }

    #[inline]
    pub fn is_contradiction(&self) -> bool {
        self.options.is_empty()
    }

    /// The committed pattern, if collapsed.
    pub fn pattern(&self) -> Option<PatternId> {
        if self.collapsed && self.options.len() == 1 {
            Some(self.options[0])
        } else {
            None
        }
    }

    /// Commit to `id`.
    pub fn collapse_to(&mut self, id: PatternId) {
        self.options.clear();
        self.options.push(id);
        self.collapsed = true;
    }
}

/// Width × height grid of cells.
#[derive(Debug, Clone)]
pub struct WaveGrid {
    width: usize,
    height: usize,
    pattern_count: usize,
    wrap: bool,
    cells: Vec<Cell>,
}

impl WaveGrid {
    /// A fully open grid.
    pub fn new(width: usize, height: usize, pattern_count: usize) -> Self {
        Self {
            width,
            height,
            pattern_count,
            wrap: false,
            cells: vec![Cell::open(pattern_count); width * height],
        }
    }

    /// Treat the grid as a torus when looking up neighbours.
    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Reopen every cell for a fresh attempt.
    pub fn reset(&mut self) {
        let open = Cell::open(self.pattern_count);
        for cell in &mut self.cells {
            cell.clone_from(&open);
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    #[inline]
    pub fn wraps(&self) -> bool {
        self.wrap
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    fn index(&self, at: CellRef) -> usize {
        at.x + at.y * self.width
    }

    #[inline]
    pub fn cell(&self, at: CellRef) -> &Cell {
        &self.cells[self.index(at)]
    }

    #[inline]
    pub fn cell_mut(&mut self, at: CellRef) -> &mut Cell {
        let i = self.index(at);
        &mut self.cells[i]
    }

    /// Cells with their coordinates, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (CellRef, &Cell)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (CellRef::new(i % width, i / width), c))
    }

    /// Neighbour of `at` in `dir`, wrapping around the edges when enabled.
    pub fn neighbor(&self, at: CellRef, dir: Direction) -> Option<CellRef> {
        let (dx, dy) = dir.offset();
        let x = at.x as i64 + dx as i64;
        let y = at.y as i64 + dy as i64;
        let (w, h) = (self.width as i64, self.height as i64);

        if self.wrap {
            Some(CellRef::new(x.rem_euclid(w) as usize, y.rem_euclid(h) as usize))
        } else if x < 0 || y < 0 || x >= w || y >= h {
            None
        } else {
            Some(CellRef::new(x as usize, y as usize))
        }
    }

    /// True when any cell has run out of options.
    pub fn is_contradiction(&self) -> bool {
        self.cells.iter().any(Cell::is_contradiction)
    }

    /// True when every cell has been committed.
    pub fn is_collapsed(&self) -> bool {
        self.cells.iter().all(|c| c.collapsed)
    }

    /// Committed pattern per cell, row-major. `None` until fully collapsed.
    pub fn assignment(&self) -> Option<Vec<PatternId>> {
        self.cells.iter().map(Cell::pattern).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wave_new_is_open() {
        let wave = WaveGrid::new(3, 2, 4);
        assert_eq!(wave.len(), 6);
        for (_, cell) in wave.iter() {
            assert!(!cell.collapsed);
            assert_eq!(cell.entropy(), 4);
        }
        assert!(!wave.is_collapsed());
        assert!(!wave.is_contradiction());
        assert_eq!(wave.assignment(), None);
    }

    #[test]
    fn test_wave_iter_coordinates() {
        let wave = WaveGrid::new(3, 2, 1);
        let refs: Vec<CellRef> = wave.iter().map(|(at, _)| at).collect();
        assert_eq!(refs[4], CellRef::new(1, 1));
    }

    #[test]
    fn test_cell_collapse() {
        let mut cell = Cell::open(3);
        assert_eq!(cell.pattern(), None);
        cell.collapse_to(PatternId(2));
        assert!(cell.collapsed);
        assert_eq!(cell.pattern(), Some(PatternId(2)));
        assert_eq!(cell.entropy(), 1);
    }

    #[test]
    fn test_wave_is_contradiction() {
        let mut wave = WaveGrid::new(2, 2, 2);
        wave.cell_mut(CellRef::new(1, 0)).options.clear();
        assert!(wave.is_contradiction());
    }

    #[test]
    fn test_wave_reset() {
        let mut wave = WaveGrid::new(2, 2, 3);
        wave.cell_mut(CellRef::new(0, 0)).collapse_to(PatternId(1));
        wave.cell_mut(CellRef::new(1, 1)).options.clear();
        wave.reset();
        for (_, cell) in wave.iter() {
            assert_eq!(cell, &Cell::open(3));
        }
    }

    #[test]
    fn test_wave_assignment_when_collapsed() {
        let mut wave = WaveGrid::new(2, 1, 2);
        wave.cell_mut(CellRef::new(0, 0)).collapse_to(PatternId(1));
        assert_eq!(wave.assignment(), None);
        wave.cell_mut(CellRef::new(1, 0)).collapse_to(PatternId(0));
        assert!(wave.is_collapsed());
        assert_eq!(wave.assignment(), Some(vec![PatternId(1), PatternId(0)]));
    }

    #[test]
    fn test_neighbors_bounded() {
        let wave = WaveGrid::new(3, 3, 1);
        let corner = CellRef::new(0, 0);
        assert_eq!(wave.neighbor(corner, Direction::Left), None);
        assert_eq!(wave.neighbor(corner, Direction::Top), None);
        assert_eq!(
            wave.neighbor(corner, Direction::Right),
            Some(CellRef::new(1, 0))
        );
        assert_eq!(
            wave.neighbor(corner, Direction::Bottom),
            Some(CellRef::new(0, 1))
        );
    }

    #[test]
    fn test_neighbors_wrap() {
        let wave = WaveGrid::new(3, 2, 1).with_wrap(true);
        let corner = CellRef::new(0, 0);
        assert_eq!(
            wave.neighbor(corner, Direction::Left),
            Some(CellRef::new(2, 0))
        );
        assert_eq!(
            wave.neighbor(corner, Direction::Top),
            Some(CellRef::new(0, 1))
        );
    }
}
