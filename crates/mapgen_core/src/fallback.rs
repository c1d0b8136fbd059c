//! Constraint-free generation used once restarts are exhausted.

use crate::collapse::collapse;
use crate::library::PatternLibrary;
use crate::rng::RandomSource;
use crate::wave::{CellRef, WaveGrid};

/// Fills a wave by weighted random choice, ignoring adjacency entirely.
///
/// Always succeeds in O(width · height) for a non-empty library.
pub struct FallbackGenerator;

impl FallbackGenerator {
    pub fn fill(
        width: usize,
        height: usize,
        library: &PatternLibrary,
        rng: &mut dyn RandomSource,
    ) -> WaveGrid {
        let mut wave = WaveGrid::new(width, height, library.len());
        for y in 0..height {
            for x in 0..width {
                // Fresh cells hold every pattern, so collapse cannot fail
                // for a non-empty library
                collapse(wave.cell_mut(CellRef::new(x, y)), library, rng);
            }
        }
        wave
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::PatternId;
    use crate::rng::StdRandom;
    use crate::tile::Grid;

    #[test]
    fn test_fallback_collapses_everything() {
        let sample = Grid::from_base_ids(3, 1, &[1, 2, 3]).unwrap();
        let library = PatternLibrary::extract(&[sample], 1).unwrap();
        let mut rng = StdRandom::from_seed(11);
        let wave = FallbackGenerator::fill(5, 4, &library, &mut rng);
        assert!(wave.is_collapsed());
        assert_eq!(wave.assignment().unwrap().len(), 20);
    }

    #[test]
    fn test_fallback_is_weighted() {
        // Pattern 0 weight 9, pattern 1 weight 1
        let mut ids = vec![1; 9];
        ids.push(2);
        let sample = Grid::from_base_ids(10, 1, &ids).unwrap();
        let library = PatternLibrary::extract(&[sample], 1).unwrap();
        let mut rng = StdRandom::from_seed(3);
        let wave = FallbackGenerator::fill(100, 100, &library, &mut rng);
        let heavy = wave
            .assignment()
            .unwrap()
            .iter()
            .filter(|&&id| id == PatternId(0))
            .count();
        let ratio = heavy as f64 / 10_000.0;
        assert!((ratio - 0.9).abs() < 0.02, "ratio {}", ratio);
    }
}
