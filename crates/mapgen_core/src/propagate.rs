//! Worklist constraint propagation.
//!
//! After a cell's options shrink, each neighbour keeps only the patterns that
//! at least one of the cell's remaining options allows in that direction.
//! Neighbours that shrink are pushed onto the worklist in turn, until a fixed
//! point is reached.
//!
//! A neighbour is never left with zero options. When every option would be
//! removed it keeps its highest-weight previous option instead and the cell is
//! reported in `PropagationOutcome::relaxed`. Relaxed cells break strict
//! adjacency consistency; the generator decides whether to accept that or to
//! treat it as a contradiction and restart.

use crate::adjacency::{AdjacencyRuleSet, Direction};
use crate::library::PatternLibrary;
use crate::pattern::PatternId;
use crate::wave::{CellRef, WaveGrid};

/// Result of one propagation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropagationOutcome {
    /// Cells that would have become empty and kept one option instead.
    pub relaxed: Vec<CellRef>,
    /// Number of cells popped from the worklist.
    pub visits: usize,
}

impl PropagationOutcome {
    /// True when no cell had to be relaxed.
    pub fn is_consistent(&self) -> bool {
        self.relaxed.is_empty()
    }
}

/// Reusable propagation state bound to one library and rule set.
pub struct Propagator<'a> {
    rules: &'a AdjacencyRuleSet,
    library: &'a PatternLibrary,
    /// Worklist of cells whose options changed
    stack: Vec<CellRef>,
    /// Scratch mask, indexed by pattern id
    allowed: Vec<bool>,
}

impl<'a> Propagator<'a> {
    pub fn new(rules: &'a AdjacencyRuleSet, library: &'a PatternLibrary) -> Self {
        Self {
            rules,
            library,
            stack: Vec::new(),
            allowed: vec![false; library.len()],
        }
    }

    /// Propagate the consequences of `changed` through `grid`.
    pub fn propagate(&mut self, grid: &mut WaveGrid, changed: CellRef) -> PropagationOutcome {
        let mut outcome = PropagationOutcome::default();
        self.stack.clear();
        self.stack.push(changed);

        while let Some(at) = self.stack.pop() {
            outcome.visits += 1;

            for dir in Direction::ALL {
                let Some(next) = grid.neighbor(at, dir) else {
                    continue;
                };

                self.fill_allowed(grid, at, dir);
                let allowed = &self.allowed;

                let neighbor = grid.cell_mut(next);
                if neighbor.options.iter().all(|id| allowed[id.index()]) {
                    continue;
                }

                let before = neighbor.options.len();
                let kept: Vec<PatternId> = neighbor
                    .options
                    .iter()
                    .copied()
                    .filter(|id| allowed[id.index()])
                    .collect();

                if kept.is_empty() {
                    let keep = self.heaviest(&neighbor.options);
                    neighbor.options.clear();
                    neighbor.options.extend(keep);
                    if !outcome.relaxed.contains(&next) {
                        tracing::warn!(
                            cell = %next,
                            from = %at,
                            ?dir,
                            "no option left, kept heaviest; adjacency not strict here"
                        );
                        outcome.relaxed.push(next);
                    }
                } else {
                    neighbor.options = kept;
                }

                if neighbor.options.len() < before {
                    self.stack.push(next);
                }
            }
        }

        outcome
    }

    /// Mark every pattern some option of `at` allows in `dir`.
    fn fill_allowed(&mut self, grid: &WaveGrid, at: CellRef, dir: Direction) {
        self.allowed.fill(false);
        for &option in &grid.cell(at).options {
            for &id in self.rules.allowed(dir, option) {
                self.allowed[id.index()] = true;
            }
        }
    }

    /// Highest-weight option, lowest id on ties.
    fn heaviest(&self, options: &[PatternId]) -> Option<PatternId> {
        let mut best: Option<PatternId> = None;
        for &id in options {
            match best {
                Some(b) if self.library.weight(b) >= self.library.weight(id) => {}
                _ => best = Some(id),
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::Grid;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    /// Library of single-tile patterns 1, 2, 3 (weights 1, 2, 1) with rules
    /// given explicitly per direction.
    fn library() -> PatternLibrary {
        let sample = Grid::from_base_ids(4, 1, &[1, 2, 2, 3]).unwrap();
        PatternLibrary::extract(&[sample], 1).unwrap()
    }

    fn same_in_all_directions(per_pattern: Vec<Vec<PatternId>>) -> AdjacencyRuleSet {
        AdjacencyRuleSet::from_lists([
            per_pattern.clone(),
            per_pattern.clone(),
            per_pattern.clone(),
            per_pattern,
        ])
    }

    fn ids(raw: &[u32]) -> Vec<PatternId> {
        raw.iter().map(|&i| PatternId(i)).collect()
    }

    #[test]
    fn test_propagation_restricts_neighbors() {
        // Every pattern only tolerates itself
        let library = library();
        let rules = same_in_all_directions(vec![ids(&[0]), ids(&[1]), ids(&[2])]);
        let mut wave = WaveGrid::new(3, 3, 3);
        let center = CellRef::new(1, 1);
        wave.cell_mut(center).collapse_to(PatternId(1));

        let mut propagator = Propagator::new(&rules, &library);
        let outcome = propagator.propagate(&mut wave, center);

        assert!(outcome.is_consistent());
        for (_, cell) in wave.iter() {
            assert_eq!(cell.options, ids(&[1]));
        }
    }

    #[test]
    fn test_propagation_stops_at_fixed_point() {
        // Everything compatible: nothing shrinks, only the seed is visited
        let library = library();
        let all = ids(&[0, 1, 2]);
        let rules = same_in_all_directions(vec![all.clone(), all.clone(), all]);
        let mut wave = WaveGrid::new(4, 4, 3);
        let at = CellRef::new(0, 0);
        wave.cell_mut(at).collapse_to(PatternId(2));

        let mut propagator = Propagator::new(&rules, &library);
        let outcome = propagator.propagate(&mut wave, at);
        assert_eq!(outcome.visits, 1);
        assert_eq!(wave.cell(CellRef::new(3, 3)).options.len(), 3);
    }

    #[test]
    fn test_propagation_chains_through_grid() {
        // 0 -> 1 -> 2 -> 0 to the right; anything goes vertically
        let library = library();
        let all = ids(&[0, 1, 2]);
        let right = vec![ids(&[1]), ids(&[2]), ids(&[0])];
        let left = vec![ids(&[2]), ids(&[0]), ids(&[1])];
        let vertical = vec![all.clone(), all.clone(), all];
        let rules = AdjacencyRuleSet::from_lists([vertical.clone(), right, vertical, left]);

        let mut wave = WaveGrid::new(4, 1, 3);
        let at = CellRef::new(0, 0);
        wave.cell_mut(at).collapse_to(PatternId(0));
        let mut propagator = Propagator::new(&rules, &library);
        assert!(propagator.propagate(&mut wave, at).is_consistent());

        let row: Vec<Vec<PatternId>> = wave.iter().map(|(_, c)| c.options.clone()).collect();
        assert_eq!(row, vec![ids(&[0]), ids(&[1]), ids(&[2]), ids(&[0])]);
    }

    #[test]
    fn test_relaxation_keeps_heaviest_option() {
        // Nothing is compatible with anything
        let library = library();
        let rules = same_in_all_directions(vec![vec![], vec![], vec![]]);
        let mut wave = WaveGrid::new(2, 1, 3);
        let at = CellRef::new(0, 0);
        wave.cell_mut(at).collapse_to(PatternId(0));

        let mut propagator = Propagator::new(&rules, &library);
        let outcome = propagator.propagate(&mut wave, at);

        // The neighbour is relaxed first, then the seed is found inconsistent
        // with what the neighbour kept
        let neighbor = CellRef::new(1, 0);
        assert_eq!(outcome.relaxed, vec![neighbor, at]);
        // Pattern 1 has weight 2, the others weight 1
        assert_eq!(wave.cell(neighbor).options, ids(&[1]));
        assert!(!wave.is_contradiction());
        // The collapsed seed is never changed
        assert_eq!(wave.cell(at).options, ids(&[0]));
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_relaxation_logged_at_warn() {
        let library = library();
        let rules = same_in_all_directions(vec![vec![], vec![], vec![]]);
        let mut wave = WaveGrid::new(2, 1, 3);
        let at = CellRef::new(0, 0);
        wave.cell_mut(at).collapse_to(PatternId(0));

        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            Propagator::new(&rules, &library).propagate(&mut wave, at);
        });

        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("WARN"), "log: {}", output);
        assert!(output.contains("kept heaviest"), "log: {}", output);
        assert!(output.contains("(1, 0)"), "log: {}", output);
    }

    #[test]
    fn test_wrapped_propagation_reaches_far_edge() {
        let library = library();
        let right = vec![ids(&[1]), ids(&[2]), ids(&[0])];
        let left = vec![ids(&[2]), ids(&[0]), ids(&[1])];
        let all = ids(&[0, 1, 2]);
        let vertical = vec![all.clone(), all.clone(), all];
        let rules = AdjacencyRuleSet::from_lists([vertical.clone(), right, vertical, left]);

        let mut wave = WaveGrid::new(3, 1, 3).with_wrap(true);
        let at = CellRef::new(0, 0);
        wave.cell_mut(at).collapse_to(PatternId(0));
        let mut propagator = Propagator::new(&rules, &library);
        let outcome = propagator.propagate(&mut wave, at);

        // Period 3 cycle fits a width-3 torus exactly
        assert!(outcome.is_consistent());
        assert_eq!(wave.cell(CellRef::new(2, 0)).options, ids(&[2]));
    }
}
