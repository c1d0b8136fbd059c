//! Cell selection and collapse.
//!
//! Selection picks the most constrained unresolved cell (lowest entropy),
//! breaking ties uniformly at random. Collapse commits that cell to one of
//! its options, chosen with probability proportional to pattern weight.

use crate::error::Contradiction;
use crate::library::PatternLibrary;
use crate::pattern::PatternId;
use crate::rng::{weighted_index, RandomSource};
use crate::wave::{Cell, CellRef, WaveGrid};
use serde::{Deserialize, Serialize};

/// Entropies closer than this are treated as tied.
const TIE_EPSILON: f64 = 1e-9;

/// How a cell's entropy is measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntropyHeuristic {
    /// Number of remaining options.
    #[default]
    OptionCount,
    /// Shannon entropy of the remaining options' weight distribution.
    Shannon,
}

impl EntropyHeuristic {
    pub fn entropy(self, cell: &Cell, library: &PatternLibrary) -> f64 {
        match self {
            EntropyHeuristic::OptionCount => cell.entropy() as f64,
            EntropyHeuristic::Shannon => shannon_entropy(cell, library),
        }
    }
}

/// H = ln(Σw) - Σ(w·ln w) / Σw over the cell's options.
fn shannon_entropy(cell: &Cell, library: &PatternLibrary) -> f64 {
    let mut sum_of_weights = 0.0;
    let mut sum_of_weight_log_weights = 0.0;
    for &id in &cell.options {
        let w = library.weight(id) as f64;
        sum_of_weights += w;
        sum_of_weight_log_weights += w * w.ln();
    }
    if sum_of_weights <= 0.0 {
        return 0.0;
    }
    sum_of_weights.ln() - sum_of_weight_log_weights / sum_of_weights
}

/// Find the next cell to collapse.
///
/// Returns `Ok(None)` once every cell is collapsed. An uncollapsed cell with
/// no options is reported as a contradiction as soon as it is scanned.
pub fn select_next_cell(
    grid: &WaveGrid,
    library: &PatternLibrary,
    heuristic: EntropyHeuristic,
    rng: &mut dyn RandomSource,
) -> Result<Option<CellRef>, Contradiction> {
    let mut best: Option<(CellRef, f64)> = None;
    let mut ties = 0usize;

    for (at, cell) in grid.iter() {
        if cell.collapsed {
            continue;
        }
        if cell.is_contradiction() {
            return Err(Contradiction { cell: at });
        }

        let entropy = heuristic.entropy(cell, library);
        match best {
            Some((_, min)) if entropy > min + TIE_EPSILON => {}
            Some((_, min)) if entropy >= min - TIE_EPSILON => {
                // Reservoir sampling keeps every tied cell equally likely
                ties += 1;
                if rng.next_usize_max(ties) == 0 {
                    best = Some((at, min));
                }
            }
            _ => {
                best = Some((at, entropy));
                ties = 1;
            }
        }
    }

    Ok(best.map(|(at, _)| at))
}

/// Commit `cell` to one of its options, weighted by library weight.
///
/// Returns the chosen pattern, or `None` if the cell had no options left.
pub fn collapse(
    cell: &mut Cell,
    library: &PatternLibrary,
    rng: &mut dyn RandomSource,
) -> Option<PatternId> {
    let weights: Vec<f64> = cell
        .options
        .iter()
        .map(|&id| library.weight(id) as f64)
        .collect();

    let id = cell.options[weighted_index(&weights, rng)?];
    cell.collapse_to(id);
    Some(id)
}
