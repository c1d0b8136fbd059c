//! Pattern extraction from sample grids.
//!
//! Every N×N window of every sample becomes a candidate pattern. Identical
//! windows are merged and counted; the count is the pattern's weight and
//! biases collapse towards patterns that are common in the samples.

use crate::error::GenerationError;
use crate::pattern::{Pattern, PatternId, Symmetry};
use crate::tile::{Grid, BASE_LAYER, EMPTY};
use std::collections::HashMap;

/// Ordered set of unique patterns with occurrence weights.
///
/// The library is the single owner of pattern data; everything else refers
/// to patterns by `PatternId`.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    pattern_size: usize,
    patterns: Vec<Pattern>,
    weights: Vec<u32>,
    index: HashMap<Pattern, PatternId>,
}

impl PatternLibrary {
    /// Extract the unique non-empty N×N windows of `samples`.
    pub fn extract(samples: &[Grid], pattern_size: usize) -> Result<Self, GenerationError> {
        Self::extract_with(samples, pattern_size, Symmetry::Identity)
    }

    /// Like `extract`, additionally counting the selected symmetry variants
    /// of every window.
    ///
    /// Windows are visited sample by sample, row by row, so pattern ids follow
    /// first-seen order and the result is fully deterministic.
    pub fn extract_with(
        samples: &[Grid],
        pattern_size: usize,
        symmetry: Symmetry,
    ) -> Result<Self, GenerationError> {
        let mut library = Self {
            pattern_size,
            patterns: Vec::new(),
            weights: Vec::new(),
            index: HashMap::new(),
        };

        if pattern_size == 0 {
            return Err(GenerationError::EmptySample);
        }

        for (i, sample) in samples.iter().enumerate() {
            sample.validate(i)?;
            if sample.width < pattern_size || sample.height < pattern_size {
                continue;
            }

            for y in 0..=sample.height - pattern_size {
                for x in 0..=sample.width - pattern_size {
                    let window = Pattern::window(sample, x, y, pattern_size);
                    if window.is_empty() {
                        continue;
                    }
                    for variant in symmetry.variants(&window) {
                        library.insert(variant);
                    }
                }
            }
        }

        if library.is_empty() {
            return Err(GenerationError::EmptySample);
        }

        tracing::debug!(
            patterns = library.len(),
            total_weight = library.total_weight(),
            pattern_size,
            "extracted pattern library"
        );

        Ok(library)
    }

    fn insert(&mut self, pattern: Pattern) -> PatternId {
        if let Some(&id) = self.index.get(&pattern) {
            self.weights[id.index()] += 1;
            return id;
        }
        let id = PatternId::from_index(self.patterns.len());
        self.patterns.push(pattern.clone());
        self.weights.push(1);
        self.index.insert(pattern, id);
        id
    }

    #[inline]
    pub fn pattern_size(&self) -> usize {
        self.pattern_size
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    #[inline]
    pub fn pattern(&self, id: PatternId) -> &Pattern {
        &self.patterns[id.index()]
    }

    #[inline]
    pub fn weight(&self, id: PatternId) -> u32 {
        self.weights[id.index()]
    }

    pub fn weights(&self) -> &[u32] {
        &self.weights
    }

    pub fn total_weight(&self) -> u64 {
        self.weights.iter().map(|&w| w as u64).sum()
    }

    /// Look up the id of a structurally equal pattern.
    pub fn id_of(&self, pattern: &Pattern) -> Option<PatternId> {
        self.index.get(pattern).copied()
    }

    pub fn ids(&self) -> impl Iterator<Item = PatternId> + '_ {
        (0..self.patterns.len()).map(PatternId::from_index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PatternId, &Pattern, u32)> + '_ {
        self.patterns
            .iter()
            .zip(&self.weights)
            .enumerate()
            .map(|(i, (p, &w))| (PatternId::from_index(i), p, w))
    }

    /// Most frequent nonzero base-layer id over all pattern tiles.
    ///
    /// Ties go to the id seen first in library order.
    pub fn dominant_floor_id(&self) -> Option<u32> {
        let mut counts: HashMap<u32, usize> = HashMap::new();
        let mut order: Vec<u32> = Vec::new();

        for pattern in &self.patterns {
            for tile in pattern.tiles() {
                let id = tile.layer(BASE_LAYER);
                if id == EMPTY {
                    continue;
                }
                let count = counts.entry(id).or_insert_with(|| {
                    order.push(id);
                    0
                });
                *count += 1;
            }
        }

        let mut best: Option<(u32, usize)> = None;
        for id in order {
            let count = counts[&id];
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((id, count));
            }
        }
        best.map(|(id, _)| id)
    }
}
