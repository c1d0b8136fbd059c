//! Generation driver: collapse/propagate loop, restarts, and fallback.
//!
//! A single attempt is a `WfcRun`: select the lowest-entropy cell, collapse
//! it, propagate, repeat until every cell is collapsed (`Done`) or a cell runs
//! out of options (`Contradiction`). `Generator` wraps attempts in a bounded
//! loop; once `max_retries` attempts have failed the `FallbackGenerator`
//! produces the wave instead, so generation always terminates with a full
//! grid.

use crate::adjacency::AdjacencyRuleSet;
use crate::collapse::{collapse, select_next_cell, EntropyHeuristic};
use crate::config::{ContradictionPolicy, GenerationConfig};
use crate::error::{GenerationError, MaxRetriesExceeded};
use crate::export::Exporter;
use crate::fallback::FallbackGenerator;
use crate::library::PatternLibrary;
use crate::pattern::PatternId;
use crate::propagate::Propagator;
use crate::rng::RandomSource;
use crate::tile::Grid;
use crate::wave::{CellRef, WaveGrid};
use serde::Serialize;

/// State of one collapse attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Cells remain to be collapsed.
    Running,
    /// Every cell is collapsed.
    Done,
    /// The given cell ran out of options.
    Contradiction(CellRef),
}

/// One collapse attempt over a wave, advanced step by step.
pub struct WfcRun<'a> {
    library: &'a PatternLibrary,
    propagator: Propagator<'a>,
    wave: WaveGrid,
    heuristic: EntropyHeuristic,
    policy: ContradictionPolicy,
    state: RunState,
    relaxed_cells: usize,
}

impl<'a> WfcRun<'a> {
    pub fn new(
        library: &'a PatternLibrary,
        rules: &'a AdjacencyRuleSet,
        config: &GenerationConfig,
    ) -> Self {
        let wave = WaveGrid::new(config.width, config.height, library.len()).with_wrap(config.wrap);
        Self {
            library,
            propagator: Propagator::new(rules, library),
            wave,
            heuristic: config.entropy,
            policy: config.contradiction,
            state: RunState::Running,
            relaxed_cells: 0,
        }
    }

    /// Collapse one cell and propagate it.
    pub fn step(&mut self, rng: &mut dyn RandomSource) -> RunState {
        if self.state != RunState::Running {
            return self.state;
        }

        let at = match select_next_cell(&self.wave, self.library, self.heuristic, rng) {
            Ok(Some(at)) => at,
            Ok(None) => {
                self.state = RunState::Done;
                return self.state;
            }
            Err(contradiction) => {
                self.state = RunState::Contradiction(contradiction.cell);
                return self.state;
            }
        };

        if collapse(self.wave.cell_mut(at), self.library, rng).is_none() {
            self.state = RunState::Contradiction(at);
            return self.state;
        }

        let outcome = self.propagator.propagate(&mut self.wave, at);
        if let Some(&first) = outcome.relaxed.first() {
            match self.policy {
                ContradictionPolicy::Restart => self.state = RunState::Contradiction(first),
                ContradictionPolicy::Relax => self.relaxed_cells += outcome.relaxed.len(),
            }
        }

        self.state
    }

    /// Step until the attempt finishes.
    pub fn run(&mut self, rng: &mut dyn RandomSource) -> RunState {
        while self.step(rng) == RunState::Running {}
        self.state
    }

    /// Reopen the wave for a fresh attempt with the same library and rules.
    pub fn restart(&mut self) {
        self.wave.reset();
        self.state = RunState::Running;
        self.relaxed_cells = 0;
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn wave(&self) -> &WaveGrid {
        &self.wave
    }

    pub fn into_wave(self) -> WaveGrid {
        self.wave
    }

    /// Cells relaxed so far in this attempt (`Relax` policy only).
    pub fn relaxed_cells(&self) -> usize {
        self.relaxed_cells
    }
}

/// Summary of how a grid was produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Collapse attempts made, including the successful one.
    pub attempts: usize,
    /// True when restarts ran out and adjacency was ignored.
    pub used_fallback: bool,
    /// Cells kept alive by relaxation in the accepted attempt.
    pub relaxed_cells: usize,
    pub pattern_count: usize,
    pub rule_count: usize,
}

/// A finished generation.
#[derive(Debug, Clone)]
pub struct Generated {
    pub grid: Grid,
    /// Pattern committed at each wave cell, row-major.
    pub assignment: Vec<PatternId>,
    pub report: GenerationReport,
}

/// Pattern library and rules for one request, ready to generate.
pub struct Generator {
    config: GenerationConfig,
    library: PatternLibrary,
    rules: AdjacencyRuleSet,
}

impl Generator {
    /// Validate `config` and learn patterns and rules from `samples`.
    ///
    /// Bounds are checked before the samples are looked at.
    pub fn new(samples: &[Grid], config: GenerationConfig) -> Result<Self, GenerationError> {
        config.validate()?;
        let library = PatternLibrary::extract_with(samples, config.pattern_size, config.symmetry)?;
        let adjacency = config.effective_adjacency();
        if adjacency != config.adjacency {
            tracing::debug!(?adjacency, "wrapped output, using overlap adjacency");
        }
        let rules = AdjacencyRuleSet::build_with(&library, adjacency);
        Self::from_parts(config, library, rules)
    }

    /// Generate with a prepared library and hand-built rules.
    pub fn from_parts(
        config: GenerationConfig,
        library: PatternLibrary,
        rules: AdjacencyRuleSet,
    ) -> Result<Self, GenerationError> {
        config.validate()?;
        if rules.pattern_count() != library.len() {
            return Err(GenerationError::Internal(format!(
                "rules cover {} patterns, library has {}",
                rules.pattern_count(),
                library.len()
            )));
        }
        if library.pattern_size() != config.pattern_size {
            return Err(GenerationError::Internal(format!(
                "library pattern size {} does not match configured {}",
                library.pattern_size(),
                config.pattern_size
            )));
        }
        // Without any base id every output tile would need the floor pass
        Exporter::floor_tile_id(&library, config.fallback_tile_id)?;
        Ok(Self {
            config,
            library,
            rules,
        })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn library(&self) -> &PatternLibrary {
        &self.library
    }

    pub fn rules(&self) -> &AdjacencyRuleSet {
        &self.rules
    }

    /// Run attempts until one succeeds or the retry bound is hit, then export.
    pub fn generate(&self, rng: &mut dyn RandomSource) -> Result<Generated, GenerationError> {
        let config = &self.config;
        let max_retries = config.max_retries();
        let mut run = WfcRun::new(&self.library, &self.rules, config);
        let mut attempts = 0;
        let mut solved = false;

        for attempt in 0..max_retries {
            if attempt > 0 {
                run.restart();
            }
            attempts = attempt + 1;
            match run.run(rng) {
                RunState::Done => {
                    solved = true;
                    break;
                }
                RunState::Contradiction(cell) => {
                    tracing::debug!(attempt = attempts, %cell, "contradiction, restarting");
                }
                RunState::Running => {}
            }
        }

        let relaxed_cells = run.relaxed_cells();
        let wave = if solved {
            run.into_wave()
        } else {
            let exhausted = MaxRetriesExceeded { attempts };
            tracing::warn!(%exhausted, "falling back to unconstrained fill");
            FallbackGenerator::fill(config.width, config.height, &self.library, rng)
        };

        let assignment = wave.assignment().ok_or_else(|| {
            GenerationError::Internal("wave not fully collapsed after generation".to_string())
        })?;
        let grid = Exporter::export(&wave, &self.library, config.fallback_tile_id)?;

        let report = GenerationReport {
            attempts,
            used_fallback: !solved,
            relaxed_cells: if solved { relaxed_cells } else { 0 },
            pattern_count: self.library.len(),
            rule_count: self.rules.rule_count(),
        };

        tracing::info!(
            width = grid.width,
            height = grid.height,
            attempts = report.attempts,
            fallback = report.used_fallback,
            "generation complete"
        );

        Ok(Generated {
            grid,
            assignment,
            report,
        })
    }
}

/// Generate a grid from `samples` with default settings.
///
/// The result is `(output_width + pattern_size - 1) × (output_height +
/// pattern_size - 1)` tiles. A `fallback_tile_id` of 0 fills base-layer holes
/// with the samples' dominant floor tile.
///
/// # Errors
///
/// - `InvalidGridBounds` for a zero output dimension, a pattern size outside
///   `MIN_PATTERN_SIZE..=MAX_PATTERN_SIZE`, or an output too large to index.
///   Checked before `samples` or `rng` are touched.
/// - `MalformedSample` when a sample's cell count disagrees with its size.
/// - `EmptySample` when no sample yields a non-empty pattern.
/// - `NoFloorTile` when `fallback_tile_id` is 0 and no sample tile has a
///   nonzero base layer, so holes could not be filled. Reported before any
///   random draw.
pub fn generate(
    samples: &[Grid],
    pattern_size: usize,
    output_width: usize,
    output_height: usize,
    fallback_tile_id: u32,
    rng: &mut dyn RandomSource,
) -> Result<Grid, GenerationError> {
    let config = GenerationConfig {
        fallback_tile_id,
        ..GenerationConfig::new(pattern_size, output_width, output_height)
    };
    generate_with(samples, &config, rng).map(|generated| generated.grid)
}

/// Generate with full configuration, returning the assignment and report too.
pub fn generate_with(
    samples: &[Grid],
    config: &GenerationConfig,
    rng: &mut dyn RandomSource,
) -> Result<Generated, GenerationError> {
    Generator::new(samples, config.clone())?.generate(rng)
}
