//! Overlapping Wave Function Collapse for layered tile maps.
//!
//! This crate learns local structure from sample maps and produces new maps
//! that look locally like the samples:
//! - `PatternLibrary`: unique N×N windows of the samples, with weights
//! - `AdjacencyRuleSet`: which patterns may sit next to which, per direction
//! - `WaveGrid`: per-cell pattern options while the output is being solved
//! - `Generator` / `WfcRun`: collapse, propagate, restart, fall back
//! - `Exporter`: stitches collapsed patterns into a flat `Grid`
//!
//! # Example
//!
//! ```ignore
//! use mapgen_core::{generate, Grid, StdRandom};
//!
//! let sample = Grid::from_base_ids(4, 4, &ids)?;
//! let mut rng = StdRandom::from_seed(42);
//! let map = generate(&[sample], 3, 32, 32, 0, &mut rng)?;
//! assert_eq!((map.width, map.height), (34, 34));
//! ```

pub mod adjacency;
pub mod collapse;
pub mod config;
pub mod error;
pub mod export;
pub mod fallback;
pub mod generator;
pub mod host;
pub mod library;
pub mod pattern;
pub mod propagate;
pub mod rng;
pub mod tile;
pub mod wave;

/// Smallest supported pattern side length.
pub const MIN_PATTERN_SIZE: usize = 2;

/// Largest supported pattern side length.
pub const MAX_PATTERN_SIZE: usize = 8;

pub use adjacency::{AdjacencyMode, AdjacencyRuleSet, Direction};
pub use collapse::EntropyHeuristic;
pub use config::{ContradictionPolicy, GenerationConfig};
pub use error::{Contradiction, GenerationError, MaxRetriesExceeded};
pub use export::Exporter;
pub use fallback::FallbackGenerator;
pub use generator::{
    generate, generate_with, GenerationReport, Generated, Generator, RunState, WfcRun,
};
pub use host::{MapStore, NotificationSink, NullSink};
pub use library::PatternLibrary;
pub use pattern::{Pattern, PatternId, Symmetry};
pub use rng::{RandomSource, StdRandom};
pub use tile::{Grid, Tile};
pub use wave::{Cell, CellRef, WaveGrid};
