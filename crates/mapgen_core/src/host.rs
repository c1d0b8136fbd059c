//! Collaborators supplied by the host application.
//!
//! The core never does I/O itself. A host loads sample maps and saves results
//! through a `MapStore`, and learns the outcome of a request through a
//! `NotificationSink`.

use crate::tile::Grid;
use std::error::Error;

/// Loads sample maps and persists generated ones, addressed by string id.
pub trait MapStore {
    type Error: Error + Send + Sync + 'static;

    fn load_grid(&self, source_id: &str) -> Result<Grid, Self::Error>;

    fn save_grid(&mut self, target_id: &str, grid: &Grid) -> Result<(), Self::Error>;
}

/// Receives the outcome of a generation request.
pub trait NotificationSink {
    fn on_success(&mut self, target_id: &str);

    fn on_failure(&mut self, error: &(dyn Error + 'static));
}

/// A sink that drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn on_success(&mut self, _target_id: &str) {}

    fn on_failure(&mut self, _error: &(dyn Error + 'static)) {}
}
