use crate::error::{StoreError, StoreResult};
use mapgen_core::{Grid, MapStore};
use std::collections::HashMap;

/// Maps held in memory, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    grids: HashMap<String, Grid>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, grid: Grid) {
        self.grids.insert(id.into(), grid);
    }

    pub fn get(&self, id: &str) -> Option<&Grid> {
        self.grids.get(id)
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }
}

impl MapStore for MemoryStore {
    type Error = StoreError;

    fn load_grid(&self, source_id: &str) -> StoreResult<Grid> {
        self.grids
            .get(source_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                id: source_id.to_string(),
            })
    }

    fn save_grid(&mut self, target_id: &str, grid: &Grid) -> StoreResult<()> {
        self.grids.insert(target_id.to_string(), grid.clone());
        Ok(())
    }
}
