//! Maps stored as one JSON file per id.
//!
//! `<root>/<id>.json` holds a serialized `Grid`:
//!
//! ```json
//! { "width": 2, "height": 1, "cells": [[1, 0, 0, 0], [2, 0, 3, 0]] }
//! ```

use crate::error::{StoreError, StoreResult};
use mapgen_core::{Grid, MapStore};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// A directory of `<id>.json` map files.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing `id`.
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }

    /// Ids of every map in the directory, sorted.
    pub fn list(&self) -> StoreResult<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|source| StoreError::Io {
            path: self.root.clone(),
            source,
        })?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: self.root.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

impl MapStore for JsonDirStore {
    type Error = StoreError;

    fn load_grid(&self, source_id: &str) -> StoreResult<Grid> {
        let path = self.path_for(source_id);
        let file = File::open(&path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                StoreError::NotFound {
                    id: source_id.to_string(),
                }
            } else {
                StoreError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        let grid = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| StoreError::Json { path, source })?;
        Ok(grid)
    }

    fn save_grid(&mut self, target_id: &str, grid: &Grid) -> StoreResult<()> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| StoreError::Io { path, source }
        };

        fs::create_dir_all(&self.root).map_err(io_err(&self.root))?;
        let path = self.path_for(target_id);
        let file = File::create(&path).map_err(io_err(&path))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, grid).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        writer.flush().map_err(io_err(&path))?;

        tracing::debug!(path = %path.display(), "saved map");
        Ok(())
    }
}
