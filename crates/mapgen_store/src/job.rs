//! Generation requests described as JSON job files.
//!
//! ```json
//! {
//!   "sources": ["cave_a", "cave_b"],
//!   "target": "cave_out",
//!   "seed": 42,
//!   "config": { "pattern_size": 3, "width": 24, "height": 24, "wrap": true }
//! }
//! ```

use crate::error::{JobError, StoreError, StoreResult};
use mapgen_core::{
    generate_with, GenerationConfig, GenerationReport, Grid, MapStore, NotificationSink,
    StdRandom,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationJob {
    /// Ids of the sample maps.
    pub sources: Vec<String>,
    /// Id the result is saved under.
    pub target: String,
    /// Fixed seed for reproducible output. Random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub config: GenerationConfig,
}

impl GenerationJob {
    pub fn load<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    fn rng(&self) -> StdRandom {
        match self.seed {
            Some(seed) => StdRandom::from_seed(seed),
            None => StdRandom::from_entropy(),
        }
    }
}

/// Load the job's samples, generate, save the result, and notify `sink`.
///
/// Failures are reported to `sink` and returned; nothing is saved then.
pub fn run_job<S>(
    store: &mut S,
    sink: &mut dyn NotificationSink,
    job: &GenerationJob,
) -> Result<GenerationReport, JobError>
where
    S: MapStore<Error = StoreError>,
{
    let result = execute(store, job);
    match &result {
        Ok(_) => sink.on_success(&job.target),
        Err(error) => sink.on_failure(error),
    }
    result
}

fn execute<S>(store: &mut S, job: &GenerationJob) -> Result<GenerationReport, JobError>
where
    S: MapStore<Error = StoreError>,
{
    if job.sources.is_empty() {
        return Err(JobError::NoSources);
    }

    let samples = job
        .sources
        .iter()
        .map(|id| store.load_grid(id))
        .collect::<Result<Vec<Grid>, _>>()?;
    tracing::debug!(sources = samples.len(), target = %job.target, "loaded samples");

    let mut rng = job.rng();
    let generated = generate_with(&samples, &job.config, &mut rng)?;
    store.save_grid(&job.target, &generated.grid)?;
    Ok(generated.report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::sink::RecordingSink;
    use mapgen_core::{GenerationError, Tile};

    fn job(sources: &[&str]) -> GenerationJob {
        GenerationJob {
            sources: sources.iter().map(|s| s.to_string()).collect(),
            target: "out".to_string(),
            seed: Some(3),
            config: GenerationConfig::new(2, 4, 4),
        }
    }

    #[test]
    fn test_job_json_defaults() {
        let job: GenerationJob =
            serde_json::from_str(r#"{"sources": ["a"], "target": "b"}"#).unwrap();
        assert_eq!(job.seed, None);
        assert_eq!(job.config, GenerationConfig::default());
    }

    #[test]
    fn test_run_job_saves_and_notifies() {
        let mut store = MemoryStore::new();
        store.insert("sample", Grid::filled(3, 3, Tile::floor(5)));
        let mut sink = RecordingSink::default();

        let report = run_job(&mut store, &mut sink, &job(&["sample"])).unwrap();
        assert_eq!(report.pattern_count, 1);
        assert!(!report.used_fallback);
        assert_eq!(sink.successes, vec!["out".to_string()]);
        assert!(sink.failures.is_empty());

        let out = store.get("out").unwrap();
        assert_eq!((out.width, out.height), (5, 5));
    }

    #[test]
    fn test_missing_source_notifies_failure() {
        let mut store = MemoryStore::new();
        let mut sink = RecordingSink::default();
        let err = run_job(&mut store, &mut sink, &job(&["ghost"])).unwrap_err();
        assert!(matches!(err, JobError::Store(StoreError::NotFound { .. })));
        assert_eq!(sink.failures.len(), 1);
        assert!(store.get("out").is_none());
    }

    #[test]
    fn test_generation_error_surfaces() {
        let mut store = MemoryStore::new();
        store.insert("blank", Grid::filled(3, 3, Tile::EMPTY));
        let mut sink = RecordingSink::default();
        let err = run_job(&mut store, &mut sink, &job(&["blank"])).unwrap_err();
        assert!(matches!(
            err,
            JobError::Generation(GenerationError::EmptySample)
        ));
        assert!(sink.successes.is_empty());
    }

    #[test]
    fn test_no_sources() {
        let mut store = MemoryStore::new();
        let mut sink = RecordingSink::default();
        assert!(matches!(
            run_job(&mut store, &mut sink, &job(&[])),
            Err(JobError::NoSources)
        ));
    }
}
