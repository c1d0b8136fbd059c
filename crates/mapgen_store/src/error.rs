use mapgen_core::GenerationError;
use std::path::PathBuf;

/// Errors from reading or writing stored maps and job files.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("map not found: {id}")]
    NotFound { id: String },

    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid json in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors from running a generation job end to end.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("job has no source maps")]
    NoSources,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
