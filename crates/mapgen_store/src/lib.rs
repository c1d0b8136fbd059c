//! Host-side collaborators for `mapgen_core`.
//!
//! - `JsonDirStore` / `MemoryStore`: `MapStore` implementations
//! - `LogSink` / `RecordingSink`: `NotificationSink` implementations
//! - `GenerationJob` / `run_job`: load samples, generate, save, notify

pub mod error;
pub mod job;
pub mod json_store;
pub mod memory;
pub mod sink;

pub use error::{JobError, StoreError, StoreResult};
pub use job::{run_job, GenerationJob};
pub use json_store::JsonDirStore;
pub use memory::MemoryStore;
pub use sink::{LogSink, RecordingSink};
