use mapgen_core::NotificationSink;
use std::error::Error;

/// Reports outcomes through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn on_success(&mut self, target_id: &str) {
        tracing::info!(target_id, "map generated");
    }

    fn on_failure(&mut self, error: &(dyn Error + 'static)) {
        tracing::error!(%error, "map generation failed");
    }
}

/// Records outcomes for later inspection.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub successes: Vec<String>,
    pub failures: Vec<String>,
}

impl NotificationSink for RecordingSink {
    fn on_success(&mut self, target_id: &str) {
        self.successes.push(target_id.to_string());
    }

    fn on_failure(&mut self, error: &(dyn Error + 'static)) {
        self.failures.push(error.to_string());
    }
}
