//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started {
                project_id,
                repository_url,
            } => {
                info!(project = %project_id, repository = %repository_url, "Starting analysis");
            }
            ProgressEvent::CloneComplete { duration } => {
                info!(duration_ms = duration.as_millis(), "Repository clone complete");
            }
            ProgressEvent::FilesCollected { total, prioritized } => {
                info!(total, prioritized, "File collection complete");
            }
            ProgressEvent::BatchStarted { index, total } => {
                debug!(
                    batch = format!("{}/{}", index + 1, total),
                    "Sending batch for generation"
                );
            }
            ProgressEvent::BatchComplete {
                index,
                total,
                duration,
            } => {
                info!(
                    batch = format!("{}/{}", index + 1, total),
                    duration_ms = duration.as_millis(),
                    "Batch processed"
                );
            }
            ProgressEvent::BatchSkipped {
                index,
                total,
                attempts,
                reason,
            } => {
                warn!(
                    batch = format!("{}/{}", index + 1, total),
                    attempts,
                    reason = %reason,
                    "Batch abandoned"
                );
            }
            ProgressEvent::MergeComplete { routes, schemas } => {
                info!(routes, schemas, "Merged partial documents");
            }
            ProgressEvent::Completed { routes, total_time } => {
                info!(
                    routes,
                    total_time_ms = total_time.as_millis(),
                    "Analysis complete"
                );
            }
            ProgressEvent::Failed { error } => {
                warn!(error = %error, "Analysis failed");
            }
        }
    }
}
